//! goog.module output and the modules manifest, end to end.

use indexmap::IndexMap;
use tsickle_common::CompilerOptions;
use tsickle_emitter::{EmitOptions, EmitResult, HostOptions, TsickleHost, emit};
use tsickle_program::ast::{
    Expression, ImportClause, ImportDeclaration, ImportSpecifier, ModifierFlags, NamedImportBindings, StringLiteral,
    VariableDeclaration, VariableStatement,
};
use tsickle_program::{
    InMemoryProgram, ProgramBuilder, Statement, StatementKind, SymbolFlags, SymbolId, VarKind,
};

fn goog_host() -> TsickleHost {
    TsickleHost::new(HostOptions {
        googmodule: true,
        transform_types_to_closure: true,
        ..HostOptions::default()
    })
}

fn run(program: &InMemoryProgram, host: &TsickleHost) -> (IndexMap<String, String>, EmitResult) {
    let mut written = IndexMap::new();
    let result = emit(
        program,
        host,
        &mut |name: &str, text: &str| {
            written.insert(name.to_string(), text.to_string());
        },
        EmitOptions::default(),
    );
    (written, result)
}

fn import(b: &mut ProgramBuilder, name: &str, alias: SymbolId, specifier: &str) -> Statement {
    let binding = b.ident_for(name, alias);
    b.stmt(StatementKind::Import(ImportDeclaration {
        clause: Some(ImportClause {
            default: None,
            bindings: Some(NamedImportBindings::Named(vec![ImportSpecifier {
                property_name: None,
                name: binding,
                is_type_only: false,
            }])),
        }),
        module_specifier: StringLiteral::new(specifier),
        is_type_only: false,
    }))
}

fn exported_const(b: &mut ProgramBuilder, name: &str, initializer: Expression) -> Statement {
    let number = b.number();
    let ident = b.ident(name);
    b.bind_type(ident.id, number);
    b.stmt(StatementKind::Variable(VariableStatement {
        modifiers: ModifierFlags::EXPORT,
        kind: VarKind::Const,
        declarations: vec![VariableDeclaration {
            name: ident,
            type_annotation: None,
            initializer: Some(initializer),
        }],
    }))
}

/// `src/b.ts` exports `b`; `src/a.ts` imports it and re-exports a copy.
fn two_module_program() -> InMemoryProgram {
    let mut b = ProgramBuilder::new(CompilerOptions {
        import_helpers: false,
        ..CompilerOptions::default()
    });
    let module_b = b.module("src/b.ts");
    let target = b.declare(module_b, "b", SymbolFlags::VARIABLE);
    let alias = b.alias("src/a.ts", "b", target);
    b.mark_value_alias(alias);
    b.module("src/a.ts");

    let one = b.num("1");
    let b_decl = exported_const(&mut b, "b", one);
    b.add_file("src/b.ts", vec![b_decl]);

    let imported = import(&mut b, "b", alias, "./b");
    let reference = b.ident_ref("b", alias);
    let a_decl = exported_const(&mut b, "a", reference);
    b.add_file("src/a.ts", vec![imported, a_decl]);
    b.build()
}

#[test]
fn files_become_goog_modules_with_requires() {
    let program = two_module_program();
    let (written, result) = run(&program, &goog_host());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let a = &written["src/a.js"];
    assert!(a.starts_with("/**\n * @fileoverview added by tsickle\n"), "{a}");
    assert!(
        a.contains("goog.module('src.a');\nvar module = module || { id: 'src/a.ts' };\n"),
        "{a}"
    );
    assert!(a.contains("const b_1 = goog.require('src.b');\n"), "{a}");
    assert!(!a.contains("\"use strict\""), "{a}");
    assert!(!a.contains("__esModule"), "{a}");

    let b = &written["src/b.js"];
    let header = b.find("goog.module('src.b');").unwrap_or_else(|| panic!("{b}"));
    let annotation = b.find("/** @type {number} */").unwrap_or_else(|| panic!("{b}"));
    assert!(header < annotation, "the module header comes first: {b}");
}

#[test]
fn manifest_records_modules_and_references() {
    let program = two_module_program();
    let (_, result) = run(&program, &goog_host());
    let manifest = &result.modules_manifest;

    assert_eq!(manifest.file_name_from_module_name("src.a"), Some("src/a.ts"));
    assert_eq!(manifest.file_name_from_module_name("src.b"), Some("src/b.ts"));
    assert_eq!(manifest.referenced_modules("src/a.ts"), vec!["src.b"]);
    assert!(manifest.referenced_modules("src/b.ts").is_empty());
    assert_eq!(manifest.module_names().collect::<Vec<_>>(), vec!["src.b", "src.a"]);
}

#[test]
fn type_only_imports_become_require_type() {
    let mut b = ProgramBuilder::new(CompilerOptions {
        import_helpers: false,
        ..CompilerOptions::default()
    });
    let module_c = b.module("src/c.ts");
    let shape = b.declare(module_c, "Shape", SymbolFlags::INTERFACE);
    let alias = b.alias("src/a.ts", "Shape", shape);
    b.module("src/a.ts");
    let imported = import(&mut b, "Shape", alias, "./c");
    b.add_file("src/a.ts", vec![imported]);
    let program = b.build();

    let (written, result) = run(&program, &goog_host());
    let a = &written["src/a.js"];
    assert!(a.contains("const tsickle_c_1 = goog.requireType(\"src.c\");\n"), "{a}");
    assert!(!a.contains("goog.require('src.c')"), "{a}");
    assert_eq!(result.modules_manifest.referenced_modules("src/a.ts"), vec!["src.c"]);
}

#[test]
fn host_module_naming_is_used_for_headers_and_requires() {
    let program = two_module_program();
    let host = goog_host().with_path_to_module_name(|context, import| {
        let resolved = tsickle_emitter::host::default_path_to_module_name(context, import);
        format!("app.{resolved}")
    });
    let (written, result) = run(&program, &host);

    let a = &written["src/a.js"];
    assert!(a.contains("goog.module('app.src.a');"), "{a}");
    assert!(a.contains("goog.require('app.src.b')"), "{a}");
    assert_eq!(result.modules_manifest.file_name_from_module_name("app.src.b"), Some("src/b.ts"));
}
