use super::*;
use crate::host::{HostOptions, TsickleHost};
use crate::ir_printer::IRPrinter;
use crate::lowering::lower_file;
use tsickle_common::CompilerOptions;
use tsickle_program::ast::{
    ExportAssignment, Expression, ExpressionKind, ImportClause, ImportDeclaration, ImportSpecifier, ModifierFlags,
    NamedImportBindings, StringLiteral, VariableDeclaration, VariableStatement,
};
use tsickle_program::{Program, ProgramBuilder, StatementKind, SymbolFlags, VarKind};

fn goog_host() -> TsickleHost {
    TsickleHost::new(HostOptions {
        googmodule: true,
        ..HostOptions::default()
    })
}

fn convert(program: &dyn Program, host: &TsickleHost) -> (String, ModulesManifest, Vec<u32>) {
    let file = program.source_files()[0].clone();
    let mut ctx = FileContext::new(&file, program.checker(), host, program.compiler_options());
    let mut js = lower_file(&file, &mut ctx).unwrap();
    let mut manifest = ModulesManifest::new();
    GoogModuleConversion::new(&mut ctx).run(&mut js, &mut manifest);
    let warnings = ctx.diagnostics.iter().map(|d| d.code).collect();
    (IRPrinter::print_file(&js), manifest, warnings)
}

#[test]
fn requires_become_goog_require_with_module_header() {
    let mut b = ProgramBuilder::new(CompilerOptions {
        import_helpers: false,
        ..CompilerOptions::default()
    });
    let module_b = b.module("src/b.ts");
    let target = b.declare(module_b, "b", SymbolFlags::VARIABLE);
    let alias = b.alias("src/a.ts", "b", target);
    b.mark_value_alias(alias);
    b.module("src/a.ts");

    let binding = b.ident_for("b", alias);
    let import = b.stmt(StatementKind::Import(ImportDeclaration {
        clause: Some(ImportClause {
            default: None,
            bindings: Some(NamedImportBindings::Named(vec![ImportSpecifier {
                property_name: None,
                name: binding,
                is_type_only: false,
            }])),
        }),
        module_specifier: StringLiteral::new("./b"),
        is_type_only: false,
    }));
    let x = b.ident("x");
    let reference = b.ident_ref("b", alias);
    let export = b.stmt(StatementKind::Variable(VariableStatement {
        modifiers: ModifierFlags::EXPORT,
        kind: VarKind::Const,
        declarations: vec![VariableDeclaration {
            name: x,
            type_annotation: None,
            initializer: Some(reference),
        }],
    }));
    b.add_file("src/a.ts", vec![import, export]);
    let program = b.build();

    let (out, manifest, warnings) = convert(&program, &goog_host());
    assert_eq!(
        out,
        "goog.module('src.a');\n\
         var module = module || { id: 'src/a.ts' };\n\
         const b_1 = goog.require('src.b');\n\
         exports.x = b_1.b;\n"
    );
    assert!(warnings.is_empty());
    assert_eq!(manifest.file_name_from_module_name("src.a"), Some("src/a.ts"));
    assert_eq!(manifest.referenced_modules("src/a.ts"), vec!["src.b"]);
}

#[test]
fn import_helpers_add_bare_tslib_require() {
    let mut b = ProgramBuilder::new(CompilerOptions {
        import_helpers: true,
        ..CompilerOptions::default()
    });
    let stmt = b.stmt(StatementKind::Expression(Expression::call(
        Expression::ident("console.log"),
        vec![],
    )));
    b.add_file("lib/c.ts", vec![stmt]);
    let program = b.build();

    let (out, manifest, _) = convert(&program, &goog_host());
    assert_eq!(
        out,
        "goog.module('lib.c');\n\
         var module = module || { id: 'lib/c.ts' };\n\
         goog.require('tslib');\n\
         console.log();\n"
    );
    assert_eq!(manifest.referenced_modules("lib/c.ts"), vec!["tslib"]);
}

#[test]
fn export_equals_is_rewritten_with_a_warning() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let value = b.expr(ExpressionKind::Identifier("Foo".to_string()));
    let stmt = b.stmt(StatementKind::ExportAssignment(ExportAssignment {
        is_export_equals: true,
        expression: value,
    }));
    b.add_file("lib/e.ts", vec![stmt]);
    let program = b.build();

    let (out, _, warnings) = convert(&program, &goog_host());
    assert!(out.contains("\nexports = Foo;\n"), "{out}");
    assert_eq!(warnings, vec![diagnostic_codes::UNSUPPORTED_EXPORT_ASSIGNMENT]);
}
