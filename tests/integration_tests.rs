//! Whole-program behaviour through the `tsickle` facade.

use indexmap::IndexMap;
use tsickle::program::ast::{
    ConstantValue, ExportClause, ExportDeclaration, ExpressionKind, ModifierFlags, StringLiteral,
    VariableDeclaration, VariableStatement,
};
use tsickle::program::{ObjectType, Statement, StatementKind, SymbolFlags, TypeData, TypeId, VarKind};
use tsickle::{EmitOptions, EmitResult, InMemoryProgram, ProgramBuilder, TsickleConfig, TsickleHost, emit};

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

fn config(json: &str) -> TsickleConfig {
    TsickleConfig::from_json(json).unwrap()
}

fn exported_const(b: &mut ProgramBuilder, name: &str, ty: Option<TypeId>) -> Statement {
    let ident = b.ident(name);
    if let Some(ty) = ty {
        b.bind_type(ident.id, ty);
    }
    let one = b.num("1");
    b.stmt(StatementKind::Variable(VariableStatement {
        modifiers: ModifierFlags::EXPORT,
        kind: VarKind::Const,
        declarations: vec![VariableDeclaration {
            name: ident,
            type_annotation: None,
            initializer: Some(one),
        }],
    }))
}

#[test]
fn self_referential_types_terminate_with_unknown() {
    let cfg = config(r#"{"tsickle": {"transformTypesToClosure": true}}"#);
    let mut b = ProgramBuilder::new(cfg.compiler_options.clone());
    let number = b.number();
    let f = b.reserve_type();
    let signature = ProgramBuilder::signature(vec![("n", number, false)], f);
    b.set_type(
        f,
        TypeData::Object(ObjectType {
            call_signatures: vec![signature],
            ..ObjectType::default()
        }),
    );
    let decl = exported_const(&mut b, "f", Some(f));
    b.add_file("src/f.ts", vec![decl]);
    let program = b.build();

    let (written, _) = run(&program, &cfg.host());
    let js = &written["src/f.js"];
    assert!(js.contains("/** @type {function(number): ?} */\nexports.f = 1;\n"), "{js}");
}

#[test]
fn wildcard_reexport_lists_exactly_the_exported_names() {
    let cfg = config(
        r#"{
            "compilerOptions": {"declaration": true},
            "tsickle": {"transformTypesToClosure": true}
        }"#,
    );
    let mut b = ProgramBuilder::new(cfg.compiler_options.clone());
    let module_a = b.module("src/a.ts");
    b.declare(module_a, "x", SymbolFlags::VARIABLE);
    let x = exported_const(&mut b, "x", None);
    b.add_file("src/a.ts", vec![x]);
    b.module("src/index.ts");
    let star = b.stmt(StatementKind::Export(ExportDeclaration {
        clause: ExportClause::Star,
        module_specifier: Some(StringLiteral::new("./a")),
        is_type_only: false,
    }));
    b.add_file("src/index.ts", vec![star]);
    let program = b.build();

    let (written, result) = run(&program, &cfg.host());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(
        written.keys().collect::<Vec<_>>(),
        vec!["src/a.js", "src/a.d.ts", "src/index.js", "src/index.d.ts"],
        "outputs are written in program order"
    );
    assert_eq!(written["src/index.d.ts"], "export { x } from './a';\n");
    assert_eq!(written["src/a.d.ts"], "export declare const x = 1;\n");
}

fn const_enum_program(preserve: bool) -> InMemoryProgram {
    let mut options = config("{}").compiler_options;
    options.preserve_const_enums = preserve;
    let mut b = ProgramBuilder::new(options);
    let module = b.module("src/use.ts");
    let color = b.declare(module, "Color", SymbolFlags::ENUM | SymbolFlags::CONST_ENUM);
    let red = b.member(color, "Red", SymbolFlags::ENUM_MEMBER);
    let object = b.ident_ref("Color", color);
    let access = b.expr(ExpressionKind::PropertyAccess {
        expression: Box::new(object),
        name: "Red".to_string(),
    });
    b.bind_symbol(access.id, red);
    b.set_constant(access.id, ConstantValue::Number(0.0));
    b.add_file("src/use.ts", vec![Statement::expression(access)]);
    b.build()
}

#[test]
fn const_enum_members_are_inlined_at_use_sites() {
    for preserve in [false, true] {
        let program = const_enum_program(preserve);
        let (written, _) = run(&program, &TsickleHost::default());
        let js = &written["src/use.js"];
        assert!(js.contains("0 /* Color.Red */;"), "preserve={preserve}: {js}");
    }
}

#[test]
fn config_selects_goog_module_output() {
    let cfg = config(
        r#"{
            "compilerOptions": {"module": "commonjs", "importHelpers": false},
            "tsickle": {"googmodule": true, "transformTypesToClosure": true}
        }"#,
    );
    let mut b = ProgramBuilder::new(cfg.compiler_options.clone());
    let number = b.number();
    let x = exported_const(&mut b, "x", Some(number));
    b.add_file("lib/x.ts", vec![x]);
    let program = b.build();

    let (written, result) = run(&program, &cfg.host());
    let js = &written["lib/x.js"];
    assert!(js.contains("goog.module('lib.x');\n"), "{js}");
    assert!(js.contains("/** @type {number} */\nexports.x = 1;\n"), "{js}");
    assert_eq!(result.modules_manifest.file_name_from_module_name("lib.x"), Some("lib/x.ts"));
}
