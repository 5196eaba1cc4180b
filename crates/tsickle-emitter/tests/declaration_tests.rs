//! Declaration file output through `emit`.

use indexmap::IndexMap;
use tsickle_common::CompilerOptions;
use tsickle_emitter::{EmitOptions, HostOptions, TsickleHost, emit};
use tsickle_program::ast::{
    ExportClause, ExportDeclaration, ModifierFlags, StringLiteral, VariableDeclaration, VariableStatement,
};
use tsickle_program::{InMemoryProgram, ProgramBuilder, Statement, StatementKind, SymbolFlags, VarKind};

fn run(program: &InMemoryProgram, host: &TsickleHost) -> IndexMap<String, String> {
    let mut written = IndexMap::new();
    emit(
        program,
        host,
        &mut |name: &str, text: &str| {
            written.insert(name.to_string(), text.to_string());
        },
        EmitOptions::default(),
    );
    written
}

fn closure_host() -> TsickleHost {
    TsickleHost::new(HostOptions {
        transform_types_to_closure: true,
        ..HostOptions::default()
    })
}

fn exported_one(b: &mut ProgramBuilder, name: &str) -> Statement {
    let ident = b.ident(name);
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

/// `src/index.ts`: `export * from './b';` where `./b` has a function and an interface.
fn star_program(options: CompilerOptions) -> InMemoryProgram {
    let mut b = ProgramBuilder::new(options);
    let module_b = b.module("src/b.ts");
    b.declare(module_b, "value", SymbolFlags::FUNCTION);
    b.declare(module_b, "Shape", SymbolFlags::INTERFACE);
    b.module("src/index.ts");
    let star = b.stmt(StatementKind::Export(ExportDeclaration {
        clause: ExportClause::Star,
        module_specifier: Some(StringLiteral::new("./b")),
        is_type_only: false,
    }));
    b.add_file("src/index.ts", vec![star]);
    b.build()
}

#[test]
fn declaration_files_list_the_expanded_star_names() {
    let program = star_program(CompilerOptions::default().with_declaration(true));
    let written = run(&program, &closure_host());

    assert_eq!(written["src/index.d.ts"], "export { value, Shape } from './b';\n");
    let js = &written["src/index.js"];
    assert!(js.contains("@typedef"), "{js}");
    assert!(js.contains("exports.Shape;\n"), "{js}");
}

#[test]
fn unannotated_emit_keeps_the_wildcard() {
    let program = star_program(CompilerOptions::default().with_declaration(true));
    let written = run(&program, &TsickleHost::default());
    assert_eq!(written["src/index.d.ts"], "export * from './b';\n");
}

#[test]
fn no_declaration_files_unless_requested() {
    let program = star_program(CompilerOptions::default());
    let written = run(&program, &closure_host());
    assert_eq!(written.keys().collect::<Vec<_>>(), vec!["src/index.js"]);
}

#[test]
fn outputs_follow_root_and_out_dir() {
    let options = CompilerOptions::default()
        .with_declaration(true)
        .with_root_dir("src")
        .with_out_dir("dist");
    let mut b = ProgramBuilder::new(options);
    let x = exported_one(&mut b, "x");
    b.add_file("src/lib/a.ts", vec![x]);
    let program = b.build();

    let written = run(&program, &TsickleHost::default());
    assert_eq!(
        written.keys().collect::<Vec<_>>(),
        vec!["dist/lib/a.js", "dist/lib/a.d.ts"]
    );
    assert_eq!(written["dist/lib/a.d.ts"], "export declare const x = 1;\n");
}
