//! End-to-end emit of small programs through the public API.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use tsickle_common::diagnostics::diagnostic_codes;
use tsickle_common::{CompilerOptions, ModuleKind};
use tsickle_emitter::{EmitOptions, EmitResult, HostOptions, TsickleHost, emit};
use tsickle_program::ast::{
    ClassDeclaration, ClassMember, ClassMemberKind, Comment, Identifier, InterfaceDeclaration, ModifierFlags,
    ModuleDeclaration, ModuleName, PropertyDeclaration, PropertyName, VariableDeclaration, VariableStatement,
};
use tsickle_program::TypeId;
use tsickle_program::{InMemoryProgram, ProgramBuilder, Statement, StatementKind, VarKind};

// =============================================================================
// Helpers
// =============================================================================

fn typed_const(b: &mut ProgramBuilder, name: &str, modifiers: ModifierFlags) -> Statement {
    let number = b.number();
    let ident = b.ident(name);
    b.bind_type(ident.id, number);
    let one = b.num("1");
    b.stmt(StatementKind::Variable(VariableStatement {
        modifiers,
        kind: VarKind::Const,
        declarations: vec![VariableDeclaration {
            name: ident,
            type_annotation: None,
            initializer: Some(one),
        }],
    }))
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

fn typed_property(
    b: &mut ProgramBuilder,
    name: &str,
    modifiers: ModifierFlags,
    ty: TypeId,
    initializer: Option<&str>,
) -> ClassMember {
    let id = b.node();
    b.bind_type(id, ty);
    let initializer = initializer.map(|text| b.num(text));
    ClassMember::new(
        id,
        modifiers,
        ClassMemberKind::Property(PropertyDeclaration {
            name: PropertyName::ident(name),
            optional: false,
            type_annotation: None,
            initializer,
        }),
    )
}

fn closure_host() -> TsickleHost {
    TsickleHost::new(HostOptions {
        transform_types_to_closure: true,
        ..HostOptions::default()
    })
}

// =============================================================================
// Output shapes
// =============================================================================

#[test]
fn commonjs_output_is_annotated_and_has_a_file_overview() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let x = typed_const(&mut b, "x", ModifierFlags::EXPORT);
    b.add_file("src/a.ts", vec![x]);
    let program = b.build();

    let (written, result) = run(&program, &closure_host());
    assert!(!result.emit_skipped);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let js = &written["src/a.js"];
    assert!(
        js.starts_with("/**\n * @fileoverview added by tsickle\n * Generated from: src/a.ts\n"),
        "{js}"
    );
    assert!(js.contains("\"use strict\";\n"), "{js}");
    assert!(js.contains("/** @type {number} */\nexports.x = 1;\n"), "{js}");
}

#[test]
fn plain_emit_leaves_output_unannotated() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let x = typed_const(&mut b, "x", ModifierFlags::EXPORT);
    b.add_file("src/a.ts", vec![x]);
    let program = b.build();

    let (written, _) = run(&program, &TsickleHost::default());
    let js = &written["src/a.js"];
    assert!(js.starts_with("\"use strict\";\n"), "{js}");
    assert!(!js.contains("@type"), "{js}");
    assert!(!js.contains("@fileoverview"), "{js}");
}

#[test]
fn es_module_output_keeps_export_keywords() {
    let options = CompilerOptions::default().with_module(ModuleKind::ES2015);
    let mut b = ProgramBuilder::new(options);
    let x = typed_const(&mut b, "x", ModifierFlags::EXPORT);
    b.add_file("src/a.ts", vec![x]);
    let program = b.build();

    let (written, _) = run(&program, &closure_host());
    let js = &written["src/a.js"];
    assert!(js.contains("/** @type {number} */\nexport const x = 1;\n"), "{js}");
    assert!(!js.contains("exports."), "{js}");
}

#[test]
fn interfaces_become_records_with_guarded_stubs() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let number = b.number();
    let member_id = b.node();
    b.bind_type(member_id, number);
    let name = b.ident("Point");
    let iface = b.stmt(StatementKind::Interface(InterfaceDeclaration {
        modifiers: ModifierFlags::EXPORT,
        name,
        type_parameters: Vec::new(),
        extends: Vec::new(),
        members: vec![tsickle_program::ast::InterfaceMember {
            id: member_id,
            span: tsickle_common::Span::dummy(),
            leading_comments: Vec::new(),
            kind: tsickle_program::ast::InterfaceMemberKind::Property {
                name: tsickle_program::ast::PropertyName::ident("x"),
                optional: false,
                readonly: false,
                type_annotation: None,
            },
        }],
    }));
    b.add_file("src/point.ts", vec![iface]);
    let program = b.build();

    let (written, _) = run(&program, &closure_host());
    let js = &written["src/point.js"];
    assert!(js.contains("@record"), "{js}");
    assert!(js.contains("function Point() { }"), "{js}");
    assert!(js.contains("exports.Point = Point;"), "{js}");
    assert!(js.contains("/* istanbul ignore if */"), "{js}");
    assert!(js.contains("Point.prototype.x;"), "{js}");
}

#[test]
fn user_comments_survive_annotation() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let x = typed_const(&mut b, "x", ModifierFlags::empty()).with_comment(Comment::block("* The answer. "));
    b.add_file("src/a.ts", vec![x]);
    let program = b.build();

    let (written, _) = run(&program, &closure_host());
    let js = &written["src/a.js"];
    assert!(
        js.contains("/**\n * The answer.\n * @type {number}\n */\nconst x = 1;\n"),
        "{js}"
    );
}

// =============================================================================
// Diagnostics
// =============================================================================

fn namespace_program() -> InMemoryProgram {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let ns = b.stmt(StatementKind::Module(ModuleDeclaration {
        modifiers: ModifierFlags::empty(),
        name: ModuleName::Identifier(Identifier::synthetic("ns")),
        body: Some(Vec::new()),
    }));
    b.add_file("src/ns.ts", vec![ns]);
    let x = typed_const(&mut b, "x", ModifierFlags::EXPORT);
    b.add_file("src/ok.ts", vec![x]);
    b.build()
}

#[test]
fn warnings_reach_the_host_sink_and_the_result() {
    let program = namespace_program();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let host = closure_host().with_log_warning(move |d| sink.borrow_mut().push((d.file.clone(), d.code)));

    let (written, result) = run(&program, &host);
    assert_eq!(written.len(), 2, "warnings do not stop the file");
    assert_eq!(
        *seen.borrow(),
        vec![("src/ns.ts".to_string(), diagnostic_codes::PLAIN_NAMESPACE_UNSUPPORTED)]
    );
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn suppressed_paths_neither_log_nor_collect() {
    let program = namespace_program();
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    let host = closure_host()
        .with_log_warning(move |_| *sink.borrow_mut() += 1)
        .with_warning_filter(|path| path.ends_with("ns.ts"));

    let (_, result) = run(&program, &host);
    assert_eq!(*seen.borrow(), 0);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

// =============================================================================
// Class members
// =============================================================================

#[test]
fn static_initializers_run_once_and_members_are_stubbed_in_the_guard() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let (number, string) = (b.number(), b.string());
    let members = vec![
        typed_property(&mut b, "p", ModifierFlags::empty(), string, None),
        typed_property(&mut b, "q", ModifierFlags::PRIVATE, number, None),
        typed_property(&mut b, "s", ModifierFlags::STATIC, number, Some("3")),
    ];
    let name = b.ident("X");
    let class = b.stmt(StatementKind::Class(ClassDeclaration {
        modifiers: ModifierFlags::empty(),
        decorators: Vec::new(),
        name: Some(name),
        type_parameters: Vec::new(),
        extends: None,
        implements: Vec::new(),
        members,
    }));
    b.add_file("src/static.ts", vec![class]);
    let program = b.build();

    let (written, result) = run(&program, &closure_host());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let js = &written["src/static.js"];

    assert_eq!(js.matches("X.s = 3;").count(), 1, "{js}");
    let initializer = js.find("X.s = 3;").unwrap();
    let guard = js.find("if (false) {").unwrap_or_else(|| panic!("no stub guard in {js}"));
    assert!(initializer < guard, "{js}");
    assert!(js[..guard].contains("/* istanbul ignore if */"), "{js}");

    let stubs = &js[guard..];
    assert_eq!(js.matches("X.s;").count(), 1, "{js}");
    assert!(stubs.contains("X.s;"), "{js}");
    assert!(stubs.contains("X.prototype.p;"), "{js}");
    assert!(stubs.contains("X.prototype.q;"), "{js}");
    assert!(stubs.contains("@type {string}"), "{js}");
    assert!(stubs.contains("@private"), "{js}");
    assert_eq!(stubs.matches("@public").count(), 2, "p and s are public: {js}");
}
