use super::*;
use crate::host::TsickleHost;
use tsickle_common::CompilerOptions;
use tsickle_program::ast::{
    ClassMember, ConstructorDeclaration, Identifier, InterfaceMember, MethodDeclaration, PropertyDeclaration,
};
use tsickle_program::{InMemoryProgram, Program, ProgramBuilder};

fn with_ctx<R>(program: &InMemoryProgram, f: impl FnOnce(&mut FileContext<'_>) -> R) -> R {
    let host = TsickleHost::default();
    let file = &program.source_files()[0];
    let mut ctx = FileContext::new(file, program.checker(), &host, program.compiler_options());
    f(&mut ctx)
}

fn property(b: &mut ProgramBuilder, name: PropertyName, optional: bool, modifiers: ModifierFlags) -> ClassMember {
    let id = b.node();
    ClassMember::new(
        id,
        modifiers,
        ClassMemberKind::Property(PropertyDeclaration {
            name,
            optional,
            type_annotation: None,
            initializer: None,
        }),
    )
}

fn class(members: Vec<ClassMember>, modifiers: ModifierFlags) -> ClassDeclaration {
    ClassDeclaration {
        modifiers,
        decorators: Vec::new(),
        name: Some(Identifier::synthetic("C")),
        type_parameters: Vec::new(),
        extends: None,
        implements: Vec::new(),
        members,
    }
}

fn tag_names(stub: &StubDeclaration) -> Vec<String> {
    stub.tags.iter().map(|t| t.tag_name.clone()).collect()
}

#[test]
fn test_class_stubs_cover_parameter_properties_fields_and_abstract_methods() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let (number, string) = (b.number(), b.string());

    let mut param = Parameter::new(b.ident("a"));
    param.modifiers = ModifierFlags::PRIVATE;
    b.bind_type(param.name.id, number);
    let ctor_id = b.node();
    let ctor = ClassMember::new(
        ctor_id,
        ModifierFlags::empty(),
        ClassMemberKind::Constructor(ConstructorDeclaration {
            parameters: vec![param, Parameter::new(b.ident("plain"))],
            body: Some(Block::empty()),
        }),
    );

    let field = property(&mut b, PropertyName::ident("b"), true, ModifierFlags::STATIC);
    b.bind_type(field.id, string);
    let untyped = property(&mut b, PropertyName::ident("untyped"), false, ModifierFlags::empty());
    let computed = property(
        &mut b,
        PropertyName::Computed(Box::new(Expression::ident("key"))),
        false,
        ModifierFlags::empty(),
    );
    b.bind_type(computed.id, string);

    let method_id = b.node();
    let method_type = b.function_type(vec![("x", number, false)], string);
    b.bind_type(method_id, method_type);
    let method = ClassMember::new(
        method_id,
        ModifierFlags::ABSTRACT | ModifierFlags::PROTECTED,
        ClassMemberKind::Method(MethodDeclaration {
            name: PropertyName::ident("m"),
            optional: false,
            type_parameters: Vec::new(),
            parameters: vec![Parameter::new(Identifier::synthetic("x"))],
            return_type: None,
            body: None,
            is_generator: false,
        }),
    );
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();
    let decl = class(vec![ctor, field, untyped, computed, method], ModifierFlags::ABSTRACT);

    let (stubs, warnings) = with_ctx(&program, |ctx| {
        let stubs = class_stubs(ctx, "C", &decl);
        (stubs, ctx.diagnostics.iter().map(|d| d.code).collect::<Vec<_>>())
    });

    let names: Vec<&str> = stubs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "m"]);
    assert_eq!(warnings, vec![diagnostic_codes::UNNAMED_STUB_MEMBER]);

    assert_eq!(stubs[0].tags[0], Tag::typed("type", "number"));
    assert_eq!(tag_names(&stubs[0]), vec!["type", "private"]);

    assert!(stubs[1].is_static);
    assert_eq!(stubs[1].tags[0], Tag::typed("type", "(string|undefined)"));

    assert_eq!(
        stubs[2].kind,
        StubKind::Method {
            parameters: vec!["x".to_string()]
        }
    );
    assert_eq!(tag_names(&stubs[2]), vec!["abstract", "protected", "param", "return"]);
    assert_eq!(stubs[2].tags[2], Tag::param("x", "number"));
    assert_eq!(stubs[2].tags[3], Tag::typed("return", "string"));
}

#[test]
fn test_interface_stubs_are_public() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let (number, string, void) = (b.number(), b.string(), b.void());
    let prop_id = b.node();
    b.bind_type(prop_id, number);
    let method_id = b.node();
    let method_type = b.function_type(vec![("s", string, true)], void);
    b.bind_type(method_id, method_type);
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();

    let iface = InterfaceDeclaration {
        modifiers: ModifierFlags::empty(),
        name: Identifier::synthetic("I"),
        type_parameters: Vec::new(),
        extends: Vec::new(),
        members: vec![
            InterfaceMember {
                id: prop_id,
                span: Span::dummy(),
                leading_comments: vec![Comment::block("* The count. ")],
                kind: InterfaceMemberKind::Property {
                    name: PropertyName::ident("count"),
                    optional: false,
                    readonly: false,
                    type_annotation: None,
                },
            },
            InterfaceMember {
                id: method_id,
                span: Span::dummy(),
                leading_comments: Vec::new(),
                kind: InterfaceMemberKind::Method {
                    name: PropertyName::ident("f"),
                    optional: false,
                    type_parameters: Vec::new(),
                    parameters: vec![Parameter::new(Identifier::synthetic("s"))],
                    return_type: None,
                },
            },
        ],
    };

    let stubs = with_ctx(&program, |ctx| interface_stubs(ctx, &iface));
    assert_eq!(stubs.len(), 2);
    assert_eq!(stubs[0].owner, "I");
    assert_eq!(tag_names(&stubs[0]), vec!["type", "public"]);
    assert_eq!(stubs[0].comments.len(), 1);
    assert_eq!(tag_names(&stubs[1]), vec!["public", "param", "return"]);
    assert_eq!(stubs[1].tags[1], Tag::param("s", "string="));
    assert_eq!(stubs[1].tags[2], Tag::typed("return", "void"));
}

#[test]
fn test_guard_block_wraps_stub_statements() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();

    let property = StubDeclaration {
        owner: "ns.C".to_string(),
        name: "p".to_string(),
        is_static: false,
        kind: StubKind::Property,
        tags: vec![Tag::typed("type", "number"), Visibility::Public.tag()],
        comments: vec![Comment::block("* Docs. "), Comment::block(" plain ")],
        span: Span::dummy(),
    };
    let method = StubDeclaration {
        owner: "C".to_string(),
        name: "create".to_string(),
        is_static: true,
        kind: StubKind::Method {
            parameters: vec!["a".to_string()],
        },
        tags: vec![Visibility::Public.tag()],
        comments: Vec::new(),
        span: Span::dummy(),
    };

    let (empty, guard) = with_ctx(&program, |ctx| (guard_block(ctx, &[]), guard_block(ctx, &[property, method])));
    assert!(empty.is_none());
    let guard = guard.unwrap();
    assert_eq!(guard.leading_comments, vec![Comment::block(" istanbul ignore if ")]);

    let StatementKind::If(if_stmt) = &guard.kind else {
        panic!("expected an if statement");
    };
    assert_eq!(if_stmt.condition.kind, ExpressionKind::Boolean(false));
    let StatementKind::Block(block) = &if_stmt.then_branch.kind else {
        panic!("expected a block");
    };
    assert_eq!(block.statements.len(), 2);

    let first = &block.statements[0];
    assert_eq!(first.leading_comments.len(), 1, "only JSDoc comments are carried over");
    assert_eq!(first.leading_comments[0].text, "*\n * Docs.\n * @type {number}\n * @public\n ");
    let StatementKind::Expression(target) = &first.kind else {
        panic!("expected an expression statement");
    };
    assert_eq!(target.entity_name().as_deref(), Some("ns.C.prototype.p"));

    let StatementKind::Expression(assign) = &block.statements[1].kind else {
        panic!("expected an expression statement");
    };
    let ExpressionKind::Binary { left, right, .. } = &assign.kind else {
        panic!("expected an assignment");
    };
    assert_eq!(left.entity_name().as_deref(), Some("C.create"));
    assert!(matches!(&right.kind, ExpressionKind::Function(f) if f.parameters.len() == 1));
}

#[test]
fn test_visibility_from_modifiers() {
    assert_eq!(Visibility::from_modifiers(ModifierFlags::PRIVATE), Visibility::Private);
    assert_eq!(
        Visibility::from_modifiers(ModifierFlags::PROTECTED | ModifierFlags::READONLY),
        Visibility::Protected
    );
    assert_eq!(Visibility::from_modifiers(ModifierFlags::empty()).tag(), Tag::new("public"));
}
