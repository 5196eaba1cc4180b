use super::*;
use tsickle_program::{Program, ProgramBuilder};

fn enum_decl(
    b: &mut ProgramBuilder,
    name: &str,
    members: Vec<(PropertyName, Option<Expression>)>,
    modifiers: ModifierFlags,
) -> EnumDeclaration {
    let name = b.ident(name);
    let members = members
        .into_iter()
        .map(|(name, initializer)| tsickle_program::ast::EnumMember {
            id: b.node(),
            leading_comments: Vec::new(),
            name,
            initializer,
        })
        .collect();
    EnumDeclaration {
        modifiers,
        name,
        members,
    }
}

#[test]
fn test_member_values_auto_increment_after_numeric_initializers() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let five = b.num("5");
    let text = b.str_lit("t");
    let decl = enum_decl(
        &mut b,
        "E",
        vec![
            (PropertyName::ident("A"), None),
            (PropertyName::ident("B"), Some(five)),
            (PropertyName::ident("C"), None),
            (PropertyName::String(StringLiteral::new("d-e")), Some(text)),
        ],
        ModifierFlags::empty(),
    );
    let program = b.build();

    let values = member_values(&decl, program.checker()).unwrap();
    assert_eq!(
        values,
        vec![
            ("A".to_string(), EnumValue::Number("0".to_string())),
            ("B".to_string(), EnumValue::Number("5".to_string())),
            ("C".to_string(), EnumValue::Number("6".to_string())),
            ("d-e".to_string(), EnumValue::String("t".to_string())),
        ]
    );
}

#[test]
fn test_member_values_prefer_checker_constants() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let shifted = b.expr(ExpressionKind::Binary {
        left: Box::new(Expression::numeric("1")),
        operator: "<<".to_string(),
        right: Box::new(Expression::numeric("3")),
    });
    let decl = enum_decl(
        &mut b,
        "Flags",
        vec![(PropertyName::ident("A"), Some(shifted)), (PropertyName::ident("B"), None)],
        ModifierFlags::empty(),
    );
    b.set_constant(decl.members[0].id, ConstantValue::Number(8.0));
    let program = b.build();

    let values = member_values(&decl, program.checker()).unwrap();
    assert_eq!(values[0].1, EnumValue::Number("8".to_string()));
    assert_eq!(values[1].1, EnumValue::Number("9".to_string()));
}

#[test]
fn test_member_values_errors() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let text = b.str_lit("x");
    let after_string = enum_decl(
        &mut b,
        "S",
        vec![(PropertyName::ident("A"), Some(text)), (PropertyName::ident("B"), None)],
        ModifierFlags::empty(),
    );
    let computed = enum_decl(
        &mut b,
        "K",
        vec![(PropertyName::Computed(Box::new(Expression::ident("key"))), None)],
        ModifierFlags::empty(),
    );
    let program = b.build();

    assert!(matches!(
        member_values(&after_string, program.checker()),
        Err(TransformError::Unsupported { .. })
    ));
    assert_eq!(
        member_values(&computed, program.checker()),
        Err(TransformError::ComputedEnumMember {
            enum_name: "K".to_string()
        })
    );
}

#[test]
fn test_const_enum_policy() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let const_enum = enum_decl(&mut b, "C", Vec::new(), ModifierFlags::CONST);
    let plain = enum_decl(&mut b, "P", Vec::new(), ModifierFlags::empty());

    let inline = ConstEnumPolicy::from_options(&CompilerOptions::default());
    assert_eq!(inline, ConstEnumPolicy::Inline);
    assert!(!inline.emits(&const_enum));
    assert!(inline.emits(&plain));

    let preserve = ConstEnumPolicy::from_options(&CompilerOptions::default().with_preserve_const_enums(true));
    assert!(preserve.keeps_declarations());
    assert!(preserve.emits(&const_enum));
}

#[test]
fn test_const_enum_references_are_inlined() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let module = b.module("src/e.ts");
    let const_enum = b.declare(module, "C", SymbolFlags::ENUM | SymbolFlags::CONST_ENUM);
    let const_member = b.member(const_enum, "A", SymbolFlags::ENUM_MEMBER);
    let plain_enum = b.declare(module, "P", SymbolFlags::ENUM);
    let plain_member = b.member(plain_enum, "A", SymbolFlags::ENUM_MEMBER);

    let access = |b: &mut ProgramBuilder, owner: &str, owner_sym: SymbolId, member: SymbolId| {
        let object = b.ident_ref(owner, owner_sym);
        let expr = b.expr(ExpressionKind::PropertyAccess {
            expression: Box::new(object),
            name: "A".to_string(),
        });
        b.bind_symbol(expr.id, member);
        b.set_constant(expr.id, ConstantValue::Number(0.0));
        Statement::expression(expr)
    };
    let inlined = access(&mut b, "C", const_enum, const_member);
    let kept = access(&mut b, "P", plain_enum, plain_member);
    b.add_file("src/a.ts", vec![inlined, kept]);
    let program = b.build();

    let mut file = program.source_files()[0].clone();
    assert_eq!(inline_const_enum_references(&mut file, program.checker()), 1);
    let StatementKind::Expression(first) = &file.statements[0].kind else {
        panic!("expected an expression statement");
    };
    assert_eq!(
        first.kind,
        ExpressionKind::InlinedConstant {
            value: ConstantValue::Number(0.0),
            comment: "C.A".to_string(),
        }
    );
    let StatementKind::Expression(second) = &file.statements[1].kind else {
        panic!("expected an expression statement");
    };
    assert!(matches!(second.kind, ExpressionKind::PropertyAccess { .. }));
}

#[test]
fn test_closure_enum_has_type_and_reverse_mappings() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let decl = enum_decl(
        &mut b,
        "E",
        vec![(PropertyName::ident("A"), None), (PropertyName::ident("B"), None)],
        ModifierFlags::EXPORT,
    );
    let values = vec![
        ("A".to_string(), EnumValue::Number("0".to_string())),
        ("B".to_string(), EnumValue::Number("1".to_string())),
    ];
    let mut diagnostics = FileDiagnostics::new("src/e.ts");
    let statements = closure_enum(&decl, &values, Vec::new(), true, &mut diagnostics, Span::dummy());

    assert_eq!(statements.len(), 3);
    assert!(diagnostics.is_empty());
    let comment = &statements[0].leading_comments[0];
    assert!(comment.text.contains("@enum {number}"), "{}", comment.text);
    assert!(statements[0].modifiers().is_exported());
    let StatementKind::Expression(reverse) = &statements[1].kind else {
        panic!("expected the reverse mapping");
    };
    assert!(matches!(reverse.kind, ExpressionKind::Binary { ref operator, .. } if operator == "="));

    let strings = vec![("X".to_string(), EnumValue::String("x".to_string()))];
    let statements = closure_enum(&decl, &strings, Vec::new(), false, &mut diagnostics, Span::dummy());
    assert_eq!(statements.len(), 1, "string members have no reverse mapping");
    assert!(statements[0].leading_comments[0].text.contains("@enum {string}"));
}

#[test]
fn test_member_access_quotes_non_identifiers() {
    assert_eq!(member_access("E", "A").entity_name().as_deref(), Some("E.A"));
    assert!(matches!(member_access("E", "a-b").kind, ExpressionKind::ElementAccess { .. }));
}
