use super::*;

#[test]
fn test_dotted_builds_property_chain() {
    let node = IRNode::dotted("goog.module.declareLegacyNamespace");
    assert_eq!(
        node.entity_name().as_deref(),
        Some("goog.module.declareLegacyNamespace")
    );
    match node {
        IRNode::PropertyAccess { property, .. } => assert_eq!(property, "declareLegacyNamespace"),
        other => panic!("expected property access, got {other:?}"),
    }
}

#[test]
fn test_entity_name_of_non_entity() {
    assert_eq!(IRNode::number("1").entity_name(), None);
    let call = IRNode::call(IRNode::id("f"), vec![]);
    assert_eq!(IRNode::prop(call, "x").entity_name(), None);
}

#[test]
fn test_is_call_to() {
    let call = IRNode::call(IRNode::id("require"), vec![IRNode::string("./a")]);
    assert!(call.is_call_to("require"));
    assert!(!call.is_call_to("goog.require"));

    let goog = IRNode::call(IRNode::dotted("goog.require"), vec![]);
    assert!(goog.is_call_to("goog.require"));
}

#[test]
fn test_func_decl_multi_line_follows_body() {
    match IRNode::func_decl("f", vec![], vec![]) {
        IRNode::FunctionDecl { multi_line, .. } => assert!(!multi_line),
        other => panic!("unexpected {other:?}"),
    }
    match IRNode::func_decl("f", vec![], vec![IRNode::ret(None)]) {
        IRNode::FunctionDecl { multi_line, .. } => assert!(multi_line),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_walk_mut_rewrites_nested_identifiers() {
    let mut node = IRNode::expr_stmt(IRNode::call(
        IRNode::id("require"),
        vec![IRNode::func_expr(
            None,
            vec![IRParam::new("a").with_default(IRNode::id("require"))],
            vec![IRNode::ret(Some(IRNode::id("require")))],
        )],
    ));

    let mut visited = 0;
    walk_mut(&mut node, &mut |n| {
        if let IRNode::Identifier(name) = n
            && name == "require"
        {
            *name = "load".to_string();
            visited += 1;
        }
    });

    assert_eq!(visited, 3);
    let mut remaining = 0;
    walk_mut(&mut node, &mut |n| {
        if matches!(n, IRNode::Identifier(name) if name == "require") {
            remaining += 1;
        }
    });
    assert_eq!(remaining, 0);
}

#[test]
fn test_walk_mut_enters_class_members_and_enums() {
    let mut node = IRNode::block(vec![
        IRNode::ClassDecl {
            name: Some("C".to_string()),
            extends: Some(Box::new(IRNode::id("x"))),
            members: vec![IRClassMember {
                comments: Vec::new(),
                kind: IRClassMemberKind::Method {
                    name: IRMethodName::Identifier("m".to_string()),
                    is_static: false,
                    is_async: false,
                    is_generator: false,
                    parameters: vec![],
                    body: vec![IRNode::expr_stmt(IRNode::id("x"))],
                    multi_line: true,
                },
            }],
        },
        IRNode::EnumIIFE {
            name: "E".to_string(),
            members: vec![EnumMember {
                name: "A".to_string(),
                value: EnumMemberValue::Computed(Box::new(IRNode::id("x"))),
            }],
            declare: Some(VarKeyword::Var),
            export_target: None,
        },
    ]);

    let mut count = 0;
    walk_mut(&mut node, &mut |n| {
        if matches!(n, IRNode::Identifier(name) if name == "x") {
            count += 1;
        }
    });
    assert_eq!(count, 3);
}

#[test]
fn test_export_specifier_same() {
    let spec = IRExportSpecifier::same("x");
    assert_eq!(spec.local, "x");
    assert_eq!(spec.exported, "x");
}
