use super::*;

#[test]
fn test_emit_literals() {
    assert_eq!(IRPrinter::emit_to_string(&IRNode::number("42")), "42");
    assert_eq!(
        IRPrinter::emit_to_string(&IRNode::string("hello")),
        "\"hello\""
    );
    assert_eq!(
        IRPrinter::emit_to_string(&IRNode::single_quoted("it's")),
        "'it\\'s'"
    );
    assert_eq!(IRPrinter::emit_to_string(&IRNode::NullLiteral), "null");
    assert_eq!(IRPrinter::emit_to_string(&IRNode::Undefined), "void 0");
}

#[test]
fn test_emit_var_decl() {
    let stmt = IRNode::var_decl(VarKeyword::Const, "x", Some(IRNode::number("1")));
    assert_eq!(IRPrinter::emit_to_string(&stmt), "const x = 1;");

    let bare = IRNode::var_decl(VarKeyword::Let, "y", None);
    assert_eq!(IRPrinter::emit_to_string(&bare), "let y;");
}

#[test]
fn test_emit_call_and_property_access() {
    let call = IRNode::call(
        IRNode::dotted("goog.require"),
        vec![IRNode::single_quoted("a.b")],
    );
    assert_eq!(IRPrinter::emit_to_string(&call), "goog.require('a.b')");

    let chained = IRNode::prop(IRNode::prop(IRNode::id("a"), "b"), "c");
    assert_eq!(IRPrinter::emit_to_string(&chained), "a.b.c");
}

#[test]
fn test_emit_jsdoc_cast_and_commented_expr() {
    let cast = IRNode::JsDocCast {
        closure_type: "string".to_string(),
        expression: Box::new(IRNode::id("x")),
    };
    assert_eq!(IRPrinter::emit_to_string(&cast), "/** @type {string} */ (x)");

    let inlined = IRNode::CommentedExpr {
        expression: Box::new(IRNode::number("0")),
        comment: "Foo.Bar".to_string(),
    };
    assert_eq!(IRPrinter::emit_to_string(&inlined), "0 /* Foo.Bar */");
}

#[test]
fn test_emit_function_bodies() {
    let empty = IRNode::func_decl("X", vec![], vec![]);
    assert_eq!(IRPrinter::emit_to_string(&empty), "function X() { }");

    let single_line = IRNode::FunctionDecl {
        name: "f".to_string(),
        parameters: vec![],
        body: vec![IRNode::ret(Some(IRNode::id("f")))],
        multi_line: false,
        is_async: false,
        is_generator: false,
    };
    assert_eq!(
        IRPrinter::emit_to_string(&single_line),
        "function f() { return f; }"
    );

    let multi_line = IRNode::func_decl(
        "g",
        vec![IRParam::new("a"), IRParam::rest("b")],
        vec![IRNode::ret(Some(IRNode::id("a")))],
    );
    assert_eq!(
        IRPrinter::emit_to_string(&multi_line),
        "function g(a, ...b) {\n    return a;\n}"
    );
}

#[test]
fn test_emit_object_literals() {
    let inline = IRNode::object(
        vec![IRProperty::init("value", IRNode::BooleanLiteral(true))],
        false,
    );
    assert_eq!(IRPrinter::emit_to_string(&inline), "{ value: true }");

    let multi = IRNode::object(
        vec![
            IRProperty::init("A", IRNode::number("0")),
            IRProperty::init("B", IRNode::number("1")),
        ],
        true,
    );
    assert_eq!(
        IRPrinter::emit_to_string(&multi),
        "{\n    A: 0,\n    B: 1\n}"
    );
}

#[test]
fn test_emit_enum_iife() {
    let node = IRNode::EnumIIFE {
        name: "E".to_string(),
        members: vec![
            EnumMember {
                name: "A".to_string(),
                value: EnumMemberValue::Numeric("0".to_string()),
            },
            EnumMember {
                name: "B".to_string(),
                value: EnumMemberValue::String("b".to_string()),
            },
        ],
        declare: Some(VarKeyword::Var),
        export_target: Some("exports.E".to_string()),
    };
    assert_eq!(
        IRPrinter::emit_to_string(&node),
        "var E;\n(function (E) {\n    E[E[\"A\"] = 0] = \"A\";\n    E[\"B\"] = \"b\";\n})(E || (exports.E = E = {}));"
    );
}

#[test]
fn test_emit_es5_class_iife() {
    let node = IRNode::ES5ClassIIFE {
        name: "Sub".to_string(),
        base_class: Some(Box::new(IRNode::id("Base"))),
        body: vec![
            IRNode::ExtendsHelper {
                helper: "tslib_1.__extends".to_string(),
                class_name: "Sub".to_string(),
            },
            IRNode::func_decl("Sub", vec![], vec![]),
        ],
    };
    assert_eq!(
        IRPrinter::emit_to_string(&node),
        "var Sub = /** @class */ (function (_super) {\n    tslib_1.__extends(Sub, _super);\n    function Sub() { }\n    return Sub;\n}(Base));"
    );
}

#[test]
fn test_emit_class_with_members() {
    let node = IRNode::ClassDecl {
        name: Some("C".to_string()),
        extends: None,
        members: vec![IRClassMember {
            comments: vec!["/**\n * @return {number}\n */".to_string()],
            kind: IRClassMemberKind::Method {
                name: IRMethodName::Identifier("m".to_string()),
                is_static: true,
                is_async: false,
                is_generator: false,
                parameters: vec![],
                body: vec![IRNode::ret(Some(IRNode::number("1")))],
                multi_line: true,
            },
        }],
    };
    assert_eq!(
        IRPrinter::emit_to_string(&node),
        "class C {\n    /**\n     * @return {number}\n     */\n    static m() {\n        return 1;\n    }\n}"
    );
}

#[test]
fn test_emit_module_statements() {
    let import = IRNode::ImportDecl {
        default: None,
        namespace: None,
        named: vec![IRImportSpecifier {
            imported: "a".to_string(),
            local: "b".to_string(),
        }],
        module_spec: IRModuleSpec::new("./m", true),
    };
    assert_eq!(
        IRPrinter::emit_to_string(&import),
        "import { a as b } from './m';"
    );

    let export = IRNode::ExportDecl {
        specifiers: vec![IRExportSpecifier::same("Foo")],
        module_spec: Some(IRModuleSpec::new("./a", true)),
    };
    assert_eq!(
        IRPrinter::emit_to_string(&export),
        "export { Foo } from './a';"
    );

    let init = IRNode::ExportInit {
        names: vec!["a".to_string(), "b".to_string()],
    };
    assert_eq!(
        IRPrinter::emit_to_string(&init),
        "exports.a = exports.b = void 0;"
    );

    let require = IRNode::RequireStatement {
        keyword: VarKeyword::Const,
        var_name: Some("m_1".to_string()),
        module_spec: IRModuleSpec::new("./m", false),
    };
    assert_eq!(
        IRPrinter::emit_to_string(&require),
        "const m_1 = require(\"./m\");"
    );
}

#[test]
fn test_emit_if_false_block() {
    let node = IRNode::IfStatement {
        condition: Box::new(IRNode::BooleanLiteral(false)),
        then_branch: Box::new(IRNode::block(vec![
            IRNode::comment("/** @type {string} */"),
            IRNode::expr_stmt(IRNode::dotted("X.prototype.x")),
        ])),
        else_branch: None,
    };
    assert_eq!(
        IRPrinter::emit_to_string(&node),
        "if (false) {\n    /** @type {string} */\n    X.prototype.x;\n}"
    );
}
