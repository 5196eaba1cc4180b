//! JavaScript IR (Intermediate Representation) produced by lowering.
//!
//! Lowering turns the (already annotated) TypeScript AST into a tree of
//! `IRNode`s; IR passes (goog.module conversion, the file overview, caller
//! supplied *after* transforms) rewrite the tree; [`IRPrinter`] turns it into
//! text.
//!
//! # IR Structure
//!
//! Each variant is a JavaScript construct. Statement variants print their own
//! terminating `;`. Comments are statements of their own ([`IRNode::Comment`])
//! placed before the node they document, so passes that move statements must
//! move the comment with them ([`JsFile::statements`] keeps them adjacent).
//!
//! [`IRPrinter`]: crate::ir_printer::IRPrinter

/// One node of emitted JavaScript.
#[derive(Debug, Clone, PartialEq)]
pub enum IRNode {
    // =========================================================================
    // Literals
    // =========================================================================
    NumericLiteral(String),

    /// String literal with its quote style: `"hello"`, `'world'`
    StringLiteral { value: String, single_quote: bool },

    BooleanLiteral(bool),

    NullLiteral,

    /// Undefined: `void 0`
    Undefined,

    /// Template literal without substitutions, raw text between backticks.
    TemplateLiteral(String),

    /// Regular expression literal, including slashes and flags.
    RegExpLiteral(String),

    // =========================================================================
    // Identifiers
    // =========================================================================
    Identifier(String),

    This,

    Super,

    // =========================================================================
    // Expressions
    // =========================================================================
    /// `left op right`; assignments use `=`.
    BinaryExpr {
        left: Box<Self>,
        operator: String,
        right: Box<Self>,
    },

    /// Unary prefix expression: `!x`, `-x`, `typeof x`
    PrefixUnaryExpr { operator: String, operand: Box<Self> },

    /// `x++`
    PostfixUnaryExpr { operand: Box<Self>, operator: String },

    CallExpr { callee: Box<Self>, arguments: Vec<Self> },

    /// `new C(args)`
    NewExpr { callee: Box<Self>, arguments: Vec<Self> },

    PropertyAccess { object: Box<Self>, property: String },

    ElementAccess { object: Box<Self>, index: Box<Self> },

    /// `a ? b : c`
    ConditionalExpr {
        condition: Box<Self>,
        when_true: Box<Self>,
        when_false: Box<Self>,
    },

    Parenthesized(Box<Self>),

    ArrayLiteral(Vec<Self>),

    /// `...expr` in calls and array literals.
    SpreadElement(Box<Self>),

    /// `{ key: value }`, printed on several lines when `multi_line`.
    ObjectLiteral {
        properties: Vec<IRProperty>,
        multi_line: bool,
    },

    /// `function name(params) { body }` in expression position.
    FunctionExpr {
        name: Option<String>,
        parameters: Vec<IRParam>,
        body: Vec<Self>,
        multi_line: bool,
        is_async: bool,
        is_generator: bool,
    },

    /// Arrow function; `body` is a [`IRNode::Block`] or an expression.
    ArrowFunction {
        parameters: Vec<IRParam>,
        body: Box<Self>,
        is_async: bool,
    },

    /// Closure cast: `/** @type {T} */ (expr)`
    JsDocCast {
        closure_type: String,
        expression: Box<Self>,
    },

    /// Expression followed by an inline block comment: `0 /* E.A */`
    CommentedExpr { expression: Box<Self>, comment: String },

    // =========================================================================
    // Statements
    // =========================================================================
    /// Variable declaration with a single declarator: `const x = value;`
    VarDecl {
        keyword: VarKeyword,
        name: String,
        initializer: Option<Box<Self>>,
    },

    ExpressionStatement(Box<Self>),

    ReturnStatement(Option<Box<Self>>),

    /// `if (cond) then else`; stub guards use a `false` condition.
    IfStatement {
        condition: Box<Self>,
        then_branch: Box<Self>,
        else_branch: Option<Box<Self>>,
    },

    Block { statements: Vec<Self>, multi_line: bool },

    /// Empty statement: `;`
    EmptyStatement,

    ThrowStatement(Box<Self>),

    // =========================================================================
    // Declarations
    // =========================================================================
    /// Hoisted `function name() {}`.
    FunctionDecl {
        name: String,
        parameters: Vec<IRParam>,
        body: Vec<Self>,
        multi_line: bool,
        is_async: bool,
        is_generator: bool,
    },

    /// ES2015 class declaration.
    ClassDecl {
        name: Option<String>,
        extends: Option<Box<Self>>,
        members: Vec<IRClassMember>,
    },

    // =========================================================================
    // ES5 Class Lowering
    // =========================================================================
    /// ES5 class: `var C = /** @class */ (function (_super) { ... }(Base));`
    ES5ClassIIFE {
        name: String,
        base_class: Option<Box<Self>>,
        body: Vec<Self>,
    },

    /// `__extends` helper call: `tslib_1.__extends(ClassName, _super);`
    ExtendsHelper { helper: String, class_name: String },

    /// `C.prototype.m = function () { ... };`
    PrototypeMethod {
        class_name: String,
        method_name: IRMethodName,
        function: Box<Self>,
    },

    /// `C.m = function () { ... };`
    StaticMethod {
        class_name: String,
        method_name: IRMethodName,
        function: Box<Self>,
    },

    // =========================================================================
    // Enum / Namespace
    // =========================================================================
    /// Enum IIFE:
    /// `var E; (function (E) { ... })(E || (E = {}));`
    EnumIIFE {
        name: String,
        members: Vec<EnumMember>,
        /// Keyword for the leading declaration; `None` when the name is
        /// already declared.
        declare: Option<VarKeyword>,
        /// Export target the object is also assigned to (`exports.E`).
        export_target: Option<String>,
    },

    /// Namespace IIFE:
    /// `var N; (function (N) { ... })(N || (N = {}));`
    NamespaceIIFE {
        name: String,
        body: Vec<Self>,
        declare: Option<VarKeyword>,
        export_target: Option<String>,
    },

    // =========================================================================
    // ES Module IR Nodes
    // =========================================================================
    /// `import d, * as ns from "m";`, `import { a as b } from "m";`, `import "m";`
    ImportDecl {
        default: Option<String>,
        namespace: Option<String>,
        named: Vec<IRImportSpecifier>,
        module_spec: IRModuleSpec,
    },

    /// `export { a, b as c };` or `export { a } from "m";`
    ExportDecl {
        specifiers: Vec<IRExportSpecifier>,
        module_spec: Option<IRModuleSpec>,
    },

    /// `export * from "m";` / `export * as ns from "m";`
    ExportStar {
        alias: Option<String>,
        module_spec: IRModuleSpec,
    },

    /// `export default expr;`
    ExportDefault(Box<Self>),

    /// `export <declaration>` / `export default <declaration>`
    Exported { is_default: bool, declaration: Box<Self> },

    // =========================================================================
    // CommonJS Module IR Nodes
    // =========================================================================
    /// `"use strict";`
    UseStrict,

    /// `Object.defineProperty(exports, "__esModule", { value: true });`
    EsModuleMarker,

    /// `exports.a = exports.b = void 0;` (export initialization)
    ExportInit { names: Vec<String> },

    /// `const m_1 = require("m");` or a bare `require("m");`
    RequireStatement {
        keyword: VarKeyword,
        var_name: Option<String>,
        module_spec: IRModuleSpec,
    },

    // =========================================================================
    // Special
    // =========================================================================
    /// A comment, delimiters included (`/** ... */`, `// ...`).
    Comment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKeyword {
    Var,
    Let,
    Const,
}

impl VarKeyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// A module specifier as written, with its quote style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IRModuleSpec {
    pub value: String,
    pub single_quote: bool,
}

impl IRModuleSpec {
    pub fn new(value: impl Into<String>, single_quote: bool) -> Self {
        Self {
            value: value.into(),
            single_quote,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IRImportSpecifier {
    pub imported: String,
    pub local: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IRExportSpecifier {
    pub local: String,
    pub exported: String,
}

impl IRExportSpecifier {
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            local: name.clone(),
            exported: name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumMemberValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumMemberValue {
    /// Numeric value, printed with a reverse mapping
    Numeric(String),
    /// String value, no reverse mapping
    String(String),
    /// Computed expression (not a simple literal), printed with a reverse mapping
    Computed(Box<IRNode>),
}

/// Class member of an ES2015 class body
#[derive(Debug, Clone, PartialEq)]
pub struct IRClassMember {
    /// Comments printed before the member, delimiters included.
    pub comments: Vec<String>,
    pub kind: IRClassMemberKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IRClassMemberKind {
    Constructor {
        parameters: Vec<IRParam>,
        body: Vec<IRNode>,
        multi_line: bool,
    },
    Method {
        name: IRMethodName,
        is_static: bool,
        is_async: bool,
        is_generator: bool,
        parameters: Vec<IRParam>,
        body: Vec<IRNode>,
        multi_line: bool,
    },
    Getter {
        name: IRMethodName,
        is_static: bool,
        body: Vec<IRNode>,
        multi_line: bool,
    },
    Setter {
        name: IRMethodName,
        is_static: bool,
        parameter: IRParam,
        body: Vec<IRNode>,
        multi_line: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IRProperty {
    pub key: IRPropertyKey,
    pub value: IRNode,
    pub kind: IRPropertyKind,
}

/// Object property key
#[derive(Debug, Clone, PartialEq)]
pub enum IRPropertyKey {
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),
    Computed(Box<IRNode>),
}

/// Object property kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IRPropertyKind {
    Init,
    Shorthand,
    Spread,
}

/// Method name (for prototype/static assignments and class members)
#[derive(Debug, Clone, PartialEq)]
pub enum IRMethodName {
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),
    Computed(Box<IRNode>),
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct IRParam {
    pub name: String,
    pub rest: bool,
    pub default_value: Option<Box<IRNode>>,
}

/// A lowered file: the statement list plus the names the printer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct JsFile {
    /// Source file this output was lowered from.
    pub source_file_name: String,
    pub statements: Vec<IRNode>,
}

impl JsFile {
    pub fn new(source_file_name: impl Into<String>, statements: Vec<IRNode>) -> Self {
        Self {
            source_file_name: source_file_name.into(),
            statements,
        }
    }
}

// =========================================================================
// Builder helpers for IR construction
// =========================================================================

impl IRNode {
    pub fn id(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::StringLiteral {
            value: s.into(),
            single_quote: false,
        }
    }

    pub fn single_quoted(s: impl Into<String>) -> Self {
        Self::StringLiteral {
            value: s.into(),
            single_quote: true,
        }
    }

    pub fn number(n: impl Into<String>) -> Self {
        Self::NumericLiteral(n.into())
    }

    pub fn call(callee: Self, args: Vec<Self>) -> Self {
        Self::CallExpr {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    pub fn prop(object: Self, property: impl Into<String>) -> Self {
        Self::PropertyAccess {
            object: Box::new(object),
            property: property.into(),
        }
    }

    /// `a.b.c` from a dotted path
    pub fn dotted(path: &str) -> Self {
        let mut parts = path.split('.');
        let mut node = Self::id(parts.next().unwrap_or_default());
        for part in parts {
            node = Self::prop(node, part);
        }
        node
    }

    pub fn elem(object: Self, index: Self) -> Self {
        Self::ElementAccess {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    pub fn binary(left: Self, op: impl Into<String>, right: Self) -> Self {
        Self::BinaryExpr {
            left: Box::new(left),
            operator: op.into(),
            right: Box::new(right),
        }
    }

    pub fn assign(target: Self, value: Self) -> Self {
        Self::binary(target, "=", value)
    }

    pub fn var_decl(keyword: VarKeyword, name: impl Into<String>, init: Option<Self>) -> Self {
        Self::VarDecl {
            keyword,
            name: name.into(),
            initializer: init.map(Box::new),
        }
    }

    pub fn ret(expr: Option<Self>) -> Self {
        Self::ReturnStatement(expr.map(Box::new))
    }

    pub const fn func_expr(name: Option<String>, params: Vec<IRParam>, body: Vec<Self>) -> Self {
        Self::FunctionExpr {
            name,
            parameters: params,
            body,
            multi_line: true,
            is_async: false,
            is_generator: false,
        }
    }

    pub fn func_decl(name: impl Into<String>, params: Vec<IRParam>, body: Vec<Self>) -> Self {
        Self::FunctionDecl {
            name: name.into(),
            parameters: params,
            multi_line: !body.is_empty(),
            body,
            is_async: false,
            is_generator: false,
        }
    }


    /// Wrap in parentheses
    pub fn paren(self) -> Self {
        Self::Parenthesized(Box::new(self))
    }

    pub fn block(stmts: Vec<Self>) -> Self {
        Self::Block {
            multi_line: !stmts.is_empty(),
            statements: stmts,
        }
    }

    pub fn expr_stmt(expr: Self) -> Self {
        Self::ExpressionStatement(Box::new(expr))
    }

    pub const fn object(props: Vec<IRProperty>, multi_line: bool) -> Self {
        Self::ObjectLiteral {
            properties: props,
            multi_line,
        }
    }


    pub const fn array(elements: Vec<Self>) -> Self {
        Self::ArrayLiteral(elements)
    }


    pub fn new_expr(callee: Self, args: Vec<Self>) -> Self {
        Self::NewExpr {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    /// `exports.name`
    pub fn exports_prop(name: impl Into<String>) -> Self {
        Self::prop(Self::id("exports"), name)
    }

    /// The dotted name of an identifier/property-access chain.
    pub fn entity_name(&self) -> Option<String> {
        match self {
            Self::Identifier(name) => Some(name.clone()),
            Self::PropertyAccess { object, property } => {
                object.entity_name().map(|base| format!("{base}.{property}"))
            }
            _ => None,
        }
    }

    /// Whether this is a call of the function named by the dotted `callee`.
    pub fn is_call_to(&self, callee_name: &str) -> bool {
        matches!(self, Self::CallExpr { callee, .. } if callee.entity_name().as_deref() == Some(callee_name))
    }
}

impl IRParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: false,
            default_value: None,
        }
    }

    pub fn rest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: true,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default: IRNode) -> Self {
        self.default_value = Some(Box::new(default));
        self
    }
}

impl IRProperty {
    pub fn init(key: impl Into<String>, value: IRNode) -> Self {
        Self {
            key: IRPropertyKey::Identifier(key.into()),
            value,
            kind: IRPropertyKind::Init,
        }
    }


    pub fn shorthand(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            value: IRNode::Identifier(key.clone()),
            key: IRPropertyKey::Identifier(key),
            kind: IRPropertyKind::Shorthand,
        }
    }
}

// =========================================================================
// Traversal
// =========================================================================

/// Visit every node of `node` (pre-order), including nested function bodies,
/// letting `f` rewrite it in place.
pub fn walk_mut(node: &mut IRNode, f: &mut dyn FnMut(&mut IRNode)) {
    f(node);
    match node {
        IRNode::BinaryExpr { left, right, .. } => {
            walk_mut(left, f);
            walk_mut(right, f);
        }
        IRNode::PrefixUnaryExpr { operand, .. } | IRNode::PostfixUnaryExpr { operand, .. } => {
            walk_mut(operand, f)
        }
        IRNode::CallExpr { callee, arguments } | IRNode::NewExpr { callee, arguments } => {
            walk_mut(callee, f);
            arguments.iter_mut().for_each(|arg| walk_mut(arg, f));
        }
        IRNode::PropertyAccess { object, .. } => walk_mut(object, f),
        IRNode::ElementAccess { object, index } => {
            walk_mut(object, f);
            walk_mut(index, f);
        }
        IRNode::ConditionalExpr {
            condition,
            when_true,
            when_false,
        } => {
            walk_mut(condition, f);
            walk_mut(when_true, f);
            walk_mut(when_false, f);
        }
        IRNode::Parenthesized(inner)
        | IRNode::SpreadElement(inner)
        | IRNode::ExpressionStatement(inner)
        | IRNode::ThrowStatement(inner)
        | IRNode::ExportDefault(inner) => walk_mut(inner, f),
        IRNode::JsDocCast { expression, .. } | IRNode::CommentedExpr { expression, .. } => {
            walk_mut(expression, f)
        }
        IRNode::Exported { declaration, .. } => walk_mut(declaration, f),
        IRNode::ArrayLiteral(elements) => {
            elements.iter_mut().for_each(|el| walk_mut(el, f));
        }
        IRNode::ObjectLiteral { properties, .. } => {
            for prop in properties {
                if let IRPropertyKey::Computed(key) = &mut prop.key {
                    walk_mut(key, f);
                }
                walk_mut(&mut prop.value, f);
            }
        }
        IRNode::FunctionExpr {
            parameters, body, ..
        }
        | IRNode::FunctionDecl {
            parameters, body, ..
        } => {
            walk_params_mut(parameters, f);
            body.iter_mut().for_each(|stmt| walk_mut(stmt, f));
        }
        IRNode::ArrowFunction {
            parameters, body, ..
        } => {
            walk_params_mut(parameters, f);
            walk_mut(body, f);
        }
        IRNode::VarDecl { initializer, .. } => {
            if let Some(init) = initializer {
                walk_mut(init, f);
            }
        }
        IRNode::ReturnStatement(expr) => {
            if let Some(expr) = expr {
                walk_mut(expr, f);
            }
        }
        IRNode::IfStatement {
            condition,
            then_branch,
            else_branch,
        } => {
            walk_mut(condition, f);
            walk_mut(then_branch, f);
            if let Some(else_branch) = else_branch {
                walk_mut(else_branch, f);
            }
        }
        IRNode::Block { statements, .. }
        | IRNode::ES5ClassIIFE {
            body: statements, ..
        }
        | IRNode::NamespaceIIFE {
            body: statements, ..
        } => statements.iter_mut().for_each(|stmt| walk_mut(stmt, f)),
        IRNode::ClassDecl {
            extends, members, ..
        } => {
            if let Some(extends) = extends {
                walk_mut(extends, f);
            }
            for member in members {
                match &mut member.kind {
                    IRClassMemberKind::Constructor {
                        parameters, body, ..
                    }
                    | IRClassMemberKind::Method {
                        parameters, body, ..
                    } => {
                        walk_params_mut(parameters, f);
                        body.iter_mut().for_each(|stmt| walk_mut(stmt, f));
                    }
                    IRClassMemberKind::Getter { body, .. }
                    | IRClassMemberKind::Setter { body, .. } => {
                        body.iter_mut().for_each(|stmt| walk_mut(stmt, f));
                    }
                }
            }
        }
        IRNode::PrototypeMethod { function, .. } | IRNode::StaticMethod { function, .. } => {
            walk_mut(function, f)
        }
        IRNode::EnumIIFE { members, .. } => {
            for member in members {
                if let EnumMemberValue::Computed(expr) = &mut member.value {
                    walk_mut(expr, f);
                }
            }
        }
        _ => {}
    }
}

fn walk_params_mut(params: &mut [IRParam], f: &mut dyn FnMut(&mut IRNode)) {
    for param in params {
        if let Some(default) = &mut param.default_value {
            walk_mut(default, f);
        }
    }
}

#[cfg(test)]
#[path = "../tests/ir.rs"]
mod tests;
