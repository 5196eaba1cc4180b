//! Typed TypeScript AST handed to the pipeline by the front end.
//!
//! The tree is owned and closed: every construct the emitter understands has a
//! variant, and transforms rewrite it in place. Nodes that the checker can say
//! something about carry a [`NodeId`]; nodes synthesized by transforms use
//! [`NodeId::SYNTHETIC`] and resolve to nothing.
//!
//! Type annotations are kept as [`TypeNode`]s: the source text as written plus
//! the node id the checker resolves. The emitter never interprets the text as
//! a type; it only uses it when a type reference has to be re-emitted as a
//! value (decorator metadata) and for diagnostics.

use crate::ids::NodeId;
use bitflags::bitflags;
use smallvec::SmallVec;
use tsickle_common::Span;

// =============================================================================
// Source files and comments
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct SourceFile {
    pub file_name: String,
    pub statements: Vec<Statement>,
    pub is_declaration_file: bool,
    /// Comments before the first statement that are detached from it
    /// (`@fileoverview` blocks, license headers).
    pub detached_comments: Vec<Comment>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, statements: Vec<Statement>) -> Self {
        let file_name = file_name.into();
        Self {
            is_declaration_file: file_name.ends_with(".d.ts"),
            file_name,
            statements,
            detached_comments: Vec::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// text`
    Line,
    /// `/* text */`; JSDoc comments are block comments whose text starts
    /// with `*`.
    Block,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text between the delimiters.
    pub text: String,
}

impl Comment {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Line,
            text: text.into(),
        }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Block,
            text: text.into(),
        }
    }

    pub fn is_jsdoc(&self) -> bool {
        self.kind == CommentKind::Block && self.text.starts_with('*') && !self.text.starts_with("**")
    }
}

// =============================================================================
// Modifiers
// =============================================================================

bitflags! {
    /// Declaration modifiers, as written.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ModifierFlags: u32 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const ABSTRACT = 1 << 3;
        const STATIC = 1 << 4;
        const READONLY = 1 << 5;
        const PUBLIC = 1 << 6;
        const PRIVATE = 1 << 7;
        const PROTECTED = 1 << 8;
        const CONST = 1 << 9;
        const ASYNC = 1 << 10;
        const OVERRIDE = 1 << 11;

        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        /// Modifiers that turn a constructor parameter into a property.
        const PARAMETER_PROPERTY = Self::ACCESSIBILITY.bits() | Self::READONLY.bits();
    }
}

impl ModifierFlags {
    pub fn is_exported(self) -> bool {
        self.contains(Self::EXPORT)
    }

    pub fn is_ambient(self) -> bool {
        self.contains(Self::DECLARE)
    }
}

// =============================================================================
// Names
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    pub id: NodeId,
    pub name: String,
}

impl Identifier {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn synthetic(name: impl Into<String>) -> Self {
        Self::new(NodeId::SYNTHETIC, name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    pub single_quote: bool,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            single_quote: true,
        }
    }

    pub fn double(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            single_quote: false,
        }
    }
}

/// Names of class members, interface members, object literal properties and
/// enum members.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyName {
    Identifier(Identifier),
    String(StringLiteral),
    Numeric(String),
    Computed(Box<Expression>),
    /// `#name`
    Private(String),
}

impl PropertyName {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(Identifier::synthetic(name))
    }

    /// The name as a plain identifier, when it is one.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(ident) => Some(&ident.name),
            _ => None,
        }
    }

    /// The static text of the name (identifier, string or numeric literal).
    pub fn static_text(&self) -> Option<&str> {
        match self {
            Self::Identifier(ident) => Some(&ident.name),
            Self::String(lit) => Some(&lit.value),
            Self::Numeric(text) => Some(text),
            Self::Computed(_) | Self::Private(_) => None,
        }
    }
}

/// A type annotation as written in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeNode {
    pub id: NodeId,
    pub text: String,
}

impl TypeNode {
    pub fn new(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// `Foo` or `ns.Foo`: an annotation that can be re-read as an expression.
    pub fn is_entity_name(&self) -> bool {
        !self.text.is_empty()
            && self.text.split('.').all(|part| {
                let mut chars = part.chars();
                matches!(chars.next(), Some(c) if c == '_' || c == '$' || c.is_alphabetic())
                    && chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
            })
    }
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub id: NodeId,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(id: NodeId, kind: StatementKind) -> Self {
        Self {
            id,
            span: Span::dummy(),
            leading_comments: Vec::new(),
            kind,
        }
    }

    pub fn synthetic(kind: StatementKind) -> Self {
        Self::new(NodeId::SYNTHETIC, kind)
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.leading_comments.push(comment);
        self
    }

    pub fn expression(expr: Expression) -> Self {
        Self::synthetic(StatementKind::Expression(expr))
    }

    /// Modifiers of a declaration statement, empty for everything else.
    pub fn modifiers(&self) -> ModifierFlags {
        match &self.kind {
            StatementKind::Variable(decl) => decl.modifiers,
            StatementKind::Function(decl) => decl.modifiers,
            StatementKind::Class(decl) => decl.modifiers,
            StatementKind::Interface(decl) => decl.modifiers,
            StatementKind::TypeAlias(decl) => decl.modifiers,
            StatementKind::Enum(decl) => decl.modifiers,
            StatementKind::Module(decl) => decl.modifiers,
            StatementKind::ImportEquals(decl) if decl.is_exported => ModifierFlags::EXPORT,
            _ => ModifierFlags::empty(),
        }
    }

    /// Names bound at the top level by this statement.
    pub fn declared_names(&self) -> SmallVec<[&str; 2]> {
        let mut names = SmallVec::new();
        match &self.kind {
            StatementKind::Variable(decl) => {
                names.extend(decl.declarations.iter().map(|d| d.name.name.as_str()));
            }
            StatementKind::Function(decl) => names.extend(decl.name.as_ref().map(|n| n.name.as_str())),
            StatementKind::Class(decl) => names.extend(decl.name.as_ref().map(|n| n.name.as_str())),
            StatementKind::Interface(decl) => names.push(decl.name.name.as_str()),
            StatementKind::TypeAlias(decl) => names.push(decl.name.name.as_str()),
            StatementKind::Enum(decl) => names.push(decl.name.name.as_str()),
            StatementKind::Module(decl) => {
                if let ModuleName::Identifier(ident) = &decl.name {
                    names.push(ident.name.as_str());
                }
            }
            StatementKind::ImportEquals(decl) => names.push(decl.name.name.as_str()),
            _ => {}
        }
        names
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    Import(ImportDeclaration),
    ImportEquals(ImportEqualsDeclaration),
    Export(ExportDeclaration),
    ExportAssignment(ExportAssignment),
    Variable(VariableStatement),
    Function(FunctionDeclaration),
    Class(ClassDeclaration),
    Interface(InterfaceDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Enum(EnumDeclaration),
    Module(ModuleDeclaration),
    Expression(Expression),
    Return(Option<Expression>),
    If(IfStatement),
    Block(Block),
    Throw(Expression),
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub multi_line: bool,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            multi_line: !statements.is_empty(),
            statements,
        }
    }

    pub fn empty() -> Self {
        Self {
            statements: Vec::new(),
            multi_line: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
}

// --- Imports / exports -------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct ImportDeclaration {
    pub clause: Option<ImportClause>,
    pub module_specifier: StringLiteral,
    /// `import type { ... }`
    pub is_type_only: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportClause {
    pub default: Option<Identifier>,
    pub bindings: Option<NamedImportBindings>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NamedImportBindings {
    /// `* as ns`
    Namespace(Identifier),
    Named(Vec<ImportSpecifier>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportSpecifier {
    /// `a` in `a as b`
    pub property_name: Option<Identifier>,
    pub name: Identifier,
    pub is_type_only: bool,
}

impl ImportSpecifier {
    /// Name exported by the source module.
    pub fn imported_name(&self) -> &str {
        self.property_name.as_ref().unwrap_or(&self.name).name.as_str()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportEqualsDeclaration {
    pub name: Identifier,
    pub reference: ModuleReference,
    pub is_exported: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ModuleReference {
    /// `require('./x')`
    External(StringLiteral),
    /// `A.B.C`
    Entity(Expression),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportDeclaration {
    pub clause: ExportClause,
    pub module_specifier: Option<StringLiteral>,
    pub is_type_only: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExportClause {
    /// `export * from '...'`
    Star,
    /// `export * as ns from '...'`
    Namespace(Identifier),
    Named(Vec<ExportSpecifier>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportSpecifier {
    pub property_name: Option<Identifier>,
    pub name: Identifier,
    pub is_type_only: bool,
}

impl ExportSpecifier {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            property_name: None,
            name: Identifier::synthetic(name),
            is_type_only: false,
        }
    }

    /// Local (or source-module) name being exported.
    pub fn local_name(&self) -> &str {
        self.property_name.as_ref().unwrap_or(&self.name).name.as_str()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportAssignment {
    /// `export =` rather than `export default`.
    pub is_export_equals: bool,
    pub expression: Expression,
}

// --- Declarations ------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableStatement {
    pub modifiers: ModifierFlags,
    pub kind: VarKind,
    pub declarations: Vec<VariableDeclaration>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDeclaration {
    pub name: Identifier,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub modifiers: ModifierFlags,
    pub decorators: Vec<Decorator>,
    pub optional: bool,
    pub rest: bool,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expression>,
}

impl Parameter {
    pub fn new(name: Identifier) -> Self {
        Self {
            name,
            modifiers: ModifierFlags::empty(),
            decorators: Vec::new(),
            optional: false,
            rest: false,
            type_annotation: None,
            initializer: None,
        }
    }

    pub fn is_parameter_property(&self) -> bool {
        self.modifiers.intersects(ModifierFlags::PARAMETER_PROPERTY)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDeclaration {
    pub modifiers: ModifierFlags,
    pub name: Option<Identifier>,
    pub type_parameters: Vec<Identifier>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
    /// `None` for overload signatures and ambient declarations.
    pub body: Option<Block>,
    pub is_generator: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decorator {
    pub id: NodeId,
    pub expression: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeritageClause {
    pub expression: Expression,
    pub type_arguments: Vec<TypeNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDeclaration {
    pub modifiers: ModifierFlags,
    pub decorators: Vec<Decorator>,
    pub name: Option<Identifier>,
    pub type_parameters: Vec<Identifier>,
    pub extends: Option<HeritageClause>,
    pub implements: Vec<HeritageClause>,
    pub members: Vec<ClassMember>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassMember {
    pub id: NodeId,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
    pub modifiers: ModifierFlags,
    pub decorators: Vec<Decorator>,
    pub kind: ClassMemberKind,
}

impl ClassMember {
    pub fn new(id: NodeId, modifiers: ModifierFlags, kind: ClassMemberKind) -> Self {
        Self {
            id,
            span: Span::dummy(),
            leading_comments: Vec::new(),
            modifiers,
            decorators: Vec::new(),
            kind,
        }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(ModifierFlags::STATIC)
    }

    pub fn name(&self) -> Option<&PropertyName> {
        match &self.kind {
            ClassMemberKind::Constructor(_) => None,
            ClassMemberKind::Method(method) => Some(&method.name),
            ClassMemberKind::Property(prop) => Some(&prop.name),
            ClassMemberKind::GetAccessor(accessor) | ClassMemberKind::SetAccessor(accessor) => {
                Some(&accessor.name)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassMemberKind {
    Constructor(ConstructorDeclaration),
    Method(MethodDeclaration),
    Property(PropertyDeclaration),
    GetAccessor(AccessorDeclaration),
    SetAccessor(AccessorDeclaration),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstructorDeclaration {
    pub parameters: Vec<Parameter>,
    /// `None` for overload signatures.
    pub body: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDeclaration {
    pub name: PropertyName,
    pub optional: bool,
    pub type_parameters: Vec<Identifier>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
    pub body: Option<Block>,
    pub is_generator: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDeclaration {
    pub name: PropertyName,
    pub optional: bool,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccessorDeclaration {
    pub name: PropertyName,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
    pub body: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceDeclaration {
    pub modifiers: ModifierFlags,
    pub name: Identifier,
    pub type_parameters: Vec<Identifier>,
    pub extends: Vec<HeritageClause>,
    pub members: Vec<InterfaceMember>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceMember {
    pub id: NodeId,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
    pub kind: InterfaceMemberKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InterfaceMemberKind {
    Property {
        name: PropertyName,
        optional: bool,
        readonly: bool,
        type_annotation: Option<TypeNode>,
    },
    Method {
        name: PropertyName,
        optional: bool,
        type_parameters: Vec<Identifier>,
        parameters: Vec<Parameter>,
        return_type: Option<TypeNode>,
    },
    /// Call, construct and index signatures. They shape the interface type
    /// but produce no member stub.
    Signature { text: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeAliasDeclaration {
    pub modifiers: ModifierFlags,
    pub name: Identifier,
    pub type_parameters: Vec<Identifier>,
    pub type_node: TypeNode,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDeclaration {
    pub modifiers: ModifierFlags,
    pub name: Identifier,
    pub members: Vec<EnumMember>,
}

impl EnumDeclaration {
    pub fn is_const(&self) -> bool {
        self.modifiers.contains(ModifierFlags::CONST)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumMember {
    pub id: NodeId,
    pub leading_comments: Vec<Comment>,
    pub name: PropertyName,
    pub initializer: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ModuleName {
    /// `namespace N`
    Identifier(Identifier),
    /// `declare module 'x'`
    String(StringLiteral),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModuleDeclaration {
    pub modifiers: ModifierFlags,
    pub name: ModuleName,
    /// `namespace A.B {}` is modelled as `A` with a nested `B` statement.
    pub body: Option<Vec<Statement>>,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExpressionKind,
}

impl Expression {
    pub fn new(id: NodeId, kind: ExpressionKind) -> Self {
        Self {
            id,
            span: Span::dummy(),
            kind,
        }
    }

    pub fn synthetic(kind: ExpressionKind) -> Self {
        Self::new(NodeId::SYNTHETIC, kind)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::synthetic(ExpressionKind::Identifier(name.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::synthetic(ExpressionKind::String(StringLiteral::new(value)))
    }

    pub fn numeric(text: impl Into<String>) -> Self {
        Self::synthetic(ExpressionKind::Numeric(text.into()))
    }

    pub fn property(object: Expression, name: impl Into<String>) -> Self {
        Self::synthetic(ExpressionKind::PropertyAccess {
            expression: Box::new(object),
            name: name.into(),
        })
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Self::synthetic(ExpressionKind::Call {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn assign(target: Expression, value: Expression) -> Self {
        Self::synthetic(ExpressionKind::Binary {
            left: Box::new(target),
            operator: "=".to_string(),
            right: Box::new(value),
        })
    }

    /// `a.b.c` as an identifier/property-access chain.
    pub fn dotted(path: &str) -> Self {
        let mut parts = path.split('.');
        let mut expr = Self::ident(parts.next().unwrap_or_default());
        for part in parts {
            expr = Self::property(expr, part);
        }
        expr
    }

    /// The dotted name of an identifier/property-access chain.
    pub fn entity_name(&self) -> Option<String> {
        match &self.kind {
            ExpressionKind::Identifier(name) => Some(name.clone()),
            ExpressionKind::PropertyAccess { expression, name } => {
                expression.entity_name().map(|base| format!("{base}.{name}"))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionKind {
    Identifier(String),
    This,
    Super,
    Null,
    Boolean(bool),
    Numeric(String),
    String(StringLiteral),
    /// Template literal without substitutions, raw text between backticks.
    Template(String),
    RegExp(String),
    Array(Vec<Expression>),
    Object(ObjectLiteral),
    PropertyAccess {
        expression: Box<Expression>,
        name: String,
    },
    ElementAccess {
        expression: Box<Expression>,
        argument: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    New {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Unary {
        operator: String,
        operand: Box<Expression>,
        prefix: bool,
    },
    Binary {
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        when_true: Box<Expression>,
        when_false: Box<Expression>,
    },
    Function(Box<FunctionExpression>),
    Arrow(Box<ArrowFunction>),
    Paren(Box<Expression>),
    /// `<T>e` and `e as T`
    TypeAssertion {
        expression: Box<Expression>,
        type_node: TypeNode,
    },
    /// `e!`
    NonNull(Box<Expression>),
    Spread(Box<Expression>),
    /// `/** @type {T} */ (e)`, produced by the annotation pass.
    JsDocCast {
        closure_type: String,
        expression: Box<Expression>,
    },
    /// Literal inlined from a constant (const enum member), with the source
    /// reference kept as a trailing comment: `0 /* E.A */`.
    InlinedConstant {
        value: ConstantValue,
        comment: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectLiteral {
    pub properties: Vec<ObjectProperty>,
    pub multi_line: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectProperty {
    Assignment { name: PropertyName, value: Expression },
    Shorthand(Identifier),
    Spread(Expression),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionExpression {
    pub name: Option<Identifier>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
    pub body: Block,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrowFunction {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
    pub body: ArrowBody,
    pub is_async: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArrowBody {
    Expression(Expression),
    Block(Block),
}

/// A compile-time constant computed by the checker (enum member values).
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Number(f64),
    String(String),
}

impl ConstantValue {
    /// JavaScript literal text.
    pub fn to_js(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::String(value) => format!("\"{}\"", escape_string(value, '"')),
        }
    }
}

/// Format a number the way JavaScript prints it for integral and simple
/// fractional values.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Escape a string for a JavaScript literal delimited by `quote`.
pub fn escape_string(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
