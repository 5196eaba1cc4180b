//! Lowering of the annotated TypeScript AST to the JavaScript IR.
//!
//! Types are erased, declarations without runtime meaning (interfaces, type
//! aliases, ambient declarations, overload signatures) are dropped, and the
//! module system is applied: ES module syntax is kept as is, CommonJS output
//! gets `require` calls, `exports.x` assignments and the usual preamble.
//!
//! The pieces live in submodules:
//! - `classes`: ES2015 classes and the ES5 constructor-function form
//! - `namespaces`: enum and namespace IIFEs
//! - `modules`: imports, exports and the CommonJS preamble

mod classes;
mod modules;
mod namespaces;

pub(crate) use modules::is_module;

use crate::context::FileContext;
use crate::error::{Result, TransformError};
use crate::ir::{
    IRNode, IRParam, IRProperty, IRPropertyKey, IRPropertyKind, JsFile, VarKeyword,
};
use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use tsickle_program::ast::{
    ArrowBody, Block, Comment, CommentKind, ConstantValue, Expression, ExpressionKind,
    ModifierFlags, ObjectProperty, Parameter, PropertyName, SourceFile, VariableStatement,
};
use tsickle_program::{Statement, StatementKind, SymbolId, VarKind};

/// Comment text with its delimiters.
pub(crate) fn comment_text(comment: &Comment) -> String {
    match comment.kind {
        CommentKind::Line => format!("//{}", comment.text),
        CommentKind::Block => format!("/*{}*/", comment.text),
    }
}

fn var_keyword(kind: VarKind) -> VarKeyword {
    match kind {
        VarKind::Var => VarKeyword::Var,
        VarKind::Let => VarKeyword::Let,
        VarKind::Const => VarKeyword::Const,
    }
}

/// Where the declarations being lowered live.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Scope {
    /// Top level of the file.
    File,
    /// Body of namespace `N` (exported members are assigned to `N.x`).
    Namespace(String),
    /// Function bodies and blocks.
    Local,
}

/// ES5 class context for `super` and `this` rewriting.
#[derive(Clone, Copy, Debug, Default)]
struct Es5ClassState {
    /// Inside a class with a base class: `super.m(...)` is rewritten.
    has_base: bool,
    in_static: bool,
    /// `this` is `_this` (constructor statements after the super call).
    this_alias: bool,
}

pub struct Lowering<'c, 'a> {
    ctx: &'c mut FileContext<'a>,
    /// Exported variables read and written through their owner object
    /// (`exports.x`, `N.x`).
    export_owners: FxHashMap<SymbolId, String>,
    /// Names initialized to `void 0` in the CommonJS preamble.
    export_names: IndexSet<String>,
    /// `exports.f = f;` for exported functions, emitted after the preamble.
    hoisted_exports: Vec<IRNode>,
    /// Names declared per scope, innermost last.
    declared: Vec<FxHashSet<String>>,
    es5_class: Es5ClassState,
}

/// Lower `file` to the IR.
pub fn lower_file(file: &SourceFile, ctx: &mut FileContext<'_>) -> Result<JsFile> {
    let mut lowering = Lowering {
        ctx,
        export_owners: FxHashMap::default(),
        export_names: IndexSet::new(),
        hoisted_exports: Vec::new(),
        declared: vec![FxHashSet::default()],
        es5_class: Es5ClassState::default(),
    };
    lowering.collect_export_owners(&file.statements, &Scope::File);

    let mut body = Vec::new();
    lowering.lower_statements(&file.statements, &Scope::File, &mut body)?;
    let statements = lowering.finish_module(file, body);
    debug!(file = %file.file_name, statements = statements.len(), "lowered file");
    Ok(JsFile::new(file.file_name.clone(), statements))
}

impl Lowering<'_, '_> {
    // =========================================================================
    // Statements
    // =========================================================================

    fn push_comments(comments: &[Comment], out: &mut Vec<IRNode>) {
        out.extend(comments.iter().map(|c| IRNode::comment(comment_text(c))));
    }

    fn lower_statements(&mut self, statements: &[Statement], scope: &Scope, out: &mut Vec<IRNode>) -> Result<()> {
        for stmt in statements {
            self.lower_statement(stmt, scope, out)?;
        }
        Ok(())
    }

    fn lower_block(&mut self, block: &Block) -> Result<Vec<IRNode>> {
        self.declared.push(FxHashSet::default());
        let mut out = Vec::with_capacity(block.statements.len());
        let result = self.lower_statements(&block.statements, &Scope::Local, &mut out);
        self.declared.pop();
        result.map(|()| out)
    }

    /// Record `name` as declared in the current scope; false when it already was.
    fn declare(&mut self, name: &str) -> bool {
        self.declared
            .last_mut()
            .is_none_or(|names| names.insert(name.to_string()))
    }

    /// Owner object of an exported declaration in `scope`, if any.
    fn export_owner(&self, scope: &Scope, exported: bool) -> Option<String> {
        if !exported {
            return None;
        }
        match scope {
            Scope::File if self.ctx.is_commonjs() => Some("exports".to_string()),
            Scope::Namespace(name) => Some(name.clone()),
            Scope::File | Scope::Local => None,
        }
    }

    fn lower_statement(&mut self, stmt: &Statement, scope: &Scope, out: &mut Vec<IRNode>) -> Result<()> {
        let modifiers = stmt.modifiers();
        if modifiers.is_ambient() {
            return Ok(());
        }
        let exported = modifiers.is_exported() && *scope != Scope::Local;
        let comments = &stmt.leading_comments;
        match &stmt.kind {
            StatementKind::Import(decl) => self.lower_import(decl, comments, out),
            StatementKind::ImportEquals(decl) => self.lower_import_equals(decl, comments, scope, out)?,
            StatementKind::Export(decl) => self.lower_export(decl, comments, out),
            StatementKind::ExportAssignment(assignment) => {
                Self::push_comments(comments, out);
                out.push(self.lower_export_assignment(assignment)?);
            }
            StatementKind::Variable(var) => self.lower_variable(var, comments, scope, exported, out)?,
            StatementKind::Function(func) => {
                let Some(body) = &func.body else {
                    return Ok(());
                };
                let default = modifiers.contains(ModifierFlags::DEFAULT);
                let name = func
                    .name
                    .as_ref()
                    .map_or_else(|| "default_1".to_string(), |n| n.name.clone());
                self.declare(&name);
                let saved = std::mem::take(&mut self.es5_class);
                let parameters = self.lower_params(&func.parameters);
                let body_ir = self.lower_block(body);
                self.es5_class = saved;
                let decl = IRNode::FunctionDecl {
                    name: name.clone(),
                    parameters: parameters?,
                    multi_line: body.multi_line,
                    body: body_ir?,
                    is_async: modifiers.contains(ModifierFlags::ASYNC),
                    is_generator: func.is_generator,
                };
                Self::push_comments(comments, out);
                match self.export_owner(scope, exported) {
                    Some(owner) if owner == "exports" => {
                        let exported_name = if default { "default" } else { name.as_str() };
                        self.hoisted_exports.push(IRNode::expr_stmt(IRNode::assign(
                            IRNode::exports_prop(exported_name),
                            IRNode::id(name.clone()),
                        )));
                        out.push(decl);
                    }
                    Some(owner) => {
                        out.push(decl);
                        out.push(member_export(&owner, &name));
                    }
                    None if exported => out.push(IRNode::Exported {
                        is_default: default,
                        declaration: Box::new(decl),
                    }),
                    None => out.push(decl),
                }
            }
            StatementKind::Class(class) => self.lower_class_statement(stmt, class, scope, exported, out)?,
            StatementKind::Interface(_) | StatementKind::TypeAlias(_) => {}
            StatementKind::Enum(decl) => self.lower_enum_statement(decl, comments, scope, exported, out)?,
            StatementKind::Module(module) => self.lower_namespace_statement(module, comments, scope, exported, out)?,
            StatementKind::Expression(expr) => {
                Self::push_comments(comments, out);
                out.push(IRNode::expr_stmt(self.lower_expr(expr)?));
            }
            StatementKind::Return(expr) => {
                Self::push_comments(comments, out);
                let value = expr.as_ref().map(|e| self.lower_expr(e)).transpose()?;
                out.push(IRNode::ret(value));
            }
            StatementKind::If(if_stmt) => {
                Self::push_comments(comments, out);
                let condition = self.lower_expr(&if_stmt.condition)?;
                let then_branch = self.lower_nested(&if_stmt.then_branch)?;
                let else_branch = if_stmt
                    .else_branch
                    .as_ref()
                    .map(|s| self.lower_nested(s))
                    .transpose()?;
                out.push(IRNode::IfStatement {
                    condition: Box::new(condition),
                    then_branch: Box::new(then_branch),
                    else_branch: else_branch.map(Box::new),
                });
            }
            StatementKind::Block(block) => {
                Self::push_comments(comments, out);
                let statements = self.lower_block(block)?;
                out.push(IRNode::Block {
                    statements,
                    multi_line: block.multi_line,
                });
            }
            StatementKind::Throw(expr) => {
                Self::push_comments(comments, out);
                out.push(IRNode::ThrowStatement(Box::new(self.lower_expr(expr)?)));
            }
            StatementKind::Empty => out.push(IRNode::EmptyStatement),
        }
        Ok(())
    }

    /// A statement in a branch position, as a single node.
    fn lower_nested(&mut self, stmt: &Statement) -> Result<IRNode> {
        let mut out = Vec::with_capacity(1);
        self.declared.push(FxHashSet::default());
        let result = self.lower_statement(stmt, &Scope::Local, &mut out);
        self.declared.pop();
        result?;
        Ok(match out.len() {
            1 => out.pop().unwrap_or(IRNode::EmptyStatement),
            _ => IRNode::block(out),
        })
    }

    fn lower_variable(
        &mut self,
        var: &VariableStatement,
        comments: &[Comment],
        scope: &Scope,
        exported: bool,
        out: &mut Vec<IRNode>,
    ) -> Result<()> {
        Self::push_comments(comments, out);
        let owner = self.export_owner(scope, exported);
        for decl in &var.declarations {
            let initializer = decl.initializer.as_ref().map(|e| self.lower_expr(e)).transpose()?;
            match &owner {
                Some(owner) => {
                    if owner == "exports" {
                        self.export_names.insert(decl.name.name.clone());
                    }
                    // Exported variables live on their owner object only.
                    if let Some(init) = initializer {
                        out.push(IRNode::expr_stmt(IRNode::assign(
                            IRNode::prop(IRNode::dotted(owner), decl.name.name.clone()),
                            init,
                        )));
                    }
                }
                None => {
                    self.declare(&decl.name.name);
                    let node = IRNode::var_decl(var_keyword(var.kind), decl.name.name.clone(), initializer);
                    out.push(if exported {
                        IRNode::Exported {
                            is_default: false,
                            declaration: Box::new(node),
                        }
                    } else {
                        node
                    });
                }
            }
        }
        Ok(())
    }

    /// Record exported variables of `statements` so references to them are
    /// rewritten to their owner object.
    fn collect_export_owners(&mut self, statements: &[Statement], scope: &Scope) {
        for stmt in statements {
            let StatementKind::Variable(var) = &stmt.kind else {
                continue;
            };
            if var.modifiers.is_ambient() {
                continue;
            }
            let Some(owner) = self.export_owner(scope, var.modifiers.is_exported()) else {
                continue;
            };
            for decl in &var.declarations {
                if let Some(symbol) = self.ctx.checker.symbol_of_node(decl.name.id) {
                    self.export_owners.insert(symbol, owner.clone());
                }
            }
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn lower_params(&mut self, parameters: &[Parameter]) -> Result<Vec<IRParam>> {
        parameters
            .iter()
            .filter(|p| p.name.name != "this")
            .map(|p| {
                let mut param = if p.rest {
                    IRParam::rest(p.name.name.clone())
                } else {
                    IRParam::new(p.name.name.clone())
                };
                if let Some(default) = &p.initializer {
                    param = param.with_default(self.lower_expr(default)?);
                }
                Ok(param)
            })
            .collect()
    }

    /// Lower a function body that does not see the enclosing class's `this`.
    fn lower_function_body(&mut self, body: &Block) -> Result<Vec<IRNode>> {
        let saved = self.es5_class;
        self.es5_class.this_alias = false;
        let result = self.lower_block(body);
        self.es5_class = saved;
        result
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// An identifier reference, rewritten when it names an import binding
    /// (CommonJS) or an exported variable.
    fn lower_reference(&self, expr: &Expression, name: &str) -> IRNode {
        if let Some(symbol) = self.ctx.checker.symbol_of_node(expr.id) {
            if let Some(rewritten) = self.ctx.symbols.value_rewrite(symbol) {
                return IRNode::dotted(&rewritten);
            }
            if let Some(owner) = self.export_owners.get(&symbol) {
                return IRNode::prop(IRNode::dotted(owner), name);
            }
        }
        IRNode::id(name)
    }

    fn lower_property_name(&mut self, name: &PropertyName) -> Result<IRPropertyKey> {
        Ok(match name {
            PropertyName::Identifier(ident) => IRPropertyKey::Identifier(ident.name.clone()),
            PropertyName::String(lit) => IRPropertyKey::StringLiteral(lit.value.clone()),
            PropertyName::Numeric(text) => IRPropertyKey::NumericLiteral(text.clone()),
            PropertyName::Computed(expr) => IRPropertyKey::Computed(Box::new(self.lower_expr(expr)?)),
            PropertyName::Private(text) => IRPropertyKey::Identifier(format!("#{text}")),
        })
    }

    fn lower_exprs(&mut self, exprs: &[Expression]) -> Result<Vec<IRNode>> {
        exprs.iter().map(|e| self.lower_expr(e)).collect()
    }

    pub(crate) fn lower_expr(&mut self, expr: &Expression) -> Result<IRNode> {
        Ok(match &expr.kind {
            ExpressionKind::Identifier(name) => self.lower_reference(expr, name),
            ExpressionKind::This => {
                if self.es5_class.this_alias {
                    IRNode::id("_this")
                } else {
                    IRNode::This
                }
            }
            ExpressionKind::Super => {
                if self.es5_class.has_base {
                    return Err(TransformError::unsupported("'super' outside a call or member access", "ES5 class lowering"));
                }
                IRNode::Super
            }
            ExpressionKind::Null => IRNode::NullLiteral,
            ExpressionKind::Boolean(value) => IRNode::BooleanLiteral(*value),
            ExpressionKind::Numeric(text) => IRNode::number(text.clone()),
            ExpressionKind::String(lit) => IRNode::StringLiteral {
                value: lit.value.clone(),
                single_quote: lit.single_quote,
            },
            ExpressionKind::Template(raw) => IRNode::TemplateLiteral(raw.clone()),
            ExpressionKind::RegExp(raw) => IRNode::RegExpLiteral(raw.clone()),
            ExpressionKind::Array(elements) => IRNode::array(self.lower_exprs(elements)?),
            ExpressionKind::Object(object) => {
                let mut properties = Vec::with_capacity(object.properties.len());
                for prop in &object.properties {
                    properties.push(match prop {
                        ObjectProperty::Assignment { name, value } => IRProperty {
                            key: self.lower_property_name(name)?,
                            value: self.lower_expr(value)?,
                            kind: IRPropertyKind::Init,
                        },
                        ObjectProperty::Shorthand(ident) => {
                            let reference = Expression::new(ident.id, ExpressionKind::Identifier(ident.name.clone()));
                            match self.lower_reference(&reference, &ident.name) {
                                IRNode::Identifier(_) => IRProperty::shorthand(ident.name.clone()),
                                rewritten => IRProperty::init(ident.name.clone(), rewritten),
                            }
                        }
                        ObjectProperty::Spread(value) => IRProperty {
                            key: IRPropertyKey::Identifier(String::new()),
                            value: self.lower_expr(value)?,
                            kind: IRPropertyKind::Spread,
                        },
                    });
                }
                IRNode::object(properties, object.multi_line)
            }
            ExpressionKind::PropertyAccess { expression, name } => {
                if matches!(expression.kind, ExpressionKind::Super) && self.es5_class.has_base {
                    return Ok(IRNode::prop(self.es5_super_object(), name.clone()));
                }
                IRNode::prop(self.lower_expr(expression)?, name.clone())
            }
            ExpressionKind::ElementAccess { expression, argument } => {
                IRNode::elem(self.lower_expr(expression)?, self.lower_expr(argument)?)
            }
            ExpressionKind::Call { callee, arguments } => {
                if self.es5_class.has_base
                    && let ExpressionKind::PropertyAccess { expression, name } = &callee.kind
                    && matches!(expression.kind, ExpressionKind::Super)
                {
                    // super.m(a) → _super.prototype.m.call(this, a)
                    let method = IRNode::prop(self.es5_super_object(), name.clone());
                    let this = if self.es5_class.this_alias {
                        IRNode::id("_this")
                    } else {
                        IRNode::This
                    };
                    let mut args = vec![this];
                    args.extend(self.lower_exprs(arguments)?);
                    return Ok(IRNode::call(IRNode::prop(method, "call"), args));
                }
                IRNode::call(self.lower_expr(callee)?, self.lower_exprs(arguments)?)
            }
            ExpressionKind::New { callee, arguments } => {
                IRNode::new_expr(self.lower_expr(callee)?, self.lower_exprs(arguments)?)
            }
            ExpressionKind::Unary {
                operator,
                operand,
                prefix,
            } => {
                let operand = Box::new(self.lower_expr(operand)?);
                if *prefix {
                    IRNode::PrefixUnaryExpr {
                        operator: operator.clone(),
                        operand,
                    }
                } else {
                    IRNode::PostfixUnaryExpr {
                        operand,
                        operator: operator.clone(),
                    }
                }
            }
            ExpressionKind::Binary { left, operator, right } => {
                IRNode::binary(self.lower_expr(left)?, operator.clone(), self.lower_expr(right)?)
            }
            ExpressionKind::Conditional {
                condition,
                when_true,
                when_false,
            } => IRNode::ConditionalExpr {
                condition: Box::new(self.lower_expr(condition)?),
                when_true: Box::new(self.lower_expr(when_true)?),
                when_false: Box::new(self.lower_expr(when_false)?),
            },
            ExpressionKind::Function(func) => {
                let parameters = self.lower_params(&func.parameters)?;
                let body = self.lower_function_body(&func.body)?;
                IRNode::FunctionExpr {
                    name: func.name.as_ref().map(|n| n.name.clone()),
                    parameters,
                    body,
                    multi_line: func.body.multi_line,
                    is_async: func.is_async,
                    is_generator: func.is_generator,
                }
            }
            ExpressionKind::Arrow(arrow) => {
                let parameters = self.lower_params(&arrow.parameters)?;
                let body = match &arrow.body {
                    ArrowBody::Expression(expr) => self.lower_expr(expr)?,
                    ArrowBody::Block(block) => IRNode::Block {
                        statements: self.lower_block(block)?,
                        multi_line: block.multi_line,
                    },
                };
                IRNode::ArrowFunction {
                    parameters,
                    body: Box::new(body),
                    is_async: arrow.is_async,
                }
            }
            ExpressionKind::Paren(inner) => self.lower_expr(inner)?.paren(),
            ExpressionKind::TypeAssertion { expression, .. } | ExpressionKind::NonNull(expression) => {
                self.lower_expr(expression)?
            }
            ExpressionKind::Spread(inner) => IRNode::SpreadElement(Box::new(self.lower_expr(inner)?)),
            ExpressionKind::JsDocCast {
                closure_type,
                expression,
            } => IRNode::JsDocCast {
                closure_type: closure_type.clone(),
                expression: Box::new(self.lower_expr(expression)?),
            },
            ExpressionKind::InlinedConstant { value, comment } => IRNode::CommentedExpr {
                expression: Box::new(match value {
                    ConstantValue::Number(_) => IRNode::number(value.to_js()),
                    ConstantValue::String(s) => IRNode::string(s.clone()),
                }),
                comment: comment.clone(),
            },
        })
    }

    /// `_super.prototype` in instance members, `_super` in static ones.
    fn es5_super_object(&self) -> IRNode {
        if self.es5_class.in_static {
            IRNode::id("_super")
        } else {
            IRNode::prop(IRNode::id("_super"), "prototype")
        }
    }
}

/// `N.name = name;`
fn member_export(owner: &str, name: &str) -> IRNode {
    IRNode::expr_stmt(IRNode::assign(IRNode::prop(IRNode::dotted(owner), name), IRNode::id(name)))
}

#[cfg(test)]
#[path = "../../tests/lowering.rs"]
mod tests;
