//! Closure JSDoc annotation of declarations.
//!
//! Adds `@type`, `@param`, `@return`, `@template` and class tags to the
//! declarations of a file, turns interfaces into `@record` functions, type
//! aliases into `@typedef` declarations and enums into Closure object enums,
//! appends member stubs after classes and interfaces, and converts type
//! assertions into JSDoc casts. User JSDoc is preserved; tags TypeScript
//! already expresses are dropped with a warning.

use crate::context::FileContext;
use crate::enums::{closure_enum, member_values};
use crate::error::Result;
use crate::jsdoc::{self, Tag};
use crate::module_rewriter::require_type_statement;
use crate::stubs::{Visibility, class_stubs, guard_block, interface_stubs, signature_tags};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use tsickle_common::Span;
use tsickle_common::diagnostics::diagnostic_codes;
use tsickle_program::ast::{
    Block, ClassDeclaration, ClassMemberKind, Comment, Expression, ExpressionKind,
    FunctionDeclaration, HeritageClause, Identifier, InterfaceDeclaration, ModifierFlags,
    ModuleName, SourceFile, TypeAliasDeclaration, VariableDeclaration, VariableStatement,
};
use tsickle_program::visit::{VisitMut, walk_expression};
use tsickle_program::{Statement, StatementKind, VarKind};

/// `exports.name = name;`
fn export_assignment(name: &str) -> Statement {
    Statement::expression(Expression::assign(
        Expression::property(Expression::ident("exports"), name),
        Expression::ident(name),
    ))
}

fn template_tag(type_parameters: &[String]) -> Option<Tag> {
    (!type_parameters.is_empty()).then(|| Tag::new("template").with_text(type_parameters.join(", ")))
}

fn identifier_names(idents: &[Identifier]) -> Vec<String> {
    idents.iter().map(|i| i.name.clone()).collect()
}

pub struct JsDocTransformer<'c, 'a> {
    ctx: &'c mut FileContext<'a>,
    /// Interfaces whose `@record` function was already emitted (later
    /// declarations of a merged interface only add stubs).
    records: FxHashSet<String>,
}

impl<'c, 'a> JsDocTransformer<'c, 'a> {
    pub fn new(ctx: &'c mut FileContext<'a>) -> Self {
        Self {
            ctx,
            records: FxHashSet::default(),
        }
    }

    pub fn run(mut self, file: &mut SourceFile) -> Result<()> {
        let statements = std::mem::take(&mut file.statements);
        file.statements = self.annotate_statements(statements, true)?;

        let mut casts = CastRewriter { ctx: &mut *self.ctx, casts: 0 };
        casts.visit_source_file(file);
        trace!(file = %file.file_name, casts = casts.casts, "converted type assertions");

        self.flush_forward_declares(file);
        Ok(())
    }

    /// Insert `goog.requireType` declarations for modules that types were
    /// named from without an import, right after the imports.
    fn flush_forward_declares(&mut self, file: &mut SourceFile) {
        let declares = self.ctx.symbols.take_forward_declares();
        if declares.is_empty() {
            return;
        }
        debug!(file = %file.file_name, count = declares.len(), "emitting forward declarations");
        let position = file
            .statements
            .iter()
            .rposition(is_import_like)
            .map_or(0, |idx| idx + 1);
        let statements = declares
            .iter()
            .map(|declare| require_type_statement(&declare.alias, &declare.module_id));
        file.statements.splice(position..position, statements);
    }

    fn attach(&mut self, comments: &mut Vec<Comment>, tags: Vec<Tag>, span: Span) {
        jsdoc::attach(comments, tags, &mut self.ctx.diagnostics, span);
    }

    fn annotate_block(&mut self, block: &mut Block) -> Result<()> {
        let statements = std::mem::take(&mut block.statements);
        block.statements = self.annotate_statements(statements, false)?;
        Ok(())
    }

    fn annotate_statements(&mut self, statements: Vec<Statement>, top_level: bool) -> Result<Vec<Statement>> {
        let mut out = Vec::with_capacity(statements.len());
        for mut stmt in statements {
            if stmt.modifiers().is_ambient() {
                out.push(stmt);
                continue;
            }
            let exported = top_level && stmt.modifiers().is_exported();
            let commonjs_export = exported && self.ctx.is_commonjs();
            match &mut stmt.kind {
                StatementKind::Variable(var) => {
                    out.extend(self.annotate_variable(std::mem::take(&mut stmt.leading_comments), var, stmt.span));
                    continue;
                }
                StatementKind::Function(func) => {
                    if func.body.is_some() {
                        let tags = self.function_tags(func);
                        self.attach(&mut stmt.leading_comments, tags, stmt.span);
                    }
                    if let Some(body) = &mut func.body {
                        self.annotate_block(body)?;
                    }
                }
                StatementKind::Class(class) => {
                    let tags = self.class_tags(class);
                    self.attach(&mut stmt.leading_comments, tags, stmt.span);
                    self.annotate_members(class)?;
                    let stubs = match class.name.as_ref().map(|n| n.name.clone()) {
                        Some(name) => class_stubs(self.ctx, &name, class),
                        None => Vec::new(),
                    };
                    let guard = guard_block(self.ctx, &stubs);
                    out.push(stmt);
                    out.extend(guard);
                    continue;
                }
                StatementKind::Interface(iface) => {
                    let iface = iface.clone();
                    out.extend(self.interface(iface, std::mem::take(&mut stmt.leading_comments), exported, stmt.span));
                    continue;
                }
                StatementKind::TypeAlias(alias) => {
                    let alias = alias.clone();
                    out.push(self.typedef(&alias, std::mem::take(&mut stmt.leading_comments), exported, stmt.span));
                    continue;
                }
                StatementKind::Enum(decl) if top_level => {
                    if !self.ctx.const_enums.emits(decl) {
                        trace!(name = %decl.name.name, "const enum removed");
                        continue;
                    }
                    let values = member_values(decl, self.ctx.checker)?;
                    let comments = std::mem::take(&mut stmt.leading_comments);
                    let export_keyword = exported && !commonjs_export;
                    out.extend(closure_enum(
                        decl,
                        &values,
                        comments,
                        export_keyword,
                        &mut self.ctx.diagnostics,
                        stmt.span,
                    ));
                    if commonjs_export {
                        out.push(export_assignment(&decl.name.name));
                    }
                    continue;
                }
                StatementKind::Module(module) => {
                    if let ModuleName::Identifier(name) = &module.name
                        && module.body.is_some()
                    {
                        self.ctx
                            .diagnostics
                            .warn(diagnostic_codes::PLAIN_NAMESPACE_UNSUPPORTED, stmt.span, &[&name.name]);
                    }
                    if let Some(body) = module.body.take() {
                        module.body = Some(self.annotate_statements(body, false)?);
                    }
                }
                StatementKind::Block(block) => self.annotate_block(block)?,
                StatementKind::If(if_stmt) => {
                    if let StatementKind::Block(block) = &mut if_stmt.then_branch.kind {
                        self.annotate_block(block)?;
                    }
                    if let Some(else_branch) = &mut if_stmt.else_branch
                        && let StatementKind::Block(block) = &mut else_branch.kind
                    {
                        self.annotate_block(block)?;
                    }
                }
                _ => {}
            }
            out.push(stmt);
        }
        Ok(out)
    }

    // =========================================================================
    // Variables and functions
    // =========================================================================

    /// One statement per declarator, each with its own `@type`.
    fn annotate_variable(&mut self, comments: Vec<Comment>, var: &mut VariableStatement, span: Span) -> Vec<Statement> {
        let mut comments = Some(comments);
        let declarations = std::mem::take(&mut var.declarations);
        let mut out = Vec::with_capacity(declarations.len());
        for decl in declarations {
            let closure_type = self.ctx.translator().translate_node(decl.name.id);
            let mut leading = comments.take().unwrap_or_default();
            self.attach(&mut leading, vec![Tag::typed("type", closure_type)], span);
            out.push(Statement {
                span,
                leading_comments: leading,
                ..Statement::synthetic(StatementKind::Variable(VariableStatement {
                    modifiers: var.modifiers,
                    kind: var.kind,
                    declarations: vec![decl],
                }))
            });
        }
        out
    }

    fn function_tags(&mut self, func: &FunctionDeclaration) -> Vec<Tag> {
        let Some(name) = &func.name else {
            return Vec::new();
        };
        let signature = signature_tags(self.ctx, name.id, &func.parameters, true, false);
        let mut tags = signature.tags;
        let mut type_parameters = identifier_names(&func.type_parameters);
        for extra in signature.type_parameters {
            if !type_parameters.contains(&extra) {
                type_parameters.push(extra);
            }
        }
        tags.extend(template_tag(&type_parameters));
        tags
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// `Base<A, B>` named from this file.
    fn heritage_type(&mut self, clause: &HeritageClause) -> Option<String> {
        let checker = self.ctx.checker;
        let mut tr = self.ctx.translator();
        let base = match checker.symbol_of_node(clause.expression.id) {
            Some(symbol) => tr.symbol_reference(symbol),
            None => clause.expression.entity_name()?,
        };
        if base == "?" {
            return None;
        }
        if clause.type_arguments.is_empty() {
            return Some(base);
        }
        let arguments: Vec<String> = clause
            .type_arguments
            .iter()
            .map(|arg| tr.translate_node(arg.id))
            .collect();
        Some(format!("{base}<{}>", arguments.join(",")))
    }

    fn class_tags(&mut self, class: &ClassDeclaration) -> Vec<Tag> {
        let es5 = self.ctx.es5();
        let mut tags = Vec::new();
        if class.modifiers.contains(ModifierFlags::ABSTRACT) {
            tags.push(Tag::new("abstract"));
        }
        if es5 {
            tags.push(Tag::new("constructor"));
            tags.push(Tag::new("struct"));
        }
        if let Some(extends) = &class.extends
            && (es5 || !extends.type_arguments.is_empty())
            && let Some(base) = self.heritage_type(extends)
        {
            tags.push(Tag::typed("extends", base));
        }
        for implemented in &class.implements {
            if let Some(interface) = self.heritage_type(implemented) {
                tags.push(Tag::typed("implements", interface));
            }
        }
        tags.extend(template_tag(&identifier_names(&class.type_parameters)));
        if es5
            && let Some(member) = class
                .members
                .iter()
                .find(|m| matches!(&m.kind, ClassMemberKind::Constructor(ctor) if ctor.body.is_some()))
            && let ClassMemberKind::Constructor(ctor) = &member.kind
        {
            tags.extend(signature_tags(self.ctx, member.id, &ctor.parameters, false, true).tags);
        }
        tags
    }

    fn annotate_members(&mut self, class: &mut ClassDeclaration) -> Result<()> {
        let es5 = self.ctx.es5();
        for member in &mut class.members {
            let visibility = Visibility::from_modifiers(member.modifiers).tag();
            let tags = match &mut member.kind {
                ClassMemberKind::Constructor(ctor) => {
                    let Some(body) = &mut ctor.body else { continue };
                    self.annotate_block(body)?;
                    if es5 {
                        continue;
                    }
                    let mut tags = vec![visibility];
                    tags.extend(signature_tags(self.ctx, member.id, &ctor.parameters, false, true).tags);
                    tags
                }
                ClassMemberKind::Method(method) => {
                    let Some(body) = &mut method.body else { continue };
                    self.annotate_block(body)?;
                    let signature = signature_tags(self.ctx, member.id, &method.parameters, true, false);
                    let mut type_parameters = identifier_names(&method.type_parameters);
                    for extra in signature.type_parameters {
                        if !type_parameters.contains(&extra) {
                            type_parameters.push(extra);
                        }
                    }
                    let mut tags = vec![visibility];
                    tags.extend(signature.tags);
                    tags.extend(template_tag(&type_parameters));
                    tags
                }
                ClassMemberKind::GetAccessor(accessor) => {
                    let Some(body) = &mut accessor.body else { continue };
                    self.annotate_block(body)?;
                    let closure_type = self.ctx.translator().translate_node(member.id);
                    vec![visibility, Tag::typed("return", closure_type)]
                }
                ClassMemberKind::SetAccessor(accessor) => {
                    let Some(body) = &mut accessor.body else { continue };
                    self.annotate_block(body)?;
                    let closure_type = self.ctx.translator().translate_node(member.id);
                    match accessor.parameters.first() {
                        Some(param) => vec![visibility, Tag::param(param.name.name.clone(), closure_type)],
                        None => vec![visibility],
                    }
                }
                ClassMemberKind::Property(_) => continue,
            };
            jsdoc::attach(&mut member.leading_comments, tags, &mut self.ctx.diagnostics, member.span);
        }
        Ok(())
    }

    // =========================================================================
    // Interfaces and type aliases
    // =========================================================================

    /// `/** @record */ function I() {}` plus member stubs.
    fn interface(
        &mut self,
        iface: InterfaceDeclaration,
        mut comments: Vec<Comment>,
        exported: bool,
        span: Span,
    ) -> Vec<Statement> {
        let name = iface.name.name.clone();
        let mut out = Vec::new();
        if self.records.insert(name.clone()) {
            let mut tags = vec![Tag::new("record")];
            for base in &iface.extends {
                if let Some(base) = self.heritage_type(base) {
                    tags.push(Tag::typed("extends", base));
                }
            }
            tags.extend(template_tag(&identifier_names(&iface.type_parameters)));
            self.attach(&mut comments, tags, span);

            let commonjs_export = exported && self.ctx.is_commonjs();
            let modifiers = if exported && !commonjs_export {
                ModifierFlags::EXPORT
            } else {
                ModifierFlags::empty()
            };
            let function = FunctionDeclaration {
                modifiers,
                name: Some(Identifier::synthetic(name.clone())),
                type_parameters: Vec::new(),
                parameters: Vec::new(),
                return_type: None,
                body: Some(Block::empty()),
                is_generator: false,
            };
            out.push(Statement {
                span,
                leading_comments: comments,
                ..Statement::synthetic(StatementKind::Function(function))
            });
            if commonjs_export {
                out.push(export_assignment(&name));
            }
        }
        let stubs = interface_stubs(self.ctx, &iface);
        out.extend(guard_block(self.ctx, &stubs));
        out
    }

    /// `/** @typedef {T} */` on `exports.A;`, `export let A;` or `let A;`.
    fn typedef(&mut self, alias: &TypeAliasDeclaration, mut comments: Vec<Comment>, exported: bool, span: Span) -> Statement {
        let checker = self.ctx.checker;
        let symbol = checker.symbol_of_node(alias.name.id);
        let ty = checker
            .type_of_node(alias.type_node.id)
            .or_else(|| symbol.and_then(|s| checker.get_symbol(s)).and_then(|s| s.declared_type));
        let closure_type = {
            let ctx = &mut *self.ctx;
            let mut tr = ctx.translator().with_typedef_target(symbol);
            tr.erase_type_parameters(alias.type_parameters.iter().map(|p| p.name.clone()));
            ty.map_or_else(|| "?".to_string(), |ty| tr.translate(ty))
        };
        self.attach(&mut comments, vec![Tag::typed("typedef", closure_type)], span);

        let name = &alias.name.name;
        let kind = if exported && self.ctx.is_commonjs() {
            StatementKind::Expression(Expression::property(Expression::ident("exports"), name.clone()))
        } else {
            StatementKind::Variable(VariableStatement {
                modifiers: if exported { ModifierFlags::EXPORT } else { ModifierFlags::empty() },
                kind: VarKind::Let,
                declarations: vec![VariableDeclaration {
                    name: Identifier::synthetic(name.clone()),
                    type_annotation: None,
                    initializer: None,
                }],
            })
        };
        Statement {
            span,
            leading_comments: comments,
            ..Statement::synthetic(kind)
        }
    }
}

fn is_import_like(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::Import(_) | StatementKind::ImportEquals(_) => true,
        StatementKind::Variable(var) => var.declarations.iter().any(|decl| {
            decl.initializer.as_ref().is_some_and(|init| {
                matches!(&init.kind, ExpressionKind::Call { callee, .. }
                    if callee.entity_name().as_deref() == Some("goog.requireType"))
            })
        }),
        _ => false,
    }
}

// =============================================================================
// Casts
// =============================================================================

/// `<T>e`, `e as T` → `/** @type {T} */ (e)`; `e!` → a cast to the
/// non-null type, or plain `e` when the checker has no type for it.
struct CastRewriter<'c, 'a> {
    ctx: &'c mut FileContext<'a>,
    casts: usize,
}

impl VisitMut for CastRewriter<'_, '_> {
    fn visit_expression(&mut self, expr: &mut Expression) {
        walk_expression(self, expr);
        let kind = std::mem::replace(&mut expr.kind, ExpressionKind::Null);
        expr.kind = match kind {
            ExpressionKind::TypeAssertion { expression, type_node } => {
                self.casts += 1;
                ExpressionKind::JsDocCast {
                    closure_type: self.ctx.translator().translate_node(type_node.id),
                    expression,
                }
            }
            ExpressionKind::NonNull(inner) => match self.ctx.checker.type_of_node(expr.id) {
                Some(ty) => {
                    self.casts += 1;
                    ExpressionKind::JsDocCast {
                        closure_type: self.ctx.translator().translate(ty),
                        expression: inner,
                    }
                }
                None => inner.kind,
            },
            other => other,
        };
    }
}

#[cfg(test)]
#[path = "../tests/jsdoc_transformer.rs"]
mod tests;
