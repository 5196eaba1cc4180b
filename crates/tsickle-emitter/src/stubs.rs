//! Type-only member declarations for classes and interfaces.
//!
//! Closure learns member types from statements such as
//! `/** @type {string} */ X.prototype.name;`. They are collected per class or
//! interface in source order and emitted inside a block that never runs:
//!
//! ```text
//! /* istanbul ignore if */
//! if (false) {
//!     /** @type {string} */
//!     X.prototype.name;
//! }
//! ```

use crate::constructors::{merge_signatures, parameter_names, signatures_of};
use crate::context::FileContext;
use crate::jsdoc::{self, Tag};
use crate::type_translator::{TypeTranslator, union_text};
use tracing::trace;
use tsickle_common::Span;
use tsickle_common::diagnostics::diagnostic_codes;
use tsickle_program::ast::{
    Block, ClassDeclaration, ClassMemberKind, Comment, Expression, ExpressionKind,
    FunctionExpression, IfStatement, InterfaceDeclaration, InterfaceMemberKind, ModifierFlags,
    Parameter, PropertyName,
};
use tsickle_program::{NodeId, Statement, StatementKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

impl Visibility {
    pub fn from_modifiers(modifiers: ModifierFlags) -> Self {
        if modifiers.contains(ModifierFlags::PRIVATE) {
            Self::Private
        } else if modifiers.contains(ModifierFlags::PROTECTED) {
            Self::Protected
        } else {
            Self::Public
        }
    }

    pub fn tag(self) -> Tag {
        Tag::new(match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StubKind {
    /// `X.prototype.p;`
    Property,
    /// `X.prototype.m = function(a, b) {};`
    Method { parameters: Vec<String> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct StubDeclaration {
    pub owner: String,
    pub name: String,
    pub is_static: bool,
    pub kind: StubKind,
    /// Generated tags, visibility included.
    pub tags: Vec<Tag>,
    /// The member's own comments; its JSDoc is merged into the stub's.
    pub comments: Vec<Comment>,
    pub span: Span,
}

impl StubDeclaration {
    fn target(&self) -> Expression {
        let owner = Expression::dotted(&self.owner);
        let receiver = if self.is_static {
            owner
        } else {
            Expression::property(owner, "prototype")
        };
        Expression::property(receiver, self.name.clone())
    }

    pub fn to_statement(&self, ctx: &mut FileContext<'_>) -> Statement {
        let expr = match &self.kind {
            StubKind::Property => self.target(),
            StubKind::Method { parameters } => Expression::assign(
                self.target(),
                Expression::synthetic(ExpressionKind::Function(Box::new(FunctionExpression {
                    name: None,
                    parameters: parameters
                        .iter()
                        .map(|p| Parameter::new(tsickle_program::ast::Identifier::synthetic(p.clone())))
                        .collect(),
                    return_type: None,
                    body: Block::empty(),
                    is_async: false,
                    is_generator: false,
                }))),
            ),
        };
        let mut comments: Vec<Comment> = self.comments.iter().filter(|c| c.is_jsdoc()).cloned().collect();
        jsdoc::attach(&mut comments, self.tags.clone(), &mut ctx.diagnostics, self.span);
        Statement {
            leading_comments: comments,
            ..Statement::expression(expr)
        }
    }
}

/// `/* istanbul ignore if */ if (false) { ... }`, or nothing without stubs.
pub fn guard_block(ctx: &mut FileContext<'_>, stubs: &[StubDeclaration]) -> Option<Statement> {
    if stubs.is_empty() {
        return None;
    }
    let statements = stubs.iter().map(|stub| stub.to_statement(ctx)).collect();
    let guard = Statement::synthetic(StatementKind::If(IfStatement {
        condition: Expression::synthetic(ExpressionKind::Boolean(false)),
        then_branch: Box::new(Statement::synthetic(StatementKind::Block(Block::new(statements)))),
        else_branch: None,
    }));
    Some(guard.with_comment(Comment::block(" istanbul ignore if ")))
}

// =============================================================================
// Collection
// =============================================================================

/// Stub name of a member, warning when it has none.
fn stub_name(ctx: &mut FileContext<'_>, owner: &str, name: &PropertyName, span: Span) -> Option<String> {
    match name.as_identifier() {
        Some(ident) => Some(ident.to_string()),
        None => {
            let text = match name {
                PropertyName::String(lit) => format!("'{}'", lit.value),
                PropertyName::Numeric(text) => text.clone(),
                PropertyName::Private(text) => format!("#{text}"),
                PropertyName::Computed(_) => "[computed]".to_string(),
                PropertyName::Identifier(ident) => ident.name.clone(),
            };
            ctx.diagnostics
                .warn(diagnostic_codes::UNNAMED_STUB_MEMBER, span, &[&text, owner]);
            None
        }
    }
}

fn property_type(tr: &mut TypeTranslator<'_>, ty: tsickle_program::TypeId, optional: bool) -> String {
    let text = tr.translate(ty);
    if optional {
        union_text(vec![text, "undefined".to_string()])
    } else {
        text
    }
}

pub(crate) struct SignatureTags {
    /// `@param` tags, then `@return` when requested.
    pub tags: Vec<Tag>,
    pub parameter_names: Vec<String>,
    pub type_parameters: Vec<String>,
}

/// `@param`/`@return` tags for a function-like declaration typed by `node`,
/// its overload signatures merged.
pub(crate) fn signature_tags(
    ctx: &mut FileContext<'_>,
    node: NodeId,
    parameters: &[Parameter],
    with_return: bool,
    erase_type_parameters: bool,
) -> SignatureTags {
    let checker = ctx.checker;
    let signatures = checker
        .type_of_node(node)
        .map(|ty| signatures_of(checker, ty))
        .unwrap_or_default();
    let merged = merge_signatures(&signatures, &parameter_names(parameters));
    let mut tr = ctx.translator();
    if erase_type_parameters {
        tr.erase_type_parameters(merged.type_parameters.iter().cloned());
    }

    let mut tags = Vec::with_capacity(merged.parameters.len() + 1);
    for (idx, param) in merged.parameters.iter().enumerate() {
        let ast_optional = parameters
            .get(idx)
            .is_some_and(|p| p.optional || p.initializer.is_some());
        let ty = tr.parameter_type(&param.types, param.optional || ast_optional, param.rest);
        tags.push(Tag::param(param.name.clone(), ty));
    }
    if with_return && !merged.return_types.is_empty() {
        tags.push(Tag::typed("return", tr.translate_union_of(&merged.return_types)));
    }
    SignatureTags {
        tags,
        parameter_names: merged.parameters.into_iter().map(|p| p.name).collect(),
        type_parameters: merged.type_parameters,
    }
}

pub fn class_stubs(ctx: &mut FileContext<'_>, owner: &str, class: &ClassDeclaration) -> Vec<StubDeclaration> {
    let mut stubs = Vec::new();
    let is_abstract_class = class.modifiers.contains(ModifierFlags::ABSTRACT);
    for member in &class.members {
        match &member.kind {
            ClassMemberKind::Constructor(ctor) => {
                for param in ctor.parameters.iter().filter(|p| p.is_parameter_property()) {
                    let Some(ty) = ctx.checker.type_of_node(param.name.id) else {
                        trace!(param = %param.name.name, "parameter property without type, no stub");
                        continue;
                    };
                    let text = property_type(&mut ctx.translator(), ty, param.optional);
                    stubs.push(StubDeclaration {
                        owner: owner.to_string(),
                        name: param.name.name.clone(),
                        is_static: false,
                        kind: StubKind::Property,
                        tags: vec![Tag::typed("type", text), Visibility::from_modifiers(param.modifiers).tag()],
                        comments: Vec::new(),
                        span: member.span,
                    });
                }
            }
            ClassMemberKind::Property(prop) => {
                let Some(ty) = ctx.checker.type_of_node(member.id) else {
                    trace!("property without type, no stub");
                    continue;
                };
                let Some(name) = stub_name(ctx, owner, &prop.name, member.span) else {
                    continue;
                };
                let text = property_type(&mut ctx.translator(), ty, prop.optional);
                stubs.push(StubDeclaration {
                    owner: owner.to_string(),
                    name,
                    is_static: member.is_static(),
                    kind: StubKind::Property,
                    tags: vec![Tag::typed("type", text), Visibility::from_modifiers(member.modifiers).tag()],
                    comments: member.leading_comments.clone(),
                    span: member.span,
                });
            }
            ClassMemberKind::Method(method)
                if method.body.is_none() && member.modifiers.contains(ModifierFlags::ABSTRACT) =>
            {
                let Some(name) = stub_name(ctx, owner, &method.name, member.span) else {
                    continue;
                };
                let signature = signature_tags(ctx, member.id, &method.parameters, true, true);
                let parameters = signature.parameter_names;
                let mut tags = Vec::with_capacity(signature.tags.len() + 2);
                if is_abstract_class {
                    tags.push(Tag::new("abstract"));
                }
                tags.push(Visibility::from_modifiers(member.modifiers).tag());
                tags.extend(signature.tags);
                stubs.push(StubDeclaration {
                    owner: owner.to_string(),
                    name,
                    is_static: member.is_static(),
                    kind: StubKind::Method { parameters },
                    tags,
                    comments: member.leading_comments.clone(),
                    span: member.span,
                });
            }
            _ => {}
        }
    }
    stubs
}

pub fn interface_stubs(ctx: &mut FileContext<'_>, iface: &InterfaceDeclaration) -> Vec<StubDeclaration> {
    let owner = iface.name.name.clone();
    let mut stubs = Vec::new();
    for member in &iface.members {
        match &member.kind {
            InterfaceMemberKind::Property { name, optional, .. } => {
                let Some(ty) = ctx.checker.type_of_node(member.id) else {
                    trace!(interface = %owner, "interface property without type, no stub");
                    continue;
                };
                let Some(name) = stub_name(ctx, &owner, name, member.span) else {
                    continue;
                };
                let text = property_type(&mut ctx.translator(), ty, *optional);
                stubs.push(StubDeclaration {
                    owner: owner.clone(),
                    name,
                    is_static: false,
                    kind: StubKind::Property,
                    tags: vec![Tag::typed("type", text), Visibility::Public.tag()],
                    comments: member.leading_comments.clone(),
                    span: member.span,
                });
            }
            InterfaceMemberKind::Method { name, parameters, .. } => {
                let Some(name) = stub_name(ctx, &owner, name, member.span) else {
                    continue;
                };
                let signature = signature_tags(ctx, member.id, parameters, true, true);
                let parameters = signature.parameter_names;
                let mut tags = vec![Visibility::Public.tag()];
                tags.extend(signature.tags);
                stubs.push(StubDeclaration {
                    owner: owner.clone(),
                    name,
                    is_static: false,
                    kind: StubKind::Method { parameters },
                    tags,
                    comments: member.leading_comments.clone(),
                    span: member.span,
                });
            }
            InterfaceMemberKind::Signature { .. } => {}
        }
    }
    stubs
}

#[cfg(test)]
#[path = "../tests/stubs.rs"]
mod tests;
