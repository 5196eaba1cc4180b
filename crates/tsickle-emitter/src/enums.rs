//! Enum handling shared by the annotation pass and lowering.
//!
//! - the const enum policy (one per compilation, from `preserveConstEnums`)
//! - member value computation (checker constants, auto-increment, computed)
//! - inlining of const enum member references as `0 /* E.A */`
//! - the Closure object-enum form used when annotating

use crate::diagnostics::FileDiagnostics;
use crate::error::{Result, TransformError};
use crate::jsdoc::{self, Tag};
use crate::type_translator::is_identifier;
use tracing::debug;
use tsickle_common::{CompilerOptions, Span};
use tsickle_program::ast::{
    Comment, ConstantValue, EnumDeclaration, Expression, ExpressionKind, ModifierFlags,
    Identifier, ObjectLiteral, ObjectProperty, PropertyName, SourceFile, StringLiteral,
    VariableDeclaration, VariableStatement, format_number,
};
use tsickle_program::visit::{VisitMut, walk_expression};
use tsickle_program::{Statement, StatementKind, SymbolFlags, SymbolId, TypeChecker, VarKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstEnumPolicy {
    /// No runtime object; re-exports dropped; uses inlined.
    Inline,
    /// Lowered like ordinary enums; re-exports kept; uses still inlined.
    Preserve,
}

impl ConstEnumPolicy {
    pub fn from_options(options: &CompilerOptions) -> Self {
        if options.preserve_const_enums {
            Self::Preserve
        } else {
            Self::Inline
        }
    }

    pub fn keeps_declarations(self) -> bool {
        self == Self::Preserve
    }

    /// Whether a declaration produces output under this policy.
    pub fn emits(self, decl: &EnumDeclaration) -> bool {
        !decl.is_const() || self.keeps_declarations()
    }
}

/// Whether `symbol` (through aliases) is a const enum.
pub fn is_const_enum_symbol(checker: &dyn TypeChecker, symbol: SymbolId) -> bool {
    let resolved = checker.resolve_alias(symbol);
    checker.get_symbol(resolved).is_some_and(|s| s.is_const_enum())
}

// =============================================================================
// Member values
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum EnumValue {
    Number(String),
    String(String),
    /// Non-constant initializer.
    Computed(Expression),
}

impl EnumValue {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::String(_))
    }
}

/// Name and value of every member, in declaration order.
pub fn member_values(decl: &EnumDeclaration, checker: &dyn TypeChecker) -> Result<Vec<(String, EnumValue)>> {
    let mut values = Vec::with_capacity(decl.members.len());
    let mut next: Option<f64> = Some(0.0);
    for member in &decl.members {
        let Some(name) = member.name.static_text() else {
            return Err(TransformError::ComputedEnumMember {
                enum_name: decl.name.name.clone(),
            });
        };
        let value = match checker.constant_value(member.id) {
            Some(ConstantValue::Number(n)) => {
                next = Some(n + 1.0);
                EnumValue::Number(format_number(n))
            }
            Some(ConstantValue::String(s)) => {
                next = None;
                EnumValue::String(s)
            }
            None => match (&member.initializer, next) {
                (Some(init), _) => {
                    next = literal_number(init).map(|n| n + 1.0);
                    match &init.kind {
                        ExpressionKind::String(lit) => EnumValue::String(lit.value.clone()),
                        _ => literal_number(init)
                            .map_or_else(|| EnumValue::Computed(init.clone()), |n| EnumValue::Number(format_number(n))),
                    }
                }
                (None, Some(n)) => {
                    next = Some(n + 1.0);
                    EnumValue::Number(format_number(n))
                }
                (None, None) => {
                    return Err(TransformError::unsupported(
                        format!("enum member '{}.{name}' without an initializer after a non-numeric member", decl.name.name),
                        "enum declarations",
                    ));
                }
            },
        };
        values.push((name.to_string(), value));
    }
    Ok(values)
}

fn literal_number(expr: &Expression) -> Option<f64> {
    match &expr.kind {
        ExpressionKind::Numeric(text) => text.parse().ok(),
        ExpressionKind::Unary {
            operator,
            operand,
            prefix: true,
        } if operator == "-" => literal_number(operand).map(|n| -n),
        ExpressionKind::Paren(inner) => literal_number(inner),
        _ => None,
    }
}

// =============================================================================
// Const enum inlining
// =============================================================================

struct ConstEnumInliner<'a> {
    checker: &'a dyn TypeChecker,
    inlined: usize,
}

impl ConstEnumInliner<'_> {
    fn is_const_enum_member(&self, expr: &Expression) -> bool {
        let Some(symbol) = self.checker.symbol_of_node(expr.id) else {
            return false;
        };
        let symbol = self.checker.resolve_alias(symbol);
        let Some(member) = self.checker.get_symbol(symbol) else {
            return false;
        };
        member.flags.contains(SymbolFlags::ENUM_MEMBER)
            && member
                .parent
                .is_some_and(|parent| is_const_enum_symbol(self.checker, parent))
    }
}

impl VisitMut for ConstEnumInliner<'_> {
    fn visit_expression(&mut self, expr: &mut Expression) {
        let reference = match &expr.kind {
            ExpressionKind::PropertyAccess { .. } => expr.entity_name(),
            ExpressionKind::ElementAccess { expression, argument } => match &argument.kind {
                ExpressionKind::String(lit) => expression
                    .entity_name()
                    .map(|base| format!("{base}[\"{}\"]", lit.value)),
                _ => None,
            },
            _ => None,
        };
        if let Some(reference) = reference
            && self.is_const_enum_member(expr)
            && let Some(value) = self.checker.constant_value(expr.id)
        {
            expr.kind = ExpressionKind::InlinedConstant {
                value,
                comment: reference,
            };
            self.inlined += 1;
            return;
        }
        walk_expression(self, expr);
    }
}

/// Replace references to const enum members with their values.
pub fn inline_const_enum_references(file: &mut SourceFile, checker: &dyn TypeChecker) -> usize {
    let mut inliner = ConstEnumInliner { checker, inlined: 0 };
    inliner.visit_source_file(file);
    if inliner.inlined > 0 {
        debug!(file = %file.file_name, count = inliner.inlined, "inlined const enum references");
    }
    inliner.inlined
}

// =============================================================================
// Closure enums
// =============================================================================

/// `/** @enum {T} */ const E = {A: 0, ...};` followed by a reverse mapping
/// `E[E.A] = 'A';` per numeric member. `comments` are the declaration's
/// leading comments (user JSDoc is merged into the `@enum` comment).
pub fn closure_enum(
    decl: &EnumDeclaration,
    values: &[(String, EnumValue)],
    mut comments: Vec<Comment>,
    export: bool,
    diagnostics: &mut FileDiagnostics,
    span: Span,
) -> Vec<Statement> {
    let name = &decl.name.name;
    let enum_type = if values.iter().all(|(_, v)| v.is_numeric()) {
        "number"
    } else if values.iter().all(|(_, v)| matches!(v, EnumValue::String(_))) {
        "string"
    } else {
        "?"
    };
    jsdoc::attach(&mut comments, vec![Tag::typed("enum", enum_type)], diagnostics, span);

    let properties = values
        .iter()
        .map(|(member, value)| ObjectProperty::Assignment {
            name: if is_identifier(member) {
                PropertyName::ident(member.clone())
            } else {
                PropertyName::String(StringLiteral::new(member.clone()))
            },
            value: match value {
                EnumValue::Number(n) => Expression::numeric(n.clone()),
                EnumValue::String(s) => Expression::synthetic(ExpressionKind::String(StringLiteral::new(s.clone()))),
                EnumValue::Computed(expr) => expr.clone(),
            },
        })
        .collect::<Vec<_>>();
    let multi_line = !properties.is_empty();

    let declaration = Statement {
        leading_comments: comments,
        ..Statement::synthetic(StatementKind::Variable(VariableStatement {
            modifiers: if export { ModifierFlags::EXPORT } else { ModifierFlags::empty() },
            kind: VarKind::Const,
            declarations: vec![VariableDeclaration {
                name: Identifier::synthetic(name.clone()),
                type_annotation: None,
                initializer: Some(Expression::synthetic(ExpressionKind::Object(ObjectLiteral {
                    properties,
                    multi_line,
                }))),
            }],
        }))
    };

    let mut out = vec![declaration];
    for (member, value) in values {
        if !value.is_numeric() {
            continue;
        }
        let member_ref = member_access(name, member);
        let reverse = Expression::assign(
            Expression::synthetic(ExpressionKind::ElementAccess {
                expression: Box::new(Expression::ident(name.clone())),
                argument: Box::new(member_ref),
            }),
            Expression::string(member.clone()),
        );
        out.push(Statement::expression(reverse));
    }
    out
}

/// `E.A`, or `E["a-b"]` for names that are not identifiers.
pub fn member_access(enum_name: &str, member: &str) -> Expression {
    if is_identifier(member) {
        Expression::property(Expression::ident(enum_name), member)
    } else {
        Expression::synthetic(ExpressionKind::ElementAccess {
            expression: Box::new(Expression::ident(enum_name)),
            argument: Box::new(Expression::synthetic(ExpressionKind::String(StringLiteral::double(member)))),
        })
    }
}

#[cfg(test)]
#[path = "../tests/enums.rs"]
mod tests;
