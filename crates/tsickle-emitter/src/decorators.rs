//! Decorator lowering.
//!
//! Decorators are removed from declarations and replaced by statements after
//! the class. Every decorator becomes its own `tslib_1.__decorate` call,
//! closest decorator first, members before the class and parameter
//! decorators before the member's own:
//!
//! ```text
//! tslib_1.__decorate([tslib_1.__param(0, Inject())], X.prototype, "m", null);
//! tslib_1.__decorate([Input()], X.prototype, "m", null);
//! X = tslib_1.__decorate([Component()], X);
//! ```
//!
//! With `transform_decorators`, decorators whose symbol carries the
//! `@Annotation` JSDoc tag are turned into static class metadata instead
//! (`X.decorators`, `X.ctorParameters`, `X.propDecorators`).

use crate::error::{Result, TransformError};
use crate::jsdoc::{self, Tag};
use tracing::debug;
use tsickle_program::ast::{
    ArrowBody, ArrowFunction, ClassDeclaration, ClassMember, ClassMemberKind, Decorator,
    Expression, ExpressionKind, ObjectLiteral, ObjectProperty, Parameter, PropertyName,
    SourceFile, StringLiteral,
};
use tsickle_program::{Statement, StatementKind, TypeChecker};

pub const TSLIB: &str = "tslib_1";

const ANNOTATION_TYPE: &str = "{type: !Function, args: (undefined|!Array<?>)}";

fn helper(name: &str) -> Expression {
    Expression::property(Expression::ident(TSLIB), name)
}

fn double_quoted(value: &str) -> Expression {
    Expression::synthetic(ExpressionKind::String(StringLiteral::double(value)))
}

fn array(items: Vec<Expression>) -> Expression {
    Expression::synthetic(ExpressionKind::Array(items))
}

fn object(properties: Vec<ObjectProperty>, multi_line: bool) -> Expression {
    Expression::synthetic(ExpressionKind::Object(ObjectLiteral { properties, multi_line }))
}

fn init(name: impl Into<String>, value: Expression) -> ObjectProperty {
    ObjectProperty::Assignment {
        name: PropertyName::ident(name),
        value,
    }
}

pub struct DecoratorLowering<'a> {
    checker: &'a dyn TypeChecker,
    /// Turn `@Annotation` decorators into metadata.
    annotations: bool,
    /// Exported classes are reassigned through `exports.X = X = ...`.
    commonjs: bool,
    lowered: usize,
}

impl<'a> DecoratorLowering<'a> {
    pub fn new(checker: &'a dyn TypeChecker, annotations: bool, commonjs: bool) -> Self {
        Self {
            checker,
            annotations,
            commonjs,
            lowered: 0,
        }
    }

    /// Lower the decorators of every class in `file`, returning how many
    /// decorators were removed.
    pub fn run(mut self, file: &mut SourceFile) -> Result<usize> {
        let statements = std::mem::take(&mut file.statements);
        file.statements = self.lower_statements(statements)?;
        if self.lowered > 0 {
            debug!(file = %file.file_name, decorators = self.lowered, "lowered decorators");
        }
        Ok(self.lowered)
    }

    fn lower_statements(&mut self, statements: Vec<Statement>) -> Result<Vec<Statement>> {
        let mut out = Vec::with_capacity(statements.len());
        for mut stmt in statements {
            let after = match &mut stmt.kind {
                StatementKind::Class(class) if has_decorators(class) => self.lower_class(class)?,
                StatementKind::Module(module) => {
                    if let Some(body) = module.body.take() {
                        module.body = Some(self.lower_statements(body)?);
                    }
                    Vec::new()
                }
                _ => Vec::new(),
            };
            out.push(stmt);
            out.extend(after);
        }
        Ok(out)
    }

    fn is_annotation(&self, decorator: &Decorator) -> bool {
        if !self.annotations {
            return false;
        }
        let target = match &decorator.expression.kind {
            ExpressionKind::Call { callee, .. } => callee.as_ref(),
            _ => &decorator.expression,
        };
        self.checker
            .symbol_of_node(target.id)
            .map(|sym| self.checker.resolve_alias(sym))
            .and_then(|sym| self.checker.get_symbol(sym))
            .is_some_and(|sym| sym.has_jsdoc_tag("Annotation"))
    }

    /// Split `decorators` into the ones lowered to `__decorate` calls and the
    /// annotations kept as metadata.
    fn partition(&self, decorators: Vec<Decorator>) -> (Vec<Decorator>, Vec<Decorator>) {
        decorators.into_iter().partition(|d| !self.is_annotation(d))
    }

    fn lower_class(&mut self, class: &mut ClassDeclaration) -> Result<Vec<Statement>> {
        let Some(class_name) = class.name.as_ref().map(|n| n.name.clone()) else {
            return Err(TransformError::unsupported(
                "decorators on an anonymous class",
                "decorator lowering",
            ));
        };
        let exported = class.modifiers.is_exported();
        let mut out = Vec::new();
        let mut prop_decorators: Vec<(String, Vec<Decorator>)> = Vec::new();
        let mut ctor_parameters: Option<Vec<(Parameter, Vec<Decorator>)>> = None;
        let mut ctor_param_calls = Vec::new();

        for member in &mut class.members {
            if let ClassMemberKind::Constructor(ctor) = &mut member.kind {
                if ctor.body.is_none() {
                    continue;
                }
                let mut params = Vec::with_capacity(ctor.parameters.len());
                for (index, param) in ctor.parameters.iter_mut().enumerate() {
                    let (calls, annotations) = self.partition(std::mem::take(&mut param.decorators));
                    self.lowered += calls.len() + annotations.len();
                    for decorator in calls.into_iter().rev() {
                        ctor_param_calls.push(param_call(index, decorator));
                    }
                    params.push((param.clone(), annotations));
                }
                ctor_parameters = Some(params);
                continue;
            }
            out.extend(self.lower_member(&class_name, member, &mut prop_decorators)?);
        }

        let (calls, annotations) = self.partition(std::mem::take(&mut class.decorators));
        self.lowered += calls.len() + annotations.len();
        let class_calls: Vec<Expression> = ctor_param_calls
            .into_iter()
            .chain(calls.into_iter().rev().map(|d| d.expression))
            .collect();
        for decorator in class_calls {
            let call = Expression::call(
                helper("__decorate"),
                vec![array(vec![decorator]), Expression::ident(class_name.clone())],
            );
            let mut assignment = Expression::assign(Expression::ident(class_name.clone()), call);
            if exported && self.commonjs {
                assignment = Expression::assign(
                    Expression::property(Expression::ident("exports"), class_name.clone()),
                    assignment,
                );
            }
            out.push(Statement::expression(assignment));
        }

        if !annotations.is_empty() {
            out.push(metadata_statement(
                &class_name,
                "decorators",
                array(annotations.iter().map(annotation_object).collect()),
                Tag::typed("type", format!("!Array<{ANNOTATION_TYPE}>")),
            ));
        }
        let has_annotations = !annotations.is_empty()
            || !prop_decorators.is_empty()
            || ctor_parameters
                .as_ref()
                .is_some_and(|params| params.iter().any(|(_, a)| !a.is_empty()));
        if has_annotations && let Some(params) = ctor_parameters {
            out.push(self.ctor_parameters(&class_name, &params));
        }
        if !prop_decorators.is_empty() {
            let properties = prop_decorators
                .iter()
                .map(|(name, decorators)| ObjectProperty::Assignment {
                    name: property_key(name),
                    value: array(decorators.iter().map(annotation_object).collect()),
                })
                .collect();
            out.push(metadata_statement(
                &class_name,
                "propDecorators",
                object(properties, true),
                Tag::typed("type", format!("!Object<string,!Array<{ANNOTATION_TYPE}>>")),
            ));
        }
        Ok(out)
    }

    fn lower_member(
        &mut self,
        class_name: &str,
        member: &mut ClassMember,
        prop_decorators: &mut Vec<(String, Vec<Decorator>)>,
    ) -> Result<Vec<Statement>> {
        let parameters: Option<&mut Vec<Parameter>> = match &mut member.kind {
            ClassMemberKind::Method(method) => Some(&mut method.parameters),
            ClassMemberKind::SetAccessor(accessor) => Some(&mut accessor.parameters),
            _ => None,
        };
        let mut param_calls = Vec::new();
        if let Some(parameters) = parameters {
            for (index, param) in parameters.iter_mut().enumerate() {
                let decorators = std::mem::take(&mut param.decorators);
                self.lowered += decorators.len();
                for decorator in decorators.into_iter().rev() {
                    param_calls.push(param_call(index, decorator));
                }
            }
        }
        let (calls, annotations) = self.partition(std::mem::take(&mut member.decorators));
        self.lowered += calls.len() + annotations.len();
        if param_calls.is_empty() && calls.is_empty() && annotations.is_empty() {
            return Ok(Vec::new());
        }

        let Some(key) = member.name().and_then(PropertyName::static_text).map(str::to_string) else {
            return Err(TransformError::unsupported(
                "decorators on a member with a computed name",
                "decorator lowering",
            ));
        };
        if !annotations.is_empty() {
            prop_decorators.push((key.clone(), annotations));
        }

        let target = if member.is_static() {
            Expression::ident(class_name)
        } else {
            Expression::property(Expression::ident(class_name), "prototype")
        };
        let descriptor = match member.kind {
            ClassMemberKind::Property(_) => Expression::synthetic(ExpressionKind::Unary {
                operator: "void".to_string(),
                operand: Box::new(Expression::numeric("0")),
                prefix: true,
            }),
            _ => Expression::synthetic(ExpressionKind::Null),
        };
        let statements = param_calls
            .into_iter()
            .chain(calls.into_iter().rev().map(|d| d.expression))
            .map(|decorator| {
                Statement::expression(Expression::call(
                    helper("__decorate"),
                    vec![array(vec![decorator]), target.clone(), double_quoted(&key), descriptor.clone()],
                ))
            })
            .collect();
        Ok(statements)
    }

    /// `X.ctorParameters = () => [{ type: T, decorators: [...] }, ...];`
    fn ctor_parameters(&self, class_name: &str, params: &[(Parameter, Vec<Decorator>)]) -> Statement {
        let entries = params
            .iter()
            .map(|(param, annotations)| {
                let mut properties = vec![init("type", self.parameter_type_value(param))];
                if !annotations.is_empty() {
                    properties.push(init(
                        "decorators",
                        array(annotations.iter().map(annotation_object).collect()),
                    ));
                }
                object(properties, false)
            })
            .collect();
        let arrow = Expression::synthetic(ExpressionKind::Arrow(Box::new(ArrowFunction {
            parameters: Vec::new(),
            return_type: None,
            body: ArrowBody::Expression(array(entries)),
            is_async: false,
        })));
        metadata_statement(class_name, "ctorParameters", arrow, Tag::new("nocollapse"))
    }

    /// The parameter's type as a value, when it names one.
    fn parameter_type_value(&self, param: &Parameter) -> Expression {
        let undefined = Expression::ident("undefined");
        let Some(annotation) = &param.type_annotation else {
            return undefined;
        };
        if !annotation.is_entity_name() {
            return undefined;
        }
        let is_value = self
            .checker
            .symbol_of_node(annotation.id)
            .map(|sym| self.checker.resolve_alias(sym))
            .and_then(|sym| self.checker.get_symbol(sym))
            .is_some_and(|sym| sym.is_value());
        if !is_value {
            return undefined;
        }
        match annotation.text.split_once('.') {
            // Keep the node id so imported names are rewritten like any
            // other value reference.
            None => Expression::new(annotation.id, ExpressionKind::Identifier(annotation.text.clone())),
            Some(_) => Expression::dotted(&annotation.text),
        }
    }
}

fn has_decorators(class: &ClassDeclaration) -> bool {
    let params_decorated = |params: &[Parameter]| params.iter().any(|p| !p.decorators.is_empty());
    !class.decorators.is_empty()
        || class.members.iter().any(|member| {
            !member.decorators.is_empty()
                || match &member.kind {
                    ClassMemberKind::Constructor(ctor) => params_decorated(&ctor.parameters),
                    ClassMemberKind::Method(method) => params_decorated(&method.parameters),
                    ClassMemberKind::SetAccessor(accessor) => params_decorated(&accessor.parameters),
                    _ => false,
                }
        })
}

/// `tslib_1.__param(i, d)`
fn param_call(index: usize, decorator: Decorator) -> Expression {
    Expression::call(
        helper("__param"),
        vec![Expression::numeric(index.to_string()), decorator.expression],
    )
}

/// `{ type: Foo, args: [a, b] }`
fn annotation_object(decorator: &Decorator) -> Expression {
    let (callee, arguments) = match &decorator.expression.kind {
        ExpressionKind::Call { callee, arguments } => ((**callee).clone(), Some(arguments.clone())),
        _ => (decorator.expression.clone(), None),
    };
    let mut properties = vec![init("type", callee)];
    if let Some(arguments) = arguments.filter(|args| !args.is_empty()) {
        properties.push(init("args", array(arguments)));
    }
    object(properties, false)
}

fn property_key(name: &str) -> PropertyName {
    if crate::type_translator::is_identifier(name) {
        PropertyName::ident(name)
    } else {
        PropertyName::String(StringLiteral::double(name))
    }
}

/// `/** <tag> */ X.<property> = <value>;`
fn metadata_statement(class_name: &str, property: &str, value: Expression, tag: Tag) -> Statement {
    let target = Expression::property(Expression::ident(class_name), property);
    Statement::expression(Expression::assign(target, value)).with_comment(jsdoc::to_comment(&[tag]))
}

#[cfg(test)]
#[path = "../tests/decorators.rs"]
mod tests;
