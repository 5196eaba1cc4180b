//! Mutable AST traversal.
//!
//! Implement [`VisitMut`] and override the hooks you care about; call the
//! matching `walk_*` function from an override to keep descending.

use crate::ast::{
    ArrowBody, Block, ClassMember, ClassMemberKind, Expression, ExpressionKind, ModuleReference,
    ObjectProperty, Parameter, PropertyName, SourceFile, Statement, StatementKind,
};

pub trait VisitMut {
    fn visit_source_file(&mut self, file: &mut SourceFile) {
        walk_source_file(self, file);
    }

    fn visit_statement(&mut self, stmt: &mut Statement) {
        walk_statement(self, stmt);
    }

    fn visit_class_member(&mut self, member: &mut ClassMember) {
        walk_class_member(self, member);
    }

    fn visit_parameter(&mut self, param: &mut Parameter) {
        walk_parameter(self, param);
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        walk_expression(self, expr);
    }
}

pub fn walk_source_file<V: VisitMut + ?Sized>(v: &mut V, file: &mut SourceFile) {
    for stmt in &mut file.statements {
        v.visit_statement(stmt);
    }
}

pub fn walk_block<V: VisitMut + ?Sized>(v: &mut V, block: &mut Block) {
    for stmt in &mut block.statements {
        v.visit_statement(stmt);
    }
}

pub fn walk_statement<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Statement) {
    match &mut stmt.kind {
        StatementKind::Import(_) | StatementKind::Export(_) => {}
        StatementKind::ImportEquals(decl) => {
            if let ModuleReference::Entity(expr) = &mut decl.reference {
                v.visit_expression(expr);
            }
        }
        StatementKind::ExportAssignment(assign) => v.visit_expression(&mut assign.expression),
        StatementKind::Variable(var) => {
            for decl in &mut var.declarations {
                if let Some(init) = &mut decl.initializer {
                    v.visit_expression(init);
                }
            }
        }
        StatementKind::Function(func) => {
            for param in &mut func.parameters {
                v.visit_parameter(param);
            }
            if let Some(body) = &mut func.body {
                walk_block(v, body);
            }
        }
        StatementKind::Class(class) => {
            for decorator in &mut class.decorators {
                v.visit_expression(&mut decorator.expression);
            }
            if let Some(heritage) = &mut class.extends {
                v.visit_expression(&mut heritage.expression);
            }
            for member in &mut class.members {
                v.visit_class_member(member);
            }
        }
        StatementKind::Interface(_) | StatementKind::TypeAlias(_) | StatementKind::Empty => {}
        StatementKind::Enum(decl) => {
            for member in &mut decl.members {
                if let Some(init) = &mut member.initializer {
                    v.visit_expression(init);
                }
            }
        }
        StatementKind::Module(decl) => {
            if let Some(body) = &mut decl.body {
                for stmt in body {
                    v.visit_statement(stmt);
                }
            }
        }
        StatementKind::Expression(expr) | StatementKind::Throw(expr) => v.visit_expression(expr),
        StatementKind::Return(expr) => {
            if let Some(expr) = expr {
                v.visit_expression(expr);
            }
        }
        StatementKind::If(if_stmt) => {
            v.visit_expression(&mut if_stmt.condition);
            v.visit_statement(&mut if_stmt.then_branch);
            if let Some(else_branch) = &mut if_stmt.else_branch {
                v.visit_statement(else_branch);
            }
        }
        StatementKind::Block(block) => walk_block(v, block),
    }
}

pub fn walk_class_member<V: VisitMut + ?Sized>(v: &mut V, member: &mut ClassMember) {
    for decorator in &mut member.decorators {
        v.visit_expression(&mut decorator.expression);
    }
    let (params, body) = match &mut member.kind {
        ClassMemberKind::Constructor(ctor) => (&mut ctor.parameters, ctor.body.as_mut()),
        ClassMemberKind::Method(method) => {
            visit_property_name(v, &mut method.name);
            (&mut method.parameters, method.body.as_mut())
        }
        ClassMemberKind::GetAccessor(accessor) | ClassMemberKind::SetAccessor(accessor) => {
            visit_property_name(v, &mut accessor.name);
            (&mut accessor.parameters, accessor.body.as_mut())
        }
        ClassMemberKind::Property(prop) => {
            visit_property_name(v, &mut prop.name);
            if let Some(init) = &mut prop.initializer {
                v.visit_expression(init);
            }
            return;
        }
    };
    for param in params {
        v.visit_parameter(param);
    }
    if let Some(body) = body {
        walk_block(v, body);
    }
}

pub fn walk_parameter<V: VisitMut + ?Sized>(v: &mut V, param: &mut Parameter) {
    for decorator in &mut param.decorators {
        v.visit_expression(&mut decorator.expression);
    }
    if let Some(init) = &mut param.initializer {
        v.visit_expression(init);
    }
}

fn visit_property_name<V: VisitMut + ?Sized>(v: &mut V, name: &mut PropertyName) {
    if let PropertyName::Computed(expr) = name {
        v.visit_expression(expr);
    }
}

pub fn walk_expression<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expression) {
    match &mut expr.kind {
        ExpressionKind::Identifier(_)
        | ExpressionKind::This
        | ExpressionKind::Super
        | ExpressionKind::Null
        | ExpressionKind::Boolean(_)
        | ExpressionKind::Numeric(_)
        | ExpressionKind::String(_)
        | ExpressionKind::Template(_)
        | ExpressionKind::RegExp(_)
        | ExpressionKind::InlinedConstant { .. } => {}
        ExpressionKind::Array(elements) => {
            for element in elements {
                v.visit_expression(element);
            }
        }
        ExpressionKind::Object(object) => {
            for prop in &mut object.properties {
                match prop {
                    ObjectProperty::Assignment { name, value } => {
                        visit_property_name(v, name);
                        v.visit_expression(value);
                    }
                    ObjectProperty::Shorthand(_) => {}
                    ObjectProperty::Spread(inner) => v.visit_expression(inner),
                }
            }
        }
        ExpressionKind::PropertyAccess { expression, .. } => v.visit_expression(expression),
        ExpressionKind::ElementAccess {
            expression,
            argument,
        } => {
            v.visit_expression(expression);
            v.visit_expression(argument);
        }
        ExpressionKind::Call { callee, arguments } | ExpressionKind::New { callee, arguments } => {
            v.visit_expression(callee);
            for arg in arguments {
                v.visit_expression(arg);
            }
        }
        ExpressionKind::Unary { operand, .. } => v.visit_expression(operand),
        ExpressionKind::Binary { left, right, .. } => {
            v.visit_expression(left);
            v.visit_expression(right);
        }
        ExpressionKind::Conditional {
            condition,
            when_true,
            when_false,
        } => {
            v.visit_expression(condition);
            v.visit_expression(when_true);
            v.visit_expression(when_false);
        }
        ExpressionKind::Function(func) => {
            for param in &mut func.parameters {
                v.visit_parameter(param);
            }
            walk_block(v, &mut func.body);
        }
        ExpressionKind::Arrow(arrow) => {
            for param in &mut arrow.parameters {
                v.visit_parameter(param);
            }
            match &mut arrow.body {
                ArrowBody::Expression(body) => v.visit_expression(body),
                ArrowBody::Block(block) => walk_block(v, block),
            }
        }
        ExpressionKind::Paren(inner)
        | ExpressionKind::NonNull(inner)
        | ExpressionKind::Spread(inner) => v.visit_expression(inner),
        ExpressionKind::TypeAssertion { expression, .. }
        | ExpressionKind::JsDocCast { expression, .. } => v.visit_expression(expression),
    }
}
