//! Class lowering.
//!
//! ES2015 output keeps the class syntax. Parameter properties and instance
//! field initializers move into the constructor (after the `super` call),
//! static initializers become assignments after the class. ES5 output uses
//! the constructor-function IIFE with the tslib `__extends` helper.

use super::{Es5ClassState, Lowering, Scope, comment_text, member_export};
use crate::decorators::TSLIB;
use crate::error::{Result, TransformError};
use crate::ir::{IRClassMember, IRClassMemberKind, IRMethodName, IRNode, IRParam, IRProperty, VarKeyword};
use indexmap::IndexMap;
use tsickle_program::Statement;
use tsickle_program::StatementKind;
use tsickle_program::ast::{
    AccessorDeclaration, Block, ClassDeclaration, ClassMember, ClassMemberKind, ConstructorDeclaration,
    ExpressionKind, ModifierFlags, PropertyName,
};

fn is_super_call_statement(stmt: &Statement) -> bool {
    matches!(&stmt.kind, StatementKind::Expression(expr)
        if matches!(&expr.kind, ExpressionKind::Call { callee, .. } if matches!(callee.kind, ExpressionKind::Super)))
}

fn is_super_call(node: &IRNode) -> bool {
    matches!(node, IRNode::ExpressionStatement(expr)
        if matches!(expr.as_ref(), IRNode::CallExpr { callee, .. } if matches!(callee.as_ref(), IRNode::Super)))
}

fn member_comments(member: &ClassMember) -> Vec<String> {
    member.leading_comments.iter().map(comment_text).collect()
}

/// `_super !== null && _super.apply(this, arguments) || this`
fn es5_default_super_call() -> IRNode {
    let apply = IRNode::call(
        IRNode::prop(IRNode::id("_super"), "apply"),
        vec![IRNode::This, IRNode::id("arguments")],
    );
    IRNode::binary(
        IRNode::binary(
            IRNode::binary(IRNode::id("_super"), "!==", IRNode::NullLiteral),
            "&&",
            apply,
        ),
        "||",
        IRNode::This,
    )
}

impl Lowering<'_, '_> {
    pub(super) fn lower_class_statement(
        &mut self,
        stmt: &Statement,
        class: &ClassDeclaration,
        scope: &Scope,
        exported: bool,
        out: &mut Vec<IRNode>,
    ) -> Result<()> {
        let default = class.modifiers.contains(ModifierFlags::DEFAULT);
        let owner = self.export_owner(scope, exported);
        let name = match (&class.name, &owner) {
            (Some(ident), _) => Some(ident.name.clone()),
            (None, Some(_)) => Some("default_1".to_string()),
            (None, None) => None,
        };
        if let Some(name) = &name {
            self.declare(name);
        }

        let (node, statics) = if self.ctx.es5() {
            let name = name.clone().unwrap_or_else(|| "default_1".to_string());
            (self.lower_class_es5(class, &name)?, Vec::new())
        } else {
            self.lower_class_es2015(class, name.as_deref())?
        };

        Self::push_comments(&stmt.leading_comments, out);
        match (owner, &name) {
            (Some(owner), Some(name)) => {
                out.push(node);
                if owner == "exports" {
                    let exported_name = if default { "default" } else { name.as_str() };
                    if !default {
                        self.export_names.insert(name.clone());
                    }
                    out.push(IRNode::expr_stmt(IRNode::assign(
                        IRNode::exports_prop(exported_name),
                        IRNode::id(name.clone()),
                    )));
                } else {
                    out.push(member_export(&owner, name));
                }
            }
            _ if exported => out.push(IRNode::Exported {
                is_default: default,
                declaration: Box::new(node),
            }),
            _ => out.push(node),
        }
        out.extend(statics);
        Ok(())
    }

    fn method_name(&mut self, name: &PropertyName) -> Result<IRMethodName> {
        Ok(match name {
            PropertyName::Identifier(ident) => IRMethodName::Identifier(ident.name.clone()),
            PropertyName::String(lit) => IRMethodName::StringLiteral(lit.value.clone()),
            PropertyName::Numeric(text) => IRMethodName::NumericLiteral(text.clone()),
            PropertyName::Computed(expr) => IRMethodName::Computed(Box::new(self.lower_expr(expr)?)),
            PropertyName::Private(text) => IRMethodName::Identifier(format!("#{text}")),
        })
    }

    /// `receiver.name`, or `receiver["name"]` for names that are not identifiers.
    fn member_target(&mut self, receiver: IRNode, name: &PropertyName) -> Result<IRNode> {
        Ok(match name {
            PropertyName::Identifier(ident) => IRNode::prop(receiver, ident.name.clone()),
            PropertyName::Private(text) => IRNode::prop(receiver, format!("#{text}")),
            PropertyName::String(lit) => IRNode::elem(receiver, IRNode::string(lit.value.clone())),
            PropertyName::Numeric(text) => IRNode::elem(receiver, IRNode::number(text.clone())),
            PropertyName::Computed(expr) => IRNode::elem(receiver, self.lower_expr(expr)?),
        })
    }

    fn this_node(&self) -> IRNode {
        if self.es5_class.this_alias {
            IRNode::id("_this")
        } else {
            IRNode::This
        }
    }

    /// `this.p = p;` per parameter property, then `this.x = init;` per
    /// instance field with an initializer.
    fn instance_initializers(&mut self, class: &ClassDeclaration) -> Result<Vec<IRNode>> {
        let mut inits = Vec::new();
        if let Some(ctor) = constructor_of(class) {
            for param in ctor.parameters.iter().filter(|p| p.is_parameter_property()) {
                inits.push(IRNode::expr_stmt(IRNode::assign(
                    IRNode::prop(self.this_node(), param.name.name.clone()),
                    IRNode::id(param.name.name.clone()),
                )));
            }
        }
        for member in &class.members {
            if member.is_static() {
                continue;
            }
            if let ClassMemberKind::Property(prop) = &member.kind
                && let Some(init) = &prop.initializer
            {
                let target = self.member_target(self.this_node(), &prop.name)?;
                inits.push(IRNode::expr_stmt(IRNode::assign(target, self.lower_expr(init)?)));
            }
        }
        Ok(inits)
    }

    /// `X.s = init;` per static field with an initializer, comments kept.
    fn static_initializers(&mut self, class: &ClassDeclaration, class_name: &str) -> Result<Vec<IRNode>> {
        let mut out = Vec::new();
        for member in class.members.iter().filter(|m| m.is_static()) {
            if let ClassMemberKind::Property(prop) = &member.kind
                && let Some(init) = &prop.initializer
            {
                Self::push_comments(&member.leading_comments, &mut out);
                let target = self.member_target(IRNode::id(class_name), &prop.name)?;
                out.push(IRNode::expr_stmt(IRNode::assign(target, self.lower_expr(init)?)));
            }
        }
        Ok(out)
    }

    // =========================================================================
    // ES2015
    // =========================================================================

    fn lower_class_es2015(&mut self, class: &ClassDeclaration, name: Option<&str>) -> Result<(IRNode, Vec<IRNode>)> {
        let extends = class
            .extends
            .as_ref()
            .map(|h| self.lower_expr(&h.expression))
            .transpose()?;
        let saved = std::mem::take(&mut self.es5_class);
        let result = self.es2015_members(class, extends.is_some());
        self.es5_class = saved;
        let members = result?;

        let statics = match name {
            Some(name) => self.static_initializers(class, name)?,
            None => Vec::new(),
        };
        Ok((
            IRNode::ClassDecl {
                name: name.map(str::to_string),
                extends: extends.map(Box::new),
                members,
            },
            statics,
        ))
    }

    fn es2015_members(&mut self, class: &ClassDeclaration, has_base: bool) -> Result<Vec<IRClassMember>> {
        let inits = self.instance_initializers(class)?;
        let mut members = Vec::with_capacity(class.members.len() + 1);
        if constructor_of(class).is_none() && !inits.is_empty() {
            let mut body = Vec::with_capacity(inits.len() + 1);
            if has_base {
                body.push(IRNode::expr_stmt(IRNode::call(
                    IRNode::Super,
                    vec![IRNode::SpreadElement(Box::new(IRNode::id("arguments")))],
                )));
            }
            body.extend(inits.iter().cloned());
            members.push(IRClassMember {
                comments: Vec::new(),
                kind: IRClassMemberKind::Constructor {
                    parameters: Vec::new(),
                    body,
                    multi_line: true,
                },
            });
        }

        for member in &class.members {
            let is_static = member.is_static();
            let kind = match &member.kind {
                ClassMemberKind::Constructor(ctor) => {
                    let Some(block) = &ctor.body else { continue };
                    let parameters = self.lower_params(&ctor.parameters)?;
                    let mut body = self.lower_block(block)?;
                    let at = body.iter().position(is_super_call).map_or(0, |idx| idx + 1);
                    body.splice(at..at, inits.iter().cloned());
                    IRClassMemberKind::Constructor {
                        parameters,
                        multi_line: block.multi_line || !inits.is_empty(),
                        body,
                    }
                }
                ClassMemberKind::Method(method) => {
                    let Some(block) = &method.body else { continue };
                    IRClassMemberKind::Method {
                        name: self.method_name(&method.name)?,
                        is_static,
                        is_async: member.modifiers.contains(ModifierFlags::ASYNC),
                        is_generator: method.is_generator,
                        parameters: self.lower_params(&method.parameters)?,
                        body: self.lower_block(block)?,
                        multi_line: block.multi_line,
                    }
                }
                ClassMemberKind::GetAccessor(accessor) => {
                    let Some(block) = &accessor.body else { continue };
                    IRClassMemberKind::Getter {
                        name: self.method_name(&accessor.name)?,
                        is_static,
                        body: self.lower_block(block)?,
                        multi_line: block.multi_line,
                    }
                }
                ClassMemberKind::SetAccessor(accessor) => {
                    let Some(block) = &accessor.body else { continue };
                    IRClassMemberKind::Setter {
                        name: self.method_name(&accessor.name)?,
                        is_static,
                        parameter: self.setter_parameter(accessor)?,
                        body: self.lower_block(block)?,
                        multi_line: block.multi_line,
                    }
                }
                ClassMemberKind::Property(_) => continue,
            };
            members.push(IRClassMember {
                comments: member_comments(member),
                kind,
            });
        }
        Ok(members)
    }

    fn setter_parameter(&mut self, accessor: &AccessorDeclaration) -> Result<IRParam> {
        self.lower_params(&accessor.parameters)?
            .into_iter()
            .next()
            .ok_or_else(|| TransformError::unsupported("setter without a parameter", "class lowering"))
    }

    // =========================================================================
    // ES5
    // =========================================================================

    fn lower_class_es5(&mut self, class: &ClassDeclaration, name: &str) -> Result<IRNode> {
        let base_class = class
            .extends
            .as_ref()
            .map(|h| self.lower_expr(&h.expression))
            .transpose()?;
        let saved = self.es5_class;
        self.es5_class = Es5ClassState {
            has_base: base_class.is_some(),
            ..Es5ClassState::default()
        };
        let body = self.es5_class_body(class, name);
        self.es5_class = saved;
        Ok(IRNode::ES5ClassIIFE {
            name: name.to_string(),
            base_class: base_class.map(Box::new),
            body: body?,
        })
    }

    fn es5_class_body(&mut self, class: &ClassDeclaration, name: &str) -> Result<Vec<IRNode>> {
        let mut body = Vec::new();
        if self.es5_class.has_base {
            body.push(IRNode::ExtendsHelper {
                helper: format!("{TSLIB}.__extends"),
                class_name: name.to_string(),
            });
        }

        let ctor = constructor_of(class);
        let (parameters, ctor_body) = match ctor {
            Some(ctor) => (self.lower_params(&ctor.parameters)?, ctor.body.as_ref()),
            None => (Vec::new(), None),
        };
        let statements = self.es5_constructor_body(class, ctor_body)?;
        let mut ctor_comments = Vec::new();
        if let Some(member) = class
            .members
            .iter()
            .find(|m| matches!(&m.kind, ClassMemberKind::Constructor(c) if c.body.is_some()))
        {
            ctor_comments = member_comments(member);
        }
        body.extend(ctor_comments.into_iter().map(IRNode::comment));
        body.push(IRNode::FunctionDecl {
            name: name.to_string(),
            parameters,
            multi_line: !statements.is_empty(),
            body: statements,
            is_async: false,
            is_generator: false,
        });

        // Accessor pairs share one defineProperty call.
        let mut accessors: IndexMap<(String, bool), (Option<IRNode>, Option<IRNode>)> = IndexMap::new();
        for member in &class.members {
            let is_static = member.is_static();
            self.es5_class.in_static = is_static;
            match &member.kind {
                ClassMemberKind::Method(method) => {
                    let Some(block) = &method.body else { continue };
                    let function = IRNode::FunctionExpr {
                        name: None,
                        parameters: self.lower_params(&method.parameters)?,
                        body: self.lower_block(block)?,
                        multi_line: block.multi_line,
                        is_async: member.modifiers.contains(ModifierFlags::ASYNC),
                        is_generator: method.is_generator,
                    };
                    let method_name = self.method_name(&method.name)?;
                    body.extend(member_comments(member).into_iter().map(IRNode::comment));
                    body.push(if is_static {
                        IRNode::StaticMethod {
                            class_name: name.to_string(),
                            method_name,
                            function: Box::new(function),
                        }
                    } else {
                        IRNode::PrototypeMethod {
                            class_name: name.to_string(),
                            method_name,
                            function: Box::new(function),
                        }
                    });
                }
                ClassMemberKind::GetAccessor(accessor) | ClassMemberKind::SetAccessor(accessor) => {
                    let Some(block) = &accessor.body else { continue };
                    let Some(key) = accessor.name.static_text() else {
                        return Err(TransformError::unsupported("computed accessor name", "ES5 class lowering"));
                    };
                    let is_getter = matches!(member.kind, ClassMemberKind::GetAccessor(_));
                    let parameters = if is_getter {
                        Vec::new()
                    } else {
                        vec![self.setter_parameter(accessor)?]
                    };
                    let function = IRNode::FunctionExpr {
                        name: None,
                        parameters,
                        body: self.lower_block(block)?,
                        multi_line: block.multi_line,
                        is_async: false,
                        is_generator: false,
                    };
                    let slot = accessors.entry((key.to_string(), is_static)).or_default();
                    if is_getter {
                        slot.0 = Some(function);
                    } else {
                        slot.1 = Some(function);
                    }
                }
                ClassMemberKind::Constructor(_) | ClassMemberKind::Property(_) => {}
            }
        }
        self.es5_class.in_static = false;

        for ((key, is_static), (getter, setter)) in accessors {
            let receiver = if is_static {
                IRNode::id(name)
            } else {
                IRNode::prop(IRNode::id(name), "prototype")
            };
            let mut properties = Vec::with_capacity(4);
            if let Some(getter) = getter {
                properties.push(IRProperty::init("get", getter));
            }
            if let Some(setter) = setter {
                properties.push(IRProperty::init("set", setter));
            }
            properties.push(IRProperty::init("enumerable", IRNode::BooleanLiteral(false)));
            properties.push(IRProperty::init("configurable", IRNode::BooleanLiteral(true)));
            body.push(IRNode::expr_stmt(IRNode::call(
                IRNode::prop(IRNode::id("Object"), "defineProperty"),
                vec![receiver, IRNode::string(key), IRNode::object(properties, true)],
            )));
        }

        body.extend(self.static_initializers(class, name)?);
        Ok(body)
    }

    /// Constructor statements. With a base class the `super(...)` call becomes
    /// `var _this = _super.call(this, ...) || this;`, later `this` references
    /// read `_this`, and `_this` is returned.
    fn es5_constructor_body(&mut self, class: &ClassDeclaration, ctor_body: Option<&Block>) -> Result<Vec<IRNode>> {
        self.declared.push(Default::default());
        let result = self.es5_constructor_statements(class, ctor_body);
        self.declared.pop();
        self.es5_class.this_alias = false;
        result
    }

    fn es5_constructor_statements(&mut self, class: &ClassDeclaration, ctor_body: Option<&Block>) -> Result<Vec<IRNode>> {
        let mut out = Vec::new();
        if !self.es5_class.has_base {
            out.extend(self.instance_initializers(class)?);
            if let Some(block) = ctor_body {
                self.lower_statements(&block.statements, &Scope::Local, &mut out)?;
            }
            return Ok(out);
        }

        let statements = ctor_body.map(|b| b.statements.as_slice()).unwrap_or_default();
        let super_call = statements.iter().position(is_super_call_statement);
        match super_call {
            Some(idx) => {
                self.lower_statements(&statements[..idx], &Scope::Local, &mut out)?;
                let StatementKind::Expression(call) = &statements[idx].kind else {
                    return Err(TransformError::unsupported("super call", "ES5 class lowering"));
                };
                let ExpressionKind::Call { arguments, .. } = &call.kind else {
                    return Err(TransformError::unsupported("super call", "ES5 class lowering"));
                };
                let mut args = vec![IRNode::This];
                args.extend(self.lower_exprs(arguments)?);
                let init = IRNode::binary(
                    IRNode::call(IRNode::prop(IRNode::id("_super"), "call"), args),
                    "||",
                    IRNode::This,
                );
                out.push(IRNode::var_decl(VarKeyword::Var, "_this", Some(init)));
                self.es5_class.this_alias = true;
                out.extend(self.instance_initializers(class)?);
                self.lower_statements(&statements[idx + 1..], &Scope::Local, &mut out)?;
            }
            None if ctor_body.is_some() => {
                return Err(TransformError::unsupported(
                    "derived constructor without a top-level super call",
                    "ES5 class lowering",
                ));
            }
            None => {
                self.es5_class.this_alias = true;
                let inits = self.instance_initializers(class)?;
                if inits.is_empty() {
                    out.push(IRNode::ret(Some(es5_default_super_call())));
                    return Ok(out);
                }
                out.push(IRNode::var_decl(VarKeyword::Var, "_this", Some(es5_default_super_call())));
                out.extend(inits);
            }
        }
        out.push(IRNode::ret(Some(IRNode::id("_this"))));
        Ok(out)
    }
}

/// The implementation constructor (the one with a body).
fn constructor_of(class: &ClassDeclaration) -> Option<&ConstructorDeclaration> {
    class.members.iter().find_map(|m| match &m.kind {
        ClassMemberKind::Constructor(ctor) if ctor.body.is_some() => Some(ctor),
        _ => None,
    })
}
