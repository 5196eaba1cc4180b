//! Enum and namespace IIFEs.

use super::{Lowering, Scope};
use crate::enums::{EnumValue, member_values};
use crate::ir::{EnumMember, EnumMemberValue, IRNode, VarKeyword};
use rustc_hash::FxHashSet;
use tracing::trace;
use tsickle_program::ast::{Comment, EnumDeclaration, ModuleDeclaration, ModuleName};

impl Lowering<'_, '_> {
    /// `var` at the top level and in ES5 output, `let` in nested scopes.
    fn iife_keyword(&self, scope: &Scope) -> VarKeyword {
        if *scope == Scope::File || self.ctx.es5() {
            VarKeyword::Var
        } else {
            VarKeyword::Let
        }
    }

    /// Wrap an IIFE for an exported declaration: ES module output exports the
    /// leading `var`, the other forms pass the owner through `export_target`.
    fn export_iife(&mut self, node: IRNode, name: &str, scope: &Scope, exported: bool) -> IRNode {
        if exported && *scope == Scope::File && !self.ctx.is_commonjs() && iife_declares(&node) {
            return IRNode::Exported {
                is_default: false,
                declaration: Box::new(node),
            };
        }
        if matches!(self.export_owner(scope, exported).as_deref(), Some("exports")) {
            self.export_names.insert(name.to_string());
        }
        node
    }

    pub(super) fn lower_enum_statement(
        &mut self,
        decl: &EnumDeclaration,
        comments: &[Comment],
        scope: &Scope,
        exported: bool,
        out: &mut Vec<IRNode>,
    ) -> crate::error::Result<()> {
        if !self.ctx.const_enums.emits(decl) {
            trace!(name = %decl.name.name, "const enum erased");
            return Ok(());
        }
        let name = decl.name.name.clone();
        let mut members = Vec::with_capacity(decl.members.len());
        for (member, value) in member_values(decl, self.ctx.checker)? {
            let value = match value {
                EnumValue::Number(n) => EnumMemberValue::Numeric(n),
                EnumValue::String(s) => EnumMemberValue::String(s),
                EnumValue::Computed(expr) => EnumMemberValue::Computed(Box::new(self.lower_expr(&expr)?)),
            };
            members.push(EnumMember { name: member, value });
        }
        let declare = self.declare(&name).then(|| self.iife_keyword(scope));
        let export_target = self
            .export_owner(scope, exported)
            .map(|owner| format!("{owner}.{name}"));
        let node = IRNode::EnumIIFE {
            name: name.clone(),
            members,
            declare,
            export_target,
        };
        Self::push_comments(comments, out);
        out.push(self.export_iife(node, &name, scope, exported));
        Ok(())
    }

    pub(super) fn lower_namespace_statement(
        &mut self,
        module: &ModuleDeclaration,
        comments: &[Comment],
        scope: &Scope,
        exported: bool,
        out: &mut Vec<IRNode>,
    ) -> crate::error::Result<()> {
        let ModuleName::Identifier(ident) = &module.name else {
            // `declare module "m"` only augments types.
            return Ok(());
        };
        let Some(statements) = &module.body else {
            return Ok(());
        };
        let name = ident.name.clone();
        let inner = Scope::Namespace(name.clone());

        self.declared.push(FxHashSet::default());
        self.collect_export_owners(statements, &inner);
        let mut body = Vec::with_capacity(statements.len());
        let result = self.lower_statements(statements, &inner, &mut body);
        self.declared.pop();
        result?;

        if body.iter().all(|n| matches!(n, IRNode::Comment(_))) {
            trace!(%name, "namespace without values, not emitted");
            return Ok(());
        }
        let declare = self.declare(&name).then(|| self.iife_keyword(scope));
        let export_target = self
            .export_owner(scope, exported)
            .map(|owner| format!("{owner}.{name}"));
        let node = IRNode::NamespaceIIFE {
            name: name.clone(),
            body,
            declare,
            export_target,
        };
        Self::push_comments(comments, out);
        out.push(self.export_iife(node, &name, scope, exported));
        Ok(())
    }
}

fn iife_declares(node: &IRNode) -> bool {
    matches!(
        node,
        IRNode::EnumIIFE { declare: Some(_), .. } | IRNode::NamespaceIIFE { declare: Some(_), .. }
    )
}
