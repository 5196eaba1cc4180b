//! Imports, exports and the CommonJS preamble.

use super::{Lowering, Scope, comment_text};
use crate::decorators::TSLIB;
use crate::error::{Result, TransformError};
use crate::ir::{IRExportSpecifier, IRImportSpecifier, IRModuleSpec, IRNode, VarKeyword, walk_mut};
use crate::module_symbols::{alias_base, import_local};
use tracing::trace;
use tsickle_program::ast::{
    Comment, ExportAssignment, ExportClause, ExportDeclaration, Expression, ExpressionKind,
    ImportDeclaration, ImportEqualsDeclaration, ModuleReference, NamedImportBindings, SourceFile,
    StringLiteral,
};
use tsickle_program::StatementKind;

/// Whether `file` uses module syntax (and so gets the `__esModule` marker).
pub(crate) fn is_module(file: &SourceFile) -> bool {
    file.statements.iter().any(|stmt| {
        matches!(
            &stmt.kind,
            StatementKind::Import(_) | StatementKind::Export(_) | StatementKind::ExportAssignment(_)
        ) || matches!(&stmt.kind, StatementKind::ImportEquals(decl)
            if matches!(decl.reference, ModuleReference::External(_)))
            || stmt.modifiers().is_exported()
    })
}

fn uses_tslib(statements: &mut [IRNode]) -> bool {
    let mut found = false;
    let mut visit = |node: &mut IRNode| match node {
        IRNode::Identifier(name) if name == TSLIB => found = true,
        IRNode::ExtendsHelper { helper, .. } if helper.starts_with(TSLIB) => found = true,
        _ => {}
    };
    for stmt in statements.iter_mut() {
        walk_mut(stmt, &mut visit);
    }
    found
}

fn declares_tslib(statements: &[IRNode]) -> bool {
    statements.iter().any(|node| match node {
        IRNode::RequireStatement { var_name, .. } => var_name.as_deref() == Some(TSLIB),
        IRNode::ImportDecl { namespace, .. } => namespace.as_deref() == Some(TSLIB),
        _ => false,
    })
}

/// `require("m")` with the double quotes TypeScript's CommonJS output uses.
fn require_call(specifier: &str) -> IRNode {
    IRNode::call(IRNode::id("require"), vec![IRNode::string(specifier)])
}

fn es_module_spec(lit: &StringLiteral) -> IRModuleSpec {
    IRModuleSpec::new(lit.value.clone(), lit.single_quote)
}

impl Lowering<'_, '_> {
    fn require_keyword(&self) -> VarKeyword {
        if self.ctx.es5() || !self.ctx.options.target.supports_es2015() {
            VarKeyword::Var
        } else {
            VarKeyword::Const
        }
    }

    fn require_statement(&self, var_name: Option<String>, specifier: &str) -> IRNode {
        IRNode::RequireStatement {
            keyword: self.require_keyword(),
            var_name,
            module_spec: IRModuleSpec::new(specifier, false),
        }
    }

    // =========================================================================
    // Imports
    // =========================================================================

    pub(super) fn lower_import(&mut self, decl: &ImportDeclaration, comments: &[Comment], out: &mut Vec<IRNode>) {
        if decl.is_type_only {
            return;
        }
        let specifier = decl.module_specifier.value.as_str();
        let entry = self.ctx.symbols.entry_for(specifier, import_local(decl)).cloned();
        if entry.as_ref().is_some_and(|e| e.is_type_only) {
            trace!(%specifier, "type-only import elided");
            return;
        }
        let is_value = |local: &str| {
            entry
                .as_ref()
                .and_then(|e| e.bindings.iter().find(|b| b.local == local))
                .is_none_or(|b| b.is_value)
        };

        if self.ctx.is_commonjs() {
            Self::push_comments(comments, out);
            let var_name = entry.as_ref().and_then(|e| e.require_alias.clone());
            out.push(self.require_statement(var_name, specifier));
            return;
        }

        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();
        if let Some(clause) = &decl.clause {
            default = clause
                .default
                .as_ref()
                .filter(|d| is_value(&d.name))
                .map(|d| d.name.clone());
            match &clause.bindings {
                Some(NamedImportBindings::Namespace(ns)) if is_value(&ns.name) => namespace = Some(ns.name.clone()),
                Some(NamedImportBindings::Named(specs)) => {
                    named = specs
                        .iter()
                        .filter(|s| !s.is_type_only && is_value(&s.name.name))
                        .map(|s| IRImportSpecifier {
                            imported: s.imported_name().to_string(),
                            local: s.name.name.clone(),
                        })
                        .collect();
                }
                _ => {}
            }
            if default.is_none() && namespace.is_none() && named.is_empty() {
                return;
            }
        }
        Self::push_comments(comments, out);
        out.push(IRNode::ImportDecl {
            default,
            namespace,
            named,
            module_spec: es_module_spec(&decl.module_specifier),
        });
    }

    pub(super) fn lower_import_equals(
        &mut self,
        decl: &ImportEqualsDeclaration,
        comments: &[Comment],
        scope: &Scope,
        out: &mut Vec<IRNode>,
    ) -> Result<()> {
        let name = decl.name.name.clone();
        let owner = self.export_owner(scope, decl.is_exported);
        match &decl.reference {
            ModuleReference::External(specifier) => {
                let entry = self.ctx.symbols.entry_for(&specifier.value, Some(&name));
                if entry.is_some_and(|e| e.is_type_only) {
                    return Ok(());
                }
                if !self.ctx.is_commonjs() {
                    return Err(TransformError::unsupported(
                        "'import = require()'",
                        "ES module output",
                    ));
                }
                Self::push_comments(comments, out);
                self.declare(&name);
                out.push(self.require_statement(Some(name.clone()), &specifier.value));
                if let Some(owner) = owner {
                    out.push(super::member_export(&owner, &name));
                }
            }
            ModuleReference::Entity(entity) => {
                let symbol = self.ctx.checker.symbol_of_node(decl.name.id);
                if symbol.is_some_and(|s| !self.ctx.checker.is_referenced_as_value(s)) && owner.is_none() {
                    trace!(%name, "import alias of a type elided");
                    return Ok(());
                }
                let value = self.lower_expr(entity)?;
                Self::push_comments(comments, out);
                match owner {
                    Some(owner) => {
                        if owner == "exports" {
                            self.export_names.insert(name.clone());
                        }
                        out.push(IRNode::expr_stmt(IRNode::assign(
                            IRNode::prop(IRNode::dotted(&owner), name),
                            value,
                        )));
                    }
                    None => {
                        self.declare(&name);
                        out.push(IRNode::var_decl(VarKeyword::Var, name, Some(value)));
                    }
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Exports
    // =========================================================================

    pub(super) fn lower_export(&mut self, decl: &ExportDeclaration, comments: &[Comment], out: &mut Vec<IRNode>) {
        if decl.is_type_only {
            return;
        }
        if !self.ctx.is_commonjs() {
            let node = match (&decl.clause, &decl.module_specifier) {
                (ExportClause::Star, Some(spec)) => IRNode::ExportStar {
                    alias: None,
                    module_spec: es_module_spec(spec),
                },
                (ExportClause::Namespace(ns), Some(spec)) => IRNode::ExportStar {
                    alias: Some(ns.name.clone()),
                    module_spec: es_module_spec(spec),
                },
                (ExportClause::Named(specs), spec) => {
                    let specifiers: Vec<IRExportSpecifier> = specs
                        .iter()
                        .filter(|s| !s.is_type_only)
                        .map(|s| IRExportSpecifier {
                            local: s.local_name().to_string(),
                            exported: s.name.name.clone(),
                        })
                        .collect();
                    if specifiers.is_empty() && !specs.is_empty() {
                        return;
                    }
                    IRNode::ExportDecl {
                        specifiers,
                        module_spec: spec.as_ref().map(es_module_spec),
                    }
                }
                (ExportClause::Star | ExportClause::Namespace(_), None) => return,
            };
            Self::push_comments(comments, out);
            out.push(node);
            return;
        }

        Self::push_comments(comments, out);
        match (&decl.clause, &decl.module_specifier) {
            (ExportClause::Star, Some(spec)) => {
                // tslib_1.__exportStar(require("m"), exports);
                out.push(IRNode::expr_stmt(IRNode::call(
                    IRNode::prop(IRNode::id(TSLIB), "__exportStar"),
                    vec![require_call(&spec.value), IRNode::id("exports")],
                )));
            }
            (ExportClause::Namespace(ns), Some(spec)) => {
                self.export_names.insert(ns.name.clone());
                out.push(IRNode::expr_stmt(IRNode::assign(
                    IRNode::exports_prop(ns.name.clone()),
                    require_call(&spec.value),
                )));
            }
            (ExportClause::Named(specs), Some(spec)) => {
                let specs: Vec<_> = specs.iter().filter(|s| !s.is_type_only).collect();
                if specs.is_empty() {
                    return;
                }
                let alias = self.ctx.symbols.fresh_name(&alias_base(&spec.value));
                out.push(self.require_statement(Some(alias.clone()), &spec.value));
                for s in specs {
                    self.export_names.insert(s.name.name.clone());
                    out.push(IRNode::expr_stmt(IRNode::assign(
                        IRNode::exports_prop(s.name.name.clone()),
                        IRNode::prop(IRNode::id(alias.clone()), s.local_name()),
                    )));
                }
            }
            (ExportClause::Named(specs), None) => {
                for s in specs.iter().filter(|s| !s.is_type_only) {
                    let local = s.property_name.as_ref().unwrap_or(&s.name);
                    let reference = Expression::new(local.id, ExpressionKind::Identifier(local.name.clone()));
                    let value = self.lower_reference(&reference, &local.name);
                    self.export_names.insert(s.name.name.clone());
                    out.push(IRNode::expr_stmt(IRNode::assign(
                        IRNode::exports_prop(s.name.name.clone()),
                        value,
                    )));
                }
            }
            (ExportClause::Star | ExportClause::Namespace(_), None) => {}
        }
    }

    pub(super) fn lower_export_assignment(&mut self, assignment: &ExportAssignment) -> Result<IRNode> {
        let value = self.lower_expr(&assignment.expression)?;
        match (assignment.is_export_equals, self.ctx.is_commonjs()) {
            (true, true) => Ok(IRNode::expr_stmt(IRNode::assign(IRNode::dotted("module.exports"), value))),
            (true, false) => Err(TransformError::unsupported("'export ='", "ES module output")),
            (false, true) => Ok(IRNode::expr_stmt(IRNode::assign(IRNode::exports_prop("default"), value))),
            (false, false) => Ok(IRNode::ExportDefault(Box::new(value))),
        }
    }

    // =========================================================================
    // Preamble
    // =========================================================================

    /// Detached comments, the CommonJS preamble and the tslib import, followed
    /// by the lowered statements.
    pub(super) fn finish_module(&mut self, file: &SourceFile, mut body: Vec<IRNode>) -> Vec<IRNode> {
        let mut out: Vec<IRNode> = file
            .detached_comments
            .iter()
            .map(|c| IRNode::comment(comment_text(c)))
            .collect();
        let module = is_module(file);
        if self.ctx.is_commonjs() && module {
            out.push(IRNode::UseStrict);
            out.push(IRNode::EsModuleMarker);
            if !self.export_names.is_empty() {
                out.push(IRNode::ExportInit {
                    names: self.export_names.iter().cloned().collect(),
                });
            }
        }
        out.append(&mut self.hoisted_exports);

        if uses_tslib(&mut body) && !declares_tslib(&body) {
            trace!("adding tslib import");
            out.push(if self.ctx.is_commonjs() {
                self.require_statement(Some(TSLIB.to_string()), "tslib")
            } else {
                IRNode::ImportDecl {
                    default: None,
                    namespace: Some(TSLIB.to_string()),
                    named: Vec::new(),
                    module_spec: IRModuleSpec::new("tslib", false),
                }
            });
        }
        out.append(&mut body);
        out
    }
}
