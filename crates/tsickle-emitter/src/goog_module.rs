//! CommonJS → goog.module conversion of lowered output.
//!
//! Runs on the IR after lowering, so every import is already a `require`
//! call and every export an assignment to `exports`:
//!
//! ```text
//! "use strict";                               goog.module('app.a');
//! Object.defineProperty(exports, ...);   →    var module = module || { id: 'app/a.ts' };
//! const b_1 = require("./b");                 const b_1 = goog.require('app.b');
//! ```

use crate::context::FileContext;
use crate::ir::{IRNode, IRProperty, JsFile, VarKeyword, walk_mut};
use crate::manifest::ModulesManifest;
use crate::module_symbols::module_id;
use tracing::debug;
use tsickle_common::Span;
use tsickle_common::diagnostics::diagnostic_codes;

pub struct GoogModuleConversion<'c, 'a> {
    ctx: &'c mut FileContext<'a>,
    /// Module ids this file requires, first reference first.
    required: Vec<String>,
}

/// The string argument of `callee("x")` when `node` is such a call.
fn single_string_argument<'n>(node: &'n IRNode, callee: &str) -> Option<&'n str> {
    let IRNode::CallExpr { arguments, .. } = node else {
        return None;
    };
    if !node.is_call_to(callee) {
        return None;
    }
    match arguments.as_slice() {
        [IRNode::StringLiteral { value, .. }] => Some(value),
        _ => None,
    }
}

fn goog_require(module: &str) -> IRNode {
    IRNode::call(IRNode::dotted("goog.require"), vec![IRNode::single_quoted(module)])
}

fn is_module_exports(node: &IRNode) -> bool {
    node.entity_name().as_deref() == Some("module.exports")
}

impl<'c, 'a> GoogModuleConversion<'c, 'a> {
    pub fn new(ctx: &'c mut FileContext<'a>) -> Self {
        Self {
            ctx,
            required: Vec::new(),
        }
    }

    /// Module id for a `require` of `specifier` from this file.
    fn required_module(&self, specifier: &str) -> String {
        if let Some(entry) = self.ctx.symbols.entries().iter().find(|e| e.specifier == specifier) {
            return entry.module_id.clone();
        }
        let resolved = self.ctx.checker.resolve_module(&self.ctx.file_name, specifier);
        module_id(
            self.ctx.host,
            &self.ctx.file_name,
            specifier,
            resolved.as_ref().map(|r| r.file_name.as_str()),
        )
    }

    fn note_required(&mut self, module: &str) {
        if !self.required.iter().any(|m| m == module) {
            self.required.push(module.to_string());
        }
    }

    /// Convert `file` in place and record it in `manifest`.
    pub fn run(mut self, file: &mut JsFile, manifest: &mut ModulesManifest) {
        let module_name = self.ctx.host.module_name("", &file.source_file_name);
        // The header replaces the CommonJS preamble; scripts without one get
        // it after their detached comments.
        let header_at = file
            .statements
            .iter()
            .position(|node| matches!(node, IRNode::UseStrict))
            .or_else(|| file.statements.iter().position(|node| !matches!(node, IRNode::Comment(_))))
            .unwrap_or(file.statements.len());
        file.statements
            .retain(|node| !matches!(node, IRNode::UseStrict | IRNode::EsModuleMarker | IRNode::ExportInit { .. }));

        for stmt in &mut file.statements {
            self.convert_statement(stmt);
        }

        let module_id = self.ctx.host.module_id(&self.ctx.host.root_dirs_relative(&file.source_file_name));
        let mut header = vec![
            IRNode::expr_stmt(IRNode::call(
                IRNode::dotted("goog.module"),
                vec![IRNode::single_quoted(module_name.clone())],
            )),
            IRNode::var_decl(
                VarKeyword::Var,
                "module",
                Some(IRNode::binary(
                    IRNode::id("module"),
                    "||",
                    IRNode::object(vec![IRProperty::init("id", IRNode::single_quoted(module_id))], false),
                )),
            ),
        ];
        if self.ctx.options.import_helpers && !self.required.iter().any(|m| m == "tslib") {
            header.push(IRNode::expr_stmt(goog_require("tslib")));
            self.required.insert(0, "tslib".to_string());
        }
        file.statements.splice(header_at..header_at, header);

        debug!(module = %module_name, requires = self.required.len(), "converted to goog.module");
        let file_name = self.ctx.host.module_id(&file.source_file_name);
        manifest.add_module(file_name.clone(), module_name);
        for module in self.required {
            manifest.add_referenced_module(file_name.clone(), module);
        }
    }

    fn convert_statement(&mut self, stmt: &mut IRNode) {
        match stmt {
            IRNode::RequireStatement {
                keyword,
                var_name,
                module_spec,
            } => {
                let module = if module_spec.value == "tslib" {
                    "tslib".to_string()
                } else {
                    self.required_module(&module_spec.value)
                };
                self.note_required(&module);
                let call = goog_require(&module);
                *stmt = match var_name.take() {
                    Some(name) => IRNode::var_decl(*keyword, name, Some(call)),
                    None => IRNode::expr_stmt(call),
                };
                return;
            }
            IRNode::ExpressionStatement(expr) => {
                if let IRNode::BinaryExpr { left, operator, right } = expr.as_mut()
                    && operator == "="
                    && is_module_exports(left)
                {
                    let entity = right.entity_name().unwrap_or_else(|| "expression".to_string());
                    self.ctx
                        .diagnostics
                        .warn(diagnostic_codes::UNSUPPORTED_EXPORT_ASSIGNMENT, Span::dummy(), &[entity.as_str()]);
                    **left = IRNode::id("exports");
                }
            }
            _ => {}
        }

        // Nested `require("x")` (re-exports) and `goog.requireType` references.
        let mut found: Vec<(bool, String)> = Vec::new();
        walk_mut(stmt, &mut |node| {
            if let Some(specifier) = single_string_argument(node, "require") {
                found.push((true, specifier.to_string()));
            } else if let Some(module) = single_string_argument(node, "goog.requireType") {
                found.push((false, module.to_string()));
            }
        });
        if found.is_empty() {
            return;
        }
        let mut modules = Vec::with_capacity(found.len());
        for (is_require, text) in found {
            let module = if is_require { self.required_module(&text) } else { text };
            self.note_required(&module);
            modules.push((is_require, module));
        }
        let mut requires = modules.into_iter().filter(|(r, _)| *r).map(|(_, m)| m);
        walk_mut(stmt, &mut |node| {
            if single_string_argument(node, "require").is_some()
                && let Some(module) = requires.next()
            {
                *node = goog_require(&module);
            }
        });
    }
}

#[cfg(test)]
#[path = "../tests/goog_module.rs"]
mod tests;
