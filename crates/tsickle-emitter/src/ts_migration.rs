//! `goog.tsMigration*ExportsShim` calls.
//!
//! A TypeScript file can declare a legacy Closure namespace for code that
//! still `goog.require`s it:
//!
//! ```text
//! goog.tsMigrationExportsShim('legacy.ns', {A, B: C});
//! goog.tsMigrationDefaultExportsShim('legacy.ns');
//! goog.tsMigrationNamedExportsShim('legacy.ns');
//! ```
//!
//! The calls never reach the output. With goog.module output and shim
//! generation enabled, an extra `<file>.tsmes.js` module re-exports the file
//! under the legacy namespace.

use crate::context::FileContext;
use crate::ir::{IRNode, IRProperty, IRPropertyKey, IRPropertyKind, JsFile, VarKeyword, walk_mut};
use crate::ir_printer::IRPrinter;
use tracing::debug;
use tsickle_common::Span;
use tsickle_common::diagnostics::diagnostic_codes;
use tsickle_common::path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShimKind {
    /// `goog.tsMigrationExportsShim('ns', {...})`
    Exports,
    /// `goog.tsMigrationDefaultExportsShim('ns')`
    DefaultExports,
    /// `goog.tsMigrationNamedExportsShim('ns')`
    NamedExports,
}

impl ShimKind {
    fn from_callee(callee: &str) -> Option<Self> {
        match callee {
            "goog.tsMigrationExportsShim" => Some(Self::Exports),
            "goog.tsMigrationDefaultExportsShim" => Some(Self::DefaultExports),
            "goog.tsMigrationNamedExportsShim" => Some(Self::NamedExports),
            _ => None,
        }
    }

    pub fn function_name(self) -> &'static str {
        match self {
            Self::Exports => "tsMigrationExportsShim",
            Self::DefaultExports => "tsMigrationDefaultExportsShim",
            Self::NamedExports => "tsMigrationNamedExportsShim",
        }
    }
}

/// A well-formed shim call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TsMigrationShim {
    pub kind: ShimKind,
    /// Legacy namespace to declare.
    pub namespace: String,
    /// `(legacy name, name exported by the file)`; only for [`ShimKind::Exports`].
    pub exports: Vec<(String, String)>,
}

fn shim_call(node: &IRNode) -> Option<(ShimKind, &[IRNode])> {
    let IRNode::CallExpr { callee, arguments } = node else {
        return None;
    };
    let kind = ShimKind::from_callee(&callee.entity_name()?)?;
    Some((kind, arguments))
}

/// Name exported by the file that a shim object value refers to: `A`, or
/// `exports.A` once exported variables have been lowered.
fn exported_name(value: &IRNode) -> Option<String> {
    match value {
        IRNode::Identifier(name) => Some(name.clone()),
        IRNode::PropertyAccess { object, property } if matches!(object.as_ref(), IRNode::Identifier(o) if o == "exports") => {
            Some(property.clone())
        }
        _ => None,
    }
}

fn parse_shim(kind: ShimKind, arguments: &[IRNode]) -> Result<TsMigrationShim, &'static str> {
    let (namespace, rest) = match arguments.split_first() {
        Some((IRNode::StringLiteral { value, .. }, rest)) => (value.clone(), rest),
        _ => return Err("the first argument must be a string literal namespace"),
    };
    if namespace.is_empty() {
        return Err("the namespace must not be empty");
    }
    let exports = match (kind, rest) {
        (ShimKind::Exports, [IRNode::ObjectLiteral { properties, .. }]) => {
            let mut exports = Vec::with_capacity(properties.len());
            for property in properties {
                let IRPropertyKey::Identifier(key) = &property.key else {
                    return Err("object keys must be identifiers");
                };
                if property.kind == IRPropertyKind::Spread {
                    return Err("spread is not allowed in the exports object");
                }
                let Some(local) = exported_name(&property.value) else {
                    return Err("object values must name exports of the file");
                };
                exports.push((key.clone(), local));
            }
            exports
        }
        (ShimKind::Exports, _) => return Err("expected a namespace and an object literal of exports"),
        (_, []) => Vec::new(),
        (_, _) => return Err("expected a single namespace argument"),
    };
    Ok(TsMigrationShim { kind, namespace, exports })
}

/// Remove every shim call from `file` and return the (single, well-formed)
/// top-level one. Misplaced, malformed and duplicate calls are reported.
pub fn extract_shim(file: &mut JsFile, ctx: &mut FileContext<'_>) -> Option<TsMigrationShim> {
    let mut found: Option<TsMigrationShim> = None;
    let mut calls = 0usize;
    let mut statements = Vec::with_capacity(file.statements.len());
    for stmt in std::mem::take(&mut file.statements) {
        let IRNode::ExpressionStatement(expr) = &stmt else {
            statements.push(stmt);
            continue;
        };
        let Some((kind, arguments)) = shim_call(expr) else {
            statements.push(stmt);
            continue;
        };
        calls += 1;
        if calls > 1 {
            ctx.diagnostics
                .warn(diagnostic_codes::TS_MIGRATION_SHIM_DUPLICATE, Span::dummy(), &[]);
            continue;
        }
        match parse_shim(kind, arguments) {
            Ok(shim) => found = Some(shim),
            Err(reason) => ctx.diagnostics.warn(
                diagnostic_codes::TS_MIGRATION_SHIM_MALFORMED,
                Span::dummy(),
                &[kind.function_name(), reason],
            ),
        }
    }

    // Calls inside functions or blocks cannot be honoured.
    let mut nested = Vec::new();
    for stmt in &mut statements {
        walk_mut(stmt, &mut |node| {
            if let Some(kind) = shim_call(node).map(|(kind, _)| kind) {
                nested.push(kind);
                *node = IRNode::Undefined;
            }
        });
    }
    for kind in nested {
        ctx.diagnostics.warn(
            diagnostic_codes::TS_MIGRATION_SHIM_MALFORMED,
            Span::dummy(),
            &[kind.function_name(), "the call must be a top-level statement"],
        );
    }
    file.statements = statements;

    if let Some(shim) = &found
        && !(ctx.host.options.generate_ts_migration_exports_shim && ctx.googmodule())
    {
        ctx.diagnostics.warn(
            diagnostic_codes::TS_MIGRATION_SHIM_DISABLED,
            Span::dummy(),
            &[shim.kind.function_name()],
        );
        return None;
    }
    if let Some(shim) = &found {
        debug!(namespace = %shim.namespace, kind = ?shim.kind, "ts migration exports shim");
    }
    found
}

/// `out/a.js` → `out/a.tsmes.js`
pub fn shim_file_name(js_file_name: &str) -> String {
    format!("{}.tsmes.js", path::strip_script_extension(js_file_name))
}

/// Text of the `.tsmes.js` module re-exporting `module_name` as the shim's
/// legacy namespace.
pub fn render_shim(shim: &TsMigrationShim, module_name: &str, source_path: &str) -> String {
    let tsmes = IRNode::id("tsmes");
    let value = match shim.kind {
        ShimKind::DefaultExports => IRNode::prop(tsmes, "default"),
        ShimKind::NamedExports => tsmes,
        ShimKind::Exports => IRNode::object(
            shim.exports
                .iter()
                .map(|(legacy, local)| IRProperty::init(legacy.clone(), IRNode::prop(IRNode::id("tsmes"), local.clone())))
                .collect(),
            false,
        ),
    };
    let statements = vec![
        IRNode::comment(format!(
            "/**\n * @fileoverview generator:ts_migration_exports_shim.ts\n * Generated from: {source_path}\n * @suppress {{missingRequire}}\n */"
        )),
        IRNode::expr_stmt(IRNode::call(
            IRNode::dotted("goog.module"),
            vec![IRNode::single_quoted(shim.namespace.clone())],
        )),
        IRNode::expr_stmt(IRNode::call(IRNode::dotted("goog.module.declareLegacyNamespace"), Vec::new())),
        IRNode::var_decl(
            VarKeyword::Const,
            "tsmes",
            Some(IRNode::call(
                IRNode::dotted("goog.require"),
                vec![IRNode::single_quoted(module_name)],
            )),
        ),
        IRNode::expr_stmt(IRNode::assign(IRNode::id("exports"), value)),
    ];
    IRPrinter::print_file(&JsFile::new(source_path, statements))
}

#[cfg(test)]
#[path = "../tests/ts_migration.rs"]
mod tests;
