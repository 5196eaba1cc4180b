//! Import and export rewriting for Closure.
//!
//! Runs on annotated files, after the module symbol table is built:
//!
//! - imports whose bindings are only used as types are removed (in
//!   goog.module output they become `goog.requireType` declarations so the
//!   types stay nameable); mixed imports lose their type-only specifiers
//! - `export * from` is expanded into an explicit export list, since Closure
//!   cannot see through star re-exports; type-only names become
//!   `@typedef` declarations on `exports` in CommonJS output
//! - type-only names in `export { ... }` are dropped the same way

use crate::context::FileContext;
use crate::jsdoc::{self, Tag};
use crate::module_symbols::{ImportEntry, import_local};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use tsickle_common::Span;
use tsickle_common::diagnostics::diagnostic_codes;
use tsickle_program::ast::{
    Comment, ExportClause, ExportDeclaration, ExportSpecifier, Expression, ExpressionKind, Identifier,
    ImportDeclaration, ModuleReference, NamedImportBindings, SourceFile, StringLiteral,
    VariableDeclaration, VariableStatement,
};
use tsickle_program::{NodeId, Statement, StatementKind, SymbolFlags, SymbolId, VarKind};

/// Names this file exports itself; they shadow `export *` names.
fn local_export_names(statements: &[Statement]) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    for stmt in statements {
        if stmt.modifiers().is_exported() {
            names.extend(stmt.declared_names().into_iter().map(str::to_string));
        }
        match &stmt.kind {
            StatementKind::Export(ExportDeclaration {
                clause: ExportClause::Named(specs),
                ..
            }) => names.extend(specs.iter().map(|s| s.name.name.clone())),
            StatementKind::Export(ExportDeclaration {
                clause: ExportClause::Namespace(ns),
                ..
            }) => {
                names.insert(ns.name.clone());
            }
            StatementKind::ExportAssignment(_) => {
                names.insert("default".to_string());
            }
            _ => {}
        }
    }
    names
}

/// `const alias = goog.requireType("id");`
pub fn require_type_statement(alias: &str, module_id: &str) -> Statement {
    let call = Expression::call(
        Expression::dotted("goog.requireType"),
        vec![Expression::synthetic(ExpressionKind::String(StringLiteral::double(module_id)))],
    );
    Statement::synthetic(StatementKind::Variable(VariableStatement {
        modifiers: Default::default(),
        kind: VarKind::Const,
        declarations: vec![VariableDeclaration {
            name: Identifier::synthetic(alias),
            type_annotation: None,
            initializer: Some(call),
        }],
    }))
}

/// `/** @typedef {T} */ exports.name;`
fn typedef_export(name: &str, closure_type: String) -> Statement {
    let target = Expression::property(Expression::ident("exports"), name);
    Statement::expression(target).with_comment(jsdoc::to_comment(&[Tag::typed("typedef", closure_type)]))
}

struct StarExpansion {
    specifier: String,
    names: Vec<(String, SymbolId)>,
}

enum ExportKind {
    Value,
    /// No runtime value (interfaces, type aliases, inlined const enums).
    TypeOnly,
    /// Const enum inlined away; nothing to re-export.
    Elided,
}

pub struct ModuleRewriter<'c, 'a> {
    ctx: &'c mut FileContext<'a>,
}

impl<'c, 'a> ModuleRewriter<'c, 'a> {
    pub fn new(ctx: &'c mut FileContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn run(mut self, file: &mut SourceFile) {
        let local_exports = local_export_names(&file.statements);
        let mut expansions = self.collect_star_expansions(&file.statements, &local_exports);
        let mut expanded: FxHashSet<String> = FxHashSet::default();

        let statements = std::mem::take(&mut file.statements);
        let mut out = Vec::with_capacity(statements.len());
        for stmt in statements {
            match stmt.kind {
                StatementKind::Import(decl) => {
                    out.extend(self.rewrite_import(decl, stmt.id, stmt.span, stmt.leading_comments));
                }
                StatementKind::ImportEquals(decl) => {
                    let type_only_entry = match &decl.reference {
                        ModuleReference::External(spec) => self
                            .ctx
                            .symbols
                            .entry_for(&spec.value, Some(&decl.name.name))
                            .filter(|entry| entry.is_type_only)
                            .cloned(),
                        ModuleReference::Entity(_) => None,
                    };
                    match type_only_entry {
                        Some(entry) => out.extend(self.type_only_import(&entry)),
                        None => out.push(Statement {
                            kind: StatementKind::ImportEquals(decl),
                            ..stmt
                        }),
                    }
                }
                StatementKind::Export(decl) if decl.module_specifier.is_some() && decl.clause == ExportClause::Star => {
                    let specifier = decl.module_specifier.as_ref().map(|s| s.value.clone()).unwrap_or_default();
                    match expansions.shift_remove(&specifier) {
                        Some(expansion) => {
                            expanded.insert(specifier);
                            out.extend(self.expand_star(expansion, decl, stmt.leading_comments, stmt.span));
                        }
                        // The first wildcard for a source already exported all of its names.
                        None if expanded.contains(&specifier) => {
                            trace!(%specifier, "dropped repeated export *");
                        }
                        // Unresolved sources stay as written.
                        None => out.push(Statement {
                            kind: StatementKind::Export(decl),
                            ..stmt
                        }),
                    }
                }
                StatementKind::Export(decl) => {
                    out.extend(self.rewrite_named_export(decl, stmt.id, stmt.span, stmt.leading_comments));
                }
                kind => out.push(Statement { kind, ..stmt }),
            }
        }
        file.statements = out;
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn type_only_import(&mut self, entry: &ImportEntry) -> Option<Statement> {
        if self.ctx.googmodule()
            && let Some(alias) = &entry.type_alias
        {
            return Some(require_type_statement(alias, &entry.module_id));
        }
        trace!(specifier = %entry.specifier, "removed type-only import");
        None
    }

    fn rewrite_import(
        &mut self,
        mut decl: ImportDeclaration,
        id: NodeId,
        span: Span,
        comments: Vec<Comment>,
    ) -> Option<Statement> {
        let entry = self
            .ctx
            .symbols
            .entry_for(&decl.module_specifier.value, import_local(&decl))
            .cloned();
        if let Some(entry) = &entry {
            if entry.is_type_only {
                return self.type_only_import(entry);
            }
            let is_value = |local: &str| {
                entry
                    .bindings
                    .iter()
                    .find(|b| b.local == local)
                    .is_none_or(|b| b.is_value)
            };
            if let Some(clause) = &mut decl.clause {
                if clause.default.as_ref().is_some_and(|d| !is_value(&d.name)) {
                    clause.default = None;
                }
                match &mut clause.bindings {
                    Some(NamedImportBindings::Named(specs)) => {
                        specs.retain(|spec| !spec.is_type_only && is_value(&spec.name.name));
                        if specs.is_empty() && clause.default.is_some() {
                            clause.bindings = None;
                        }
                    }
                    Some(NamedImportBindings::Namespace(ns)) if !is_value(&ns.name) => clause.bindings = None,
                    _ => {}
                }
            }
        }
        Some(Statement {
            id,
            span,
            leading_comments: comments,
            kind: StatementKind::Import(decl),
        })
    }

    // =========================================================================
    // Exports
    // =========================================================================

    fn classify(&self, symbol: SymbolId) -> ExportKind {
        let checker = self.ctx.checker;
        let resolved = checker.resolve_alias(symbol);
        let Some(sym) = checker.get_symbol(resolved) else {
            return ExportKind::Value;
        };
        if sym.is_const_enum() && !self.ctx.const_enums.keeps_declarations() {
            ExportKind::Elided
        } else if sym.is_type_only() {
            ExportKind::TypeOnly
        } else {
            ExportKind::Value
        }
    }

    /// `@typedef` target for a type-only export.
    fn typedef_type(&mut self, symbol: SymbolId) -> String {
        let checker = self.ctx.checker;
        let resolved = checker.resolve_alias(symbol);
        let reference = self.ctx.translator().symbol_reference(resolved);
        let nullable = checker
            .get_symbol(resolved)
            .is_some_and(|s| s.flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE));
        if nullable && reference != "?" {
            format!("!{reference}")
        } else {
            reference
        }
    }

    fn collect_star_expansions(
        &mut self,
        statements: &[Statement],
        local_exports: &FxHashSet<String>,
    ) -> IndexMap<String, StarExpansion> {
        let checker = self.ctx.checker;
        let mut expansions: IndexMap<String, StarExpansion> = IndexMap::new();
        for stmt in statements {
            let StatementKind::Export(ExportDeclaration {
                clause: ExportClause::Star,
                module_specifier: Some(specifier),
                ..
            }) = &stmt.kind
            else {
                continue;
            };
            let Some(module) = checker
                .resolve_module(&self.ctx.file_name, &specifier.value)
                .and_then(|resolved| resolved.module_symbol)
            else {
                debug!(specifier = %specifier.value, "export * source did not resolve, left as written");
                continue;
            };
            let names = checker
                .exports_of_module(module)
                .into_iter()
                .filter(|(name, _)| name != "default" && !local_exports.contains(name))
                .collect();
            expansions.insert(
                specifier.value.clone(),
                StarExpansion {
                    specifier: specifier.value.clone(),
                    names,
                },
            );
        }

        // A name supplied by two sources with different symbols is ambiguous
        // and exported by neither.
        let mut seen: IndexMap<String, (String, SymbolId)> = IndexMap::new();
        let mut ambiguous: IndexMap<String, (String, String)> = IndexMap::new();
        for expansion in expansions.values() {
            for (name, symbol) in &expansion.names {
                let resolved = checker.resolve_alias(*symbol);
                match seen.get(name) {
                    Some((source, existing)) if *existing != resolved => {
                        ambiguous
                            .entry(name.clone())
                            .or_insert_with(|| (source.clone(), expansion.specifier.clone()));
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(name.clone(), (expansion.specifier.clone(), resolved));
                    }
                }
            }
        }
        for (name, (first, second)) in &ambiguous {
            self.ctx
                .diagnostics
                .warn(diagnostic_codes::AMBIGUOUS_EXPORT_STAR, Span::dummy(), &[name, first, second]);
        }
        // Later sources repeating an unambiguous name export it once.
        let mut exported: FxHashSet<String> = FxHashSet::default();
        for expansion in expansions.values_mut() {
            expansion
                .names
                .retain(|(name, _)| !ambiguous.contains_key(name) && exported.insert(name.clone()));
        }
        expansions
    }

    fn expand_star(
        &mut self,
        expansion: StarExpansion,
        decl: ExportDeclaration,
        comments: Vec<Comment>,
        span: Span,
    ) -> Vec<Statement> {
        let mut values = Vec::new();
        let mut typedefs = Vec::new();
        // Names the declaration file re-exports: values and types, in export order.
        let mut declared = Vec::new();
        for (name, symbol) in expansion.names {
            match self.classify(symbol) {
                ExportKind::Value => {
                    declared.push(name.clone());
                    values.push(name);
                }
                ExportKind::TypeOnly => {
                    if self.ctx.is_commonjs() {
                        let closure_type = self.typedef_type(symbol);
                        typedefs.push(typedef_export(&name, closure_type));
                    }
                    declared.push(name);
                }
                ExportKind::Elided => {}
            }
        }
        debug!(
            specifier = %expansion.specifier,
            values = values.len(),
            typedefs = typedefs.len(),
            "expanded export *"
        );
        self.ctx
            .export_star_expansions
            .insert(expansion.specifier.clone(), declared);

        let mut out = Vec::with_capacity(typedefs.len() + 1);
        if !values.is_empty() {
            let expanded = ExportDeclaration {
                clause: ExportClause::Named(values.into_iter().map(ExportSpecifier::named).collect()),
                module_specifier: decl.module_specifier,
                is_type_only: false,
            };
            out.push(Statement {
                span,
                leading_comments: comments,
                ..Statement::synthetic(StatementKind::Export(expanded))
            });
        }
        out.extend(typedefs);
        out
    }

    fn rewrite_named_export(
        &mut self,
        mut decl: ExportDeclaration,
        id: NodeId,
        span: Span,
        comments: Vec<Comment>,
    ) -> Vec<Statement> {
        let ExportClause::Named(specs) = &mut decl.clause else {
            return vec![Statement {
                id,
                span,
                leading_comments: comments,
                kind: StatementKind::Export(decl),
            }];
        };
        if specs.is_empty() {
            return vec![Statement {
                id,
                span,
                leading_comments: comments,
                kind: StatementKind::Export(decl),
            }];
        }
        let checker = self.ctx.checker;
        let mut typedefs = Vec::new();
        let mut kept = Vec::with_capacity(specs.len());
        for spec in std::mem::take(specs) {
            let local = spec.property_name.as_ref().unwrap_or(&spec.name);
            let symbol = checker.symbol_of_node(local.id).or_else(|| checker.symbol_of_node(spec.name.id));
            let kind = match symbol {
                _ if decl.is_type_only || spec.is_type_only => ExportKind::TypeOnly,
                Some(symbol) => self.classify(symbol),
                None => ExportKind::Value,
            };
            match kind {
                ExportKind::Value => kept.push(spec),
                ExportKind::TypeOnly if self.ctx.is_commonjs() => {
                    let closure_type = symbol.map_or_else(|| "?".to_string(), |s| self.typedef_type(s));
                    typedefs.push(typedef_export(&spec.name.name, closure_type));
                }
                ExportKind::TypeOnly | ExportKind::Elided => {
                    trace!(name = %spec.name.name, "dropped type-only re-export");
                }
            }
        }
        let mut out = Vec::with_capacity(typedefs.len() + 1);
        if !kept.is_empty() {
            decl.clause = ExportClause::Named(kept);
            decl.is_type_only = false;
            out.push(Statement {
                id,
                span,
                leading_comments: comments,
                kind: StatementKind::Export(decl),
            });
        }
        out.extend(typedefs);
        out
    }
}

#[cfg(test)]
#[path = "../tests/module_rewriter.rs"]
mod tests;
