//! Per-file table of imports and the names they bring in.
//!
//! Built once per file, after decorator lowering and before the annotation
//! passes. The module rewriter uses it to classify imports, the type
//! translator to name types from other modules (and to forward-declare
//! `goog.requireType` for modules that are not imported at all), and lowering
//! to rewrite references to imported bindings in CommonJS output.

use crate::host::TsickleHost;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use tsickle_common::{ModuleKind, path};
use tsickle_program::ast::{
    ImportDeclaration, ImportEqualsDeclaration, ModuleReference, NamedImportBindings, SourceFile,
    StatementKind,
};
use tsickle_program::{SymbolId, TypeChecker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    /// `import { a as b }`
    Named,
    /// `import d`
    Default,
    /// `import * as ns`
    Namespace,
    /// `import x = require('...')`
    ImportEquals,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: String,
    /// Name exported by the source module (`default` for default imports).
    pub imported: Option<String>,
    pub kind: BindingKind,
    pub symbol: Option<SymbolId>,
    /// Referenced in a value position somewhere in the file.
    pub is_value: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportEntry {
    pub specifier: String,
    pub single_quote: bool,
    pub module_id: String,
    pub resolved_file: Option<String>,
    pub module_symbol: Option<SymbolId>,
    pub bindings: Vec<ImportBinding>,
    /// `import './x';`
    pub side_effect_only: bool,
    /// Every binding is type-only (or the import is `import type`).
    pub is_type_only: bool,
    /// Local name of the module object in CommonJS output (`x_1`).
    pub require_alias: Option<String>,
    /// `tsickle_x_1` for type-only imports in goog.module output.
    pub type_alias: Option<String>,
}

impl ImportEntry {
    fn binding_expression(&self, binding: &ImportBinding, commonjs: bool) -> String {
        if !commonjs {
            return binding.local.clone();
        }
        let module_object = if self.is_type_only {
            self.type_alias.as_deref()
        } else {
            self.require_alias.as_deref()
        };
        match (module_object, binding.kind) {
            (Some(object), BindingKind::Named | BindingKind::Default) => {
                format!("{object}.{}", binding.imported.as_deref().unwrap_or(&binding.local))
            }
            (Some(object), BindingKind::Namespace | BindingKind::ImportEquals) => object.to_string(),
            (None, _) => binding.local.clone(),
        }
    }
}

/// A type-only `goog.requireType` discovered while translating types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardDeclare {
    pub alias: String,
    pub module_id: String,
}

#[derive(Debug, Default)]
pub struct ModuleSymbolTable {
    file_name: String,
    commonjs: bool,
    googmodule: bool,
    entries: Vec<ImportEntry>,
    by_symbol: FxHashMap<SymbolId, (usize, usize)>,
    forward_declares: IndexMap<SymbolId, ForwardDeclare>,
    flushed_forward_declares: usize,
    used_names: FxHashSet<String>,
}

impl ModuleSymbolTable {
    pub fn build(
        file: &SourceFile,
        checker: &dyn TypeChecker,
        host: &TsickleHost,
        module_kind: ModuleKind,
        googmodule: bool,
    ) -> Self {
        let mut table = Self {
            file_name: file.file_name.clone(),
            commonjs: !module_kind.is_es_module(),
            googmodule,
            ..Self::default()
        };
        for stmt in &file.statements {
            table
                .used_names
                .extend(stmt.declared_names().into_iter().map(str::to_string));
            if let StatementKind::Import(ImportDeclaration {
                clause: Some(clause),
                ..
            }) = &stmt.kind
            {
                table
                    .used_names
                    .extend(clause.default.iter().map(|d| d.name.clone()));
                match &clause.bindings {
                    Some(NamedImportBindings::Namespace(ns)) => {
                        table.used_names.insert(ns.name.clone());
                    }
                    Some(NamedImportBindings::Named(specs)) => {
                        table
                            .used_names
                            .extend(specs.iter().map(|s| s.name.name.clone()));
                    }
                    None => {}
                }
            }
        }

        for stmt in &file.statements {
            match &stmt.kind {
                StatementKind::Import(decl) => table.add_import(decl, checker, host),
                StatementKind::ImportEquals(decl) => table.add_import_equals(decl, checker, host),
                _ => {}
            }
        }
        debug!(
            file = %table.file_name,
            imports = table.entries.len(),
            "module symbol table built"
        );
        table
    }

    fn add_import(&mut self, decl: &ImportDeclaration, checker: &dyn TypeChecker, host: &TsickleHost) {
        let specifier = decl.module_specifier.value.clone();
        let mut bindings = Vec::new();
        if let Some(clause) = &decl.clause {
            if let Some(default) = &clause.default {
                bindings.push(Self::binding(
                    checker,
                    &default.name,
                    default.id,
                    Some("default".to_string()),
                    BindingKind::Default,
                    decl.is_type_only,
                ));
            }
            match &clause.bindings {
                Some(NamedImportBindings::Namespace(ns)) => bindings.push(Self::binding(
                    checker,
                    &ns.name,
                    ns.id,
                    None,
                    BindingKind::Namespace,
                    decl.is_type_only,
                )),
                Some(NamedImportBindings::Named(specs)) => {
                    for spec in specs {
                        bindings.push(Self::binding(
                            checker,
                            &spec.name.name,
                            spec.name.id,
                            Some(spec.imported_name().to_string()),
                            BindingKind::Named,
                            decl.is_type_only || spec.is_type_only,
                        ));
                    }
                }
                None => {}
            }
        }
        let side_effect_only = decl.clause.is_none();
        let namespace_local = bindings
            .iter()
            .find(|b| b.kind == BindingKind::Namespace)
            .map(|b| b.local.clone());
        self.push_entry(
            checker,
            host,
            specifier,
            decl.module_specifier.single_quote,
            bindings,
            side_effect_only,
            namespace_local,
        );
    }

    fn add_import_equals(
        &mut self,
        decl: &ImportEqualsDeclaration,
        checker: &dyn TypeChecker,
        host: &TsickleHost,
    ) {
        let ModuleReference::External(specifier) = &decl.reference else {
            return;
        };
        let binding = Self::binding(
            checker,
            &decl.name.name,
            decl.name.id,
            None,
            BindingKind::ImportEquals,
            false,
        );
        let local = binding.local.clone();
        self.push_entry(
            checker,
            host,
            specifier.value.clone(),
            specifier.single_quote,
            vec![binding],
            false,
            Some(local),
        );
    }

    fn binding(
        checker: &dyn TypeChecker,
        local: &str,
        node: tsickle_program::NodeId,
        imported: Option<String>,
        kind: BindingKind,
        type_only_syntax: bool,
    ) -> ImportBinding {
        let symbol = checker.symbol_of_node(node);
        let is_value = !type_only_syntax
            && symbol.is_none_or(|sym| checker.is_referenced_as_value(sym));
        ImportBinding {
            local: local.to_string(),
            imported,
            kind,
            symbol,
            is_value,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push_entry(
        &mut self,
        checker: &dyn TypeChecker,
        host: &TsickleHost,
        specifier: String,
        single_quote: bool,
        bindings: Vec<ImportBinding>,
        side_effect_only: bool,
        module_object_local: Option<String>,
    ) {
        let resolved = checker.resolve_module(&self.file_name, &specifier);
        let module_id = module_id(host, &self.file_name, &specifier, resolved.as_ref().map(|r| r.file_name.as_str()));
        let is_type_only = !side_effect_only && bindings.iter().all(|b| !b.is_value);
        let base = alias_base(&specifier);

        let require_alias = if self.commonjs && !side_effect_only && !is_type_only {
            Some(module_object_local.unwrap_or_else(|| self.fresh_name(&base)))
        } else {
            None
        };
        let type_alias = if self.googmodule && is_type_only {
            Some(self.fresh_name(&format!("tsickle_{base}")))
        } else {
            None
        };

        let entry_idx = self.entries.len();
        for (binding_idx, binding) in bindings.iter().enumerate() {
            if let Some(sym) = binding.symbol {
                self.by_symbol.insert(sym, (entry_idx, binding_idx));
            }
        }
        self.entries.push(ImportEntry {
            specifier,
            single_quote,
            module_id,
            resolved_file: resolved.as_ref().map(|r| r.file_name.clone()),
            module_symbol: resolved.and_then(|r| r.module_symbol),
            bindings,
            side_effect_only,
            is_type_only,
            require_alias,
            type_alias,
        });
    }

    /// `base_1`, `base_2`, ... whichever is free first.
    pub fn fresh_name(&mut self, base: &str) -> String {
        let mut n = 1;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used_names.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }

    /// The entry for an import statement of the file: the one binding
    /// `local`, or the side-effect import when `local` is `None`.
    pub fn entry_for(&self, specifier: &str, local: Option<&str>) -> Option<&ImportEntry> {
        self.entries.iter().find(|entry| {
            entry.specifier == specifier
                && match local {
                    Some(local) => entry.bindings.iter().any(|b| b.local == local),
                    None => entry.bindings.is_empty(),
                }
        })
    }

    /// Output expression for a value reference to an import binding in
    /// CommonJS output (`x_1.a`, `x_1.default`). `None` when the local name
    /// stays as it is.
    pub fn value_rewrite(&self, symbol: SymbolId) -> Option<String> {
        if !self.commonjs {
            return None;
        }
        let (entry_idx, binding_idx) = *self.by_symbol.get(&symbol)?;
        let entry = &self.entries[entry_idx];
        let binding = &entry.bindings[binding_idx];
        match binding.kind {
            BindingKind::Named | BindingKind::Default if !entry.is_type_only => {
                Some(entry.binding_expression(binding, true))
            }
            _ => None,
        }
    }

    /// Name a top-level symbol `top` exported by `module` from within this
    /// file's type annotations: the binding that imports it, the module object
    /// of an import of that module, or a forward-declared `goog.requireType`.
    pub fn reference_to_module_export(
        &mut self,
        checker: &dyn TypeChecker,
        host: &TsickleHost,
        module: SymbolId,
        top: SymbolId,
        top_name: &str,
    ) -> Option<String> {
        let commonjs = self.commonjs;
        let of_module = |entry: &&ImportEntry| entry.module_symbol == Some(module);

        for entry in self.entries.iter().filter(of_module) {
            for binding in &entry.bindings {
                if matches!(binding.kind, BindingKind::Named | BindingKind::Default)
                    && binding.symbol.map(|s| checker.resolve_alias(s)) == Some(top)
                {
                    return Some(entry.binding_expression(binding, commonjs));
                }
            }
        }
        for entry in self.entries.iter().filter(of_module) {
            if let Some(binding) = entry
                .bindings
                .iter()
                .find(|b| matches!(b.kind, BindingKind::Namespace | BindingKind::ImportEquals))
            {
                return Some(format!("{}.{top_name}", entry.binding_expression(binding, commonjs)));
            }
        }
        if commonjs {
            for entry in self.entries.iter().filter(of_module) {
                let object = if entry.is_type_only {
                    entry.type_alias.as_deref()
                } else {
                    entry.require_alias.as_deref()
                };
                if let Some(object) = object {
                    return Some(format!("{object}.{top_name}"));
                }
            }
        }
        if self.googmodule {
            let alias = self.forward_declare(checker, host, module)?;
            return Some(format!("{alias}.{top_name}"));
        }
        None
    }

    /// Alias of a `goog.requireType` for `module`, declaring it on first use.
    pub fn forward_declare(
        &mut self,
        checker: &dyn TypeChecker,
        host: &TsickleHost,
        module: SymbolId,
    ) -> Option<String> {
        if let Some(existing) = self.forward_declares.get(&module) {
            return Some(existing.alias.clone());
        }
        let module_file = checker.get_symbol(module)?.declaration_file.clone()?;
        let module_id = host.module_name(&self.file_name, &module_file);
        let alias = self.fresh_name(&format!("tsickle_{}", alias_base(&module_file)));
        debug!(%module_id, %alias, "forward-declaring goog.requireType");
        self.forward_declares.insert(
            module,
            ForwardDeclare {
                alias: alias.clone(),
                module_id,
            },
        );
        Some(alias)
    }

    /// Forward declares added since the last call.
    pub fn take_forward_declares(&mut self) -> Vec<ForwardDeclare> {
        let fresh: Vec<ForwardDeclare> = self
            .forward_declares
            .values()
            .skip(self.flushed_forward_declares)
            .cloned()
            .collect();
        self.flushed_forward_declares = self.forward_declares.len();
        fresh
    }
}

/// A local name bound by an import statement, `None` for side-effect imports.
pub fn import_local(decl: &ImportDeclaration) -> Option<&str> {
    let clause = decl.clause.as_ref()?;
    if let Some(default) = &clause.default {
        return Some(&default.name);
    }
    match clause.bindings.as_ref()? {
        NamedImportBindings::Namespace(ns) => Some(&ns.name),
        NamedImportBindings::Named(specs) => specs.first().map(|s| s.name.name.as_str()),
    }
}

/// Module id of `specifier` imported from `file_name`. With
/// `convert_index_import_shorthand`, a directory import that resolves to an
/// `index` file names the index file.
pub fn module_id(host: &TsickleHost, file_name: &str, specifier: &str, resolved_file: Option<&str>) -> String {
    let fallback = match resolved_file {
        None if host.options.convert_index_import_shorthand => host.resolve_fallback(file_name, specifier),
        _ => None,
    };
    if host.options.convert_index_import_shorthand
        && let Some(resolved) = resolved_file.or(fallback.as_deref())
        && path::basename(path::strip_script_extension(resolved)) == "index"
        && path::basename(specifier) != "index"
    {
        let import = format!("{}/index", specifier.trim_end_matches('/'));
        return host.module_name(file_name, &import);
    }
    host.module_name(file_name, specifier)
}

/// Identifier-safe stem of a module specifier: `./foo/bar-baz.js` → `bar_baz`.
pub fn alias_base(specifier: &str) -> String {
    let stem = path::basename(path::strip_script_extension(specifier.trim_end_matches('/')));
    let mut base: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
        base.insert(0, '_');
    }
    base
}

#[cfg(test)]
#[path = "../tests/module_symbols.rs"]
mod tests;
