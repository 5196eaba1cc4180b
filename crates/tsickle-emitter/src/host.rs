//! Host configuration for an emit.
//!
//! Everything the pipeline needs from its caller besides the program:
//! feature switches, the warning sink, the per-file skip predicate and the
//! path → module id mapping. Every option is defaulted explicitly; the host is
//! merged once when `emit()` starts and is read-only afterwards.

use serde::Deserialize;
use tsickle_common::Diagnostic;
use tsickle_common::path;

/// Plain options of a [`TsickleHost`], deserializable from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostOptions {
    /// Lower classes to constructor functions and use `var` for requires.
    pub es5_mode: bool,
    /// Emit `goog.module` files (CommonJS lowering is forced).
    pub googmodule: bool,
    /// Directory imports that resolve to an `index` file use the resolved path.
    pub convert_index_import_shorthand: bool,
    /// Turn `@Annotation` decorators into Closure-typed class metadata.
    pub transform_decorators: bool,
    /// Annotate output with Closure JSDoc types and rewrite modules for Closure.
    pub transform_types_to_closure: bool,
    /// Emit `.tsmes.js` files for `goog.tsMigration*ExportsShim` calls.
    pub generate_ts_migration_exports_shim: bool,
    /// Directory relative file names are resolved against.
    pub base_dir: String,
    /// Directories `root_dirs_relative` strips from file names.
    pub root_dirs: Vec<String>,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            es5_mode: false,
            googmodule: false,
            convert_index_import_shorthand: false,
            transform_decorators: false,
            transform_types_to_closure: false,
            generate_ts_migration_exports_shim: false,
            base_dir: "/".to_string(),
            root_dirs: Vec::new(),
        }
    }
}

/// Fallback module resolution for specifiers the checker did not resolve.
pub trait ModuleResolutionHost {
    fn file_exists(&self, file_name: &str) -> bool;
}

pub type WarningSink = Box<dyn Fn(&Diagnostic)>;
pub type PathPredicate = Box<dyn Fn(&str) -> bool>;
pub type ModuleNamer = Box<dyn Fn(&str, &str) -> String>;
pub type PathMapper = Box<dyn Fn(&str) -> String>;

pub struct TsickleHost {
    pub options: HostOptions,
    pub log_warning: Option<WarningSink>,
    pub should_skip_tsickle_processing: PathPredicate,
    pub should_ignore_warnings_for_path: PathPredicate,
    /// `(context_file, import_path) -> module id`
    pub path_to_module_name: ModuleNamer,
    pub file_name_to_module_id: PathMapper,
    pub module_resolution_host: Option<Box<dyn ModuleResolutionHost>>,
}

impl TsickleHost {
    pub fn new(options: HostOptions) -> Self {
        Self {
            options,
            log_warning: None,
            should_skip_tsickle_processing: Box::new(|_| false),
            should_ignore_warnings_for_path: Box::new(|_| false),
            path_to_module_name: Box::new(default_path_to_module_name),
            file_name_to_module_id: Box::new(default_file_name_to_module_id),
            module_resolution_host: None,
        }
    }

    pub fn with_log_warning(mut self, sink: impl Fn(&Diagnostic) + 'static) -> Self {
        self.log_warning = Some(Box::new(sink));
        self
    }

    pub fn with_skip_predicate(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.should_skip_tsickle_processing = Box::new(predicate);
        self
    }

    pub fn with_warning_filter(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.should_ignore_warnings_for_path = Box::new(predicate);
        self
    }

    pub fn with_path_to_module_name(
        mut self,
        namer: impl Fn(&str, &str) -> String + 'static,
    ) -> Self {
        self.path_to_module_name = Box::new(namer);
        self
    }

    pub fn with_file_name_to_module_id(mut self, mapper: impl Fn(&str) -> String + 'static) -> Self {
        self.file_name_to_module_id = Box::new(mapper);
        self
    }

    pub fn with_module_resolution_host(mut self, host: impl ModuleResolutionHost + 'static) -> Self {
        self.module_resolution_host = Some(Box::new(host));
        self
    }

    /// Module id for an import of `import_path` from `context`.
    pub fn module_name(&self, context: &str, import_path: &str) -> String {
        (self.path_to_module_name)(context, import_path)
    }

    pub fn module_id(&self, file_name: &str) -> String {
        (self.file_name_to_module_id)(file_name)
    }

    /// Resolve a relative `specifier` through the fallback resolution host:
    /// `<spec>.ts`, `<spec>.tsx`, `<spec>.d.ts`, then `<spec>/index.ts`.
    pub fn resolve_fallback(&self, containing_file: &str, specifier: &str) -> Option<String> {
        let resolver = self.module_resolution_host.as_ref()?;
        if !path::is_relative_specifier(specifier) {
            return None;
        }
        let joined = path::join(path::dirname(containing_file), specifier);
        let base = path::strip_script_extension(&joined);
        [".ts", ".tsx", ".d.ts", "/index.ts", "/index.d.ts"]
            .iter()
            .map(|suffix| format!("{base}{suffix}"))
            .find(|candidate| resolver.file_exists(candidate))
    }

    /// `file_name` with the first matching root dir (or the base dir) removed.
    pub fn root_dirs_relative(&self, file_name: &str) -> String {
        let file = path::normalize(file_name);
        for root in &self.options.root_dirs {
            let root = path::normalize(root);
            if let Some(rest) = file.strip_prefix(&root)
                && let Some(rest) = rest.strip_prefix('/')
            {
                return rest.to_string();
            }
        }
        let base = path::normalize(&self.options.base_dir);
        let base = base.trim_end_matches('/');
        if !base.is_empty()
            && let Some(rest) = file.strip_prefix(base)
            && let Some(rest) = rest.strip_prefix('/')
        {
            return rest.to_string();
        }
        file
    }

    /// `file_name` made absolute against the base dir.
    pub fn absolute_path(&self, file_name: &str) -> String {
        if path::is_absolute(file_name) {
            path::normalize(file_name)
        } else {
            path::join(&self.options.base_dir, file_name)
        }
    }
}

impl Default for TsickleHost {
    fn default() -> Self {
        Self::new(HostOptions::default())
    }
}

impl std::fmt::Debug for TsickleHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsickleHost")
            .field("options", &self.options)
            .field("log_warning", &self.log_warning.is_some())
            .field("module_resolution_host", &self.module_resolution_host.is_some())
            .finish_non_exhaustive()
    }
}

/// `pathToModuleName` used when the host does not supply one.
///
/// Relative imports are resolved against the importing file, the script
/// extension is stripped and path separators become dots:
/// `("src/a/b.ts", "../c/d")` → `src.c.d`. Bare specifiers keep their text
/// with separators dotted (`tslib` → `tslib`).
pub fn default_path_to_module_name(context: &str, import_path: &str) -> String {
    let resolved = if path::is_relative_specifier(import_path) {
        path::join(&path::dirname(context), import_path)
    } else {
        path::normalize(import_path)
    };
    let stripped = path::strip_script_extension(&resolved);
    let dotted: String = stripped
        .chars()
        .map(|c| if c == '/' || c == '\\' { '.' } else { c })
        .collect();
    dotted.trim_start_matches('.').to_string()
}

/// `fileNameToModuleId` used when the host does not supply one.
pub fn default_file_name_to_module_id(file_name: &str) -> String {
    file_name.strip_prefix("./").unwrap_or(file_name).to_string()
}

#[cfg(test)]
#[path = "../tests/host.rs"]
mod tests;
