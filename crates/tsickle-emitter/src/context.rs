//! State shared by the passes that process one source file.

use crate::diagnostics::FileDiagnostics;
use crate::enums::ConstEnumPolicy;
use crate::host::TsickleHost;
use crate::module_symbols::ModuleSymbolTable;
use crate::type_translator::TypeTranslator;
use indexmap::IndexMap;
use tsickle_common::{CompilerOptions, ModuleKind, path};
use tsickle_program::{SourceFile, TypeChecker};

pub struct FileContext<'a> {
    pub checker: &'a dyn TypeChecker,
    pub host: &'a TsickleHost,
    pub options: &'a CompilerOptions,
    pub file_name: String,
    /// Output module system. goog.module output is lowered as CommonJS first.
    pub module_kind: ModuleKind,
    pub const_enums: ConstEnumPolicy,
    pub symbols: ModuleSymbolTable,
    /// `export * from` specifier -> the explicit names it was expanded to.
    pub export_star_expansions: IndexMap<String, Vec<String>>,
    pub diagnostics: FileDiagnostics,
}

impl<'a> FileContext<'a> {
    pub fn new(
        file: &SourceFile,
        checker: &'a dyn TypeChecker,
        host: &'a TsickleHost,
        options: &'a CompilerOptions,
    ) -> Self {
        let module_kind = if host.options.googmodule {
            ModuleKind::CommonJS
        } else {
            options.module
        };
        let symbols = ModuleSymbolTable::build(file, checker, host, module_kind, host.options.googmodule);
        Self {
            checker,
            host,
            options,
            file_name: file.file_name.clone(),
            module_kind,
            const_enums: ConstEnumPolicy::from_options(options),
            symbols,
            export_star_expansions: IndexMap::new(),
            diagnostics: FileDiagnostics::new(path::normalize(&file.file_name)),
        }
    }

    pub fn is_commonjs(&self) -> bool {
        !self.module_kind.is_es_module()
    }

    pub fn googmodule(&self) -> bool {
        self.host.options.googmodule
    }

    pub fn es5(&self) -> bool {
        self.host.options.es5_mode
    }

    pub fn translator(&mut self) -> TypeTranslator<'_> {
        TypeTranslator::new(self.checker, self.host, &mut self.symbols)
    }
}
