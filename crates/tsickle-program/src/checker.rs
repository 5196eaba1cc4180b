//! Interface to the external program / checker service.
//!
//! The pipeline never type checks; everything it knows about types, symbols,
//! module resolution and constant values it asks through these traits.

use crate::ast::{ConstantValue, SourceFile};
use crate::ids::{NodeId, SymbolId, TypeId};
use crate::symbols::Symbol;
use crate::types::{Type, TypeData};
use tsickle_common::limits::MAX_QUALIFIED_NAME_DEPTH;
use tsickle_common::{CompilerOptions, Diagnostic};

/// Result of resolving an import specifier from a given file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Resolved file name (`./a` from `src/b.ts` resolves to `src/a.ts`).
    pub file_name: String,
    /// The module's symbol, when the module is part of the program.
    pub module_symbol: Option<SymbolId>,
}

pub trait TypeChecker {
    /// Type of an expression, declaration name, parameter or type annotation.
    /// For function-like declarations this is an anonymous object type with
    /// exactly that declaration's call (or construct) signature.
    fn type_of_node(&self, node: NodeId) -> Option<TypeId>;

    /// Symbol declared or referenced by a node.
    fn symbol_of_node(&self, node: NodeId) -> Option<SymbolId>;

    fn get_type(&self, id: TypeId) -> Option<&Type>;

    fn get_symbol(&self, id: SymbolId) -> Option<&Symbol>;

    fn resolve_module(&self, containing_file: &str, specifier: &str) -> Option<ResolvedModule>;

    /// Every name a module exports, including names reached through
    /// `export *`, in export order. Names that two `export *` sources supply
    /// with different symbols are ambiguous and left out.
    fn exports_of_module(&self, module: SymbolId) -> Vec<(String, SymbolId)>;

    /// Whether an import alias is used in a value position anywhere in its
    /// file. Aliases only used in type positions are type-only.
    fn is_referenced_as_value(&self, alias: SymbolId) -> bool;

    /// Constant value of an enum member declaration or of an expression that
    /// references one.
    fn constant_value(&self, node: NodeId) -> Option<ConstantValue>;

    fn type_data(&self, id: TypeId) -> Option<&TypeData> {
        self.get_type(id).map(|ty| &ty.data)
    }

    fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.get_symbol(id).map(|sym| sym.name.as_str())
    }

    /// Follow alias symbols to the declaration they stand for.
    fn resolve_alias(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        for _ in 0..MAX_QUALIFIED_NAME_DEPTH {
            match self.get_symbol(current).and_then(|sym| sym.alias_target) {
                Some(target) if target != current => current = target,
                _ => break,
            }
        }
        current
    }
}

pub trait Program {
    /// Source files in compilation order.
    fn source_files(&self) -> &[SourceFile];

    fn checker(&self) -> &dyn TypeChecker;

    fn compiler_options(&self) -> &CompilerOptions;

    /// Syntactic, semantic and option diagnostics found before emit.
    fn pre_emit_diagnostics(&self) -> Vec<Diagnostic>;

    fn source_file(&self, file_name: &str) -> Option<&SourceFile> {
        self.source_files().iter().find(|f| f.file_name == file_name)
    }
}
