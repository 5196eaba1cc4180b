//! Checker symbols.

use crate::ids::{SymbolId, TypeId};
use bitflags::bitflags;
use indexmap::IndexMap;

bitflags! {
    /// What a symbol declares.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u32 {
        const VARIABLE = 1 << 0;
        const FUNCTION = 1 << 1;
        const CLASS = 1 << 2;
        const INTERFACE = 1 << 3;
        const TYPE_ALIAS = 1 << 4;
        const ENUM = 1 << 5;
        const CONST_ENUM = 1 << 6;
        const ENUM_MEMBER = 1 << 7;
        /// `namespace N` containing values.
        const VALUE_MODULE = 1 << 8;
        /// `namespace N` containing only types.
        const NAMESPACE_MODULE = 1 << 9;
        /// An external module (a source file with imports or exports).
        const SOURCE_FILE = 1 << 10;
        const TYPE_PARAMETER = 1 << 11;
        const PROPERTY = 1 << 12;
        const METHOD = 1 << 13;
        /// Import bindings, `import x = ...` and re-export specifiers.
        const ALIAS = 1 << 14;

        const VALUE = Self::VARIABLE.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::VALUE_MODULE.bits()
            | Self::PROPERTY.bits()
            | Self::METHOD.bits();
        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::TYPE_ALIAS.bits()
            | Self::ENUM.bits()
            | Self::CONST_ENUM.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::TYPE_PARAMETER.bits();
        const NAMESPACE = Self::VALUE_MODULE.bits()
            | Self::NAMESPACE_MODULE.bits()
            | Self::ENUM.bits()
            | Self::CONST_ENUM.bits();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    /// Containing namespace, class or module symbol. Top-level exported
    /// declarations have their file's module symbol as parent; non-exported
    /// locals and globals have none.
    pub parent: Option<SymbolId>,
    /// File of the (first) declaration.
    pub declaration_file: Option<String>,
    /// Declared type for classes, interfaces, aliases and enums.
    pub declared_type: Option<TypeId>,
    /// Members exported from a module or namespace, in declaration order.
    pub exports: IndexMap<String, SymbolId>,
    /// Target of an alias symbol.
    pub alias_target: Option<SymbolId>,
    /// Names of JSDoc tags on the declaration (`Annotation`, `deprecated`...).
    pub jsdoc_tags: Vec<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, flags: SymbolFlags) -> Self {
        Self {
            name: name.into(),
            flags,
            parent: None,
            declaration_file: None,
            declared_type: None,
            exports: IndexMap::new(),
            alias_target: None,
            jsdoc_tags: Vec::new(),
        }
    }

    pub fn is_value(&self) -> bool {
        self.flags.intersects(SymbolFlags::VALUE)
    }

    pub fn is_type_only(&self) -> bool {
        !self.is_value() && self.flags.intersects(SymbolFlags::TYPE | SymbolFlags::NAMESPACE_MODULE)
    }

    pub fn is_const_enum(&self) -> bool {
        self.flags.contains(SymbolFlags::CONST_ENUM)
    }

    pub fn has_jsdoc_tag(&self, tag: &str) -> bool {
        self.jsdoc_tags.iter().any(|t| t == tag)
    }
}
