//! Strongly-typed handles into the program's arenas.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Get the raw ID value.
            pub const fn as_u32(self) -> u32 {
                self.0
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identity of an AST node. The checker keys node types and symbols by it.
    NodeId,
    "node"
);
define_id!(
    /// Identity of a resolved type. Two types are the same type iff their ids
    /// are equal, which is what the visited set relies on.
    TypeId,
    "type"
);
define_id!(
    /// Identity of a symbol in the checker's symbol table.
    SymbolId,
    "sym"
);

impl NodeId {
    /// Nodes created by transforms. They never resolve to a type or symbol.
    pub const SYNTHETIC: NodeId = NodeId(u32::MAX);

    pub const fn is_synthetic(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::SYNTHETIC
    }
}
