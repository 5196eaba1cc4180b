//! Resolved types as reported by the checker.
//!
//! Types live in the checker's arena and are referred to by [`TypeId`];
//! identity of the id is identity of the type. Recursive types are expressed
//! by ids that point back up the graph, so consumers walking a type must track
//! what they have already entered.

use crate::ids::{SymbolId, TypeId};

#[derive(Clone, Debug, PartialEq)]
pub struct Type {
    pub data: TypeData,
    /// Set when the type was written through a type alias (`type A = ...`).
    pub alias_symbol: Option<SymbolId>,
    pub alias_type_arguments: Vec<TypeId>,
}

impl Type {
    pub fn new(data: TypeData) -> Self {
        Self {
            data,
            alias_symbol: None,
            alias_type_arguments: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeData {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    BigInt,
    ESSymbol,
    /// The `object` keyword type.
    NonPrimitive,
    StringLiteral(String),
    NumberLiteral(String),
    BooleanLiteral(bool),
    BigIntLiteral(String),
    /// An enum type (union of its members).
    Enum { symbol: SymbolId },
    /// A single enum member type.
    EnumLiteral { enum_symbol: SymbolId, member: SymbolId },
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    /// Instance type of a named class or interface, possibly generic
    /// (`Foo`, `Array<number>`, `Map<K, V>`).
    Reference {
        target: SymbolId,
        type_arguments: Vec<TypeId>,
    },
    /// Anonymous structural type: object literal types, function types,
    /// `typeof` queries of functions and class constructors.
    Object(ObjectType),
    TypeParameter { name: String },
    Tuple(Vec<TypeId>),
    /// Polymorphic `this` inside a class or interface.
    This { owner: SymbolId },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectType {
    /// The symbol the anonymous type was created for, if any: the function for
    /// `typeof f`, the class for its static side, the type literal otherwise.
    pub symbol: Option<SymbolId>,
    pub properties: Vec<PropertySignature>,
    pub call_signatures: Vec<Signature>,
    pub construct_signatures: Vec<Signature>,
    pub string_index: Option<TypeId>,
    pub number_index: Option<TypeId>,
}

impl ObjectType {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.call_signatures.is_empty()
            && self.construct_signatures.is_empty()
            && self.string_index.is_none()
            && self.number_index.is_none()
    }

    /// A type with exactly one call signature and nothing else.
    pub fn single_call_signature(&self) -> Option<&Signature> {
        match self.call_signatures.as_slice() {
            [sig] if self.properties.is_empty() && self.construct_signatures.is_empty() => Some(sig),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertySignature {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub this_type: Option<TypeId>,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<SignatureParameter>,
    pub return_type: TypeId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignatureParameter {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}
