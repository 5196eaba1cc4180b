//! The program model tsickle consumes.
//!
//! Type checking is done by an external front end. This crate describes what
//! the front end hands over:
//! - the typed AST (`ast`), with [`NodeId`]s the checker can be queried with
//! - resolved types (`types`) and symbols (`symbols`)
//! - the [`TypeChecker`] and [`Program`] traits
//! - an in-memory implementation assembled with [`ProgramBuilder`]
//! - mutable traversal for AST transforms (`visit`)

pub mod ids;
pub use ids::{NodeId, SymbolId, TypeId};

pub mod ast;
pub use ast::{SourceFile, Statement, StatementKind, VarKind};

pub mod types;
pub use types::{ObjectType, Signature, SignatureParameter, Type, TypeData};

pub mod symbols;
pub use symbols::{Symbol, SymbolFlags};

pub mod checker;
pub use checker::{Program, ResolvedModule, TypeChecker};

pub mod builder;
pub use builder::{InMemoryProgram, ProgramBuilder};

pub mod visit;
pub use visit::VisitMut;
