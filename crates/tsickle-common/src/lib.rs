//! Common types and utilities for the tsickle Closure annotation pipeline.
//!
//! This crate provides foundational types used across all tsickle crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, codes and messages)
//! - Compiler options (`CompilerOptions`, `ModuleKind`, `ScriptTarget`)
//! - Source spans (`Span`)
//! - Path helpers shared by module naming and output file naming
//! - Centralized limits

// Diagnostics - shared by the program model and the emitter
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Common types - compiler options consumed from the external program
pub mod common;
pub use common::{CompilerOptions, ModuleKind, ScriptTarget};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Path helpers (forward-slash normalized)
pub mod path;

// Centralized limits and thresholds
pub mod limits;
