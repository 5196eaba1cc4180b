//! Closure Compiler annotation for type-checked TypeScript programs.
//!
//! A front end builds a [`Program`] (typed AST plus a [`TypeChecker`]); [`emit`]
//! turns every source file into JavaScript carrying Closure JSDoc types, with
//! imports and exports rewritten for the chosen module system:
//!
//! ```no_run
//! use tsickle::{EmitOptions, HostOptions, ProgramBuilder, TsickleHost, emit};
//!
//! let program = ProgramBuilder::new(Default::default()).build();
//! let host = TsickleHost::new(HostOptions {
//!     googmodule: true,
//!     transform_types_to_closure: true,
//!     ..HostOptions::default()
//! });
//! let result = emit(&program, &host, &mut |name: &str, text: &str| {
//!     std::fs::write(name, text).ok();
//! }, EmitOptions::default());
//! assert!(!result.emit_skipped);
//! ```

pub mod config;
pub mod tracing_config;

pub use config::{ConfigError, TsickleConfig};

pub use tsickle_common::{CompilerOptions, Diagnostic, DiagnosticCategory, ModuleKind, ScriptTarget};
pub use tsickle_emitter::{
    CancellationToken, EmitOptions, EmitResult, EmitTransformers, HostOptions, ModuleResolutionHost,
    ModulesManifest, TransformError, TsickleHost, WriteFile, emit,
};
pub use tsickle_program::{InMemoryProgram, Program, ProgramBuilder, SourceFile, TypeChecker};

/// The workspace crates, for callers that need the full module tree.
pub use tsickle_common as common;
pub use tsickle_emitter as emitter;
pub use tsickle_program as program;
