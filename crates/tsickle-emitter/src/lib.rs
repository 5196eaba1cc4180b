//! Closure annotation and JavaScript emit for type-checked TypeScript.
//!
//! [`emit`] drives a whole program through the per-file passes:
//! - type serialization into Closure syntax (`type_translator`)
//! - import/export rewriting and wildcard expansion (`module_rewriter`,
//!   `module_symbols`, `enums`)
//! - JSDoc annotation with dead-code-guarded member stubs (`jsdoc_transformer`,
//!   `stubs`, `jsdoc`)
//! - decorator and constructor lowering (`decorators`, `constructors`)
//! - TypeScript → JavaScript lowering into the output IR (`lowering`, `ir`)
//! - goog.module conversion, file overviews and ts-migration shims
//!
//! Declaration files are printed by `declarations`.

// Output
pub mod ir;
pub mod ir_printer;
pub use ir::{IRNode, JsFile};
pub use ir_printer::IRPrinter;

// Configuration and diagnostics
pub mod diagnostics;
pub mod error;
pub mod host;
pub use diagnostics::DiagnosticsReporter;
pub use error::{Result, TransformError};
pub use host::{HostOptions, ModuleResolutionHost, TsickleHost};

// Per-file state
pub mod context;
pub use context::FileContext;

// Type serialization
pub mod type_display;
pub mod type_translator;
pub mod visited;
pub use type_translator::TypeTranslator;
pub use visited::VisitedTypeSet;

// JSDoc
pub mod jsdoc;
pub mod jsdoc_transformer;
pub mod stubs;
pub use stubs::StubDeclaration;

// Modules
pub mod enums;
pub mod module_rewriter;
pub mod module_symbols;
pub use module_symbols::ModuleSymbolTable;

// Decorators and constructors
pub mod constructors;
pub mod decorators;

// Lowering and output passes
pub mod fileoverview;
pub mod goog_module;
pub mod lowering;
pub mod manifest;
pub mod ts_migration;
pub use manifest::ModulesManifest;

// Declaration files
pub mod declarations;
pub use declarations::emit_declarations;

// Orchestration
pub mod pipeline;
pub use pipeline::{
    CancellationToken, EmitOptions, EmitResult, EmitTransformers, WriteFile, emit,
};
