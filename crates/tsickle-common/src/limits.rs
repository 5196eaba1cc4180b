//! Centralized limits and thresholds for the annotation pipeline.
//!
//! # Categories
//!
//! - **Recursion Depths**: bounds on recursive type serialization
//! - **Capacity Limits**: pre-allocation sizes

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth of a single Closure type translation.
///
/// The visited set already guarantees termination for cyclic types: any type
/// re-entered while it is still being translated prints as `?`. This bound
/// covers the remaining case of very deep but acyclic structures, where the
/// translator gives up and prints `?` for the innermost part.
///
/// # TypeScript example
///
/// ```typescript
/// // Each level is a fresh anonymous type, so the visited set never fires:
/// type Deep = { a: { a: { a: { a: /* ... hundreds of levels ... */ } } } };
/// ```
pub const MAX_TYPE_TRANSLATION_DEPTH: u32 = 64;

/// Maximum depth when walking a symbol's parent chain to build a qualified
/// name (`A.B.C.T`).
pub const MAX_QUALIFIED_NAME_DEPTH: u32 = 32;

/// Maximum depth of nested `export *` chains followed while collecting
/// module exports for wildcard expansion.
pub const MAX_EXPORT_STAR_DEPTH: u32 = 32;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity for the printer's output buffer.
pub const PRINTER_INITIAL_CAPACITY: usize = 4096;
