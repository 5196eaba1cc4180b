//! Diagnostic codes and message templates reported by the pipeline itself.
//!
//! Diagnostics coming from the external checker keep their own codes; the
//! codes here live in the 9xxxx range so the two never collide.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const PLAIN_NAMESPACE_UNSUPPORTED: u32 = 90001;
    pub const REDUNDANT_JSDOC_TYPE: u32 = 90002;
    pub const REDUNDANT_JSDOC_TAG: u32 = 90003;
    pub const UNNAMED_STUB_MEMBER: u32 = 90004;
    pub const AMBIGUOUS_EXPORT_STAR: u32 = 90005;
    pub const TRANSFORM_FAILED: u32 = 90006;
    pub const TS_MIGRATION_SHIM_DISABLED: u32 = 90007;
    pub const TS_MIGRATION_SHIM_MALFORMED: u32 = 90008;
    pub const TS_MIGRATION_SHIM_DUPLICATE: u32 = 90009;
    pub const GOOGMODULE_REQUIRES_COMMONJS: u32 = 90010;
    pub const UNSUPPORTED_EXPORT_ASSIGNMENT: u32 = 90011;
}

pub mod diagnostic_messages {
    pub const PLAIN_NAMESPACE_UNSUPPORTED: &str =
        "transformation of plain namespace '{0}' is not supported by Closure; it is emitted untyped";
    pub const REDUNDANT_JSDOC_TYPE: &str =
        "the type annotation on @{0} is redundant with its TypeScript type, remove the {...} part";
    pub const REDUNDANT_JSDOC_TAG: &str =
        "@{0} annotations are redundant with TypeScript equivalents";
    pub const UNNAMED_STUB_MEMBER: &str =
        "could not emit a type declaration for member '{0}' of '{1}': the name is not an identifier";
    pub const AMBIGUOUS_EXPORT_STAR: &str =
        "'{0}' is exported by more than one 'export *' source ('{1}', '{2}') and was left out of the expansion";
    pub const TRANSFORM_FAILED: &str = "failed to process '{0}': {1}";
    pub const TS_MIGRATION_SHIM_DISABLED: &str =
        "goog.{0} requires the generateTsMigrationExportsShim option and goog.module output";
    pub const TS_MIGRATION_SHIM_MALFORMED: &str = "malformed goog.{0} call: {1}";
    pub const TS_MIGRATION_SHIM_DUPLICATE: &str =
        "a file may contain at most one goog.tsMigration*ExportsShim call";
    pub const GOOGMODULE_REQUIRES_COMMONJS: &str =
        "goog.module output is lowered through CommonJS; the '{0}' module option is ignored";
    pub const UNSUPPORTED_EXPORT_ASSIGNMENT: &str =
        "'export =' of '{0}' cannot be expressed in goog.module output; emitted as 'exports ='";
}

macro_rules! message {
    ($name:ident) => {
        DiagnosticMessage {
            code: diagnostic_codes::$name,
            category: DiagnosticCategory::Warning,
            message: diagnostic_messages::$name,
        }
    };
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    message!(PLAIN_NAMESPACE_UNSUPPORTED),
    message!(REDUNDANT_JSDOC_TYPE),
    message!(REDUNDANT_JSDOC_TAG),
    message!(UNNAMED_STUB_MEMBER),
    message!(AMBIGUOUS_EXPORT_STAR),
    message!(TRANSFORM_FAILED),
    message!(TS_MIGRATION_SHIM_DISABLED),
    message!(TS_MIGRATION_SHIM_MALFORMED),
    message!(TS_MIGRATION_SHIM_DUPLICATE),
    message!(GOOGMODULE_REQUIRES_COMMONJS),
    message!(UNSUPPORTED_EXPORT_ASSIGNMENT),
];

/// Look up the template registered for `code`.
pub fn message_for(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}
