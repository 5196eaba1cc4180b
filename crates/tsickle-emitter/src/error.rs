//! Errors that abort the processing of a single file.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The skip predicate must see absolute paths.
    #[error("'{0}' is not an absolute path; set the host base directory to an absolute path")]
    RelativePath(String),

    #[error("{construct} is not supported in {context}")]
    Unsupported {
        construct: String,
        context: &'static str,
    },

    #[error("enum member of '{enum_name}' has a computed name")]
    ComputedEnumMember { enum_name: String },

    #[error("processing panicked: {0}")]
    Panicked(String),
}

impl TransformError {
    pub fn unsupported(construct: impl Into<String>, context: &'static str) -> Self {
        Self::Unsupported {
            construct: construct.into(),
            context,
        }
    }
}

pub type Result<T, E = TransformError> = std::result::Result<T, E>;
