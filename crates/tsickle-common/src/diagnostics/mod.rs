//! Diagnostics shared by the program model and the emitter.
//!
//! Checker diagnostics arrive with their TypeScript codes; the pipeline's own
//! warnings use the codes in [`diagnostic_codes`] (the 9xxxx range).

pub mod data;

use serde::{Deserialize, Serialize};

pub use data::{DIAGNOSTIC_MESSAGES, message_for};

/// First code of the pipeline's own range.
pub const TSICKLE_CODE_BASE: u32 = 90000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

/// A registered message template.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_messages {
    pub use super::data::diagnostic_messages::*;
}

pub mod diagnostic_codes {
    pub use super::data::diagnostic_codes::*;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Normalized path of the file, empty for program-wide diagnostics.
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn new(
        category: DiagnosticCategory,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category,
            code,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        }
    }

    pub fn error(file: impl Into<String>, start: u32, length: u32, message: impl Into<String>, code: u32) -> Self {
        Self::new(DiagnosticCategory::Error, file, start, length, message, code)
    }

    pub fn warning(file: impl Into<String>, start: u32, length: u32, message: impl Into<String>, code: u32) -> Self {
        Self::new(DiagnosticCategory::Warning, file, start, length, message, code)
    }

    /// Instantiate `template`, substituting `{0}`, `{1}`, ... with `args`.
    pub fn from_message(
        template: &DiagnosticMessage,
        file: impl Into<String>,
        start: u32,
        length: u32,
        args: &[&str],
    ) -> Self {
        let message = format_message(template.message, args);
        Self::new(template.category, file, start, length, message, template.code)
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Whether the pipeline (rather than the checker) reported this.
    pub fn is_tsickle(&self) -> bool {
        self.code >= TSICKLE_CODE_BASE
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let category = match self.category {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
        };
        let prefix = if self.is_tsickle() { "tsickle" } else { "TS" };
        if !self.file.is_empty() {
            write!(f, "{}({}): ", self.file, self.start)?;
        }
        write!(f, "{category} {prefix}{}: {}", self.code, self.message_text)
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    message_for(code).map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(message.to_string(), |text, (i, arg)| text.replace(&format!("{{{i}}}"), arg))
}

#[cfg(test)]
#[path = "../../tests/diagnostics.rs"]
mod tests;
