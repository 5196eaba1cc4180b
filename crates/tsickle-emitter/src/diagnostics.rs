//! Diagnostics reporting for an emit.
//!
//! Three classes:
//! - fatal: pre-emit diagnostics from the program stop the emit before any
//!   file is processed
//! - warning: delivered to the host's `log_warning` as soon as a file is done
//!   and collected into the emit result, unless the host suppresses warnings
//!   for the file's path (suppressed warnings are neither logged nor
//!   collected)
//! - silent: degradations such as `?` for unresolvable types, which are only
//!   traced

use crate::host::TsickleHost;
use tracing::{debug, trace};
use tsickle_common::Diagnostic;
use tsickle_common::diagnostics::data::message_for;
use tsickle_common::diagnostics::format_message;
use tsickle_common::Span;

/// Build a warning from one of the pipeline's message codes.
pub fn warning(code: u32, file: &str, span: Span, args: &[&str]) -> Diagnostic {
    match message_for(code) {
        Some(template) => Diagnostic::from_message(template, file, span.start, span.len(), args),
        None => Diagnostic::warning(file, span.start, span.len(), format_message("{0}", args), code),
    }
}

/// Per-file warning buffer. Passes push into it; the reporter routes the
/// contents once the file is finished (or has failed).
#[derive(Debug, Default)]
pub struct FileDiagnostics {
    file_name: String,
    warnings: Vec<Diagnostic>,
}

impl FileDiagnostics {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            warnings: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn warn(&mut self, code: u32, span: Span, args: &[&str]) {
        let diag = warning(code, &self.file_name, span, args);
        debug!(code, message = %diag.message_text, "warning");
        self.warnings.push(diag);
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.warnings.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.warnings
    }
}

/// Routes diagnostics for one emit.
pub struct DiagnosticsReporter<'h> {
    host: &'h TsickleHost,
    collected: Vec<Diagnostic>,
}

impl<'h> DiagnosticsReporter<'h> {
    pub fn new(host: &'h TsickleHost) -> Self {
        Self {
            host,
            collected: Vec::new(),
        }
    }

    /// Log and collect a warning unless its file is suppressed.
    pub fn report_warning(&mut self, diagnostic: Diagnostic) {
        if (self.host.should_ignore_warnings_for_path)(&diagnostic.file) {
            trace!(file = %diagnostic.file, code = diagnostic.code, "warning suppressed for path");
            return;
        }
        if let Some(log_warning) = &self.host.log_warning {
            log_warning(&diagnostic);
        }
        self.collected.push(diagnostic);
    }

    pub fn report_file(&mut self, diagnostics: FileDiagnostics) {
        for diagnostic in diagnostics.into_vec() {
            self.report_warning(diagnostic);
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.collected
    }
}

/// Whether pre-emit diagnostics stop the emit.
pub fn is_fatal(pre_emit: &[Diagnostic]) -> bool {
    !pre_emit.is_empty()
}

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;
