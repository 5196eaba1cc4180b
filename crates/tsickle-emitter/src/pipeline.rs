//! Emit orchestration.
//!
//! Files are processed one at a time in program order. Each file is either
//! skipped (the host's skip predicate holds) or processed:
//!
//! ```text
//! skipped:     before → decorators → const enums → lower → after
//! processing:  before → decorators → const enums → modules + JSDoc → lower
//!              → ts-migration shim → goog.module → fileoverview → after
//! ```
//!
//! A failure or panic inside one file becomes a warning and the file is not
//! written; the remaining files continue. Pre-emit diagnostics stop the emit
//! before any file is looked at.

use crate::context::FileContext;
use crate::declarations::emit_declarations;
use crate::decorators::DecoratorLowering;
use crate::diagnostics::{self, DiagnosticsReporter, FileDiagnostics};
use crate::enums::inline_const_enum_references;
use crate::error::{Result, TransformError};
use crate::fileoverview::add_fileoverview;
use crate::goog_module::GoogModuleConversion;
use crate::host::TsickleHost;
use crate::ir::JsFile;
use crate::ir_printer::IRPrinter;
use crate::jsdoc_transformer::JsDocTransformer;
use crate::lowering::lower_file;
use crate::manifest::ModulesManifest;
use crate::module_rewriter::ModuleRewriter;
use crate::ts_migration::{extract_shim, render_shim, shim_file_name};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use tsickle_common::diagnostics::diagnostic_codes;
use tsickle_common::{Diagnostic, ModuleKind, Span, path};
use tsickle_program::{Program, SourceFile};

// =============================================================================
// Public types
// =============================================================================

/// AST → AST transform run before the internal passes.
pub type BeforeTransform = Box<dyn Fn(&mut SourceFile)>;
/// IR → IR transform run on the lowered output.
pub type AfterTransform = Box<dyn Fn(&mut JsFile)>;
/// Transform of a file's `.d.ts` text.
pub type DeclarationTransform = Box<dyn Fn(&mut String)>;

/// Caller-supplied transforms, applied to every file in the given order.
#[derive(Default)]
pub struct EmitTransformers {
    pub before: Vec<BeforeTransform>,
    pub after: Vec<AfterTransform>,
    pub after_declarations: Vec<DeclarationTransform>,
}

impl std::fmt::Debug for EmitTransformers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitTransformers")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .field("after_declarations", &self.after_declarations.len())
            .finish()
    }
}

/// Cancellation signal, checked between files.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct EmitOptions {
    /// Only emit this source file.
    pub target_source_file: Option<String>,
    pub cancellation_token: Option<CancellationToken>,
    /// Write `.d.ts` files only.
    pub emit_only_dts_files: bool,
    pub transformers: EmitTransformers,
}

#[derive(Debug, Default)]
pub struct EmitResult {
    /// True when pre-emit diagnostics or cancellation stopped the emit.
    pub emit_skipped: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub modules_manifest: ModulesManifest,
}

/// Output sink: `(output file name, text)`.
pub trait WriteFile {
    fn write_file(&mut self, file_name: &str, text: &str);
}

impl<F: FnMut(&str, &str)> WriteFile for F {
    fn write_file(&mut self, file_name: &str, text: &str) {
        self(file_name, text)
    }
}

// =============================================================================
// Emit
// =============================================================================

/// Everything one file produces.
#[derive(Debug, Default)]
struct FileOutputs {
    files: Vec<(String, String)>,
    manifest: ModulesManifest,
}

pub fn emit(program: &dyn Program, host: &TsickleHost, write_file: &mut dyn WriteFile, options: EmitOptions) -> EmitResult {
    let pre_emit = program.pre_emit_diagnostics();
    if diagnostics::is_fatal(&pre_emit) {
        info!(count = pre_emit.len(), "pre-emit diagnostics, emit skipped");
        return EmitResult {
            emit_skipped: true,
            diagnostics: pre_emit,
            modules_manifest: ModulesManifest::new(),
        };
    }

    let compiler_options = program.compiler_options();
    let mut reporter = DiagnosticsReporter::new(host);
    if host.options.googmodule && compiler_options.module != ModuleKind::CommonJS {
        let module = format!("{:?}", compiler_options.module);
        reporter.report_warning(diagnostics::warning(
            diagnostic_codes::GOOGMODULE_REQUIRES_COMMONJS,
            "",
            Span::dummy(),
            &[&module],
        ));
    }

    let mut result = EmitResult::default();
    for file in program.source_files() {
        if options
            .cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            info!(file = %file.file_name, "emit cancelled");
            result.emit_skipped = true;
            break;
        }
        if file.is_declaration_file {
            continue;
        }
        if let Some(target) = &options.target_source_file
            && path::normalize(target) != path::normalize(&file.file_name)
        {
            continue;
        }

        let mut file_diagnostics = FileDiagnostics::new(path::normalize(&file.file_name));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            emit_file(program, host, file, &options, &mut file_diagnostics)
        }));
        let failure = match outcome {
            Ok(Ok(outputs)) => {
                for (name, text) in &outputs.files {
                    write_file.write_file(name, text);
                }
                result.modules_manifest.merge(outputs.manifest);
                None
            }
            Ok(Err(err)) => Some(err),
            Err(payload) => Some(TransformError::Panicked(panic_message(payload.as_ref()))),
        };
        if let Some(err) = failure {
            warn!(file = %file.file_name, error = %err, "file not emitted");
            let message = err.to_string();
            file_diagnostics.warn(diagnostic_codes::TRANSFORM_FAILED, Span::dummy(), &[&file.file_name, &message]);
        }
        reporter.report_file(file_diagnostics);
    }
    result.diagnostics = reporter.into_diagnostics();
    result
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(file = %source.file_name))]
fn emit_file(
    program: &dyn Program,
    host: &TsickleHost,
    source: &SourceFile,
    options: &EmitOptions,
    diagnostics: &mut FileDiagnostics,
) -> Result<FileOutputs> {
    let checker = program.checker();
    let compiler_options = program.compiler_options();

    let absolute = host.absolute_path(&source.file_name);
    if !path::is_absolute(&absolute) {
        return Err(TransformError::RelativePath(absolute));
    }
    let skipped = (host.should_skip_tsickle_processing)(&absolute);
    let annotate = host.options.transform_types_to_closure && !skipped;
    debug!(skipped, annotate, "processing file");

    let mut file = source.clone();
    for transform in &options.transformers.before {
        transform(&mut file);
    }
    let declaration_source = compiler_options.declaration.then(|| file.clone());

    let mut ctx = FileContext::new(&file, checker, host, compiler_options);
    let outcome = transform_file(file, &mut ctx, skipped, annotate, options);
    let expansions = std::mem::take(&mut ctx.export_star_expansions);
    for diagnostic in std::mem::take(&mut ctx.diagnostics).into_vec() {
        diagnostics.push(diagnostic);
    }
    let (js, shim, manifest) = outcome?;

    let root_dir = compiler_options.root_dir.as_deref();
    let out_dir = compiler_options.out_dir.as_deref();
    let js_name = path::output_file_name(&source.file_name, ".js", root_dir, out_dir);
    let mut outputs = FileOutputs {
        files: Vec::new(),
        manifest,
    };
    if !options.emit_only_dts_files {
        outputs.files.push((js_name.clone(), IRPrinter::print_file(&js)));
        if let Some(shim) = shim {
            let module_name = host.module_name("", &source.file_name);
            let text = render_shim(&shim, &module_name, &host.root_dirs_relative(&source.file_name));
            outputs.files.push((shim_file_name(&js_name), text));
        }
    }
    if let Some(declaration_source) = declaration_source {
        let mut text = emit_declarations(&declaration_source, checker, &expansions);
        for transform in &options.transformers.after_declarations {
            transform(&mut text);
        }
        let dts_name = path::output_file_name(&source.file_name, ".d.ts", root_dir, out_dir);
        outputs.files.push((dts_name, text));
    }
    Ok(outputs)
}

type Transformed = (JsFile, Option<crate::ts_migration::TsMigrationShim>, ModulesManifest);

fn transform_file(
    mut file: SourceFile,
    ctx: &mut FileContext<'_>,
    skipped: bool,
    annotate: bool,
    options: &EmitOptions,
) -> Result<Transformed> {
    let annotations = ctx.host.options.transform_decorators && !skipped;
    DecoratorLowering::new(ctx.checker, annotations, ctx.is_commonjs()).run(&mut file)?;
    inline_const_enum_references(&mut file, ctx.checker);
    if annotate {
        ModuleRewriter::new(ctx).run(&mut file);
        JsDocTransformer::new(ctx).run(&mut file)?;
    }

    let mut js = lower_file(&file, ctx)?;
    let mut manifest = ModulesManifest::new();
    let mut shim = None;
    if !skipped {
        shim = extract_shim(&mut js, ctx);
        if ctx.googmodule() {
            GoogModuleConversion::new(ctx).run(&mut js, &mut manifest);
        }
        if annotate {
            add_fileoverview(&mut js, ctx.host);
        }
    }
    for transform in &options.transformers.after {
        transform(&mut js);
    }
    Ok((js, shim, manifest))
}

#[cfg(test)]
#[path = "../tests/pipeline.rs"]
mod tests;
