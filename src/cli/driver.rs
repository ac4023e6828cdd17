//! The compilation driver: resolve, compile, write, summarize.
//!
//! A [`Driver`] owns every piece of per-run state (source, path and
//! existence caches, and the list of written outputs) and is consumed by
//! [`Driver::run`], so no state can leak from one run into the next.

use anyhow::Result;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, info_span, trace};
use tsb_common::Diagnostic;
use tsb_common::diagnostics::diagnostic_messages;

use crate::cli::cache::{ExistenceCache, PathCache, SourceCache};
use crate::cli::config::RunConfiguration;
use crate::cli::engine::{
    CompilerEngine, CompilerPhase, OutputArtifact, PassthroughEngine, SourceUnit,
};
use crate::cli::host::{IoHost, Stream};
use crate::cli::output::{OutputWriter, compute_destination, rewrite_source_map};
use crate::cli::paths;
use crate::cli::reporter::{OutputSummary, format_diagnostic};
use crate::cli::resolver::{DirectiveResolver, ReferenceResolver, ResolutionHost, ResolvedFile};

/// File name of the default library inside the library directory.
pub const DEFAULT_LIBRARY_FILE: &str = "lib.d.ts";

/// Why a run stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    /// The syntax phase reported an error.
    Syntax,
    /// A later phase reported an error and type errors are not ignored.
    Phase(CompilerPhase),
    /// An artifact could not be placed or written.
    Write,
}

/// Per-run state shared by resolution, compilation and writing.
struct RunState<'h, H: IoHost + ?Sized> {
    host: &'h H,
    library_dir: String,
    sources: SourceCache,
    resolved_paths: PathCache,
    existence: ExistenceCache,
    writer: RefCell<OutputWriter>,
}

pub struct Driver<'h, H: IoHost + ?Sized> {
    state: RunState<'h, H>,
    resolver: Box<dyn ReferenceResolver + 'h>,
    engine: Box<dyn CompilerEngine + 'h>,
}

impl<'h, H: IoHost + ?Sized> Driver<'h, H> {
    /// Driver using the bundled directive resolver and pass-through engine.
    /// `library_dir` is where the default library lives.
    pub fn new(host: &'h H, library_dir: &str) -> Self {
        Self {
            state: RunState {
                host,
                library_dir: host.resolve_path(library_dir),
                sources: SourceCache::default(),
                resolved_paths: PathCache::default(),
                existence: ExistenceCache::default(),
                writer: RefCell::new(OutputWriter::new()),
            },
            resolver: Box::new(DirectiveResolver),
            engine: Box::new(PassthroughEngine::new()),
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: impl ReferenceResolver + 'h) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: impl CompilerEngine + 'h) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Compile `input_files` under `config`.
    ///
    /// Returns `false` if the run aborted; every diagnostic has already been
    /// reported on the host's stderr by then. Artifacts written before an
    /// abort stay on disk.
    pub fn run(self, input_files: &[String], config: &RunConfiguration) -> bool {
        self.run_to_outcome(input_files, config).is_ok()
    }

    /// Like [`Driver::run`], but says why a run stopped.
    pub fn run_to_outcome(
        self,
        input_files: &[String],
        config: &RunConfiguration,
    ) -> Result<Vec<String>, Abort> {
        let Self {
            state,
            resolver,
            mut engine,
        } = self;
        let _span = info_span!(
            "run",
            files = input_files.len(),
            destination = config.destination.as_deref().unwrap_or("")
        )
        .entered();

        let resolved = state.resolve(resolver.as_ref(), input_files, config);
        if let Err(abort) = state.compile(engine.as_mut(), &resolved, config) {
            debug!(?abort, "run aborted");
            return Err(abort);
        }

        let written = state.writer.into_inner().written().to_vec();
        let summary = OutputSummary::from_paths(&written);
        for line in summary.lines(config.single_output) {
            state.host.print_line(Stream::Stdout, &line);
        }
        Ok(written)
    }
}

impl<H: IoHost + ?Sized> RunState<'_, H> {
    fn resolve(
        &self,
        resolver: &dyn ReferenceResolver,
        input_files: &[String],
        config: &RunConfiguration,
    ) -> Vec<ResolvedFile> {
        let settings = config.compilation_settings();
        let result = resolver.resolve(
            input_files,
            self,
            settings.use_case_sensitive_file_resolution,
        );
        for diagnostic in &result.diagnostics {
            self.report(diagnostic);
        }

        let include_default_library = !config.no_lib && !result.saw_no_default_lib;
        let mut resolved_files = Vec::with_capacity(result.resolved_files.len() + 1);
        if include_default_library {
            resolved_files.push(ResolvedFile {
                path: self.host.combine(&self.library_dir, DEFAULT_LIBRARY_FILE),
                referenced_files: Vec::new(),
                imported_files: Vec::new(),
            });
        }
        resolved_files.extend(result.resolved_files);
        debug!(
            files = resolved_files.len(),
            include_default_library, "resolution finished"
        );
        resolved_files
    }

    fn compile(
        &self,
        engine: &mut dyn CompilerEngine,
        resolved_files: &[ResolvedFile],
        config: &RunConfiguration,
    ) -> Result<(), Abort> {
        for file in resolved_files {
            let record = self.sources.get_or_read(self.host, &file.path);
            engine.add_file(SourceUnit {
                path: file.path.clone(),
                text: record.text,
                byte_order_mark: record.byte_order_mark,
                version: 0,
                is_open: false,
                referenced_files: file.referenced_files.clone(),
            });
        }

        let settings = config.compilation_settings();
        let resolve_path = |path: &str| self.resolved_paths.resolve(self.host, path);
        for result in engine.compile(&settings, &resolve_path) {
            let mut has_error = false;
            for diagnostic in &result.diagnostics {
                has_error |= diagnostic.is_error();
                self.report(diagnostic);
            }
            debug!(
                phase = ?result.phase,
                diagnostics = result.diagnostics.len(),
                outputs = result.output_files.len(),
                has_error,
                "phase finished"
            );

            if has_error && result.phase == CompilerPhase::Syntax {
                return Err(Abort::Syntax);
            }
            if has_error && !config.ignore_type_check {
                return Err(Abort::Phase(result.phase));
            }
            self.write_outputs(&result.output_files, config)?;
        }
        Ok(())
    }

    /// Write every artifact, stopping at the first failure.
    fn write_outputs(
        &self,
        outputs: &[OutputArtifact],
        config: &RunConfiguration,
    ) -> Result<(), Abort> {
        for output in outputs {
            if let Err(err) = self.write_output(output, config) {
                self.report(&Diagnostic::from_message(
                    Some(output.name.clone()),
                    &diagnostic_messages::EMIT_ERROR,
                    &[&format!("{err:#}")],
                ));
                return Err(Abort::Write);
            }
        }
        Ok(())
    }

    fn write_output(&self, output: &OutputArtifact, config: &RunConfiguration) -> Result<()> {
        let destination = compute_destination(self.host, &output.name, config)?;
        let path = self.host.resolve_path(&destination);
        let contents =
            rewrite_source_map(self.host, &output.name, &destination, &output.text, config)?;
        trace!(name = %output.name, path, "writing output");
        self.writer
            .borrow_mut()
            .write(self.host, &path, &contents, output.write_byte_order_mark)
    }

    fn report(&self, diagnostic: &Diagnostic) {
        self.host.print_line(Stream::Stderr, &format_diagnostic(diagnostic));
    }
}

impl<H: IoHost + ?Sized> ResolutionHost for RunState<'_, H> {
    fn file_exists(&self, path: &str) -> bool {
        self.existence.file_exists(self.host, path)
    }

    fn directory_exists(&self, path: &str) -> bool {
        self.host.directory_exists(path)
    }

    fn parent_directory(&self, path: &str) -> Option<String> {
        self.host.dir_name(path)
    }

    fn resolve_relative_path(&self, path: &str, directory: Option<&str>) -> String {
        let unquoted = paths::strip_quotes(path);
        let combined = match directory {
            Some(directory) if !paths::is_rooted(unquoted) => {
                self.host.combine(directory, unquoted)
            }
            _ => unquoted.to_string(),
        };
        paths::switch_to_forward_slashes(&self.resolved_paths.resolve(self.host, &combined))
    }

    fn source_text(&self, path: &str) -> Arc<str> {
        self.sources.get_or_read(self.host, path).text
    }
}
