//! Batch compilation driver for TypeScript sources.
//!
//! Given groups of input files and a destination, the driver resolves each
//! group's reference closure, runs a compiler engine over it phase by phase,
//! and writes the emitted artifacts into the destination tree, re-pointing
//! source maps so they still find their sources.

pub use tsb_common as common;
pub use tsb_common::{ByteOrderMark, Diagnostic, DiagnosticCategory};
pub use tsb_common::{ModuleKind, NewLineKind, ScriptTarget};

pub mod cli;
pub use cli::config::{CompilationSettings, RunConfiguration, TaskOptions};
pub use cli::driver::{Abort, Driver};
pub use cli::engine::{CompilerEngine, CompilerPhase, OutputArtifact, PhaseResult, SourceUnit};
pub use cli::host::{IoHost, OsHost, Stream};
pub use cli::resolver::{ReferenceResolver, ResolutionHost, ResolutionResult, ResolvedFile};

// Tracing configuration (TSB_LOG / TSB_LOG_FORMAT)
pub mod tracing_config;
