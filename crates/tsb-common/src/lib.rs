//! Common types shared by the tsb compilation driver.
//!
//! This crate provides the types that cross the boundary between the driver
//! and its collaborators (reference resolver, compiler engine):
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message table)
//! - Option enums (`ModuleKind`, `NewLineKind`, `ScriptTarget`)
//! - Source encodings (`ByteOrderMark`)

pub mod common;
pub use common::{ModuleKind, NewLineKind, ScriptTarget};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

pub mod encoding;
pub use encoding::ByteOrderMark;
