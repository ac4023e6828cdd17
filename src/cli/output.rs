//! Where emitted artifacts go, and how they get there.

use anyhow::{Result, bail};
use std::borrow::Cow;
use tracing::{debug, trace};

use crate::cli::config::RunConfiguration;
use crate::cli::host::IoHost;
use crate::cli::source_map::relocate_sources;

const MAP_SUFFIX: &str = ".js.map";

/// Destination of an artifact the engine named `file_name`.
///
/// Without a destination directory (or in single-output mode) the engine's
/// name is kept. Otherwise the name's path relative to the working
/// directory, minus the base path, is re-rooted under the destination.
pub fn compute_destination<H: IoHost + ?Sized>(
    host: &H,
    file_name: &str,
    config: &RunConfiguration,
) -> Result<String> {
    if config.single_output {
        return Ok(file_name.to_string());
    }
    let Some(destination) = config.destination.as_deref() else {
        return Ok(file_name.to_string());
    };

    let cwd = host.current_directory();
    let mut relative = host.relative_path(cwd, file_name);
    if let Some(base_path) = config.base_path.as_deref() {
        let Some(stripped) = relative.strip_prefix(base_path) else {
            bail!("{file_name} is not under base path '{base_path}'");
        };
        relative = stripped.to_string();
    }

    Ok(host.resolve_multi(&[cwd, destination, &relative]))
}

/// Re-point a relocated source map at its original source.
///
/// Only `.js.map` artifacts that actually moved into a destination
/// directory are touched; everything else is returned as is.
pub fn rewrite_source_map<'a, H: IoHost + ?Sized>(
    host: &H,
    file_name: &str,
    destination: &str,
    contents: &'a str,
    config: &RunConfiguration,
) -> Result<Cow<'a, str>> {
    if config.single_output
        || file_name == destination
        || config.destination.is_none()
        || !file_name.ends_with(MAP_SUFFIX)
    {
        return Ok(Cow::Borrowed(contents));
    }

    let destination_dir = host.dir_name(destination).unwrap_or_else(|| destination.to_string());
    let relative = host.relative_path(&destination_dir, file_name);
    let source_dir = host.dir_name(&relative).unwrap_or_else(|| ".".to_string());
    trace!(file_name, destination, source_dir, "relocating source map sources");
    relocate_sources(contents, &source_dir).map(Cow::Owned)
}

/// Persists artifacts and remembers where they went.
#[derive(Debug, Default)]
pub struct OutputWriter {
    written: Vec<String>,
}

impl OutputWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `contents` to `path`, creating any missing parent directories.
    pub fn write<H: IoHost + ?Sized>(
        &mut self,
        host: &H,
        path: &str,
        contents: &str,
        write_byte_order_mark: bool,
    ) -> Result<()> {
        if let Some(parent) = host.dir_name(path) {
            ensure_directory(host, &parent)?;
        }
        host.write_file(path, contents, write_byte_order_mark)?;
        self.written.push(path.to_string());
        Ok(())
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[String] {
        &self.written
    }
}

/// Create `directory` and any missing ancestors, top-down.
///
/// Stops ascending at the first ancestor that already is a directory; an
/// ancestor that exists as a file is an error.
pub fn ensure_directory<H: IoHost + ?Sized>(host: &H, directory: &str) -> Result<()> {
    if host.directory_exists(directory) {
        return Ok(());
    }
    if host.file_exists(directory) {
        bail!("\"{directory}\" exists but isn't a directory");
    }
    if let Some(parent) = host.dir_name(directory) {
        ensure_directory(host, &parent)?;
    }
    debug!(directory, "creating output directory");
    host.create_directory(directory)
}
