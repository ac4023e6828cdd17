//! IO adapter: the only place the driver touches the filesystem or console.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use tracing::{debug, trace};
use tsb_common::ByteOrderMark;
use tsb_common::encoding;

use crate::cli::paths;

/// Decoded contents of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInformation {
    pub contents: String,
    pub byte_order_mark: ByteOrderMark,
}

/// Console stream a message is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Capability surface consumed by the driver and its caches.
///
/// Path helpers have lexical default implementations anchored at
/// [`IoHost::current_directory`]; implementors normally only provide the
/// filesystem and console primitives.
pub trait IoHost {
    fn read_file(&self, path: &str) -> Result<FileInformation>;
    fn write_file(&self, path: &str, contents: &str, write_byte_order_mark: bool) -> Result<()>;
    fn delete_file(&self, path: &str) -> Result<()>;
    fn file_exists(&self, path: &str) -> bool;
    fn directory_exists(&self, path: &str) -> bool;
    /// Create a single directory. Succeeds if it already exists as a directory.
    fn create_directory(&self, path: &str) -> Result<()>;
    /// Absolute, forward-slash working directory.
    fn current_directory(&self) -> &str;
    fn print(&self, stream: Stream, text: &str);

    fn print_line(&self, stream: Stream, text: &str) {
        self.print(stream, &format!("{text}\n"));
    }

    fn resolve_path(&self, path: &str) -> String {
        paths::resolve(self.current_directory(), &[path])
    }

    /// Resolve every segment in turn against the working directory.
    fn resolve_multi(&self, segments: &[&str]) -> String {
        paths::resolve(self.current_directory(), segments)
    }

    fn dir_name(&self, path: &str) -> Option<String> {
        paths::dir_name(path)
    }

    fn combine(&self, left: &str, right: &str) -> String {
        paths::combine(left, right)
    }

    fn relative_path(&self, from: &str, to: &str) -> String {
        paths::relative(&self.resolve_path(from), &self.resolve_path(to))
    }

    fn normalize_path(&self, path: &str) -> String {
        paths::normalize(path)
    }
}

/// [`IoHost`] backed by `std::fs` and the process console.
#[derive(Debug, Clone)]
pub struct OsHost {
    cwd: String,
}

impl OsHost {
    /// Host anchored at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        Ok(Self::with_current_directory(&cwd.to_string_lossy()))
    }

    /// Host anchored at an explicit working directory.
    pub fn with_current_directory(cwd: &str) -> Self {
        Self {
            cwd: paths::normalize(cwd),
        }
    }
}

impl IoHost for OsHost {
    fn read_file(&self, path: &str) -> Result<FileInformation> {
        trace!(path, "reading");
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {path}"))?;
        let (contents, byte_order_mark) = encoding::decode(&bytes);
        debug!(path, ?byte_order_mark, bytes = bytes.len(), "read source");
        Ok(FileInformation {
            contents,
            byte_order_mark,
        })
    }

    fn write_file(&self, path: &str, contents: &str, write_byte_order_mark: bool) -> Result<()> {
        let mut file =
            std::fs::File::create(path).with_context(|| format!("failed to write {path}"))?;
        if write_byte_order_mark {
            file.write_all("\u{FEFF}".as_bytes())
                .with_context(|| format!("failed to write {path}"))?;
        }
        file.write_all(contents.as_bytes())
            .with_context(|| format!("failed to write {path}"))?;
        debug!(path, bytes = contents.len(), write_byte_order_mark, "wrote file");
        Ok(())
    }

    fn delete_file(&self, path: &str) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("failed to delete {path}"))?;
        debug!(path, "deleted file");
        Ok(())
    }

    fn file_exists(&self, path: &str) -> bool {
        std::path::Path::new(path).exists()
    }

    fn directory_exists(&self, path: &str) -> bool {
        std::path::Path::new(path).is_dir()
    }

    fn create_directory(&self, path: &str) -> Result<()> {
        match std::fs::create_dir(path) {
            Ok(()) => {
                debug!(path, "created directory");
                Ok(())
            }
            // Lost a race with another writer; fine as long as it is a directory.
            Err(err)
                if err.kind() == std::io::ErrorKind::AlreadyExists
                    && self.directory_exists(path) =>
            {
                Ok(())
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to create directory {path}"))
            }
        }
    }

    fn current_directory(&self) -> &str {
        &self.cwd
    }

    #[allow(clippy::print_stderr)]
    fn print(&self, stream: Stream, text: &str) {
        match stream {
            Stream::Stdout => print!("{text}"),
            Stream::Stderr => eprint!("{text}"),
        }
    }

    /// Lines are prefixed with a colored `>> ` marker, one per physical line.
    #[allow(clippy::print_stderr)]
    fn print_line(&self, stream: Stream, text: &str) {
        let marker = match stream {
            Stream::Stdout => ">> ".cyan(),
            Stream::Stderr => ">> ".red(),
        };
        for line in text.trim().lines() {
            match stream {
                Stream::Stdout => println!("{marker}{line}"),
                Stream::Stderr => eprintln!("{marker}{line}"),
            }
        }
    }
}
