//! Task files: several source groups, each compiled to its own destination.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use crate::cli::config::{RunConfiguration, TaskOptions};
use crate::cli::driver::Driver;
use crate::cli::host::IoHost;

/// Sources compiled together into one destination.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct FileGroup {
    #[serde(default)]
    pub src: Vec<String>,
    #[serde(default)]
    pub dest: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct TaskFile {
    #[serde(default)]
    pub options: TaskOptions,
    #[serde(default)]
    pub files: Vec<FileGroup>,
}

pub fn parse_task_file(source: &str) -> Result<TaskFile> {
    serde_json::from_str(source).context("failed to parse task file")
}

pub fn load_task_file(path: &Path) -> Result<TaskFile> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read task file {}", path.display()))?;
    parse_task_file(&source).with_context(|| format!("in task file {}", path.display()))
}

/// Compile every group with a fresh driver.
///
/// A failing group does not stop the ones after it; the task succeeds only
/// if all groups did.
pub fn run_task<H: IoHost + ?Sized>(
    host: &H,
    library_dir: &str,
    options: &TaskOptions,
    groups: &[FileGroup],
) -> bool {
    run_groups(host, options, groups, |files, config| {
        Driver::new(host, library_dir).run(files, config)
    })
}

/// Group loop behind [`run_task`], with the per-group compile supplied by
/// the caller.
pub fn run_groups<H, F>(
    host: &H,
    options: &TaskOptions,
    groups: &[FileGroup],
    mut compile: F,
) -> bool
where
    H: IoHost + ?Sized,
    F: FnMut(&[String], &RunConfiguration) -> bool,
{
    let mut succeeded = true;
    for (index, group) in groups.iter().enumerate() {
        let config = RunConfiguration::resolve(options, group.dest.as_deref(), host);
        if compile(&group.src, &config) {
            info!(group = index, files = group.src.len(), "group compiled");
        } else {
            warn!(group = index, files = group.src.len(), "group failed");
            succeeded = false;
        }
    }
    succeeded
}
