use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;

use tsb::cli::args::CliArgs;
use tsb::cli::config::TaskOptions;
use tsb::cli::host::OsHost;
use tsb::cli::task::{self, FileGroup};

/// Exit status when at least one file group failed.
const EXIT_GROUP_FAILED: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if TSB_LOG or RUST_LOG is set (zero cost otherwise).
    tsb::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let host = OsHost::new()?;
    let library_dir = library_dir(args.lib_dir.as_deref())?;

    let (mut options, mut groups) = match args.task.as_deref() {
        Some(path) => {
            let task = task::load_task_file(path)?;
            (task.options, task.files)
        }
        None => (TaskOptions::default(), Vec::new()),
    };
    options.merge(args.task_options());
    if !args.files.is_empty() {
        groups.push(FileGroup {
            src: args.files.clone(),
            dest: args.dest.clone(),
        });
    }
    if groups.is_empty() {
        bail!("no input files; pass source files or --task <file>");
    }

    if !task::run_task(&host, &library_dir, &options, &groups) {
        std::process::exit(EXIT_GROUP_FAILED);
    }
    Ok(())
}

/// Explicit `--libDir`, else the directory holding the executable.
fn library_dir(explicit: Option<&Path>) -> Result<String> {
    if let Some(dir) = explicit {
        return Ok(dir.to_string_lossy().into_owned());
    }
    let exe = std::env::current_exe().context("failed to locate the tsb executable")?;
    let dir = exe
        .parent()
        .context("tsb executable has no parent directory")?;
    Ok(dir.to_string_lossy().into_owned())
}
