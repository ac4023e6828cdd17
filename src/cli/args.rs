use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::cli::config::TaskOptions;

/// CLI arguments for the tsb binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsb",
    version,
    about = "Compile groups of TypeScript files into a destination tree"
)]
pub struct CliArgs {
    /// Input files. Together with --dest they form one file group.
    pub files: Vec<String>,

    /// Destination directory, or a single `.js` bundle file.
    #[arg(short = 'd', long)]
    pub dest: Option<String>,

    /// Task file listing options and file groups.
    #[arg(long)]
    pub task: Option<PathBuf>,

    /// Directory containing the default library (lib.d.ts).
    /// Defaults to the directory of the tsb executable.
    #[arg(long = "libDir", alias = "lib-dir")]
    pub lib_dir: Option<PathBuf>,

    /// Strip this prefix from every source path before re-rooting it under --dest.
    #[arg(long = "basePath", alias = "base-path")]
    pub base_path: Option<String>,

    /// Generate corresponding '.map' files.
    #[arg(long = "sourceMap", alias = "source-map", alias = "sourcemap")]
    pub source_map: bool,

    /// Generate corresponding '.d.ts' files.
    #[arg(long)]
    pub declaration: bool,

    /// Keep comments in the output.
    #[arg(long)]
    pub comments: bool,

    /// Set the JavaScript language version for emitted JavaScript.
    #[arg(short = 't', long, value_enum, ignore_case = true)]
    pub target: Option<Target>,

    /// Specify what module code is generated.
    #[arg(short = 'm', long, value_enum, ignore_case = true)]
    pub module: Option<Module>,

    /// Set the newline character for emitting files.
    #[arg(long = "newLine", alias = "new-line", value_enum, ignore_case = true)]
    pub new_line: Option<NewLine>,

    /// Disable including the default lib.d.ts.
    #[arg(long = "noLib", alias = "no-lib", alias = "nolib")]
    pub no_lib: bool,

    /// Keep emitting when semantic or emit errors are reported (default true).
    #[arg(long = "ignoreTypeCheck", alias = "ignore-type-check")]
    pub ignore_type_check: Option<bool>,

    /// Report errors on expressions and declarations with an implied 'any' type.
    #[arg(long = "noImplicitAny", alias = "no-implicit-any")]
    pub no_implicit_any: bool,

    /// Do not insert missing semicolons automatically.
    #[arg(long = "disallowAsi", alias = "disallow-asi")]
    pub disallow_asi: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Target {
    Es3,
    Es5,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Module {
    #[value(name = "commonjs", alias = "common-js")]
    CommonJs,
    Node,
    Amd,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum NewLine {
    Crlf,
    Lf,
}

impl CliArgs {
    /// Options set on the command line. Flags that were not given stay
    /// unset so they do not override a task file.
    pub fn task_options(&self) -> TaskOptions {
        let flag = |set: bool| set.then_some(true);
        TaskOptions {
            base_path: self.base_path.clone(),
            sourcemap: flag(self.source_map),
            declaration: flag(self.declaration),
            comments: flag(self.comments),
            target: self.target.map(|target| {
                match target {
                    Target::Es3 => "es3",
                    Target::Es5 => "es5",
                }
                .to_string()
            }),
            module: self.module.map(|module| {
                match module {
                    Module::CommonJs => "commonjs",
                    Module::Node => "node",
                    Module::Amd => "amd",
                }
                .to_string()
            }),
            new_line: self.new_line.map(|new_line| {
                match new_line {
                    NewLine::Crlf => "crlf",
                    NewLine::Lf => "lf",
                }
                .to_string()
            }),
            nolib: flag(self.no_lib),
            ignore_type_check: self.ignore_type_check,
            no_implicit_any: flag(self.no_implicit_any),
            disallow_asi: flag(self.disallow_asi),
            ..TaskOptions::default()
        }
    }
}
