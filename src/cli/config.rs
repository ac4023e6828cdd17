use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tsb_common::{ModuleKind, NewLineKind, ScriptTarget};

use crate::cli::host::{IoHost, Stream};
use crate::cli::paths;

/// Custom deserializer for boolean options that accepts both bool and string values.
/// This handles task files that contain `"sourcemap": "true"` instead of `"sourcemap": true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(Error::custom(format!(
                    "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                    s
                ))),
            }
        }
    }
}

/// Raw task options as written by the user. Unknown keys are ignored.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskOptions {
    #[serde(default, alias = "base_path")]
    pub base_path: Option<String>,
    #[serde(default, alias = "sourceMap", deserialize_with = "deserialize_bool_or_string")]
    pub sourcemap: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub declaration: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub comments: Option<bool>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub new_line: Option<String>,
    #[serde(default, alias = "noLib", deserialize_with = "deserialize_bool_or_string")]
    pub nolib: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub ignore_type_check: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_implicit_any: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub disallow_asi: Option<bool>,
    // Accepted for compatibility; each only produces a notice.
    #[serde(default)]
    pub full_source_map_path: Option<serde_json::Value>,
    #[serde(default)]
    pub allowbool: Option<serde_json::Value>,
    #[serde(default)]
    pub allowimportmodule: Option<serde_json::Value>,
}

impl TaskOptions {
    /// Overlay every option set in `other` on top of `self`.
    pub fn merge(&mut self, other: TaskOptions) {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        overlay!(
            base_path,
            sourcemap,
            declaration,
            comments,
            target,
            module,
            new_line,
            nolib,
            ignore_type_check,
            no_implicit_any,
            disallow_asi,
            full_source_map_path,
            allowbool,
            allowimportmodule
        );
    }
}

pub fn parse_task_options(source: &str) -> Result<TaskOptions> {
    serde_json::from_str(source).context("failed to parse task options")
}

pub fn load_task_options(path: &Path) -> Result<TaskOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read task options {}", path.display()))?;
    parse_task_options(&source)
        .with_context(|| format!("failed to parse task options {}", path.display()))
}

/// A JSON value counts as set when it is truthy, the way task runners treat
/// loosely typed flags.
fn is_truthy(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}

/// Validated options for one driver run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Destination directory, or the bundle file in single-output mode.
    pub destination: Option<String>,
    /// All units are bundled into `out_file`.
    pub single_output: bool,
    /// Absolute bundle path; set only in single-output mode.
    pub out_file: Option<String>,
    /// Literal prefix (with trailing `/`) stripped from cwd-relative paths.
    pub base_path: Option<String>,
    pub ignore_type_check: bool,
    pub no_lib: bool,
    pub source_map: bool,
    pub declaration: bool,
    pub preserve_comments: bool,
    pub target: ScriptTarget,
    pub module: ModuleKind,
    pub new_line: NewLineKind,
    pub no_implicit_any: bool,
    pub allow_automatic_semicolon_insertion: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            destination: None,
            single_output: false,
            out_file: None,
            base_path: None,
            ignore_type_check: true,
            no_lib: false,
            source_map: false,
            declaration: false,
            preserve_comments: false,
            target: ScriptTarget::default(),
            module: ModuleKind::default(),
            new_line: NewLineKind::platform(),
            no_implicit_any: false,
            allow_automatic_semicolon_insertion: true,
        }
    }
}

impl RunConfiguration {
    /// Build the run configuration for one destination.
    ///
    /// Obsolete options are reported on `host`'s stdout and otherwise ignored.
    pub fn resolve<H: IoHost + ?Sized>(
        options: &TaskOptions,
        destination: Option<&str>,
        host: &H,
    ) -> Self {
        if is_truthy(options.full_source_map_path.as_ref()) {
            host.print_line(Stream::Stdout, "fullSourceMapPath not supported.");
        }
        if is_truthy(options.allowbool.as_ref()) {
            host.print_line(Stream::Stdout, "allowbool is obsolete.");
        }
        if is_truthy(options.allowimportmodule.as_ref()) {
            host.print_line(Stream::Stdout, "allowimportmodule is obsolete.");
        }

        let destination = destination
            .filter(|dest| !dest.is_empty())
            .map(|dest| host.normalize_path(dest));
        let single_output = destination
            .as_deref()
            .is_some_and(|dest| paths::extension(dest) == ".js");
        let out_file = destination
            .as_deref()
            .filter(|_| single_output)
            .map(|dest| host.resolve_path(dest));

        Self {
            destination,
            single_output,
            out_file,
            base_path: prepare_base_path(host, options.base_path.as_deref()),
            ignore_type_check: options.ignore_type_check.unwrap_or(true),
            no_lib: options.nolib.unwrap_or(false),
            source_map: options.sourcemap.unwrap_or(false),
            declaration: options.declaration.unwrap_or(false),
            preserve_comments: options.comments.unwrap_or(false),
            target: options
                .target
                .as_deref()
                .and_then(ScriptTarget::from_name)
                .unwrap_or_default(),
            module: options
                .module
                .as_deref()
                .and_then(ModuleKind::from_name)
                .unwrap_or_default(),
            new_line: options
                .new_line
                .as_deref()
                .and_then(NewLineKind::from_name)
                .unwrap_or(NewLineKind::platform()),
            no_implicit_any: options.no_implicit_any.unwrap_or(false),
            allow_automatic_semicolon_insertion: !options.disallow_asi.unwrap_or(false),
        }
    }

    /// Settings handed to the compiler engine.
    pub fn compilation_settings(&self) -> CompilationSettings {
        CompilationSettings {
            target: self.target,
            module: self.module,
            out_file: self.out_file.clone(),
            map_source_files: self.source_map,
            generate_declaration_files: self.declaration,
            remove_comments: !self.preserve_comments,
            no_lib: self.no_lib,
            no_implicit_any: self.no_implicit_any,
            allow_automatic_semicolon_insertion: self.allow_automatic_semicolon_insertion,
            use_case_sensitive_file_resolution: false,
            new_line: self.new_line,
        }
    }
}

fn prepare_base_path<H: IoHost + ?Sized>(host: &H, base_path: Option<&str>) -> Option<String> {
    let base_path = base_path.filter(|path| !path.is_empty())?;
    let mut normalized = host.normalize_path(base_path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Some(normalized)
}

/// Engine-facing view of the run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationSettings {
    pub target: ScriptTarget,
    pub module: ModuleKind,
    pub out_file: Option<String>,
    pub map_source_files: bool,
    pub generate_declaration_files: bool,
    pub remove_comments: bool,
    pub no_lib: bool,
    pub no_implicit_any: bool,
    pub allow_automatic_semicolon_insertion: bool,
    pub use_case_sensitive_file_resolution: bool,
    pub new_line: NewLineKind,
}
