//! Reference resolution: computing the ordered closure of files to compile.

use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::trace;
use tsb_common::Diagnostic;
use tsb_common::diagnostics::diagnostic_messages;

/// A source file plus the files it references, in compilation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: String,
    pub referenced_files: Vec<String>,
    pub imported_files: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    pub resolved_files: Vec<ResolvedFile>,
    pub diagnostics: Vec<Diagnostic>,
    /// Some file opted out of the default library.
    pub saw_no_default_lib: bool,
}

/// Services a resolver may use. The driver implements this on top of its
/// caches.
pub trait ResolutionHost {
    fn file_exists(&self, path: &str) -> bool;
    fn directory_exists(&self, path: &str) -> bool;
    fn parent_directory(&self, path: &str) -> Option<String>;
    /// Resolve `path` (possibly quoted) against `directory` into an absolute
    /// forward-slash path.
    fn resolve_relative_path(&self, path: &str, directory: Option<&str>) -> String;
    fn source_text(&self, path: &str) -> Arc<str>;
}

pub trait ReferenceResolver {
    fn resolve(
        &self,
        entry_files: &[String],
        host: &dyn ResolutionHost,
        case_sensitive: bool,
    ) -> ResolutionResult;
}

/// Resolver driven by triple-slash `reference` directives and relative
/// import specifiers.
///
/// Files are emitted depth-first, dependencies before the files that
/// reference them, each file once.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectiveResolver;

impl ReferenceResolver for DirectiveResolver {
    fn resolve(
        &self,
        entry_files: &[String],
        host: &dyn ResolutionHost,
        case_sensitive: bool,
    ) -> ResolutionResult {
        let mut walk = Walk {
            host,
            case_sensitive,
            visited: FxHashSet::default(),
            result: ResolutionResult::default(),
        };
        for entry in entry_files {
            let path = host.resolve_relative_path(entry, None);
            walk.visit(&path, None);
        }
        walk.result
    }
}

struct Walk<'a> {
    host: &'a dyn ResolutionHost,
    case_sensitive: bool,
    visited: FxHashSet<String>,
    result: ResolutionResult,
}

impl Walk<'_> {
    fn visit(&mut self, path: &str, referenced_from: Option<&str>) {
        let key = if self.case_sensitive {
            path.to_string()
        } else {
            path.to_lowercase()
        };
        if !self.visited.insert(key) {
            return;
        }

        if !self.host.file_exists(path) {
            self.result.diagnostics.push(Diagnostic::from_message(
                referenced_from.map(str::to_string),
                &diagnostic_messages::FILE_NOT_FOUND,
                &[path],
            ));
            return;
        }

        let text = self.host.source_text(path);
        let directives = scan_directives(&text);
        if directives.no_default_lib {
            self.result.saw_no_default_lib = true;
        }
        let directory = self.host.parent_directory(path);

        let mut referenced_files = Vec::new();
        for reference in &directives.references {
            let resolved = self
                .host
                .resolve_relative_path(reference, directory.as_deref());
            self.visit(&resolved, Some(path));
            referenced_files.push(resolved);
        }

        let mut imported_files = Vec::new();
        for specifier in &directives.imports {
            let resolved = self.resolve_import(specifier, directory.as_deref());
            self.visit(&resolved, Some(path));
            imported_files.push(resolved);
        }

        trace!(
            path,
            references = referenced_files.len(),
            imports = imported_files.len(),
            "resolved file"
        );
        self.result.resolved_files.push(ResolvedFile {
            path: path.to_string(),
            referenced_files,
            imported_files,
        });
    }

    /// `./foo` resolves to `foo.ts`, falling back to `foo.d.ts`.
    fn resolve_import(&self, specifier: &str, directory: Option<&str>) -> String {
        let source = self
            .host
            .resolve_relative_path(&format!("{specifier}.ts"), directory);
        if self.host.file_exists(&source) {
            return source;
        }
        let declaration = self
            .host
            .resolve_relative_path(&format!("{specifier}.d.ts"), directory);
        if self.host.file_exists(&declaration) {
            declaration
        } else {
            source
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Directives {
    pub(crate) references: Vec<String>,
    pub(crate) imports: Vec<String>,
    pub(crate) no_default_lib: bool,
}

/// Collect reference directives from the leading triple-slash block and
/// relative import specifiers from the whole file.
pub(crate) fn scan_directives(source: &str) -> Directives {
    let mut directives = Directives::default();
    let mut in_header = true;

    for line in source.lines() {
        let trimmed = line.trim_start();
        if in_header {
            if trimmed.starts_with("///") {
                if let Some(path) = parse_reference_attribute(trimmed, "path") {
                    directives.references.push(path.to_string());
                }
                if let Some(value) = parse_reference_attribute(trimmed, "no-default-lib") {
                    if value.trim().eq_ignore_ascii_case("true") {
                        directives.no_default_lib = true;
                    }
                }
                continue;
            }
            if !trimmed.is_empty() {
                in_header = false;
            }
        }

        if let Some(specifier) = parse_import_specifier(trimmed) {
            if specifier.starts_with("./") || specifier.starts_with("../") {
                directives.imports.push(specifier.to_string());
            }
        }
    }

    directives
}

/// Value of `name="..."` (or single-quoted) inside a `/// <reference .../>`
/// line.
fn parse_reference_attribute<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let lower = line.to_ascii_lowercase();
    if !lower.contains("<reference") {
        return None;
    }
    let mut search_from = 0;
    loop {
        let idx = search_from + lower[search_from..].find(name)?;
        search_from = idx + name.len();
        // Must be a whole attribute name, not the tail of another one.
        let preceded_by_space = lower[..idx]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        if !preceded_by_space {
            continue;
        }
        let rest = line[search_from..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        return quoted_prefix(rest.trim_start());
    }
}

/// Specifier of an `import x = require("...")`, `import ... from "..."`, or
/// `import "..."` statement.
fn parse_import_specifier(line: &str) -> Option<&str> {
    let statement = line.strip_prefix("export ").unwrap_or(line);
    if !statement.starts_with("import ") && !statement.starts_with("import\"") {
        return None;
    }
    if let Some(idx) = statement.find("require(") {
        return quoted_prefix(statement[idx + "require(".len()..].trim_start());
    }
    if let Some(idx) = statement.find(" from ") {
        return quoted_prefix(statement[idx + " from ".len()..].trim_start());
    }
    quoted_prefix(statement["import".len()..].trim_start())
}

/// Contents of a quoted string at the start of `text`.
fn quoted_prefix(text: &str) -> Option<&str> {
    let quote = text.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &text[1..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}
