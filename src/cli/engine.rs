//! Compiler engine interface and the bundled pass-through engine.

use std::sync::Arc;
use tracing::debug;
use tsb_common::diagnostics::diagnostic_messages;
use tsb_common::{ByteOrderMark, Diagnostic};

use crate::cli::config::CompilationSettings;
use crate::cli::paths;
use crate::cli::source_map::{LineMappings, SourceMap};

/// Phases in the order an engine yields them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilerPhase {
    Syntax,
    Semantics,
    EmitOptionsValidation,
    Emit,
    DeclarationEmit,
}

impl CompilerPhase {
    pub const ALL: [CompilerPhase; 5] = [
        CompilerPhase::Syntax,
        CompilerPhase::Semantics,
        CompilerPhase::EmitOptionsValidation,
        CompilerPhase::Emit,
        CompilerPhase::DeclarationEmit,
    ];
}

/// A file produced by the engine. Its `name` is where the engine would put
/// it; the driver decides where it actually goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub name: String,
    pub text: String,
    pub write_byte_order_mark: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseResult {
    pub phase: CompilerPhase,
    pub diagnostics: Vec<Diagnostic>,
    pub output_files: Vec<OutputArtifact>,
}

impl PhaseResult {
    pub fn new(phase: CompilerPhase) -> Self {
        Self {
            phase,
            diagnostics: Vec::new(),
            output_files: Vec::new(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// One compilation unit handed to the engine.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: String,
    pub text: Arc<str>,
    pub byte_order_mark: ByteOrderMark,
    pub version: u32,
    pub is_open: bool,
    pub referenced_files: Vec<String>,
}

/// External compiler engine.
///
/// `compile` yields phase results lazily, one at a time. Consuming the
/// iterator advances engine state, so it can be walked only once.
pub trait CompilerEngine {
    fn add_file(&mut self, unit: SourceUnit);

    fn compile<'a>(
        &'a mut self,
        settings: &'a CompilationSettings,
        resolve_path: &'a dyn Fn(&str) -> String,
    ) -> Box<dyn Iterator<Item = PhaseResult> + 'a>;
}

/// Engine that performs no type analysis: each non-declaration source is
/// emitted as JavaScript text unchanged apart from line endings.
///
/// The syntax phase only checks for unterminated block comments. Of the
/// [`CompilationSettings`], only `out_file`, `map_source_files` and
/// `new_line` shape the output; `generate_declaration_files`,
/// `remove_comments`, `target`, `module` and `no_implicit_any` reach the
/// engine but are ignored.
#[derive(Debug, Default)]
pub struct PassthroughEngine {
    units: Vec<SourceUnit>,
}

impl PassthroughEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompilerEngine for PassthroughEngine {
    fn add_file(&mut self, unit: SourceUnit) {
        self.units.push(unit);
    }

    fn compile<'a>(
        &'a mut self,
        settings: &'a CompilationSettings,
        resolve_path: &'a dyn Fn(&str) -> String,
    ) -> Box<dyn Iterator<Item = PhaseResult> + 'a> {
        let units = std::mem::take(&mut self.units);
        Box::new(
            CompilerPhase::ALL
                .into_iter()
                .map(move |phase| run_phase(phase, &units, settings, resolve_path)),
        )
    }
}

fn run_phase(
    phase: CompilerPhase,
    units: &[SourceUnit],
    settings: &CompilationSettings,
    resolve_path: &dyn Fn(&str) -> String,
) -> PhaseResult {
    debug!(?phase, units = units.len(), "passthrough phase");
    let mut result = PhaseResult::new(phase);
    match phase {
        CompilerPhase::Syntax => {
            result.diagnostics = units.iter().filter_map(check_comments).collect();
        }
        CompilerPhase::Emit => {
            let emitted: Vec<&SourceUnit> = units
                .iter()
                .filter(|unit| !is_declaration_file(&unit.path))
                .collect();
            result.output_files = match settings.out_file.as_deref() {
                Some(out_file) => emit_bundle(out_file, &emitted, settings),
                None => emitted
                    .iter()
                    .flat_map(|unit| emit_unit(unit, settings, resolve_path))
                    .collect(),
            };
        }
        CompilerPhase::Semantics
        | CompilerPhase::EmitOptionsValidation
        | CompilerPhase::DeclarationEmit => {}
    }
    result
}

fn is_declaration_file(path: &str) -> bool {
    path.ends_with(".d.ts")
}

/// Report the first `/*` that is never closed.
fn check_comments(unit: &SourceUnit) -> Option<Diagnostic> {
    let text = &*unit.text;
    let mut offset = 0;
    while offset < text.len() {
        let rest = &text[offset..];
        let next_line = rest.find("//");
        let next_block = rest.find("/*");
        match (next_line, next_block) {
            (Some(line), block) if block.is_none_or(|block| line < block) => {
                offset += line + rest[line..].find('\n').unwrap_or(rest.len() - line);
            }
            (_, Some(block)) => {
                let start = offset + block;
                match text[start + 2..].find("*/") {
                    Some(end) => offset = start + 2 + end + 2,
                    None => {
                        let (line, character) = line_and_character(text, start);
                        return Some(
                            Diagnostic::from_message(
                                Some(unit.path.clone()),
                                &diagnostic_messages::ASTERISK_SLASH_EXPECTED,
                                &[],
                            )
                            .at(line, character),
                        );
                    }
                }
            }
            _ => break,
        }
    }
    None
}

fn line_and_character(text: &str, offset: usize) -> (u32, u32) {
    let before = &text[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    (line as u32, before[line_start..].chars().count() as u32)
}

fn emit_unit(
    unit: &SourceUnit,
    settings: &CompilationSettings,
    resolve_path: &dyn Fn(&str) -> String,
) -> Vec<OutputArtifact> {
    let new_line = settings.new_line.as_str();
    let js_name = resolve_path(&replace_extension(&unit.path, ".js"));
    let mut js = unit.text.lines().collect::<Vec<_>>().join(new_line);
    let mut map_output = None;

    if settings.map_source_files {
        let map_name = format!("{js_name}.map");
        let mut mappings = LineMappings::default();
        for line in 0..unit.text.lines().count() {
            mappings.push_line(0, line);
        }
        let map = SourceMap::new(
            paths::base_name(&js_name).to_string(),
            vec![paths::base_name(&unit.path).to_string()],
            mappings.finish(),
        );
        if let Ok(text) = map.to_json() {
            append_source_mapping_url(&mut js, paths::base_name(&map_name), new_line);
            map_output = Some(OutputArtifact {
                name: map_name,
                text,
                write_byte_order_mark: false,
            });
        }
    }

    let mut outputs = vec![OutputArtifact {
        name: js_name,
        text: js,
        write_byte_order_mark: !unit.byte_order_mark.is_none(),
    }];
    outputs.extend(map_output);
    outputs
}

fn emit_bundle(
    out_file: &str,
    units: &[&SourceUnit],
    settings: &CompilationSettings,
) -> Vec<OutputArtifact> {
    let new_line = settings.new_line.as_str();
    let mut lines = Vec::new();
    let mut mappings = LineMappings::default();
    for (source_index, unit) in units.iter().enumerate() {
        for (line, text) in unit.text.lines().enumerate() {
            lines.push(text);
            mappings.push_line(source_index, line);
        }
    }
    let mut js = lines.join(new_line);
    let mut map_output = None;

    if settings.map_source_files {
        let map_name = format!("{out_file}.map");
        let out_dir = paths::dir_name(out_file).unwrap_or_else(|| out_file.to_string());
        let sources = units
            .iter()
            .map(|unit| paths::relative(&out_dir, &unit.path))
            .collect();
        let map = SourceMap::new(
            paths::base_name(out_file).to_string(),
            sources,
            mappings.finish(),
        );
        if let Ok(text) = map.to_json() {
            append_source_mapping_url(&mut js, paths::base_name(&map_name), new_line);
            map_output = Some(OutputArtifact {
                name: map_name,
                text,
                write_byte_order_mark: false,
            });
        }
    }

    let mut outputs = vec![OutputArtifact {
        name: out_file.to_string(),
        text: js,
        write_byte_order_mark: false,
    }];
    outputs.extend(map_output);
    outputs
}

fn replace_extension(path: &str, extension: &str) -> String {
    let stem_len = path.len() - paths::extension(path).len();
    format!("{}{extension}", &path[..stem_len])
}

fn append_source_mapping_url(contents: &mut String, map_name: &str, new_line: &str) {
    if !contents.is_empty() && !contents.ends_with(new_line) {
        contents.push_str(new_line);
    }
    contents.push_str("//# sourceMappingURL=");
    contents.push_str(map_name);
}
