//! Source map helpers: VLQ mapping encoding and source relocation.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;

use crate::cli::paths;

/// Base64 VLQ as used by the source map v3 `mappings` field.
pub mod vlq {
    pub(crate) const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    const CONTINUATION: i64 = 0b10_0000;
    const MASK: i64 = 0b1_1111;

    pub fn encode(value: i64, out: &mut String) {
        let mut remaining = if value < 0 {
            ((-value) << 1) | 1
        } else {
            value << 1
        };
        loop {
            let mut digit = remaining & MASK;
            remaining >>= 5;
            if remaining > 0 {
                digit |= CONTINUATION;
            }
            out.push(BASE64[digit as usize] as char);
            if remaining == 0 {
                break;
            }
        }
    }

}

/// Mappings where every generated line maps to column 0 of one original
/// line.
#[derive(Debug, Default)]
pub struct LineMappings {
    mappings: String,
    lines: usize,
    prev_source: i64,
    prev_line: i64,
}

impl LineMappings {
    pub fn push_line(&mut self, source_index: usize, original_line: usize) {
        if self.lines > 0 {
            self.mappings.push(';');
        }
        self.lines += 1;

        let source_index = source_index as i64;
        let original_line = original_line as i64;
        vlq::encode(0, &mut self.mappings);
        vlq::encode(source_index - self.prev_source, &mut self.mappings);
        vlq::encode(original_line - self.prev_line, &mut self.mappings);
        vlq::encode(0, &mut self.mappings);
        self.prev_source = source_index;
        self.prev_line = original_line;
    }

    pub fn finish(self) -> String {
        self.mappings
    }
}

/// Version 3 source map document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    pub file: String,
    pub source_root: String,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    pub fn new(file: String, sources: Vec<String>, mappings: String) -> Self {
        Self {
            version: 3,
            file,
            source_root: String::new(),
            sources,
            names: Vec::new(),
            mappings,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to serialize source map")
    }
}

/// Replace the map's `sources` with the base name of its first entry
/// re-rooted under `source_dir`. Other fields keep their order and values.
///
/// A map with an empty `sources` list is returned unchanged; entries after
/// the first are dropped.
pub fn relocate_sources(map_json: &str, source_dir: &str) -> Result<String> {
    let mut map: Value = serde_json::from_str(map_json).context("failed to parse source map")?;
    let Some(sources) = map.get_mut("sources").and_then(Value::as_array_mut) else {
        bail!("source map has no sources list");
    };
    let Some(first) = sources.first() else {
        return Ok(map_json.to_string());
    };
    let Some(first) = first.as_str() else {
        bail!("source map source is not a string");
    };

    let relocated = paths::combine(source_dir, paths::base_name(first));
    sources.clear();
    sources.push(Value::String(relocated));
    serde_json::to_string(&map).context("failed to serialize source map")
}
