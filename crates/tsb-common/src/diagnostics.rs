//! Diagnostic types and the message table used by the driver.
//!
//! Engines and resolvers produce their own messages; the table below only
//! covers what the driver and its bundled collaborators report themselves.

use serde::Serialize;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A diagnostic reported by the resolver, the engine, or the driver.
///
/// Positions are zero-based; they are rendered one-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<u32>,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
}

impl Diagnostic {
    /// Create a diagnostic from a table entry, filling its `{n}` placeholders.
    #[must_use]
    pub fn from_message(file: Option<String>, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file,
            line: None,
            character: None,
            category: message.category,
            code: message.code,
            message_text: format_message(message.message, args),
        }
    }

    /// Attach a zero-based line/character position.
    #[must_use]
    pub const fn at(mut self, line: u32, character: u32) -> Self {
        self.line = Some(line);
        self.character = Some(character);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const ASTERISK_SLASH_EXPECTED: u32 = 1010;
    pub const EMIT_ERROR: u32 = 5033;
    pub const FILE_NOT_FOUND: u32 = 6053;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::ASTERISK_SLASH_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "'*/' expected.",
    };
    pub const EMIT_ERROR: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EMIT_ERROR,
        category: DiagnosticCategory::Error,
        message: "Emit Error: {0}.",
    };
    pub const FILE_NOT_FOUND: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::FILE_NOT_FOUND,
        category: DiagnosticCategory::Error,
        message: "File '{0}' not found.",
    };
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_placeholders() {
        assert_eq!(
            format_message("File '{0}' not found.", &["a.ts"]),
            "File 'a.ts' not found."
        );
    }

    #[test]
    fn builds_from_table_entry() {
        let diag = Diagnostic::from_message(
            Some("out/a.js".to_string()),
            &diagnostic_messages::EMIT_ERROR,
            &["disk full"],
        );
        assert!(diag.is_error());
        assert_eq!(diag.code, 5033);
        assert_eq!(diag.message_text, "Emit Error: disk full.");

        let missing = Diagnostic::from_message(None, &diagnostic_messages::FILE_NOT_FOUND, &["x.ts"]);
        assert_eq!(missing.code, 6053);
        assert_eq!(missing.message_text, "File 'x.ts' not found.");
    }
}
