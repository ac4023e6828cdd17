//! Option enums understood by both the driver and the compiler engine.

use serde::Serialize;

/// ECMAScript version targeted by code generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ScriptTarget {
    #[default]
    ES3,
    ES5,
}

impl ScriptTarget {
    /// Parse a user-supplied target name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "es3" => Some(Self::ES3),
            "es5" => Some(Self::ES5),
            _ => None,
        }
    }
}

/// Module code generation style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ModuleKind {
    /// Synchronous `require` modules (`commonjs` / `node`).
    #[default]
    CommonJS,
    /// Asynchronous `define` modules.
    AMD,
}

impl ModuleKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "commonjs" | "node" => Some(Self::CommonJS),
            "amd" => Some(Self::AMD),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NewLineKind {
    CarriageReturnLineFeed,
    LineFeed,
}

impl NewLineKind {
    /// The line terminator of the platform the driver runs on.
    pub const fn platform() -> Self {
        if cfg!(windows) {
            Self::CarriageReturnLineFeed
        } else {
            Self::LineFeed
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "crlf" => Some(Self::CarriageReturnLineFeed),
            "lf" => Some(Self::LineFeed),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CarriageReturnLineFeed => "\r\n",
            Self::LineFeed => "\n",
        }
    }
}
