//! Item extraction: flattens file-level backend matches into item-level
//! records (symbols, files, references, content matches).
pub mod content;
pub mod dedup;
pub mod files;
pub mod references;
pub mod symbols;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::backend::FileMatch;

pub use content::ContentExtractor;
pub use dedup::deduplicate;
pub use files::FileExtractor;
pub use references::{DefinitionExtractor, UsageExtractor};
pub use symbols::SymbolExtractor;

/// Turns a materialized list of file matches into items, preserving backend
/// order.
pub trait ItemExtractor {
    type Item;

    fn extract(&self, files: &[FileMatch]) -> Vec<Self::Item>;
}

// ── Item types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Method,
    Variable,
    Interface,
    Type,
    Constant,
    Property,
    Unknown,
}

impl SymbolKind {
    /// Map a free-form kind string (ctags style) onto the closed set.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "function" | "func" | "fn" | "def" | "procedure" | "subroutine" | "prototype" => {
                Self::Function
            }
            "class" | "struct" | "object" | "module" => Self::Class,
            "method" | "member" | "methodspec" | "constructor" => Self::Method,
            "variable" | "var" | "let" | "local" | "global" => Self::Variable,
            "interface" | "trait" | "protocol" => Self::Interface,
            "type" | "typedef" | "typealias" | "alias" | "enum" | "union" => Self::Type,
            "constant" | "const" | "enumerator" | "define" | "macro" => Self::Constant,
            "property" | "field" | "prop" | "attribute" => Self::Property,
            _ => Self::Unknown,
        }
    }
}

/// A symbol definition found by the backend's symbol index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_kind: Option<SymbolKind>,
    pub file: String,
    pub repository: String,
    pub line: u32,
    pub column: u32,
}

/// File metadata. Never carries content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    pub file: String,
    pub repository: String,
    pub branches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Definition,
    Usage,
}

/// A definition or usage site of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResult {
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub file: String,
    pub repository: String,
    pub line: u32,
    pub column: u32,
    pub context: String,
    /// Populated for definitions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
}

/// A plain content hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMatch {
    pub file: String,
    pub repository: String,
    pub line: u32,
    pub column: u32,
    pub context: String,
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Decode backend base64 content. Falls back to the input unchanged when it
/// is not valid base64 or not valid UTF-8.
#[must_use]
pub fn decode_content(encoded: &str) -> String {
    STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| encoded.to_string())
}
