//! Normalized backend match model.
//!
//! Content fields (`ChunkMatch::content`, `LineMatch::line`) are kept exactly
//! as the backend sent them (base64); extractors decode them for output.

/// One file-level result from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
    pub repository: String,
    pub file_name: String,
    pub branches: Vec<String>,
    pub language: Option<String>,
    pub matches: Matches,
}

/// Sub-matches of a file, in whichever shape the backend produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matches {
    Chunks(Vec<ChunkMatch>),
    Lines(Vec<LineMatch>),
}

/// A position in a file. Line and column are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub byte_offset: u32,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub start: Location,
    pub end: Location,
}

/// Symbol metadata attached to one match range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolInfo {
    pub sym: String,
    pub kind: String,
    pub parent: String,
    pub parent_kind: String,
}

/// A contiguous block of content with one or more match ranges.
///
/// `symbol_info[i]` describes `ranges[i]`; `None` means no symbol for that
/// range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkMatch {
    pub content: String,
    pub content_start: Location,
    pub file_name: bool,
    pub ranges: Vec<Range>,
    pub symbol_info: Vec<Option<SymbolInfo>>,
}

/// Byte span of a match inside a legacy line match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineFragment {
    pub line_offset: u32,
    pub match_length: u32,
}

/// Legacy line-oriented match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMatch {
    pub line: String,
    pub line_number: u32,
    pub file_name: bool,
    pub fragments: Vec<LineFragment>,
}
