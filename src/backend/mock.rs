//! In-memory backend for tests.
//!
//! Responses are keyed by exact query string. Like the real backend, the
//! number of returned files is capped at the request's `limit`.
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::models::{ChunkMatch, FileMatch, Location, Matches, Range, SymbolInfo};
use super::{SearchBackend, SearchRequest};
use crate::error::SearchError;

/// A backend that serves canned responses and records every request.
#[derive(Default)]
pub struct StaticBackend {
    responses: HashMap<String, Result<Vec<FileMatch>, SearchError>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl StaticBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `files` for `query`.
    #[must_use]
    pub fn with_files(mut self, query: &str, files: Vec<FileMatch>) -> Self {
        self.responses.insert(query.to_string(), Ok(files));
        self
    }

    /// Fail every call for `query` with `error`.
    #[must_use]
    pub fn with_error(mut self, query: &str, error: SearchError) -> Self {
        self.responses.insert(query.to_string(), Err(error));
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchBackend for StaticBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<FileMatch>, SearchError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
        match self.responses.get(&request.query) {
            Some(Ok(files)) => Ok(files.iter().take(request.limit).cloned().collect()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(Vec::new()),
        }
    }
}

// ── Fixture helpers ──────────────────────────────────────────────────

/// Base64-encode content the way the backend does.
#[must_use]
pub fn encode(text: &str) -> String {
    STANDARD.encode(text)
}

/// A chunk with one symbol-tagged range per `(name, kind, line)`.
#[must_use]
pub fn symbol_chunk(content: &str, symbols: &[(&str, &str, u32)]) -> ChunkMatch {
    let start_line = symbols.first().map(|s| s.2).unwrap_or(1);
    ChunkMatch {
        content: encode(content),
        content_start: Location {
            byte_offset: 0,
            line: start_line,
            column: 1,
        },
        file_name: false,
        ranges: symbols
            .iter()
            .map(|&(_, _, line)| Range {
                start: Location {
                    byte_offset: 0,
                    line,
                    column: 5,
                },
                end: Location {
                    byte_offset: 0,
                    line,
                    column: 10,
                },
            })
            .collect(),
        symbol_info: symbols
            .iter()
            .map(|&(name, kind, _)| {
                Some(SymbolInfo {
                    sym: name.to_string(),
                    kind: kind.to_string(),
                    ..SymbolInfo::default()
                })
            })
            .collect(),
    }
}

/// A file match in `repo` carrying the given chunks.
#[must_use]
pub fn chunk_file(repo: &str, file: &str, chunks: Vec<ChunkMatch>) -> FileMatch {
    FileMatch {
        repository: repo.to_string(),
        file_name: file.to_string(),
        branches: vec!["HEAD".to_string()],
        language: Some("Go".to_string()),
        matches: Matches::Chunks(chunks),
    }
}

/// `files` file matches, each holding `per_file` function symbols on
/// consecutive lines.
#[must_use]
pub fn symbol_files(files: usize, per_file: usize) -> Vec<FileMatch> {
    (0..files)
        .map(|f| {
            let names: Vec<String> = (0..per_file).map(|s| format!("fn_{f}_{s}")).collect();
            let symbols: Vec<(&str, &str, u32)> = names
                .iter()
                .enumerate()
                .map(|(i, n)| (n.as_str(), "function", i as u32 + 1))
                .collect();
            chunk_file(
                "repo",
                &format!("src/file_{f}.go"),
                vec![symbol_chunk("func body() {}", &symbols)],
            )
        })
        .collect()
}
