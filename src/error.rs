//! Error taxonomy shared by the cursor codec, the backend adapter and the
//! paginator.
//!
//! Cursor-class errors are detected locally before any network call is made.
//! Backend-class errors are only produced after a call was attempted.
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Errors surfaced by the paging pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid cursor format: the cursor could not be decoded, start again without a cursor")]
    MalformedCursor,

    #[error(
        "cursor does not match the current query: cursors are bound to the query that produced them"
    )]
    CursorMismatch,

    #[error("invalid cursor offset {0}: offset must not be negative")]
    InvalidOffset(i64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("search backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("search backend timed out after {timeout_ms}ms")]
    BackendTimeout { timeout_ms: u64 },

    #[error("search backend rejected the query (status {status}): {message}{}", hint_suffix(.hint))]
    BackendQuery {
        status: u16,
        message: String,
        hint: Option<String>,
    },
}

impl SearchError {
    /// Build a query error from a backend response, attaching a hint when the
    /// message matches a known pattern.
    pub fn backend_query(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let hint = hint_for(&message).map(str::to_string);
        Self::BackendQuery {
            status,
            message,
            hint,
        }
    }

    /// Whether the error was detected locally from the cursor alone.
    #[must_use]
    pub fn is_cursor_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedCursor | Self::CursorMismatch | Self::InvalidOffset(_)
        )
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_deref()
        .map(|h| format!(" (hint: {h})"))
        .unwrap_or_default()
}

// ── Hints ────────────────────────────────────────────────────────────

static REGEX_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(error parsing regexp|missing closing|invalid (escape|repeat|character class)|regexp)")
        .expect("valid regex")
});

static UNKNOWN_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(unknown (field|filter|atom)|unrecognized (field|filter))").expect("valid regex")
});

static DEADLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(deadline exceeded|timed? ?out|timeout)").expect("valid regex")
});

/// Best-effort hint for a backend error message. Pattern matches only.
#[must_use]
pub fn hint_for(message: &str) -> Option<&'static str> {
    if REGEX_SYNTAX.is_match(message) {
        Some("the query is parsed as a regular expression; escape special characters such as ( ) [ ] . * + ?")
    } else if UNKNOWN_FIELD.is_match(message) {
        Some(
            "supported filters are lang:, repo:/r:, file:/f:, branch:/b:, case:, sym:, type:/t:, archived:",
        )
    } else if DEADLINE.is_match(message) {
        Some("narrow the search with repo: or lang: filters, or lower the limit")
    } else {
        None
    }
}

// ── Tests ────────────────────────────────────────────────────────────
