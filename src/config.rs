//! Configuration module for zoekt-mcp.
//!
//! Handles loading, validating, and providing default configuration values.
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ── Default value functions ──────────────────────────────────────────

fn default_backend_url() -> String {
    "http://localhost:6070".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_limit() -> usize {
    30
}

fn default_max_limit() -> usize {
    100
}

fn default_context_lines() -> usize {
    3
}

fn default_max_context_lines() -> usize {
    10
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the search backend (without `/api/search`).
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Per-call timeout; the in-flight request is aborted when it elapses.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    #[serde(default = "default_context_lines")]
    pub default_context_lines: usize,

    #[serde(default = "default_max_context_lines")]
    pub max_context_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_ms: default_request_timeout_ms(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            default_context_lines: default_context_lines(),
            max_context_lines: default_max_context_lines(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to `"config.json"`. A missing file
    /// yields the defaults; so does a file that is not valid JSON (with a
    /// warning).
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            "config.json"
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        match serde_json::from_str(&data) {
            Ok(cfg) => {
                info!("Loaded configuration from {path}");
                Ok(cfg)
            }
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.backend_url.trim().is_empty(), "backend_url must be set");
        anyhow::ensure!(
            self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://"),
            "backend_url must be an http(s) URL"
        );
        anyhow::ensure!(
            self.request_timeout_ms > 0,
            "request_timeout_ms must be positive"
        );
        anyhow::ensure!(self.max_limit > 0, "max_limit must be positive");
        anyhow::ensure!(
            (1..=self.max_limit).contains(&self.default_limit),
            "default_limit must be between 1 and max_limit"
        );
        anyhow::ensure!(
            self.default_context_lines <= self.max_context_lines,
            "default_context_lines must not exceed max_context_lines"
        );
        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
