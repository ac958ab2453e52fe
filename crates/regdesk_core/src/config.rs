//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Resolution never fails; every path has a fallback.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "REGDESK_DB_PATH";
pub const EXPORT_DIR_ENV: &str = "REGDESK_EXPORT_DIR";
pub const LOG_LEVEL_ENV: &str = "REGDESK_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "regdesk.sqlite3";

/// Resolved paths and levels used by FFI and CLI entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegdeskConfig {
    /// SQLite file backing the document store.
    pub db_path: PathBuf,
    /// Directory receiving `students.csv`.
    pub export_dir: PathBuf,
    /// Log level passed to [`crate::init_logging`].
    pub log_level: String,
}

impl RegdeskConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            export_dir: non_blank(EXPORT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_export_dir),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}

/// User downloads directory, or the temp directory when none is known.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(std::env::temp_dir)
}
