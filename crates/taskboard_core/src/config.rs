//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve database path, logging level/directory and deployment
//!   environment with stable defaults.
//!
//! # Invariants
//! - Resolution never fails; blank values fall back to defaults.
//! - Unknown `TASKBOARD_ENV` values are treated as `production`.

use crate::api::ErrorExposure;
use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "TASKBOARD_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "TASKBOARD_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TASKBOARD_LOG_DIR";
pub const ENV_VAR: &str = "TASKBOARD_ENV";

const DEFAULT_DB_FILE_NAME: &str = "taskboard.sqlite3";

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    /// Whether internal error details reach callers.
    pub error_exposure: ErrorExposure,
}

impl CoreConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let db_path = value(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = value(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = value(LOG_DIR_VAR).map(PathBuf::from);
        let error_exposure = match value(ENV_VAR).as_deref() {
            Some(env) if env.eq_ignore_ascii_case("development") => ErrorExposure::Development,
            _ => ErrorExposure::Production,
        };

        Self {
            db_path,
            log_level,
            log_dir,
            error_exposure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_VAR, ENV_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::api::ErrorExposure;
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> CoreConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        CoreConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert!(config.db_path.ends_with("taskboard.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
        assert_eq!(config.error_exposure, ErrorExposure::Production);
    }

    #[test]
    fn explicit_values_are_trimmed_and_used() {
        let config = config_from(&[
            (DB_PATH_VAR, " /data/board.db "),
            (LOG_LEVEL_VAR, "warn"),
            (LOG_DIR_VAR, "/var/log/taskboard"),
            (ENV_VAR, "Development"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/data/board.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/taskboard")));
        assert_eq!(config.error_exposure, ErrorExposure::Development);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(LOG_DIR_VAR, "   "), (ENV_VAR, "staging")]);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.error_exposure, ErrorExposure::Production);
    }
}
