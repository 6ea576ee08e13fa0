//! Environment-driven runtime configuration.
//!
//! | Variable         | Default                          |
//! |------------------|----------------------------------|
//! | `HRMS_DB_PATH`   | `<temp_dir>/hrms.sqlite3`        |
//! | `HRMS_LOG_LEVEL` | `hrms_core::default_log_level()` |
//! | `HRMS_LOG_DIR`   | unset, file logging disabled     |
//!
//! Blank values count as unset.

use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "HRMS_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "HRMS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "HRMS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "hrms.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ApiConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, falling back to defaults for
    /// missing or blank entries.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_VAR)
                .unwrap_or_else(|| hrms_core::default_log_level().to_string()),
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(config.db_path, std::env::temp_dir().join("hrms.sqlite3"));
        assert_eq!(config.log_level, hrms_core::default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let config = ApiConfig::from_lookup(lookup(&[
            (DB_PATH_VAR, " /srv/hrms/data.sqlite3 "),
            (LOG_LEVEL_VAR, "warn"),
            (LOG_DIR_VAR, "/var/log/hrms"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/srv/hrms/data.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/hrms")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[(DB_PATH_VAR, "   "), (LOG_DIR_VAR, "")]));
        assert_eq!(config, ApiConfig::default());
    }
}
