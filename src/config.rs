use std::{path::PathBuf, time::Duration};

use thiserror::Error;

pub const QUESTIONS_PATH_VAR: &str = "QUIZ_QUESTIONS_PATH";
pub const REQUEST_TIMEOUT_VAR: &str = "QUIZ_REQUEST_TIMEOUT_SECS";
pub const DROP_PENDING_UPDATES_VAR: &str = "QUIZ_DROP_PENDING_UPDATES";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("{var} must be true or false, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Runtime settings. The bot token itself is read by teloxide from
/// `TELOXIDE_TOKEN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Question file to use instead of the built-in set.
    pub questions_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub drop_pending_updates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_path: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            drop_pending_updates: true,
        }
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            log::debug!("no .env loaded: {err}");
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(QUESTIONS_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.questions_path = Some(PathBuf::from(path.trim()));
        }

        if let Some(value) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: REQUEST_TIMEOUT_VAR,
                    value: value.clone(),
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(value) = lookup(DROP_PENDING_UPDATES_VAR) {
            config.drop_pending_updates = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        var: DROP_PENDING_UPDATES_VAR,
                        value,
                    })
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.drop_pending_updates);
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            (QUESTIONS_PATH_VAR, "questions.json"),
            (REQUEST_TIMEOUT_VAR, "10"),
            (DROP_PENDING_UPDATES_VAR, "false"),
        ]))
        .unwrap();
        assert_eq!(config.questions_path, Some(PathBuf::from("questions.json")));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.drop_pending_updates);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(REQUEST_TIMEOUT_VAR, "soon")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(REQUEST_TIMEOUT_VAR, "0")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(DROP_PENDING_UPDATES_VAR, "maybe")])),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }
}
