//! Application-level configuration resolved from the environment.

use std::{env, path::PathBuf, time::Duration};

use tracing::{info, warn};

/// Default location of the persisted document when no override is set.
const DEFAULT_DATA_PATH: &str = "data/db.json";
/// Environment variable overriding [`DEFAULT_DATA_PATH`].
const DATA_PATH_ENV: &str = "FOUR21_DATA_PATH";
/// Environment variable toggling the per-group password check.
const REQUIRE_PASSWORD_ENV: &str = "FOUR21_REQUIRE_PASSWORD";
/// Environment variable overriding the session duration, in days.
const SESSION_DAYS_ENV: &str = "FOUR21_SESSION_DAYS";
/// Default session duration granted after a password verification.
const DEFAULT_SESSION_DAYS: u64 = 30;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    data_path: PathBuf,
    require_password: bool,
    session_days: u64,
}

impl AppConfig {
    /// Resolve the configuration from environment variables, falling back
    /// to defaults suitable for local use.
    pub fn load() -> Self {
        let data_path = env::var_os(DATA_PATH_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let require_password = match env::var(REQUIRE_PASSWORD_ENV) {
            Ok(value) => match value.parse::<bool>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    warn!(
                        value = %value,
                        "unparseable {REQUIRE_PASSWORD_ENV}; password check stays enabled"
                    );
                    true
                }
            },
            Err(_) => true,
        };

        let session_days = env::var(SESSION_DAYS_ENV)
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SESSION_DAYS);

        let config = Self {
            data_path,
            require_password,
            session_days,
        };
        info!(
            path = %config.data_path.display(),
            require_password = config.require_password,
            session_days = config.session_days,
            "resolved configuration"
        );
        config
    }

    /// Build a configuration directly, bypassing the environment. Used by
    /// tests and embedding callers.
    pub fn with_values(data_path: impl Into<PathBuf>, require_password: bool) -> Self {
        Self {
            data_path: data_path.into(),
            require_password,
            session_days: DEFAULT_SESSION_DAYS,
        }
    }

    /// Location of the persisted document on disk.
    pub fn data_path(&self) -> &PathBuf {
        &self.data_path
    }

    /// Whether group access requires a verified password session.
    pub fn require_password(&self) -> bool {
        self.require_password
    }

    /// How long a verified group session stays valid.
    pub fn session_duration(&self) -> Duration {
        Duration::from_secs(self.session_days * 24 * 60 * 60)
    }
}
