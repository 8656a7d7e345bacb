use config::{Config, Environment};
use serde::Deserialize;

/// Runtime overrides read from `CSFD_*` environment variables
/// (`CSFD_TIMEOUT_SECS`, `CSFD_USER_AGENT`). CLI flags take precedence.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Settings {
    pub fn load() -> Self {
        Config::builder()
            .add_source(Environment::with_prefix("CSFD"))
            .build()
            .and_then(|config| config.try_deserialize())
            .unwrap_or_default()
    }
}
