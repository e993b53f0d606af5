//! Conversions from external error types into `ConfigError`.

use super::ConfigError;

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}
