use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading, validating or rendering configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found (searched: {searched:?})")]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required field '{field}' in [{section}]")]
    MissingField {
        section: &'static str,
        field: &'static str,
    },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("prompt '{name}' not found in config")]
    PromptNotFound { name: String },

    #[error("prompt template references '{{{variable}}}' but no value was supplied")]
    MissingPromptVariable { variable: String },

    #[error("malformed prompt template: {reason}")]
    MalformedTemplate { reason: String },
}

impl ConfigError {
    pub(crate) fn missing(section: &'static str, field: &'static str) -> Self {
        Self::MissingField { section, field }
    }
}
