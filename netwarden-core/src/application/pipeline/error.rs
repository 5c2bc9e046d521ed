use crate::config::ConfigError;
use thiserror::Error;

/// Failures that escape a cycle. Gateway and sink failures are absorbed by
/// the steps themselves; only prompt rendering problems surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("prompt '{prompt}' could not be rendered: {source}")]
    Prompt {
        prompt: &'static str,
        #[source]
        source: ConfigError,
    },
}
