use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("failed to write alert log '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build webhook client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("webhook delivery failed: {0}")]
    Webhook(String),
}
