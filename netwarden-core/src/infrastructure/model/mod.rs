//! Chat-completion backends shared by the monitoring pipeline and the
//! conversational agent. [`ProviderFactory`] picks the client from `[llm]`.

pub mod adapter;
pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

pub use factory::ProviderFactory;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelRequest, ModelResponse};
