pub mod clock;
pub mod types;

pub use clock::iso_timestamp;
pub use types::{ChatMessage, MessageRole};
