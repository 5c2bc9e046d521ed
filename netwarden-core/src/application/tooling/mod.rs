mod content;
mod error;
mod http;
mod interface;
mod sse;

pub use content::flatten_tool_result;
pub use error::ToolInvokeError;
pub use http::McpHttpClient;
pub use interface::{ToolGateway, ToolInfo};
