//! Stdio tool server.
//!
//! Speaks newline-delimited JSON-RPC 2.0 (MCP framing) so assistants and
//! scripts can ask fructose questions without the command-line front end.
//!
//! ## Tools
//!
//! - `fructose_check` - evaluates `search_query`; never writes to the cache
//! - `fructose_history` - recent cached searches
//!
//! ## Example
//!
//! ```ignore
//! use fructcheck::mcp::McpServer;
//! use fructcheck::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load_or_default();
//!     let mut server = McpServer::new(&config).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

mod protocol;
mod server;
mod tools;
mod transport;

pub use protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolContent, ToolDescription, ToolResult,
    ToolsCapability, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, PROTOCOL_VERSION,
};

pub use server::McpServer;
pub use tools::{FructoseCheckParams, FructoseHistoryParams, ToolHandler};
pub use transport::{LineTransport, StdioTransport};
