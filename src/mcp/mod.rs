//! Model Context Protocol front end: JSON-RPC dispatch plus the stdio and
//! streamable-HTTP transports.

pub mod http;
pub mod protocol;
pub mod server;
pub mod stdio;

pub use server::{McpServer, ServerInfo};
