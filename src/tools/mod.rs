//! Agent-facing tools and prompts backed by the Freqtrade API.
//!
//! Every tool returns a JSON string: the bot's payload on success, or
//! `{"error": ...}` on failure. Failures never escape as errors; only a
//! malformed call (unknown tool, bad arguments) does.

pub mod catalog;
pub mod context;
pub mod invoke;
pub mod params;
pub mod prompts;
pub mod trade;

pub use catalog::{call_tool, tool_definitions, ToolDefinition};
pub use context::ToolContext;
pub use invoke::{Operation, ToolOutput};
pub use prompts::{get_prompt, prompt_definitions, PromptDefinition, PromptResult};

#[cfg(test)]
mod trade_tests;
