//! Prompt templates offered alongside the tools.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::catalog::call_tool;
use super::context::ToolContext;
use super::params::AnalyzeTradeArgs;
use crate::error::DispatchError;

#[derive(Clone, Debug, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PromptDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: Value,
}

impl PromptMessage {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self { role, content: json!({ "type": "text", "text": text.into() }) }
    }

    /// The text of the message, if it is a text message.
    pub fn as_text(&self) -> Option<&str> {
        self.content.get("text").and_then(Value::as_str)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PromptResult {
    pub description: &'static str,
    pub messages: Vec<PromptMessage>,
}

const ANALYZE_TRADE_DESCRIPTION: &str = "Generate a prompt to analyze a trading pair's performance.";
const TRADING_STRATEGY_DESCRIPTION: &str = "Generate a prompt for suggesting a trading strategy.";

pub fn prompt_definitions() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition {
            name: "analyze_trade",
            description: ANALYZE_TRADE_DESCRIPTION,
            arguments: vec![
                PromptArgument {
                    name: "pair",
                    description: "Trading pair to analyze (e.g., \"BTC/USDT\")",
                    required: true,
                },
                PromptArgument {
                    name: "timeframe",
                    description: "Timeframe for the analysis (e.g., \"1h\")",
                    required: true,
                },
            ],
        },
        PromptDefinition {
            name: "trading_strategy",
            description: TRADING_STRATEGY_DESCRIPTION,
            arguments: Vec::new(),
        },
    ]
}

pub async fn get_prompt(
    ctx: &ToolContext,
    name: &str,
    arguments: Map<String, Value>,
) -> Result<PromptResult, DispatchError> {
    match name {
        "analyze_trade" => {
            let args: AnalyzeTradeArgs = serde_json::from_value(Value::Object(arguments)).map_err(|e| {
                DispatchError::InvalidArguments { name: name.to_string(), reason: e.to_string() }
            })?;
            let market_data = call_tool(
                ctx,
                "fetch_market_data",
                json!({ "pair": args.pair, "timeframe": args.timeframe }),
            )
            .await?;

            Ok(PromptResult {
                description: ANALYZE_TRADE_DESCRIPTION,
                messages: vec![
                    PromptMessage::text(
                        Role::User,
                        format!("Analyze the recent performance of {} over {}.", args.pair, args.timeframe),
                    ),
                    PromptMessage::text(Role::User, format!("Market data: {}", market_data.text)),
                    PromptMessage::text(
                        Role::Assistant,
                        format!("I'll analyze the market data for {} and provide insights.", args.pair),
                    ),
                ],
            })
        }
        "trading_strategy" => Ok(PromptResult {
            description: TRADING_STRATEGY_DESCRIPTION,
            messages: vec![PromptMessage::text(
                Role::User,
                "Based on the current bot status, profit, and market conditions, suggest a trading strategy.",
            )],
        }),
        other => Err(DispatchError::UnknownPrompt(other.to_string())),
    }
}
