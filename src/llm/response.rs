//! Call results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata taken from the CLI's `result` lines.
pub type GenerationInfo = serde_json::Map<String, Value>;

/// Key for the reported total cost in USD.
pub const TOTAL_COST_USD_KEY: &str = "TotalCostUSD";
/// Key for the token usage object.
pub const USAGE_KEY: &str = "Usage";
/// Key for the CLI's final result text.
pub const RESULT_KEY: &str = "Result";
/// Key for structured output, when the CLI produced any.
pub const STRUCTURED_OUTPUT_KEY: &str = "StructuredOutput";

/// Response to a [`generate_content`](super::ClaudeCodeLlm::generate_content) call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentResponse {
    /// Assistant text, with tool summaries when the output mode adds them.
    pub text: String,
    pub generation_info: GenerationInfo,
}

impl ContentResponse {
    /// Total cost reported by the CLI, if any.
    #[must_use]
    pub fn total_cost_usd(&self) -> Option<f64> {
        self.generation_info
            .get(TOTAL_COST_USD_KEY)
            .and_then(Value::as_f64)
    }
}
