//! Response types for the Moonshot API

use serde::{Deserialize, Serialize};

use super::{Message, Usage, FINISH_REASON_STOP};

/// Chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// A candidate completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Choice {
    pub fn new(index: u32, message: Message, finish_reason: Option<&str>) -> Self {
        Self {
            index,
            message,
            finish_reason: finish_reason.map(str::to_string),
        }
    }

    /// Whether generation ended naturally
    pub fn is_complete(&self) -> bool {
        self.finish_reason.as_deref() == Some(FINISH_REASON_STOP)
    }
}

/// Models list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub data: Vec<ModelObject>,
}

/// Individual model descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelObject {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub owned_by: String,
    #[serde(default)]
    pub permission: Vec<ModelPermission>,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Permission block attached to a model descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPermission {
    pub id: Option<String>,
    pub object: Option<String>,
    pub created: i64,
    pub allow_create_engine: bool,
    pub allow_sampling: bool,
    pub allow_logprobs: bool,
    pub allow_search_indices: bool,
    pub allow_view: bool,
    pub allow_fine_tuning: bool,
    pub organization: Option<String>,
    pub group: Option<String>,
    pub is_blocking: bool,
}

/// Account balance, in CNY
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub available_balance: f64,
    pub voucher_balance: f64,
    pub cash_balance: f64,
}

/// Envelope around [`Balance`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub code: i64,
    pub data: Balance,
    #[serde(default)]
    pub scode: Option<String>,
    #[serde(default)]
    pub status: bool,
}

/// Tokenizer response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEstimateResponse {
    pub data: TokenEstimate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenEstimate {
    pub total_tokens: u64,
}
