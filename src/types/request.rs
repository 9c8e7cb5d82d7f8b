//! Request types and pre-flight validation

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Message, ResponseFormat};
use crate::error::{SdkError, SdkResult};

/// Maximum number of stop sequences the service accepts
pub const MAX_STOP_SEQUENCES: usize = 5;
/// Maximum UTF-8 length of a single stop sequence
pub const MAX_STOP_SEQUENCE_BYTES: usize = 32;

/// How `max_tokens` is chosen when the caller leaves it unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxTokenPolicy {
    /// Leave it to the service default
    #[default]
    Default,
    /// Fill in everything the model context has left after the input
    Max,
}

impl std::str::FromStr for MaxTokenPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "max" => Ok(Self::Max),
            _ => Err(format!("Unknown max token policy: {}", s)),
        }
    }
}

/// Optional knobs for a chat completion.
///
/// Every field is independent; `None` means the service default applies and the
/// field is left out of the payload entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatOptions {
    pub max_tokens: Option<u64>,
    pub max_token_policy: MaxTokenPolicy,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub n: Option<u32>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub response_format: Option<ResponseFormat>,
    pub stop: Option<Vec<String>>,
    pub stream: Option<bool>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_tokens(mut self, tokens: u64) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn max_token_policy(mut self, policy: MaxTokenPolicy) -> Self {
        self.max_token_policy = policy;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    pub fn presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    pub fn frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn stop(mut self, sequences: Vec<String>) -> Self {
        self.stop = Some(sequences);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    /// True when the builder has to ask the token budget resolver for `max_tokens`
    pub fn needs_budget(&self) -> bool {
        self.max_tokens.is_none() && self.max_token_policy == MaxTokenPolicy::Max
    }

    /// Check every present field against its declared range.
    ///
    /// Fails fast on the first violation.
    pub fn validate(&self) -> SdkResult<()> {
        SamplingFields {
            temperature: self.temperature,
            top_p: self.top_p,
            n: self.n,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
            stop: self.stop.as_deref(),
            stream: self.stream,
        }
        .check()
    }
}

/// Borrowed view of the range-checked fields shared by options and requests
struct SamplingFields<'a> {
    temperature: Option<f64>,
    top_p: Option<f64>,
    n: Option<u32>,
    presence_penalty: Option<f64>,
    frequency_penalty: Option<f64>,
    stop: Option<&'a [String]>,
    stream: Option<bool>,
}

impl SamplingFields<'_> {
    fn check(&self) -> SdkResult<()> {
        check_range("temperature", self.temperature, Interval::closed(0.0, 1.0))?;
        check_range("top_p", self.top_p, Interval::open(0.0, 1.0))?;
        check_range("n", self.n.map(f64::from), Interval::closed(1.0, 5.0))?;
        check_range("presence_penalty", self.presence_penalty, Interval::closed(-2.0, 2.0))?;
        check_range("frequency_penalty", self.frequency_penalty, Interval::closed(-2.0, 2.0))?;

        if let Some(stop) = self.stop {
            check_stop(stop)?;
        }

        if self.stream == Some(true) {
            return Err(SdkError::UnsupportedFeature(
                "streaming responses are not supported".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_stop(stop: &[String]) -> SdkResult<()> {
    if stop.len() > MAX_STOP_SEQUENCES {
        return Err(SdkError::validation(
            "stop",
            format!("stop accepts at most {} sequences, got {}", MAX_STOP_SEQUENCES, stop.len()),
        ));
    }
    if let Some(long) = stop.iter().find(|s| s.len() > MAX_STOP_SEQUENCE_BYTES) {
        return Err(SdkError::validation(
            "stop",
            format!(
                "stop sequence [{}] is too long, max length is {} bytes",
                long, MAX_STOP_SEQUENCE_BYTES
            ),
        ));
    }
    Ok(())
}

/// Numeric interval with independently open or closed ends
#[derive(Debug, Clone, Copy)]
struct Interval {
    min: f64,
    max: f64,
    include_min: bool,
    include_max: bool,
}

impl Interval {
    fn closed(min: f64, max: f64) -> Self {
        Self { min, max, include_min: true, include_max: true }
    }

    fn open(min: f64, max: f64) -> Self {
        Self { min, max, include_min: false, include_max: false }
    }

    fn contains(&self, value: f64) -> bool {
        let above = if self.include_min { value >= self.min } else { value > self.min };
        let below = if self.include_max { value <= self.max } else { value < self.max };
        above && below
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.include_min { '[' } else { '(' },
            self.min,
            self.max,
            if self.include_max { ']' } else { ')' },
        )
    }
}

fn check_range(field: &'static str, value: Option<f64>, interval: Interval) -> SdkResult<()> {
    match value {
        // NaN fails every comparison and is rejected here
        Some(v) if !interval.contains(v) => Err(SdkError::validation(
            field,
            format!("{} should be in {}", field, interval),
        )),
        _ => Ok(()),
    }
}

/// Chat completion request payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
            top_p: None,
            n: None,
            presence_penalty: None,
            frequency_penalty: None,
            response_format: None,
            stop: None,
            stream: None,
        }
    }

    /// Validate `messages` and `options`, then copy every present option over.
    ///
    /// `max_tokens` stays unset under the `Max` policy; the client fills it in
    /// once the token budget is known.
    pub fn from_options(
        model: impl Into<String>,
        messages: Vec<Message>,
        options: &ChatOptions,
    ) -> SdkResult<Self> {
        check_messages(&messages)?;
        options.validate()?;

        Ok(Self {
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            n: options.n,
            presence_penalty: options.presence_penalty,
            frequency_penalty: options.frequency_penalty,
            response_format: options.response_format,
            stop: options.stop.clone(),
            stream: options.stream,
            ..Self::new(model, messages)
        })
    }

    /// Re-run the pre-flight checks on a request that may have been built by hand
    pub fn validate(&self) -> SdkResult<()> {
        check_messages(&self.messages)?;
        SamplingFields {
            temperature: self.temperature,
            top_p: self.top_p,
            n: self.n,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
            stop: self.stop.as_deref(),
            stream: self.stream,
        }
        .check()
    }
}

fn check_messages(messages: &[Message]) -> SdkResult<()> {
    if messages.is_empty() {
        return Err(SdkError::validation("messages", "messages are required"));
    }
    Ok(())
}

/// Tokenizer request payload
#[derive(Debug, Clone, Serialize)]
pub struct TokenEstimateRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
}
