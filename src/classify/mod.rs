//! Remote error classification
//!
//! The service reports failures as `{"error": {"type": ..., "message": ...}}`,
//! where the message embeds runtime values (account ids, limits, wait times).
//! Exact lookup against the documented table is therefore impossible. Instead
//! each documented entry is scored by positional word overlap with the received
//! message, restricted to entries with the same status code and type, and the
//! best-scoring entry lends its localized description.
//!
//! This is a heuristic. Two templates that share a prefix (the `rate_limit_reached_error`
//! family, for example) can be confused when the interpolated values shift word
//! positions, and a message the table does not know falls back to the generic
//! unknown error.

mod catalog;

pub use catalog::*;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Code used for errors that could not be classified
pub const UNKNOWN_CODE: i32 = -1;
/// Type tag used for errors that could not be classified
pub const UNKNOWN_TYPE: &str = "unknown";
/// Description attached to errors that could not be classified
pub const UNKNOWN_DESCRIPTION: &str = "未知错误";

/// A remote failure enriched with the best available description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub code: i32,
    #[serde(rename = "type")]
    pub error_type: String,
    /// Raw message as sent by the service
    pub message: String,
    pub description: String,
}

impl ClassifiedError {
    pub fn new(
        code: i32,
        error_type: impl Into<String>,
        message: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code,
            error_type: error_type.into(),
            message: message.into(),
            description: description.into(),
        }
    }

    /// The generic error returned when no catalog entry applies
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_CODE, UNKNOWN_TYPE, message, UNKNOWN_DESCRIPTION)
    }

    pub fn is_unknown(&self) -> bool {
        self.code == UNKNOWN_CODE && self.error_type == UNKNOWN_TYPE
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HTTP Status Code: {}", self.code)?;
        writeln!(f, "Error Type      : {}", self.error_type)?;
        writeln!(f, "Error Message   : {}", self.message)?;
        write!(f, "Description(CN) : {}", self.description)
    }
}

impl std::error::Error for ClassifiedError {}

/// Score how well `entry` explains `candidate`.
///
/// Zero unless status code and type both match exactly; otherwise the number of
/// whitespace-separated words that are identical at the same position, counted
/// up to the shorter of the two messages.
pub fn similarity(candidate: &ClassifiedError, entry: &ErrorDescriptor) -> usize {
    if candidate.code != i32::from(entry.code) || candidate.error_type != entry.error_type {
        return 0;
    }

    candidate
        .message
        .split_whitespace()
        .zip(entry.message_template.split_whitespace())
        .filter(|(a, b)| a == b)
        .count()
}

/// The first catalog entry with the highest positive score
pub fn best_match(candidate: &ClassifiedError) -> Option<&'static ErrorDescriptor> {
    let mut best: Option<(&'static ErrorDescriptor, usize)> = None;

    for entry in entries() {
        let score = similarity(candidate, entry);
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((entry, score));
        }
    }

    best.map(|(entry, _)| entry)
}

/// Classify a failed exchange from its status code and raw body
pub fn classify(status: u16, body: &str) -> ClassifiedError {
    let Some((error_type, message)) = parse_error_body(body) else {
        debug!(status, "Error body has no error object");
        return ClassifiedError::unknown(body);
    };

    let mut candidate = ClassifiedError::new(i32::from(status), error_type, message, "");
    match best_match(&candidate) {
        Some(entry) => {
            debug!(
                status,
                error_type = %candidate.error_type,
                template = entry.message_template,
                "Matched catalog entry"
            );
            candidate.description = entry.description.to_string();
            candidate
        }
        None => {
            debug!(status, error_type = %candidate.error_type, "No catalog entry matched");
            ClassifiedError::unknown("unknown error")
        }
    }
}

fn parse_error_body(body: &str) -> Option<(String, String)> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?.as_object()?;
    let error_type = error.get("type").and_then(|t| t.as_str()).unwrap_or_default();
    let message = error.get("message")?.as_str()?;
    Some((error_type.to_string(), message.to_string()))
}
