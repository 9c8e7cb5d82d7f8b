//! Token budget resolution
//!
//! Model ids end in a capacity segment such as `moonshot-v1-8k` or
//! `moonshot-v1-128k`. The segment after the last `-` is read as a number with
//! optional stacked binary unit suffixes, and the output budget is whatever that
//! capacity leaves after the input tokens.

use crate::error::{SdkError, SdkResult};

/// Binary unit suffixes, tried in this order on every pass
const UNITS: [(char, u64); 3] = [('k', 1 << 10), ('m', 1 << 20), ('b', 1 << 30)];

/// Total context capacity encoded in a model id
pub fn model_capacity(model: &str) -> SdkResult<u64> {
    let mut segment = model.rsplit('-').next().unwrap_or(model);
    let mut rate: u64 = 1;

    'strip: loop {
        for (suffix, factor) in UNITS {
            if let Some(rest) = segment.strip_suffix(suffix) {
                segment = rest;
                rate = rate.checked_mul(factor).ok_or_else(|| capacity_overflow(model))?;
                continue 'strip;
            }
        }
        break;
    }

    let count: u64 = segment.parse().map_err(|_| {
        SdkError::validation(
            "model",
            format!("cannot read a token capacity from model id '{}'", model),
        )
    })?;

    count.checked_mul(rate).ok_or_else(|| capacity_overflow(model))
}

/// Output tokens left once `input_tokens` are spent
pub fn resolve(model: &str, input_tokens: u64) -> SdkResult<u64> {
    let capacity = model_capacity(model)?;
    remaining(capacity, input_tokens)
}

pub(crate) fn remaining(capacity: u64, input_tokens: u64) -> SdkResult<u64> {
    capacity.checked_sub(input_tokens).ok_or_else(|| {
        SdkError::validation(
            "messages",
            format!(
                "input of {} tokens exceeds the model capacity of {} tokens",
                input_tokens, capacity
            ),
        )
    })
}

fn capacity_overflow(model: &str) -> SdkError {
    SdkError::validation("model", format!("token capacity of model id '{}' overflows", model))
}
