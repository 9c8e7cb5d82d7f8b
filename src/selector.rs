//! Picking one reply out of several candidate completions

use std::sync::Arc;

use parking_lot::Mutex;
use rand::prelude::*;

use crate::error::{SdkError, SdkResult};
use crate::types::Choice;

/// Source of uniform indices.
///
/// Implementations must return a value in `0..len`; `len` is never zero.
pub trait ChoiceSource: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local RNG, non-reproducible
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl ChoiceSource for ThreadRngSource {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Seeded RNG for reproducible selection
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ChoiceSource for SeededSource {
    fn pick(&self, len: usize) -> usize {
        self.rng.lock().gen_range(0..len)
    }
}

/// Chooses the reply returned to the caller.
///
/// Candidates that finished with `"stop"` are preferred; among the preferred set
/// (or among all candidates, when none finished cleanly) the pick is uniform.
#[derive(Clone)]
pub struct ResponseSelector {
    source: Arc<dyn ChoiceSource>,
}

impl ResponseSelector {
    pub fn new(source: Arc<dyn ChoiceSource>) -> Self {
        Self { source }
    }

    /// Selector backed by the thread RNG
    pub fn random() -> Self {
        Self::new(Arc::new(ThreadRngSource))
    }

    /// Selector with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(Arc::new(SeededSource::new(seed)))
    }

    pub fn select<'a>(&self, choices: &'a [Choice]) -> SdkResult<&'a Choice> {
        if choices.is_empty() {
            return Err(SdkError::Parse("response contains no choices".to_string()));
        }

        let complete: Vec<&Choice> = choices.iter().filter(|c| c.is_complete()).collect();
        let picked = if complete.is_empty() {
            &choices[self.source.pick(choices.len())]
        } else {
            complete[self.source.pick(complete.len())]
        };

        Ok(picked)
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::random()
    }
}

impl std::fmt::Debug for ResponseSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSelector").finish_non_exhaustive()
    }
}
