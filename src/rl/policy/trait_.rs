//! Action selector trait and the training/evaluation switch.

use rand::RngCore;
use tch::Tensor;

use super::{GreedyPolicy, SamplePolicy};
use crate::error::Result;

/// Chooses an action from a categorical distribution over sensors.
///
/// `probs` and `log_probs` are the `[1, n]` softmax and log-softmax of the
/// masked logits. The returned log-probability is a scalar tensor that still
/// belongs to the actor's autograd graph.
pub trait ActionSelector {
    fn select(
        &self,
        probs: &Tensor,
        log_probs: &Tensor,
        rng: &mut dyn RngCore,
    ) -> Result<(usize, Tensor)>;

    /// Returns a human-readable name for this selector.
    fn name(&self) -> &str;
}

/// Which selector a rollout uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Sample from the distribution (training).
    Stochastic,
    /// Take the most probable action (evaluation).
    Greedy,
}

impl SelectionMode {
    /// Whether models should run with training-only behavior (dropout).
    pub fn is_training(&self) -> bool {
        matches!(self, SelectionMode::Stochastic)
    }
}

impl ActionSelector for SelectionMode {
    fn select(
        &self,
        probs: &Tensor,
        log_probs: &Tensor,
        rng: &mut dyn RngCore,
    ) -> Result<(usize, Tensor)> {
        match self {
            SelectionMode::Stochastic => SamplePolicy.select(probs, log_probs, rng),
            SelectionMode::Greedy => GreedyPolicy.select(probs, log_probs, rng),
        }
    }

    fn name(&self) -> &str {
        match self {
            SelectionMode::Stochastic => "sample",
            SelectionMode::Greedy => "greedy",
        }
    }
}
