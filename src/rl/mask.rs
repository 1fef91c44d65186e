//! Action masks over the discrete action space.

use tch::{Device, Kind, Tensor};

use crate::error::{Result, TrainError};

/// Per-action weights: `1.0` allowed, `0.0` forbidden.
///
/// The mask enters the policy as `logits + mask.ln()`, i.e. an additive bias of
/// `0` or `-inf`. At least one action must stay allowed, otherwise every
/// probability is zero and every log-probability is `-inf`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMask {
    weights: Vec<f32>,
}

impl ActionMask {
    /// Mask allowing all `n` actions.
    pub fn all_allowed(n: usize) -> Self {
        Self {
            weights: vec![1.0; n],
        }
    }

    /// Mask allowing only `action` out of `n`.
    pub fn only(n: usize, action: usize) -> Result<Self> {
        let mut mask = Self {
            weights: vec![0.0; n],
        };
        mask.allow(action)?;
        Ok(mask)
    }

    /// Builds a mask from per-action flags.
    pub fn from_allowed(allowed: &[bool]) -> Self {
        Self {
            weights: allowed.iter().map(|&a| if a { 1.0 } else { 0.0 }).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn is_allowed(&self, action: usize) -> bool {
        self.weights.get(action).is_some_and(|&w| w > 0.0)
    }

    /// Number of allowed actions.
    pub fn n_allowed(&self) -> usize {
        self.weights.iter().filter(|&&w| w > 0.0).count()
    }

    pub fn allow(&mut self, action: usize) -> Result<()> {
        self.set(action, 1.0)
    }

    pub fn forbid(&mut self, action: usize) -> Result<()> {
        self.set(action, 0.0)
    }

    fn set(&mut self, action: usize, weight: f32) -> Result<()> {
        let n_actions = self.weights.len();
        let slot = self
            .weights
            .get_mut(action)
            .ok_or(TrainError::InvalidAction { action, n_actions })?;
        *slot = weight;
        Ok(())
    }

    /// Additive log-bias of shape `[1, n]`, ready to add to batched logits.
    pub fn log_bias(&self, device: Device) -> Result<Tensor> {
        if self.n_allowed() == 0 {
            return Err(TrainError::EmptyMask);
        }
        Ok(Tensor::from_slice(&self.weights)
            .to_kind(Kind::Float)
            .to_device(device)
            .log()
            .unsqueeze(0))
    }
}
