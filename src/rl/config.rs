//! Hyperparameters for the actor-critic training loop.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainError};

/// Training hyperparameters, fixed for the duration of a run.
///
/// Loadable from a JSON file; keys that are absent keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrlConfig {
    // --- Return / advantage ---
    /// Discount factor γ.
    pub gamma: f64,
    /// GAE λ parameter (0 = TD(0), 1 = Monte Carlo).
    pub gae_lambda: f64,
    /// Entropy bonus coefficient.
    pub entropy_coef: f64,

    // --- Optimization ---
    /// Maximum gradient norm for clipping, applied to each model separately.
    pub max_grad_norm: f64,
    /// Actor learning rate.
    pub actor_lr: f64,
    /// Critic learning rate.
    pub critic_lr: f64,

    // --- Schedule ---
    /// Episode horizon; longer episodes are truncated and bootstrapped.
    pub max_step: usize,
    /// Number of passes over the training set.
    pub num_epoch: usize,
    /// Number of generated training instances.
    pub train_size: usize,
    /// Number of generated validation instances.
    pub valid_size: usize,
    /// Examples between two progress reports.
    pub log_interval: usize,
    /// Seed for the run RNG, tensor initialization and dataset generation.
    pub seed: u64,

    // --- Default networks ---
    /// Hidden width of the default actor and critic.
    pub hidden_size: i64,
    /// Dropout probability of the default actor.
    pub dropout: f64,
}

impl Default for DrlConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            gae_lambda: 0.95,
            entropy_coef: 0.01,
            max_grad_norm: 2.0,
            actor_lr: 5e-4,
            critic_lr: 5e-4,
            max_step: 1000,
            num_epoch: 100,
            train_size: 1000,
            valid_size: 100,
            log_interval: 100,
            seed: 123,
            hidden_size: 128,
            dropout: 0.1,
        }
    }
}

impl DrlConfig {
    /// Reads and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TrainError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses and validates a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(TrainError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {v}"
                )))
            }
        };
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TrainError::InvalidConfig(format!(
                    "{name} must be positive, got {v}"
                )))
            }
        };

        unit("gamma", self.gamma)?;
        unit("gae_lambda", self.gae_lambda)?;
        unit("dropout", self.dropout)?;
        positive("max_grad_norm", self.max_grad_norm)?;
        positive("actor_lr", self.actor_lr)?;
        positive("critic_lr", self.critic_lr)?;

        if !self.entropy_coef.is_finite() || self.entropy_coef < 0.0 {
            return Err(TrainError::InvalidConfig(format!(
                "entropy_coef must be non-negative, got {}",
                self.entropy_coef
            )));
        }
        if self.max_step == 0 {
            return Err(TrainError::InvalidConfig("max_step must be at least 1".into()));
        }
        if self.log_interval == 0 {
            return Err(TrainError::InvalidConfig(
                "log_interval must be at least 1".into(),
            ));
        }
        if self.hidden_size <= 0 {
            return Err(TrainError::InvalidConfig(format!(
                "hidden_size must be positive, got {}",
                self.hidden_size
            )));
        }
        Ok(())
    }
}
