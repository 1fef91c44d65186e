//! Per-episode trajectory storage.

use tch::Tensor;

use crate::error::{Result, TrainError};

/// Ordered record of one episode.
///
/// `values`, `log_probs` and `entropies` are scalar tensors that stay attached
/// to the critic's and actor's autograd graphs until the losses are backed up.
/// Once [`Trajectory::bootstrap`] has appended the final value,
/// `values.len() == rewards.len() + 1`.
#[derive(Debug, Default)]
pub struct Trajectory {
    values: Vec<Tensor>,
    log_probs: Vec<Tensor>,
    rewards: Vec<f64>,
    entropies: Vec<Tensor>,
    bootstrapped: bool,
}

impl Trajectory {
    /// Creates a new empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one step.
    pub fn push(&mut self, value: Tensor, log_prob: Tensor, reward: f64, entropy: Tensor) -> Result<()> {
        if self.bootstrapped {
            return Err(TrainError::Trajectory("is already closed by its bootstrap value"));
        }
        self.values.push(value);
        self.log_probs.push(log_prob);
        self.rewards.push(reward);
        self.entropies.push(entropy);
        Ok(())
    }

    /// Appends the value of the state after the last step and closes the
    /// trajectory. Use a zero tensor for a natural termination.
    pub fn bootstrap(&mut self, value: Tensor) -> Result<()> {
        if self.bootstrapped {
            return Err(TrainError::Trajectory("already has a bootstrap value"));
        }
        self.values.push(value);
        self.bootstrapped = true;
        Ok(())
    }

    /// Number of environment steps recorded.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Returns true if no step was recorded.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    pub fn values(&self) -> &[Tensor] {
        &self.values
    }

    pub fn log_probs(&self) -> &[Tensor] {
        &self.log_probs
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    pub fn entropies(&self) -> &[Tensor] {
        &self.entropies
    }

    /// Detached value estimates as plain numbers, bootstrap included.
    pub fn value_estimates(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.double_value(&[])).collect()
    }

    /// Mean per-step entropy, 0 for an empty trajectory.
    pub fn mean_entropy(&self) -> f64 {
        if self.entropies.is_empty() {
            return 0.0;
        }
        let total: f64 = self.entropies.iter().map(|e| e.double_value(&[])).sum();
        total / self.entropies.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(v: f64) -> Tensor {
        Tensor::from_slice(&[v as f32]).squeeze()
    }

    #[test]
    fn bootstrap_adds_one_value() {
        let mut traj = Trajectory::new();
        assert!(traj.is_empty());
        for r in [1.0, 2.0, 3.0] {
            traj.push(scalar(0.5), scalar(-0.1), r, scalar(0.7)).unwrap();
        }
        traj.bootstrap(scalar(0.0)).unwrap();

        assert_eq!(traj.len(), 3);
        assert_eq!(traj.values().len(), traj.rewards().len() + 1);
        assert!((traj.mean_entropy() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn closed_trajectory_rejects_more_data() {
        let mut traj = Trajectory::new();
        traj.push(scalar(0.0), scalar(0.0), 0.0, scalar(0.0)).unwrap();
        traj.bootstrap(scalar(1.0)).unwrap();
        assert!(traj.bootstrap(scalar(1.0)).is_err());
        assert!(traj.push(scalar(0.0), scalar(0.0), 0.0, scalar(0.0)).is_err());
    }
}
