//! Generalized Advantage Estimation (GAE-λ) and the per-step losses.
//!
//! Both recursions run backwards over the episode:
//!
//! ```text
//! R         = r_i + γ R                     (R starts at the bootstrap value)
//! δ_i       = r_i + γ V_{i+1} - V_i
//! gae       = γ λ gae + δ_i                 (gae starts at 0)
//! value_i   = ½ (R - V_i)²
//! policy_i  = -log π(a_i) · gae - c_H · H_i
//! ```

use tch::Tensor;

use super::buffer::Trajectory;
use crate::error::{Result, TrainError};

/// Computes GAE-λ advantages and bootstrapped discounted returns.
///
/// # Arguments
///
/// * `rewards` - Per-step rewards, length `T`
/// * `values` - Per-step value estimates plus the bootstrap value, length `T + 1`
/// * `gamma` - Discount factor
/// * `gae_lambda` - GAE λ parameter (0 = TD(0), 1 = Monte Carlo)
///
/// # Returns
///
/// `(advantages, returns)`, each of length `T`. The returns are the discounted
/// reward sums seeded with `values[T]`, which is what the critic regresses on.
///
/// # Panics
///
/// Panics if `values.len() != rewards.len() + 1`.
pub fn compute_gae(
    rewards: &[f64],
    values: &[f64],
    gamma: f64,
    gae_lambda: f64,
) -> (Vec<f64>, Vec<f64>) {
    let n = rewards.len();
    assert_eq!(values.len(), n + 1);

    let mut advantages = vec![0.0; n];
    let mut returns = vec![0.0; n];
    let mut ret = values[n];
    let mut gae = 0.0;

    for t in (0..n).rev() {
        ret = rewards[t] + gamma * ret;
        returns[t] = ret;

        let delta = rewards[t] + gamma * values[t + 1] - values[t];
        gae = gae * gamma * gae_lambda + delta;
        advantages[t] = gae;
    }

    (advantages, returns)
}

/// Loss terms for one episode.
#[derive(Debug)]
pub struct EpisodeLosses {
    /// Per-step policy losses, shape `[T]`, attached to the actor graph.
    pub policy: Tensor,
    /// Per-step value losses, shape `[T]`, attached to the critic graph.
    pub value: Tensor,
    /// Detached GAE advantages.
    pub advantages: Vec<f64>,
    /// Bootstrapped discounted returns.
    pub returns: Vec<f64>,
}

impl EpisodeLosses {
    pub fn len(&self) -> usize {
        self.advantages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advantages.is_empty()
    }

    pub fn mean_policy_loss(&self) -> f64 {
        self.policy.detach().mean(tch::Kind::Double).double_value(&[])
    }

    pub fn mean_value_loss(&self) -> f64 {
        self.value.detach().mean(tch::Kind::Double).double_value(&[])
    }
}

/// Turns a bootstrapped trajectory into per-step policy and value losses.
///
/// The advantage multiplying the log-probability is computed from detached
/// values, so only the log-probability and entropy paths reach the actor and
/// only `V_i` in the squared advantage reaches the critic.
pub fn episode_losses(
    trajectory: &Trajectory,
    gamma: f64,
    gae_lambda: f64,
    entropy_coef: f64,
) -> Result<EpisodeLosses> {
    if !trajectory.is_bootstrapped() {
        return Err(TrainError::Trajectory("has no bootstrap value"));
    }
    if trajectory.is_empty() {
        return Err(TrainError::Trajectory("has no steps"));
    }

    let estimates = trajectory.value_estimates();
    let (advantages, returns) = compute_gae(trajectory.rewards(), &estimates, gamma, gae_lambda);

    let values = trajectory.values();
    let log_probs = trajectory.log_probs();
    let entropies = trajectory.entropies();

    let mut policy_terms = Vec::with_capacity(trajectory.len());
    let mut value_terms = Vec::with_capacity(trajectory.len());
    for i in 0..trajectory.len() {
        value_terms.push((&values[i] - returns[i]).square() * 0.5);
        policy_terms.push(&log_probs[i] * -advantages[i] - &entropies[i] * entropy_coef);
    }

    Ok(EpisodeLosses {
        policy: Tensor::stack(&policy_terms, 0),
        value: Tensor::stack(&value_terms, 0),
        advantages,
        returns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::Kind;

    #[test]
    fn zero_rewards_unit_discount_accumulates_value_differences() {
        let rewards = vec![0.0; 3];
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let (advantages, returns) = compute_gae(&rewards, &values, 1.0, 1.0);

        assert_eq!(advantages.len(), 3);
        // advantage_i = sum_{k >= i} (V_{k+1} - V_k) = V_3 - V_i
        for (i, expected) in [3.0, 2.0, 1.0].iter().enumerate() {
            assert!((advantages[i] - expected).abs() < 1e-12);
        }
        assert!(returns.iter().all(|r| (r - 4.0).abs() < 1e-12));
    }

    #[test]
    fn lambda_zero_is_td_error() {
        let rewards = vec![1.0, 2.0];
        let values = vec![0.5, 1.0, 0.0];
        let (advantages, _) = compute_gae(&rewards, &values, 0.99, 0.0);

        // t=1: 2.0 + 0.99*0.0 - 1.0
        assert!((advantages[1] - 1.0).abs() < 1e-10);
        // t=0: 1.0 + 0.99*1.0 - 0.5
        assert!((advantages[0] - 1.49).abs() < 1e-10);
    }

    #[test]
    fn returns_are_seeded_with_bootstrap() {
        let (_, returns) = compute_gae(&[1.0], &[0.0, 10.0], 0.5, 0.95);
        assert!((returns[0] - 6.0).abs() < 1e-12);
    }

    fn scalar(v: f64) -> Tensor {
        Tensor::from_slice(&[v as f32]).squeeze()
    }

    #[test]
    fn losses_have_one_entry_per_step() {
        let mut traj = Trajectory::new();
        for (v, r) in [(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)] {
            traj.push(scalar(v), scalar(-1.0), r, scalar(0.5)).unwrap();
        }
        traj.bootstrap(scalar(4.0)).unwrap();

        let losses = episode_losses(&traj, 1.0, 1.0, 0.01).unwrap();
        assert_eq!(traj.values().len(), traj.len() + 1);
        assert_eq!(losses.policy.size(), &[3]);
        assert_eq!(losses.value.size(), &[3]);

        // policy_0 = -(-1) * 3 - 0.01 * 0.5
        assert!((losses.policy.double_value(&[0]) - 2.995).abs() < 1e-5);
        // value_0 = 0.5 * (4 - 1)^2
        assert!((losses.value.double_value(&[0]) - 4.5).abs() < 1e-5);
    }

    #[test]
    fn advantage_is_detached_from_critic() {
        let v0 = scalar(1.0).set_requires_grad(true);
        let lp = scalar(0.0).set_requires_grad(true);
        let mut traj = Trajectory::new();
        traj.push(&v0 * 1.0, &lp * 1.0, 1.0, scalar(0.0)).unwrap();
        traj.bootstrap(scalar(0.0)).unwrap();

        let losses = episode_losses(&traj, 0.99, 0.95, 0.0).unwrap();
        losses.policy.sum(Kind::Float).backward();
        // d(policy)/d(v0) would be non-zero if gae were attached
        assert!(!v0.grad().defined());
        assert!(lp.grad().defined());
    }

    #[test]
    fn unbootstrapped_trajectory_is_rejected() {
        let mut traj = Trajectory::new();
        traj.push(scalar(0.0), scalar(0.0), 0.0, scalar(0.0)).unwrap();
        assert!(episode_losses(&traj, 0.99, 0.95, 0.01).is_err());
    }
}
