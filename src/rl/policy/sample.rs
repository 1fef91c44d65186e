//! Stochastic selection used while training.

use rand::distributions::{Distribution, WeightedIndex};
use rand::RngCore;
use tch::Tensor;

use super::trait_::ActionSelector;
use super::{gather_action, host_probabilities};
use crate::error::Result;

/// Samples an action from the categorical distribution.
///
/// Sampling runs on host memory with the caller's seeded RNG instead of
/// libtorch's `multinomial`, which behaves differently across backends.
/// Actions with probability zero (masked out) are never drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplePolicy;

impl ActionSelector for SamplePolicy {
    fn select(
        &self,
        probs: &Tensor,
        log_probs: &Tensor,
        rng: &mut dyn RngCore,
    ) -> Result<(usize, Tensor)> {
        let weights = host_probabilities(probs)?;
        let dist = WeightedIndex::new(&weights)?;
        let action = dist.sample(rng);
        Ok((action, gather_action(log_probs, action)))
    }

    fn name(&self) -> &str {
        "sample"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::mask::ActionMask;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tch::{Device, Kind};

    fn distribution(logits: &[f32], mask: &ActionMask) -> (Tensor, Tensor) {
        let logits = Tensor::from_slice(logits).unsqueeze(0) + mask.log_bias(Device::Cpu).unwrap();
        (
            logits.softmax(-1, Kind::Float),
            logits.log_softmax(-1, Kind::Float),
        )
    }

    #[test]
    fn one_hot_mask_is_always_respected() {
        let mask = ActionMask::only(4, 2).unwrap();
        let (probs, log_probs) = distribution(&[3.0, 1.0, -2.0, 0.5], &mask);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let (action, logp) = SamplePolicy.select(&probs, &log_probs, &mut rng).unwrap();
            assert_eq!(action, 2);
            assert!(logp.double_value(&[]).abs() < 1e-6);
        }
    }

    #[test]
    fn forbidden_action_is_never_sampled() {
        let mut mask = ActionMask::all_allowed(3);
        mask.forbid(0).unwrap();
        let (probs, log_probs) = distribution(&[5.0, 0.0, 0.0], &mask);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [0usize; 3];
        for _ in 0..1000 {
            let (action, _) = SamplePolicy.select(&probs, &log_probs, &mut rng).unwrap();
            seen[action] += 1;
        }
        assert_eq!(seen[0], 0);
        assert!(seen[1] > 0 && seen[2] > 0);
    }

    #[test]
    fn log_prob_matches_distribution() {
        let mask = ActionMask::all_allowed(3);
        let (probs, log_probs) = distribution(&[0.1, 0.7, -0.3], &mask);
        let mut rng = StdRng::seed_from_u64(3);
        let (action, logp) = SamplePolicy.select(&probs, &log_probs, &mut rng).unwrap();
        let expected = probs.double_value(&[0, action as i64]).ln();
        assert!((logp.double_value(&[]) - expected).abs() < 1e-5);
    }
}
