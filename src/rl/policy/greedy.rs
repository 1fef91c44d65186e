//! Greedy selection used for evaluation.

use rand::RngCore;
use tch::Tensor;

use super::trait_::ActionSelector;
use super::{gather_action, host_probabilities};
use crate::error::{Result, TrainError};

/// Picks the most probable action; the lowest index wins ties.
///
/// The log-probability is `log(max_prob)`. Because the chosen action is the
/// argmax, this is the same value the categorical distribution assigns to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl ActionSelector for GreedyPolicy {
    fn select(
        &self,
        probs: &Tensor,
        _log_probs: &Tensor,
        _rng: &mut dyn RngCore,
    ) -> Result<(usize, Tensor)> {
        let host = host_probabilities(probs)?;
        let mut best: Option<(usize, f64)> = None;
        for (idx, &p) in host.iter().enumerate() {
            if best.map_or(true, |(_, best_p)| p > best_p) {
                best = Some((idx, p));
            }
        }
        let (action, _) = best.ok_or(TrainError::EmptyMask)?;
        Ok((action, gather_action(probs, action).log()))
    }

    fn name(&self) -> &str {
        "greedy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tch::Kind;

    fn select(p: &[f32]) -> (usize, f64) {
        let probs = Tensor::from_slice(p).unsqueeze(0);
        let log_probs = probs.log();
        let mut rng = StdRng::seed_from_u64(0);
        let (action, logp) = GreedyPolicy.select(&probs, &log_probs, &mut rng).unwrap();
        (action, logp.double_value(&[]))
    }

    #[test]
    fn picks_max_probability() {
        let (action, logp) = select(&[0.2, 0.5, 0.3]);
        assert_eq!(action, 1);
        assert!((logp - 0.5f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn ties_go_to_first_index() {
        let (action, _) = select(&[0.1, 0.45, 0.45]);
        assert_eq!(action, 1);
    }

    #[test]
    fn greedy_log_prob_equals_log_softmax_of_argmax() {
        let logits = Tensor::from_slice(&[0.3f32, -1.0, 2.0, 0.0]).unsqueeze(0);
        let probs = logits.softmax(-1, Kind::Float);
        let log_probs = logits.log_softmax(-1, Kind::Float);
        let mut rng = StdRng::seed_from_u64(0);
        let (action, logp) = GreedyPolicy.select(&probs, &log_probs, &mut rng).unwrap();
        assert_eq!(action, 2);
        let expected = log_probs.double_value(&[0, 2]);
        assert!((logp.double_value(&[]) - expected).abs() < 1e-5);
    }
}
