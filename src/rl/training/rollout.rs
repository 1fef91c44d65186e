//! Episode rollout: drives one environment to termination or truncation.

use tch::{Kind, Tensor};

use super::buffer::Trajectory;
use crate::error::{Result, TrainError};
use crate::rl::context::ExecContext;
use crate::rl::environment::Environment;
use crate::rl::mask::ActionMask;
use crate::rl::metrics::EpisodeMetrics;
use crate::rl::network::{PolicyModel, ValueModel};
use crate::rl::policy::{ActionSelector, SelectionMode};
use crate::types::Observation;

/// Output of one collected episode.
#[derive(Debug)]
pub struct Rollout {
    /// Bootstrapped trajectory, ready for loss computation.
    pub trajectory: Trajectory,
    /// True if the environment ended the episode, false if it was truncated.
    pub done: bool,
    /// Lifetime and travel distance read at the end of the episode.
    pub metrics: EpisodeMetrics,
}

/// Collects single-environment, batch-size-one rollouts.
#[derive(Debug, Clone)]
pub struct RolloutCollector {
    max_step: usize,
    mode: SelectionMode,
    mask: Option<ActionMask>,
}

impl RolloutCollector {
    /// Creates a collector that stops after `max_step` steps.
    pub fn new(max_step: usize, mode: SelectionMode) -> Self {
        Self {
            max_step,
            mode,
            mask: None,
        }
    }

    /// Restricts actions for the whole episode.
    ///
    /// A mask reported by [`Environment::action_mask`] takes precedence for the
    /// step it is reported on.
    pub fn with_mask(mut self, mask: ActionMask) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Runs one episode starting from `initial`, the observation returned by
    /// the environment's `reset`.
    ///
    /// The environment is closed if it reports `done`; a truncated episode
    /// is left open and bootstrapped with the critic's (detached) value of the
    /// last observation.
    pub fn collect<E, A, C>(
        &self,
        env: &mut E,
        initial: Observation,
        actor: &A,
        critic: &C,
        ctx: &mut ExecContext,
    ) -> Result<Rollout>
    where
        E: Environment + ?Sized,
        A: PolicyModel + ?Sized,
        C: ValueModel + ?Sized,
    {
        let train = self.mode.is_training();
        let n_actions = env.action_count();
        let mut trajectory = Trajectory::new();
        let mut observation = initial;
        let mut done = false;

        for _ in 0..self.max_step {
            let (mc, sn) = observation.to_batched_tensors(ctx.device)?;

            let logits = actor.logits(&mc, &sn, train);
            let width = logits.size().last().copied().unwrap_or(0) as usize;
            if width != n_actions {
                return Err(TrainError::ShapeMismatch {
                    what: "actor logits",
                    expected: n_actions,
                    actual: width,
                });
            }

            let mask = self.step_mask(env, n_actions)?;
            let logits = logits + mask.log_bias(ctx.device)?;
            let probs = logits.softmax(-1, Kind::Float);
            let log_probs = logits.log_softmax(-1, Kind::Float);
            let entropy = categorical_entropy(&probs, &log_probs);

            let value = critic.value(&mc, &sn, train).squeeze();

            let (action, log_prob) = self.mode.select(&probs, &log_probs, &mut ctx.rng)?;
            if action >= n_actions {
                return Err(TrainError::InvalidAction { action, n_actions });
            }

            let step = env.step(action)?;
            trajectory.push(value, log_prob, step.reward, entropy)?;
            observation = step.observation;

            if step.done {
                env.close();
                done = true;
                break;
            }
        }

        let bootstrap = if done {
            Tensor::zeros([1], (Kind::Float, ctx.device)).squeeze()
        } else {
            let (mc, sn) = observation.to_batched_tensors(ctx.device)?;
            tch::no_grad(|| critic.value(&mc, &sn, train))
                .detach()
                .squeeze()
        };
        trajectory.bootstrap(bootstrap)?;

        let metrics = EpisodeMetrics {
            network_lifetime: env.network_lifetime(),
            travel_distance: env.travel_distance(),
            steps: trajectory.len(),
        };
        tracing::trace!(
            steps = metrics.steps,
            done,
            mode = self.mode.name(),
            "rollout finished"
        );

        Ok(Rollout {
            trajectory,
            done,
            metrics,
        })
    }

    fn step_mask<E: Environment + ?Sized>(&self, env: &E, n_actions: usize) -> Result<ActionMask> {
        let mask = env
            .action_mask()
            .or_else(|| self.mask.clone())
            .unwrap_or_else(|| ActionMask::all_allowed(n_actions));
        if mask.len() != n_actions {
            return Err(TrainError::ShapeMismatch {
                what: "action mask",
                expected: n_actions,
                actual: mask.len(),
            });
        }
        Ok(mask)
    }
}

/// Closed-form Shannon entropy `-Σ p log p` of a `[1, n]` distribution, as a
/// scalar tensor. Masked actions (`p = 0`, `log p = -inf`) contribute zero.
pub fn categorical_entropy(probs: &Tensor, log_probs: &Tensor) -> Tensor {
    let safe_log_probs = log_probs.masked_fill(&probs.eq(0.0), 0.0);
    -(probs * safe_log_probs)
        .sum_dim_intlist([-1].as_slice(), false, Kind::Float)
        .squeeze()
}
