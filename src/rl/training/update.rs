//! Optimizer step for the actor and the critic.
//!
//! Each model has its own Adam optimizer over its own variable store; the two
//! backward passes never share parameters.

use tch::{nn, nn::OptimizerConfig, Kind, Tensor};

use super::gae::EpisodeLosses;
use crate::error::Result;
use crate::rl::config::DrlConfig;
use crate::rl::network::{PolicyModel, ValueModel};

/// Scalars reported after one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateStats {
    /// Summed policy loss that was backed up.
    pub policy_loss: f64,
    /// Summed value loss that was backed up.
    pub value_loss: f64,
    /// Actor gradient norm before clipping.
    pub actor_grad_norm: f64,
    /// Critic gradient norm before clipping.
    pub critic_grad_norm: f64,
}

/// Pair of independent Adam optimizers with gradient-norm clipping.
pub struct ActorCriticOptimizer {
    actor_opt: nn::Optimizer,
    critic_opt: nn::Optimizer,
    max_grad_norm: f64,
}

impl ActorCriticOptimizer {
    /// Creates optimizers over the models' variable stores.
    pub fn new<A, C>(actor: &A, critic: &C, config: &DrlConfig) -> Result<Self>
    where
        A: PolicyModel + ?Sized,
        C: ValueModel + ?Sized,
    {
        let actor_opt = nn::Adam::default().build(actor.var_store(), config.actor_lr)?;
        let critic_opt = nn::Adam::default().build(critic.var_store(), config.critic_lr)?;
        Ok(Self {
            actor_opt,
            critic_opt,
            max_grad_norm: config.max_grad_norm,
        })
    }

    /// Backs up `sum(policy)` into the actor and `sum(value)` into the critic,
    /// clips each gradient to `max_grad_norm` and applies one Adam step each.
    ///
    /// Non-finite losses are not caught; they reach the parameters.
    pub fn step<A, C>(&mut self, actor: &A, critic: &C, losses: &EpisodeLosses) -> UpdateStats
    where
        A: PolicyModel + ?Sized,
        C: ValueModel + ?Sized,
    {
        let policy_loss = losses.policy.sum(Kind::Float);
        let value_loss = losses.value.sum(Kind::Float);

        let actor_grad_norm = backward_clip_step(
            &mut self.actor_opt,
            actor.var_store(),
            &policy_loss,
            self.max_grad_norm,
        );
        let critic_grad_norm = backward_clip_step(
            &mut self.critic_opt,
            critic.var_store(),
            &value_loss,
            self.max_grad_norm,
        );

        UpdateStats {
            policy_loss: policy_loss.double_value(&[]),
            value_loss: value_loss.double_value(&[]),
            actor_grad_norm,
            critic_grad_norm,
        }
    }
}

/// zero_grad → backward → clip → step. Returns the pre-clip gradient norm.
fn backward_clip_step(
    opt: &mut nn::Optimizer,
    vs: &nn::VarStore,
    loss: &Tensor,
    max_grad_norm: f64,
) -> f64 {
    opt.zero_grad();
    loss.backward();
    let norm = grad_norm(vs);
    opt.clip_grad_norm(max_grad_norm);
    opt.step();
    norm
}

/// L2 norm of all trainable gradients in `vs`; variables without a gradient
/// are skipped.
pub fn grad_norm(vs: &nn::VarStore) -> f64 {
    vs.trainable_variables()
        .iter()
        .map(|var| var.grad())
        .filter(|grad| grad.defined())
        .map(|grad| grad.pow_tensor_scalar(2).sum(Kind::Double).double_value(&[]))
        .sum::<f64>()
        .sqrt()
}
