//! Training loop driver: epochs × dataset instances.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use super::gae::episode_losses;
use super::rollout::RolloutCollector;
use super::update::{ActorCriticOptimizer, UpdateStats};
use crate::dataset::{WrsnDataset, WrsnInstance};
use crate::error::Result;
use crate::rl::checkpoint;
use crate::rl::config::DrlConfig;
use crate::rl::context::ExecContext;
use crate::rl::environment::{Environment, EnvironmentFactory};
use crate::rl::mask::ActionMask;
use crate::rl::metrics::{
    EpisodeReport, EpochSummary, EvaluationMetrics, RunningStats, WindowSummary,
};
use crate::rl::network::{PolicyModel, ValueModel};
use crate::rl::policy::SelectionMode;

/// On-policy actor-critic trainer.
///
/// Every training example is one episode: collect a stochastic rollout,
/// compute GAE losses, apply one update to each model. Single-threaded; the
/// models are only mutated by their own optimizer.
pub struct Trainer<A, C> {
    actor: A,
    critic: C,
    optimizer: ActorCriticOptimizer,
    config: DrlConfig,
    ctx: ExecContext,
    mask: Option<ActionMask>,
    save_dir: Option<PathBuf>,
}

impl<A, C> Trainer<A, C>
where
    A: PolicyModel,
    C: ValueModel,
{
    /// Creates a trainer; the optimizers are built over the models' current
    /// variable stores.
    pub fn new(actor: A, critic: C, config: DrlConfig, ctx: ExecContext) -> Result<Self> {
        config.validate()?;
        let optimizer = ActorCriticOptimizer::new(&actor, &critic, &config)?;
        Ok(Self {
            actor,
            critic,
            optimizer,
            config,
            ctx,
            mask: None,
            save_dir: None,
        })
    }

    /// Saves both models after every epoch under `dir`.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    /// Restricts actions in every rollout (all allowed by default).
    pub fn with_mask(mut self, mask: ActionMask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Restores both models from a checkpoint directory.
    pub fn load_checkpoint(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        checkpoint::load_models(dir, &mut self.actor, &mut self.critic)
    }

    pub fn actor(&self) -> &A {
        &self.actor
    }

    pub fn critic(&self) -> &C {
        &self.critic
    }

    pub fn config(&self) -> &DrlConfig {
        &self.config
    }

    /// Gives the models back, consuming the trainer.
    pub fn into_models(self) -> (A, C) {
        (self.actor, self.critic)
    }

    fn collector(&self, mode: SelectionMode) -> RolloutCollector {
        let collector = RolloutCollector::new(self.config.max_step, mode);
        match &self.mask {
            Some(mask) => collector.with_mask(mask.clone()),
            None => collector,
        }
    }

    /// Runs `num_epoch` epochs and returns one summary per epoch.
    pub fn train<F>(
        &mut self,
        train_data: &WrsnDataset,
        valid_data: &WrsnDataset,
        factory: &F,
    ) -> Result<Vec<EpochSummary>>
    where
        F: EnvironmentFactory,
    {
        info!(
            epochs = self.config.num_epoch,
            train_size = train_data.len(),
            valid_size = valid_data.len(),
            "starting training"
        );
        (0..self.config.num_epoch)
            .map(|epoch| self.train_epoch(epoch, train_data, valid_data, factory))
            .collect()
    }

    /// One pass over `train_data` in shuffled order, followed by validation
    /// and checkpointing.
    pub fn train_epoch<F>(
        &mut self,
        epoch: usize,
        train_data: &WrsnDataset,
        valid_data: &WrsnDataset,
        factory: &F,
    ) -> Result<EpochSummary>
    where
        F: EnvironmentFactory,
    {
        let interval = self.config.log_interval;
        let epoch_start = Instant::now();
        let mut window_start = epoch_start;
        let mut window_times = Vec::new();
        let mut stats = RunningStats::new();

        let mut order: Vec<&WrsnInstance> = train_data.iter().collect();
        order.shuffle(&mut self.ctx.rng);

        for (idx, instance) in order.iter().enumerate() {
            let mut env = factory.create(instance)?;
            let report = self.train_episode(&mut env)?;
            stats.record(&report);

            if (idx + 1) % interval == 0 {
                let took = window_start.elapsed();
                window_start = Instant::now();
                window_times.push(took);
                log_window(epoch, idx, order.len(), &stats.window(interval), took);
            }
        }

        let validation = if valid_data.is_empty() {
            None
        } else {
            Some(self.evaluate(valid_data, factory)?)
        };

        let summary = EpochSummary {
            epoch,
            train: stats.overall(),
            elapsed: epoch_start.elapsed(),
            mean_window_time: mean_duration(&window_times),
            validation,
        };
        log_epoch(&summary);

        if let Some(dir) = &self.save_dir {
            checkpoint::save_models(dir.join(format!("epoch_{epoch}")), &self.actor, &self.critic)?;
            checkpoint::save_models(dir.join("latest"), &self.actor, &self.critic)?;
        }

        Ok(summary)
    }

    /// Trains on one episode of `env`: reset, stochastic rollout, GAE, update.
    pub fn train_episode<E>(&mut self, env: &mut E) -> Result<EpisodeReport>
    where
        E: Environment + ?Sized,
    {
        let initial = env.reset()?;
        let rollout = self.collector(SelectionMode::Stochastic).collect(
            env,
            initial,
            &self.actor,
            &self.critic,
            &mut self.ctx,
        )?;

        let losses = episode_losses(
            &rollout.trajectory,
            self.config.gamma,
            self.config.gae_lambda,
            self.config.entropy_coef,
        )?;
        let update = self.optimizer.step(&self.actor, &self.critic, &losses);
        warn_if_degenerate(&update);

        let report = EpisodeReport {
            policy_loss: losses.mean_policy_loss(),
            value_loss: losses.mean_value_loss(),
            entropy: rollout.trajectory.mean_entropy(),
            metrics: rollout.metrics,
        };
        debug!(
            steps = report.metrics.steps,
            done = rollout.done,
            policy_loss = report.policy_loss,
            value_loss = report.value_loss,
            actor_grad_norm = update.actor_grad_norm,
            critic_grad_norm = update.critic_grad_norm,
            "episode trained"
        );
        Ok(report)
    }

    /// Greedy evaluation over `data`: no gradient graph, no updates.
    pub fn evaluate<F>(&mut self, data: &WrsnDataset, factory: &F) -> Result<EvaluationMetrics>
    where
        F: EnvironmentFactory,
    {
        let collector = self.collector(SelectionMode::Greedy);
        let mut episodes = Vec::with_capacity(data.len());
        for instance in data.iter() {
            let mut env = factory.create(instance)?;
            let initial = env.reset()?;
            let rollout = tch::no_grad(|| {
                collector.collect(&mut env, initial, &self.actor, &self.critic, &mut self.ctx)
            })?;
            episodes.push(rollout.metrics);
        }
        Ok(EvaluationMetrics::from_episodes(&episodes))
    }
}

fn log_window(epoch: usize, idx: usize, total: usize, window: &WindowSummary, took: Duration) {
    info!(
        epoch,
        batch = idx,
        total,
        mean_policy_loss = window.mean_policy_loss,
        mean_net_lifetime = window.mean_network_lifetime,
        mean_mc_travel_dist = window.mean_travel_distance,
        mean_entropy = window.mean_entropy,
        took_s = took.as_secs_f64(),
        "training progress"
    );
}

fn log_epoch(summary: &EpochSummary) {
    info!(
        epoch = summary.epoch,
        mean_policy_loss = summary.train.mean_policy_loss,
        mean_net_lifetime = summary.train.mean_network_lifetime,
        mean_mc_travel_dist = summary.train.mean_travel_distance,
        mean_entropy = summary.train.mean_entropy,
        took_s = summary.elapsed.as_secs_f64(),
        window_s = summary.mean_window_time.as_secs_f64(),
        "epoch finished"
    );
    if let Some(valid) = &summary.validation {
        info!(
            epoch = summary.epoch,
            episodes = valid.n_episodes,
            mean_net_lifetime = valid.mean_network_lifetime,
            mean_mc_travel_dist = valid.mean_travel_distance,
            "validation"
        );
    }
}

fn warn_if_degenerate(update: &UpdateStats) {
    if !update.policy_loss.is_finite() || !update.value_loss.is_finite() {
        warn!(
            policy_loss = update.policy_loss,
            value_loss = update.value_loss,
            "non-finite loss reached the optimizers"
        );
    }
}

fn mean_duration(times: &[Duration]) -> Duration {
    if times.is_empty() {
        Duration::ZERO
    } else {
        times.iter().sum::<Duration>() / times.len() as u32
    }
}
