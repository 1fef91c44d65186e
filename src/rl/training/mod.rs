//! On-policy actor-critic training.
//!
//! Provides the trajectory buffer, rollout collection, GAE losses, the
//! two-optimizer update and the epoch driver.

pub mod buffer;
pub mod gae;
pub mod rollout;
pub mod trainer;
pub mod update;

pub use buffer::Trajectory;
pub use gae::{compute_gae, episode_losses, EpisodeLosses};
pub use rollout::{Rollout, RolloutCollector};
pub use trainer::Trainer;
pub use update::{ActorCriticOptimizer, UpdateStats};
