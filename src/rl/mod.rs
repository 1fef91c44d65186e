//! Actor-critic training for the mobile charger.
//!
//! The environment and the neural networks are collaborators behind the
//! [`Environment`], [`PolicyModel`] and [`ValueModel`] traits. The
//! [`training`] module owns everything in between: rollout, GAE, optimizer
//! step and the epoch loop.

pub mod checkpoint;
pub mod config;
pub mod context;
pub mod environment;
pub mod mask;
pub mod metrics;
pub mod network;
pub mod policy;
pub mod training;

pub use config::DrlConfig;
pub use context::ExecContext;
pub use environment::{Environment, EnvironmentFactory, StepResult};
pub use mask::ActionMask;
pub use metrics::{EpisodeMetrics, EpisodeReport, EpochSummary, EvaluationMetrics};
pub use network::{Critic, McActor, PolicyModel, ValueModel};
pub use policy::{ActionSelector, GreedyPolicy, SamplePolicy, SelectionMode};
pub use training::{RolloutCollector, Trainer};
