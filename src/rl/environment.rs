//! Contract between the training loop and a charging simulation.
//!
//! The simulation itself (energy depletion, charger travel, normalization)
//! lives outside this crate; the training loop only needs the operations below.

use std::collections::HashMap;

use super::mask::ActionMask;
use crate::dataset::WrsnInstance;
use crate::error::Result;
use crate::types::Observation;

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Observation after the step.
    pub observation: Observation,
    /// Immediate reward.
    pub reward: f64,
    /// Whether the episode ended naturally (e.g. the network died).
    pub done: bool,
    /// Auxiliary diagnostics; ignored by the training loop.
    pub info: HashMap<String, f64>,
}

impl StepResult {
    /// Step result without diagnostics.
    pub fn new(observation: Observation, reward: f64, done: bool) -> Self {
        Self {
            observation,
            reward,
            done,
            info: HashMap::new(),
        }
    }
}

/// A single-charger WRSN episode.
///
/// # Lifecycle
///
/// 1. [`Environment::reset`] returns the initial observation.
/// 2. [`Environment::step`] is called until it reports `done` or the caller
///    stops at its horizon.
/// 3. [`Environment::close`] is called when the episode ended naturally.
/// 4. [`Environment::network_lifetime`] and [`Environment::travel_distance`]
///    are read once at the end.
pub trait Environment {
    /// Starts a new episode.
    fn reset(&mut self) -> Result<Observation>;

    /// Sends the charger to sensor `action`.
    fn step(&mut self, action: usize) -> Result<StepResult>;

    /// Releases episode resources.
    fn close(&mut self) {}

    /// Network lifetime achieved so far.
    fn network_lifetime(&self) -> f64;

    /// Total distance travelled by the charger so far.
    fn travel_distance(&self) -> f64;

    /// Size of the discrete action space.
    fn action_count(&self) -> usize;

    /// Mask for the next decision, if the environment restricts actions.
    ///
    /// `None` means the caller's mask (all-allowed by default) applies.
    fn action_mask(&self) -> Option<ActionMask> {
        None
    }
}

/// Builds one environment per training example.
pub trait EnvironmentFactory {
    type Env: Environment;

    fn create(&self, instance: &WrsnInstance) -> Result<Self::Env>;
}

impl<F, E> EnvironmentFactory for F
where
    F: Fn(&WrsnInstance) -> Result<E>,
    E: Environment,
{
    type Env = E;

    fn create(&self, instance: &WrsnInstance) -> Result<E> {
        self(instance)
    }
}
