//! Problem instances for training and validation.
//!
//! An instance is just a placement of sensors and targets in the unit square.
//! How those placements turn into an energy simulation is the environment's
//! business (see [`EnvironmentFactory`](crate::rl::EnvironmentFactory)).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Sensor and target placement for one training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrsnInstance {
    pub sensors: Vec<Point>,
    pub targets: Vec<Point>,
}

impl WrsnInstance {
    /// Creates an instance from explicit placements.
    pub fn new(sensors: Vec<Point>, targets: Vec<Point>) -> Self {
        Self { sensors, targets }
    }

    /// Places `num_sensors` sensors and `num_targets` targets uniformly at random.
    pub fn random<R: Rng + ?Sized>(num_sensors: usize, num_targets: usize, rng: &mut R) -> Self {
        let mut point = || Point::new(rng.gen::<f64>(), rng.gen::<f64>());
        let sensors = (0..num_sensors).map(|_| point()).collect();
        let targets = (0..num_targets).map(|_| point()).collect();
        Self { sensors, targets }
    }

    pub fn num_sensors(&self) -> usize {
        self.sensors.len()
    }

    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }
}

/// A fixed, reproducible collection of instances.
#[derive(Debug, Clone, Default)]
pub struct WrsnDataset {
    instances: Vec<WrsnInstance>,
}

impl WrsnDataset {
    /// Generates `size` instances from `seed`.
    ///
    /// The same arguments always produce the same dataset.
    pub fn generate(num_sensors: usize, num_targets: usize, size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let instances = (0..size)
            .map(|_| WrsnInstance::random(num_sensors, num_targets, &mut rng))
            .collect();
        Self { instances }
    }

    /// Wraps already-built instances.
    pub fn from_instances(instances: Vec<WrsnInstance>) -> Self {
        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&WrsnInstance> {
        self.instances.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WrsnInstance> {
        self.instances.iter()
    }
}
