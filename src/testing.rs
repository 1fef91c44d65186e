//! Small deterministic environments shared by the unit tests.

use std::collections::HashMap;

use crate::dataset::WrsnInstance;
use crate::error::{Result, TrainError};
use crate::rl::environment::{Environment, StepResult};
use crate::rl::mask::ActionMask;
use crate::types::{Observation, Point};

/// Charger hopping between sensors; unit reward per step, done at `horizon`.
#[derive(Debug, Clone)]
pub struct ToyEnv {
    sensors: Vec<Point>,
    horizon: usize,
    position: Point,
    t: usize,
    travel: f64,
    forced: HashMap<usize, usize>,
    pub closed: bool,
    pub visits: Vec<usize>,
    pub history: Vec<usize>,
}

impl ToyEnv {
    pub fn new(n_sensors: usize, horizon: usize) -> Self {
        let sensors = (0..n_sensors)
            .map(|i| Point::new((i + 1) as f64 / (n_sensors + 1) as f64, 0.5))
            .collect();
        Self::with_sensors(sensors, horizon)
    }

    pub fn from_instance(instance: &WrsnInstance, horizon: usize) -> Self {
        Self::with_sensors(instance.sensors.clone(), horizon)
    }

    fn with_sensors(sensors: Vec<Point>, horizon: usize) -> Self {
        let n = sensors.len();
        Self {
            sensors,
            horizon,
            position: Point::origin(),
            t: 0,
            travel: 0.0,
            forced: HashMap::new(),
            closed: false,
            visits: vec![0; n],
            history: Vec::new(),
        }
    }

    /// Reports a mask allowing only `action` on step `step` (0-based).
    pub fn force_at(mut self, step: usize, action: usize) -> Self {
        self.forced.insert(step, action);
        self
    }

    /// `(mc_dim, sn_dim)` of the observations.
    pub fn feature_dims(&self) -> (i64, i64) {
        (3, 3)
    }

    fn observation(&self) -> Observation {
        let progress = self.t as f32 / self.horizon.max(1) as f32;
        let mc = vec![self.position.x as f32, self.position.y as f32, progress];
        let sn = self
            .sensors
            .iter()
            .zip(&self.visits)
            .map(|(s, &v)| vec![s.x as f32, s.y as f32, v as f32 / self.horizon.max(1) as f32])
            .collect();
        Observation::new(mc, sn)
    }
}

impl Environment for ToyEnv {
    fn reset(&mut self) -> Result<Observation> {
        self.position = Point::origin();
        self.t = 0;
        self.travel = 0.0;
        self.closed = false;
        self.visits.iter_mut().for_each(|v| *v = 0);
        self.history.clear();
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<StepResult> {
        let target = *self.sensors.get(action).ok_or(TrainError::InvalidAction {
            action,
            n_actions: self.sensors.len(),
        })?;
        self.travel += self.position.distance_to(&target);
        self.position = target;
        self.visits[action] += 1;
        self.history.push(action);
        self.t += 1;
        Ok(StepResult::new(self.observation(), 1.0, self.t >= self.horizon))
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn network_lifetime(&self) -> f64 {
        self.t as f64
    }

    fn travel_distance(&self) -> f64 {
        self.travel
    }

    fn action_count(&self) -> usize {
        self.sensors.len()
    }

    fn action_mask(&self) -> Option<ActionMask> {
        let action = *self.forced.get(&self.t)?;
        ActionMask::only(self.sensors.len(), action).ok()
    }
}

/// Environment that never terminates and always pays zero.
#[derive(Debug, Clone)]
pub struct ConstantEnv {
    n_actions: usize,
    pub closed: bool,
}

impl ConstantEnv {
    pub fn new(n_actions: usize) -> Self {
        Self {
            n_actions,
            closed: false,
        }
    }

    pub fn feature_dims(&self) -> (i64, i64) {
        (2, 2)
    }

    fn observation(&self) -> Observation {
        Observation::new(vec![0.5, 0.5], vec![vec![0.1, 0.2]; self.n_actions])
    }
}

impl Environment for ConstantEnv {
    fn reset(&mut self) -> Result<Observation> {
        Ok(self.observation())
    }

    fn step(&mut self, _action: usize) -> Result<StepResult> {
        Ok(StepResult::new(self.observation(), 0.0, false))
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn network_lifetime(&self) -> f64 {
        0.0
    }

    fn travel_distance(&self) -> f64 {
        0.0
    }

    fn action_count(&self) -> usize {
        self.n_actions
    }
}
