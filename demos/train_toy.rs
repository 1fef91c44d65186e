//! Trains the charger policy on a toy environment.
//!
//! The environment drains every sensor linearly and lets the charger refill
//! the one it visits; the episode ends when any sensor runs dry. Reward is one
//! per surviving step, so network lifetime equals episode length.
//!
//! ```text
//! cargo run --example train_toy [config.json]
//! ```

use std::env;

use tch::Device;
use tracing_subscriber::EnvFilter;
use wrsn_charger::rl::{
    Critic, DrlConfig, Environment, ExecContext, McActor, StepResult, Trainer,
};
use wrsn_charger::{Observation, Point, Result, TrainError, WrsnDataset, WrsnInstance};

const DRAIN_PER_STEP: f64 = 0.08;
const SPEED: f64 = 2.0;

struct DrainEnv {
    sensors: Vec<Point>,
    energy: Vec<f64>,
    position: Point,
    travel: f64,
    t: usize,
}

impl DrainEnv {
    fn new(instance: &WrsnInstance) -> Self {
        let n = instance.num_sensors();
        Self {
            sensors: instance.sensors.clone(),
            energy: vec![1.0; n],
            position: Point::origin(),
            travel: 0.0,
            t: 0,
        }
    }

    fn observation(&self) -> Observation {
        let mc = vec![self.position.x as f32, self.position.y as f32];
        let sn = self
            .sensors
            .iter()
            .zip(&self.energy)
            .map(|(s, &e)| vec![s.x as f32, s.y as f32, e as f32])
            .collect();
        Observation::new(mc, sn)
    }
}

impl Environment for DrainEnv {
    fn reset(&mut self) -> Result<Observation> {
        self.energy.iter_mut().for_each(|e| *e = 1.0);
        self.position = Point::origin();
        self.travel = 0.0;
        self.t = 0;
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<StepResult> {
        let target = *self.sensors.get(action).ok_or(TrainError::InvalidAction {
            action,
            n_actions: self.sensors.len(),
        })?;
        let leg = self.position.distance_to(&target);
        self.travel += leg;
        self.position = target;

        // travel time costs energy everywhere, then the visited sensor is full
        let drain = DRAIN_PER_STEP * (1.0 + leg / SPEED);
        self.energy.iter_mut().for_each(|e| *e -= drain);
        self.energy[action] = 1.0;
        self.t += 1;

        let done = self.energy.iter().any(|&e| e <= 0.0);
        let reward = if done { 0.0 } else { 1.0 };
        Ok(StepResult::new(self.observation(), reward, done))
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
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match env::args().nth(1) {
        Some(path) => DrlConfig::from_file(path)?,
        None => DrlConfig {
            max_step: 200,
            num_epoch: 3,
            train_size: 64,
            valid_size: 16,
            log_interval: 16,
            hidden_size: 64,
            ..DrlConfig::default()
        },
    };

    let (num_sensors, num_targets) = (8, 4);
    let train = WrsnDataset::generate(num_sensors, num_targets, config.train_size, config.seed);
    let valid = WrsnDataset::generate(num_sensors, num_targets, config.valid_size, config.seed + 1);

    let ctx = ExecContext::cuda_if_available(config.seed);
    let device: Device = ctx.device;
    let actor = McActor::new(2, 3, config.hidden_size, config.dropout, device);
    let critic = Critic::new(2, 3, config.hidden_size, device);

    let mut trainer = Trainer::new(actor, critic, config, ctx)?
        .with_save_dir(env::temp_dir().join("wrsn-charger-demo"));

    let factory = |instance: &WrsnInstance| -> Result<DrainEnv> { Ok(DrainEnv::new(instance)) };
    let summaries = trainer.train(&train, &valid, &factory)?;

    for summary in &summaries {
        if let Some(valid) = &summary.validation {
            println!("epoch {}", summary.epoch);
            print!("{valid}");
        }
    }
    Ok(())
}
