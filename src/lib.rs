//! wrsn-charger - actor-critic training of a mobile charger for wireless
//! rechargeable sensor networks.
//!
//! A policy picks which sensor the charger visits next; a critic estimates how
//! much network lifetime is left. Both are trained on-policy, one episode per
//! problem instance, with GAE advantages and an entropy bonus.

pub mod dataset;
pub mod error;
pub mod rl;
pub mod types;

#[cfg(test)]
mod testing;

pub use dataset::{WrsnDataset, WrsnInstance};
pub use error::{Result, TrainError};
pub use types::{Observation, Point};
