//! Action selection over the actor's output distribution.

pub mod greedy;
pub mod sample;
pub mod trait_;

pub use greedy::GreedyPolicy;
pub use sample::SamplePolicy;
pub use trait_::{ActionSelector, SelectionMode};

use tch::{Device, Kind, Tensor};

use crate::error::Result;

/// Copies a `[1, n]` probability row to host memory.
pub(crate) fn host_probabilities(probs: &Tensor) -> Result<Vec<f64>> {
    let flat = probs
        .detach()
        .flatten(0, -1)
        .to_kind(Kind::Double)
        .to_device(Device::Cpu);
    Ok(Vec::<f64>::try_from(&flat)?)
}

/// Picks `log_probs[0, action]` as a scalar tensor, keeping the graph.
pub(crate) fn gather_action(log_probs: &Tensor, action: usize) -> Tensor {
    let index = Tensor::from_slice(&[action as i64])
        .to_device(log_probs.device())
        .unsqueeze(0);
    log_probs.gather(-1, &index, false).squeeze()
}
