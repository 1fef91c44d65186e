//! Execution context threaded through the training loop.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tch::Device;

/// Device handle and seeded RNG for one run.
///
/// The RNG drives action sampling and dataset shuffling. Creating a context
/// also seeds libtorch, so parameter initialization is reproducible as long as
/// the models are built after the context.
#[derive(Debug)]
pub struct ExecContext {
    pub device: Device,
    pub rng: StdRng,
}

impl ExecContext {
    /// Creates a context on `device` seeded with `seed`.
    pub fn new(device: Device, seed: u64) -> Self {
        tch::manual_seed(seed as i64);
        Self {
            device,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// CPU context, handy for tests and small runs.
    pub fn cpu(seed: u64) -> Self {
        Self::new(Device::Cpu, seed)
    }

    /// Uses CUDA when available, CPU otherwise.
    pub fn cuda_if_available(seed: u64) -> Self {
        Self::new(Device::cuda_if_available(), seed)
    }
}
