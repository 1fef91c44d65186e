//! Saving and restoring actor/critic parameters.

use std::path::Path;

use super::network::{PolicyModel, ValueModel};
use crate::error::{Result, TrainError};

/// File name of the actor parameters inside a checkpoint directory.
pub const ACTOR_FILE: &str = "actor.ot";
/// File name of the critic parameters inside a checkpoint directory.
pub const CRITIC_FILE: &str = "critic.ot";

/// Writes both models into `dir`, creating it if needed.
pub fn save_models<A, C>(dir: impl AsRef<Path>, actor: &A, critic: &C) -> Result<()>
where
    A: PolicyModel + ?Sized,
    C: ValueModel + ?Sized,
{
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| TrainError::CheckpointIo {
        path: dir.to_path_buf(),
        source,
    })?;
    actor.var_store().save(dir.join(ACTOR_FILE))?;
    critic.var_store().save(dir.join(CRITIC_FILE))?;
    Ok(())
}

/// Restores both models from `dir`. Variable names and shapes must match.
pub fn load_models<A, C>(dir: impl AsRef<Path>, actor: &mut A, critic: &mut C) -> Result<()>
where
    A: PolicyModel + ?Sized,
    C: ValueModel + ?Sized,
{
    let dir = dir.as_ref();
    actor.var_store_mut().load(dir.join(ACTOR_FILE))?;
    critic.var_store_mut().load(dir.join(CRITIC_FILE))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::network::{Critic, McActor};
    use tch::{Device, Kind, Tensor};

    #[test]
    fn save_then_load_restores_parameters() {
        let dir = std::env::temp_dir().join(format!("wrsn-ckpt-{}", std::process::id()));
        let actor = McActor::new(3, 3, 8, 0.0, Device::Cpu);
        let critic = Critic::new(3, 3, 8, Device::Cpu);
        save_models(&dir, &actor, &critic).unwrap();

        let mut actor2 = McActor::new(3, 3, 8, 0.0, Device::Cpu);
        let mut critic2 = Critic::new(3, 3, 8, Device::Cpu);
        load_models(&dir, &mut actor2, &mut critic2).unwrap();

        let mc = Tensor::randn([1, 3], (Kind::Float, Device::Cpu));
        let sn = Tensor::randn([1, 4, 3], (Kind::Float, Device::Cpu));
        let a = actor.logits(&mc, &sn, false);
        let b = actor2.logits(&mc, &sn, false);
        assert!(a.allclose(&b, 1e-6, 1e-6, false));
        let a = critic.value(&mc, &sn, false);
        let b = critic2.value(&mc, &sn, false);
        assert!(a.allclose(&b, 1e-6, 1e-6, false));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_checkpoint_is_an_error() {
        let mut actor = McActor::new(3, 3, 8, 0.0, Device::Cpu);
        let mut critic = Critic::new(3, 3, 8, Device::Cpu);
        assert!(load_models("/nonexistent/ckpt", &mut actor, &mut critic).is_err());
    }
}
