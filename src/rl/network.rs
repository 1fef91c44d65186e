//! Actor and critic contracts, plus default tch-rs networks.
//!
//! The training loop only relies on [`PolicyModel`] and [`ValueModel`]. The
//! [`McActor`] and [`Critic`] networks are small reference implementations of
//! those contracts; any other architecture with the same shapes works.

use tch::{nn, nn::Module, Device, Kind, Tensor};

/// Maps a batched observation pair to action logits.
pub trait PolicyModel {
    /// Returns logits of shape `[batch, n_actions]`.
    ///
    /// `mc` is `[batch, mc_dim]`, `sn` is `[batch, n_sensors, sn_dim]`. `train`
    /// toggles training-only behavior such as dropout.
    fn logits(&self, mc: &Tensor, sn: &Tensor, train: bool) -> Tensor;

    /// Variable store owning the parameters.
    fn var_store(&self) -> &nn::VarStore;

    /// Mutable access to the variable store (checkpoint loading).
    fn var_store_mut(&mut self) -> &mut nn::VarStore;
}

/// Maps a batched observation pair to a state value.
pub trait ValueModel {
    /// Returns values of shape `[batch, 1]`.
    fn value(&self, mc: &Tensor, sn: &Tensor, train: bool) -> Tensor;

    /// Variable store owning the parameters.
    fn var_store(&self) -> &nn::VarStore;

    /// Mutable access to the variable store (checkpoint loading).
    fn var_store_mut(&mut self) -> &mut nn::VarStore;
}

/// Pointer-style actor scoring each sensor against the charger state.
///
/// Architecture: charger and sensor rows are embedded to `hidden` with ReLU,
/// the charger embedding is broadcast onto every sensor row, mixed by one more
/// layer (with dropout), and projected to one logit per sensor.
pub struct McActor {
    vs: nn::VarStore,
    mc_encoder: nn::Linear,
    sn_encoder: nn::Linear,
    joint: nn::Linear,
    head: nn::Linear,
    dropout: f64,
}

impl McActor {
    /// Creates a new actor network.
    pub fn new(mc_dim: i64, sn_dim: i64, hidden: i64, dropout: f64, device: Device) -> Self {
        let vs = nn::VarStore::new(device);
        let p = &vs.root();
        let mc_encoder = nn::linear(p / "mc_encoder", mc_dim, hidden, Default::default());
        let sn_encoder = nn::linear(p / "sn_encoder", sn_dim, hidden, Default::default());
        let joint = nn::linear(p / "joint", hidden, hidden, Default::default());
        let head = nn::linear(p / "head", hidden, 1, Default::default());

        Self {
            vs,
            mc_encoder,
            sn_encoder,
            joint,
            head,
            dropout,
        }
    }
}

impl PolicyModel for McActor {
    fn logits(&self, mc: &Tensor, sn: &Tensor, train: bool) -> Tensor {
        let mc = self.mc_encoder.forward(mc).relu();
        let sn = self.sn_encoder.forward(sn).relu();
        let joint = self
            .joint
            .forward(&(sn + mc.unsqueeze(1)))
            .relu()
            .dropout(self.dropout, train);
        self.head.forward(&joint).squeeze_dim(-1)
    }

    fn var_store(&self) -> &nn::VarStore {
        &self.vs
    }

    fn var_store_mut(&mut self) -> &mut nn::VarStore {
        &mut self.vs
    }
}

/// Critic pooling sensor embeddings and combining them with the charger state.
///
/// Architecture: `[mc_emb ++ mean(sn_emb)] → hidden → 1` with ReLU activations.
pub struct Critic {
    vs: nn::VarStore,
    mc_encoder: nn::Linear,
    sn_encoder: nn::Linear,
    fc: nn::Linear,
    head: nn::Linear,
}

impl Critic {
    /// Creates a new critic network.
    pub fn new(mc_dim: i64, sn_dim: i64, hidden: i64, device: Device) -> Self {
        let vs = nn::VarStore::new(device);
        let p = &vs.root();
        let mc_encoder = nn::linear(p / "mc_encoder", mc_dim, hidden, Default::default());
        let sn_encoder = nn::linear(p / "sn_encoder", sn_dim, hidden, Default::default());
        let fc = nn::linear(p / "fc", 2 * hidden, hidden, Default::default());
        let head = nn::linear(p / "head", hidden, 1, Default::default());

        Self {
            vs,
            mc_encoder,
            sn_encoder,
            fc,
            head,
        }
    }
}

impl ValueModel for Critic {
    fn value(&self, mc: &Tensor, sn: &Tensor, _train: bool) -> Tensor {
        let mc = self.mc_encoder.forward(mc).relu();
        let sn = self
            .sn_encoder
            .forward(sn)
            .relu()
            .mean_dim([1i64].as_slice(), false, Kind::Float);
        let x = self.fc.forward(&Tensor::cat(&[mc, sn], -1)).relu();
        self.head.forward(&x)
    }

    fn var_store(&self) -> &nn::VarStore {
        &self.vs
    }

    fn var_store_mut(&mut self) -> &mut nn::VarStore {
        &mut self.vs
    }
}
