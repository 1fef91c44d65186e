//! Core value types shared by the dataset, environments and the training loop.

use serde::{Deserialize, Serialize};
use tch::{Device, Kind, Tensor};

use crate::error::{Result, TrainError};

/// A 2D position in the unit square where sensors and targets are placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Joint observation returned by an environment.
///
/// `mc_state` describes the mobile charger; `sn_state` holds one row per
/// selectable sensor, all rows of the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub mc_state: Vec<f32>,
    pub sn_state: Vec<Vec<f32>>,
}

impl Observation {
    /// Creates a new observation pair.
    pub fn new(mc_state: Vec<f32>, sn_state: Vec<Vec<f32>>) -> Self {
        Self { mc_state, sn_state }
    }

    /// Number of sensor rows.
    pub fn n_sensors(&self) -> usize {
        self.sn_state.len()
    }

    /// Width of a sensor row (0 when there are no rows).
    pub fn sn_feature_dim(&self) -> usize {
        self.sn_state.first().map_or(0, Vec::len)
    }

    /// Converts the pair into batched tensors of shape `[1, mc_dim]` and
    /// `[1, n_sensors, sn_dim]` on `device`.
    pub fn to_batched_tensors(&self, device: Device) -> Result<(Tensor, Tensor)> {
        let n = self.n_sensors();
        let width = self.sn_feature_dim();
        if let Some(row) = self.sn_state.iter().find(|row| row.len() != width) {
            return Err(TrainError::ShapeMismatch {
                what: "sensor state row",
                expected: width,
                actual: row.len(),
            });
        }

        let mc = Tensor::from_slice(&self.mc_state)
            .to_kind(Kind::Float)
            .to_device(device)
            .unsqueeze(0);
        let flat: Vec<f32> = self.sn_state.iter().flatten().copied().collect();
        let sn = Tensor::from_slice(&flat)
            .to_kind(Kind::Float)
            .to_device(device)
            .reshape([1, n as i64, width as i64]);
        Ok((mc, sn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::origin();
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn batched_tensor_shapes() {
        let obs = Observation::new(vec![0.1, 0.2, 0.3], vec![vec![1.0, 2.0]; 4]);
        let (mc, sn) = obs.to_batched_tensors(Device::Cpu).unwrap();
        assert_eq!(mc.size(), &[1, 3]);
        assert_eq!(sn.size(), &[1, 4, 2]);
    }

    #[test]
    fn ragged_sensor_rows_are_rejected() {
        let obs = Observation::new(vec![0.0], vec![vec![1.0, 2.0], vec![1.0]]);
        let err = obs.to_batched_tensors(Device::Cpu).unwrap_err();
        assert!(matches!(err, TrainError::ShapeMismatch { .. }));
    }
}
