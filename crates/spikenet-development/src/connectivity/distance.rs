// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Distances from one post cell to every cell in the network

use ndarray::{Array1, Zip};
use spikenet_neural::Gid;

use crate::layout::SpatialLayout;

/// How distances are measured
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Side length of the square model extent
    pub model_size: f64,
    /// Wrap x and y at the model boundary
    pub toroidal: bool,
}

/// Distances from every candidate to one post cell
#[derive(Debug, Clone)]
pub struct CandidateDistances {
    /// (x, y) distance, stored on the connection and used for probability
    pub planar: Array1<f64>,
    /// (x, y, z) distance, used for the delay
    pub spatial: Array1<f64>,
}

/// Squared per-axis separation; with wrapping, the shorter of the direct
/// and the wrap-around path
fn axis_squared(axis: &Array1<f64>, origin: f64, extent: f64, wrap: bool) -> Array1<f64> {
    axis.mapv(|a| {
        let direct = (a - origin).abs();
        let d = if wrap { direct.min(extent - direct) } else { direct };
        d * d
    })
}

pub fn distances_to(layout: &SpatialLayout, post: Gid, geometry: &Geometry) -> CandidateDistances {
    let origin = layout.position(post);
    let xx = axis_squared(layout.x(), origin.x, geometry.model_size, geometry.toroidal);
    let yy = axis_squared(layout.y(), origin.y, geometry.model_size, geometry.toroidal);
    // depth never wraps
    let zz = axis_squared(layout.z(), origin.z, 0.0, false);

    let planar_sq = &xx + &yy;
    let spatial = Zip::from(&planar_sq)
        .and(&zz)
        .map_collect(|&p, &z| (p + z).sqrt());

    CandidateDistances {
        planar: planar_sq.mapv_into(f64::sqrt),
        spatial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_takes_shorter_path() {
        let axis = Array1::from_vec(vec![10.0, 990.0, 500.0]);
        let wrapped = axis_squared(&axis, 0.0, 1000.0, true);
        let direct = axis_squared(&axis, 0.0, 1000.0, false);

        assert_eq!(wrapped[1], 100.0);
        assert_eq!(direct[1], 990.0 * 990.0);
        assert_eq!(wrapped[2], direct[2]);
    }
}
