// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Min-perimeter builder.
//!
//! The stable core outline: each face line pushed outward by its `d_min`
//! along the outward normal, mitered at the resolved corners. The roof and
//! every top cap baseline derive from this polygon; downstream stages must
//! never mutate it.

use crate::corner::CornerDecision;
use crate::error::{Error, Result};
use crate::frame::FaceFrame;
use crate::polygon::{is_simple, LENGTH_EPSILON};
use nalgebra::Point2;

/// Closed core polygon, one vertex per footprint corner, in loop order.
/// `points[k]` is the mitered corner between face `k - 1` and face `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct MinPerimeter {
    pub points: Vec<Point2<f64>>,
    /// Per-face offset, kept for setback comparison between layers.
    pub d_min: Vec<f64>,
}

impl MinPerimeter {
    /// Vertices bounding face `i`'s edge: the corner before the face and
    /// the corner after it.
    pub fn edge(&self, face: usize) -> (Point2<f64>, Point2<f64>) {
        let n = self.points.len();
        (self.points[face], self.points[(face + 1) % n])
    }

    /// Whether two perimeters coincide within epsilon.
    pub fn coincides_with(&self, other: &MinPerimeter) -> bool {
        self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| (a - b).norm() < LENGTH_EPSILON)
    }
}

/// Assemble the min-perimeter from per-corner decisions.
///
/// `decisions[k]` is the corner between face `k` and face `k + 1`, so the
/// polygon vertex at footprint corner `k` is `decisions[k - 1].miter`.
pub fn build_min_perimeter(
    frames: &[FaceFrame],
    d_min: &[f64],
    decisions: &[CornerDecision],
) -> Result<MinPerimeter> {
    let n = frames.len();
    debug_assert_eq!(decisions.len(), n);

    let mut points = vec![Point2::origin(); n];
    for (k, decision) in decisions.iter().enumerate() {
        points[(k + 1) % n] = decision.miter;
    }

    // Offsets too large for the local geometry collapse an edge or fold
    // the polygon; report the first corner that breaks.
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let along = (b - a).dot(&frames[i].tangent);
        if along < LENGTH_EPSILON {
            return Err(Error::InvalidMinPerimeter { corner: i });
        }
    }

    if !is_simple(&points) {
        let corner = first_folding_corner(&points);
        return Err(Error::InvalidMinPerimeter { corner });
    }

    Ok(MinPerimeter {
        points,
        d_min: d_min.to_vec(),
    })
}

fn first_folding_corner(points: &[Point2<f64>]) -> usize {
    let n = points.len();
    for i in 0..n {
        let a0 = &points[i];
        let a1 = &points[(i + 1) % n];
        for j in (i + 1)..n {
            if j == i || (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            if crate::polygon::segments_properly_intersect(
                a0,
                a1,
                &points[j],
                &points[(j + 1) % n],
            ) {
                return (i + 1) % n;
            }
        }
    }
    0
}
