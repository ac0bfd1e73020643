// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-face depth field.
//!
//! `d_min` is the smallest bay depth on the face and fixes the face's
//! min-perimeter offset. The field `e(u) = depth(u) - d_min` is what bays
//! extrude beyond that offset: piecewise constant over the solved bay
//! spans, never negative, and zero on at least one span.

use crate::solver::SolvedBay;
use smallvec::SmallVec;

/// Depths closer than this count as flush.
pub const DEPTH_EPSILON: f64 = 1e-6;

/// One constant-depth span of the field.
#[derive(Debug, Clone, Copy)]
pub struct DepthSpan {
    pub u0: f64,
    pub u1: f64,
    pub e: f64,
}

/// Piecewise-constant extrusion field of one face.
#[derive(Debug, Clone)]
pub struct DepthField {
    pub d_min: f64,
    spans: SmallVec<[DepthSpan; 8]>,
}

impl DepthField {
    /// Build the field from a face's solved bays (in u order).
    pub fn from_bays(bays: &[SolvedBay]) -> Self {
        let d_min = bays
            .iter()
            .map(|b| b.depth)
            .fold(f64::INFINITY, f64::min);
        let d_min = if d_min.is_finite() { d_min } else { 0.0 };

        let spans = bays
            .iter()
            .map(|b| DepthSpan {
                u0: b.u0,
                u1: b.u1(),
                e: b.depth - d_min,
            })
            .collect();

        Self { d_min, spans }
    }

    /// Evaluate `e` at parametric position `u`. Positions outside the face
    /// clamp to the nearest span.
    pub fn eval(&self, u: f64) -> f64 {
        if self.spans.is_empty() {
            return 0.0;
        }
        for span in &self.spans {
            if u < span.u1 {
                return span.e;
            }
        }
        self.spans[self.spans.len() - 1].e
    }

    /// Largest extrusion on the face.
    pub fn max_e(&self) -> f64 {
        self.spans.iter().map(|s| s.e).fold(0.0, f64::max)
    }

    /// Whether the face extrudes at all beyond its min-perimeter edge.
    pub fn is_flat(&self) -> bool {
        self.max_e() < DEPTH_EPSILON
    }

    pub fn spans(&self) -> &[DepthSpan] {
        &self.spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildfab_core::{BayShape, FaceId, FacadeLayout, TextureFlow};
    use crate::solver::solve_face;
    use buildfab_core::{Bay, WidthSpec};
    use approx::assert_relative_eq;

    fn solved(widths_depths: &[(f64, f64)]) -> Vec<SolvedBay> {
        let layout = FacadeLayout {
            bays: widths_depths
                .iter()
                .map(|&(w, d)| Bay {
                    width: WidthSpec::Fixed(w as f32),
                    repeatable: false,
                    depth_m: d as f32,
                    shape: BayShape::Square,
                    material_override: None,
                    texture_flow: TextureFlow::RestartOnNewBay,
                })
                .collect(),
            groups: Vec::new(),
            default_material: None,
        };
        let length: f64 = widths_depths.iter().map(|&(w, _)| w).sum();
        solve_face(FaceId(0), &layout, length).unwrap().bays
    }

    #[test]
    fn test_flat_face() {
        let field = DepthField::from_bays(&solved(&[(10.0, 0.0)]));
        assert_relative_eq!(field.d_min, 0.0);
        assert!(field.is_flat());
        assert_relative_eq!(field.eval(5.0), 0.0);
    }

    #[test]
    fn test_step_field() {
        let field = DepthField::from_bays(&solved(&[(2.0, 0.0), (8.0, 0.5)]));
        assert_relative_eq!(field.d_min, 0.0);
        assert_relative_eq!(field.eval(1.0), 0.0);
        assert_relative_eq!(field.eval(2.5), 0.5);
        assert_relative_eq!(field.eval(9.9), 0.5);
        assert_relative_eq!(field.max_e(), 0.5);
    }

    #[test]
    fn test_d_min_raises_baseline() {
        // All bays extruded: the shallowest becomes the baseline and its
        // span reads e = 0.
        let field = DepthField::from_bays(&solved(&[(4.0, 0.3), (6.0, 0.8)]));
        assert_relative_eq!(field.d_min, 0.3);
        assert_relative_eq!(field.eval(1.0), 0.0);
        assert_relative_eq!(field.eval(5.0), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_non_negative_everywhere() {
        let field = DepthField::from_bays(&solved(&[(2.0, 0.4), (3.0, 0.1), (5.0, 0.9)]));
        for i in 0..100 {
            let u = i as f64 * 0.1;
            assert!(field.eval(u) >= 0.0);
        }
    }
}
