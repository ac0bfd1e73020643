// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Corner resolution between adjacent faces.
//!
//! Corner `k` sits between face `k` (left) and face `(k + 1) % n` (right)
//! at their shared footprint vertex. The resolver produces the mitered
//! min-perimeter vertex and, when both faces extrude next to the corner,
//! decides which one keeps its depth and which ramps to zero inside the
//! corner zone.

use crate::frame::FaceFrame;
use crate::polygon::line_intersection;
use nalgebra::Point2;

/// Which side of a corner won the right to extrude into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CornerSide {
    Left,
    Right,
}

/// One face's view of a corner, as handed to the strategy.
#[derive(Debug, Clone, Copy)]
pub struct FaceSlice<'a> {
    pub frame: &'a FaceFrame,
    /// The face's min-perimeter offset.
    pub d_min: f64,
    /// Whether the depth field is positive on the span touching this
    /// corner.
    pub extrudes_at_corner: bool,
}

/// Resolved corner: miter vertex plus the ramp each side applies to its
/// depth field next to the corner (zero for the winner and for
/// conflict-free corners).
#[derive(Debug, Clone, Copy)]
pub struct CornerDecision {
    pub miter: Point2<f64>,
    pub winner: CornerSide,
    pub left_ramp_len: f64,
    pub right_ramp_len: f64,
}

impl CornerDecision {
    /// Whether both faces wanted the corner and one had to yield.
    pub fn had_conflict(&self) -> bool {
        self.left_ramp_len > 0.0 || self.right_ramp_len > 0.0
    }
}

/// Pluggable corner policy. Implementations must be deterministic: equal
/// inputs produce equal decisions.
pub trait CornerStrategy: Send + Sync {
    fn resolve_corner(
        &self,
        left: FaceSlice<'_>,
        right: FaceSlice<'_>,
        corner_zone_m: f64,
        miter_epsilon: f64,
    ) -> CornerDecision;

    /// Short name for logs and debug output.
    fn name(&self) -> &'static str;
}

/// Default policy: the odd-indexed face (B, D, ...) loses a conflict. At
/// the wrap corner of an odd-count loop both sides have even parity; the
/// lower face id wins there.
#[derive(Debug, Clone, Copy, Default)]
pub struct OddWins;

impl CornerStrategy for OddWins {
    fn resolve_corner(
        &self,
        left: FaceSlice<'_>,
        right: FaceSlice<'_>,
        corner_zone_m: f64,
        miter_epsilon: f64,
    ) -> CornerDecision {
        let miter = miter_corner(left.frame, right.frame, left.d_min, right.d_min, miter_epsilon);

        let conflict = left.extrudes_at_corner && right.extrudes_at_corner;
        if !conflict {
            // Whoever extrudes (if anyone) keeps the corner untouched.
            let winner = if right.extrudes_at_corner {
                CornerSide::Right
            } else {
                CornerSide::Left
            };
            return CornerDecision {
                miter,
                winner,
                left_ramp_len: 0.0,
                right_ramp_len: 0.0,
            };
        }

        let left_odd = left.frame.id.0 % 2 == 1;
        let right_odd = right.frame.id.0 % 2 == 1;
        let winner = match (left_odd, right_odd) {
            (false, true) => CornerSide::Left,
            (true, false) => CornerSide::Right,
            // Equal parity only happens at the wrap corner of an odd loop
            _ => {
                if left.frame.id.0 < right.frame.id.0 {
                    CornerSide::Left
                } else {
                    CornerSide::Right
                }
            }
        };

        let (left_ramp_len, right_ramp_len) = match winner {
            CornerSide::Left => (0.0, ramp_len(right.frame.length, corner_zone_m)),
            CornerSide::Right => (ramp_len(left.frame.length, corner_zone_m), 0.0),
        };

        CornerDecision {
            miter,
            winner,
            left_ramp_len,
            right_ramp_len,
        }
    }

    fn name(&self) -> &'static str {
        "odd-wins"
    }
}

fn ramp_len(face_length: f64, corner_zone_m: f64) -> f64 {
    corner_zone_m.min(face_length / 2.0)
}

/// Intersect the two offset face lines. Parallel lines fall back to
/// offsetting the shared vertex along the averaged normal (the offsets are
/// equal in that case).
pub fn miter_corner(
    left: &FaceFrame,
    right: &FaceFrame,
    left_d_min: f64,
    right_d_min: f64,
    miter_epsilon: f64,
) -> Point2<f64> {
    let shared = left.end;

    let left_point = left.start + left.normal * left_d_min;
    let right_point = right.start + right.normal * right_d_min;

    match line_intersection(&left_point, &left.tangent, &right_point, &right.tangent) {
        Some(p) => p,
        None => {
            let avg = (left.normal + right.normal) / 2.0;
            let avg = avg
                .try_normalize(miter_epsilon)
                .unwrap_or(left.normal);
            shared + avg * left_d_min
        }
    }
}
