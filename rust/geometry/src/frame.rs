// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face-frame builder.
//!
//! Derives the local `(tangent, outward_normal)` basis for every footprint
//! edge. Face ids are edge indices on the normalized (counter-clockwise)
//! loop; a clockwise authored loop is normalized first and reported so the
//! build can surface a warning.

use crate::error::{Error, Result};
use crate::polygon::{ensure_ccw, is_simple, LENGTH_EPSILON};
use buildfab_core::FaceId;
use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;

/// Local frame of one footprint edge.
#[derive(Debug, Clone)]
pub struct FaceFrame {
    pub id: FaceId,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    /// Unit vector from start to end.
    pub tangent: Vector2<f64>,
    /// Unit outward normal: tangent rotated -90 degrees (CCW loop).
    pub normal: Vector2<f64>,
    pub length: f64,
}

impl FaceFrame {
    /// Ground-plane point at parametric position `u` along the face.
    pub fn point_at(&self, u: f64) -> Point2<f64> {
        self.start + self.tangent * u
    }
}

/// Result of frame building: frames in loop order plus the normalized loop
/// and whether it had to be reversed.
#[derive(Debug)]
pub struct FrameSet {
    pub frames: SmallVec<[FaceFrame; 8]>,
    pub loop_points: Vec<Point2<f64>>,
    pub reversed: bool,
}

impl FrameSet {
    pub fn face_count(&self) -> usize {
        self.frames.len()
    }
}

/// Build face frames from an authored footprint loop.
///
/// Rejects loops with fewer than 3 distinct points, degenerate edges, or
/// self-intersections. A trailing point duplicating the first is tolerated
/// and dropped.
pub fn build_frames(footprint: &[[f64; 2]]) -> Result<FrameSet> {
    let mut points: Vec<Point2<f64>> = footprint
        .iter()
        .map(|p| Point2::new(p[0], p[1]))
        .collect();

    // Drop an explicit closing point
    if points.len() > 3 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (last - first).norm() < LENGTH_EPSILON {
            points.pop();
        }
    }

    if points.len() < 3 {
        return Err(Error::InvalidFootprint(format!(
            "need at least 3 points, got {}",
            points.len()
        )));
    }

    for (i, pair) in points.windows(2).enumerate() {
        if (pair[1] - pair[0]).norm() < LENGTH_EPSILON {
            return Err(Error::InvalidFootprint(format!(
                "degenerate edge at point {i}"
            )));
        }
    }
    let n = points.len();
    if (points[0] - points[n - 1]).norm() < LENGTH_EPSILON {
        return Err(Error::InvalidFootprint(format!(
            "degenerate closing edge at point {}",
            n - 1
        )));
    }

    if !is_simple(&points) {
        return Err(Error::InvalidFootprint(
            "loop self-intersects".to_string(),
        ));
    }

    let (loop_points, reversed) = ensure_ccw(&points);

    let mut frames = SmallVec::with_capacity(n);
    for i in 0..n {
        let start = loop_points[i];
        let end = loop_points[(i + 1) % n];
        let edge = end - start;
        let length = edge.norm();
        let tangent = edge / length;
        // -90 degree rotation: outward for a CCW loop
        let normal = Vector2::new(tangent.y, -tangent.x);
        frames.push(FaceFrame {
            id: FaceId(i as u16),
            start,
            end,
            tangent,
            normal,
            length,
        });
    }

    Ok(FrameSet {
        frames,
        loop_points,
        reversed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::centroid;
    use approx::assert_relative_eq;

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];

    #[test]
    fn test_square_frames() {
        let set = build_frames(&SQUARE).unwrap();
        assert_eq!(set.face_count(), 4);
        assert!(!set.reversed);

        let a = &set.frames[0];
        assert_relative_eq!(a.tangent.x, 1.0);
        assert_relative_eq!(a.tangent.y, 0.0);
        assert_relative_eq!(a.normal.x, 0.0);
        assert_relative_eq!(a.normal.y, -1.0);
        assert_relative_eq!(a.length, 10.0);
    }

    #[test]
    fn test_normals_point_outward() {
        let set = build_frames(&SQUARE).unwrap();
        let c = centroid(&set.loop_points);
        for frame in &set.frames {
            let mid = frame.point_at(frame.length / 2.0);
            // n . (C - M) < 0: the centroid is behind the outward normal
            assert!(frame.normal.dot(&(c - mid)) < 0.0, "face {}", frame.id);
        }
    }

    #[test]
    fn test_cw_loop_normalized() {
        let mut cw = SQUARE.to_vec();
        cw.reverse();
        let set = build_frames(&cw).unwrap();
        assert!(set.reversed);

        let c = centroid(&set.loop_points);
        for frame in &set.frames {
            let mid = frame.point_at(frame.length / 2.0);
            assert!(frame.normal.dot(&(c - mid)) < 0.0);
        }
    }

    #[test]
    fn test_degenerate_edge_rejected() {
        let bad = [[0.0, 0.0], [10.0, 0.0], [10.0, 1e-9], [10.0, 10.0], [0.0, 10.0]];
        assert!(matches!(
            build_frames(&bad),
            Err(Error::InvalidFootprint(_))
        ));
    }

    #[test]
    fn test_self_intersection_rejected() {
        let bowtie = [[0.0, 0.0], [10.0, 10.0], [10.0, 0.0], [0.0, 10.0]];
        assert!(matches!(
            build_frames(&bowtie),
            Err(Error::InvalidFootprint(_))
        ));
    }

    #[test]
    fn test_closing_point_dropped() {
        let closed = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]];
        let set = build_frames(&closed).unwrap();
        assert_eq!(set.face_count(), 4);
    }
}
