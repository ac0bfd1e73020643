// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D loop utilities for the ground plane.
//!
//! All footprint math happens here: orientation, centroids, intersection
//! tests. Loops are open vertex lists (the closing edge is implicit) with
//! counter-clockwise meaning positive signed area.

use nalgebra::{Point2, Vector2};

/// Edges shorter than this are degenerate.
pub const LENGTH_EPSILON: f64 = 1e-6;

/// Epsilon for floating point comparisons in 2D predicates
const EPSILON_2D: f64 = 1e-9;

/// Signed area of a closed loop (positive for counter-clockwise).
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        sum += p.x * q.y - q.x * p.y;
    }
    sum * 0.5
}

/// Check loop orientation.
pub fn is_ccw(points: &[Point2<f64>]) -> bool {
    signed_area(points) > 0.0
}

/// Return a counter-clockwise copy of the loop, plus whether it had to be
/// reversed. Pure: the input is never mutated.
pub fn ensure_ccw(points: &[Point2<f64>]) -> (Vec<Point2<f64>>, bool) {
    if is_ccw(points) {
        (points.to_vec(), false)
    } else {
        let mut reversed: Vec<Point2<f64>> = points.to_vec();
        reversed.reverse();
        (reversed, true)
    }
}

/// Area-weighted centroid of a simple loop.
pub fn centroid(points: &[Point2<f64>]) -> Point2<f64> {
    let n = points.len();
    let area = signed_area(points);
    if n == 0 || area.abs() < EPSILON_2D {
        // Fall back to the vertex mean for degenerate loops
        let mut sum = Vector2::zeros();
        for p in points {
            sum += p.coords;
        }
        return Point2::from(sum / (n.max(1) as f64));
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    Point2::new(cx / (6.0 * area), cy / (6.0 * area))
}

/// Point-in-polygon via ray casting. Points on the boundary count as inside.
pub fn point_in_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];

        // Boundary test: point within epsilon of the edge segment
        if distance_to_segment(point, pi, pj) < LENGTH_EPSILON {
            return true;
        }

        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Distance from a point to a segment.
pub fn distance_to_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < EPSILON_2D * EPSILON_2D {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).norm()
}

/// Proper intersection test for segments (a0, a1) and (b0, b1). Shared
/// endpoints do not count; crossing interiors do.
pub fn segments_properly_intersect(
    a0: &Point2<f64>,
    a1: &Point2<f64>,
    b0: &Point2<f64>,
    b1: &Point2<f64>,
) -> bool {
    let d1 = orient(b0, b1, a0);
    let d2 = orient(b0, b1, a1);
    let d3 = orient(a0, a1, b0);
    let d4 = orient(a0, a1, b1);

    if ((d1 > EPSILON_2D && d2 < -EPSILON_2D) || (d1 < -EPSILON_2D && d2 > EPSILON_2D))
        && ((d3 > EPSILON_2D && d4 < -EPSILON_2D) || (d3 < -EPSILON_2D && d4 > EPSILON_2D))
    {
        return true;
    }
    false
}

/// Twice the signed area of triangle (a, b, c).
fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Check that a loop has no self-intersections. Adjacent edges share a
/// vertex by construction and are skipped.
pub fn is_simple(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a0 = &points[i];
        let a1 = &points[(i + 1) % n];
        for j in (i + 1)..n {
            // Skip adjacent edges (shared vertex)
            if j == i || (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            let b0 = &points[j];
            let b1 = &points[(j + 1) % n];
            if segments_properly_intersect(a0, a1, b0, b1) {
                return false;
            }
        }
    }
    true
}

/// Intersect two infinite lines given as point + direction. Returns `None`
/// when the directions are parallel within `epsilon`.
pub fn line_intersection(
    p: &Point2<f64>,
    d: &Vector2<f64>,
    q: &Point2<f64>,
    e: &Vector2<f64>,
) -> Option<Point2<f64>> {
    let denom = d.x * e.y - d.y * e.x;
    if denom.abs() < EPSILON_2D {
        return None;
    }
    let diff = q - p;
    let t = (diff.x * e.y - diff.y * e.x) / denom;
    Some(p + d * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_signed_area_square() {
        assert_relative_eq!(signed_area(&square()), 100.0);
        let mut cw = square();
        cw.reverse();
        assert_relative_eq!(signed_area(&cw), -100.0);
    }

    #[test]
    fn test_ensure_ccw_reverses() {
        let mut cw = square();
        cw.reverse();
        let (fixed, reversed) = ensure_ccw(&cw);
        assert!(reversed);
        assert!(is_ccw(&fixed));

        let (same, reversed) = ensure_ccw(&square());
        assert!(!reversed);
        assert_eq!(same, square());
    }

    #[test]
    fn test_centroid_square() {
        let c = centroid(&square());
        assert_relative_eq!(c.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = square();
        assert!(point_in_polygon(&Point2::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(&Point2::new(15.0, 5.0), &sq));
        // Boundary counts as inside
        assert!(point_in_polygon(&Point2::new(10.0, 5.0), &sq));
    }

    #[test]
    fn test_simple_polygon() {
        assert!(is_simple(&square()));

        // Bowtie
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ];
        assert!(!is_simple(&bowtie));
    }

    #[test]
    fn test_line_intersection() {
        let p = line_intersection(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(5.0, -3.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 0.0);

        assert!(line_intersection(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Vector2::new(1.0, 0.0),
        )
        .is_none());
    }
}
