// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof and setback caps.
//!
//! The roof triangulates the topmost layer's min-perimeter and nothing
//! else: bay breakpoints and corner-zone ramps never reach it. Setback
//! caps close the horizontal ring between two layers whose min-perimeters
//! differ, triangulated as outer-with-hole.

use crate::error::{Error, Result};
use crate::mesh::{MeshBuilder, RoleTag};
use crate::perimeter::MinPerimeter;
use crate::triangulation::{triangulate_polygon, triangulate_with_hole};
use buildfab_core::MaterialId;
use nalgebra::{Point2, Point3, Vector2};

const SETBACK_EPSILON: f64 = 1e-6;

/// Emit the roof over the topmost layer.
pub fn emit_roof(
    builder: &mut MeshBuilder,
    perimeter: &MinPerimeter,
    y_top: f64,
    material: MaterialId,
) -> Result<()> {
    let indices = triangulate_polygon(&perimeter.points)?;
    let vertices = add_plan_vertices(builder, &perimeter.points, y_top);

    // Plan-CCW triangles face downward in a y-up world; flip them to look
    // at the sky.
    for tri in indices.chunks(3) {
        builder.add_triangle(
            vertices[tri[0]],
            vertices[tri[2]],
            vertices[tri[1]],
            RoleTag::Roof,
            material,
        );
    }
    Ok(())
}

/// Emit the horizontal cap between two stacked layers whose min-perimeters
/// differ. `y` is the transition height (top of the lower layer).
///
/// A setback (upper inside lower) faces up; an overhang (lower inside
/// upper) faces down. Mixed per-face offsets have no annulus to cap and
/// are rejected.
pub fn emit_setback_cap(
    builder: &mut MeshBuilder,
    lower: &MinPerimeter,
    upper: &MinPerimeter,
    y: f64,
    material: MaterialId,
) -> Result<()> {
    let n = lower.d_min.len();
    let mut upper_inside = true;
    let mut lower_inside = true;
    for i in 0..n {
        if upper.d_min[i] > lower.d_min[i] + SETBACK_EPSILON {
            upper_inside = false;
        }
        if lower.d_min[i] > upper.d_min[i] + SETBACK_EPSILON {
            lower_inside = false;
        }
    }

    let (outer, inner, faces_up) = if upper_inside {
        (lower, upper, true)
    } else if lower_inside {
        (upper, lower, false)
    } else {
        let corner = (0..n)
            .find(|&i| upper.d_min[i] > lower.d_min[i] + SETBACK_EPSILON)
            .unwrap_or(0);
        return Err(Error::InvalidMinPerimeter { corner });
    };

    let indices = triangulate_with_hole(&outer.points, &inner.points)?;
    let mut vertices = add_plan_vertices(builder, &outer.points, y);
    vertices.extend(add_plan_vertices(builder, &inner.points, y));

    for tri in indices.chunks(3) {
        let (a, b, c) = if faces_up {
            (tri[0], tri[2], tri[1])
        } else {
            (tri[0], tri[1], tri[2])
        };
        builder.add_triangle(
            vertices[a],
            vertices[b],
            vertices[c],
            RoleTag::SetbackCap,
            material,
        );
    }
    Ok(())
}

fn add_plan_vertices(builder: &mut MeshBuilder, points: &[Point2<f64>], y: f64) -> Vec<u32> {
    points
        .iter()
        .map(|p| builder.add_vertex(Point3::new(p.x, y, p.y), Vector2::new(p.x, p.y)))
        .collect()
}
