// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Invariant checks over the assembled mesh.
//!
//! Run in debug builds, under the `debug_geometry` feature, or when the
//! config asks for them. They validate the output contract rather than
//! internal state: non-degenerate finite triangles, a roof confined to
//! min-perimeter vertices, and material groups that partition the mesh.

use crate::error::{Error, Result};
use crate::mesh::{FacadeMesh, RoleTag};
use nalgebra::Point2;

/// Minimum triangle area in square meters.
const MIN_TRIANGLE_AREA: f64 = 1e-8;

/// Positional tolerance when matching roof vertices to corners.
const CORNER_TOLERANCE: f32 = 1e-4;

/// What the checks need to know about the build.
pub struct CheckContext<'a> {
    /// Top layer's min-perimeter corners.
    pub roof_corners: &'a [Point2<f64>],
    /// Height of the roof plane.
    pub roof_plane_y: f64,
}

/// Validate the output mesh. Returns the first offending triangle.
pub fn run_invariant_checks(mesh: &FacadeMesh, ctx: &CheckContext<'_>) -> Result<()> {
    for value in mesh.positions.iter().chain(mesh.uvs.iter()) {
        if !value.is_finite() {
            return Err(Error::DegenerateGeometry { triangle: 0 });
        }
    }

    let vertex_count = mesh.vertex_count() as u32;
    for (t, tri) in mesh.indices.chunks_exact(3).enumerate() {
        if tri.iter().any(|&i| i >= vertex_count) {
            return Err(Error::DegenerateGeometry { triangle: t });
        }

        let [a, b, c] = mesh.triangle(t);
        let ab = b - a;
        let ac = c - a;
        let area = 0.5
            * (ab.cast::<f64>())
                .cross(&ac.cast::<f64>())
                .norm();
        if area < MIN_TRIANGLE_AREA {
            return Err(Error::DegenerateGeometry { triangle: t });
        }
    }

    check_roof_confined(mesh, ctx)?;
    check_material_partition(mesh)?;
    Ok(())
}

/// Every roof triangle vertex must sit on a min-perimeter corner: bay
/// breakpoints and ramp vertices never reach the roof.
fn check_roof_confined(mesh: &FacadeMesh, ctx: &CheckContext<'_>) -> Result<()> {
    for (t, tag) in mesh.tags.iter().enumerate() {
        if *tag != RoleTag::Roof {
            continue;
        }
        for p in mesh.triangle(t) {
            let on_plane = (p.y - ctx.roof_plane_y as f32).abs() < CORNER_TOLERANCE;
            let on_corner = ctx.roof_corners.iter().any(|c| {
                (p.x - c.x as f32).abs() < CORNER_TOLERANCE
                    && (p.z - c.y as f32).abs() < CORNER_TOLERANCE
            });
            if !on_plane || !on_corner {
                return Err(Error::DegenerateGeometry { triangle: t });
            }
        }
    }
    Ok(())
}

/// Every triangle belongs to exactly one material group, and group entries
/// are valid triangle indices.
fn check_material_partition(mesh: &FacadeMesh) -> Result<()> {
    let triangle_count = mesh.triangle_count();
    let mut seen = vec![false; triangle_count];
    for group in mesh.material_groups.values() {
        for &t in group {
            let t = t as usize;
            if t >= triangle_count || seen[t] {
                return Err(Error::DegenerateGeometry { triangle: t.min(triangle_count) });
            }
            seen[t] = true;
        }
    }
    if let Some(t) = seen.iter().position(|covered| !covered) {
        return Err(Error::DegenerateGeometry { triangle: t });
    }
    Ok(())
}
