// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facade surface generator.
//!
//! Works per face in local `(u, n, y)` coordinates: `u` along the tangent,
//! `n` along the outward normal measured from the min-perimeter edge, `y`
//! vertical. The face's plan profile (bay steps, wedge slants, corner-zone
//! ramps) is flattened into linear segments first; walls, return quads and
//! top caps all emit from that one profile so shared edges line up by
//! construction.
//!
//! Bays partition the footprint edge `u in [0, length]`, but the mitered
//! min-perimeter edge can start before 0 and end after `length`. The
//! outermost segments stretch to the miter projections (`u_lo`, `u_hi`) so
//! adjacent faces meet exactly at the shared corner vertex.

use crate::depth::{DepthField, DEPTH_EPSILON};
use crate::frame::FaceFrame;
use crate::mesh::{MeshBuilder, RoleTag};
use crate::solver::SolvedBay;
use buildfab_core::{BayShape, MaterialId, TextureFlow};
use nalgebra::{Point3, Vector2};
use smallvec::SmallVec;

/// Material fallback chain for one face.
#[derive(Debug, Clone, Copy)]
pub struct MaterialContext {
    pub face_default: Option<MaterialId>,
    pub layer_default: Option<MaterialId>,
    pub building_default: MaterialId,
}

impl MaterialContext {
    /// bay override -> face default -> layer default -> building default
    pub fn resolve(&self, bay_override: Option<MaterialId>) -> MaterialId {
        bay_override
            .or(self.face_default)
            .or(self.layer_default)
            .unwrap_or(self.building_default)
    }
}

/// Everything the generator needs for one face of one floor layer.
pub struct FaceContext<'a> {
    pub frame: &'a FaceFrame,
    pub bays: &'a [SolvedBay],
    pub field: &'a DepthField,
    /// Corner-zone ramp length at the face start (nonzero when this face
    /// lost the corner it shares with the previous face).
    pub start_ramp: f64,
    /// Corner-zone ramp length at the face end.
    pub end_ramp: f64,
    /// Tangent projection of the start-corner miter vertex. 0 when the
    /// face's min-perimeter offset is zero.
    pub u_lo: f64,
    /// Tangent projection of the end-corner miter vertex. `length` when
    /// the offset is zero.
    pub u_hi: f64,
    pub y_base: f64,
    pub y_top: f64,
    pub materials: MaterialContext,
}

impl FaceContext<'_> {
    /// World position of local coordinates: `n_off` is measured from the
    /// min-perimeter edge (footprint edge + d_min).
    fn world(&self, u: f64, n_off: f64, y: f64) -> Point3<f64> {
        let p = self.frame.start
            + self.frame.tangent * u
            + self.frame.normal * (self.field.d_min + n_off);
        Point3::new(p.x, y, p.y)
    }
}

/// One linear piece of the face's plan profile.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ProfileSegment {
    u0: f64,
    u1: f64,
    e0: f64,
    e1: f64,
    /// Index into the face's solved bays.
    bay: usize,
}

impl ProfileSegment {
    fn eval(&self, u: f64) -> f64 {
        if (self.u1 - self.u0).abs() < 1e-12 {
            return self.e0;
        }
        self.e0 + (self.e1 - self.e0) * (u - self.u0) / (self.u1 - self.u0)
    }

    fn slope(&self) -> f64 {
        if (self.u1 - self.u0).abs() < 1e-12 {
            0.0
        } else {
            (self.e1 - self.e0) / (self.u1 - self.u0)
        }
    }
}

const U_EPSILON: f64 = 1e-9;

/// Emit all wall, return and top-cap triangles for one face.
pub fn generate_face_surfaces(builder: &mut MeshBuilder, ctx: &FaceContext<'_>) {
    let segments = effective_profile(ctx);
    if segments.is_empty() {
        return;
    }

    let uv0 = assign_uv_origins(ctx.bays, &ctx.materials);

    emit_walls(builder, ctx, &segments, &uv0);
    emit_returns(builder, ctx, &segments);
    emit_top_caps(builder, ctx, &segments, &uv0);
}

/// Base profile from solved bays: constant spans with wedge slants folded
/// in, stretched at both ends to the miter projections.
fn base_profile(ctx: &FaceContext<'_>) -> SmallVec<[ProfileSegment; 8]> {
    let mut segments: SmallVec<[ProfileSegment; 8]> = SmallVec::new();
    let mut prev_e = 0.0;

    for (i, bay) in ctx.bays.iter().enumerate() {
        let e = bay.depth - ctx.field.d_min;
        match bay.shape {
            BayShape::Wedge { angle_deg } if (e - prev_e).abs() > DEPTH_EPSILON => {
                // The slant rises from the left neighbour's depth to this
                // bay's depth; steeper angles make shorter runs.
                let tan = (angle_deg as f64).to_radians().tan();
                let run = ((e - prev_e).abs() / tan).min(bay.width);
                segments.push(ProfileSegment {
                    u0: bay.u0,
                    u1: bay.u0 + run,
                    e0: prev_e,
                    e1: e,
                    bay: i,
                });
                if bay.width - run > U_EPSILON {
                    segments.push(ProfileSegment {
                        u0: bay.u0 + run,
                        u1: bay.u1(),
                        e0: e,
                        e1: e,
                        bay: i,
                    });
                }
            }
            _ => {
                segments.push(ProfileSegment {
                    u0: bay.u0,
                    u1: bay.u1(),
                    e0: e,
                    e1: e,
                    bay: i,
                });
            }
        }
        prev_e = e;
    }

    if let Some(first) = segments.first_mut() {
        first.u0 = first.u0.min(ctx.u_lo);
    }
    if let Some(last) = segments.last_mut() {
        last.u1 = last.u1.max(ctx.u_hi);
    }

    segments
}

/// Linear ramp: zero at `corner_u`, `target` at the zone's inner edge.
#[derive(Debug, Clone, Copy)]
struct RampLine {
    corner_u: f64,
    inner_u: f64,
    target: f64,
}

impl RampLine {
    fn value(&self, u: f64) -> Option<f64> {
        let zone = self.inner_u - self.corner_u;
        if zone.abs() < U_EPSILON {
            return None;
        }
        let s = (u - self.corner_u) / zone;
        (-U_EPSILON..=1.0 + U_EPSILON)
            .contains(&s)
            .then(|| self.target * s.clamp(0.0, 1.0))
    }

    /// As `e = slope * u + offset` for crossing computation.
    fn slope_offset(&self) -> (f64, f64) {
        let zone = self.inner_u - self.corner_u;
        let slope = self.target / zone;
        (slope, -slope * self.corner_u)
    }
}

/// Apply the corner-zone ramps to the base profile. Inside a zone the
/// exterior depth is the minimum of the base profile and the ramp line, so
/// bays the author left flat stay flat; crossings become breakpoints.
fn effective_profile(ctx: &FaceContext<'_>) -> SmallVec<[ProfileSegment; 8]> {
    let base = base_profile(ctx);
    if base.is_empty() {
        return base;
    }

    if ctx.start_ramp <= U_EPSILON && ctx.end_ramp <= U_EPSILON {
        return base;
    }

    let mut ramps: SmallVec<[RampLine; 2]> = SmallVec::new();
    if ctx.start_ramp > U_EPSILON {
        let inner = ctx.u_lo + ctx.start_ramp;
        ramps.push(RampLine {
            corner_u: ctx.u_lo,
            inner_u: inner,
            target: eval_base(&base, inner),
        });
    }
    if ctx.end_ramp > U_EPSILON {
        let inner = ctx.u_hi - ctx.end_ramp;
        ramps.push(RampLine {
            corner_u: ctx.u_hi,
            inner_u: inner,
            target: eval_base(&base, inner),
        });
    }

    // Cut points: segment ends, zone boundaries, ramp/base crossings.
    let mut cuts: Vec<f64> = Vec::with_capacity(base.len() * 2 + 6);
    for seg in &base {
        cuts.push(seg.u0);
        cuts.push(seg.u1);
    }
    for ramp in &ramps {
        cuts.push(ramp.inner_u);
        for seg in &base {
            let (slope, offset) = ramp.slope_offset();
            let lo = seg.u0.max(ramp.corner_u.min(ramp.inner_u));
            let hi = seg.u1.min(ramp.corner_u.max(ramp.inner_u));
            push_crossing(&mut cuts, seg, slope, offset, lo, hi);
        }
    }
    cuts.sort_by(f64::total_cmp);
    cuts.dedup_by(|a, b| (*a - *b).abs() < U_EPSILON);

    let mut segments = SmallVec::new();
    for pair in cuts.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b - a < U_EPSILON {
            continue;
        }
        let mid = (a + b) / 2.0;
        let seg = base
            .iter()
            .find(|s| mid >= s.u0 - U_EPSILON && mid <= s.u1 + U_EPSILON)
            .copied()
            .unwrap_or(base[base.len() - 1]);

        let eff = |u: f64| -> f64 {
            let mut e = seg.eval(u);
            for ramp in &ramps {
                if let Some(r) = ramp.value(u) {
                    e = e.min(r);
                }
            }
            e.max(0.0)
        };

        segments.push(ProfileSegment {
            u0: a,
            u1: b,
            e0: eff(a),
            e1: eff(b),
            bay: seg.bay,
        });
    }

    segments
}

fn eval_base(base: &[ProfileSegment], u: f64) -> f64 {
    for seg in base {
        if u <= seg.u1 + U_EPSILON {
            return seg.eval(u.max(seg.u0));
        }
    }
    base[base.len() - 1].e1
}

/// Add the u where `seg` crosses the line `e = slope * u + offset`, if it
/// falls strictly inside both the segment and the (lo, hi) window.
fn push_crossing(
    cuts: &mut Vec<f64>,
    seg: &ProfileSegment,
    slope: f64,
    offset: f64,
    lo: f64,
    hi: f64,
) {
    if hi - lo < U_EPSILON {
        return;
    }
    let denom = seg.slope() - slope;
    if denom.abs() < 1e-12 {
        return;
    }
    let u = (offset - (seg.e0 - seg.slope() * seg.u0)) / denom;
    if u > lo + U_EPSILON && u < hi - U_EPSILON {
        cuts.push(u);
    }
}

fn emit_walls(
    builder: &mut MeshBuilder,
    ctx: &FaceContext<'_>,
    segments: &[ProfileSegment],
    uv0: &[f64],
) {
    for seg in segments {
        if seg.u1 - seg.u0 < U_EPSILON {
            continue;
        }
        let bay = &ctx.bays[seg.bay];
        let material = ctx.materials.resolve(bay.material_override);
        let uv_u = |u: f64| uv0[seg.bay] + (u - bay.u0);

        let bl = (ctx.world(seg.u0, seg.e0, ctx.y_base), Vector2::new(uv_u(seg.u0), ctx.y_base));
        let tl = (ctx.world(seg.u0, seg.e0, ctx.y_top), Vector2::new(uv_u(seg.u0), ctx.y_top));
        let tr = (ctx.world(seg.u1, seg.e1, ctx.y_top), Vector2::new(uv_u(seg.u1), ctx.y_top));
        let br = (ctx.world(seg.u1, seg.e1, ctx.y_base), Vector2::new(uv_u(seg.u1), ctx.y_base));

        builder.add_quad([bl, tl, tr, br], RoleTag::WallExterior, material);
    }
}

fn emit_returns(builder: &mut MeshBuilder, ctx: &FaceContext<'_>, segments: &[ProfileSegment]) {
    // Leading edge: a face that starts extruded needs a closing quad,
    // facing backwards along the tangent.
    let first = &segments[0];
    if first.e0 > DEPTH_EPSILON {
        let material = ctx.materials.resolve(ctx.bays[first.bay].material_override);
        emit_return_quad(builder, ctx, first.u0, 0.0, first.e0, false, material);
    }

    for pair in segments.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let step = left.e1 - right.e0;
        if step.abs() < DEPTH_EPSILON {
            continue;
        }
        // The deeper side owns the return quad.
        let owner = if step > 0.0 { left.bay } else { right.bay };
        let material = ctx.materials.resolve(ctx.bays[owner].material_override);
        let (lo, hi) = if step > 0.0 {
            (right.e0, left.e1)
        } else {
            (left.e1, right.e0)
        };
        // A drop in depth exposes a face looking forward along the
        // tangent; a rise exposes one looking backward.
        emit_return_quad(builder, ctx, left.u1, lo, hi, step > 0.0, material);
    }

    let last = &segments[segments.len() - 1];
    if last.e1 > DEPTH_EPSILON {
        let material = ctx.materials.resolve(ctx.bays[last.bay].material_override);
        emit_return_quad(builder, ctx, last.u1, 0.0, last.e1, true, material);
    }
}

/// Vertical quad at constant `u` spanning depths [e_lo, e_hi] over the
/// layer height. `faces_forward` picks the normal along +tangent.
fn emit_return_quad(
    builder: &mut MeshBuilder,
    ctx: &FaceContext<'_>,
    u: f64,
    e_lo: f64,
    e_hi: f64,
    faces_forward: bool,
    material: MaterialId,
) {
    let a = (ctx.world(u, e_lo, ctx.y_base), Vector2::new(e_lo, ctx.y_base));
    let b = (ctx.world(u, e_hi, ctx.y_base), Vector2::new(e_hi, ctx.y_base));
    let c = (ctx.world(u, e_hi, ctx.y_top), Vector2::new(e_hi, ctx.y_top));
    let d = (ctx.world(u, e_lo, ctx.y_top), Vector2::new(e_lo, ctx.y_top));

    if faces_forward {
        builder.add_quad([a, b, c, d], RoleTag::WallReturn, material);
    } else {
        builder.add_quad([b, a, d, c], RoleTag::WallReturn, material);
    }
}

fn emit_top_caps(
    builder: &mut MeshBuilder,
    ctx: &FaceContext<'_>,
    segments: &[ProfileSegment],
    uv0: &[f64],
) {
    for seg in segments {
        if seg.u1 - seg.u0 < U_EPSILON {
            continue;
        }
        if seg.e0 < DEPTH_EPSILON && seg.e1 < DEPTH_EPSILON {
            continue;
        }
        let bay = &ctx.bays[seg.bay];
        let material = ctx.materials.resolve(bay.material_override);
        let uv_u = |u: f64| uv0[seg.bay] + (u - bay.u0);

        let q00 = (ctx.world(seg.u0, 0.0, ctx.y_top), Vector2::new(uv_u(seg.u0), 0.0));
        let q10 = (ctx.world(seg.u1, 0.0, ctx.y_top), Vector2::new(uv_u(seg.u1), 0.0));
        let q11 = (ctx.world(seg.u1, seg.e1, ctx.y_top), Vector2::new(uv_u(seg.u1), seg.e1));
        let q01 = (ctx.world(seg.u0, seg.e0, ctx.y_top), Vector2::new(uv_u(seg.u0), seg.e0));

        if seg.e0 < DEPTH_EPSILON {
            // Wedge tip: the cap narrows to a triangle.
            let i0 = builder.add_vertex(q00.0, q00.1);
            let i1 = builder.add_vertex(q10.0, q10.1);
            let i2 = builder.add_vertex(q11.0, q11.1);
            builder.add_triangle(i0, i1, i2, RoleTag::TopCap, material);
        } else if seg.e1 < DEPTH_EPSILON {
            let i0 = builder.add_vertex(q00.0, q00.1);
            let i1 = builder.add_vertex(q10.0, q10.1);
            let i2 = builder.add_vertex(q01.0, q01.1);
            builder.add_triangle(i0, i1, i2, RoleTag::TopCap, material);
        } else {
            builder.add_quad([q00, q10, q11, q01], RoleTag::TopCap, material);
        }
    }
}

/// UV u value at each solved bay's left edge, honoring texture flow.
///
/// One forward pass covers restart, group continuity and overflow-left; a
/// backward pass resolves overflow-right chains. An overflow whose
/// neighbour resolves to a different material degrades to restart, as does
/// an overflow pair pointing at each other.
pub fn assign_uv_origins(bays: &[SolvedBay], materials: &MaterialContext) -> Vec<f64> {
    let n = bays.len();
    let resolved: Vec<MaterialId> = bays
        .iter()
        .map(|b| materials.resolve(b.material_override))
        .collect();

    let mut uv0 = vec![f64::NAN; n];

    for i in 0..n {
        let bay = &bays[i];
        uv0[i] = match bay.texture_flow {
            TextureFlow::RestartOnNewBay => 0.0,
            TextureFlow::ContinuousAcrossRepeats => match bay.group {
                Some((g, _)) => {
                    let group_start = bays
                        .iter()
                        .find(|b| matches!(b.group, Some((gi, _)) if gi == g))
                        .map(|b| b.u0)
                        .unwrap_or(bay.u0);
                    bay.u0 - group_start
                }
                None => 0.0,
            },
            TextureFlow::OverflowLeft => {
                if i > 0 && resolved[i - 1] == resolved[i] && uv0[i - 1].is_finite() {
                    uv0[i - 1] + bays[i - 1].width
                } else {
                    0.0
                }
            }
            // Resolved right-to-left below
            TextureFlow::OverflowRight => f64::NAN,
        };
    }

    for i in (0..n).rev() {
        if bays[i].texture_flow != TextureFlow::OverflowRight {
            continue;
        }
        uv0[i] = if i + 1 < n && resolved[i + 1] == resolved[i] && uv0[i + 1].is_finite() {
            uv0[i + 1] - bays[i].width
        } else {
            0.0
        };
    }

    uv0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::build_frames;
    use crate::solver::solve_face;
    use buildfab_core::{Bay, FaceId, FacadeLayout, WidthSpec};
    use approx::assert_relative_eq;

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];

    fn materials() -> MaterialContext {
        MaterialContext {
            face_default: None,
            layer_default: None,
            building_default: MaterialId(0),
        }
    }

    fn bays_with_depths(depths: &[(f32, f32)]) -> Vec<SolvedBay> {
        let layout = FacadeLayout {
            bays: depths
                .iter()
                .map(|&(w, d)| Bay {
                    width: WidthSpec::Fixed(w),
                    depth_m: d,
                    ..Bay::flat(w)
                })
                .collect(),
            groups: Vec::new(),
            default_material: None,
        };
        let length: f64 = depths.iter().map(|&(w, _)| w as f64).sum();
        solve_face(FaceId(0), &layout, length).unwrap().bays
    }

    fn context<'a>(
        frame: &'a FaceFrame,
        bays: &'a [SolvedBay],
        field: &'a DepthField,
        end_ramp: f64,
    ) -> FaceContext<'a> {
        FaceContext {
            frame,
            bays,
            field,
            start_ramp: 0.0,
            end_ramp,
            u_lo: 0.0,
            u_hi: frame.length,
            y_base: 0.0,
            y_top: 3.0,
            materials: materials(),
        }
    }

    #[test]
    fn test_flat_face_one_wall_quad() {
        let set = build_frames(&SQUARE).unwrap();
        let bays = bays_with_depths(&[(10.0, 0.0)]);
        let field = DepthField::from_bays(&bays);
        let mut builder = MeshBuilder::new();
        generate_face_surfaces(&mut builder, &context(&set.frames[0], &bays, &field, 0.0));

        let mesh = builder.freeze();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.count_tagged(RoleTag::WallExterior), 2);
        assert_eq!(mesh.count_tagged(RoleTag::WallReturn), 0);
        assert_eq!(mesh.count_tagged(RoleTag::TopCap), 0);
    }

    #[test]
    fn test_wall_winding_outward() {
        let set = build_frames(&SQUARE).unwrap();
        let bays = bays_with_depths(&[(10.0, 0.0)]);
        let field = DepthField::from_bays(&bays);
        let mut builder = MeshBuilder::new();
        generate_face_surfaces(&mut builder, &context(&set.frames[0], &bays, &field, 0.0));

        let mesh = builder.freeze();
        // Face A of the CCW square faces -z
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(t);
            let n = (b - a).cross(&(c - a));
            assert!(n.z < 0.0);
        }
    }

    #[test]
    fn test_step_emits_return_and_caps() {
        let set = build_frames(&SQUARE).unwrap();
        let bays = bays_with_depths(&[(2.0, 0.0), (8.0, 0.5)]);
        let field = DepthField::from_bays(&bays);
        let mut builder = MeshBuilder::new();
        generate_face_surfaces(&mut builder, &context(&set.frames[0], &bays, &field, 0.0));

        let mesh = builder.freeze();
        // Two wall quads, the step return at u=2, the closing return at
        // u=10, and the top cap over the extruded bay.
        assert_eq!(mesh.count_tagged(RoleTag::WallExterior), 4);
        assert_eq!(mesh.count_tagged(RoleTag::WallReturn), 4);
        assert_eq!(mesh.count_tagged(RoleTag::TopCap), 2);
    }

    #[test]
    fn test_extended_domain_reaches_miter() {
        // A face whose min-perimeter offset is 0.5: the wall must span the
        // mitered edge, half a meter past the footprint corners.
        let set = build_frames(&SQUARE).unwrap();
        let bays = bays_with_depths(&[(10.0, 0.5)]);
        let field = DepthField::from_bays(&bays);
        assert_relative_eq!(field.d_min, 0.5);

        let mut builder = MeshBuilder::new();
        let mut ctx = context(&set.frames[0], &bays, &field, 0.0);
        ctx.u_lo = -0.5;
        ctx.u_hi = 10.5;
        generate_face_surfaces(&mut builder, &ctx);

        let mesh = builder.freeze();
        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.x, -0.5, epsilon = 1e-6);
        assert_relative_eq!(max.x, 10.5, epsilon = 1e-6);
        // e = 0 everywhere: still a single flat wall quad.
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_corner_ramp_reaches_zero() {
        let set = build_frames(&SQUARE).unwrap();
        let bays = bays_with_depths(&[(5.0, 0.0), (5.0, 0.3)]);
        let field = DepthField::from_bays(&bays);
        let mut builder = MeshBuilder::new();
        generate_face_surfaces(&mut builder, &context(&set.frames[1], &bays, &field, 0.25));

        let mesh = builder.freeze();
        // The ramp kills the closing return at the face end: depth is
        // zero at the corner. The only return is the step at u = 5.
        assert_eq!(mesh.count_tagged(RoleTag::WallReturn), 2);
        // Walls: flat span, extruded span, ramp span.
        assert_eq!(mesh.count_tagged(RoleTag::WallExterior), 6);
    }

    #[test]
    fn test_wedge_replaces_return() {
        let set = build_frames(&SQUARE).unwrap();
        let layout = FacadeLayout {
            bays: vec![
                Bay::flat(4.0),
                Bay {
                    width: WidthSpec::Fixed(6.0),
                    depth_m: 0.5,
                    shape: BayShape::Wedge { angle_deg: 45.0 },
                    ..Bay::flat(6.0)
                },
            ],
            groups: Vec::new(),
            default_material: None,
        };
        let bays = solve_face(FaceId(0), &layout, 10.0).unwrap().bays;
        let field = DepthField::from_bays(&bays);
        let mut builder = MeshBuilder::new();
        generate_face_surfaces(&mut builder, &context(&set.frames[0], &bays, &field, 0.0));

        let mesh = builder.freeze();
        // No step return at u=4: the 45-degree slant bridges the depths.
        // Only the closing return at u=10 remains.
        assert_eq!(mesh.count_tagged(RoleTag::WallReturn), 2);
        // Walls: flat bay, slant, constant remainder of the wedge bay.
        assert_eq!(mesh.count_tagged(RoleTag::WallExterior), 6);
        // Caps: slant triangle plus the constant quad.
        assert_eq!(mesh.count_tagged(RoleTag::TopCap), 3);
    }

    #[test]
    fn test_uv_restart_and_overflow() {
        let layout = FacadeLayout {
            bays: vec![
                Bay {
                    width: WidthSpec::Fixed(4.0),
                    ..Bay::flat(4.0)
                },
                Bay {
                    width: WidthSpec::Fixed(6.0),
                    texture_flow: TextureFlow::OverflowLeft,
                    ..Bay::flat(6.0)
                },
            ],
            groups: Vec::new(),
            default_material: None,
        };
        let bays = solve_face(FaceId(0), &layout, 10.0).unwrap().bays;
        let uv0 = assign_uv_origins(&bays, &materials());
        assert_relative_eq!(uv0[0], 0.0);
        // Same material: the second bay continues where the first ended.
        assert_relative_eq!(uv0[1], 4.0);
    }

    #[test]
    fn test_uv_overflow_blocked_by_material() {
        let layout = FacadeLayout {
            bays: vec![
                Bay {
                    width: WidthSpec::Fixed(4.0),
                    material_override: Some(MaterialId(5)),
                    ..Bay::flat(4.0)
                },
                Bay {
                    width: WidthSpec::Fixed(6.0),
                    texture_flow: TextureFlow::OverflowLeft,
                    ..Bay::flat(6.0)
                },
            ],
            groups: Vec::new(),
            default_material: None,
        };
        let bays = solve_face(FaceId(0), &layout, 10.0).unwrap().bays;
        let uv0 = assign_uv_origins(&bays, &materials());
        assert_relative_eq!(uv0[1], 0.0);
    }

    #[test]
    fn test_uv_overflow_right() {
        let layout = FacadeLayout {
            bays: vec![
                Bay {
                    width: WidthSpec::Fixed(4.0),
                    texture_flow: TextureFlow::OverflowRight,
                    ..Bay::flat(4.0)
                },
                Bay {
                    width: WidthSpec::Fixed(6.0),
                    ..Bay::flat(6.0)
                },
            ],
            groups: Vec::new(),
            default_material: None,
        };
        let bays = solve_face(FaceId(0), &layout, 10.0).unwrap().bays;
        let uv0 = assign_uv_origins(&bays, &materials());
        // The first bay ends where the second begins: uv runs ...-4 -> 0.
        assert_relative_eq!(uv0[0], -4.0);
        assert_relative_eq!(uv0[1], 0.0);
    }

    #[test]
    fn test_uv_continuous_across_repeats() {
        let layout = FacadeLayout {
            bays: vec![Bay {
                width: WidthSpec::Fixed(2.0),
                texture_flow: TextureFlow::ContinuousAcrossRepeats,
                ..Bay::flat(2.0)
            }],
            groups: vec![buildfab_core::RepeatGroup {
                first_bay: 0,
                last_bay: 0,
                repeatable: true,
            }],
            default_material: None,
        };
        let bays = solve_face(FaceId(0), &layout, 8.0).unwrap().bays;
        assert_eq!(bays.len(), 4);
        let uv0 = assign_uv_origins(&bays, &materials());
        // UV runs continuously across the group's repetitions.
        assert_relative_eq!(uv0[0], 0.0);
        assert_relative_eq!(uv0[1], 2.0);
        assert_relative_eq!(uv0[2], 4.0);
        assert_relative_eq!(uv0[3], 6.0);
    }
}
