// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The build pipeline.
//!
//! One forward pass: validate -> frames -> bays -> depth fields -> corners
//! -> min-perimeters -> surfaces -> setbacks/roof -> assemble. Every stage
//! is a pure function of the stage before it; there is no partial output,
//! and a failing stage aborts the build with its error.
//!
//! Face layouts bind to the normalized (counter-clockwise) loop: when a
//! clockwise footprint is normalized, authored face ids address the
//! reversed loop and a warning records the normalization.

use crate::checks::{run_invariant_checks, CheckContext};
use crate::corner::{CornerDecision, CornerSide, CornerStrategy, FaceSlice, OddWins};
use crate::depth::{DepthField, DEPTH_EPSILON};
use crate::error::Result;
use crate::frame::build_frames;
use crate::mesh::{FacadeMesh, MeshBuilder};
use crate::perimeter::{build_min_perimeter, MinPerimeter};
use crate::roof::{emit_roof, emit_setback_cap};
use crate::solver::{solve_face, FaceSolution, SolverTrace};
use crate::surface::{generate_face_surfaces, FaceContext, MaterialContext};
use buildfab_core::{resolve_layers, BuildingSpec, FaceId, MaterialId, MaterialRegistry};
use std::sync::Arc;

/// Build pipeline states, in pass order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Created,
    Validating,
    FramesBuilt,
    BaysResolved,
    MinPerimeterBuilt,
    SurfacesGenerated,
    RoofTriangulated,
    Assembled,
}

impl BuildStage {
    fn name(self) -> &'static str {
        match self {
            BuildStage::Created => "created",
            BuildStage::Validating => "validating",
            BuildStage::FramesBuilt => "frames_built",
            BuildStage::BaysResolved => "bays_resolved",
            BuildStage::MinPerimeterBuilt => "min_perimeter_built",
            BuildStage::SurfacesGenerated => "surfaces_generated",
            BuildStage::RoofTriangulated => "roof_triangulated",
            BuildStage::Assembled => "assembled",
        }
    }
}

fn enter(stage: BuildStage) {
    tracing::debug!(stage = stage.name(), "build stage");
}

/// Engine configuration. The defaults match authored expectations; hosts
/// mostly construct this once and reuse it.
#[derive(Clone)]
pub struct BuildConfig {
    /// Length of the corner zone a losing face ramps down over.
    pub corner_zone_m: f64,
    /// Parallel-line threshold for miter intersections.
    pub miter_epsilon: f64,
    /// Run invariant checks even in release builds.
    pub enable_invariant_checks: bool,
    /// Attach min-perimeters, corner decisions and solver traces to the
    /// result.
    pub emit_debug_info: bool,
    /// Corner policy; injected so hosts can replace the parity rule.
    pub corner_strategy: Arc<dyn CornerStrategy>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            corner_zone_m: 0.25,
            miter_epsilon: 1e-6,
            enable_invariant_checks: false,
            emit_debug_info: false,
            corner_strategy: Arc::new(OddWins),
        }
    }
}

impl std::fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildConfig")
            .field("corner_zone_m", &self.corner_zone_m)
            .field("miter_epsilon", &self.miter_epsilon)
            .field("enable_invariant_checks", &self.enable_invariant_checks)
            .field("emit_debug_info", &self.emit_debug_info)
            .field("corner_strategy", &self.corner_strategy.name())
            .finish()
    }
}

/// Non-fatal normalizations observed during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The authored footprint was clockwise and has been reversed.
    FootprintReversed,
    /// An authored bay depth was negative and clamped to zero.
    NegativeDepthClamped { layer: usize, face: FaceId },
    /// A referenced material id is not in the registry.
    UnknownMaterial { id: MaterialId },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::FootprintReversed => {
                write!(f, "clockwise footprint normalized to counter-clockwise")
            }
            Warning::NegativeDepthClamped { layer, face } => {
                write!(f, "layer {layer}, face {face}: negative bay depth clamped to zero")
            }
            Warning::UnknownMaterial { id } => {
                write!(f, "material {id} is not registered")
            }
        }
    }
}

/// Debug record of one corner decision.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CornerDecisionRecord {
    pub corner: usize,
    pub miter: [f64; 2],
    pub winner: CornerSide,
    pub left_ramp_len: f64,
    pub right_ramp_len: f64,
}

/// Per-build diagnostics, attached when `emit_debug_info` is set.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugInfo {
    /// Min-perimeter polygon per layer, bottom to top.
    pub min_perimeters: Vec<Vec<[f64; 2]>>,
    /// Corner decisions per layer.
    pub corner_decisions: Vec<Vec<CornerDecisionRecord>>,
    /// Solver trace per layer, per face.
    pub solver_traces: Vec<Vec<SolverTrace>>,
}

/// A successful build: the frozen mesh plus warnings and optional
/// diagnostics.
#[derive(Debug)]
pub struct BuildResult {
    pub mesh: FacadeMesh,
    pub warnings: Vec<Warning>,
    pub debug: Option<DebugInfo>,
}

struct LayerBuild {
    solutions: Vec<FaceSolution>,
    fields: Vec<DepthField>,
    decisions: Vec<CornerDecision>,
    perimeter: MinPerimeter,
    y_base: f64,
    y_top: f64,
}

/// Build the facade mesh for one building spec.
///
/// Pure: equal inputs produce byte-equal meshes. The registry is only read
/// (unknown ids warn, they never fail the build).
pub fn build(
    spec: &BuildingSpec,
    registry: &MaterialRegistry,
    config: &BuildConfig,
) -> Result<BuildResult> {
    let started = std::time::Instant::now();
    enter(BuildStage::Created);
    tracing::info!(
        faces = spec.face_count(),
        layers = spec.floor_layers.len(),
        "starting facade build"
    );

    let mut warnings = Vec::new();

    enter(BuildStage::Validating);
    let layers = resolve_layers(spec)?;

    enter(BuildStage::FramesBuilt);
    let frames = build_frames(&spec.footprint)?;
    if frames.reversed {
        warnings.push(Warning::FootprintReversed);
    }
    let face_count = frames.face_count();

    enter(BuildStage::BaysResolved);
    let mut layer_builds: Vec<LayerBuild> = Vec::with_capacity(layers.len());
    let mut y = 0.0;
    for (layer_index, layer) in layers.iter().enumerate() {
        let mut solutions = Vec::with_capacity(face_count);
        for i in 0..face_count {
            let frame = &frames.frames[i];
            let solution = solve_face(FaceId(i as u16), layer.layouts[i], frame.length)?;
            if solution.depth_clamped {
                warnings.push(Warning::NegativeDepthClamped {
                    layer: layer_index,
                    face: FaceId(i as u16),
                });
            }
            solutions.push(solution);
        }

        let fields: Vec<DepthField> = solutions
            .iter()
            .map(|s| DepthField::from_bays(&s.bays))
            .collect();

        let decisions: Vec<CornerDecision> = (0..face_count)
            .map(|k| {
                let right_index = (k + 1) % face_count;
                let left_frame = &frames.frames[k];
                let right_frame = &frames.frames[right_index];
                let left = FaceSlice {
                    frame: left_frame,
                    d_min: fields[k].d_min,
                    extrudes_at_corner: fields[k].eval(left_frame.length - 1e-9) > DEPTH_EPSILON,
                };
                let right = FaceSlice {
                    frame: right_frame,
                    d_min: fields[right_index].d_min,
                    extrudes_at_corner: fields[right_index].eval(1e-9) > DEPTH_EPSILON,
                };
                config.corner_strategy.resolve_corner(
                    left,
                    right,
                    config.corner_zone_m,
                    config.miter_epsilon,
                )
            })
            .collect();

        let d_min: Vec<f64> = fields.iter().map(|f| f.d_min).collect();
        let perimeter = build_min_perimeter(&frames.frames, &d_min, &decisions)?;

        let height: f64 = layer.floor_count as f64 * layer.floor_height_m as f64;
        let layer_build = LayerBuild {
            solutions,
            fields,
            decisions,
            perimeter,
            y_base: y,
            y_top: y + height,
        };
        y += height;
        layer_builds.push(layer_build);
    }

    enter(BuildStage::MinPerimeterBuilt);

    enter(BuildStage::SurfacesGenerated);
    let mut mesh_builder = MeshBuilder::with_capacity(face_count * 16, face_count * 48);
    for (layer_index, layer_build) in layer_builds.iter().enumerate() {
        let layer = &layers[layer_index];
        for i in 0..face_count {
            let start_corner = (i + face_count - 1) % face_count;
            let frame = &frames.frames[i];
            // Tangent projections of the mitered corners: the wall spans
            // the min-perimeter edge, not just the footprint edge.
            let (corner_before, corner_after) = layer_build.perimeter.edge(i);
            let ctx = FaceContext {
                frame,
                bays: &layer_build.solutions[i].bays,
                field: &layer_build.fields[i],
                start_ramp: layer_build.decisions[start_corner].right_ramp_len,
                end_ramp: layer_build.decisions[i].left_ramp_len,
                u_lo: (corner_before - frame.start).dot(&frame.tangent),
                u_hi: (corner_after - frame.start).dot(&frame.tangent),
                y_base: layer_build.y_base,
                y_top: layer_build.y_top,
                materials: MaterialContext {
                    face_default: layer.layouts[i].default_material,
                    layer_default: layer.default_material,
                    building_default: spec.default_material,
                },
            };
            generate_face_surfaces(&mut mesh_builder, &ctx);
        }
    }

    enter(BuildStage::RoofTriangulated);
    let roof_material = spec.roof.material.unwrap_or(spec.default_material);
    for pair in layer_builds.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if !lower.perimeter.coincides_with(&upper.perimeter) {
            emit_setback_cap(
                &mut mesh_builder,
                &lower.perimeter,
                &upper.perimeter,
                lower.y_top,
                roof_material,
            )?;
        }
    }
    let top = layer_builds.last().expect("at least one layer");
    emit_roof(&mut mesh_builder, &top.perimeter, top.y_top, roof_material)?;

    enter(BuildStage::Assembled);
    let mesh = mesh_builder.freeze();

    if !registry.is_empty() {
        for &id in mesh.material_groups.keys() {
            if !registry.contains(id) {
                warnings.push(Warning::UnknownMaterial { id });
            }
        }
    }

    let check = config.enable_invariant_checks
        || cfg!(feature = "debug_geometry")
        || cfg!(debug_assertions);
    if check {
        run_invariant_checks(
            &mesh,
            &CheckContext {
                roof_corners: &top.perimeter.points,
                roof_plane_y: top.y_top,
            },
        )?;
    }

    let debug = config.emit_debug_info.then(|| DebugInfo {
        min_perimeters: layer_builds
            .iter()
            .map(|l| l.perimeter.points.iter().map(|p| [p.x, p.y]).collect())
            .collect(),
        corner_decisions: layer_builds
            .iter()
            .map(|l| {
                l.decisions
                    .iter()
                    .enumerate()
                    .map(|(k, d)| CornerDecisionRecord {
                        corner: k,
                        miter: [d.miter.x, d.miter.y],
                        winner: d.winner,
                        left_ramp_len: d.left_ramp_len,
                        right_ramp_len: d.right_ramp_len,
                    })
                    .collect()
            })
            .collect(),
        solver_traces: layer_builds
            .iter()
            .map(|l| l.solutions.iter().map(|s| s.trace.clone()).collect())
            .collect(),
    });

    tracing::info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        materials = mesh.material_groups.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "facade build complete"
    );

    Ok(BuildResult {
        mesh,
        warnings,
        debug,
    })
}
