// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Buildfab Geometry
//!
//! Deterministic facade mesh generation using [earcutr](https://docs.rs/earcutr)
//! triangulation and [nalgebra](https://docs.rs/nalgebra) for the math.
//!
//! ## Overview
//!
//! This crate turns an authored [`BuildingSpec`](buildfab_core::BuildingSpec)
//! into a watertight triangle mesh:
//!
//! - **Face frames**: a local `(tangent, outward_normal)` basis per
//!   footprint edge, stable under arbitrary building rotation
//! - **Bay solver**: fixed/range widths, repeat groups, center-out extras
//! - **Depth field**: non-negative per-face extrusion over the
//!   min-perimeter baseline
//! - **Corner resolution**: deterministic parity rule with a pluggable
//!   [`CornerStrategy`]
//! - **Surfaces**: exterior walls, return quads, top caps, roof and
//!   setback caps, grouped by material id
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use buildfab_geometry::{build, BuildConfig};
//! use buildfab_core::MaterialRegistry;
//!
//! let registry = MaterialRegistry::new();
//! let result = build(&spec, &registry, &BuildConfig::default())?;
//!
//! println!(
//!     "built {} triangles in {} material groups",
//!     result.mesh.triangle_count(),
//!     result.mesh.material_groups.len()
//! );
//! ```
//!
//! ## Determinism
//!
//! `build` is a pure function: equal specs produce byte-equal meshes.
//! Every ordering the pipeline uses (loop order, bay order, center-out
//! extras, corner parity) is total; nothing iterates a hash map on the
//! way to the output.
//!
//! ## Feature Flags
//!
//! - `debug_geometry`: force invariant checks on in release builds
//! - `serde`: serialization for the mesh output and debug info

pub mod builder;
pub mod checks;
pub mod corner;
pub mod depth;
pub mod error;
pub mod frame;
pub mod mesh;
pub mod perimeter;
pub mod polygon;
pub mod roof;
pub mod solver;
pub mod surface;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use builder::{
    build, BuildConfig, BuildResult, BuildStage, CornerDecisionRecord, DebugInfo, Warning,
};
pub use corner::{CornerDecision, CornerSide, CornerStrategy, FaceSlice, OddWins};
pub use depth::{DepthField, DepthSpan};
pub use error::{Error, Result};
pub use frame::{build_frames, FaceFrame, FrameSet};
pub use mesh::{FacadeMesh, MeshBuilder, RoleTag};
pub use perimeter::{build_min_perimeter, MinPerimeter};
pub use solver::{solve_face, FaceSolution, SolvedBay, SolverTrace};
pub use surface::{generate_face_surfaces, FaceContext, MaterialContext};
pub use triangulation::{triangulate_polygon, triangulate_with_hole};
