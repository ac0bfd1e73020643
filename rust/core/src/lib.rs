// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Buildfab Core
//!
//! Authoring data model for the buildfab facade mesh engine.
//!
//! ## Overview
//!
//! This crate holds everything the authoring UI produces and the geometry
//! crate consumes:
//!
//! - **Building spec**: footprint loop, floor layers, per-face bay layouts
//! - **Materials**: opaque ids plus the host-owned read-only registry
//! - **Validation**: structural checks and master/slave face resolution
//! - **Legacy import**: "windows + spacing + columns" to bay/group form
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use buildfab_core::{BuildingSpec, resolve_layers};
//!
//! let spec: BuildingSpec = author_building();
//! let layers = resolve_layers(&spec)?;
//! for layer in &layers {
//!     println!("{} faces resolved", layer.layouts.len());
//! }
//! ```
//!
//! The spec is an immutable value tree. Derived geometry (face frames, the
//! min-perimeter, solved bays, the mesh) lives in `buildfab-geometry`.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the authoring types

pub mod error;
pub mod legacy;
pub mod material;
pub mod spec;
pub mod validate;

pub use error::{Error, Result};
pub use legacy::{convert_legacy_facade, LegacyFacade};
pub use material::{MaterialId, MaterialInfo, MaterialRegistry};
pub use spec::{
    Bay, BayShape, BuildingSpec, FaceId, FaceLayout, FacadeLayout, FloorLayer, RepeatGroup,
    RoofLayer, TextureFlow, WidthSpec, MIN_BAY_WIDTH_M, WEDGE_ANGLE_STEP_DEG,
};
pub use validate::{resolve_layers, ResolvedLayer};
