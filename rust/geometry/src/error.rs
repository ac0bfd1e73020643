// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use buildfab_core::FaceId;
use thiserror::Error;

/// Result type for mesh generation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a facade mesh
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid footprint: {0}")]
    InvalidFootprint(String),

    #[error("min-perimeter self-intersects at corner {corner}")]
    InvalidMinPerimeter { corner: usize },

    #[error("face {face}: authored bays need more width than the face has")]
    FacadeTooNarrow { face: FaceId },

    #[error("face {face}: bays cannot stretch or repeat to fill the face")]
    FacadeTooWide { face: FaceId },

    #[error("degenerate triangle {triangle} in output mesh")]
    DegenerateGeometry { triangle: usize },

    #[error("spec error: {0}")]
    Core(#[from] buildfab_core::Error),
}
