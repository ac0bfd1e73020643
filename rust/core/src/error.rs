// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::spec::FaceId;
use thiserror::Error;

/// Result type for spec validation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating an authoring spec
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("footprint needs at least 3 points, got {0}")]
    FootprintTooSmall(usize),

    #[error("building needs at least one floor layer")]
    NoFloorLayers,

    #[error("layer {layer}: floor count must be at least 1")]
    ZeroFloorCount { layer: usize },

    #[error("layer {layer}: floor height {height} outside [1.5, 20.0] m")]
    FloorHeightOutOfRange { layer: usize, height: f32 },

    #[error("layer {layer}, face {face}: {reason}")]
    InvalidFaceLinkage {
        layer: usize,
        face: FaceId,
        reason: String,
    },

    #[error("layer {layer}, face {face}, bay {bay}: {reason}")]
    InvalidBaySpec {
        layer: usize,
        face: FaceId,
        bay: usize,
        reason: String,
    },
}

impl Error {
    /// Face the error should be routed to in the authoring UI, if any.
    pub fn face(&self) -> Option<FaceId> {
        match self {
            Error::InvalidFaceLinkage { face, .. } | Error::InvalidBaySpec { face, .. } => {
                Some(*face)
            }
            _ => None,
        }
    }
}
