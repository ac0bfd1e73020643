// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authoring-time building description.
//!
//! The spec is an immutable value tree: the authoring UI produces it, the
//! geometry crate consumes it. Nothing in here owns derived geometry; faces
//! are addressed by [`FaceId`] (footprint edge index, displayed A, B, C, …)
//! and floor layers stack bottom-to-top.

use crate::material::MaterialId;
use std::collections::BTreeMap;

/// Minimum authored bay width in meters.
pub const MIN_BAY_WIDTH_M: f32 = 0.1;

/// Authoring constraint: wedge angles snap to this grid.
pub const WEDGE_ANGLE_STEP_DEG: f32 = 15.0;

/// Stable face identifier: the footprint edge index. Face 0 is the edge from
/// footprint point 0 to point 1, and so on in loop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceId(pub u16);

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FaceId {
    /// Spreadsheet-style letters: A..Z, then AA, AB, …
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut n = self.0 as u32;
        let mut letters = [0u8; 4];
        let mut len = 0;
        loop {
            letters[len] = b'A' + (n % 26) as u8;
            len += 1;
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        for i in (0..len).rev() {
            write!(f, "{}", letters[i] as char)?;
        }
        Ok(())
    }
}

/// Width constraint for a single bay.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WidthSpec {
    /// Exactly this wide, always.
    Fixed(f32),
    /// At least `min`, at most `max`; `None` means unbounded.
    Range { min: f32, max: Option<f32> },
}

impl WidthSpec {
    /// Smallest width this bay can take.
    pub fn min_width(&self) -> f64 {
        match *self {
            WidthSpec::Fixed(w) => w as f64,
            WidthSpec::Range { min, .. } => min as f64,
        }
    }

    /// Largest width this bay can take (`f64::INFINITY` when unbounded).
    pub fn max_width(&self) -> f64 {
        match *self {
            WidthSpec::Fixed(w) => w as f64,
            WidthSpec::Range { max: Some(m), .. } => m as f64,
            WidthSpec::Range { max: None, .. } => f64::INFINITY,
        }
    }
}

/// Plan-view shape of a bay's extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BayShape {
    /// Rectangular step: return quads at both depth breakpoints.
    Square,
    /// The left vertical edge slants by `angle_deg` in the plan (u, n)
    /// plane, replacing the return quad on that side.
    Wedge { angle_deg: f32 },
}

/// UV u-origin policy across bay and group boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureFlow {
    /// UV u starts at 0 at the bay's left edge.
    RestartOnNewBay,
    /// UV u runs continuously across a repeat group's occurrences and
    /// resets at the group boundary.
    ContinuousAcrossRepeats,
    /// Continue UV u from the left neighbour when it resolves to the same
    /// material. No-op on the leftmost bay.
    OverflowLeft,
    /// Continue UV u into the right neighbour when it resolves to the same
    /// material. No-op on the rightmost bay.
    OverflowRight,
}

/// One bay: a contiguous span of a face at one floor layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bay {
    pub width: WidthSpec,
    /// Whether the solver may clone this bay to fill a long face.
    pub repeatable: bool,
    /// Extrusion along the face's outward normal, meters. Negative authored
    /// values are clamped to zero with a warning at build time.
    pub depth_m: f32,
    pub shape: BayShape,
    /// Overrides the face/layer/building default material.
    pub material_override: Option<MaterialId>,
    pub texture_flow: TextureFlow,
}

impl Bay {
    /// A flat, fixed-width, square bay with no overrides. The common case
    /// for unadorned faces.
    pub fn flat(width_m: f32) -> Self {
        Self {
            width: WidthSpec::Fixed(width_m),
            repeatable: false,
            depth_m: 0.0,
            shape: BayShape::Square,
            material_override: None,
            texture_flow: TextureFlow::RestartOnNewBay,
        }
    }
}

/// An ordered contiguous run of bays the solver repeats as one unit.
/// `first_bay..=last_bay` index into the owning layout's bay list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepeatGroup {
    pub first_bay: usize,
    pub last_bay: usize,
    pub repeatable: bool,
}

impl RepeatGroup {
    pub fn len(&self) -> usize {
        self.last_bay - self.first_bay + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, bay: usize) -> bool {
        bay >= self.first_bay && bay <= self.last_bay
    }
}

/// A master face's full bay layout for one floor layer.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacadeLayout {
    pub bays: Vec<Bay>,
    pub groups: Vec<RepeatGroup>,
    /// Default material for bays on this face without an override.
    pub default_material: Option<MaterialId>,
}

impl FacadeLayout {
    /// Layout with a single flat bay covering the whole face.
    pub fn flat(width_m: f32) -> Self {
        Self {
            bays: vec![Bay::flat(width_m)],
            groups: Vec::new(),
            default_material: None,
        }
    }
}

/// A face either owns its layout or inherits one from a master face in the
/// same layer. Slaves never store a duplicate payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaceLayout {
    Master(FacadeLayout),
    Slave { inherits_from: FaceId },
}

/// A run of identical floors sharing one facade layout per face.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorLayer {
    /// Number of floors in this layer, >= 1.
    pub floor_count: u16,
    /// Height of each floor, meters, in [1.5, 20.0].
    pub floor_height_m: f32,
    /// Default material for faces without their own default.
    pub default_material: Option<MaterialId>,
    /// One entry per footprint edge. Ordered map: iteration order is face
    /// id order, never hash order.
    pub faces: BTreeMap<FaceId, FaceLayout>,
}

impl FloorLayer {
    /// Total height of the layer in meters.
    pub fn height_m(&self) -> f64 {
        self.floor_count as f64 * self.floor_height_m as f64
    }
}

/// Roof description. The roof surface itself is derived (the topmost
/// layer's min-perimeter); authoring only picks its material.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoofLayer {
    pub material: Option<MaterialId>,
}

/// The complete authoring-time description of one building.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingSpec {
    /// Ground-plane footprint loop, meters, counter-clockwise viewed from
    /// above, simple, length >= 3. Point order defines face ids.
    pub footprint: Vec<[f64; 2]>,
    /// Floor layers, bottom to top, length >= 1.
    pub floor_layers: Vec<FloorLayer>,
    pub roof: RoofLayer,
    /// Building-wide fallback material.
    pub default_material: MaterialId,
}

impl BuildingSpec {
    /// Number of faces (= footprint edges).
    pub fn face_count(&self) -> usize {
        self.footprint.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_id_display() {
        assert_eq!(FaceId(0).to_string(), "A");
        assert_eq!(FaceId(3).to_string(), "D");
        assert_eq!(FaceId(25).to_string(), "Z");
        assert_eq!(FaceId(26).to_string(), "AA");
        assert_eq!(FaceId(27).to_string(), "AB");
    }

    #[test]
    fn test_width_spec_bounds() {
        assert_eq!(WidthSpec::Fixed(2.0).min_width(), 2.0);
        assert_eq!(WidthSpec::Fixed(2.0).max_width(), 2.0);

        let range = WidthSpec::Range {
            min: 1.0,
            max: Some(5.0),
        };
        assert_eq!(range.min_width(), 1.0);
        assert_eq!(range.max_width(), 5.0);

        let unbounded = WidthSpec::Range {
            min: 1.0,
            max: None,
        };
        assert!(unbounded.max_width().is_infinite());
    }

    #[test]
    fn test_repeat_group_range() {
        let group = RepeatGroup {
            first_bay: 1,
            last_bay: 3,
            repeatable: true,
        };
        assert_eq!(group.len(), 3);
        assert!(group.contains(2));
        assert!(!group.contains(0));
        assert!(!group.contains(4));
    }
}
