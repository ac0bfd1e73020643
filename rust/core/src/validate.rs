// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural validation and master/slave resolution.
//!
//! Everything checked here is a property of the spec value tree alone; the
//! geometry crate owns the geometric checks (simple footprint, degenerate
//! edges, offset self-intersection). Missing or ambiguous authoring is an
//! error, never a silent default.

use crate::error::{Error, Result};
use crate::spec::{
    BayShape, BuildingSpec, FaceId, FaceLayout, FacadeLayout, WidthSpec, MIN_BAY_WIDTH_M,
    WEDGE_ANGLE_STEP_DEG,
};
use smallvec::SmallVec;

const FLOOR_HEIGHT_MIN_M: f32 = 1.5;
const FLOOR_HEIGHT_MAX_M: f32 = 20.0;

/// One floor layer with slave faces resolved to their master's layout.
/// Borrows from the spec; the engine never copies a layout per slave.
#[derive(Debug)]
pub struct ResolvedLayer<'a> {
    pub floor_count: u16,
    pub floor_height_m: f32,
    pub default_material: Option<crate::MaterialId>,
    /// Layout per face, indexed by face id. Slaves point at their master's
    /// layout.
    pub layouts: SmallVec<[&'a FacadeLayout; 8]>,
    /// For each face, the face whose layout it uses (itself for masters).
    pub master_of: SmallVec<[FaceId; 8]>,
}

/// Validate a spec and resolve every layer's face linkage.
///
/// Returns one [`ResolvedLayer`] per floor layer, bottom to top.
pub fn resolve_layers(spec: &BuildingSpec) -> Result<Vec<ResolvedLayer<'_>>> {
    if spec.footprint.len() < 3 {
        return Err(Error::FootprintTooSmall(spec.footprint.len()));
    }
    if spec.floor_layers.is_empty() {
        return Err(Error::NoFloorLayers);
    }

    let face_count = spec.footprint.len();
    let mut resolved = Vec::with_capacity(spec.floor_layers.len());

    for (layer_index, layer) in spec.floor_layers.iter().enumerate() {
        if layer.floor_count == 0 {
            return Err(Error::ZeroFloorCount { layer: layer_index });
        }
        if layer.floor_height_m < FLOOR_HEIGHT_MIN_M || layer.floor_height_m > FLOOR_HEIGHT_MAX_M {
            return Err(Error::FloorHeightOutOfRange {
                layer: layer_index,
                height: layer.floor_height_m,
            });
        }

        let mut layouts: SmallVec<[&FacadeLayout; 8]> = SmallVec::with_capacity(face_count);
        let mut master_of: SmallVec<[FaceId; 8]> = SmallVec::with_capacity(face_count);

        for i in 0..face_count {
            let face = FaceId(i as u16);
            let entry = layer.faces.get(&face).ok_or_else(|| Error::InvalidFaceLinkage {
                layer: layer_index,
                face,
                reason: "no layout authored for this face".to_string(),
            })?;

            match entry {
                FaceLayout::Master(layout) => {
                    validate_layout(layer_index, face, layout)?;
                    layouts.push(layout);
                    master_of.push(face);
                }
                FaceLayout::Slave { inherits_from } => {
                    let master = *inherits_from;
                    if master == face {
                        return Err(Error::InvalidFaceLinkage {
                            layer: layer_index,
                            face,
                            reason: "face inherits from itself".to_string(),
                        });
                    }
                    if master.index() >= face_count {
                        return Err(Error::InvalidFaceLinkage {
                            layer: layer_index,
                            face,
                            reason: format!("inherits from nonexistent face {master}"),
                        });
                    }
                    match layer.faces.get(&master) {
                        Some(FaceLayout::Master(layout)) => {
                            validate_layout(layer_index, master, layout)?;
                            layouts.push(layout);
                            master_of.push(master);
                        }
                        Some(FaceLayout::Slave { .. }) => {
                            return Err(Error::InvalidFaceLinkage {
                                layer: layer_index,
                                face,
                                reason: format!(
                                    "inherits from face {master}, which is itself a slave"
                                ),
                            });
                        }
                        None => {
                            return Err(Error::InvalidFaceLinkage {
                                layer: layer_index,
                                face,
                                reason: format!("inherits from unauthored face {master}"),
                            });
                        }
                    }
                }
            }
        }

        // Entries for face ids beyond the footprint are stale authoring.
        for &face in layer.faces.keys() {
            if face.index() >= face_count {
                return Err(Error::InvalidFaceLinkage {
                    layer: layer_index,
                    face,
                    reason: format!(
                        "layout authored for face {face} but the footprint has only {face_count} edges"
                    ),
                });
            }
        }

        resolved.push(ResolvedLayer {
            floor_count: layer.floor_count,
            floor_height_m: layer.floor_height_m,
            default_material: layer.default_material,
            layouts,
            master_of,
        });
    }

    Ok(resolved)
}

fn validate_layout(layer: usize, face: FaceId, layout: &FacadeLayout) -> Result<()> {
    if layout.bays.is_empty() {
        return Err(Error::InvalidBaySpec {
            layer,
            face,
            bay: 0,
            reason: "face layout has no bays".to_string(),
        });
    }

    for (bay_index, bay) in layout.bays.iter().enumerate() {
        let err = |reason: String| Error::InvalidBaySpec {
            layer,
            face,
            bay: bay_index,
            reason,
        };

        match bay.width {
            WidthSpec::Fixed(w) => {
                if w < MIN_BAY_WIDTH_M {
                    return Err(err(format!("fixed width {w} below minimum {MIN_BAY_WIDTH_M} m")));
                }
            }
            WidthSpec::Range { min, max } => {
                if min < MIN_BAY_WIDTH_M {
                    return Err(err(format!("range min {min} below minimum {MIN_BAY_WIDTH_M} m")));
                }
                if let Some(max) = max {
                    if max <= min {
                        return Err(err(format!("range max {max} must exceed min {min}")));
                    }
                }
            }
        }

        if let BayShape::Wedge { angle_deg } = bay.shape {
            if angle_deg <= 0.0 || angle_deg >= 90.0 {
                return Err(err(format!("wedge angle {angle_deg} outside (0, 90)")));
            }
            let steps = angle_deg / WEDGE_ANGLE_STEP_DEG;
            if (steps - steps.round()).abs() > 1e-3 {
                return Err(err(format!(
                    "wedge angle {angle_deg} is not a multiple of {WEDGE_ANGLE_STEP_DEG} degrees"
                )));
            }
        }
    }

    let mut covered = vec![false; layout.bays.len()];
    for (group_index, group) in layout.groups.iter().enumerate() {
        if group.first_bay > group.last_bay || group.last_bay >= layout.bays.len() {
            return Err(Error::InvalidBaySpec {
                layer,
                face,
                bay: group.first_bay,
                reason: format!(
                    "group {group_index} range {}..={} out of bounds for {} bays",
                    group.first_bay,
                    group.last_bay,
                    layout.bays.len()
                ),
            });
        }
        for i in group.first_bay..=group.last_bay {
            if covered[i] {
                return Err(Error::InvalidBaySpec {
                    layer,
                    face,
                    bay: i,
                    reason: "bay belongs to more than one repeat group".to_string(),
                });
            }
            covered[i] = true;
        }
    }

    Ok(())
}
