// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of the legacy facade description into bay + group form.
//!
//! Older building documents describe a face as "windows every S meters,
//! a column every X windows". The bay model expresses the same rhythm as a
//! repeatable group of fixed-width window bays (plus one column bay), with
//! half-spacing margins at the face ends. The margins are range bays so the
//! layout solver can absorb face lengths that do not divide evenly.

use crate::material::MaterialId;
use crate::spec::{Bay, BayShape, FacadeLayout, RepeatGroup, TextureFlow, WidthSpec};

/// Legacy authoring form of one face.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegacyFacade {
    /// Center-to-center window spacing, meters.
    pub window_spacing_m: f32,
    /// A column bay after every this many windows; 0 disables columns.
    pub columns_every: u16,
    /// Width of a column bay, meters. Ignored when `columns_every` is 0.
    pub column_width_m: f32,
    /// Extrusion depth applied to the whole face.
    pub depth_m: f32,
    pub window_material: Option<MaterialId>,
    pub column_material: Option<MaterialId>,
}

/// Convert a legacy face description into an equivalent [`FacadeLayout`].
///
/// The result has one half-spacing margin bay at each end (min-width range
/// bays, so they stay at exactly half spacing when the face length matches
/// the legacy rhythm and stretch otherwise) and one repeatable group holding
/// the window/column pattern.
pub fn convert_legacy_facade(legacy: &LegacyFacade) -> FacadeLayout {
    let spacing = legacy.window_spacing_m;
    let margin = Bay {
        width: WidthSpec::Range {
            min: spacing / 2.0,
            max: None,
        },
        repeatable: false,
        depth_m: legacy.depth_m,
        shape: BayShape::Square,
        material_override: legacy.window_material,
        texture_flow: TextureFlow::RestartOnNewBay,
    };
    let window = Bay {
        width: WidthSpec::Fixed(spacing),
        repeatable: false,
        depth_m: legacy.depth_m,
        shape: BayShape::Square,
        material_override: legacy.window_material,
        texture_flow: TextureFlow::ContinuousAcrossRepeats,
    };

    let mut bays = Vec::new();
    bays.push(margin.clone());

    let pattern_start = bays.len();
    if legacy.columns_every == 0 {
        bays.push(window);
    } else {
        for _ in 0..legacy.columns_every {
            bays.push(window.clone());
        }
        bays.push(Bay {
            width: WidthSpec::Fixed(legacy.column_width_m),
            repeatable: false,
            depth_m: legacy.depth_m,
            shape: BayShape::Square,
            material_override: legacy.column_material,
            texture_flow: TextureFlow::RestartOnNewBay,
        });
    }
    let pattern_end = bays.len() - 1;

    bays.push(margin);

    FacadeLayout {
        bays,
        groups: vec![RepeatGroup {
            first_bay: pattern_start,
            last_bay: pattern_end,
            repeatable: true,
        }],
        default_material: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_windows() {
        let layout = convert_legacy_facade(&LegacyFacade {
            window_spacing_m: 2.0,
            columns_every: 0,
            column_width_m: 0.0,
            depth_m: 0.0,
            window_material: None,
            column_material: None,
        });

        // margin, window, margin
        assert_eq!(layout.bays.len(), 3);
        assert_eq!(layout.bays[0].width.min_width(), 1.0);
        assert!(layout.bays[0].width.max_width().is_infinite());
        assert_eq!(layout.bays[1].width, WidthSpec::Fixed(2.0));
        assert_eq!(layout.groups, vec![RepeatGroup {
            first_bay: 1,
            last_bay: 1,
            repeatable: true,
        }]);
    }

    #[test]
    fn test_columns_every_three() {
        let layout = convert_legacy_facade(&LegacyFacade {
            window_spacing_m: 1.5,
            columns_every: 3,
            column_width_m: 0.4,
            depth_m: 0.2,
            window_material: Some(MaterialId(1)),
            column_material: Some(MaterialId(2)),
        });

        // margin + 3 windows + column + margin
        assert_eq!(layout.bays.len(), 6);
        assert_eq!(layout.groups[0].first_bay, 1);
        assert_eq!(layout.groups[0].last_bay, 4);
        assert_eq!(layout.bays[4].width, WidthSpec::Fixed(0.4));
        assert_eq!(layout.bays[4].material_override, Some(MaterialId(2)));
        for window in &layout.bays[1..4] {
            assert_eq!(window.width, WidthSpec::Fixed(1.5));
            assert_eq!(window.material_override, Some(MaterialId(1)));
        }
    }
}
