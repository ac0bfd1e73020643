// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bay layout solver.
//!
//! Partitions a face's tangent extent into concrete bay widths. Every
//! decision is a deterministic function of (layout, face length): group
//! repeats grow greedily smallest-first, local extras are placed center-out
//! and only when the sequence could not otherwise reach the face length,
//! and the remaining slack is distributed equally among growable bays.

use crate::error::{Error, Result};
use buildfab_core::{BayShape, FaceId, FacadeLayout, MaterialId, TextureFlow};

/// Widths closer than this count as equal.
pub const WIDTH_EPSILON: f64 = 1e-6;

/// A bay with its concrete width and position on the face.
#[derive(Debug, Clone)]
pub struct SolvedBay {
    /// Index of the authored bay this instance came from.
    pub source_index: usize,
    /// Authored group index and repetition number, for grouped bays.
    pub group: Option<(usize, usize)>,
    pub u0: f64,
    pub width: f64,
    /// Extrusion depth, clamped to be non-negative.
    pub depth: f64,
    pub shape: BayShape,
    pub material_override: Option<MaterialId>,
    pub texture_flow: TextureFlow,
}

impl SolvedBay {
    #[inline]
    pub fn u1(&self) -> f64 {
        self.u0 + self.width
    }

    #[inline]
    pub fn center(&self) -> f64 {
        self.u0 + self.width / 2.0
    }
}

/// Debug record of the decisions the solver took for one face.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverTrace {
    /// Repeats added per authored group (beyond the seed occurrence).
    pub group_repeats: Vec<usize>,
    /// Source bay index of each local extra, in placement order.
    pub extras: Vec<usize>,
    /// Rounds of remainder distribution.
    pub distribution_rounds: usize,
}

/// Result of solving one face.
#[derive(Debug)]
pub struct FaceSolution {
    pub bays: Vec<SolvedBay>,
    pub trace: SolverTrace,
    /// Whether any authored depth was negative and clamped to zero.
    pub depth_clamped: bool,
}

/// Working copy of one bay instance during solving.
#[derive(Debug, Clone)]
struct WorkBay {
    source: usize,
    group: Option<(usize, usize)>,
    width: f64,
    min: f64,
    max: f64,
}

/// Solve the bay layout of one face.
pub fn solve_face(face: FaceId, layout: &FacadeLayout, length: f64) -> Result<FaceSolution> {
    let mut trace = SolverTrace {
        group_repeats: vec![0; layout.groups.len()],
        ..Default::default()
    };

    // Seed: every authored bay once, at minimum width.
    let mut seq: Vec<WorkBay> = layout
        .bays
        .iter()
        .enumerate()
        .map(|(i, bay)| WorkBay {
            source: i,
            group: group_of(layout, i).map(|g| (g, 0)),
            width: bay.width.min_width(),
            min: bay.width.min_width(),
            max: bay.width.max_width(),
        })
        .collect();

    let mut total_min: f64 = seq.iter().map(|b| b.min).sum();
    if total_min > length + WIDTH_EPSILON {
        return Err(Error::FacadeTooNarrow { face });
    }

    // Grow groups: add whole-pattern repeats while one still fits, always
    // the cheapest group first, ties by lower group index.
    loop {
        let mut best: Option<(usize, f64)> = None;
        for (g, group) in layout.groups.iter().enumerate() {
            if !group.repeatable {
                continue;
            }
            let pattern_min: f64 = (group.first_bay..=group.last_bay)
                .map(|i| layout.bays[i].width.min_width())
                .sum();
            if total_min + pattern_min > length + WIDTH_EPSILON {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, width)) => pattern_min < width - WIDTH_EPSILON,
            };
            if better {
                best = Some((g, pattern_min));
            }
        }

        let Some((g, pattern_min)) = best else { break };
        let group = &layout.groups[g];
        trace.group_repeats[g] += 1;
        let rep = trace.group_repeats[g];

        // Insert the new occurrence right after the group's last instance
        // so repetitions stay contiguous.
        let insert_at = seq
            .iter()
            .rposition(|b| matches!(b.group, Some((gi, _)) if gi == g))
            .map(|i| i + 1)
            .expect("group has a seed occurrence");
        let pattern: Vec<WorkBay> = (group.first_bay..=group.last_bay)
            .map(|i| WorkBay {
                source: i,
                group: Some((g, rep)),
                width: layout.bays[i].width.min_width(),
                min: layout.bays[i].width.min_width(),
                max: layout.bays[i].width.max_width(),
            })
            .collect();
        seq.splice(insert_at..insert_at, pattern);
        total_min += pattern_min;
    }

    // Grow local repeats, center-out, but only while the sequence cannot
    // stretch to the face length on widths alone.
    loop {
        let max_total: f64 = seq.iter().map(|b| b.max).sum();
        if max_total >= length - WIDTH_EPSILON {
            break;
        }

        // Candidates: instances of repeatable bays outside groups whose
        // extra minimum width still fits. Widths are all at minimum here,
        // so center-out distance is measured on the packed sequence; the
        // stretch that follows preserves relative positions.
        let sequence_mid = total_min / 2.0;
        let mut prefix = 0.0;
        let mut best: Option<(f64, usize)> = None;
        for (i, bay) in seq.iter().enumerate() {
            let center = prefix + bay.width / 2.0;
            prefix += bay.width;
            if bay.group.is_some() || !layout.bays[bay.source].repeatable {
                continue;
            }
            if total_min + bay.min > length + WIDTH_EPSILON {
                continue;
            }
            let distance = (center - sequence_mid).abs();
            let better = match best {
                None => true,
                Some((d, _)) => distance < d - WIDTH_EPSILON,
            };
            if better {
                best = Some((distance, i));
            }
        }

        let Some((_, i)) = best else {
            return Err(Error::FacadeTooWide { face });
        };
        let clone = WorkBay {
            width: seq[i].min,
            ..seq[i].clone()
        };
        trace.extras.push(clone.source);
        total_min += clone.min;
        seq.insert(i + 1, clone);
    }

    // Distribute the remainder equally over growable bays, round by round
    // so capped bays hand their share back.
    let mut remainder = length - seq.iter().map(|b| b.width).sum::<f64>();
    while remainder > WIDTH_EPSILON {
        let growable = seq
            .iter()
            .filter(|b| b.width < b.max - WIDTH_EPSILON)
            .count();
        if growable == 0 {
            return Err(Error::FacadeTooWide { face });
        }
        let share = remainder / growable as f64;
        let mut granted = 0.0;
        for bay in seq.iter_mut() {
            if bay.width < bay.max - WIDTH_EPSILON {
                let grant = share.min(bay.max - bay.width);
                bay.width += grant;
                granted += grant;
            }
        }
        if granted <= WIDTH_EPSILON * 0.5 {
            return Err(Error::FacadeTooWide { face });
        }
        remainder -= granted;
        trace.distribution_rounds += 1;
    }

    // Snap the accumulated float error onto the last bay.
    let sum: f64 = seq.iter().map(|b| b.width).sum();
    if let Some(last) = seq.last_mut() {
        last.width += length - sum;
    }

    let mut depth_clamped = false;
    let mut bays = Vec::with_capacity(seq.len());
    let mut u = 0.0;
    for work in &seq {
        let authored = &layout.bays[work.source];
        let depth = authored.depth_m as f64;
        let depth = if depth < 0.0 {
            depth_clamped = true;
            0.0
        } else {
            depth
        };
        bays.push(SolvedBay {
            source_index: work.source,
            group: work.group,
            u0: u,
            width: work.width,
            depth,
            shape: authored.shape,
            material_override: authored.material_override,
            texture_flow: authored.texture_flow,
        });
        u += work.width;
    }

    Ok(FaceSolution {
        bays,
        trace,
        depth_clamped,
    })
}

fn group_of(layout: &FacadeLayout, bay: usize) -> Option<usize> {
    layout.groups.iter().position(|g| g.contains(bay))
}
