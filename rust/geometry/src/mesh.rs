// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh output and the vertex-welding builder.

use buildfab_core::MaterialId;
use nalgebra::{Point3, Vector2};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// What a triangle is part of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoleTag {
    WallExterior,
    WallReturn,
    TopCap,
    Roof,
    SetbackCap,
}

/// Frozen triangle mesh: the engine's only output.
///
/// Positions and UVs are flat interleaved buffers (x, y, z and u, v).
/// Triangles wind counter-clockwise seen from outside. Material groups map
/// each material to the triangles it covers; the map is ordered so
/// iteration is deterministic.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacadeMesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex UVs (u, v), same vertex count as positions
    pub uvs: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
    /// Per-triangle role tag
    pub tags: Vec<RoleTag>,
    /// Material id -> triangle indices
    pub material_groups: BTreeMap<MaterialId, Vec<u32>>,
}

impl FacadeMesh {
    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of vertex `i`
    #[inline]
    pub fn position(&self, i: u32) -> Point3<f32> {
        let base = i as usize * 3;
        Point3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    /// Corner positions of triangle `t`
    #[inline]
    pub fn triangle(&self, t: usize) -> [Point3<f32>; 3] {
        let base = t * 3;
        [
            self.position(self.indices[base]),
            self.position(self.indices[base + 1]),
            self.position(self.indices[base + 2]),
        ]
    }

    /// Number of triangles carrying a tag
    pub fn count_tagged(&self, tag: RoleTag) -> usize {
        self.tags.iter().filter(|t| **t == tag).count()
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }
}

/// Welding quantum for positions and UVs, meters.
const WELD_EPSILON: f64 = 1e-6;

#[derive(PartialEq, Eq, Hash, Clone, Copy)]
struct VertexKey {
    x: i64,
    y: i64,
    z: i64,
    u: i64,
    v: i64,
}

fn quantize(v: f64) -> i64 {
    (v / WELD_EPSILON).round() as i64
}

/// Accumulates vertices and triangles during a build, welding vertices that
/// agree in both position and UV. Seam vertices (same position, different
/// UV) stay distinct on purpose; watertightness is positional.
#[derive(Default)]
pub struct MeshBuilder {
    positions: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
    tags: Vec<RoleTag>,
    material_groups: BTreeMap<MaterialId, Vec<u32>>,
    weld: FxHashMap<VertexKey, u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with vertex/index capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            uvs: Vec::with_capacity(vertex_count * 2),
            indices: Vec::with_capacity(index_count),
            tags: Vec::with_capacity(index_count / 3),
            material_groups: BTreeMap::new(),
            weld: FxHashMap::default(),
        }
    }

    /// Add (or reuse) a vertex. Returns its index.
    pub fn add_vertex(&mut self, position: Point3<f64>, uv: Vector2<f64>) -> u32 {
        let key = VertexKey {
            x: quantize(position.x),
            y: quantize(position.y),
            z: quantize(position.z),
            u: quantize(uv.x),
            v: quantize(uv.y),
        };
        if let Some(&index) = self.weld.get(&key) {
            return index;
        }

        let index = (self.positions.len() / 3) as u32;
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);
        self.uvs.push(uv.x as f32);
        self.uvs.push(uv.y as f32);
        self.weld.insert(key, index);
        index
    }

    /// Add a triangle with its role and material.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32, tag: RoleTag, material: MaterialId) {
        let triangle_index = (self.indices.len() / 3) as u32;
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
        self.tags.push(tag);
        self.material_groups
            .entry(material)
            .or_default()
            .push(triangle_index);
    }

    /// Add a planar quad (a, b, c, d) in counter-clockwise order seen from
    /// its front side.
    pub fn add_quad(
        &mut self,
        quad: [(Point3<f64>, Vector2<f64>); 4],
        tag: RoleTag,
        material: MaterialId,
    ) {
        let [a, b, c, d] = quad;
        let ia = self.add_vertex(a.0, a.1);
        let ib = self.add_vertex(b.0, b.1);
        let ic = self.add_vertex(c.0, c.1);
        let id = self.add_vertex(d.0, d.1);
        self.add_triangle(ia, ib, ic, tag, material);
        self.add_triangle(ia, ic, id, tag, material);
    }

    /// Get current vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get current triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Freeze into the immutable output mesh.
    pub fn freeze(self) -> FacadeMesh {
        FacadeMesh {
            positions: self.positions,
            uvs: self.uvs,
            indices: self.indices,
            tags: self.tags,
            material_groups: self.material_groups,
        }
    }
}
