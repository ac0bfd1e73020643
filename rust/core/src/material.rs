// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material identifiers and the host-owned registry.
//!
//! The engine treats material ids as opaque keys: it resolves overrides and
//! groups triangles by id, but never interprets what a material looks like.
//! The registry is read-only for the duration of a build.

use rustc_hash::FxHashMap;

/// Opaque material key handed out by the host application's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialId(pub u32);

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mat#{}", self.0)
    }
}

/// Host-side material description. The engine only reads ids; UV scale and
/// naming are renderer concerns carried here so the host has one source of
/// truth.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialInfo {
    pub name: String,
    /// Texture meters-per-tile in (u, v). Applied by the renderer, not the
    /// engine; the engine only decides UV origin and direction.
    pub uv_scale: [f32; 2],
}

/// Read-only map of materials owned by the host application.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: FxHashMap<MaterialId, MaterialInfo>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: MaterialId, info: MaterialInfo) {
        self.materials.insert(id, info);
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        self.materials.contains_key(&id)
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialInfo> {
        self.materials.get(&id)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let mut registry = MaterialRegistry::new();
        registry.insert(
            MaterialId(7),
            MaterialInfo {
                name: "brick".to_string(),
                uv_scale: [2.0, 2.0],
            },
        );

        assert!(registry.contains(MaterialId(7)));
        assert!(!registry.contains(MaterialId(8)));
        assert_eq!(registry.get(MaterialId(7)).unwrap().name, "brick");
    }
}
