// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry providers
//!
//! A provider resolves a primitive scene node to its renderable mesh.
//! Providers must be idempotent within one compile: repeated queries for the
//! same node return the same geometry without recomputation.

use super::{SceneKind, SceneNode};
use crate::geometry::{Mesh, Primitive};
use anyhow::{bail, Context, Result};
use dashmap::DashMap;
use std::sync::Arc;

/// Resolves scene leaves to externally computed geometry
pub trait GeometryProvider {
    /// Return the mesh for a geometry-bearing scene node.
    ///
    /// Identical queries within one compile must return the same `Arc`, so
    /// that shared leaves keep a single geometry identity across the main
    /// tree and overlay trees.
    fn geometry_for(&self, node: &SceneNode) -> Result<Arc<Mesh>>;
}

/// Provider backed by the built-in primitive generators with a memo cache
///
/// The cache key is the serialized node kind, so structurally identical
/// primitives share one mesh instance regardless of node identity.
pub struct MeshProvider {
    cache: DashMap<String, Arc<Mesh>>,
}

impl MeshProvider {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Number of distinct meshes computed so far
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    fn build_mesh(kind: &SceneKind) -> Result<Mesh> {
        let mesh = match kind {
            SceneKind::Cube { size, center } => Primitive::cube(*size, *center).to_mesh(),
            SceneKind::Sphere { r, fn_ } => Primitive::sphere(*r, *fn_).to_mesh(),
            SceneKind::Cylinder { h, r, fn_ } => Primitive::cylinder(*h, *r, *fn_).to_mesh(),
            SceneKind::Cone { h, r1, r2, fn_ } => Primitive::cone(*h, *r1, *r2, *fn_).to_mesh(),
            SceneKind::Empty => Mesh::empty(),
            other => bail!("node is not geometry-bearing: {:?}", other),
        };
        Ok(mesh)
    }
}

impl GeometryProvider for MeshProvider {
    fn geometry_for(&self, node: &SceneNode) -> Result<Arc<Mesh>> {
        let key = serde_json::to_string(&node.kind).context("Failed to key geometry cache")?;

        if let Some(mesh) = self.cache.get(&key) {
            return Ok(mesh.clone());
        }

        let mesh = Arc::new(Self::build_mesh(&node.kind)?);
        self.cache.insert(key, mesh.clone());
        Ok(mesh)
    }
}

impl Default for MeshProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Vec3;

    #[test]
    fn test_identical_primitives_share_geometry() {
        let provider = MeshProvider::new();
        let a = SceneNode::new(SceneKind::Sphere { r: 5.0, fn_: 16 });
        let b = SceneNode::new(SceneKind::Sphere { r: 5.0, fn_: 16 });

        let mesh_a = provider.geometry_for(&a).unwrap();
        let mesh_b = provider.geometry_for(&b).unwrap();
        assert!(Arc::ptr_eq(&mesh_a, &mesh_b));
        assert_eq!(provider.cached_count(), 1);
    }

    #[test]
    fn test_distinct_primitives_get_distinct_geometry() {
        let provider = MeshProvider::new();
        let a = SceneNode::new(SceneKind::Cube {
            size: Vec3::new(1.0, 1.0, 1.0),
            center: false,
        });
        let b = SceneNode::new(SceneKind::Cube {
            size: Vec3::new(2.0, 1.0, 1.0),
            center: false,
        });

        let mesh_a = provider.geometry_for(&a).unwrap();
        let mesh_b = provider.geometry_for(&b).unwrap();
        assert!(!Arc::ptr_eq(&mesh_a, &mesh_b));
    }

    #[test]
    fn test_boolean_group_is_rejected() {
        let provider = MeshProvider::new();
        let group = SceneNode::new(SceneKind::Union(vec![]));
        assert!(provider.geometry_for(&group).is_err());
    }
}
