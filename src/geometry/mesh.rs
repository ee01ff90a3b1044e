// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation carried by CSG leaves
//!
//! Meshes are produced by a geometry provider and passed through this crate
//! untouched; no boolean computation happens on them here. Placement is not
//! baked into a mesh either: a leaf pairs its mesh with the accumulated
//! transform, and applying it is the renderer's job.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Triangular mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A mesh without triangles carries no renderable geometry
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::empty();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_add_vertex_returns_index() {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex(Vertex::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        let v1 = mesh.add_vertex(Vertex::new(
            Point3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        let v2 = mesh.add_vertex(Vertex::new(
            Point3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        assert_eq!((v0, v1, v2), (0, 1, 2));

        mesh.add_triangle(Triangle::new([v0, v1, v2]));
        assert!(!mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 1);
    }
}
