// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene tree definitions
//!
//! The scene tree is the input to product compilation. How it is produced
//! (parser, editor, generator) is not this crate's concern; snapshots travel
//! as plain serde values.

use serde::{Deserialize, Serialize};

/// 3D Vector type alias
pub type Vec3 = nalgebra::Vector3<f64>;

/// Scene node representing a single operation or primitive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub kind: SceneKind,
    pub id: Option<String>,
}

impl SceneNode {
    pub fn new(kind: SceneKind) -> Self {
        Self { kind, id: None }
    }

    pub fn with_id(kind: SceneKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
        }
    }
}

/// Types of scene nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SceneKind {
    // Primitives
    Cube {
        size: Vec3,
        center: bool,
    },
    Sphere {
        r: f64,
        fn_: u32,
    },
    Cylinder {
        h: f64,
        r: f64,
        fn_: u32,
    },
    Cone {
        h: f64,
        r1: f64,
        r2: f64,
        fn_: u32,
    },

    // Boolean operations
    Union(Vec<SceneNode>),
    Difference(Vec<SceneNode>),
    Intersection(Vec<SceneNode>),

    // Transformations
    Transform {
        op: TransformOp,
        children: Vec<SceneNode>,
    },

    // Overlay markers: content rendered as separate layers, never combined
    // with the main model
    Highlight(Vec<SceneNode>),
    Background(Vec<SceneNode>),

    // Empty node
    Empty,
}

impl SceneKind {
    /// Get child nodes
    pub fn get_children(&self) -> Vec<&SceneNode> {
        match self {
            SceneKind::Union(children) => children.iter().collect(),
            SceneKind::Difference(children) => children.iter().collect(),
            SceneKind::Intersection(children) => children.iter().collect(),
            SceneKind::Transform { children, .. } => children.iter().collect(),
            SceneKind::Highlight(children) => children.iter().collect(),
            SceneKind::Background(children) => children.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Whether this node is a geometry-bearing primitive
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SceneKind::Cube { .. }
                | SceneKind::Sphere { .. }
                | SceneKind::Cylinder { .. }
                | SceneKind::Cone { .. }
        )
    }
}

/// Transformation operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransformOp {
    Translate(Vec3),
    Rotate(Vec3),
    Scale(Vec3),
    Mirror(Vec3),
    Multmatrix(nalgebra::Matrix4<f64>),
}

impl TransformOp {
    /// Convert transformation to a 4x4 matrix
    pub fn to_matrix(&self) -> nalgebra::Matrix4<f64> {
        use nalgebra::{Matrix4, UnitQuaternion, Vector3};

        match self {
            TransformOp::Translate(v) => Matrix4::new_translation(v),
            TransformOp::Rotate(angles) => {
                let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angles.x.to_radians());
                let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angles.y.to_radians());
                let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angles.z.to_radians());
                (rz * ry * rx).to_homogeneous()
            }
            TransformOp::Scale(s) => Matrix4::new_nonuniform_scaling(s),
            TransformOp::Mirror(axis) => {
                let mut m = Matrix4::identity();
                if axis.x != 0.0 {
                    m[(0, 0)] = -1.0;
                }
                if axis.y != 0.0 {
                    m[(1, 1)] = -1.0;
                }
                if axis.z != 0.0 {
                    m[(2, 2)] = -1.0;
                }
                m
            }
            TransformOp::Multmatrix(m) => *m,
        }
    }
}
