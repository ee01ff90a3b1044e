// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG tree node definitions
//!
//! A `CsgNode` tree is built by the evaluator from a scene snapshot and
//! rewritten by the normalizer. Nodes are immutable once built and shared
//! through `Arc`: the same leaf geometry may appear in the main tree and in
//! overlay trees without duplication.

use crate::geometry::Mesh;
use nalgebra::Matrix4;
use std::fmt;
use std::sync::Arc;

/// Boolean operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Intersection,
    Difference,
}

impl CsgOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CsgOp::Union => "+",
            CsgOp::Intersection => "*",
            CsgOp::Difference => "-",
        }
    }
}

/// Reference to externally computed geometry plus its placement
#[derive(Debug, Clone)]
pub struct CsgLeaf {
    pub label: String,
    pub geometry: Arc<Mesh>,
    pub transform: Matrix4<f64>,
}

impl CsgLeaf {
    pub fn new(label: impl Into<String>, geometry: Arc<Mesh>, transform: Matrix4<f64>) -> Self {
        Self {
            label: label.into(),
            geometry,
            transform,
        }
    }
}

// Leaf identity is geometry identity plus placement. Two leaves resolved
// from the provider's cache compare equal exactly when they reference the
// same mesh instance at the same position.
impl PartialEq for CsgLeaf {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.geometry, &other.geometry) && self.transform == other.transform
    }
}

/// A node of the boolean-combination tree
#[derive(Debug, Clone)]
pub enum CsgNode {
    Leaf(CsgLeaf),
    Operation {
        op: CsgOp,
        left: Arc<CsgNode>,
        right: Arc<CsgNode>,
    },
}

impl CsgNode {
    pub fn leaf(leaf: CsgLeaf) -> Arc<Self> {
        Arc::new(CsgNode::Leaf(leaf))
    }

    pub fn operation(op: CsgOp, left: Arc<CsgNode>, right: Arc<CsgNode>) -> Arc<Self> {
        Arc::new(CsgNode::Operation { op, left, right })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, CsgNode::Leaf(_))
    }

    /// Total node count (operations plus leaves)
    pub fn node_count(&self) -> usize {
        match self {
            CsgNode::Leaf(_) => 1,
            CsgNode::Operation { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Number of leaf occurrences
    pub fn leaf_count(&self) -> usize {
        match self {
            CsgNode::Leaf(_) => 1,
            CsgNode::Operation { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

impl PartialEq for CsgNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CsgNode::Leaf(a), CsgNode::Leaf(b)) => a == b,
            (
                CsgNode::Operation { op, left, right },
                CsgNode::Operation {
                    op: other_op,
                    left: other_left,
                    right: other_right,
                },
            ) => op == other_op && left == other_left && right == other_right,
            _ => false,
        }
    }
}

impl fmt::Display for CsgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsgNode::Leaf(leaf) => write!(f, "{}", leaf.label),
            CsgNode::Operation { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}
