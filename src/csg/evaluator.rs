// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG tree evaluator - converts a scene tree into boolean-combination trees
//!
//! One tree is built for the main model; every highlight or background
//! subtree is built independently and collected on the side, so overlay
//! content never participates in the main model's boolean operations.

use super::{CsgLeaf, CsgNode, CsgOp};
use crate::scene::{GeometryProvider, SceneKind, SceneNode};
use anyhow::{Context, Result};
use nalgebra::Matrix4;
use std::sync::Arc;

/// Evaluation output: one optional main tree plus overlay trees
#[derive(Debug, Clone, Default)]
pub struct CsgForest {
    pub root: Option<Arc<CsgNode>>,
    pub highlights: Vec<Arc<CsgNode>>,
    pub backgrounds: Vec<Arc<CsgNode>>,
}

/// Builds CSG trees from a scene snapshot through a geometry provider
pub struct CsgTreeEvaluator<'a> {
    provider: &'a dyn GeometryProvider,
    highlights: Vec<Arc<CsgNode>>,
    backgrounds: Vec<Arc<CsgNode>>,
}

impl<'a> CsgTreeEvaluator<'a> {
    pub fn new(provider: &'a dyn GeometryProvider) -> Self {
        Self {
            provider,
            highlights: Vec::new(),
            backgrounds: Vec::new(),
        }
    }

    /// Evaluate a scene tree into a CSG forest
    pub fn evaluate(mut self, root: &SceneNode) -> Result<CsgForest> {
        let root_node = self.build_node(root, &Matrix4::identity())?;
        Ok(CsgForest {
            root: root_node,
            highlights: self.highlights,
            backgrounds: self.backgrounds,
        })
    }

    fn build_node(
        &mut self,
        node: &SceneNode,
        transform: &Matrix4<f64>,
    ) -> Result<Option<Arc<CsgNode>>> {
        match &node.kind {
            SceneKind::Union(children) => self.fold_children(children, transform, CsgOp::Union),

            SceneKind::Difference(children) => {
                self.fold_children(children, transform, CsgOp::Difference)
            }

            SceneKind::Intersection(children) => {
                self.fold_children(children, transform, CsgOp::Intersection)
            }

            SceneKind::Transform { op, children } => {
                let new_transform = transform * op.to_matrix();
                self.fold_children(children, &new_transform, CsgOp::Union)
            }

            SceneKind::Highlight(children) => {
                if let Some(subtree) = self.fold_children(children, transform, CsgOp::Union)? {
                    self.highlights.push(subtree);
                }
                Ok(None)
            }

            SceneKind::Background(children) => {
                if let Some(subtree) = self.fold_children(children, transform, CsgOp::Union)? {
                    self.backgrounds.push(subtree);
                }
                Ok(None)
            }

            SceneKind::Empty => Ok(None),

            kind if kind.is_primitive() => {
                let geometry = self
                    .provider
                    .geometry_for(node)
                    .context("Failed to resolve leaf geometry")?;
                let label = node.id.clone().unwrap_or_else(|| kind_label(kind).to_string());
                Ok(Some(CsgNode::leaf(CsgLeaf::new(label, geometry, *transform))))
            }

            // Covered by is_primitive above; kept for exhaustiveness
            _ => Ok(None),
        }
    }

    /// Fold children left-associatively under one operation.
    ///
    /// Children that produce no CSG node (overlay subtrees, empty nodes) are
    /// skipped, but they are still visited so nested overlay content is
    /// collected. For a difference this means the first geometry-producing
    /// child is the minuend and every later one a subtrahend, in order.
    fn fold_children(
        &mut self,
        children: &[SceneNode],
        transform: &Matrix4<f64>,
        op: CsgOp,
    ) -> Result<Option<Arc<CsgNode>>> {
        let mut result: Option<Arc<CsgNode>> = None;
        for child in children {
            let Some(built) = self.build_node(child, transform)? else {
                continue;
            };
            result = Some(match result {
                None => built,
                Some(acc) => CsgNode::operation(op, acc, built),
            });
        }
        Ok(result)
    }
}

fn kind_label(kind: &SceneKind) -> &'static str {
    match kind {
        SceneKind::Cube { .. } => "cube",
        SceneKind::Sphere { .. } => "sphere",
        SceneKind::Cylinder { .. } => "cylinder",
        SceneKind::Cone { .. } => "cone",
        _ => "group",
    }
}
