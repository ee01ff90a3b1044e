// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flattened CSG products
//!
//! A normalized tree is imported into an ordered list of products, one per
//! union branch. Each product is an ordered chain of (operation, leaf)
//! entries the renderer composites in sequence; chain order is part of the
//! boolean semantics and is never reordered here.

use super::{CsgLeaf, CsgNode, CsgOp};
use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;

/// Chain entry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOp {
    /// First entry of a chain
    Start,
    Intersect,
    Subtract,
}

impl ChainOp {
    fn from_csg(op: CsgOp) -> Self {
        match op {
            // Unions are split into separate products before chains are
            // walked, so only chain operations reach this point.
            CsgOp::Union | CsgOp::Intersection => ChainOp::Intersect,
            CsgOp::Difference => ChainOp::Subtract,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ChainOp::Start => "",
            ChainOp::Intersect => "*",
            ChainOp::Subtract => "-",
        }
    }
}

/// One (operation, leaf) step of a product chain
#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub op: ChainOp,
    pub leaf: CsgLeaf,
}

/// One flattened intersection/difference chain
#[derive(Debug, Clone, Default)]
pub struct Product {
    pub chain: Vec<ChainEntry>,
}

impl Product {
    fn from_branch(node: &CsgNode) -> Self {
        let mut product = Product::default();
        product.push_chain(node, ChainOp::Start);
        product
    }

    fn push_chain(&mut self, node: &CsgNode, incoming: ChainOp) {
        match node {
            CsgNode::Leaf(leaf) => self.chain.push(ChainEntry {
                op: incoming,
                leaf: leaf.clone(),
            }),
            CsgNode::Operation { op, left, right } => {
                self.push_chain(left, incoming);
                self.push_chain(right, ChainOp::from_csg(*op));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.chain.iter().enumerate() {
            if i == 0 {
                write!(f, "{}", entry.leaf.label)?;
            } else {
                write!(f, " {} {}", entry.op.symbol(), entry.leaf.label)?;
            }
        }
        Ok(())
    }
}

/// Ordered collection of products ready for rendering
#[derive(Debug, Clone, Default)]
pub struct CsgProducts {
    pub products: Vec<Product>,
}

impl CsgProducts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the products of one normalized tree.
    ///
    /// Import is additive: calling it for several trees accumulates their
    /// products in supply order, which is how the overlay categories merge
    /// multiple subtrees into one product set.
    pub fn import(&mut self, node: &Arc<CsgNode>) {
        Self::collect_branches(node, &mut self.products);
    }

    fn collect_branches(node: &CsgNode, out: &mut Vec<Product>) {
        match node {
            CsgNode::Operation {
                op: CsgOp::Union,
                left,
                right,
            } => {
                Self::collect_branches(left, out);
                Self::collect_branches(right, out);
            }
            other => out.push(Product::from_branch(other)),
        }
    }

    /// Total product count across all imports
    pub fn size(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Multiset of leaf labels across all products
    pub fn leaf_counts(&self) -> AHashMap<String, usize> {
        let mut counts = AHashMap::new();
        for product in &self.products {
            for entry in &product.chain {
                *counts.entry(entry.leaf.label.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use nalgebra::Matrix4;

    fn leaf(label: &str) -> Arc<CsgNode> {
        CsgNode::leaf(CsgLeaf::new(
            label,
            Arc::new(Mesh::empty()),
            Matrix4::identity(),
        ))
    }

    fn op(op: CsgOp, left: Arc<CsgNode>, right: Arc<CsgNode>) -> Arc<CsgNode> {
        CsgNode::operation(op, left, right)
    }

    #[test]
    fn test_single_leaf_is_one_product() {
        let mut products = CsgProducts::new();
        products.import(&leaf("a"));
        assert_eq!(products.size(), 1);
        assert_eq!(products.products[0].chain.len(), 1);
        assert_eq!(products.products[0].chain[0].op, ChainOp::Start);
    }

    #[test]
    fn test_union_splits_into_products() {
        // ((a + (b - c)) flattens to [a] and [b - c]
        let tree = op(
            CsgOp::Union,
            leaf("a"),
            op(CsgOp::Difference, leaf("b"), leaf("c")),
        );
        let mut products = CsgProducts::new();
        products.import(&tree);

        assert_eq!(products.size(), 2);
        assert_eq!(products.products[0].to_string(), "a");
        assert_eq!(products.products[1].to_string(), "b - c");

        let chain = &products.products[1].chain;
        assert_eq!(chain[0].op, ChainOp::Start);
        assert_eq!(chain[0].leaf.label, "b");
        assert_eq!(chain[1].op, ChainOp::Subtract);
        assert_eq!(chain[1].leaf.label, "c");
    }

    #[test]
    fn test_chain_order_is_preserved() {
        // ((a * b) - c) - d
        let tree = op(
            CsgOp::Difference,
            op(
                CsgOp::Difference,
                op(CsgOp::Intersection, leaf("a"), leaf("b")),
                leaf("c"),
            ),
            leaf("d"),
        );
        let mut products = CsgProducts::new();
        products.import(&tree);

        assert_eq!(products.size(), 1);
        let ops: Vec<_> = products.products[0]
            .chain
            .iter()
            .map(|e| (e.op, e.leaf.label.as_str()))
            .collect();
        assert_eq!(
            ops,
            vec![
                (ChainOp::Start, "a"),
                (ChainOp::Intersect, "b"),
                (ChainOp::Subtract, "c"),
                (ChainOp::Subtract, "d"),
            ]
        );
    }

    #[test]
    fn test_import_is_additive() {
        let mut products = CsgProducts::new();
        products.import(&op(CsgOp::Union, leaf("a"), leaf("b")));
        products.import(&leaf("c"));
        assert_eq!(products.size(), 3);
        assert_eq!(products.products[2].to_string(), "c");
    }

    #[test]
    fn test_leaf_counts_multiset() {
        let tree = op(
            CsgOp::Union,
            op(CsgOp::Intersection, leaf("a"), leaf("c")),
            op(CsgOp::Intersection, leaf("b"), leaf("c")),
        );
        let mut products = CsgProducts::new();
        products.import(&tree);

        let counts = products.leaf_counts();
        assert_eq!(counts.get("a"), Some(&1));
        assert_eq!(counts.get("b"), Some(&1));
        assert_eq!(counts.get("c"), Some(&2));
    }
}
