// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG tree normalization
//!
//! Rewrites a boolean-combination tree into sum-of-products form: unions at
//! the top, and below each union boundary a pure chain of intersections and
//! differences over leaves. The rewrite applies the distributive law
//! (Goldfeather-style union-to-top normalization), which is worst-case
//! exponential, so a running node count bounds the expansion and aborts the
//! whole pass the moment it would grow past the configured term limit.

use super::{CsgLeaf, CsgNode, CsgOp};
use std::sync::Arc;
use thiserror::Error;

/// Why a normalization produced no tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The rewrite completed but no geometry-bearing branch survived
    #[error("normalization resulted in an empty tree")]
    Empty,
    /// The expansion would exceed the term limit; nothing is returned
    #[error("normalization exceeded the term limit")]
    OverLimit,
}

/// Normalize a tree into bounded sum-of-products form.
///
/// The term limit bounds the node cost (operations plus leaves) of the live
/// expanded form; for a tree already in canonical form it equals the node
/// count of the result exactly. The function is pure: same tree and limit,
/// same outcome.
pub fn normalize(
    node: &Arc<CsgNode>,
    term_limit: usize,
) -> Result<Arc<CsgNode>, NormalizeError> {
    let mut normalizer = Normalizer {
        limit: term_limit,
        count: 0,
    };
    let terms = normalizer.expand(node)?;
    if terms.is_empty() {
        return Err(NormalizeError::Empty);
    }
    // The top-level union joins are part of the expanded form too.
    normalizer.charge(terms.len() - 1)?;
    rebuild(terms).ok_or(NormalizeError::Empty)
}

/// One product term of the expanded form: intersected leaves in application
/// order, then subtracted leaves in application order. The rewrite rules
/// re-enter intersections ahead of a chain's subtractions, while the
/// relative order of subtractions is never permuted.
#[derive(Debug, Clone)]
struct Term {
    positives: Vec<CsgLeaf>,
    negatives: Vec<CsgLeaf>,
}

impl Term {
    fn leaf(leaf: CsgLeaf) -> Self {
        Self {
            positives: vec![leaf],
            negatives: Vec::new(),
        }
    }

    /// Node cost of this term once rebuilt as a chain
    fn node_cost(&self) -> usize {
        let leaves = self.positives.len() + self.negatives.len();
        2 * leaves - 1
    }

    /// A chain subtracting one of its own intersected leaves cancels out
    fn is_cancelled(&self) -> bool {
        self.negatives
            .iter()
            .any(|n| self.positives.iter().any(|p| p == n))
    }
}

struct Normalizer {
    limit: usize,
    count: usize,
}

impl Normalizer {
    fn charge(&mut self, cost: usize) -> Result<(), NormalizeError> {
        self.count += cost;
        if self.count > self.limit {
            Err(NormalizeError::OverLimit)
        } else {
            Ok(())
        }
    }

    fn release_terms(&mut self, terms: &[Term]) {
        for term in terms {
            self.count = self.count.saturating_sub(term.node_cost());
        }
    }

    fn push_term(&mut self, out: &mut Vec<Term>, term: Term) -> Result<(), NormalizeError> {
        if term.is_cancelled() {
            return Ok(());
        }
        self.charge(term.node_cost())?;
        out.push(term);
        Ok(())
    }

    /// Expand a subtree into its product terms, in left-to-right order
    fn expand(&mut self, node: &CsgNode) -> Result<Vec<Term>, NormalizeError> {
        match node {
            CsgNode::Leaf(leaf) => {
                let mut out = Vec::new();
                // Leaves without geometry expand to nothing.
                if !leaf.geometry.is_empty() {
                    self.push_term(&mut out, Term::leaf(leaf.clone()))?;
                }
                Ok(out)
            }
            CsgNode::Operation { op, left, right } => {
                let lhs = self.expand(left)?;
                let rhs = self.expand(right)?;
                match op {
                    CsgOp::Union => {
                        let mut out = lhs;
                        out.extend(rhs);
                        Ok(out)
                    }
                    CsgOp::Intersection => self.distribute_intersection(lhs, rhs),
                    CsgOp::Difference => self.distribute_difference(lhs, rhs),
                }
            }
        }
    }

    /// (p1 + ... + pn) * (q1 + ... + qm) -> sum of all pi * qj, with each
    /// pairing merged as pi.positives, qj.positives, pi.negatives,
    /// qj.negatives.
    fn distribute_intersection(
        &mut self,
        lhs: Vec<Term>,
        rhs: Vec<Term>,
    ) -> Result<Vec<Term>, NormalizeError> {
        self.release_terms(&lhs);
        self.release_terms(&rhs);

        // Intersection with nothing is nothing.
        if lhs.is_empty() || rhs.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for p in &lhs {
            for q in &rhs {
                let mut positives = p.positives.clone();
                positives.extend(q.positives.iter().cloned());
                let mut negatives = p.negatives.clone();
                negatives.extend(q.negatives.iter().cloned());
                self.push_term(&mut out, Term { positives, negatives })?;
            }
        }
        Ok(out)
    }

    /// l - (q1 + q2 + ...) folds sequentially: ((l - q1) - q2) - ...
    ///
    /// Subtracting one chain distributes into a union: each intersected leaf
    /// of the subtrahend spawns a term subtracting it, and each subtracted
    /// leaf of the subtrahend spawns a term intersecting it
    /// (x - (y - z) -> (x - y) + (x * z)).
    fn distribute_difference(
        &mut self,
        lhs: Vec<Term>,
        rhs: Vec<Term>,
    ) -> Result<Vec<Term>, NormalizeError> {
        self.release_terms(&rhs);

        // Subtracting nothing changes nothing.
        if rhs.is_empty() {
            return Ok(lhs);
        }

        let mut current = lhs;
        for q in &rhs {
            self.release_terms(&current);
            let mut next = Vec::new();
            for term in &current {
                for c in &q.positives {
                    let mut nt = term.clone();
                    nt.negatives.push(c.clone());
                    self.push_term(&mut next, nt)?;
                }
                for s in &q.negatives {
                    let mut nt = term.clone();
                    nt.positives.push(s.clone());
                    self.push_term(&mut next, nt)?;
                }
            }
            current = next;
        }
        Ok(current)
    }
}

/// Rebuild the expanded terms as a tree: a left spine of unions over chain
/// branches, each chain a left spine of intersections then differences.
fn rebuild(terms: Vec<Term>) -> Option<Arc<CsgNode>> {
    let mut tree: Option<Arc<CsgNode>> = None;
    for term in terms {
        let Some(chain) = rebuild_chain(term) else {
            continue;
        };
        tree = Some(match tree {
            None => chain,
            Some(acc) => CsgNode::operation(CsgOp::Union, acc, chain),
        });
    }
    tree
}

fn rebuild_chain(term: Term) -> Option<Arc<CsgNode>> {
    let mut node: Option<Arc<CsgNode>> = None;
    for leaf in term.positives {
        let leaf = CsgNode::leaf(leaf);
        node = Some(match node {
            None => leaf,
            Some(acc) => CsgNode::operation(CsgOp::Intersection, acc, leaf),
        });
    }
    for leaf in term.negatives {
        node = node.map(|acc| CsgNode::operation(CsgOp::Difference, acc, CsgNode::leaf(leaf)));
    }
    node
}
