// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Product compiler
//!
//! Drives evaluate -> normalize -> import for the main model and,
//! independently, for the highlight and background overlay trees. Failures
//! are category-local: a subtree that normalizes to nothing or overruns the
//! term limit degrades its own category with a warning and never aborts the
//! compile.

use crate::config::CompileConfig;
use crate::csg::{normalize, CsgNode, CsgProducts, CsgTreeEvaluator, NormalizeError};
use crate::report::DiagnosticSink;
use crate::scene::{GeometryProvider, SceneNode};
use std::sync::Arc;

/// Per-category compile output; `None` marks a category that produced no
/// renderable products (absent, empty, or over the term limit)
#[derive(Debug, Clone, Default)]
pub struct CompiledProducts {
    pub root_products: Option<CsgProducts>,
    pub highlights_products: Option<CsgProducts>,
    pub background_products: Option<CsgProducts>,
}

/// Compiles scene snapshots into renderer-ready product sets
pub struct ProductCompiler<'a> {
    provider: &'a dyn GeometryProvider,
    config: CompileConfig,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ProductCompiler<'a> {
    pub fn new(
        provider: &'a dyn GeometryProvider,
        config: CompileConfig,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            provider,
            config,
            sink,
        }
    }

    /// Compile one scene snapshot.
    ///
    /// Always runs to completion; categories that fail are left unset and
    /// reported through the sink.
    pub fn compile(&self, root: &SceneNode) -> CompiledProducts {
        let mut compiled = CompiledProducts::default();

        let forest = match CsgTreeEvaluator::new(self.provider).evaluate(root) {
            Ok(forest) => forest,
            Err(err) => {
                self.sink
                    .warning(&format!("Scene evaluation failed: {err:#}"));
                return compiled;
            }
        };

        match &forest.root {
            Some(root_node) => {
                self.sink
                    .info("Compiling design (CSG Products normalization)...");
                let mut products = CsgProducts::new();
                match self.normalize_into(&mut products, root_node) {
                    Ok(()) => {
                        self.sink.info(&format!(
                            "Normalized CSG tree has {} elements",
                            products.size()
                        ));
                        compiled.root_products = Some(products);
                    }
                    Err(NormalizeError::Empty) => {
                        self.sink
                            .warning("CSG normalization resulted in an empty tree");
                    }
                    Err(NormalizeError::OverLimit) => {
                        self.sink.warning(&format!(
                            "Normalized tree is growing past {} elements. Aborting normalization.",
                            self.config.term_limit
                        ));
                    }
                }
            }
            None => {
                self.sink.info("No top-level model geometry to compile");
            }
        }

        compiled.highlights_products = self.compile_overlays(&forest.highlights, "highlights");
        compiled.background_products = self.compile_overlays(&forest.backgrounds, "background");
        compiled
    }

    /// The shared tail of the pipeline: normalize one tree under the
    /// configured term limit and append its products. All three categories
    /// go through here, so the bound and the chain ordering are enforced
    /// uniformly.
    fn normalize_into(
        &self,
        products: &mut CsgProducts,
        tree: &Arc<CsgNode>,
    ) -> Result<(), NormalizeError> {
        let normalized = normalize(tree, self.config.term_limit)?;
        products.import(&normalized);
        Ok(())
    }

    /// Normalize and merge the subtrees of one overlay category.
    ///
    /// Failed subtrees are skipped with a warning; the category is unset
    /// only when there are no subtrees at all.
    fn compile_overlays(&self, trees: &[Arc<CsgNode>], category: &str) -> Option<CsgProducts> {
        if trees.is_empty() {
            return None;
        }

        self.sink
            .info(&format!("Compiling {} ({} CSG Trees)...", category, trees.len()));

        let mut products = CsgProducts::new();
        for tree in trees {
            match self.normalize_into(&mut products, tree) {
                Ok(()) => {}
                Err(NormalizeError::Empty) => {
                    self.sink.warning(&format!(
                        "Normalization of a {} subtree resulted in an empty tree, skipping",
                        category
                    ));
                }
                Err(NormalizeError::OverLimit) => {
                    self.sink.warning(&format!(
                        "Normalization of a {} subtree is growing past {} elements, skipping",
                        category, self.config.term_limit
                    ));
                }
            }
        }
        Some(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemorySink;
    use crate::scene::{MeshProvider, SceneKind, Vec3};

    fn cube(id: &str) -> SceneNode {
        SceneNode::with_id(
            SceneKind::Cube {
                size: Vec3::new(10.0, 10.0, 10.0),
                center: false,
            },
            id,
        )
    }

    #[test]
    fn test_compile_reports_element_count() {
        let provider = MeshProvider::new();
        let sink = MemorySink::new();
        let compiler = ProductCompiler::new(&provider, CompileConfig::default(), &sink);

        let scene = SceneNode::new(SceneKind::Union(vec![
            cube("a"),
            SceneNode::new(SceneKind::Sphere { r: 4.0, fn_: 8 }),
        ]));
        let compiled = compiler.compile(&scene);

        assert_eq!(compiled.root_products.unwrap().size(), 2);
        assert!(sink
            .infos()
            .iter()
            .any(|m| m.contains("Normalized CSG tree has 2 elements")));
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_over_limit_leaves_root_unset() {
        let provider = MeshProvider::new();
        let sink = MemorySink::new();
        let config = CompileConfig { term_limit: 1 };
        let compiler = ProductCompiler::new(&provider, config, &sink);

        let scene = SceneNode::new(SceneKind::Union(vec![cube("a"), cube("b")]));
        let compiled = compiler.compile(&scene);

        assert!(compiled.root_products.is_none());
        assert!(sink
            .warnings()
            .iter()
            .any(|m| m.contains("Aborting normalization")));
    }

    #[test]
    fn test_empty_scene_still_completes() {
        let provider = MeshProvider::new();
        let sink = MemorySink::new();
        let compiler = ProductCompiler::new(&provider, CompileConfig::default(), &sink);

        let compiled = compiler.compile(&SceneNode::new(SceneKind::Union(vec![])));
        assert!(compiled.root_products.is_none());
        assert!(compiled.highlights_products.is_none());
        assert!(compiled.background_products.is_none());
        assert!(sink
            .infos()
            .iter()
            .any(|m| m.contains("No top-level model geometry")));
    }
}
