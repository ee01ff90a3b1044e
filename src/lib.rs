// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polycsg CSG product compiler
//!
//! Compiles hierarchical boolean scene descriptions into bounded, flat
//! intersection/difference chains ("products") that a preview renderer can
//! composite directly, without redoing the boolean algebra at draw time.

pub mod compile;
pub mod config;
pub mod csg;
pub mod geometry;
pub mod report;
pub mod scene;

pub use compile::{CompiledProducts, ProductCompiler};
pub use config::{CompileConfig, DEFAULT_TERM_LIMIT};
pub use csg::{
    normalize, ChainEntry, ChainOp, CsgForest, CsgLeaf, CsgNode, CsgOp, CsgProducts, CsgTreeEvaluator,
    NormalizeError, Product,
};
pub use geometry::{Mesh, Primitive, Triangle, Vertex};
pub use report::{ConsoleSink, DiagnosticSink, MemorySink};
pub use scene::{GeometryProvider, MeshProvider, SceneKind, SceneNode, TransformOp, Vec3};

/// Main entry point: compile one scene snapshot into product sets
pub fn compile_products(
    root: &SceneNode,
    provider: &dyn GeometryProvider,
    config: &CompileConfig,
    sink: &dyn DiagnosticSink,
) -> CompiledProducts {
    ProductCompiler::new(provider, config.clone(), sink).compile(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_compile() {
        let scene = SceneNode::new(SceneKind::Cube {
            size: Vec3::new(10.0, 10.0, 10.0),
            center: false,
        });
        let provider = MeshProvider::new();
        let sink = MemorySink::new();
        let compiled = compile_products(&scene, &provider, &CompileConfig::default(), &sink);
        assert_eq!(compiled.root_products.unwrap().size(), 1);
    }
}
