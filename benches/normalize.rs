// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Normalization benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{Matrix4, Vector3};
use polycsg::{normalize, CsgLeaf, CsgNode, CsgOp, CsgProducts, Primitive};
use std::sync::Arc;

fn solid(label: &str) -> Arc<CsgNode> {
    let mesh = Arc::new(Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh());
    CsgNode::leaf(CsgLeaf::new(label, mesh, Matrix4::identity()))
}

/// Chain of intersections against unions: term count doubles per level
fn blowup_tree(levels: usize) -> Arc<CsgNode> {
    let mut tree = solid("base");
    for i in 0..levels {
        let union = CsgNode::operation(
            CsgOp::Union,
            solid(&format!("u{i}a")),
            solid(&format!("u{i}b")),
        );
        tree = CsgNode::operation(CsgOp::Intersection, tree, union);
    }
    tree
}

/// Flat subtraction chain: no expansion, linear cost
fn drill_tree(holes: usize) -> Arc<CsgNode> {
    let mut tree = solid("plate");
    for i in 0..holes {
        tree = CsgNode::operation(CsgOp::Difference, tree, solid(&format!("hole{i}")));
    }
    tree
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for levels in [4, 8, 12] {
        let tree = blowup_tree(levels);
        group.bench_with_input(BenchmarkId::new("blowup", levels), &tree, |b, tree| {
            b.iter(|| normalize(black_box(tree), 1_000_000).unwrap());
        });
    }

    for holes in [16, 64, 256] {
        let tree = drill_tree(holes);
        group.bench_with_input(BenchmarkId::new("drill", holes), &tree, |b, tree| {
            b.iter(|| normalize(black_box(tree), 1_000_000).unwrap());
        });
    }

    group.finish();
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    let normalized = normalize(&blowup_tree(8), 1_000_000).unwrap();
    group.bench_function("blowup_8", |b| {
        b.iter(|| {
            let mut products = CsgProducts::new();
            products.import(black_box(&normalized));
            products.size()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_flatten);
criterion_main!(benches);
