// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene tree module
//!
//! Defines the input scene structure and the geometry provider seam

mod node;
mod provider;

pub use node::{SceneKind, SceneNode, TransformOp, Vec3};
pub use provider::{GeometryProvider, MeshProvider};
