//! Scene data structures: geometry, materials, meshes, transforms and render targets.
//!
//! - `geometry` holds box vertex/index generation and the vertex layout
//! - `material` is the normal-shaded material
//! - `mesh` combines geometry, material and transform, plus the GPU buffers for it
//! - `object3d` is the position/rotation/scale transform and its GPU layout
//! - `scene` is the container meshes are added to
//! - `texture` creates depth and multisample render targets

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod object3d;
pub mod scene;
pub mod texture;
