//! Render pipelines.
//!
//! - `normal` draws meshes with the normal material, filled or as wireframe

pub mod normal;
