//! flow-cube
//!
//! A spinning box rendered with wgpu. The crate provides the small amount of
//! scene plumbing the box needs (a scene, a perspective camera, a renderer and a
//! resize-aware render loop) and the box scene itself, runnable natively and in
//! the browser.
//!
//! High-level modules
//! - `animation`: per-frame rotation increments and sine easing
//! - `camera`: perspective camera and its uniform
//! - `config`: every scene constant, with environment overrides
//! - `context`: GPU device/queue and the window surface (or none, headless)
//! - `cube`: the spinning box as a [`flow::SceneFlow`]
//! - `data_structures`: geometry, material, mesh, transform, scene, render targets
//! - `flow`: the flow trait and the winit event loop
//! - `pipelines`: render pipelines for the normal material
//! - `renderer`: draws a scene from a camera, presents or captures the frame
//!

pub mod animation;
pub mod camera;
pub mod config;
pub mod context;
pub mod cube;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod renderer;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Point3, Rad, Vector3};
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point: runs the box scene with the default configuration.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let config = config::SceneConfig::default();
    let flow = cube::CubeFlow::new(&config);
    flow::run(config, flow).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
