use std::time::Duration;

use cgmath::{InnerSpace, Vector3};
use flow_cube::{config::SceneConfig, cube::CubeFlow, flow::Stage};

pub(crate) const EPS: f32 = 1e-5;

/// A stage running the box scene, already initialised.
pub(crate) fn cube_stage(config: &SceneConfig) -> Stage<CubeFlow> {
    let mut stage = Stage::new(config, CubeFlow::new(config));
    stage.init();
    stage
}

/// Advance a stage by `frames` updates of one 60 Hz frame each.
pub(crate) fn run_frames(stage: &mut Stage<CubeFlow>, frames: u32) {
    for _ in 0..frames {
        stage.update(Duration::from_millis(16));
    }
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {}, got {}",
        expected,
        actual
    );
}

pub(crate) fn assert_vec_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual - expected).magnitude() < EPS,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

#[cfg(feature = "integration-tests")]
pub(crate) mod gpu {
    use flow_cube::{
        config::SceneConfig,
        context::Context,
        renderer::{Renderer, RendererOptions},
    };

    use super::{cube_stage, run_frames};

    pub(crate) const WIDTH: u32 = 320;
    pub(crate) const HEIGHT: u32 = 240;

    /// A renderer on a headless context of `WIDTH` x `HEIGHT`.
    pub(crate) fn headless_renderer(runtime: &tokio::runtime::Runtime, antialias: bool) -> Renderer {
        let ctx = runtime
            .block_on(Context::headless(WIDTH, HEIGHT))
            .expect("failed to create a headless GPU context");
        Renderer::new(ctx, RendererOptions { antialias })
    }

    /// Render the box scene offscreen after `frames` updates.
    pub(crate) fn capture(config: &SceneConfig, frames: u32) -> image::RgbaImage {
        let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio");
        let mut renderer = headless_renderer(&runtime, config.antialias);
        let mut stage = cube_stage(config);
        stage.resize(WIDTH, HEIGHT);
        run_frames(&mut stage, frames);
        runtime
            .block_on(renderer.capture(&stage.scene, &stage.camera))
            .expect("failed to capture a frame")
    }

    pub(crate) fn to_rgba(colour: wgpu::Color) -> image::Rgba<u8> {
        let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        image::Rgba([
            f_to_u8(colour.r),
            f_to_u8(colour.g),
            f_to_u8(colour.b),
            f_to_u8(colour.a),
        ])
    }

    /// Pixels that differ from the background colour.
    pub(crate) fn covered(img: &image::RgbaImage, background: image::Rgba<u8>) -> usize {
        img.pixels().filter(|p| **p != background).count()
    }
}
