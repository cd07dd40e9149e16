#[cfg(feature = "integration-tests")]
use common::test_utils::{
    cube_stage,
    gpu::{HEIGHT, WIDTH, capture, covered, headless_renderer, to_rgba},
};
use flow_cube::config::SceneConfig;
#[cfg(feature = "integration-tests")]
use flow_cube::renderer::MSAA_SAMPLES;

mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_clear_colour_around_the_box() {
    let config = SceneConfig {
        clear_colour: wgpu::Color::WHITE,
        ..Default::default()
    };
    let frame = capture(&config, 0);

    assert_eq!(frame.dimensions(), (WIDTH, HEIGHT));
    let background = to_rgba(wgpu::Color::WHITE);
    for (x, y) in [(0, 0), (WIDTH - 1, 0), (0, HEIGHT - 1), (WIDTH - 1, HEIGHT - 1)] {
        assert_eq!(*frame.get_pixel(x, y), background, "corner ({}, {})", x, y);
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_shade_the_box_by_its_normals() {
    let config = SceneConfig {
        antialias: false,
        ..Default::default()
    };
    let frame = capture(&config, 0);
    let background = to_rgba(config.clear_colour);

    let shaded = covered(&frame, background);
    assert!(shaded > 0, "nothing but background was drawn");
    // Normal colours are n * 0.5 + 0.5, so no shaded pixel is black.
    for pixel in frame.pixels().filter(|p| **p != background) {
        assert_eq!(pixel[3], 255);
        assert!(pixel[0] > 0 || pixel[1] > 0 || pixel[2] > 0);
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_draw_fewer_pixels_as_wireframe() {
    let filled = SceneConfig {
        antialias: false,
        ..Default::default()
    };
    let wireframe = SceneConfig {
        wireframe: true,
        ..filled.clone()
    };
    let background = to_rgba(filled.clear_colour);

    let filled_pixels = covered(&capture(&filled, 0), background);
    let wire_pixels = covered(&capture(&wireframe, 0), background);

    assert!(wire_pixels > 0, "wireframe drew nothing");
    assert!(
        wire_pixels < filled_pixels,
        "wireframe covered {} pixels, filled {}",
        wire_pixels,
        filled_pixels
    );
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_change_the_frame_as_the_box_spins() {
    let config = SceneConfig::default();

    let first = capture(&config, 0);
    let later = capture(&config, 60);

    assert_ne!(first.as_raw(), later.as_raw());
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_pick_sample_count_from_the_antialias_option() {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let plain = headless_renderer(&runtime, false);
    assert_eq!(plain.sample_count(), 1);
    assert_eq!(plain.context().size(), (WIDTH, HEIGHT));

    // 4x when the adapter supports it, single sampling otherwise
    let smooth = headless_renderer(&runtime, true);
    assert!([1, MSAA_SAMPLES].contains(&smooth.sample_count()));
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_and_resize_without_a_surface() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut renderer = headless_renderer(&runtime, true);
    let mut stage = cube_stage(&SceneConfig::default());

    renderer.render(&stage.scene, &stage.camera).unwrap();

    stage.resize(640, 480);
    renderer.set_size(640, 480);
    renderer.set_size(0, 0);
    assert_eq!(renderer.size(), (640, 480));
    renderer.render(&stage.scene, &stage.camera).unwrap();
}

#[test]
fn clear_colour_defaults_to_black() {
    assert_eq!(SceneConfig::default().clear_colour, wgpu::Color::BLACK);
}
