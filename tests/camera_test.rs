use cgmath::{Deg, Point3, Vector4};
use flow_cube::camera::{CameraUniform, PerspectiveCamera};

mod common;

use common::test_utils::assert_close;

fn camera() -> PerspectiveCamera {
    PerspectiveCamera::new(Deg(45.0), 16.0 / 9.0, 0.1, 1000.0)
}

#[test]
fn aspect_change_needs_a_projection_update() {
    let mut camera = camera();
    let before = camera.projection_matrix();

    camera.set_aspect(800, 800);
    assert_close(camera.aspect, 1.0);
    assert_eq!(camera.projection_matrix(), before);

    camera.update_projection_matrix();
    assert_ne!(camera.projection_matrix(), before);
    // x scale = cot(fov / 2) / aspect
    let expected = 1.0 / (22.5f32.to_radians().tan());
    assert_close(camera.projection_matrix().x.x, expected);
}

#[test]
fn degenerate_sizes_keep_the_previous_aspect() {
    let mut camera = camera();

    camera.set_aspect(1024, 0);
    camera.set_aspect(0, 768);
    camera.update_projection_matrix();

    assert_close(camera.aspect, 16.0 / 9.0);
    assert!(camera.projection_matrix().x.x.is_finite());
}

#[test]
fn moving_the_camera_keeps_it_looking_down_negative_z() {
    let mut camera = camera();
    camera.set_position(Point3::new(0.0, 0.0, 5.0));

    assert_eq!(camera.target, Point3::new(0.0, 0.0, 4.0));

    // The origin lands in the middle of the screen, inside wgpu's 0..1 depth range.
    let clip = camera.view_projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip.truncate() / clip.w;
    assert_close(ndc.x, 0.0);
    assert_close(ndc.y, 0.0);
    assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth {}", ndc.z);
}

#[test]
fn points_behind_the_far_plane_are_clipped() {
    let mut camera = camera();
    camera.set_position(Point3::new(0.0, 0.0, 5.0));

    let clip = camera.view_projection() * Vector4::new(0.0, 0.0, -2000.0, 1.0);
    assert!(clip.z / clip.w > 1.0);
}

#[test]
fn uniform_follows_the_camera() {
    let mut camera = camera();
    camera.set_position(Point3::new(0.0, 0.0, 5.0));
    let mut uniform = CameraUniform::new();

    uniform.update_view_proj(&camera);

    let view_proj: [[f32; 4]; 4] = camera.view_projection().into();
    let view: [[f32; 4]; 4] = camera.view_matrix().into();
    assert_eq!(uniform.view_proj, view_proj);
    assert_eq!(uniform.view, view);
    // camera at z = 5 moves the world by -5
    assert_close(uniform.view[3][2], -5.0);
}
