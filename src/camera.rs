//! Perspective camera and its GPU uniform.
//!
//! The camera keeps its projection matrix cached. Changing the field of view,
//! aspect ratio or clipping planes only takes effect once
//! [`PerspectiveCamera::update_projection_matrix`] is called, which is what the
//! resize handler does after adjusting the aspect ratio.

use cgmath::{Deg, EuclideanSpace, Matrix4, Point3, SquareMatrix, Vector3, perspective};

/// cgmath builds OpenGL clip space (z in -1..1); wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    /// Camera at the origin looking down -Z with +Y up.
    pub fn new(fovy: Deg<f32>, aspect: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            fovy,
            aspect,
            znear,
            zfar,
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Recompute the cached projection from `fovy`, `aspect` and the clipping planes.
    pub fn update_projection_matrix(&mut self) {
        self.projection = perspective(self.fovy, self.aspect, self.znear, self.zfar);
    }

    /// Set the aspect ratio from a surface size. A zero height keeps the old ratio.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring degenerate aspect {}x{}", width, height);
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Move the camera while keeping its viewing direction.
    pub fn set_position(&mut self, position: Point3<f32>) {
        let direction = self.target - self.position;
        self.position = position;
        self.target = position + direction;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    /// Projection * view, already mapped into wgpu's clip space.
    pub fn view_projection(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.projection * self.view_matrix()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
            view: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &PerspectiveCamera) {
        self.view_proj = camera.view_projection().into();
        self.view = camera.view_matrix().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
