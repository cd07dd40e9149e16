//! Object transforms.
//!
//! An [`Object3D`] is the position, rotation and scale of a mesh. Rotation is a
//! set of Euler angles in radians applied in XYZ order, so incrementing a single
//! axis every frame spins the object around that axis.

use cgmath::{Matrix, Matrix3, Matrix4, Rad, SquareMatrix, Vector3};

use crate::data_structures::geometry::Vertex;

/// Euler angles in radians, XYZ order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_matrix3(&self) -> Matrix3<f32> {
        Matrix3::from_angle_x(Rad(self.x))
            * Matrix3::from_angle_y(Rad(self.y))
            * Matrix3::from_angle_z(Rad(self.z))
    }
}

impl Default for Euler {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl From<[f32; 3]> for Euler {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Object3D {
    pub position: Vector3<f32>,
    pub rotation: Euler,
    pub scale: Vector3<f32>,
}

impl Object3D {
    /// Identity transform: at the origin, unrotated, unit scale.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Euler::default(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vector3::new(x, y, z);
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Euler::new(x, y, z);
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation.to_matrix3())
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse transpose of the upper 3x3 so normals survive non-uniform scale.
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        let rotation_scale = self.rotation.to_matrix3()
            * Matrix3::from_diagonal(self.scale);
        rotation_scale
            .invert()
            .map(|m| m.transpose())
            .unwrap_or_else(|| self.rotation.to_matrix3())
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().into(),
            normal: self.normal_matrix().into(),
        }
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw transform as it is stored in the per-mesh instance buffer.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

/**
 * The model matrix takes four vec4 slots and the normal matrix three vec3 slots.
 * Locations start at 5 to leave room for the vertex attributes.
 */
impl Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
