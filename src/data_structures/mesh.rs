//! Meshes and their GPU buffers.

use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::BoxGeometry, material::MeshNormalMaterial, object3d::Object3D,
};

/// Geometry, material and transform of one renderable object.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: BoxGeometry,
    pub material: MeshNormalMaterial,
    pub transform: Object3D,
}

impl Mesh {
    /// Placed at the origin with no rotation.
    pub fn new(geometry: BoxGeometry, material: MeshNormalMaterial) -> Self {
        Self {
            geometry,
            material,
            transform: Object3D::new(),
        }
    }

    pub fn position(&self) -> cgmath::Vector3<f32> {
        self.transform.position
    }

    pub fn rotation(&self) -> crate::data_structures::object3d::Euler {
        self.transform.rotation
    }
}

/// Buffers uploaded once per mesh; only the instance buffer is rewritten per frame.
#[derive(Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    pub edge_buffer: wgpu::Buffer,
    pub num_edges: u32,
    pub instance_buffer: wgpu::Buffer,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(mesh.geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(mesh.geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Edge Buffer", label)),
            contents: bytemuck::cast_slice(mesh.geometry.edge_indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Instance Buffer", label)),
            contents: bytemuck::cast_slice(&[mesh.transform.to_raw()]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.geometry.indices().len() as u32,
            edge_buffer,
            num_edges: mesh.geometry.edge_indices().len() as u32,
            instance_buffer,
        }
    }

    pub fn write_transform(&self, queue: &wgpu::Queue, mesh: &Mesh) {
        queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&[mesh.transform.to_raw()]),
        );
    }
}
