//! The scene: a flat list of meshes and a background colour.

use crate::data_structures::mesh::Mesh;

/// Handle returned by [`Scene::add`]. Meshes are never removed, so handles stay valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

impl MeshId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub background: wgpu::Color,
    meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: wgpu::Color::BLACK,
            meshes: Vec::new(),
        }
    }

    /// Add a mesh. It keeps whatever transform it carries (the origin by default).
    pub fn add(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        let id = MeshId(self.meshes.len() - 1);
        log::debug!("added mesh {:?}", id);
        id
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (MeshId(i), m))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
