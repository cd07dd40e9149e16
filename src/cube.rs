//! The spinning box.
//!
//! A thin, wide box with the normal material sits slightly off centre, tilted
//! by 45 degrees around Y and -25 degrees around Z. The camera is pulled back
//! to z = 5 so it is not inside the box. Every frame the box turns a little
//! around X and Z. Pressing `W` toggles between the shaded and the wireframe
//! material.

use cgmath::Point3;
use instant::Duration;
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::Key,
};

use crate::{
    animation::Spin,
    camera::PerspectiveCamera,
    config::SceneConfig,
    data_structures::{
        geometry::BoxGeometry,
        material::MeshNormalMaterial,
        mesh::Mesh,
        scene::{MeshId, Scene},
    },
    flow::SceneFlow,
};

pub struct CubeFlow {
    config: SceneConfig,
    spin: Spin,
    cube: Option<MeshId>,
}

impl CubeFlow {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            config: config.clone(),
            spin: Spin::from(config),
            cube: None,
        }
    }

    /// The box, once `on_init` has added it.
    pub fn cube(&self) -> Option<MeshId> {
        self.cube
    }

    pub fn spin(&self) -> &Spin {
        &self.spin
    }

    /// Flip the box between shaded and wireframe. Returns the new state, or
    /// `None` if the box hasn't been added yet.
    pub fn toggle_wireframe(&self, scene: &mut Scene) -> Option<bool> {
        let mesh = self.cube.and_then(|id| scene.get_mut(id))?;
        mesh.material.wireframe = !mesh.material.wireframe;
        log::info!("wireframe {}", if mesh.material.wireframe { "on" } else { "off" });
        Some(mesh.material.wireframe)
    }
}

/// `W` pressed, ignoring auto-repeat.
pub fn is_wireframe_toggle(key: &Key, state: ElementState, repeat: bool) -> bool {
    state == ElementState::Pressed
        && !repeat
        && matches!(key.as_ref(), Key::Character(c) if c.eq_ignore_ascii_case("w"))
}

impl SceneFlow for CubeFlow {
    fn on_init(&mut self, scene: &mut Scene, camera: &mut PerspectiveCamera) {
        let [width, height, depth] = self.config.box_size;
        let geometry = BoxGeometry::new(width, height, depth);
        let material = MeshNormalMaterial {
            wireframe: self.config.wireframe,
        };

        let mut cube = Mesh::new(geometry, material);
        let [rx, ry, rz] = self.config.rotation_radians();
        cube.transform.set_rotation(rx, ry, rz);
        let [x, y, z] = self.config.position;
        cube.transform.set_position(x, y, z);

        self.cube = Some(scene.add(cube));
        camera.set_position(Point3::new(0.0, 0.0, self.config.camera_z));
        log::info!(
            "cube {:?} added, camera at z = {}",
            self.config.box_size,
            self.config.camera_z
        );
    }

    fn on_update(&mut self, scene: &mut Scene, _: &mut PerspectiveCamera, _: Duration) {
        if let Some(mesh) = self.cube.and_then(|id| scene.get_mut(id)) {
            self.spin.step(&mut mesh.transform);
        }
    }

    fn on_window_events(
        &mut self,
        scene: &mut Scene,
        _: &mut PerspectiveCamera,
        event: &WindowEvent,
    ) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if is_wireframe_toggle(&event.logical_key, event.state, event.repeat) {
                self.toggle_wireframe(scene);
            }
        }
    }
}
