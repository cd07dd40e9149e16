//! Per-frame motion.
//!
//! A [`Spin`] adds a fixed rotation to an object every frame. Easing moves the
//! object along the sine of its rotation: [`Motion::EaseOnce`] does it a single
//! time after the first frame and then only turns the object, [`Motion::Eased`]
//! does it every frame so the object keeps swinging.

use crate::{
    config::{Easing, SceneConfig},
    data_structures::object3d::Object3D,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    Linear,
    /// Ease after the first step only; the position is left alone afterwards.
    EaseOnce { amplitude: f32 },
    /// position.x = A * sin(rotation.x), position.z = A * sin(rotation.z)
    Eased { amplitude: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    /// Radians added per frame, per axis.
    pub delta: [f32; 3],
    pub motion: Motion,
    steps: u64,
}

impl Spin {
    pub fn new(delta: [f32; 3]) -> Self {
        Self {
            delta,
            motion: Motion::Linear,
            steps: 0,
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn step(&mut self, object: &mut Object3D) {
        object.rotation.x += self.delta[0];
        object.rotation.y += self.delta[1];
        object.rotation.z += self.delta[2];
        self.steps += 1;

        match self.motion {
            Motion::Linear => {}
            Motion::EaseOnce { amplitude } if self.steps == 1 => ease(object, amplitude),
            Motion::EaseOnce { .. } => {}
            Motion::Eased { amplitude } => ease(object, amplitude),
        }
    }
}

fn ease(object: &mut Object3D, amplitude: f32) {
    object.position.x = amplitude * object.rotation.x.sin();
    object.position.z = amplitude * object.rotation.z.sin();
}

impl From<&SceneConfig> for Spin {
    fn from(config: &SceneConfig) -> Self {
        let amplitude = config.easing_amplitude;
        let motion = match config.easing {
            Easing::Off => Motion::Linear,
            Easing::Once => Motion::EaseOnce { amplitude },
            Easing::Continuous => Motion::Eased { amplitude },
        };
        Spin::new(config.spin).with_motion(motion)
    }
}
