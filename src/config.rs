//! Scene configuration.
//!
//! Every number the cube scene uses lives in [`SceneConfig`]. The defaults are the
//! values of the classic "first spinning box" walkthrough; a handful of them can be
//! overridden from the environment through [`SceneConfig::from_env`].

use std::str::FromStr;

use anyhow::{Context as _, anyhow};

/// Render the box as edges only.
pub const ENV_WIREFRAME: &str = "FLOW_CUBE_WIREFRAME";
/// Toggle multisample antialiasing.
pub const ENV_ANTIALIAS: &str = "FLOW_CUBE_ANTIALIAS";
/// `off`, `once` or `continuous` (booleans map to `continuous` and `off`).
pub const ENV_EASING: &str = "FLOW_CUBE_EASING";
/// Vertical field of view in degrees.
pub const ENV_FOV: &str = "FLOW_CUBE_FOV";

/// How the box's position follows the sine of its rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// Keep the initial position.
    Off,
    /// Move the box once, right after the first frame.
    Once,
    /// Move the box every frame.
    Continuous,
}

impl FromStr for Easing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "continuous" | "1" | "true" | "yes" | "on" => Ok(Self::Continuous),
            "off" | "0" | "false" | "no" => Ok(Self::Off),
            other => Err(anyhow!(
                "expected off, once or continuous, got {:?}",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub title: String,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance the camera is pulled back along +Z so it doesn't sit inside the box.
    pub camera_z: f32,
    /// Width, height and depth of the box.
    pub box_size: [f32; 3],
    pub wireframe: bool,
    pub antialias: bool,
    /// Initial Euler rotation (XYZ) in degrees.
    pub rotation_degrees: [f32; 3],
    pub position: [f32; 3],
    /// Radians added to the rotation every frame.
    pub spin: [f32; 3],
    pub easing: Easing,
    pub easing_amplitude: f32,
    pub clear_colour: wgpu::Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "flow-cube".to_string(),
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            camera_z: 5.0,
            box_size: [4.0, 2.0, 0.1],
            wireframe: false,
            antialias: true,
            rotation_degrees: [0.0, 45.0, -25.0],
            position: [1.0, 0.1, -0.1],
            spin: [0.01, 0.0, -0.01],
            easing: Easing::Once,
            easing_amplitude: 2.0,
            clear_colour: wgpu::Color::BLACK,
        }
    }
}

impl SceneConfig {
    /// Defaults with the `FLOW_CUBE_*` environment overrides applied.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(ENV_WIREFRAME) {
            config.wireframe = parse_flag(ENV_WIREFRAME, &v)?;
        }
        if let Some(v) = lookup(ENV_ANTIALIAS) {
            config.antialias = parse_flag(ENV_ANTIALIAS, &v)?;
        }
        if let Some(v) = lookup(ENV_EASING) {
            config.easing = v
                .parse()
                .with_context(|| format!("invalid value {:?} for {}", v, ENV_EASING))?;
        }
        if let Some(v) = lookup(ENV_FOV) {
            let fov = parse_value::<f32>(ENV_FOV, &v)?;
            if !(fov > 0.0 && fov < 180.0) {
                return Err(anyhow!("{} must be within (0, 180) degrees, got {}", ENV_FOV, fov));
            }
            config.fov_degrees = fov;
        }
        log::debug!("scene config: {:?}", config);
        Ok(config)
    }

    /// Initial rotation converted to radians.
    pub fn rotation_radians(&self) -> [f32; 3] {
        self.rotation_degrees.map(f32::to_radians)
    }
}

fn parse_flag(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("{} expects a boolean, got {:?}", key, other)),
    }
}

fn parse_value<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("invalid value {:?} for {}", value, key))
}
