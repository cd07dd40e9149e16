use std::collections::HashMap;

use flow_cube::{
    animation::{Motion, Spin},
    config::{ENV_ANTIALIAS, ENV_EASING, ENV_FOV, ENV_WIREFRAME, Easing, SceneConfig},
};

mod common;

fn from_vars(vars: &[(&str, &str)]) -> anyhow::Result<SceneConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    SceneConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_match_the_walkthrough() {
    let config = SceneConfig::default();

    assert_eq!(config.fov_degrees, 45.0);
    assert_eq!(config.near, 0.1);
    assert_eq!(config.far, 1000.0);
    assert_eq!(config.camera_z, 5.0);
    assert_eq!(config.box_size, [4.0, 2.0, 0.1]);
    assert_eq!(config.rotation_degrees, [0.0, 45.0, -25.0]);
    assert_eq!(config.position, [1.0, 0.1, -0.1]);
    assert_eq!(config.spin, [0.01, 0.0, -0.01]);
    assert!(config.antialias);
    assert!(!config.wireframe);
    assert_eq!(config.easing, Easing::Once);
}

#[test]
fn no_variables_means_defaults() {
    assert_eq!(from_vars(&[]).unwrap(), SceneConfig::default());
}

#[test]
fn variables_override_defaults() {
    let config = from_vars(&[
        (ENV_WIREFRAME, "true"),
        (ENV_ANTIALIAS, "0"),
        (ENV_EASING, "On"),
        (ENV_FOV, " 60 "),
    ])
    .unwrap();

    assert!(config.wireframe);
    assert!(!config.antialias);
    assert_eq!(config.easing, Easing::Continuous);
    assert_eq!(config.fov_degrees, 60.0);
}

#[test]
fn bad_values_are_rejected() {
    let err = from_vars(&[(ENV_WIREFRAME, "maybe")]).unwrap_err();
    assert!(err.to_string().contains(ENV_WIREFRAME));

    assert!(from_vars(&[(ENV_FOV, "wide")]).is_err());
    assert!(from_vars(&[(ENV_FOV, "0")]).is_err());
    assert!(from_vars(&[(ENV_FOV, "180")]).is_err());
    assert!(from_vars(&[(ENV_FOV, "NaN")]).is_err());

    let err = from_vars(&[(ENV_EASING, "sometimes")]).unwrap_err();
    assert!(err.to_string().contains(ENV_EASING));
}

#[test]
fn easing_accepts_modes_and_flags() {
    for (value, expected) in [
        ("once", Easing::Once),
        ("Continuous", Easing::Continuous),
        ("off", Easing::Off),
        ("false", Easing::Off),
        ("1", Easing::Continuous),
    ] {
        let config = from_vars(&[(ENV_EASING, value)]).unwrap();
        assert_eq!(config.easing, expected, "{}", value);
    }
}

#[test]
fn spin_is_built_from_the_config() {
    let spin = Spin::from(&SceneConfig::default());
    assert_eq!(spin.delta, [0.01, 0.0, -0.01]);
    assert_eq!(spin.motion, Motion::EaseOnce { amplitude: 2.0 });
    assert_eq!(spin.steps(), 0);

    let eased = Spin::from(&SceneConfig {
        easing: Easing::Continuous,
        easing_amplitude: 3.0,
        ..Default::default()
    });
    assert_eq!(eased.motion, Motion::Eased { amplitude: 3.0 });

    let linear = Spin::from(&SceneConfig {
        easing: Easing::Off,
        ..Default::default()
    });
    assert_eq!(linear.motion, Motion::Linear);
}

#[test]
fn rotation_is_converted_to_radians() {
    let [x, y, z] = SceneConfig::default().rotation_radians();

    assert_eq!(x, 0.0);
    assert!((y - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    assert!((z + 25f32.to_radians()).abs() < 1e-6);
}
