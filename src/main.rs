use flow_cube::{config::SceneConfig, cube::CubeFlow, flow};

fn main() -> anyhow::Result<()> {
    let config = SceneConfig::from_env()?;
    let cube = CubeFlow::new(&config);
    flow::run(config, cube)
}
