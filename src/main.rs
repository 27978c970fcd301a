use anyhow::Context;
use tracing::info;

use survive_and_poop::config::{CliArgs, GameConfig};
use survive_and_poop::engine::EngineBuilder;
use survive_and_poop::game::SurviveScene;
use survive_and_poop::logging;

fn main() -> anyhow::Result<()> {
    if let Err(err) = logging::init() {
        eprintln!("logging disabled: {err}");
    }

    let args = CliArgs::parse(std::env::args().skip(1));
    let config_path = args.config_path();
    let mut config = GameConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    config.physics.debug |= args.debug;

    info!(
        width = config.window.width,
        height = config.window.height,
        debug = config.physics.debug,
        "starting"
    );

    EngineBuilder::from_config(&config)
        .run(SurviveScene::new(config.gameplay.clone()))
        .context("game exited with an error")?;

    info!("bye");
    Ok(())
}
