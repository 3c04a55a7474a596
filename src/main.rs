use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use owl_ecs::{
    config::EcsConfig,
    engine::{Engine, EngineSettings},
    scenario::ScenarioLoader,
    systems::MovementSystem,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Owl ECS demo runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/orbit_demo.yaml")]
    scenario: PathBuf,

    /// World capacity config (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Print per-tick summaries as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EcsConfig::from_yaml(path)?,
        None => EcsConfig::default(),
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let ticks = scenario.ticks(cli.ticks);
    let mut world = scenario.build_world(config)?;

    let mut engine = Engine::new(EngineSettings {
        delta_seconds: scenario.delta_seconds,
    });
    let mut slowest_ms = 0.0_f64;
    let mut json_error = None;
    engine.run_with_hook(&mut world, ticks, |summary| {
        slowest_ms = slowest_ms.max(summary.total_duration_ms());
        if cli.json {
            match serde_json::to_string(summary) {
                Ok(line) => println!("{line}"),
                Err(err) => {
                    json_error.get_or_insert(err);
                }
            }
        }
    })?;
    if let Some(err) = json_error {
        return Err(err.into());
    }

    let travelled = world.system::<MovementSystem>()?.distance_travelled();
    println!(
        "Scenario '{}' completed for {} ticks. Living entities: {}, distance travelled: {:.2}, slowest tick: {:.3} ms",
        scenario.name,
        ticks,
        world.living_entity_count(),
        travelled,
        slowest_ms
    );
    Ok(())
}
