use rbsim::{run_3d, Scenario, ScenarioConfig, DEFAULT_SCENE};
use rbsim::{bench_intersect, bench_tick};

use anyhow::Result;
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Built-in scene index in 0..7 (anything else falls back to the small pile)
    scene: Option<usize>,

    /// YAML scene description, overriding the built-in scenes
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Run the timing harness instead of the viewer
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(path: &PathBuf) -> Result<ScenarioConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_tick();
        bench_intersect();
        return Ok(());
    }

    let scenario = match &args.file {
        Some(path) => {
            let cfg = load_scenario_from_yaml(path)?;
            Scenario::from_config(cfg)
        }
        None => Scenario::preset(args.scene.unwrap_or(DEFAULT_SCENE)),
    };

    run_3d(scenario);

    Ok(())
}
