use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use structopt::StructOpt;
use subway_core::{
    config::{self, AppConfig},
    LineId, NetworkSnapshot, PathRequest, StationId, SubwayNetwork,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, StructOpt)]
#[structopt(name = "subway", about = "Shortest paths, fares and line topology for a subway network.")]
struct Options {
    /// Network snapshot (JSON); defaults to `snapshot_path` from the config
    #[structopt(short, long, parse(from_os_str))]
    snapshot: Option<PathBuf>,

    /// Config file; defaults to the user config directory
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Shortest path and fare between two stations
    Path {
        #[structopt(long)]
        source: StationId,
        #[structopt(long)]
        target: StationId,
        #[structopt(long)]
        age: u32,
    },
    /// Stations of a line, up terminus first
    Stations {
        #[structopt(long)]
        line: LineId,
    },
    /// Sections to remove and add when inserting a section
    AddSection {
        #[structopt(long)]
        line: LineId,
        #[structopt(long)]
        up: StationId,
        #[structopt(long)]
        down: StationId,
        #[structopt(long)]
        distance: i64,
    },
    /// Sections to remove and add when deleting a station from a line
    RemoveStation {
        #[structopt(long)]
        line: LineId,
        #[structopt(long)]
        station: StationId,
    },
}

fn main() -> Result<()> {
    init_logging()?;
    let options = Options::from_args();

    let config = match &options.config {
        Some(path) => AppConfig::load_from(path)?,
        None => {
            config::ensure_default_config()?;
            AppConfig::load()?
        }
    };

    let snapshot_path = options
        .snapshot
        .clone()
        .or_else(|| config.snapshot_path.clone())
        .ok_or_else(|| anyhow!("no snapshot given; pass --snapshot or set snapshot_path"))?;
    let network = NetworkSnapshot::load(&snapshot_path)?.into_network()?;

    println!("{}", run(options.command, &network, &config)?);
    Ok(())
}

fn run(command: Command, network: &SubwayNetwork, config: &AppConfig) -> Result<String> {
    match command {
        Command::Path {
            source,
            target,
            age,
        } => {
            let fares = config.fare_calculator();
            let result = network.find_path(
                PathRequest {
                    source,
                    target,
                    age,
                },
                &fares,
            )?;
            render(&result)
        }
        Command::Stations { line } => render(&network.line_stations(line)?),
        Command::AddSection {
            line,
            up,
            down,
            distance,
        } => render(&network.add_section(line, up, down, distance)?),
        Command::RemoveStation { line, station } => {
            render(&network.remove_station(line, station)?)
        }
    }
}

fn render(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize result")
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("subway.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn demo_network() -> Result<SubwayNetwork> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/network.json");
        NetworkSnapshot::load(path)?.into_network()
    }

    fn run_args(args: &[&str]) -> Result<Value> {
        let options = Options::from_iter_safe(args.iter().copied())?;
        let rendered = run(options.command, &demo_network()?, &AppConfig::default())?;
        Ok(serde_json::from_str(&rendered)?)
    }

    #[test]
    fn parses_global_options_and_subcommand() -> Result<()> {
        let options = Options::from_iter_safe([
            "subway",
            "--snapshot",
            "net.json",
            "path",
            "--source",
            "1",
            "--target",
            "5",
            "--age",
            "30",
        ])?;
        assert_eq!(options.snapshot, Some(PathBuf::from("net.json")));
        assert_eq!(options.config, None);
        assert!(matches!(
            options.command,
            Command::Path {
                source: 1,
                target: 5,
                age: 30
            }
        ));
        Ok(())
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(Options::from_iter_safe(["subway", "path", "--source", "1"]).is_err());
        assert!(Options::from_iter_safe(["subway", "stations", "--line", "x"]).is_err());
    }

    #[test]
    fn path_over_demo_snapshot() -> Result<()> {
        let result = run_args(&[
            "subway", "path", "--source", "1", "--target", "5", "--age", "30",
        ])?;
        assert_eq!(
            result,
            json!({ "stations": [1, 2, 4, 5], "distance": 16, "fare": 2350 })
        );
        Ok(())
    }

    #[test]
    fn topology_commands_over_demo_snapshot() -> Result<()> {
        assert_eq!(
            run_args(&["subway", "stations", "--line", "2"])?,
            json!([2, 4, 6])
        );

        let change = run_args(&[
            "subway", "remove-station", "--line", "1", "--station", "2",
        ])?;
        assert_eq!(change["removed"].as_array().map(Vec::len), Some(2));
        assert_eq!(change["added"][0]["distance"], json!(5));

        assert!(run_args(&["subway", "stations", "--line", "9"]).is_err());
        Ok(())
    }
}
