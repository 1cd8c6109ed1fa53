use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sceneconfig::MAX_GRID_LENGTH;

#[derive(Parser, Debug)]
#[command(
    name = "wavetool",
    author,
    version,
    about = "Shader checks and headless simulation for the procedural ocean"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile and link configured shader programs offline.
    Check(CheckArgs),
    /// Print statistics for a water grid topology.
    Grid(GridArgs),
    /// Tick the animation clock headlessly and print a JSON snapshot.
    Simulate(SimulateArgs),
    /// Print resolved directories for config, data, and shader roots.
    Where,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Scene configuration file (defaults to `scene.toml` in the config dir).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only check the named program; may be repeated.
    #[arg(long = "program", value_name = "NAME")]
    pub programs: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Vertices per side.
    #[arg(
        long,
        value_name = "L",
        default_value_t = ocean::DEFAULT_GRID_LENGTH,
        value_parser = parse_length
    )]
    pub length: u16,

    /// World-space size along X and Z.
    #[arg(long, value_name = "EXTENT", value_parser = parse_extent)]
    pub extent: Option<f32>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of frames to tick.
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub frames: u32,

    /// Seconds per frame.
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0 / 60.0, value_parser = parse_dt)]
    pub dt: f32,

    /// Seed for wave regeneration; overrides the config.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_dt(value: &str) -> Result<f32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("frame step must not be empty".to_string());
    }
    let dt: f32 = trimmed
        .parse()
        .map_err(|_| format!("invalid frame step '{trimmed}'; expected seconds"))?;
    if !dt.is_finite() || dt < 0.0 {
        return Err(format!("frame step must be a non-negative number, got {trimmed}"));
    }
    Ok(dt)
}

pub fn parse_length(value: &str) -> Result<u16, String> {
    let trimmed = value.trim();
    let length: u16 = trimmed.parse().map_err(|_| {
        format!("invalid grid length '{trimmed}'; expected a whole number of vertices")
    })?;
    if length > MAX_GRID_LENGTH {
        return Err(format!(
            "grid length {length} exceeds the maximum of {MAX_GRID_LENGTH}"
        ));
    }
    Ok(length)
}

pub fn parse_extent(value: &str) -> Result<f32, String> {
    let extent: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid extent '{value}'"))?;
    if !extent.is_finite() || extent <= 0.0 {
        return Err("extent must be a positive number".to_string());
    }
    Ok(extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_with_repeated_programs() {
        let cli = Cli::try_parse_from([
            "wavetool",
            "check",
            "--config",
            "scene.toml",
            "--program",
            "water",
            "--program",
            "sky",
        ])
        .unwrap();
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.config, Some(PathBuf::from("scene.toml")));
                assert_eq!(args.programs, ["water", "sky"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn grid_defaults_to_full_length() {
        let cli = Cli::try_parse_from(["wavetool", "grid"]).unwrap();
        match cli.command {
            Command::Grid(args) => {
                assert_eq!(args.length, 513);
                assert_eq!(args.extent, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_frame_step() {
        assert!(parse_dt("-0.1").is_err());
        assert!(parse_dt("nan").is_err());
        assert_eq!(parse_dt(" 0.5 "), Ok(0.5));
        assert!(Cli::try_parse_from(["wavetool", "simulate", "--dt", "-1"]).is_err());
    }

    #[test]
    fn rejects_oversized_grid_length() {
        assert!(parse_length("60000").is_err());
        assert!(parse_length("-3").is_err());
        assert_eq!(parse_length("4097"), Ok(MAX_GRID_LENGTH));
        assert!(Cli::try_parse_from(["wavetool", "grid", "--length", "60000"]).is_err());
    }

    #[test]
    fn rejects_non_positive_extent() {
        assert!(parse_extent("0").is_err());
        assert_eq!(parse_extent("12.5"), Ok(12.5));
    }
}
