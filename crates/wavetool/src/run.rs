use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use glam::Vec2;
use ocean::{build_grid_topology, build_grid_vertices, OceanScene, SceneSnapshot};
use sceneconfig::{GridConfig, ProgramConfig, SceneConfig};
use serde::Serialize;
use shaderbuild::{build_program, NagaDevice, ProgramSources, ShaderSourceLoader};
use tracing_subscriber::EnvFilter;

use crate::cli::{CheckArgs, Cli, Command, GridArgs, SimulateArgs};
use crate::paths::AppPaths;

pub fn run(cli: Cli) -> Result<()> {
    initialise_tracing();

    match cli.command {
        Command::Check(args) => check(&args, &AppPaths::discover()?),
        Command::Grid(args) => grid(&args),
        Command::Simulate(args) => simulate(&args, &AppPaths::discover()?),
        Command::Where => print_where(&AppPaths::discover()?),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries command output; keep logs off it.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct LoadedConfig {
    config: SceneConfig,
    /// Directory relative `shader_roots` entries resolve against.
    base_dir: Option<PathBuf>,
}

fn load_config(explicit: Option<&Path>, paths: &AppPaths) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = paths.config_file();
            if !default.is_file() {
                tracing::info!(path = %default.display(), "no scene config found; using defaults");
                return Ok(LoadedConfig {
                    config: SceneConfig::default(),
                    base_dir: None,
                });
            }
            default
        }
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read scene config {}", path.display()))?;
    let config = SceneConfig::from_toml_str(&text)
        .with_context(|| format!("failed to load scene config {}", path.display()))?;
    tracing::debug!(path = %path.display(), programs = config.programs.len(), "loaded scene config");

    Ok(LoadedConfig {
        config,
        base_dir: path.parent().map(Path::to_path_buf),
    })
}

fn shader_roots(loaded: &LoadedConfig, paths: &AppPaths) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = loaded
        .config
        .shader_roots
        .iter()
        .map(|root| match &loaded.base_dir {
            Some(base) if root.is_relative() => base.join(root),
            _ => root.clone(),
        })
        .collect();
    roots.extend(paths.shader_roots());
    roots
}

fn program_sources(program: &ProgramConfig) -> ProgramSources {
    let mut sources = ProgramSources::new(program.vertex.as_str(), program.fragment.as_str());
    if let Some(name) = &program.tess_control {
        sources = sources.with_tess_control(name.as_str());
    }
    if let Some(name) = &program.tess_eval {
        sources = sources.with_tess_eval(name.as_str());
    }
    sources
}

fn check(args: &CheckArgs, paths: &AppPaths) -> Result<()> {
    let loaded = load_config(args.config.as_deref(), paths)?;
    let programs = &loaded.config.programs;

    let selected: Vec<(&str, &ProgramConfig)> = if args.programs.is_empty() {
        programs
            .iter()
            .map(|(name, program)| (name.as_str(), program))
            .collect()
    } else {
        let mut selected = Vec::with_capacity(args.programs.len());
        for name in &args.programs {
            let program = programs
                .get(name)
                .with_context(|| format!("unknown shader program '{name}'"))?;
            selected.push((name.as_str(), program));
        }
        selected
    };
    if selected.is_empty() {
        bail!("no shader programs configured");
    }

    let loader = ShaderSourceLoader::new(shader_roots(&loaded, paths));
    tracing::debug!(roots = ?loader.roots(), "shader search roots");
    let mut device = NagaDevice::new();
    let mut failed = Vec::new();

    for (name, program) in &selected {
        let built = build_program(&mut device, &loader, &program_sources(program));
        if built.is_usable() {
            println!("{name}: ok");
        } else {
            println!("{name}: failed");
            for diagnostic in built.diagnostics() {
                println!("  [{}] {diagnostic}", diagnostic.tag());
            }
            failed.push(*name);
        }
        built.release(&mut device);
    }

    if !failed.is_empty() {
        bail!(
            "{} of {} shader programs failed: {}",
            failed.len(),
            selected.len(),
            failed.join(", ")
        );
    }
    Ok(())
}

fn grid(args: &GridArgs) -> Result<()> {
    let extent = args.extent.unwrap_or(GridConfig::default().extent);
    let topology = build_grid_topology(args.length);
    let vertices = build_grid_vertices(args.length, extent);
    let spacing = if args.length > 1 {
        extent / f32::from(args.length - 1)
    } else {
        0.0
    };

    println!("length: {}", topology.length());
    println!("vertices: {}", vertices.len());
    println!("triangles: {}", topology.triangle_count());
    println!("indices: {}", topology.index_count());
    println!("index bytes: {}", topology.as_bytes().len());
    println!("extent: {extent}");
    println!("spacing: {spacing}");
    Ok(())
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    frames: u32,
    dt_seconds: f32,
    scene: SceneSnapshot<'a>,
    origin_displacement: [f32; 3],
}

fn simulate(args: &SimulateArgs, paths: &AppPaths) -> Result<()> {
    let loaded = load_config(args.config.as_deref(), paths)?;
    let mut scene =
        OceanScene::from_config(&loaded.config, args.seed).context("invalid clock settings")?;
    let dt = Duration::try_from_secs_f32(args.dt)
        .with_context(|| format!("frame step {} is out of range", args.dt))?;

    for _ in 0..args.frames {
        scene.tick(dt);
    }

    let origin_displacement = scene
        .waves()
        .displacement(Vec2::ZERO, scene.clock().wave_time())
        .to_array();
    let report = SimulationReport {
        frames: args.frames,
        dt_seconds: args.dt,
        scene: scene.snapshot(),
        origin_displacement,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to encode simulation report")?
    );
    Ok(())
}

fn print_where(paths: &AppPaths) -> Result<()> {
    println!("config: {}", paths.config_dir().display());
    println!("data: {}", paths.data_dir().display());
    println!("scene config: {}", paths.config_file().display());
    for root in paths.shader_roots() {
        println!("shaders: {}", root.display());
    }
    Ok(())
}
