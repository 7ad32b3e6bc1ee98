//! Gridforge - Entry Point
//!
//! Loads a preset, generates into an in-memory grid and prints it as ASCII.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use gridforge::data::{export_presets, load_config, GenerationConfig};
use gridforge::world::generation::noise::sample_field;
use gridforge::world::generation::{GenerationMethod, HeightMesh};
use gridforge::CancelToken;

/// Procedural tile-grid generator
#[derive(Parser, Debug)]
#[command(name = "gridforge", version, about = "Procedural tile-grid level generation")]
struct CliArgs {
    /// RON preset to run. Defaults to the built-in BSP rooms preset.
    preset: Option<PathBuf>,

    /// Override the preset's seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the built-in presets to this directory and exit.
    #[arg(long, value_name = "DIR")]
    export_presets: Option<PathBuf>,

    /// Also write the noise field as a Wavefront OBJ height mesh (noise presets only).
    #[arg(long, value_name = "PATH")]
    mesh: Option<PathBuf>,

    /// Vertical scale of the height mesh.
    #[arg(long, default_value_t = 10.0)]
    mesh_height: f32,

    /// Exponent of the height curve. Above 1 flattens lowlands and sharpens peaks.
    #[arg(long, default_value_t = 1.0)]
    mesh_exponent: f32,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Logs go to stderr so the map on stdout stays clean
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str()))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting Gridforge v{}", env!("CARGO_PKG_VERSION"));

    if let Some(dir) = &args.export_presets {
        let written = export_presets(dir).with_context(|| format!("exporting presets to {}", dir.display()))?;
        for path in written {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let mut config = match &args.preset {
        Some(path) => load_config(path).with_context(|| format!("loading preset {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
        if let GenerationMethod::Noise(settings) = &mut config.method {
            settings.noise.seed = seed as i32;
        }
    }

    if args.mesh.is_some() && !matches!(config.method, GenerationMethod::Noise(_)) {
        bail!("--mesh needs a noise preset, got {}", config.method.name());
    }

    let mut grid = config.new_grid();
    let mut generator = config
        .build_generator()
        .context("building generator")?;

    let started = Instant::now();
    generator
        .generate(&mut grid, &CancelToken::new())
        .with_context(|| format!("running {}", generator.name()))?;
    log::info!(
        "{} finished in {:.1?} ({}x{} grid, seed {})",
        generator.name(),
        started.elapsed(),
        grid.width,
        grid.length,
        config.seed
    );

    if let (Some(path), GenerationMethod::Noise(settings)) = (&args.mesh, &config.method) {
        // Sampling is a pure function of the settings, so this reproduces the field above
        let field = sample_field(settings, &CancelToken::new()).context("sampling noise for the mesh")?;
        let exponent = args.mesh_exponent;
        let mesh = HeightMesh::for_grid(&field, &settings.thresholds, &grid, args.mesh_height, |h| h.powf(exponent));
        std::fs::write(path, mesh.to_obj()).with_context(|| format!("writing mesh to {}", path.display()))?;
        log::info!(
            "Wrote height mesh ({} vertices, {} triangles) to {}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            path.display()
        );
    }

    print!("{}", grid.to_ascii());
    Ok(())
}
