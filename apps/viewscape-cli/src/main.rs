mod script;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use viewscape_common::{SurfaceSize, ViewportConfig};
use viewscape_render::SceneAssets;

#[derive(Parser)]
#[command(name = "viewscape-cli", about = "CLI tool for viewscape operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewport configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Check the configuration and load every shader and texture
    Validate,
    /// Print the effective configuration as YAML
    Config,
    /// Drive a headless viewport through scripted input
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "20")]
        frames: u64,
        /// Key held per tick: w/a/s/d, space, `^` for shift, `.` to release
        #[arg(short, long, default_value = "")]
        keys: String,
        /// Pointer delta applied every tick, as DX,DY
        #[arg(long, allow_hyphen_values = true)]
        look: Option<String>,
        /// Surface width
        #[arg(long, default_value = "800")]
        width: u32,
        /// Surface height
        #[arg(long, default_value = "600")]
        height: u32,
        /// Load shaders and textures during setup
        #[arg(long)]
        with_assets: bool,
        /// Print the final report as JSON instead of the frame log
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = ViewportConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("viewscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", viewscape_common::crate_info());
            println!("camera: {}", viewscape_camera::crate_info());
            println!("input: {}", viewscape_input::crate_info());
            println!("render: {}", viewscape_render::crate_info());
            println!("viewport: {}", viewscape_viewport::crate_info());
        }
        Commands::Validate => {
            config.validate()?;
            config
                .surface
                .check()
                .map_err(|e| anyhow::anyhow!("surface request: {e}"))?;
            let assets = SceneAssets::load(&config.assets)?;
            tracing::info!(
                "validated {} textures under {}",
                assets.textures.len(),
                config.assets.root.display()
            );
            println!(
                "config OK: {} api >= {}, tick {:?}",
                config.surface.api,
                config.surface.min_version,
                config.tick_interval()
            );
            println!(
                "shaders OK: vertex {} bytes, fragment {} bytes",
                assets.vertex_source.len(),
                assets.fragment_source.len()
            );
            for (unit, image) in assets.textures.iter().enumerate() {
                println!("texture {unit}: {}x{}", image.width, image.height);
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Simulate {
            frames,
            keys,
            look,
            width,
            height,
            with_assets,
            json,
        } => {
            config.validate()?;
            let sim = script::Simulation {
                frames,
                steps: script::parse_keys(&keys)?,
                look: look
                    .as_deref()
                    .map(script::parse_look)
                    .transpose()?
                    .unwrap_or_default(),
                size: SurfaceSize::clamped(width, height),
                load_assets: with_assets,
            };
            tracing::info!(
                "simulating {} ticks at {}x{}, {} scripted steps",
                sim.frames,
                sim.size.width,
                sim.size.height,
                sim.steps.len()
            );
            let report = script::run(config, &sim);
            if let Some(reason) = &report.failure {
                tracing::warn!("viewport setup failed: {reason}");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in &report.log {
                    println!("{line}");
                }
                println!(
                    "state={} frames={}",
                    report.state, report.frames_rendered
                );
                if let Some(camera) = report.camera {
                    println!(
                        "camera position=({:.3}, {:.3}, {:.3}) yaw={:.2} pitch={:.2}",
                        camera.position.x,
                        camera.position.y,
                        camera.position.z,
                        camera.yaw,
                        camera.pitch
                    );
                }
            }
        }
    }

    Ok(())
}
