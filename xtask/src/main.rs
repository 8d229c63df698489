use anyhow::Result;
use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for viewscape")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, deny, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run cargo deny check
    Deny,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Regenerate the placeholder textures under assets/textures
    Textures {
        /// Output directory
        #[arg(long, default_value = "assets/textures")]
        out: PathBuf,
        /// Edge length in pixels
        #[arg(long, default_value = "256")]
        size: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_deny()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Deny => run_deny()?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Textures { out, size } => write_textures(&out, size)?,
    }

    Ok(())
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {step} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("fmt", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn run_tests() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn run_deny() -> Result<()> {
    cargo("deny", &["deny", "check", "licenses", "bans", "sources"])
}

fn run_doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}

fn write_textures(out: &Path, size: u32) -> Result<()> {
    std::fs::create_dir_all(out)?;
    let size = size.max(8);

    let container = crate_texture(size);
    let path = out.join("container.png");
    container.save(&path)?;
    println!("wrote {}", path.display());

    let face = face_texture(size);
    let path = out.join("awesomeface.png");
    face.save(&path)?;
    println!("wrote {}", path.display());
    Ok(())
}

/// Wooden crate: planks with a darker frame around the edge.
fn crate_texture(size: u32) -> RgbaImage {
    let border = size / 10;
    let plank = (size / 5).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        let edge = x < border || y < border || x >= size - border || y >= size - border;
        if edge {
            Rgba([92, 60, 30, 255])
        } else if (y - border) % plank == 0 {
            Rgba([110, 72, 38, 255])
        } else {
            let grain = ((x * 7 + y * 3) % 23) as u8;
            Rgba([160 + grain, 110 + grain / 2, 60, 255])
        }
    })
}

/// Smiley on a transparent background; the top half of the image holds the eyes
/// so a vertical flip is visible.
fn face_texture(size: u32) -> RgbaImage {
    let c = size as f32 / 2.0;
    let r = size as f32 * 0.45;
    RgbaImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as f32 + 0.5 - c, y as f32 + 0.5 - c);
        let d = (dx * dx + dy * dy).sqrt();
        if d > r {
            return Rgba([0, 0, 0, 0]);
        }
        let eye = |ex: f32| {
            let (ax, ay) = (dx - ex * r, dy + 0.3 * r);
            (ax * ax + ay * ay).sqrt() < 0.12 * r
        };
        let mouth = dy > 0.15 * r && (d - 0.6 * r).abs() < 0.06 * r;
        if eye(-0.35) || eye(0.35) || mouth {
            Rgba([40, 30, 10, 255])
        } else {
            Rgba([250, 210, 40, 255])
        }
    })
}
