use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lumen2d::{Color, LightSource, LightSourceDesc, SceneFile, TextureLoader, TextureLoaderOpts};

#[derive(Parser, Debug)]
#[command(name = "lumen2d", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bake a single light map and write it as a PNG.
    Bake(BakeArgs),
    /// Render a JSON scene as a PNG.
    Scene(SceneArgs),
}

#[derive(Parser, Debug)]
struct BakeArgs {
    /// Outer radius in pixels.
    #[arg(long)]
    radius: f64,

    /// Radius of the fully lit core.
    #[arg(long)]
    inner_radius: Option<f64>,

    /// Core alpha.
    #[arg(long)]
    intensity: Option<f64>,

    /// Tint, as `#rrggbb`, `rgb(..)` or `rgba(..)`.
    #[arg(long)]
    hue: Option<Color>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory image paths resolve against. Defaults to the scene file's directory.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Bake(args) => cmd_bake(args),
        Command::Scene(args) => cmd_scene(args),
    }
}

fn cmd_bake(args: BakeArgs) -> anyhow::Result<()> {
    let mut desc = LightSourceDesc::new(0.0, 0.0, args.radius);
    desc.inner_radius = args.inner_radius;
    desc.intensity = args.intensity;
    desc.hue = args.hue;
    let light = LightSource::new(desc)?;

    let pixels = light
        .light_map()
        .pixel_data()
        .context("light map has no pixels")?;
    write_png(
        &args.out,
        &pixels.to_straight_rgba8(),
        pixels.width(),
        pixels.height(),
    )
}

fn cmd_scene(args: SceneArgs) -> anyhow::Result<()> {
    let scene = SceneFile::from_path(&args.in_path)?;
    // Precedence: --assets-root, then LUMEN_ASSETS_ROOT, then the scene's directory.
    let mut opts = TextureLoaderOpts::from_env();
    if let Some(root) = args.assets_root {
        opts = opts.with_assets_root(root);
    } else if std::env::var_os("LUMEN_ASSETS_ROOT").is_none() {
        let dir = args.in_path.parent().unwrap_or_else(|| Path::new("."));
        opts = opts.with_assets_root(dir);
    }
    let loader = TextureLoader::new(opts)?;

    let frame = scene.render(&loader)?;
    write_png(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
    )
}

fn write_png(out: &Path, rgba: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}
