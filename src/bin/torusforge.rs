use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "torusforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one gradient torus image.
    Render(RenderArgs),
    /// Render every request of a JSON array, one after another.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Config JSON; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured output directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,

    /// Worker threads for the backend.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
#[command(allow_negative_numbers = true)]
struct RenderArgs {
    /// Gradient start color (hex, rgb()/rgba(), or a CSS name).
    #[arg(long, default_value = "#FF0000")]
    color1: String,

    /// Gradient end color.
    #[arg(long, default_value = "#0000FF")]
    color2: String,

    #[arg(long, default_value_t = 5.0)]
    camera_x: f32,

    #[arg(long, default_value_t = -3.0)]
    camera_y: f32,

    #[arg(long, default_value_t = 4.0)]
    camera_z: f32,

    /// Field of view in radians.
    #[arg(long, default_value_t = 1.047)]
    fov: f32,

    /// Torus rotation about X, in radians.
    #[arg(long, default_value_t = 0.0)]
    rot_x: f32,

    #[arg(long, default_value_t = 0.0)]
    rot_y: f32,

    #[arg(long, default_value_t = 1.5708)]
    rot_z: f32,

    /// Light slider, 0..=100.
    #[arg(long)]
    light: Option<f32>,

    /// Output file stem.
    #[arg(long)]
    stem: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON array of generate requests.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
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
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn load_config(common: &CommonArgs) -> anyhow::Result<torusforge::ForgeConfig> {
    let mut cfg = match &common.config {
        Some(path) => torusforge::ForgeConfig::from_path(path)?,
        None => torusforge::ForgeConfig::default(),
    };
    if let Some(dir) = &common.out_dir {
        cfg.output.dir = dir.clone();
    }
    cfg.render.backend = match common.backend {
        BackendChoice::Cpu => torusforge::BackendKind::Cpu,
    };
    if common.threads.is_some() {
        cfg.render.threads = common.threads;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn make_studio(common: &CommonArgs) -> anyhow::Result<torusforge::Studio> {
    let studio = torusforge::Studio::new(load_config(common)?)?;
    let frames = Arc::new(AtomicUsize::new(0));
    studio.set_progress_listener(Arc::new(move || {
        let n = frames.fetch_add(1, Ordering::Relaxed) + 1;
        eprintln!("rendered frame {n}");
    }));
    Ok(studio)
}

fn read_requests_json(path: &Path) -> anyhow::Result<Vec<torusforge::GenerateRequest>> {
    let f = File::open(path).with_context(|| format!("open requests '{}'", path.display()))?;
    let r = BufReader::new(f);
    let requests: Vec<torusforge::GenerateRequest> =
        serde_json::from_reader(r).with_context(|| "parse requests JSON")?;
    Ok(requests)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let studio = make_studio(&args.common)?;
    let mut req = torusforge::GenerateRequest::new(args.color1, args.color2)
        .with_camera(args.camera_x, args.camera_y, args.camera_z)
        .with_field_of_view(args.fov)
        .with_rotation(args.rot_x, args.rot_y, args.rot_z);
    req.light = args.light;
    req.output_stem = args.stem;

    let path = studio.generate(&req)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let requests = read_requests_json(&args.in_path)?;
    let studio = make_studio(&args.common)?;
    let stem = studio.config().output.file_stem;

    for (i, mut req) in requests.into_iter().enumerate() {
        if req.output_stem.is_none() {
            req.output_stem = Some(format!("{stem}-{i:03}"));
        }
        let path = studio
            .generate(&req)
            .with_context(|| format!("request #{i}"))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
