use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use constellation::app::{ConstellationApp, NoteSource};
use constellation::view::RenderConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Note store: a JSON array of notes, or an object with a `notes` array.
    #[arg(long, default_value = "notes.json")]
    notes: PathBuf,

    /// Category taxonomy (groups, aliases, "no category" labels).
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "constellation=info")]
    log_level: String,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 840.0)]
    height: f32,
}

fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .with_context(|| format!("invalid log filter {fallback:?}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!(error))
        .context("failed to install log subscriber")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let source = NoteSource {
        notes: args.notes,
        taxonomy: args.taxonomy,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "constellation",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ConstellationApp::new(
                cc,
                source.clone(),
                RenderConfig::default(),
            )))
        }),
    )
    .map_err(|error| anyhow::anyhow!("{error}"))
    .context("window closed with an error")
}
