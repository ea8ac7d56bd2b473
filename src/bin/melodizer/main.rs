//! melodizer - generative drum and melody machine
//!
//! Run with: cargo run -- [--config settings.toml] [--seed 7]
//! Offline:  cargo run -- --bounce out.wav --measures 8

mod app;
mod bounce;
mod ui;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use melodizer::Settings;

#[derive(Parser, Debug)]
#[command(name = "melodizer")]
#[command(about = "Generative drum and melody machine", long_about = None)]
struct Cli {
    /// TOML file with engine settings (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed every random choice for a repeatable performance
    #[arg(short, long)]
    seed: Option<u64>,

    /// Render to this WAV file instead of playing live
    #[arg(long)]
    bounce: Option<PathBuf>,

    /// Measures to render with --bounce
    #[arg(long, default_value = "8")]
    measures: u32,

    /// Sample rate for --bounce
    #[arg(long, default_value = "48000")]
    sample_rate: u32,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    match cli.bounce {
        Some(path) => bounce::render_to_wav(&path, settings, cli.seed, cli.measures, cli.sample_rate),
        None => app::run(settings, cli.seed),
    }
}

fn load_settings(path: &Path) -> EyreResult<Settings> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read settings from {}", path.display()))?;
    toml::from_str(&text).wrap_err_with(|| format!("invalid settings in {}", path.display()))
}
