//! Prism - a minimal real-time 3D rendering toolkit
//!
//! Command line entry point:
//! - `prism convert <input.obj|input.ply> <output.json>` flattens a mesh to JSON
//! - `prism demo [mesh]` runs a headless scene loop with logging
//! - `prism settings` writes the current settings file and prints its path

mod convert;
mod demo;
mod settings;

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::settings::Settings;

const USAGE: &str = "usage: prism convert <input.obj|input.ply> <output.json>
       prism demo [mesh]
       prism settings";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("convert") => {
            let [input, output] = &args[1..] else {
                bail!(USAGE);
            };
            convert::run(Path::new(input), Path::new(output))
        }
        Some("demo") | None => {
            info!("Starting Prism demo...");
            let settings = Settings::load();
            let mesh = args.get(1).map(Path::new);
            demo::run(settings, mesh).await
        }
        Some("settings") => {
            let settings = Settings::load();
            settings.save()?;
            if let Some(path) = Settings::settings_path() {
                println!("{}", path.display());
            }
            Ok(())
        }
        Some("help") | Some("--help") | Some("-h") => {
            println!("{USAGE}");
            Ok(())
        }
        Some(other) => bail!("unknown command '{}'\n{}", other, USAGE),
    }
}
