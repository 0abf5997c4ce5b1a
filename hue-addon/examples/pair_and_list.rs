//! Pair with a Hue bridge and print every light variable
//!
//! The credential the bridge hands out is stored in a small JSON file and
//! reused on the next run. Press the bridge's link button before the first
//! run.
//!
//! Run with: `cargo run -p hue-addon --example pair_and_list -- --ip 192.168.1.2`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hue_addon::logging::{init_logging, LoggingMode};
use hue_addon::{
    AddonMetadata, HueInitialiser, ProvidedInput, SaveData, Variable, VariableCollection,
};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "pair_and_list")]
#[command(about = "Pair with a Philips Hue bridge and list its light variables")]
struct Args {
    /// Bridge IP address or host name
    #[arg(short, long)]
    ip: String,

    /// Existing bridge username to use instead of pairing
    #[arg(short, long)]
    username: Option<String>,

    /// Where the paired credential is kept between runs
    #[arg(long, default_value = "hue-credential.json")]
    state_file: PathBuf,

    /// Set a light's brightness after listing, e.g. `--brightness 1=120`
    #[arg(long)]
    brightness: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_saved(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(serde_json::from_str(&raw).context("Saved credential file is not JSON")?))
}

fn file_save_data(path: PathBuf) -> SaveData {
    Arc::new(move |data: Value| {
        if let Err(e) = std::fs::write(&path, data.to_string()) {
            tracing::error!("Failed to persist credential to {}: {}", path.display(), e);
        } else {
            println!("💾 Stored new credential in {}", path.display());
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(if args.verbose {
        LoggingMode::Debug
    } else {
        LoggingMode::Development
    })?;

    let mut inputs = vec![ProvidedInput::new("ip", args.ip.as_str())];
    if let Some(username) = &args.username {
        inputs.push(ProvidedInput::new("username", username.as_str()));
    }

    let addon = HueInitialiser::new()
        .create_hue_addon(
            AddonMetadata::new("pair-and-list", inputs),
            file_save_data(args.state_file.clone()),
            load_saved(&args.state_file)?,
        )
        .await
        .context("Failed to connect to the bridge")?;
    println!("✅ Connected to bridge at {}", args.ip);

    let bulbs = addon.light_bulbs().await?;
    println!("💡 Found {} light(s)", bulbs.len());

    for bulb in &bulbs {
        println!("\n{} - {} (light {})", bulb.light().name, bulb.name(), bulb.light_id());
        for variable in bulb.variables() {
            let access = if variable.as_updatable().is_some() { "rw" } else { "ro" };
            println!(
                "  [{}] {:<12} = {}",
                access,
                variable.name(),
                variable.retrieve_value().await?
            );
        }
    }

    if let Some(request) = &args.brightness {
        let (light_id, level) = request
            .split_once('=')
            .context("--brightness expects <light id>=<level>")?;
        let level: u8 = level.parse().context("Brightness must be 0-255")?;

        let bulb = bulbs
            .iter()
            .find(|bulb| bulb.light_id() == light_id)
            .with_context(|| format!("No light with id {}", light_id))?;
        let variable = bulb
            .variable("Brightness")
            .context("This light has no brightness control")?;
        variable
            .as_updatable()
            .context("Brightness is read-only")?
            .update_value(level.into())
            .await?;
        println!("\n🔆 Set brightness of {} to {}", bulb.light().name, level);
    }

    Ok(())
}
