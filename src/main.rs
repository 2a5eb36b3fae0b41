use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use mclauncher_lib::core::fetch::DownloadProgress;
use mclauncher_lib::core::settings::profile::ProfileKind;
use mclauncher_lib::{ContextConfig, LauncherContext, LauncherResult};

#[derive(Parser)]
#[command(name = "mclauncher", version, about = "Modpack sync and settings backend")]
struct Cli {
    /// Override the launcher data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Manifest mirror URL; repeat to add fallbacks.
    #[arg(long = "manifest-url")]
    manifest_urls: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synchronize the modpack against the remote manifest and prune extras
    Sync,
    /// Compare remote and local modpack versions
    CheckUpdate,
    /// Delete local modpack files the cached manifest does not list
    Prune,
    /// Update profile settings and rewrite the game's options.txt
    ApplySettings {
        /// Profile to update (vanilla or modpack)
        profile: ProfileKind,
        /// key=value pairs, e.g. ramMB=8000 fullscreen=true
        #[arg(value_parser = parse_key_val)]
        set: Vec<(String, String)>,
    },
    /// Print the stored settings bundle
    ShowSettings,
    /// Overwrite the modpack options.txt with stock defaults
    ResetModpackOptions,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

// Settings values arrive as strings on the command line; coerce the obvious
// booleans and numbers so normalization sees proper JSON types.
fn coerce(value: &str) -> Value {
    if let Ok(b) = value.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(n) = value.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(n) {
            return Value::Number(number);
        }
    }
    Value::String(value.to_string())
}

async fn run(cli: Cli) -> LauncherResult<()> {
    let mut config = ContextConfig {
        data_dir: cli.data_dir,
        ..ContextConfig::default()
    };
    if !cli.manifest_urls.is_empty() {
        config.manifest_urls = cli.manifest_urls;
    }
    config.progress = Some(Arc::new(|progress: DownloadProgress| {
        println!(
            "  {} ({} bytes)",
            progress.file_name, progress.bytes_downloaded
        );
    }));

    let ctx = LauncherContext::new(config)?;

    match cli.command {
        Command::Sync => {
            let manifest = ctx.sync_modpack().await?;
            let removed = ctx.prune_extras(Some(&manifest)).await;
            println!(
                "Synced modpack version {} ({} extra files removed)",
                manifest.version, removed
            );
        }
        Command::CheckUpdate => {
            let check = ctx.check_modpack_update().await?;
            println!("{}", serde_json::to_string_pretty(&check)?);
        }
        Command::Prune => {
            let removed = ctx.prune_extras(None).await;
            println!("Removed {} extra files", removed);
        }
        Command::ApplySettings { profile, set } => {
            let mut values = serde_json::Map::new();
            for (key, value) in set {
                values.insert(key, coerce(&value));
            }
            let applied = ctx.apply_settings(profile, &Value::Object(values)).await?;
            println!("Wrote {:?}", applied.path);
        }
        Command::ShowSettings => {
            let bundle = ctx.load_settings().await;
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
        Command::ResetModpackOptions => {
            let path = ctx.reset_modpack_options().await?;
            println!("Wrote {:?}", path);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mclauncher_lib=debug")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
