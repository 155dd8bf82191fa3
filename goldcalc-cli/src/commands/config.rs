//! Config command - inspect and initialize settings.json

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use goldcalc_core::config::{Config, SourceConfig};

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a settings.json with the default values
    Init {
        /// Overwrite an existing settings file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

fn source_kind(source: &SourceConfig) -> &'static str {
    match source {
        SourceConfig::GoldApi(_) => "goldApi",
        SourceConfig::MetalPriceApi(_) => "metalPriceApi",
    }
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&data_dir)?;

            if json {
                // Credentials are never printed
                let sources: Vec<serde_json::Value> = config
                    .sources
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "kind": source_kind(s),
                            "name": s.name(),
                            "url": s.url(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "dataDir": data_dir.to_string_lossy(),
                        "currency": config.currency,
                        "requestTimeoutSecs": config.request_timeout_secs,
                        "offline": config.offline,
                        "sources": sources,
                        "simulated": config.simulated,
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Configuration".bold());
            println!("  Data directory: {}", data_dir.display());
            println!("  Currency: {}", config.currency);
            println!("  Request timeout: {}s", config.request_timeout_secs);
            if config.offline {
                output::warning("  Offline mode: network sources are skipped");
            }
            println!();

            let mut table = output::create_table();
            table.set_header(vec!["Rank", "Source", "Kind", "URL"]);
            for (i, source) in config.sources.iter().enumerate() {
                table.add_row(vec![
                    (i + 1).to_string(),
                    source.name().to_string(),
                    source_kind(source).to_string(),
                    source.url().to_string(),
                ]);
            }
            println!("{}", table);

            println!(
                "  Fallback estimate: {} ± {} ({} ms delay)",
                config.simulated.base_price, config.simulated.variance, config.simulated.delay_ms
            );
        }
        ConfigCommands::Init { force } => {
            let settings_path = data_dir.join("settings.json");
            if settings_path.exists() && !force {
                output::warning(&format!(
                    "{} already exists (use --force to overwrite)",
                    settings_path.display()
                ));
                return Ok(());
            }

            std::fs::create_dir_all(&data_dir)?;
            if force && settings_path.exists() {
                std::fs::remove_file(&settings_path)?;
            }
            Config::default().save(&data_dir)?;
            output::success(&format!("Wrote {}", settings_path.display()));
        }
    }

    Ok(())
}
