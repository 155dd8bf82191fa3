//! Logs command - inspect rate acquisition history in the event log

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use goldcalc_core::{LogEntry, LogQuery, LoggingService};

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only entries about this price source
        #[arg(long)]
        source: Option<String>,
        /// Show only rate acquisition events
        #[arg(long)]
        rates: bool,
        /// Show only entries carrying an error
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old log entries
    Clear {
        /// Delete entries older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize price source health and the log database
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn open_log() -> Result<LoggingService> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    use chrono::{TimeZone, Utc};
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Source name, or the command for entries not tied to a source
fn subject(entry: &LogEntry) -> String {
    match (&entry.source, &entry.command) {
        (Some(source), _) => source.clone(),
        (None, Some(command)) => format!("gc {}", command).dimmed().to_string(),
        (None, None) => String::new(),
    }
}

fn list(service: &LoggingService, query: LogQuery, json: bool) -> Result<()> {
    let entries = service.entries(&query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No log entries found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Source / Command", "Error"]);
    for entry in &entries {
        let event = if entry.error_message.is_some() {
            entry.event.red().to_string()
        } else {
            entry.event.clone()
        };
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            event,
            subject(entry),
            entry.error_message.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let total = service.count()?;
    let errors = service.count_errors()?;
    let by_event = service.event_counts()?;
    let by_source = service.source_failures()?;
    let db_path = service.db_path().to_path_buf();
    let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "totalEntries": total,
                "errorCount": errors,
                "events": by_event,
                "sourceFailures": by_source,
                "databasePath": db_path.to_string_lossy(),
                "databaseSizeBytes": size_bytes
            }))?
        );
        return Ok(());
    }

    println!("{}", "Event Log".bold());
    println!("  Entries: {} ({} with errors)", total, errors);
    println!("  Database: {}", db_path.display());
    println!("  Size: {}", output::format_size(size_bytes));

    if !by_source.is_empty() {
        println!();
        println!("{}", "Price source failures".bold());
        let mut table = output::create_table();
        table.set_header(vec!["Source", "Failures", "Last failed", "Last error"]);
        for row in by_source {
            table.add_row(vec![
                row.source,
                row.failures.to_string(),
                format_timestamp(row.last_failed_at),
                row.last_error.unwrap_or_default(),
            ]);
        }
        println!("{}", table);
    }

    if !by_event.is_empty() {
        println!();
        let mut table = output::create_table();
        table.set_header(vec!["Event", "Count"]);
        for row in by_event {
            table.add_row(vec![row.event, row.count.to_string()]);
        }
        println!("{}", table);
    }

    Ok(())
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = open_log()?;

    match command {
        LogsCommands::List {
            limit,
            source,
            rates,
            errors,
            json,
        } => {
            let query = LogQuery {
                limit,
                errors_only: errors,
                source,
                rates_only: rates,
            };
            list(&service, query, json)
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let cutoff_ms = chrono::Utc::now().timestamp_millis()
                - (older_than_days as i64 * 24 * 60 * 60 * 1000);

            if !force && !json {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete log entries older than {} days?", older_than_days))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = service.delete_before(cutoff_ms)?;
            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                output::success(&format!("Deleted {} log entries", deleted));
            }
            Ok(())
        }
        LogsCommands::Stats { json } => stats(&service, json),
    }
}
