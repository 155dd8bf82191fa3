//! Rate command - fetch the current gold rate and show it per karat

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use goldcalc_core::{
    GoldCalcContext, LogEvent, LoggingService, RateFetchOutcome, RateStatus, SOURCE_FAILED_EVENT,
};
use indicatif::{ProgressBar, ProgressStyle};

use super::{block_on, get_context, get_logger, log_event};
use crate::output;

/// Fetch the rate, with a spinner when attached to a terminal
pub fn fetch_with_progress(
    ctx: &mut GoldCalcContext,
    logger: &Option<LoggingService>,
    quiet: bool,
) -> Result<RateFetchOutcome> {
    let spinner = if !quiet && atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.yellow} {msg}")?);
        pb.set_message("Fetching gold rate...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let outcome = block_on(ctx.gold_rate.fetch_gold_rate())?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    for warning in &outcome.warnings {
        log_event(
            logger,
            LogEvent::new(SOURCE_FAILED_EVENT)
                .with_source(warning.source.as_str())
                .with_error(warning.message.as_str()),
        );
    }
    match outcome.status {
        RateStatus::Estimated => log_event(logger, LogEvent::new("rate_estimated")),
        _ => {
            let mut event = LogEvent::new("rate_fetched");
            if let Some(source) = &outcome.source {
                event = event.with_source(source.as_str());
            }
            log_event(logger, event);
        }
    }

    Ok(outcome)
}

/// Print the advisory attached to an estimated rate
pub fn print_advisory(ctx: &GoldCalcContext) {
    let rate = ctx.gold_rate.rate();
    if !rate.is_estimated() {
        return;
    }
    if let Some(advisory) = &rate.error {
        output::warning(&format!("⚠ {}", advisory));
    }
}

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;
    log_event(&logger, LogEvent::new("command_executed").with_command("rate"));

    let outcome = fetch_with_progress(&mut ctx, &logger, json)?;
    let rate = ctx.gold_rate.rate();

    let rows: Vec<serde_json::Value> = ctx
        .gold_rate
        .purity_table()
        .iter()
        .map(|grade| {
            serde_json::json!({
                "label": grade.label,
                "purity": grade.purity,
                "ratePerGram": ctx.gold_rate.rate_for_purity(grade.label),
            })
        })
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "rate": rate,
                "warnings": outcome.warnings,
                "purities": rows,
            }))?
        );
        return Ok(());
    }

    println!("{}", format!("Gold Rate ({})", rate.currency).bold());
    println!(
        "  24K per gram: {}",
        output::format_money(rate.base_rate_24k, &rate.currency).bold()
    );
    if let Some(source) = &rate.source {
        println!("  Source: {}", source);
    }
    if let Some(updated) = rate.last_updated {
        println!(
            "  Updated: {}",
            updated.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
        );
    }
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Karat", "Purity", "Rate per gram"]);
    for grade in ctx.gold_rate.purity_table() {
        table.add_row(vec![
            grade.label.to_string(),
            grade.purity.to_string(),
            output::format_money(ctx.gold_rate.rate_for_purity(grade.label), &rate.currency),
        ]);
    }
    println!("{}", table);

    print_advisory(&ctx);

    Ok(())
}
