//! Calc command - price a gold item at the current rate

use anyhow::Result;
use colored::Colorize;
use goldcalc_core::domain::pricing::TAX_RATE;
use goldcalc_core::domain::purity::find_grade;
use goldcalc_core::LogEvent;
use rust_decimal::Decimal;

use super::rate::{fetch_with_progress, print_advisory};
use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(
    purity: String,
    grams: Decimal,
    making_charge: Decimal,
    rate: Option<Decimal>,
    json: bool,
) -> Result<()> {
    if grams <= Decimal::ZERO {
        anyhow::bail!("Weight must be greater than zero");
    }
    if making_charge.is_sign_negative() {
        anyhow::bail!("Making charge cannot be negative");
    }

    let purity = purity.trim().to_uppercase();
    if find_grade(&purity).is_none() && !json {
        output::warning(&format!(
            "Unknown purity '{}', pricing as pure gold (24K)",
            purity
        ));
    }

    let logger = get_logger();
    let mut ctx = get_context()?;
    log_event(&logger, LogEvent::new("command_executed").with_command("calc"));

    match rate {
        Some(base) => ctx.gold_rate.set_base_rate(base)?,
        None => {
            fetch_with_progress(&mut ctx, &logger, json)?;
        }
    }

    let result = ctx.gold_rate.calculate_gold_value(&purity, grams, making_charge);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "rate": ctx.gold_rate.rate(),
                "result": result,
            }))?
        );
        return Ok(());
    }

    let currency = ctx.gold_rate.rate().currency.clone();
    let money = |amount: Decimal| output::format_money(amount, &currency);
    let tax_label = format!("VAT ({}%)", (TAX_RATE * Decimal::ONE_HUNDRED).normalize());

    let mut table = output::create_table();
    table.add_row(vec!["Purity".to_string(), result.purity.clone()]);
    table.add_row(vec!["Weight".to_string(), format!("{} g", result.grams.normalize())]);
    table.add_row(vec!["Rate per gram".to_string(), money(result.rate_per_gram)]);
    table.add_row(vec!["Gold value".to_string(), money(result.gold_value)]);
    table.add_row(vec!["Making charge".to_string(), money(result.making_charge)]);
    table.add_row(vec!["Subtotal".to_string(), money(result.subtotal)]);
    table.add_row(vec![tax_label, money(result.tax)]);
    table.add_row(vec!["Total".to_string(), money(result.total).bold().to_string()]);

    println!("{}", "Gold Price Estimate".bold());
    println!("{}", table);

    print_advisory(&ctx);

    Ok(())
}
