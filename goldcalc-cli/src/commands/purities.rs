//! Purities command - list the supported karat grades

use anyhow::Result;
use colored::Colorize;
use goldcalc_core::domain::PURITY_TABLE;

use crate::output;

pub fn run(json: bool) -> Result<()> {
    if json {
        let grades: Vec<serde_json::Value> = PURITY_TABLE
            .iter()
            .map(|g| {
                serde_json::json!({
                    "label": g.label,
                    "name": g.name,
                    "purity": g.purity,
                    "multiplier": g.multiplier(),
                    "description": g.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&grades)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Karat", "Name", "Purity", "Multiplier", "Description"]);
    for grade in PURITY_TABLE {
        table.add_row(vec![
            grade.label.to_string(),
            grade.name.to_string(),
            grade.purity.to_string(),
            grade.multiplier().to_string(),
            grade.description.to_string(),
        ]);
    }

    println!("{}", "Gold Purity Grades".bold());
    println!("{}", table);

    Ok(())
}
