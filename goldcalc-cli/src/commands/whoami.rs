//! Whoami command - show the signed-in user

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.users.current_user();

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    let Some(user) = user else {
        output::warning("Not signed in. Run `gc login` or `gc register`.");
        return Ok(());
    };

    let mut table = output::create_table();
    table.add_row(vec!["Name", &user.name]);
    table.add_row(vec!["Email", &user.email]);
    table.add_row(vec!["Account type", &user.account_type]);
    table.add_row(vec![
        "Member since",
        &user.created_at.format("%Y-%m-%d").to_string(),
    ]);

    println!("{}", "Current User".bold());
    println!("{}", table);

    Ok(())
}
