//! Register command - create a local account and sign in

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use goldcalc_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event};

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

pub fn run(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let name = prompt_if_missing(name, "Name")?;
    let email = prompt_if_missing(email, "Email")?;
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    match ctx.users.register(&name, &email, &password) {
        Ok(user) => {
            log_event(&logger, LogEvent::new("user_registered").with_command("register"));

            if json {
                println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&user))?);
            } else {
                println!("{} Registered and signed in as {}", "✓".green(), user.name.bold());
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("register_failed")
                    .with_command("register")
                    .with_error(e.code()),
            );

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&OperationResult::<()>::fail(e.to_string()))?
                );
                return Ok(());
            }
            Err(e.into())
        }
    }
}
