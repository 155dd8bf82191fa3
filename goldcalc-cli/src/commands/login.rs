//! Login command - start a session for a registered user

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use goldcalc_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event};

pub fn run(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let email = match email {
        Some(e) => e,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    match ctx.users.login(&email, &password) {
        Ok(user) => {
            log_event(&logger, LogEvent::new("user_logged_in").with_command("login"));

            if json {
                println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&user))?);
            } else {
                println!("{} Signed in as {}", "✓".green(), user.name.bold());
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("login_failed")
                    .with_command("login")
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
