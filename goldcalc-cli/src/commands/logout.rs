//! Logout command - end the current session

use anyhow::Result;
use goldcalc_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let was_signed_in = ctx.users.is_authenticated();
    ctx.users.logout()?;

    if was_signed_in {
        log_event(&logger, LogEvent::new("user_logged_out").with_command("logout"));
    }

    if json {
        println!("{}", serde_json::json!({ "signedOut": was_signed_in }));
    } else if was_signed_in {
        output::success("Signed out");
    } else {
        output::info("No active session");
    }

    Ok(())
}
