//! Login command - verify credentials

use anyhow::Result;
use dialoguer::{Input, Password};
use tally_core::services::AuthenticateUserInput;

use super::user::print_profile;
use super::{get_context, get_logger, log_outcome};
use crate::output::{self, print_result};

pub async fn run(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let ctx = get_context()?;
    let logger = get_logger();

    let result = ctx
        .authenticate_user
        .execute(AuthenticateUserInput { email, password })
        .await;
    log_outcome(&logger, "login", &result);

    if json {
        return print_result(result);
    }

    let profile = result?;
    output::success(&format!("Logged in as {}", profile.name));
    print_profile(&profile);
    Ok(())
}
