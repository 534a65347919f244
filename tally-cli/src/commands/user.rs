//! User commands - register and show profiles

use anyhow::Result;
use clap::Subcommand;
use dialoguer::{Input, Password};
use tally_core::services::CreateUserInput;
use tally_core::UserProfile;

use super::{get_context, get_logger, log_outcome};
use crate::output::{self, print_result};

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Create {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Email, must be unique
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a user's profile
    Show {
        /// User ID
        user_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: UserCommands) -> Result<()> {
    match command {
        UserCommands::Create {
            name,
            email,
            password,
            json,
        } => run_create(name, email, password, json).await,
        UserCommands::Show { user_id, json } => run_show(user_id, json).await,
    }
}

async fn run_create(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let ctx = get_context()?;
    let logger = get_logger();

    let result = ctx
        .create_user
        .execute(CreateUserInput {
            name,
            email,
            password,
        })
        .await
        .map(|user| user.profile());
    log_outcome(&logger, "user_create", &result);

    if json {
        return print_result(result);
    }

    let profile = result?;
    output::success("User created");
    print_profile(&profile);
    Ok(())
}

async fn run_show(user_id: String, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let result = ctx.show_user_profile.execute(&user_id).await;
    log_outcome(&logger, "user_show", &result);

    if json {
        return print_result(result);
    }

    print_profile(&result?);
    Ok(())
}

pub(crate) fn print_profile(profile: &UserProfile) {
    println!("  User ID: {}", profile.id);
    println!("  Name: {}", profile.name);
    println!("  Email: {}", profile.email);
    println!("  Created: {}", profile.created_at.to_rfc3339());
}
