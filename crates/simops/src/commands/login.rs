//! Login / logout command handlers.

use std::io::{self, BufRead, Write};

use secrecy::SecretString;

use simops_api::ApiClient;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn login(
    client: &ApiClient,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.service_token {
        let org = args.org.clone().unwrap_or_else(|| "Unknown".to_owned());
        let token = prompt_secret("Service token: ")?;
        client.login_with_service_token(&org, token).await?;
    } else {
        let email = match args.email {
            Some(email) => email,
            None => prompt_line("Email: ")?,
        };
        let password = prompt_secret("Password: ")?;

        let step = client.login(&email, &password).await?;
        if let Some(message) = step.message {
            output::print_output(&message, global.quiet);
        }
        let code = prompt_line("OTP code: ")?;
        client.verify_otp(&step.otp_token, code.trim()).await?;
    }

    let session = client.session();
    if let Some(snapshot) = session.snapshot() {
        config::save_session(&snapshot)?;
    }
    output::print_output(
        &format!("Signed in as {} ({})", session.short_name(), session.org()),
        global.quiet,
    );
    Ok(())
}

pub async fn logout(client: &ApiClient, global: &GlobalOpts) -> Result<(), CliError> {
    client.logout().await;
    config::clear_session();
    output::print_output("Signed out", global.quiet);
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String, CliError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    let value = rpassword::prompt_password(prompt)?;
    Ok(SecretString::from(value))
}
