#![forbid(unsafe_code)]
//! Register and enroll a user identity
//!
//! Strictly sequential: load the admin from the wallet (fail fast when it is
//! missing), register the user with the CA, enroll it for its key and
//! certificate, persist the identity, and make it the active user context.
//! The first failure aborts the remaining steps and is reported once.

use colored::*;
use fabtree::ca::{CaClient, RegistrationRequest};
use fabtree::cli::{open_wallet, print_error_box};
use fabtree::config::load_config;
use fabtree::error::ExplorerError;
use fabtree::wallet::Identity;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        print_error_box("Failed to register");
        eprintln!("{}", format!("   {}", e).red());

        // Stale admin credentials from a previous CA instance are the usual
        // cause of authorization failures.
        if is_authorization_failure(e.as_ref()) {
            eprintln!();
            eprintln!(
                "{}",
                "💡 Authorization failures may be caused by admin credentials from a".yellow()
            );
            eprintln!(
                "{}",
                "   previous CA instance. Try again after clearing the wallet directory".yellow()
            );
        }
        std::process::exit(1);
    }
}

fn is_authorization_failure(e: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(ExplorerError::AuthorizationError(_)) = e.downcast_ref::<ExplorerError>() {
        return true;
    }
    e.to_string().contains("Authorization")
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "🪪 fabtree user enrollment".bright_cyan().bold());
    println!();

    let config = load_config()?;
    let wallet = open_wallet(&config)?;
    println!("📁 Wallet: {}", wallet.dir().display());

    let user_id = config.enrollment.id.clone();
    if wallet.exists(&user_id) {
        println!(
            "{}",
            format!("✅ Identity '{}' already exists in the wallet", user_id).green()
        );
        return Ok(());
    }

    let admin = wallet.admin()?;
    println!("{}", "✅ Successfully loaded admin from persistence".green());

    let ca = CaClient::new(&config.ca.url, &config.ca.name)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));

    spinner.set_message(format!("Registering '{}'...", user_id));
    let request = RegistrationRequest {
        id: user_id.clone(),
        affiliation: config.enrollment.affiliation.clone(),
        role: config.enrollment.role.clone(),
    };
    let secret = ca.register(&request, &admin).await?;
    spinner.suspend(|| {
        println!(
            "{}",
            format!("✅ Successfully registered '{}' - secret: {}", user_id, secret).green()
        );
    });

    spinner.set_message(format!("Enrolling '{}'...", user_id));
    let enrollment = ca.enroll(&user_id, &secret).await?;
    spinner.finish_and_clear();
    println!(
        "{}",
        format!("✅ Successfully enrolled member user '{}'", user_id).green()
    );

    let identity = Identity::from_enrollment(&user_id, &config.ca.msp_id, &enrollment);
    wallet.put(&identity)?;
    wallet.set_active(&user_id)?;

    println!();
    println!(
        "{}",
        format!(
            "🎉 '{}' was successfully registered and enrolled and is ready to interact with the network",
            user_id
        )
        .bright_green()
        .bold()
    );
    Ok(())
}
