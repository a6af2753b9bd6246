#![forbid(unsafe_code)]
//! Enroll the admin identity with the certificate authority
//!
//! One-shot bootstrap: if the admin is already in the wallet this is a
//! success no-op; otherwise the admin is enrolled with the CA and persisted
//! as the active user context.

use colored::*;
use fabtree::ca::CaClient;
use fabtree::cli::{open_wallet, print_error_box};
use fabtree::config::load_config;
use fabtree::wallet::{Identity, ADMIN_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        print_error_box("Admin enrollment failed");
        eprintln!("{}", format!("   {}", e).red());
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "🔐 fabtree admin enrollment".bright_cyan().bold());
    println!();

    let config = load_config()?;
    let wallet = open_wallet(&config)?;
    println!("📁 Wallet: {}", wallet.dir().display());

    if wallet.admin().is_ok() {
        println!(
            "{}",
            "✅ Admin is already enrolled, nothing to do".green()
        );
        return Ok(());
    }

    let secret = if config.ca.admin_secret.is_empty() {
        rpassword::prompt_password(format!("Enter secret for '{}': ", config.ca.admin_id))?
    } else {
        config.ca.admin_secret.clone()
    };

    let ca = CaClient::new(&config.ca.url, &config.ca.name)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Enrolling '{}' with {}...", config.ca.admin_id, config.ca.url));

    let enrollment = ca.enroll(&config.ca.admin_id, &secret).await?;
    spinner.finish_and_clear();

    let admin = Identity::from_enrollment(ADMIN_NAME, &config.ca.msp_id, &enrollment);
    wallet.put(&admin)?;
    wallet.set_active(ADMIN_NAME)?;

    println!(
        "{}",
        "✅ Successfully enrolled admin and imported it into the wallet"
            .green()
            .bold()
    );
    Ok(())
}
