//! Login and logout.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use fdbk_core::auth::{AuthService, FirebaseAuth, SessionCache};
use fdbk_core::config::Config;
use fdbk_core::validation;

/// Reads the password from the first line of stdin.
fn read_password() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(config: &Config, email: &str) -> Result<()> {
    let password = read_password()?;
    if let Err(errors) = validation::validate_login(email, &password) {
        let messages: Vec<&str> = [errors.email, errors.password]
            .into_iter()
            .flatten()
            .collect();
        anyhow::bail!("Invalid credentials: {}", messages.join("; "));
    }

    let auth = FirebaseAuth::from_config(&config.firebase, Some(SessionCache::new()))?;
    let session = auth
        .sign_in(email, &password)
        .await
        .context("Sign-in failed")?;

    let who = session
        .display_name
        .as_deref()
        .or(session.email.as_deref())
        .unwrap_or(email);
    println!("Signed in as {who}");
    Ok(())
}

pub fn logout() -> Result<()> {
    let cache = SessionCache::new();
    let removed = cache
        .clear()
        .with_context(|| format!("remove {}", cache.path().display()))?;
    if removed {
        tracing::info!("session cleared");
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}
