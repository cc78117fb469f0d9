use anyhow::{bail, Context, Result};

use crate::api::Backend;
use crate::auth::is_auth_error;
use crate::session_store::SessionStore;
use crate::types::Me;

/// Prompt for an API session token, check it against the record API and
/// store it for later runs.
pub async fn run_login(backend: &Backend, sessions: &SessionStore) -> Result<Me> {
    println!("Paste your API session token (input is hidden).");
    let token = rpassword::prompt_password("Token: ").context("Failed to read token")?;
    let token = token.trim();
    if token.is_empty() {
        bail!("No token entered");
    }

    let user = verify_token(backend, token).await?;
    sessions.save(token)?;
    println!("Signed in as {}. Session saved.", user.name);
    Ok(user)
}

pub async fn verify_token(backend: &Backend, token: &str) -> Result<Me> {
    let api = backend
        .connect(Some(token))
        .context("Failed to set up the record API client")?;
    match api.current_user().await {
        Ok(Some(user)) => Ok(Me::from(user)),
        Ok(None) => bail!("Token was not accepted"),
        Err(e) if is_auth_error(&e) => bail!("Token was not accepted"),
        Err(e) => Err(e).context("Session check failed"),
    }
}
