// The integration settings were only ever meant for site administrators. There
// is a single administrator account, declared in configuration; its password
// is stored as an argon2 PHC string and never in plain text.

mod middleware;

use anyhow::Context;
use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordVerifier;
pub use middleware::reject_anonymous_users;
pub use middleware::AdminName;
use secrecy::ExposeSecret;
use secrecy::Secret;
use tokio::task::JoinHandle;

use crate::configuration::AdminSettings;

pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// Verified against when the username is wrong, so that an unknown username
/// costs as much time as a wrong password. Must use the same argon2 params as
/// real hashes.
const FALLBACK_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1\
    $gZiV/M1gPc22ElAH/Jh1Hw\
    $CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

/// CPU-bound and slow (up to 0.5 s); never call this on the async executor
fn verify_password(
    supplied_password: Secret<String>,
    stored_password: Secret<String>,
) -> Result<(), AuthError> {
    let stored_password = &PasswordHash::new(stored_password.expose_secret())
        .context("Failed to read stored PHC string")
        .map_err(AuthError::UnexpectedError)?;
    Argon2::default()
        .verify_password(
            supplied_password.expose_secret().as_bytes(),
            stored_password,
        )
        .context("Invalid password")
        .map_err(AuthError::InvalidCredentials)
}

/// Wrapper for `spawn_blocking` that keeps the current `tracing` span
pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(f))
}

/// Check supplied credentials against the configured administrator, returning
/// the administrator's username on success.
#[tracing::instrument(name = "Validating credentials", skip(creds, admin))]
pub async fn validate_credentials(
    creds: Credentials,
    admin: &AdminSettings,
) -> Result<String, AuthError> {
    let known_user = creds.username == admin.username;
    let stored_password = if known_user {
        admin.password_hash.clone()
    } else {
        Secret::new(FALLBACK_PASSWORD_HASH.to_string())
    };

    // only owned data may be moved into the blocking thread
    let password = creds.password;
    spawn_blocking_with_tracing(move || verify_password(password, stored_password))
        .await
        .context("Failed to spawn blocking thread")
        .map_err(AuthError::UnexpectedError)??;

    if !known_user {
        return Err(AuthError::InvalidCredentials(anyhow::anyhow!(
            "Unknown username"
        )));
    }
    Ok(creds.username)
}
