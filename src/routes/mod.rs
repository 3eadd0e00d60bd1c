mod admin;
mod health_check;
mod home;
mod login;
mod register;

pub use admin::*;
pub use health_check::*;
pub use home::*;
pub use login::*;
pub use register::*;

/// Print an error followed by every error in its `source` chain, one per line.
/// Used as the `Debug` impl of the error enums, so that log events carry the
/// whole story instead of just the outermost message.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
