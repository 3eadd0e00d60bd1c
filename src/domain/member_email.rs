use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;
use validator::ValidateEmail;

/// An email address that has been checked once, at the registration boundary.
/// Members are stored with this type, so an email read back from a store is
/// trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberEmail(String);

impl MemberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        let email = email.trim().to_string();
        ValidateEmail::validate_email(&email)
            .then_some(Self(email.clone()))
            .ok_or(format!("Invalid email: {email:?}"))
    }
}

impl AsRef<str> for MemberEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl Display for MemberEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
