use std::fmt::Debug;

use serde::Deserialize;
use serde::Serialize;

use super::ApiKey;

/// Shown next to the checkbox when no label has been configured.
const DEFAULT_SIGNUP_LABEL: &str = "Signup for Newsletter";

/// The integration's single configuration record: what the admin typed into
/// the settings form, stored verbatim.
///
/// A fresh install has every field empty; `SettingsStore::load` hands out
/// this default until the first save.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    pub api_key: String,
    pub saved_list: Option<String>,
    pub signup_label: String,
}

impl IntegrationSettings {
    pub fn api_key(&self) -> Option<ApiKey> { ApiKey::parse(&self.api_key) }

    /// The campaign new contacts go to, if one has been chosen
    pub fn saved_list(&self) -> Option<&str> {
        self.saved_list
            .as_deref()
            .filter(|list| !list.is_empty())
    }

    /// Both an API key and a list are needed before anyone can be subscribed
    pub fn is_configured(&self) -> bool { self.api_key().is_some() && self.saved_list().is_some() }

    pub fn signup_label(&self) -> &str {
        match self.signup_label.is_empty() {
            true => DEFAULT_SIGNUP_LABEL,
            false => &self.signup_label,
        }
    }
}

impl Debug for IntegrationSettings {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("IntegrationSettings")
            .field("api_key", &"[REDACTED]")
            .field("saved_list", &self.saved_list)
            .field("signup_label", &self.signup_label)
            .finish()
    }
}
