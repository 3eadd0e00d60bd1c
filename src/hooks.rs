//! Glue between the registration flow and GetResponse.
//!
//! The registration pages call into `RegistrationHooks` at three points:
//! while rendering the form (`render_signup_field`), after a member has been
//! registered (`check_for_signup`), and while rendering a member's details in
//! the admin area (`render_signup_notice`).

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::NamePart;
use crate::domain::NewContact;
use crate::getresponse::GetResponse;
use crate::store::MemberStore;
use crate::store::SettingsStore;
use crate::store::StoreError;

/// Name of the checkbox; its presence in a submission is the opt-in
pub const SIGNUP_FIELD: &str = "rcp_getresponse_signup";

/// Member metadata entry set to `"yes"` once a member opted in
pub const SUBSCRIBED_META_KEY: &str = "rcp_subscribed_to_getresponse";

/// Fields posted by the registration form. Only the checkbox matters to the
/// hooks; the rest is what a new member is created from.
#[derive(Deserialize, Debug, Default)]
pub struct PostedRegistration {
    #[serde(default)]
    pub rcp_user_email: String,
    #[serde(default)]
    pub rcp_user_first: String,
    #[serde(default)]
    pub rcp_user_last: String,
    /// Browsers send `on` for a ticked checkbox and nothing at all otherwise
    pub rcp_getresponse_signup: Option<String>,
}

impl PostedRegistration {
    pub fn wants_signup(&self) -> bool { self.rcp_getresponse_signup.is_some() }
}

/// Who just went through the registration form
#[derive(Debug, Clone, Copy)]
pub enum Registrant {
    /// Already had an account and a session; the stored email wins over
    /// whatever was posted
    LoggedIn(Uuid),
    /// Account created by this very submission
    New(Uuid),
}

impl Registrant {
    pub fn user_id(&self) -> Uuid {
        match self {
            Registrant::LoggedIn(id) | Registrant::New(id) => *id,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SignupOutcome {
    /// The checkbox was not ticked; GetResponse was not contacted
    NotRequested,
    /// GetResponse was asked to add the contact
    Attempted { subscribed: bool },
}

pub struct RegistrationHooks {
    getresponse: GetResponse,
    settings: Arc<dyn SettingsStore>,
    members: Arc<dyn MemberStore>,
    record_outcome_optimistically: bool,
}

impl RegistrationHooks {
    pub fn new(
        getresponse: GetResponse,
        settings: Arc<dyn SettingsStore>,
        members: Arc<dyn MemberStore>,
        record_outcome_optimistically: bool,
    ) -> Self {
        Self {
            getresponse,
            settings,
            members,
            record_outcome_optimistically,
        }
    }

    /// The opt-in checkbox, ticked by default, or nothing at all while the
    /// integration is missing an API key or a list.
    pub async fn render_signup_field(&self) -> Result<Option<String>, StoreError> {
        let settings = self.settings.load().await?;
        if !settings.is_configured() {
            return Ok(None);
        }
        let label = htmlescape::encode_minimal(settings.signup_label());
        Ok(Some(format!(
            r#"<p>
  <input id="{SIGNUP_FIELD}" name="{SIGNUP_FIELD}" type="checkbox" checked="checked" />
  <label for="{SIGNUP_FIELD}">{label}</label>
</p>"#
        )))
    }

    /// Subscribe the registrant if they ticked the box.
    ///
    /// What GetResponse answered is never shown to the registrant. It only
    /// decides the member's subscribed flag, and even then only when
    /// outcomes are not recorded optimistically: by default the flag is set
    /// as soon as a subscription was attempted.
    #[tracing::instrument(
        name = "Checking for GetResponse signup",
        skip(self, posted, source_ip),
        fields(user_id = %registrant.user_id())
    )]
    pub async fn check_for_signup(
        &self,
        posted: &PostedRegistration,
        registrant: Registrant,
        source_ip: &str,
    ) -> Result<SignupOutcome, StoreError> {
        if !posted.wants_signup() {
            return Ok(SignupOutcome::NotRequested);
        }

        let email = match registrant {
            Registrant::LoggedIn(user_id) => self
                .members
                .get_member(user_id)
                .await?
                .ok_or(StoreError::UnknownMember(user_id))?
                .email
                .to_string(),
            Registrant::New(_) => posted.rcp_user_email.trim().to_string(),
        };

        let contact = NewContact {
            email,
            first_name: NamePart::sanitize(&posted.rcp_user_first)
                .as_ref()
                .to_string(),
            last_name: NamePart::sanitize(&posted.rcp_user_last)
                .as_ref()
                .to_string(),
            source_ip: source_ip.to_string(),
        };

        let settings = self.settings.load().await?;
        let subscribed = self.getresponse.subscribe(&contact, &settings).await;

        let user_id = registrant.user_id();
        if subscribed || self.record_outcome_optimistically {
            self.members
                .update_meta(user_id, SUBSCRIBED_META_KEY, "yes")
                .await?;
        } else {
            self.members
                .delete_meta(user_id, SUBSCRIBED_META_KEY)
                .await?;
        }

        tracing::info!(subscribed, "GetResponse signup attempted");
        Ok(SignupOutcome::Attempted { subscribed })
    }

    pub async fn is_subscribed(
        &self,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        let flag = self.members.get_meta(user_id, SUBSCRIBED_META_KEY).await?;
        Ok(matches!(flag.as_deref(), Some(v) if !v.is_empty() && v != "0"))
    }

    /// `GetResponse | Yes/No` row for the member details table
    pub async fn render_signup_notice(
        &self,
        user_id: Uuid,
    ) -> Result<String, StoreError> {
        let signed_up = match self.is_subscribed(user_id).await? {
            true => "Yes",
            false => "No",
        };
        Ok(format!(
            r#"<tr class="form-field">
  <th scope="row" valign="top">GetResponse</th>
  <td>{signed_up}</td>
</tr>"#
        ))
    }
}
