use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web_flash_messages::FlashMessage;
use anyhow::Context;

use crate::domain::MemberEmail;
use crate::domain::NamePart;
use crate::hooks::PostedRegistration;
use crate::hooks::Registrant;
use crate::hooks::RegistrationHooks;
use crate::routes::error_chain_fmt;
use crate::session_state::TypedSession;
use crate::store::Member;
use crate::store::MemberStore;
use crate::utils::redirect;

#[derive(thiserror::Error)]
pub enum RegistrationError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for RegistrationError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for RegistrationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Who is registering: the member already logged in from this browser, or a
/// new member created from the submitted fields
async fn resolve_registrant(
    form: &PostedRegistration,
    session: &TypedSession,
    members: &dyn MemberStore,
) -> Result<Registrant, RegistrationError> {
    let logged_in = session
        .get_member_id()
        .context("Failed to read member id from session")?;
    if let Some(user_id) = logged_in {
        let known = members
            .get_member(user_id)
            .await
            .context("Failed to look up logged-in member")?;
        // a stale cookie (e.g. after a restart of the memory store) counts as anonymous
        if known.is_some() {
            return Ok(Registrant::LoggedIn(user_id));
        }
    }

    let email =
        MemberEmail::parse(form.rcp_user_email.clone()).map_err(RegistrationError::ValidationError)?;
    let member = Member::new(
        email,
        NamePart::sanitize(&form.rcp_user_first).as_ref().to_string(),
        NamePart::sanitize(&form.rcp_user_last).as_ref().to_string(),
    );
    let user_id = member.user_id;
    members
        .insert_member(member)
        .await
        .context("Failed to store new member")?;

    session.renew();
    session
        .insert_member_id(user_id)
        .context("Failed to write member id to session")?;
    Ok(Registrant::New(user_id))
}

/// `POST /register`
///
/// Creates the member (or picks up the one already logged in), then gives
/// the GetResponse hooks a go. How the subscription went is never reported
/// back to the registrant.
#[tracing::instrument(
    name = "Registering member",
    skip_all,
    fields(
        member_email = %form.rcp_user_email,
        user_id = tracing::field::Empty,
    )
)]
pub async fn register(
    form: web::Form<PostedRegistration>,
    request: HttpRequest,
    session: TypedSession,
    members: web::Data<dyn MemberStore>,
    hooks: web::Data<RegistrationHooks>,
) -> Result<HttpResponse, RegistrationError> {
    let registrant = resolve_registrant(&form, &session, members.get_ref()).await?;
    tracing::Span::current().record("user_id", tracing::field::display(registrant.user_id()));

    let source_ip = request
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default();

    hooks
        .check_for_signup(&form, registrant, &source_ip)
        .await
        .context("Failed to process newsletter signup")?;

    FlashMessage::info("Thank you for registering!").send();
    Ok(redirect("/register"))
}
