use std::future::ready;
use std::future::Ready;

use actix_session::Session;
use actix_session::SessionExt;
use actix_session::SessionGetError;
use actix_session::SessionInsertError;
use actix_web::FromRequest;
use uuid::Uuid;

/// Wrapper around `actix_session::Session`, so that keys are methods instead
/// of Strings.
///
/// One cookie carries two independent identities: the administrator (by
/// username) and the member who registered from this browser (by id).
pub struct TypedSession(Session);

impl TypedSession {
    const ADMIN_KEY: &'static str = "admin_username";
    const MEMBER_ID_KEY: &'static str = "member_id";

    /// New session id on every privilege change (session fixation)
    pub fn renew(&self) { self.0.renew(); }

    pub fn insert_admin(
        &self,
        username: &str,
    ) -> Result<(), SessionInsertError> {
        self.0.insert(Self::ADMIN_KEY, username)
    }

    pub fn get_admin(&self) -> Result<Option<String>, SessionGetError> { self.0.get(Self::ADMIN_KEY) }

    /// Only the admin identity is dropped; a member logged in from the same
    /// browser stays logged in
    pub fn log_out_admin(&self) { self.0.remove(Self::ADMIN_KEY); }

    pub fn insert_member_id(
        &self,
        member_id: Uuid,
    ) -> Result<(), SessionInsertError> {
        self.0.insert(Self::MEMBER_ID_KEY, member_id)
    }

    pub fn get_member_id(&self) -> Result<Option<Uuid>, SessionGetError> { self.0.get(Self::MEMBER_ID_KEY) }
}

impl FromRequest for TypedSession {
    // same error as the `FromRequest` impl of `Session`
    type Error = <Session as FromRequest>::Error;

    // no I/O involved, so the future is ready immediately
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
