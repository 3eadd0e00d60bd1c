use std::ops::Deref;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::error::InternalError;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web_lab::middleware::Next;

use crate::session_state::TypedSession;
use crate::utils::error_500;
use crate::utils::redirect;

/// Username of the logged-in administrator, attached to every request under
/// `/admin` (extract it with `web::ReqData<AdminName>`)
#[derive(Clone, Debug)]
pub struct AdminName(String);

impl Deref for AdminName {
    type Target = str;
    fn deref(&self) -> &Self::Target { &self.0 }
}

/// Middleware (see `actix_web_lab::middleware::from_fn`) for the `/admin`
/// scope. Anonymous requests are redirected to `/login` and never reach a
/// handler.
pub async fn reject_anonymous_users(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let session = {
        let (raw_req, payload) = req.parts_mut();
        TypedSession::from_request(raw_req, payload).await?
    };

    match session.get_admin().map_err(error_500)? {
        Some(username) => {
            req.extensions_mut().insert(AdminName(username));
            next.call(req).await
        }
        None => {
            let resp = redirect("/login");
            let err = anyhow::anyhow!("You must be logged in to access this resource.");
            Err(InternalError::from_response(err, resp).into())
        }
    }
}
