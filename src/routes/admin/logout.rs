use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;

use crate::session_state::TypedSession;
use crate::utils::redirect;

/// `POST /admin/logout`
///
/// Only reachable by a logged-in administrator (see `reject_anonymous_users`)
pub async fn logout(session: TypedSession) -> HttpResponse {
    session.log_out_admin();
    FlashMessage::info("You have successfully logged out.").send();
    redirect("/login")
}
