use actix_web::http::header::ContentType;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;

use crate::hooks::RegistrationHooks;
use crate::utils::error_500;
use crate::utils::flash_html;

/// `GET /register`
///
/// The newsletter checkbox sits right before the submit button, and only
/// once GetResponse has been configured.
pub async fn registration_form(
    hooks: web::Data<RegistrationHooks>,
    flash_messages: IncomingFlashMessages,
) -> Result<HttpResponse, actix_web::Error> {
    let messages = flash_html(&flash_messages);
    let signup_field = hooks
        .render_signup_field()
        .await
        .map_err(error_500)?
        .unwrap_or_default();

    let body = format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>Register</title>
  </head>
  <body>
    {messages}
    <form action="/register" method="post">
      <p>
        <label for="rcp_user_email">Email</label>
        <input type="text" id="rcp_user_email" name="rcp_user_email" />
      </p>
      <p>
        <label for="rcp_user_first">First Name</label>
        <input type="text" id="rcp_user_first" name="rcp_user_first" />
      </p>
      <p>
        <label for="rcp_user_last">Last Name</label>
        <input type="text" id="rcp_user_last" name="rcp_user_last" />
      </p>
{signup_field}
      <p>
        <input type="submit" value="Register" />
      </p>
    </form>
  </body>
</html>"#
    );

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
