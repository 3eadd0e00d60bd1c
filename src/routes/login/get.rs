use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;

use crate::utils::flash_html;

/// `GET /login`
///
/// The outcome of a failed `POST /login` (or of a logout) arrives as a flash
/// message cookie, not as a query parameter, so the page cannot be made to
/// display arbitrary text.
pub async fn login_form(flash_messages: IncomingFlashMessages) -> HttpResponse {
    let messages = flash_html(&flash_messages);

    let body = format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>Login</title>
  </head>
  <body>
    {messages}
    <!-- POST, otherwise the credentials end up in the URL -->
    <form action="/login" method="post">
      <label>
        Username
        <input type="text" placeholder="Enter Username" name="username" />
      </label>
      <label>
        Password
        <input type="password" placeholder="Enter Password" name="password" />
      </label>
      <button type="submit">Login</button>
    </form>
  </body>
</html>"#,
    );

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
