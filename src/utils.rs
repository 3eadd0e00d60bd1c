use std::fmt::Debug;
use std::fmt::Display;

use actix_web::http::header::LOCATION;
use actix_web::HttpResponse;

/// Convert arbitrary error types to `actix_web::Error` with HTTP 500
pub fn error_500<T>(e: T) -> actix_web::Error
where
    T: Debug + Display + 'static,
{
    actix_web::error::ErrorInternalServerError(e)
}

/// 303, so that the browser follows up with a `GET`
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

/// Flash messages rendered as paragraphs, in the order they were sent
pub fn flash_html(messages: &actix_web_flash_messages::IncomingFlashMessages) -> String {
    flash_html_wrapped(messages, "<p><i>", "</i></p>\n")
}

/// Flash messages, escaped, each between `open` and `close`
pub fn flash_html_wrapped(
    messages: &actix_web_flash_messages::IncomingFlashMessages,
    open: &str,
    close: &str,
) -> String {
    let mut html = String::new();
    for msg in messages.iter() {
        html.push_str(open);
        html.push_str(&htmlescape::encode_minimal(msg.content()));
        html.push_str(close);
    }
    html
}
