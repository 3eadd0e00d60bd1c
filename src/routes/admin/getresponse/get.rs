use actix_web::http::header::ContentType;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;
use htmlescape::encode_attribute;
use htmlescape::encode_minimal;

use crate::domain::MailingLists;
use crate::getresponse::GetResponse;
use crate::store::SettingsStore;
use crate::utils::error_500;
use crate::utils::flash_html_wrapped;

/// Options of the `saved_list` select. Without lists there is a single
/// placeholder option, so the select is never empty.
fn list_options(
    lists: &MailingLists,
    saved_list: Option<&str>,
) -> String {
    if lists.is_empty() {
        return r#"<option value="no list">No lists</option>"#.to_string();
    }
    lists
        .iter()
        .map(|list| {
            let selected = match saved_list == Some(list.id.as_str()) {
                true => r#" selected="selected""#,
                false => "",
            };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                encode_attribute(&list.id),
                encode_minimal(&list.name),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `GET /admin/getresponse`
///
/// Asks GetResponse for the campaigns on every render; with a blank key (or
/// an unreachable endpoint) the page still renders, just without lists.
#[tracing::instrument(name = "Rendering GetResponse settings", skip_all)]
pub async fn getresponse_settings_form(
    settings: web::Data<dyn SettingsStore>,
    getresponse: web::Data<GetResponse>,
    flash_messages: IncomingFlashMessages,
) -> Result<HttpResponse, actix_web::Error> {
    let settings = settings.load().await.map_err(error_500)?;
    let lists = getresponse.fetch_lists(&settings.api_key).await;

    let notices = flash_html_wrapped(
        &flash_messages,
        r#"<div class="updated fade"><p><strong>"#,
        "</strong></p></div>",
    );

    let api_key = encode_attribute(&settings.api_key);
    let options = list_options(&lists, settings.saved_list.as_deref());
    let signup_label = encode_attribute(settings.signup_label());

    let body = format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>GetResponse Settings</title>
  </head>
  <body>
    <h2>GetResponse Settings</h2>
    {notices}
    <form action="/admin/getresponse" method="post">
      <table class="form-table">
        <tr>
          <th><label for="api_key">GetResponse API Key</label></th>
          <td>
            <input class="regular-text" type="text" id="api_key" name="api_key" value="{api_key}" />
            <div class="description">Enter your GetResponse API key to enable a newsletter signup option with the registration form.</div>
          </td>
        </tr>
        <tr>
          <th><label for="saved_list">Newsletter List</label></th>
          <td>
            <select id="saved_list" name="saved_list">
{options}
            </select>
            <div class="description">Choose the list to subscribe users to.</div>
          </td>
        </tr>
        <tr>
          <th><label for="signup_label">Form Label</label></th>
          <td>
            <input class="regular-text" type="text" id="signup_label" name="signup_label" value="{signup_label}" />
            <div class="description">Enter the label to be used for the "Signup for Newsletter" checkbox.</div>
          </td>
        </tr>
      </table>
      <p class="submit">
        <input type="submit" class="button-primary" value="Save Options" />
      </p>
    </form>
    <p><a href="/admin/dashboard">&lt;- Back</a></p>
  </body>
</html>"#
    );

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
