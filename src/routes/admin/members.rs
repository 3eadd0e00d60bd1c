use actix_web::http::header::ContentType;
use actix_web::web;
use actix_web::HttpResponse;
use htmlescape::encode_minimal;
use uuid::Uuid;

use crate::hooks::RegistrationHooks;
use crate::store::MemberStore;
use crate::utils::error_500;

/// `GET /admin/members`
pub async fn list_members(members: web::Data<dyn MemberStore>) -> Result<HttpResponse, actix_web::Error> {
    let members = members.list_members().await.map_err(error_500)?;

    let rows = members
        .iter()
        .map(|m| {
            format!(
                r#"<tr><td><a href="/admin/members/{id}">{email}</a></td><td>{first} {last}</td></tr>"#,
                id = m.user_id,
                email = encode_minimal(m.email.as_ref()),
                first = encode_minimal(&m.first_name),
                last = encode_minimal(&m.last_name),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>Members</title>
  </head>
  <body>
    <h2>Members</h2>
    <table>
      <tr><th>Email</th><th>Name</th></tr>
{rows}
    </table>
    <p><a href="/admin/dashboard">&lt;- Back</a></p>
  </body>
</html>"#
    );

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

/// `GET /admin/members/{user_id}`
///
/// 404 for an id that isn't a registered member
#[tracing::instrument(name = "Rendering member details", skip(members, hooks))]
pub async fn member_details(
    user_id: web::Path<Uuid>,
    members: web::Data<dyn MemberStore>,
    hooks: web::Data<RegistrationHooks>,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = user_id.into_inner();
    let Some(member) = members.get_member(user_id).await.map_err(error_500)? else {
        return Ok(HttpResponse::NotFound().finish());
    };
    let signup_notice = hooks
        .render_signup_notice(user_id)
        .await
        .map_err(error_500)?;

    let email = encode_minimal(member.email.as_ref());
    let first = encode_minimal(&member.first_name);
    let last = encode_minimal(&member.last_name);

    let body = format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>Member details</title>
  </head>
  <body>
    <h2>{email}</h2>
    <table class="form-table">
      <tr class="form-field">
        <th scope="row" valign="top">Name</th>
        <td>{first} {last}</td>
      </tr>
{signup_notice}
    </table>
    <p><a href="/admin/members">&lt;- Back</a></p>
  </body>
</html>"#
    );

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
