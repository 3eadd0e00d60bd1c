use actix_web::http::header::ContentType;
use actix_web::web;
use actix_web::HttpResponse;

use crate::authentication::AdminName;

/// `GET /admin/dashboard`
pub async fn admin_dashboard(admin: web::ReqData<AdminName>) -> HttpResponse {
    let username = htmlescape::encode_minimal(&admin);

    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>Admin dashboard</title>
</head>
<body>
    <p>Welcome {username}!</p>
    <p>Available actions:</p>
    <ol>
        <li><a href="/admin/getresponse">GetResponse settings</a></li>
        <li><a href="/admin/members">Members</a></li>
        <li>
            <form name="logoutForm" action="/admin/logout" method="post">
                <input type="submit" value="Logout">
            </form>
        </li>
    </ol>
</body>
</html>"#
    );

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
