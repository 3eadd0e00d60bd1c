use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

/// `GET /`
pub async fn home() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>Home</title>
</head>
<body>
    <p>Welcome!</p>
    <ul>
        <li><a href="/register">Register</a></li>
        <li><a href="/login">Administrator login</a></li>
    </ul>
</body>
</html>"#,
        )
}
