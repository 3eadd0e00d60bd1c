use actix_web::HttpResponse;

/// `GET /health_check`
///
/// 200 with an empty body; no store or GetResponse access involved
pub async fn health_check() -> HttpResponse { HttpResponse::Ok().finish() }
