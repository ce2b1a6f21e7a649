use actix_web::HttpResponse;

/// Liveness probe, independent of the settings store and the token verifier
pub async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().finish()
}
