//! 내부 워커용 핸들러
use actix_web::{get, HttpResponse};
use serde_json::json;

use crate::domain::models::auth::ServerPrincipal;

/// FONT_CREATE_SERVER 토큰 확인
///
/// # Endpoint
/// `GET /internal/auth-check`
#[get("/auth-check")]
pub async fn auth_check(principal: ServerPrincipal) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "authenticated": true,
        "subject": principal.subject,
    }))
}
