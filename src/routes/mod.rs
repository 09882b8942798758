//! API 라우트 설정 모듈
//!
//! # Route Groups
//!
//! | 경로 | 인증 |
//! |------|------|
//! | `GET /health` | 없음 |
//! | `GET /api/v1/auth/{provider}/login` | 없음 |
//! | `GET /api/v1/auth/{provider}/callback` | 없음 |
//! | `POST /api/v1/auth/onboarding` | TEMP_PROVIDE 쿠키 |
//! | `POST /api/v1/auth/refresh` | REFRESH 쿠키 |
//! | `POST /api/v1/auth/logout` | ACCESS 또는 REFRESH (선택) |
//! | `GET/PATCH/DELETE /api/v1/members/me` | ACCESS |
//! | `GET /api/v1/members/check-duplicate` | 없음 |
//! | `GET /api/v1/internal/auth-check` | FONT_CREATE_SERVER Bearer |
//!
//! 같은 스코프 안에서 인증 수준이 다른 엔드포인트는 핸들러 단위로 미들웨어를 겁니다.
//!
//! ```rust,ignore
//! let app = App::new()
//!     .app_data(web::Data::new(registry))
//!     .configure(configure_all_routes);
//! ```

use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_member_routes(cfg);
    configure_internal_routes(cfg);
}

/// 인증 관련 라우트
///
/// ```bash
/// # 로그인 시작
/// curl http://localhost:8080/api/v1/auth/google/login
///
/// # 토큰 재발급 (쿠키 jar 사용)
/// curl -X POST -b cookies.txt -c cookies.txt http://localhost:8080/api/v1/auth/refresh
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::auth::complete_onboarding)
            .service(handlers::auth::refresh_tokens)
            .service(handlers::auth::logout)
            .service(handlers::auth::oauth_login_url)
            .service(handlers::auth::oauth_callback),
    );
}

fn configure_member_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/members")
            .service(handlers::members::check_duplicate)
            .service(handlers::members::get_me)
            .service(handlers::members::update_me)
            .service(handlers::members::disable_me),
    );
}

/// 신뢰된 워커 전용 라우트. 스코프 전체가 FONT_CREATE_SERVER 토큰을 요구합니다.
fn configure_internal_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/internal")
            .wrap(AuthMiddleware::font_create_server())
            .service(handlers::internal::auth_check),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "member_auth_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
        }
    }))
}
