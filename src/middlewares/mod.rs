//! 미들웨어 모듈
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - 구간별 토큰 종류 지정 (ACCESS / TEMP_PROVIDE / FONT_CREATE_SERVER)
//! - 쿠키 또는 Bearer 헤더에서 토큰 추출 후 검증
//! - 인증 주체를 request extension에 저장
//! - 실패 시 401과 함께 세션 쿠키 만료
//!
//! ```rust,ignore
//! App::new()
//!     .service(
//!         web::scope("/api/v1/members")
//!             .wrap(AuthMiddleware::access())
//!             .route("/me", web::get().to(get_me))
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
