//! # Configuration Module
//!
//! 환경 변수 기반 설정을 한곳에서 관리합니다.
//!
//! - [`data_config`] - 실행 환경, 서버 바인딩, 요청 제한, CORS
//! - [`auth_config`] - 토큰 종류별 키/유효기간, 세션 쿠키, OAuth 프로바이더
//!
//! 민감한 값은 환경 변수로만 받습니다. 개발 환경에서는 기본값으로 대체하고 경고를 남기며,
//! 프로덕션에서 필수 값이 빠지면 서버가 시작되지 않습니다.
//!
//! ```bash
//! export ENVIRONMENT="production"
//! export ACCESS_TOKEN_SECRET="..."
//! export REFRESH_TOKEN_SECRET="..."
//! export TEMP_PROVIDE_TOKEN_SECRET="..."
//! export FONT_CREATE_SERVER_TOKEN_SECRET="..."
//! export OAUTH_STATE_SECRET="..."
//! export GOOGLE_CLIENT_ID="..." GOOGLE_CLIENT_SECRET="..." GOOGLE_REDIRECT_URI="..."
//! export COOKIE_SAME_SITE="Lax"
//! ```

pub mod auth_config;
pub mod data_config;

pub use auth_config::*;
pub use data_config::*;
