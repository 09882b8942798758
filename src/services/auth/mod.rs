//! 인증 및 세션 서비스 모듈
//!
//! # Features
//!
//! - [`token_service`] - 네 종류 토큰의 발급/검증 (종류별 비밀키와 유효기간)
//! - [`identity_resolver`] - 프로바이더 속성 → 외부 신원 정규화
//! - [`refresh_ledger`] - 회원당 하나의 리프레시 토큰 기록과 회전
//! - [`session_cookie`] - 세션 쿠키 인코딩/추출/삭제
//! - [`oauth_service`] - OAuth 2.0 authorization code 클라이언트
//! - [`auth_service`] - 로그인/온보딩/재발급/로그아웃 오케스트레이션
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::auth_service::{AuthService, LoginOutcome};
//!
//! match auth_service.login("google", &attributes, &correlation_id).await? {
//!     LoginOutcome::Authenticated { member, tokens } => { /* ACCESS + REFRESH 쿠키 */ }
//!     LoginOutcome::OnboardingRequired { token, .. } => { /* TEMP_PROVIDE 쿠키 */ }
//! }
//! ```

pub mod auth_service;
pub mod identity_resolver;
pub mod oauth_service;
pub mod refresh_ledger;
pub mod session_cookie;
pub mod token_service;

pub use auth_service::{AuthService, LoginOutcome, OnboardingResult};
pub use identity_resolver::IdentityResolver;
pub use oauth_service::{HttpUserInfoFetcher, OAuthService, UserInfoFetcher};
pub use refresh_ledger::RefreshTokenLedger;
pub use session_cookie::SessionCookieCodec;
pub use token_service::TokenService;
