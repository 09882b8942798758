//! # HTTP Request Handlers Module
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 로그인/온보딩/토큰/회원 수명주기         ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - MongoDB / Redis / 인메모리 저장소   ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 핸들러는 `web::Data<ServiceRegistry>`에서 서비스를 꺼내 쓰고, 실패는
//! [`RequestContext::fail`](crate::core::request_context::RequestContext::fail)로
//! 상관관계 ID가 붙은 `ApiError`로 바꿔 돌려줍니다.
//!
//! - **`auth`**: OAuth 로그인, 온보딩 완료, 토큰 재발급, 로그아웃
//! - **`members`**: 내 정보 조회/수정/탈퇴, 닉네임 중복 확인
//! - **`internal`**: 신뢰된 워커용 인증 확인

pub mod auth;
pub mod internal;
pub mod members;
