//! # Core
//!
//! 애플리케이션 전역에서 쓰는 기반 요소입니다.
//!
//! - [`errors`] - 도메인 에러(`AppError`)와 HTTP 경계 에러(`ApiError`)
//! - [`clock`] - 주입 가능한 시간 소스
//! - [`registry`] - 서비스 조립 컨테이너
//! - [`request_context`] - 상관관계 ID와 핸들러용 요청 컨텍스트

pub mod clock;
pub mod errors;
pub mod registry;
pub mod request_context;

pub use errors::*;
pub use registry::*;
