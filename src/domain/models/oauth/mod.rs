//! OAuth 관련 도메인 모델
//!
//! - [`provider`] - 지원 프로바이더의 닫힌 열거형
//! - [`identity`] - 프로바이더 응답에서 정규화한 외부 신원

pub mod identity;
pub mod provider;

pub use identity::*;
pub use provider::*;
