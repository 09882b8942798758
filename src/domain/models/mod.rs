//! 도메인 모델
//!
//! 저장되지 않고 요청 처리 중에만 쓰이는 값 타입들입니다.
//!
//! - [`oauth`] - 프로바이더 열거형과 정규화된 외부 신원
//! - [`token`] - 토큰 종류, 클레임, 발급 결과
//! - [`auth`] - 인증 모드와 요청 extensions에 실리는 인증 주체

pub mod auth;
pub mod oauth;
pub mod token;
