//! Data Transfer Objects
//!
//! HTTP 요청/응답 본문을 정의합니다. 요청 DTO는 `validator`로 형식을 검증하고,
//! 도메인 규칙(약관 동의, 닉네임 중복, 금칙어)은 서비스 계층에서 검사합니다.

pub mod auth;
pub mod members;
