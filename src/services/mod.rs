//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 저장소를 trait 객체로, 시간을 [`Clock`](crate::core::clock::Clock)으로 주입받으며
//! [`ServiceRegistry`](crate::core::registry::ServiceRegistry)가 한 번에 조립합니다.
//!
//! - [`auth`] - 토큰, 신원 정규화, 원장, 쿠키, OAuth, 로그인 오케스트레이션
//! - [`members`] - 회원 조회/수정/탈퇴, 금칙어 필터

pub mod auth;
pub mod members;
