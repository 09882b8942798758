//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 요청 DTO의 선택 문자열 정리
//! - [`display_terminal`] - 서버 기동 단계 출력

pub mod string_utils;
pub mod display_terminal;
