//! 회원 인증 서비스 백엔드
//!
//! 소셜 로그인으로 들어온 외부 신원을 회원과 연결하고, 온보딩과 다중 토큰 세션을 관리합니다.
//!
//! # Features
//!
//! - **OAuth 2.0**: Google / Naver / Kakao 로그인, 서명된 state
//! - **신원 연동**: (프로바이더, 외부 ID)당 연동 정보 하나, 회원 하나
//! - **온보딩**: 닉네임 중복/금칙어 검사, 약관 동의 후 활성화
//! - **토큰**: ACCESS / REFRESH / TEMP_PROVIDE / FONT_CREATE_SERVER, 종류별 비밀 키와 수명
//! - **리프레시 원장**: 회원당 하나, 해시만 저장, 원자적 회전
//! - **세션 쿠키**: HttpOnly + Secure + SameSite, 인증 실패 시 만료
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ AuthMiddleware  │ ← 토큰 종류별 인증
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답, 쿠키 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ServiceRegistry │ ← 로그인/온보딩/토큰/회원 서비스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 연동 정보/회원, 리프레시 원장
//! └─────────────────┘
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
