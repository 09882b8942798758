//! # Domain Layer Module
//!
//! 도메인 계층은 인증 코어의 상태와 규칙을 담습니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - 영속 엔티티 (Provide, Member)와 상태 전이 규칙
//! ├── models    - 요청 처리 중에만 쓰는 값 (외부 신원, 토큰, 인증 주체)
//! └── dto       - HTTP 요청/응답 계약
//!      │
//!      ▼
//! Application Layer (services)
//!      │
//!      ▼
//! Infrastructure Layer (repositories, db, caching)
//! ```
//!
//! ## 핵심 불변식
//!
//! - `(provider, externalId)` 쌍마다 Provide는 하나뿐입니다.
//! - Provide의 `memberId`는 한 번 설정되면 바뀌지 않습니다.
//! - 회원 상태는 `ONBOARDING → ACTIVATE → DEACTIVATE` 순으로만 움직입니다.
//! - 토큰 종류는 서로 바꿔 쓸 수 없습니다.

pub mod dto;
pub mod entities;
pub mod models;
