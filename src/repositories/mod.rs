//! 데이터 액세스 계층
//!
//! 인증 코어는 저장소를 좁은 trait 세 개로만 다룹니다.
//!
//! | trait | 운영 구현 | 테스트 구현 |
//! |-------|-----------|-------------|
//! | [`ProvideStore`] | [`provides::provide_repo::MongoProvideStore`] | [`memory::InMemoryProvideStore`] |
//! | [`MemberStore`] | [`members::member_repo::MongoMemberStore`] | [`memory::InMemoryMemberStore`] |
//! | [`RefreshTokenStore`] | [`tokens::token_repository::RedisRefreshTokenStore`] | [`memory::InMemoryRefreshTokenStore`] |
//!
//! 서비스는 `Arc<dyn Trait>`로 구현을 주입받습니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::{MemberStore, memory::InMemoryMemberStore};
//!
//! let members: Arc<dyn MemberStore> = Arc::new(InMemoryMemberStore::default());
//! let taken = members.exists_by_nickname("alice").await?;
//! ```

pub mod members;
pub mod memory;
pub mod provides;
pub mod tokens;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppResult;
use crate::domain::entities::members::member::Member;
use crate::domain::entities::provides::provide::Provide;
use crate::domain::models::oauth::OAuthProvider;

/// OAuth 연동 정보 저장소
#[async_trait]
pub trait ProvideStore: Send + Sync {
    async fn find_by_identity(&self, provider: OAuthProvider, external_id: &str) -> AppResult<Option<Provide>>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Provide>>;

    /// 연동 정보를 저장합니다 (id 기준 upsert).
    ///
    /// # Errors
    ///
    /// 다른 id에 같은 `(provider, external_id)`가 이미 있으면 `ConflictError`
    async fn save(&self, provide: Provide) -> AppResult<Provide>;

    /// `member_id`가 비어 있을 때만 회원을 연결하고, 연결 결과가 반영된 연동 정보를 반환합니다.
    ///
    /// 이미 다른 회원이 연결되어 있으면 그대로 반환하므로, 호출자는 반환값의
    /// `member_id`로 경쟁에서 이겼는지 판단합니다.
    async fn link_member_if_absent(
        &self,
        provide_id: &str,
        member_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Provide>;
}

/// 회원 저장소
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Member>>;

    /// id 기준 upsert
    async fn save(&self, member: Member) -> AppResult<Member>;

    /// 탈퇴하지 않은 회원 중 닉네임이 정확히(대소문자 구분) 일치하는 회원이 있는지
    async fn exists_by_nickname(&self, nickname: &str) -> AppResult<bool>;

    /// 연결 경쟁에서 진 온보딩 회원 정리용
    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// 리프레시 토큰 원장 레코드
///
/// 토큰 원문은 저장하지 않고 SHA-256 해시만 보관합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub member_id: String,
    pub token_hash: String,
    /// Unix timestamp (초)
    pub issued_at: i64,
    /// Unix timestamp (초)
    pub expires_at: i64,
}

/// 회원당 하나의 리프레시 토큰 레코드를 보관하는 저장소
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// 기존 레코드를 덮어씁니다.
    async fn save(&self, record: &RefreshTokenRecord, ttl_seconds: u64) -> AppResult<()>;

    async fn get(&self, member_id: &str) -> AppResult<Option<RefreshTokenRecord>>;

    async fn remove(&self, member_id: &str) -> AppResult<()>;

    /// 저장된 해시가 `expected_hash`와 같을 때만 `next`로 원자적으로 교체합니다.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 교체됨
    /// * `Ok(false)` - 레코드가 없거나 이미 다른 토큰으로 교체됨
    async fn rotate(&self, expected_hash: &str, next: &RefreshTokenRecord, ttl_seconds: u64) -> AppResult<bool>;
}
