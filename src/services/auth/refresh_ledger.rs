//! 리프레시 토큰 원장
//!
//! 회원당 살아 있는 리프레시 토큰을 하나만 기록합니다 (단일 세션 정책).
//! 새 로그인이나 재발급은 기존 기록을 덮어써서 이전 토큰을 무효화합니다.
//!
//! 원장에는 토큰 원문 대신 SHA-256 해시를 보관하고, 재발급은 저장소의 원자적
//! 비교-후-교체로 처리합니다. 같은 토큰으로 두 요청이 동시에 재발급을 시도하면
//! 하나만 성공하고 나머지는 `InvalidRefreshToken`을 받습니다.

use std::sync::Arc;

use chrono::Duration;
use sha2::{Digest, Sha256};

use crate::core::clock::Clock;
use crate::core::errors::{AppError, AppResult};
use crate::repositories::{RefreshTokenRecord, RefreshTokenStore};

/// 토큰 원문의 SHA-256 hex 다이제스트
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

pub struct RefreshTokenLedger {
    store: Arc<dyn RefreshTokenStore>,
    clock: Arc<dyn Clock>,
    lifetime: Duration,
}

impl RefreshTokenLedger {
    pub fn new(store: Arc<dyn RefreshTokenStore>, clock: Arc<dyn Clock>, lifetime: Duration) -> Self {
        Self { store, clock, lifetime }
    }

    fn ttl_seconds(&self) -> u64 {
        self.lifetime.num_seconds().max(1) as u64
    }

    fn record(&self, member_id: &str, refresh_token: &str) -> RefreshTokenRecord {
        let now = self.clock.now();
        RefreshTokenRecord {
            member_id: member_id.to_string(),
            token_hash: hash_token(refresh_token),
            issued_at: now.timestamp(),
            expires_at: (now + self.lifetime).timestamp(),
        }
    }

    /// 기존 기록을 덮어쓰고 REFRESH 유효기간을 TTL로 설정합니다.
    pub async fn save(&self, member_id: &str, refresh_token: &str) -> AppResult<()> {
        self.store.save(&self.record(member_id, refresh_token), self.ttl_seconds()).await
    }

    /// 만료되지 않은 기록만 반환합니다.
    pub async fn get(&self, member_id: &str) -> AppResult<Option<RefreshTokenRecord>> {
        let now = self.clock.now().timestamp();
        Ok(self
            .store
            .get(member_id)
            .await?
            .filter(|record| record.expires_at > now))
    }

    pub async fn remove(&self, member_id: &str) -> AppResult<()> {
        self.store.remove(member_id).await
    }

    /// 제시된 토큰이 현재 기록일 때만 기록을 지웁니다. 지웠으면 `true`
    pub async fn remove_if_current(&self, member_id: &str, presented: &str) -> AppResult<bool> {
        match self.get(member_id).await? {
            Some(current) if current.token_hash == hash_token(presented) => {
                self.store.remove(member_id).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// 제시된 토큰이 현재 기록과 같을 때만 새 토큰으로 교체합니다.
    ///
    /// # Errors
    ///
    /// * `InvalidRefreshToken` - 기록이 없거나(로그아웃/탈퇴/만료) 이미 다른 토큰으로 교체됨
    pub async fn rotate(&self, member_id: &str, presented: &str, next: &str) -> AppResult<()> {
        let expected = hash_token(presented);

        match self.get(member_id).await? {
            Some(current) if current.token_hash == expected => {}
            _ => return Err(AppError::InvalidRefreshToken),
        }

        let swapped = self
            .store
            .rotate(&expected, &self.record(member_id, next), self.ttl_seconds())
            .await?;

        if swapped {
            Ok(())
        } else {
            Err(AppError::InvalidRefreshToken)
        }
    }
}
