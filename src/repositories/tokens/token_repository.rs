use std::sync::Arc;

use async_trait::async_trait;

use crate::caching::redis::RedisClient;
use crate::core::errors::{AppError, AppResult};
use crate::repositories::{RefreshTokenRecord, RefreshTokenStore};

/// Redis 기반 리프레시 토큰 저장소
pub struct RedisRefreshTokenStore {
    redis: Arc<RedisClient>,
}

impl RedisRefreshTokenStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    fn key(member_id: &str) -> String {
        format!("refresh_token:{}", member_id)
    }
}

#[async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn save(&self, record: &RefreshTokenRecord, ttl_seconds: u64) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Err(AppError::InternalError("TTL cannot be zero".to_string()));
        }

        self.redis
            .set_with_expiry(&Self::key(&record.member_id), record, ttl_seconds)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    async fn get(&self, member_id: &str) -> AppResult<Option<RefreshTokenRecord>> {
        self.redis
            .get::<RefreshTokenRecord>(&Self::key(member_id))
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    async fn remove(&self, member_id: &str) -> AppResult<()> {
        self.redis
            .del(&Self::key(member_id))
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    async fn rotate(&self, expected_hash: &str, next: &RefreshTokenRecord, ttl_seconds: u64) -> AppResult<bool> {
        if ttl_seconds == 0 {
            return Err(AppError::InternalError("TTL cannot be zero".to_string()));
        }

        self.redis
            .compare_and_swap(&Self::key(&next.member_id), "token_hash", expected_hash, next, ttl_seconds)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(RedisRefreshTokenStore::key("member-1"), "refresh_token:member-1");
    }

    #[test]
    fn test_record_json_field_names() {
        let record = RefreshTokenRecord {
            member_id: "member-1".to_string(),
            token_hash: "abc".to_string(),
            issued_at: 1,
            expires_at: 2,
        };
        let json = serde_json::to_value(&record).unwrap();
        // Lua 스크립트가 이 필드 이름으로 비교합니다.
        assert_eq!(json["token_hash"], "abc");
        assert_eq!(json["member_id"], "member-1");
    }
}
