//! 캐시/키-값 저장 계층
//!
//! Redis를 백엔드로 사용하며, 리프레시 토큰 원장의 영속 저장소 역할을 합니다.
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let redis = RedisClient::new().await?;
//! redis.set_with_expiry("refresh_token:member-1", &record, 1_209_600).await?;
//! let swapped = redis
//!     .compare_and_swap("refresh_token:member-1", "token_hash", &old_hash, &new_record, 1_209_600)
//!     .await?;
//! ```
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
