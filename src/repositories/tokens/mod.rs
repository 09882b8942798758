//! 리프레시 토큰 원장 저장소 (Redis)
//!
//! - 키: `refresh_token:{member_id}`
//! - 값: [`RefreshTokenRecord`](crate::repositories::RefreshTokenRecord) JSON
//! - TTL: REFRESH 토큰 유효기간
//!
//! ```rust,ignore
//! use crate::repositories::tokens::token_repository::RedisRefreshTokenStore;
//!
//! let store = RedisRefreshTokenStore::new(redis.clone());
//! store.save(&record, 1_209_600).await?;
//! let rotated = store.rotate(&old_hash, &next_record, 1_209_600).await?;
//! ```

pub mod token_repository;

pub use token_repository::*;
