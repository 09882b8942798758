//! # Redis 클라이언트
//!
//! 리프레시 토큰 원장이 사용하는 Redis 접근 래퍼입니다.
//! 값은 JSON 문자열로 저장하며, 연결은 멀티플렉싱 연결을 사용합니다.
//!
//! 원장 회전에 필요한 원자적 비교-후-교체는 Lua 스크립트([`RedisClient::compare_and_swap`])로
//! 한 번의 왕복 안에서 처리합니다.

use std::env;

use redis::{AsyncCommands, Client, Script};
use serde::{de::DeserializeOwned, Serialize};

/// 저장된 JSON 레코드의 한 필드가 기대값과 같을 때만 교체합니다.
///
/// KEYS[1] = 키, ARGV = [필드 이름, 기대값, 새 JSON, TTL(초)]
/// 반환값 1 = 교체됨, 0 = 키 없음 또는 불일치
const COMPARE_AND_SWAP_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
    return 0
end
local record = cjson.decode(current)
if record[ARGV[1]] ~= ARGV[2] then
    return 0
end
redis.call('SET', KEYS[1], ARGV[3], 'EX', tonumber(ARGV[4]))
return 1
"#;

fn serde_failure(context: &'static str, e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, context, e.to_string()))
}

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

impl RedisClient {
    /// `REDIS_URL`(기본값 `redis://localhost:6379`)로 연결하고 PING으로 가용성을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let deserialized =
                    serde_json::from_str(&json).map_err(|e| serde_failure("Deserialization failed", e))?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serde_failure("Serialization failed", e))?;
        conn.set_ex(key, json, seconds).await
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    /// 저장된 레코드의 `field`가 `expected`와 같을 때만 `value`로 교체하고 TTL을 다시 설정합니다.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 교체됨
    /// * `Ok(false)` - 키가 없거나 필드 값이 다름
    pub async fn compare_and_swap<T: Serialize>(
        &self,
        key: &str,
        field: &str,
        expected: &str,
        value: &T,
        seconds: u64,
    ) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serde_failure("Serialization failed", e))?;

        let swapped: i32 = Script::new(COMPARE_AND_SWAP_SCRIPT)
            .key(key)
            .arg(field)
            .arg(expected)
            .arg(json)
            .arg(seconds)
            .invoke_async(&mut conn)
            .await?;

        Ok(swapped == 1)
    }
}
