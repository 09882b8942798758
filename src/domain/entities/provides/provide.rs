//! Provide Entity Implementation
//!
//! 외부 OAuth 신원 하나와 (최종적으로) 회원 하나를 잇는 연동 정보입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::oauth::{ExternalIdentity, OAuthProvider};

/// OAuth 연동 정보 엔티티
///
/// `(provider, external_id)` 쌍은 유일합니다. `member_id`는 처음 연결된 뒤로
/// 절대 지워지거나 다른 회원으로 바뀌지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provide {
    #[serde(rename = "_id")]
    pub id: String,
    pub provider: OAuthProvider,
    pub external_id: String,
    pub email: String,
    #[serde(default)]
    pub member_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Provide {
    /// 아직 회원과 연결되지 않은 새 연동 정보
    pub fn from_identity(identity: &ExternalIdentity, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider: identity.provider,
            external_id: identity.external_id.clone(),
            email: identity.email.clone(),
            member_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.member_id.is_some()
    }

    /// 회원을 연결합니다.
    ///
    /// 이미 연결되어 있으면 아무것도 바꾸지 않고 `false`를 반환합니다.
    pub fn link_member(&mut self, member_id: &str, now: DateTime<Utc>) -> bool {
        if self.member_id.is_some() {
            return false;
        }
        self.member_id = Some(member_id.to_string());
        self.updated_at = now;
        true
    }
}
