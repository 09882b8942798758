use serde::{Deserialize, Serialize};

use super::provider::OAuthProvider;

/// 프로바이더가 돌려준 원본 사용자 속성 문서
pub type ProviderAttributes = serde_json::Map<String, serde_json::Value>;

/// 정규화된 외부 신원
///
/// 로그인 시도마다 새로 만들어지며 저장되지 않습니다.
/// `(provider, external_id)` 쌍이 Provide 조회 키입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentity {
    pub provider: OAuthProvider,
    pub external_id: String,
    pub email: String,
}
