//! 인증 관련 응답 DTO

use serde::{Deserialize, Serialize};

use crate::domain::dto::members::response::MemberResponse;

/// OAuth 로그인 시작 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUrlResponse {
    pub login_url: String,
    pub state: String,
}

/// 로그인/온보딩/재발급 결과
///
/// 토큰 자체는 쿠키로만 전달하고 본문에는 싣지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionResponse {
    /// ACCESS + REFRESH 쿠키 발급됨
    Authenticated { member: MemberResponse },
    /// TEMP_PROVIDE 쿠키 발급됨, 온보딩 완료 필요
    OnboardingRequired {
        #[serde(rename = "provideId")]
        provide_id: String,
    },
}

/// 단순 메시지 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
