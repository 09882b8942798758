//! 인증 관련 요청 DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::members::member::{Gender, OnboardingProfile};
use crate::utils::string_utils::deserialize_optional_string;

/// 온보딩 완료 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    /// 닉네임 (2-20자, 앞뒤 공백 불가)
    #[validate(length(min = 2, max = 20, message = "닉네임은 2-20자 사이여야 합니다"))]
    #[validate(custom(function = "validate_nickname"))]
    pub nickname: String,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default)]
    pub birth: Option<NaiveDate>,

    /// 약관 동의 여부 (반드시 true)
    pub terms: bool,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 512, message = "이미지 키가 너무 깁니다"))]
    pub profile_image_key: Option<String>,
}

impl OnboardingRequest {
    pub fn into_profile(self) -> OnboardingProfile {
        OnboardingProfile {
            nickname: self.nickname,
            gender: self.gender,
            birth: self.birth,
            terms: self.terms,
            profile_image_key: self.profile_image_key,
        }
    }
}

/// 닉네임 형식 검증 (공백 문자로 시작/끝나거나 제어 문자를 포함하면 거부)
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if nickname.trim() != nickname {
        return Err(ValidationError::new("nickname_whitespace")
            .with_message("닉네임 앞뒤에 공백을 넣을 수 없습니다".into()));
    }
    if nickname.chars().any(|c| c.is_control()) {
        return Err(ValidationError::new("nickname_control_char")
            .with_message("닉네임에 사용할 수 없는 문자가 있습니다".into()));
    }
    Ok(())
}

/// OAuth 콜백 쿼리 파라미터
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(nickname: &str) -> OnboardingRequest {
        OnboardingRequest {
            nickname: nickname.to_string(),
            gender: Gender::None,
            birth: None,
            terms: true,
            profile_image_key: None,
        }
    }

    #[test]
    fn test_valid_onboarding_request() {
        assert!(request("alice").validate().is_ok());
        assert!(request("한글닉네임").validate().is_ok());
    }

    #[test]
    fn test_invalid_nicknames() {
        assert!(request("a").validate().is_err());
        assert!(request(" alice").validate().is_err());
        assert!(request("al\tice").validate().is_err());
        assert!(request(&"x".repeat(21)).validate().is_err());
    }

    #[test]
    fn test_onboarding_request_deserialization() {
        let json = r#"{"nickname":"alice","gender":"FEMALE","birth":"1995-03-14","terms":true}"#;
        let req: OnboardingRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.gender, Gender::Female);
        assert_eq!(req.birth, NaiveDate::from_ymd_opt(1995, 3, 14));
        assert!(req.profile_image_key.is_none());
    }
}
