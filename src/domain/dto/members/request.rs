//! 회원 관련 요청 DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::dto::auth::request::validate_nickname;
use crate::domain::entities::members::member::{Gender, ProfileChanges};
use crate::utils::string_utils::deserialize_optional_string;

/// 프로필 수정 요청 (부분 수정)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 20, message = "닉네임은 2-20자 사이여야 합니다"))]
    #[validate(custom(function = "validate_nickname"))]
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 512, message = "이미지 키가 너무 깁니다"))]
    pub profile_image_key: Option<String>,
}

impl UpdateProfileRequest {
    pub fn into_changes(self) -> ProfileChanges {
        ProfileChanges {
            nickname: self.nickname,
            gender: self.gender,
            birth: self.birth,
            profile_image_key: self.profile_image_key,
        }
    }
}

/// 닉네임 중복 확인 쿼리
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NicknameQuery {
    #[validate(length(min = 1, message = "닉네임을 입력해주세요"))]
    pub nickname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }

    #[test]
    fn test_update_nickname_is_validated() {
        let req = UpdateProfileRequest {
            nickname: Some("x".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
