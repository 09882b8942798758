//! Member Entity Implementation
//!
//! 애플리케이션 계정(회원) 엔티티입니다. 어떤 OAuth 프로바이더로 가입했는지와
//! 무관하며, 연동 정보는 [`Provide`](crate::domain::entities::provides::provide::Provide)가 가집니다.
//!
//! ## 상태 전이
//!
//! ```text
//! ONBOARDING ──complete_onboarding──▶ ACTIVATE ──disable──▶ DEACTIVATE
//! ```
//!
//! `DEACTIVATE`는 종료 상태이며 되돌릴 수 없습니다.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{AppError, AppResult};

/// 회원 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Onboarding,
    Activate,
    Deactivate,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Onboarding => "ONBOARDING",
            MemberStatus::Activate => "ACTIVATE",
            MemberStatus::Deactivate => "DEACTIVATE",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 성별
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    #[default]
    None,
}

/// 온보딩 완료 시 입력받는 프로필
#[derive(Debug, Clone)]
pub struct OnboardingProfile {
    pub nickname: String,
    pub gender: Gender,
    pub birth: Option<NaiveDate>,
    pub terms: bool,
    pub profile_image_key: Option<String>,
}

/// 활성 회원의 프로필 수정 내용
///
/// `None`인 필드는 변경하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub birth: Option<NaiveDate>,
    pub profile_image_key: Option<String>,
}

/// 회원 엔티티
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: String,
    /// 온보딩 전에는 비어 있음
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub birth: Option<NaiveDate>,
    pub terms: bool,
    #[serde(default)]
    pub profile_image_key: Option<String>,
    pub status: MemberStatus,
    /// 이 회원을 만든 OAuth 연동 정보 ID
    pub provide_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Member {
    /// 연동 정보가 처음 확인되었을 때 만드는 온보딩 상태의 회원
    ///
    /// 프로필 필드는 모두 기본값(비어 있음)이고 약관은 미동의 상태입니다.
    pub fn new_onboarding(provide_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            nickname: None,
            gender: Gender::None,
            birth: None,
            terms: false,
            profile_image_key: None,
            status: MemberStatus::Onboarding,
            provide_id: provide_id.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Activate
    }

    pub fn is_disabled(&self) -> bool {
        self.status == MemberStatus::Deactivate
    }

    /// 온보딩 완료 (`ONBOARDING` → `ACTIVATE`)
    ///
    /// 닉네임 중복/금칙어 검사는 호출자가 먼저 수행해야 합니다.
    ///
    /// # Errors
    ///
    /// * `InvalidStateTransition` - 온보딩 상태가 아닌 회원
    /// * `ValidationError` - 약관 미동의
    pub fn complete_onboarding(&mut self, profile: OnboardingProfile, now: DateTime<Utc>) -> AppResult<()> {
        if self.status != MemberStatus::Onboarding {
            return Err(AppError::InvalidStateTransition {
                from: self.status,
                action: "온보딩 완료",
            });
        }
        if !profile.terms {
            return Err(AppError::ValidationError("약관 동의가 필요합니다".to_string()));
        }

        self.nickname = Some(profile.nickname);
        self.gender = profile.gender;
        self.birth = profile.birth;
        self.terms = true;
        self.profile_image_key = profile.profile_image_key;
        self.status = MemberStatus::Activate;
        self.updated_at = now;
        Ok(())
    }

    /// 활성 회원의 프로필 수정
    pub fn update_profile(&mut self, changes: ProfileChanges, now: DateTime<Utc>) -> AppResult<()> {
        if self.status != MemberStatus::Activate {
            return Err(AppError::InvalidStateTransition {
                from: self.status,
                action: "프로필 수정",
            });
        }

        if let Some(nickname) = changes.nickname {
            self.nickname = Some(nickname);
        }
        if let Some(gender) = changes.gender {
            self.gender = gender;
        }
        if let Some(birth) = changes.birth {
            self.birth = Some(birth);
        }
        if let Some(key) = changes.profile_image_key {
            self.profile_image_key = Some(key);
        }
        self.updated_at = now;
        Ok(())
    }

    /// 회원 탈퇴 (`ACTIVATE` → `DEACTIVATE`)
    ///
    /// # Errors
    ///
    /// * `AlreadyDisabled` - 이미 탈퇴한 회원
    /// * `InvalidStateTransition` - 온보딩을 마치지 않은 회원
    pub fn disable(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        match self.status {
            MemberStatus::Activate => {
                self.status = MemberStatus::Deactivate;
                self.deleted_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
            MemberStatus::Deactivate => Err(AppError::AlreadyDisabled),
            MemberStatus::Onboarding => Err(AppError::InvalidStateTransition {
                from: self.status,
                action: "탈퇴",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(nickname: &str, terms: bool) -> OnboardingProfile {
        OnboardingProfile {
            nickname: nickname.to_string(),
            gender: Gender::Female,
            birth: NaiveDate::from_ymd_opt(1995, 3, 14),
            terms,
            profile_image_key: None,
        }
    }

    #[test]
    fn test_new_member_starts_onboarding() {
        let now = Utc::now();
        let member = Member::new_onboarding("provide-1", now);

        assert_eq!(member.status, MemberStatus::Onboarding);
        assert_eq!(member.provide_id, "provide-1");
        assert!(member.nickname.is_none());
        assert!(!member.terms);
        assert_eq!(member.gender, Gender::None);
        assert!(member.deleted_at.is_none());
    }

    #[test]
    fn test_complete_onboarding_activates_once() {
        let now = Utc::now();
        let mut member = Member::new_onboarding("provide-1", now);

        member.complete_onboarding(profile("alice", true), now).unwrap();
        assert_eq!(member.status, MemberStatus::Activate);
        assert!(member.is_active());
        assert_eq!(member.nickname.as_deref(), Some("alice"));
        assert!(member.terms);

        let again = member.complete_onboarding(profile("alice2", true), now);
        assert!(matches!(
            again,
            Err(AppError::InvalidStateTransition {
                from: MemberStatus::Activate,
                ..
            })
        ));
        assert_eq!(member.nickname.as_deref(), Some("alice"));
    }

    #[test]
    fn test_complete_onboarding_requires_terms() {
        let now = Utc::now();
        let mut member = Member::new_onboarding("provide-1", now);

        let result = member.complete_onboarding(profile("alice", false), now);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert_eq!(member.status, MemberStatus::Onboarding);
    }

    #[test]
    fn test_disable_transitions() {
        let now = Utc::now();
        let mut onboarding = Member::new_onboarding("provide-1", now);
        assert!(matches!(
            onboarding.disable(now),
            Err(AppError::InvalidStateTransition { .. })
        ));

        let mut member = onboarding.clone();
        member.complete_onboarding(profile("bob", true), now).unwrap();
        member.disable(now).unwrap();
        assert!(member.is_disabled());
        assert_eq!(member.deleted_at, Some(now));

        assert!(matches!(member.disable(now), Err(AppError::AlreadyDisabled)));
        onboarding.status = MemberStatus::Deactivate;
        assert!(matches!(
            onboarding.complete_onboarding(profile("carol", true), now),
            Err(AppError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_update_profile_only_when_active() {
        let now = Utc::now();
        let mut member = Member::new_onboarding("provide-1", now);
        let changes = ProfileChanges {
            nickname: Some("dave".to_string()),
            ..Default::default()
        };
        assert!(member.update_profile(changes.clone(), now).is_err());

        member.complete_onboarding(profile("alice", true), now).unwrap();
        member.update_profile(changes, now).unwrap();
        assert_eq!(member.nickname.as_deref(), Some("dave"));
        assert_eq!(member.gender, Gender::Female);
    }

    #[test]
    fn test_member_serialization_uses_wire_names() {
        let member = Member::new_onboarding("provide-1", Utc::now());
        let json = serde_json::to_value(&member).unwrap();

        assert_eq!(json["status"], "ONBOARDING");
        assert_eq!(json["gender"], "NONE");
        assert_eq!(json["provideId"], "provide-1");
        assert!(json.get("_id").is_some());
    }
}
