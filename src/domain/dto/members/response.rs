//! 회원 관련 응답 DTO

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::members::member::{Gender, Member, MemberStatus};

/// 클라이언트에 노출하는 회원 요약
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub nickname: Option<String>,
    pub gender: Gender,
    pub birth: Option<NaiveDate>,
    pub profile_image_key: Option<String>,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            nickname: member.nickname,
            gender: member.gender,
            birth: member.birth,
            profile_image_key: member.profile_image_key,
            status: member.status,
            created_at: member.created_at,
        }
    }
}

/// 닉네임 중복 확인 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheckResponse {
    pub duplicate: bool,
}
