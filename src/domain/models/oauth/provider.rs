//! OAuth 프로바이더 열거형
//!
//! 지원하는 프로바이더는 닫힌 집합입니다. 새 프로바이더를 추가하면 이 열거형을
//! 사용하는 모든 `match`(속성 키, 엔드포인트 설정 등)가 컴파일 에러로 누락을 알려줍니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OAuthProvider {
    Google,
    Naver,
    Kakao,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [OAuthProvider::Google, OAuthProvider::Naver, OAuthProvider::Kakao];

    /// 경로/설정 키에 쓰는 소문자 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Naver => "naver",
            OAuthProvider::Kakao => "kakao",
        }
    }

    /// 환경 변수 접두사 (`GOOGLE_CLIENT_ID` 등)
    pub fn env_prefix(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "GOOGLE",
            OAuthProvider::Naver => "NAVER",
            OAuthProvider::Kakao => "KAKAO",
        }
    }
}

impl FromStr for OAuthProvider {
    type Err = AppError;

    /// 대소문자를 구분하지 않고 파싱합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "naver" => Ok(OAuthProvider::Naver),
            "kakao" => Ok(OAuthProvider::Kakao),
            _ => Err(AppError::UnsupportedProvider(s.to_string())),
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_prefix())
    }
}
