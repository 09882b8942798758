//! 토큰 모델
//!
//! 세션을 구성하는 네 종류의 서명 토큰과 그 클레임을 정의합니다.
//! 종류마다 서명 키와 유효기간이 독립적이며, 서로 바꿔 쓸 수 없습니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 폰트 생성 서버 토큰의 고정 subject
pub const FONT_CREATE_SERVER_SUBJECT: &str = "font-create-server";

/// 토큰 종류
///
/// | 종류 | subject | 용도 |
/// |------|---------|------|
/// | `Access` | memberId | 요청 단위 인가 |
/// | `Refresh` | memberId | 재로그인 없이 Access 재발급 |
/// | `TempProvide` | provideId | OAuth 콜백 → 온보딩 완료 사이의 임시 자격 |
/// | `FontCreateServer` | 서비스 이름 | 신뢰된 외부 워커의 콜백 인가 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Access,
    Refresh,
    TempProvide,
    FontCreateServer,
}

impl TokenKind {
    pub const ALL: [TokenKind; 4] = [
        TokenKind::Access,
        TokenKind::Refresh,
        TokenKind::TempProvide,
        TokenKind::FontCreateServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "ACCESS",
            TokenKind::Refresh => "REFRESH",
            TokenKind::TempProvide => "TEMP_PROVIDE",
            TokenKind::FontCreateServer => "FONT_CREATE_SERVER",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT 클레임
///
/// `kind`는 서명 키와 별개로 한 번 더 검사됩니다. 운영자가 실수로 두 종류에
/// 같은 비밀키를 설정해도 종류가 다른 토큰은 거부됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    /// 같은 초에 발급된 토큰도 서로 구분되도록 하는 고유 ID
    pub jti: String,
}

/// 발급된 토큰
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub kind: TokenKind,
    pub value: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    pub fn lifetime_seconds(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }
}

/// 검증을 통과한 토큰에서 꺼낸 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub kind: TokenKind,
    pub subject: String,
    pub expires_at: i64,
}

/// 로그인 세션을 구성하는 Access + Refresh 쌍
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_serialization() {
        let json = serde_json::to_string(&TokenKind::TempProvide).unwrap();
        assert_eq!(json, "\"TEMP_PROVIDE\"");

        let kind: TokenKind = serde_json::from_str("\"FONT_CREATE_SERVER\"").unwrap();
        assert_eq!(kind, TokenKind::FontCreateServer);
    }

    #[test]
    fn test_token_kind_display_matches_wire_name() {
        for kind in TokenKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.to_string());
        }
    }
}
