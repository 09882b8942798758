use crate::domain::models::token::TokenKind;

/// 토큰을 찾아볼 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// 토큰 종류별 세션 쿠키
    Cookie,
    /// `Authorization: Bearer <token>` 헤더
    BearerHeader,
}

/// 인증 모드를 정의하는 열거형
///
/// 보호 구간마다 어떤 종류의 토큰을 어디서 찾을지 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 로그인한 회원 (ACCESS 토큰, 쿠키 → Bearer 순)
    Member,
    /// 온보딩 중인 연동 세션 (TEMP_PROVIDE 토큰, 쿠키)
    ProvideSession,
    /// 신뢰된 외부 워커 (FONT_CREATE_SERVER 토큰, Bearer)
    TrustedServer,
}

impl AuthMode {
    pub fn token_kind(&self) -> TokenKind {
        match self {
            AuthMode::Member => TokenKind::Access,
            AuthMode::ProvideSession => TokenKind::TempProvide,
            AuthMode::TrustedServer => TokenKind::FontCreateServer,
        }
    }

    /// 우선순위 순서의 토큰 위치
    pub fn credential_sources(&self) -> &'static [CredentialSource] {
        match self {
            AuthMode::Member => &[CredentialSource::Cookie, CredentialSource::BearerHeader],
            AuthMode::ProvideSession => &[CredentialSource::Cookie],
            AuthMode::TrustedServer => &[CredentialSource::BearerHeader],
        }
    }
}
