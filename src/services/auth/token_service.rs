//! 토큰 발급/검증 서비스
//!
//! 네 종류(ACCESS, REFRESH, TEMP_PROVIDE, FONT_CREATE_SERVER)의 HS256 JWT를 발급하고 검증합니다.
//!
//! ## 검증 순서
//!
//! 1. 요청한 종류의 비밀키로 서명 검증 → 실패 시 `TokenInvalid`
//! 2. `kind` 클레임이 요청한 종류와 같은지 → 다르면 `TokenInvalid`
//! 3. 주입된 [`Clock`] 기준 만료 확인 (설정된 오차 허용) → 지났으면 `TokenExpired`
//!
//! 만료 확인을 jsonwebtoken에 맡기지 않는 이유는 테스트에서 시계를 조작할 수 있어야 하기 때문입니다.
//! 검증은 순수 계산이며 공유 가변 상태가 없어 동시에 호출해도 안전합니다.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::TokenSettings;
use crate::core::clock::Clock;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::models::token::{
    IssuedToken, TokenClaims, TokenKind, TokenPair, VerifiedToken, FONT_CREATE_SERVER_SUBJECT,
};

pub struct TokenService {
    settings: TokenSettings,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(settings: TokenSettings, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// 토큰 발급
    ///
    /// # Arguments
    ///
    /// * `kind` - 토큰 종류 (서명 키와 유효기간 결정)
    /// * `subject` - 회원 ID, 연동 정보 ID 또는 서비스 이름
    pub fn issue(&self, kind: TokenKind, subject: &str) -> AppResult<IssuedToken> {
        if subject.is_empty() {
            return Err(AppError::InternalError(format!("{} 토큰 subject가 비어 있습니다", kind)));
        }

        let kind_settings = self.settings.get(kind);
        let issued_at = self.clock.now();
        let expires_at = issued_at + kind_settings.lifetime;

        let claims = TokenClaims {
            sub: subject.to_string(),
            kind,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let value = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(kind_settings.secret.as_bytes()),
        )
        .with_context(|| format!("{} 토큰 생성 실패", kind))?;

        Ok(IssuedToken {
            kind,
            value,
            subject: subject.to_string(),
            issued_at: timestamp_to_datetime(claims.iat),
            expires_at: timestamp_to_datetime(claims.exp),
        })
    }

    /// 회원 세션용 ACCESS + REFRESH 쌍 발급
    pub fn issue_pair(&self, member_id: &str) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(TokenKind::Access, member_id)?,
            refresh: self.issue(TokenKind::Refresh, member_id)?,
        })
    }

    /// 신뢰된 외부 워커용 토큰 발급
    pub fn issue_server_token(&self) -> AppResult<IssuedToken> {
        self.issue(TokenKind::FontCreateServer, FONT_CREATE_SERVER_SUBJECT)
    }

    /// 토큰 검증
    ///
    /// # Errors
    ///
    /// * `TokenExpired(kind)` - 서명은 유효하지만 만료됨
    /// * `TokenInvalid { kind, reason }` - 서명 불일치, 형식 오류, 종류 불일치 등
    pub fn verify(&self, kind: TokenKind, token: &str) -> AppResult<VerifiedToken> {
        let invalid = |reason: &str| AppError::TokenInvalid {
            kind,
            reason: reason.to_string(),
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        let claims = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.settings.get(kind).secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => invalid("서명이 올바르지 않습니다"),
            ErrorKind::InvalidAlgorithm => invalid("허용되지 않은 알고리즘입니다"),
            ErrorKind::MissingRequiredClaim(claim) => invalid(&format!("필수 클레임 누락: {}", claim)),
            ErrorKind::Json(_) => invalid("클레임 형식이 올바르지 않습니다"),
            _ => invalid("토큰 형식이 올바르지 않습니다"),
        })?;

        if claims.kind != kind {
            return Err(invalid("토큰 종류가 일치하지 않습니다"));
        }
        if claims.sub.is_empty() {
            return Err(invalid("subject가 비어 있습니다"));
        }

        let now = self.clock.now().timestamp();
        if now >= claims.exp + self.settings.clock_skew.num_seconds() {
            return Err(AppError::TokenExpired(kind));
        }

        Ok(VerifiedToken {
            kind,
            subject: claims.sub,
            expires_at: claims.exp,
        })
    }

    /// `Authorization` 헤더 값에서 Bearer 토큰을 꺼냅니다.
    pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
        let (scheme, token) = auth_header.trim().split_once(' ')?;
        let token = token.trim();
        if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
            Some(token)
        } else {
            None
        }
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}
