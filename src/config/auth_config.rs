//! 인증 관련 설정
//!
//! 토큰 종류별 서명 키와 유효기간, 세션 쿠키 속성, OAuth 프로바이더 엔드포인트를
//! 환경 변수에서 읽습니다.
//!
//! ## 토큰 설정 환경 변수
//!
//! | 종류 | 비밀키 | 유효기간 (기본값) |
//! |------|--------|-------------------|
//! | ACCESS | `ACCESS_TOKEN_SECRET` | `ACCESS_TOKEN_EXPIRATION_MINUTES` (30) |
//! | REFRESH | `REFRESH_TOKEN_SECRET` | `REFRESH_TOKEN_EXPIRATION_DAYS` (14) |
//! | TEMP_PROVIDE | `TEMP_PROVIDE_TOKEN_SECRET` | `TEMP_PROVIDE_TOKEN_EXPIRATION_MINUTES` (10) |
//! | FONT_CREATE_SERVER | `FONT_CREATE_SERVER_TOKEN_SECRET` | `FONT_CREATE_SERVER_TOKEN_EXPIRATION_MINUTES` (60) |
//!
//! 비밀키가 없으면 개발용 기본값을 쓰고 경고를 남깁니다. 프로덕션에서는 시작에 실패합니다.

use std::collections::HashMap;
use std::env;

use actix_web::cookie::SameSite;
use chrono::Duration;

use crate::config::data_config::{env_or, Environment};
use crate::core::errors::{AppError, AppResult};
use crate::domain::models::oauth::OAuthProvider;
use crate::domain::models::token::TokenKind;

/// 토큰 종류 하나의 서명 키와 유효기간
#[derive(Clone)]
pub struct KindSettings {
    pub secret: String,
    pub lifetime: Duration,
}

impl std::fmt::Debug for KindSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindSettings")
            .field("secret", &"***")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// 네 종류 토큰의 설정 묶음
#[derive(Debug, Clone)]
pub struct TokenSettings {
    kinds: HashMap<TokenKind, KindSettings>,
    /// 만료 판정 시 허용하는 시계 오차
    pub clock_skew: Duration,
}

pub struct TokenConfig;

impl TokenConfig {
    pub fn secret_env_key(kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Access => "ACCESS_TOKEN_SECRET",
            TokenKind::Refresh => "REFRESH_TOKEN_SECRET",
            TokenKind::TempProvide => "TEMP_PROVIDE_TOKEN_SECRET",
            TokenKind::FontCreateServer => "FONT_CREATE_SERVER_TOKEN_SECRET",
        }
    }

    pub fn default_lifetime(kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => Duration::minutes(30),
            TokenKind::Refresh => Duration::days(14),
            TokenKind::TempProvide => Duration::minutes(10),
            TokenKind::FontCreateServer => Duration::minutes(60),
        }
    }

    fn development_secret(kind: TokenKind) -> String {
        format!("dev-{}-secret-change-me", kind.as_str().to_lowercase())
    }

    pub fn lifetime(kind: TokenKind) -> Duration {
        let default = Self::default_lifetime(kind);
        match kind {
            TokenKind::Access => Duration::minutes(env_or("ACCESS_TOKEN_EXPIRATION_MINUTES", default.num_minutes())),
            TokenKind::Refresh => Duration::days(env_or("REFRESH_TOKEN_EXPIRATION_DAYS", default.num_days())),
            TokenKind::TempProvide => {
                Duration::minutes(env_or("TEMP_PROVIDE_TOKEN_EXPIRATION_MINUTES", default.num_minutes()))
            }
            TokenKind::FontCreateServer => Duration::minutes(env_or(
                "FONT_CREATE_SERVER_TOKEN_EXPIRATION_MINUTES",
                default.num_minutes(),
            )),
        }
    }

    /// 비밀키 조회
    ///
    /// # Errors
    ///
    /// 프로덕션 환경에서 비밀키가 설정되지 않았거나 비어 있으면 `InternalError`
    pub fn secret(kind: TokenKind, environment: &Environment) -> AppResult<String> {
        let key = Self::secret_env_key(kind);
        match env::var(key) {
            Ok(secret) if !secret.trim().is_empty() => Ok(secret),
            _ if environment.is_production() => {
                Err(AppError::InternalError(format!("{} must be set in production", key)))
            }
            _ => {
                log::warn!("{} not set, using default (not secure for production!)", key);
                Ok(Self::development_secret(kind))
            }
        }
    }

    pub fn clock_skew_seconds() -> i64 {
        env_or("TOKEN_CLOCK_SKEW_SECONDS", 0)
    }
}

impl TokenSettings {
    pub fn new(kinds: HashMap<TokenKind, KindSettings>, clock_skew: Duration) -> AppResult<Self> {
        for kind in TokenKind::ALL {
            match kinds.get(&kind) {
                None => {
                    return Err(AppError::InternalError(format!("{} 토큰 설정이 없습니다", kind)));
                }
                Some(settings) if settings.lifetime <= Duration::zero() => {
                    return Err(AppError::InternalError(format!("{} 토큰 유효기간은 양수여야 합니다", kind)));
                }
                Some(_) => {}
            }
        }
        Ok(Self { kinds, clock_skew })
    }

    /// 환경 변수에서 읽은 설정
    pub fn from_env(environment: &Environment) -> AppResult<Self> {
        let mut kinds = HashMap::new();
        for kind in TokenKind::ALL {
            kinds.insert(
                kind,
                KindSettings {
                    secret: TokenConfig::secret(kind, environment)?,
                    lifetime: TokenConfig::lifetime(kind),
                },
            );
        }
        Self::new(kinds, Duration::seconds(TokenConfig::clock_skew_seconds().max(0)))
    }

    /// 기본 유효기간과 개발용 비밀키로 구성된 설정
    pub fn development() -> Self {
        let kinds = TokenKind::ALL
            .into_iter()
            .map(|kind| {
                (
                    kind,
                    KindSettings {
                        secret: TokenConfig::development_secret(kind),
                        lifetime: TokenConfig::default_lifetime(kind),
                    },
                )
            })
            .collect();
        Self {
            kinds,
            clock_skew: Duration::zero(),
        }
    }

    pub fn with_secret(mut self, kind: TokenKind, secret: impl Into<String>) -> Self {
        if let Some(settings) = self.kinds.get_mut(&kind) {
            settings.secret = secret.into();
        }
        self
    }

    pub fn with_lifetime(mut self, kind: TokenKind, lifetime: Duration) -> Self {
        if let Some(settings) = self.kinds.get_mut(&kind) {
            settings.lifetime = lifetime;
        }
        self
    }

    pub fn get(&self, kind: TokenKind) -> &KindSettings {
        // new/development 에서 네 종류 모두 채워지므로 항상 존재합니다.
        &self.kinds[&kind]
    }

    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        self.get(kind).lifetime
    }
}

/// 세션 쿠키 속성
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub same_site: SameSite,
    pub path: String,
    pub domain: Option<String>,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            same_site: SameSite::Lax,
            path: "/api".to_string(),
            domain: None,
        }
    }
}

pub struct CookieConfig;

impl CookieConfig {
    /// `strict` / `none` 외의 값은 모두 `Lax`
    pub fn parse_same_site(raw: &str) -> SameSite {
        match raw.trim().to_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            _ => SameSite::Lax,
        }
    }

    pub fn settings() -> CookieSettings {
        CookieSettings {
            same_site: Self::parse_same_site(&env::var("COOKIE_SAME_SITE").unwrap_or_default()),
            path: env::var("COOKIE_PATH").unwrap_or_else(|_| "/api".to_string()),
            domain: env::var("COOKIE_DOMAIN").ok().filter(|d| !d.trim().is_empty()),
        }
    }
}

pub struct OAuthConfig;

impl OAuthConfig {
    pub fn state_secret(environment: &Environment) -> AppResult<String> {
        match env::var("OAUTH_STATE_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => Ok(secret),
            _ if environment.is_production() => Err(AppError::InternalError(
                "OAUTH_STATE_SECRET must be set in production".to_string(),
            )),
            _ => {
                log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
                Ok("dev-oauth-state-secret-change-me".to_string())
            }
        }
    }

    pub fn session_timeout_minutes() -> i64 {
        env_or("OAUTH_SESSION_TIMEOUT_MINUTES", 10)
    }
}

/// 프로바이더 하나의 OAuth 클라이언트 설정
#[derive(Clone)]
pub struct OAuthProviderSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub user_info_uri: String,
    pub scope: String,
}

impl std::fmt::Debug for OAuthProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthProviderSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .field("user_info_uri", &self.user_info_uri)
            .field("scope", &self.scope)
            .finish()
    }
}

pub struct OAuthProviderConfig;

impl OAuthProviderConfig {
    fn default_endpoints(provider: OAuthProvider) -> (&'static str, &'static str, &'static str, &'static str) {
        match provider {
            OAuthProvider::Google => (
                "https://accounts.google.com/o/oauth2/v2/auth",
                "https://oauth2.googleapis.com/token",
                "https://openidconnect.googleapis.com/v1/userinfo",
                "openid email profile",
            ),
            OAuthProvider::Naver => (
                "https://nid.naver.com/oauth2.0/authorize",
                "https://nid.naver.com/oauth2.0/token",
                "https://openapi.naver.com/v1/nid/me",
                "",
            ),
            OAuthProvider::Kakao => (
                "https://kauth.kakao.com/oauth/authorize",
                "https://kauth.kakao.com/oauth/token",
                "https://kapi.kakao.com/v2/user/me",
                "account_email",
            ),
        }
    }

    /// `<PREFIX>_CLIENT_ID`, `<PREFIX>_CLIENT_SECRET`, `<PREFIX>_REDIRECT_URI`는 필수이고
    /// 엔드포인트와 scope는 `<PREFIX>_AUTH_URI` 등으로 덮어쓸 수 있습니다.
    pub fn for_provider(provider: OAuthProvider) -> AppResult<OAuthProviderSettings> {
        let prefix = provider.env_prefix();
        let required = |name: &str| {
            let key = format!("{}_{}", prefix, name);
            env::var(&key).map_err(|_| AppError::InternalError(format!("{} must be set", key)))
        };
        let optional = |name: &str, default: &str| {
            env::var(format!("{}_{}", prefix, name)).unwrap_or_else(|_| default.to_string())
        };
        let (auth_uri, token_uri, user_info_uri, scope) = Self::default_endpoints(provider);

        Ok(OAuthProviderSettings {
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            redirect_uri: required("REDIRECT_URI")?,
            auth_uri: optional("AUTH_URI", auth_uri),
            token_uri: optional("TOKEN_URI", token_uri),
            user_info_uri: optional("USER_INFO_URI", user_info_uri),
            scope: optional("SCOPE", scope),
        })
    }

    /// 설정이 갖춰진 프로바이더만 모읍니다.
    pub fn configured() -> HashMap<OAuthProvider, OAuthProviderSettings> {
        OAuthProvider::ALL
            .into_iter()
            .filter_map(|provider| match Self::for_provider(provider) {
                Ok(settings) => Some((provider, settings)),
                Err(e) => {
                    log::warn!("{} OAuth 비활성화: {}", provider, e);
                    None
                }
            })
            .collect()
    }
}
