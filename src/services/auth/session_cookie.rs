//! 세션 쿠키 코덱
//!
//! 토큰을 전송 계층 쿠키로 싣고 꺼내며, 로그아웃이나 인증 실패 시 만료 쿠키를 만듭니다.
//!
//! | 토큰 | 쿠키 이름 |
//! |------|-----------|
//! | ACCESS | `accessToken` |
//! | REFRESH | `refreshToken` |
//! | TEMP_PROVIDE | `provideToken` |
//!
//! 모든 쿠키는 `HttpOnly`, `Secure`, 설정된 `SameSite`, API 루트 `Path`를 가지며
//! `Max-Age`는 토큰 종류의 유효기간(초)입니다. FONT_CREATE_SERVER 토큰은 쿠키로 다루지 않습니다.
//!
//! OAuth 로그인을 시작한 브라우저에는 state nonce를 담은 `oauthState` 쿠키를 함께 내려서
//! 콜백이 같은 브라우저에서 왔는지 확인합니다. 프로바이더에서 돌아오는 리다이렉트에도
//! 실려야 하므로 이 쿠키만 `SameSite=Lax`입니다.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::dev::ServiceRequest;
use actix_web::HttpRequest;

use crate::config::{CookieSettings, TokenSettings};
use crate::domain::models::token::{IssuedToken, TokenKind, TokenPair};

/// 이름으로 요청 쿠키를 찾을 수 있는 요청 타입
///
/// actix-web은 `cookie()`를 `HttpRequest`와 `ServiceRequest`의 고유 메서드로만 제공하므로
/// 핸들러와 미들웨어가 같은 코덱을 쓰도록 두 타입에 구현합니다.
pub trait CookieSource {
    fn find_cookie(&self, name: &str) -> Option<Cookie<'static>>;
}

impl CookieSource for HttpRequest {
    fn find_cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.cookie(name)
    }
}

impl CookieSource for ServiceRequest {
    fn find_cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.cookie(name)
    }
}

/// OAuth state nonce 쿠키 이름
pub const STATE_COOKIE_NAME: &str = "oauthState";

const SESSION_KINDS: [TokenKind; 3] = [TokenKind::Access, TokenKind::Refresh, TokenKind::TempProvide];

#[derive(Debug, Clone)]
pub struct SessionCookieCodec {
    settings: CookieSettings,
    access_max_age: i64,
    refresh_max_age: i64,
    temp_provide_max_age: i64,
}

impl SessionCookieCodec {
    pub fn new(settings: CookieSettings, tokens: &TokenSettings) -> Self {
        Self {
            settings,
            access_max_age: tokens.lifetime(TokenKind::Access).num_seconds(),
            refresh_max_age: tokens.lifetime(TokenKind::Refresh).num_seconds(),
            temp_provide_max_age: tokens.lifetime(TokenKind::TempProvide).num_seconds(),
        }
    }

    pub fn cookie_name(kind: TokenKind) -> Option<&'static str> {
        match kind {
            TokenKind::Access => Some("accessToken"),
            TokenKind::Refresh => Some("refreshToken"),
            TokenKind::TempProvide => Some("provideToken"),
            TokenKind::FontCreateServer => None,
        }
    }

    fn max_age(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_max_age,
            TokenKind::Refresh => self.refresh_max_age,
            TokenKind::TempProvide => self.temp_provide_max_age,
            TokenKind::FontCreateServer => 0,
        }
    }

    fn build(&self, name: &'static str, value: String, max_age_seconds: i64) -> Cookie<'static> {
        let mut builder = Cookie::build(name, value)
            .path(self.settings.path.clone())
            .http_only(true)
            .secure(true)
            .same_site(self.settings.same_site)
            .max_age(CookieDuration::seconds(max_age_seconds));

        if let Some(domain) = &self.settings.domain {
            builder = builder.domain(domain.clone());
        }

        builder.finish()
    }

    /// 토큰 하나를 쿠키로 만듭니다. 쿠키로 전달하지 않는 종류면 `None`
    pub fn encode_token(&self, token: &IssuedToken) -> Option<Cookie<'static>> {
        let name = Self::cookie_name(token.kind)?;
        Some(self.build(name, token.value.clone(), self.max_age(token.kind)))
    }

    /// ACCESS + REFRESH 쿠키
    pub fn encode(&self, pair: &TokenPair) -> Vec<Cookie<'static>> {
        [&pair.access, &pair.refresh]
            .into_iter()
            .filter_map(|token| self.encode_token(token))
            .collect()
    }

    /// 한 종류의 만료 쿠키
    pub fn clear_kind(&self, kind: TokenKind) -> Option<Cookie<'static>> {
        let name = Self::cookie_name(kind)?;
        Some(self.build(name, String::new(), 0))
    }

    /// 세션 쿠키 전체의 만료 쿠키
    pub fn clear(&self) -> Vec<Cookie<'static>> {
        SESSION_KINDS
            .into_iter()
            .filter_map(|kind| self.clear_kind(kind))
            .collect()
    }

    /// 로그인을 시작한 브라우저에 state nonce를 묶는 쿠키
    pub fn state_cookie(&self, nonce: &str, lifetime: chrono::Duration) -> Cookie<'static> {
        let mut cookie = self.build(STATE_COOKIE_NAME, nonce.to_string(), lifetime.num_seconds());
        cookie.set_same_site(SameSite::Lax);
        cookie
    }

    pub fn clear_state_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.build(STATE_COOKIE_NAME, String::new(), 0);
        cookie.set_same_site(SameSite::Lax);
        cookie
    }

    pub fn extract_state_nonce<R: CookieSource + ?Sized>(req: &R) -> Option<String> {
        req.find_cookie(STATE_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// 요청에서 토큰을 꺼냅니다. 없거나 비어 있으면 `None`
    pub fn extract<R: CookieSource + ?Sized>(req: &R, kind: TokenKind) -> Option<String> {
        let name = Self::cookie_name(kind)?;
        req.find_cookie(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::services::auth::token_service::TokenService;
    use actix_web::test::TestRequest;
    use std::sync::Arc;

    fn codec(same_site: SameSite) -> SessionCookieCodec {
        let settings = CookieSettings {
            same_site,
            ..CookieSettings::default()
        };
        SessionCookieCodec::new(settings, &TokenSettings::development())
    }

    fn pair() -> TokenPair {
        let tokens = TokenService::new(TokenSettings::development(), Arc::new(ManualClock::starting_now()));
        tokens.issue_pair("member-1").unwrap()
    }

    #[test]
    fn test_encode_sets_security_attributes() {
        let pair = pair();
        let cookies = codec(SameSite::Strict).encode(&pair);

        assert_eq!(cookies.len(), 2);
        let access = cookies.iter().find(|c| c.name() == "accessToken").unwrap();
        let refresh = cookies.iter().find(|c| c.name() == "refreshToken").unwrap();

        for cookie in [access, refresh] {
            assert_eq!(cookie.http_only(), Some(true));
            assert_eq!(cookie.secure(), Some(true));
            assert_eq!(cookie.same_site(), Some(SameSite::Strict));
            assert_eq!(cookie.path(), Some("/api"));
        }
        assert_eq!(access.value(), pair.access.value);
        assert_eq!(access.max_age(), Some(CookieDuration::minutes(30)));
        assert_eq!(refresh.max_age(), Some(CookieDuration::days(14)));
    }

    #[test]
    fn test_clear_expires_every_session_cookie() {
        let cookies = codec(SameSite::Lax).clear();
        let names: Vec<_> = cookies.iter().map(|c| c.name()).collect();

        assert_eq!(names, vec!["accessToken", "refreshToken", "provideToken"]);
        for cookie in &cookies {
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
            assert_eq!(cookie.http_only(), Some(true));
        }
    }

    #[test]
    fn test_server_token_has_no_cookie() {
        assert!(SessionCookieCodec::cookie_name(TokenKind::FontCreateServer).is_none());
        assert!(codec(SameSite::Lax).clear_kind(TokenKind::FontCreateServer).is_none());
    }

    #[test]
    fn test_extract_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new("accessToken", "abc"))
            .cookie(Cookie::new("refreshToken", ""))
            .to_http_request();

        assert_eq!(SessionCookieCodec::extract(&req, TokenKind::Access), Some("abc".to_string()));
        assert_eq!(SessionCookieCodec::extract(&req, TokenKind::Refresh), None);
        assert_eq!(SessionCookieCodec::extract(&req, TokenKind::TempProvide), None);
    }

    #[test]
    fn test_extract_cookie_from_service_request() {
        let req = TestRequest::default()
            .insert_header(("Cookie", "theme=dark; refreshToken=r-1; provideToken=p-1"))
            .to_srv_request();

        assert_eq!(SessionCookieCodec::extract(&req, TokenKind::Refresh), Some("r-1".to_string()));
        assert_eq!(SessionCookieCodec::extract(&req, TokenKind::TempProvide), Some("p-1".to_string()));
        assert_eq!(SessionCookieCodec::extract(&req, TokenKind::Access), None);
        assert_eq!(SessionCookieCodec::extract(&req, TokenKind::FontCreateServer), None);
    }

    #[test]
    fn test_state_cookie_is_lax_and_short_lived() {
        let codec = codec(SameSite::Strict);
        let cookie = codec.state_cookie("nonce-1", chrono::Duration::minutes(10));

        assert_eq!(cookie.name(), STATE_COOKIE_NAME);
        assert_eq!(cookie.value(), "nonce-1");
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(CookieDuration::minutes(10)));
        assert_eq!(codec.clear_state_cookie().max_age(), Some(CookieDuration::ZERO));

        let req = TestRequest::default().cookie(cookie).to_http_request();
        assert_eq!(SessionCookieCodec::extract_state_nonce(&req), Some("nonce-1".to_string()));
    }

    #[test]
    fn test_domain_is_applied_when_configured() {
        let settings = CookieSettings {
            domain: Some("example.com".to_string()),
            ..CookieSettings::default()
        };
        let codec = SessionCookieCodec::new(settings, &TokenSettings::development());
        let cookie = codec.clear_kind(TokenKind::Access).unwrap();

        assert_eq!(cookie.domain(), Some("example.com"));
    }
}
