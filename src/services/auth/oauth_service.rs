//! # OAuth 2.0 Authorization Code 클라이언트
//!
//! 프로바이더 로그인 URL을 만들고, 콜백으로 받은 code를 사용자 속성 문서로 바꿉니다.
//!
//! ```text
//! 클라이언트            이 서비스                         프로바이더
//!     │ GET /auth/{p}/login  │                                 │
//!     ├─────────────────────►│ state 서명, 로그인 URL 생성      │
//!     │◄─────────────────────┤                                 │
//!     │ 프로바이더 로그인 ───────────────────────────────────────►│
//!     │◄──────────────────────────────────── code, state 리다이렉트
//!     │ GET /auth/{p}/callback                                  │
//!     ├─────────────────────►│ state 검증                      │
//!     │                      │ code → access_token ───────────►│
//!     │                      │ user-info 조회 ────────────────►│
//!     │                      │◄──────────── 사용자 속성 문서     │
//! ```
//!
//! ## state
//!
//! 서버 저장소 없이 CSRF를 막기 위해 state는 `OAUTH_STATE_SECRET`으로 서명한 짧은 JWT입니다.
//! 프로바이더 이름이 들어 있어서 다른 프로바이더 콜백에 재사용할 수 없습니다.
//! state 안의 nonce는 로그인을 시작한 브라우저의 쿠키에도 실리고, 콜백은 두 값이 같아야
//! 통과합니다. 다른 사람이 받은 state를 내 콜백에 끼워 넣는 로그인 CSRF를 막습니다.
//!
//! 네트워크 호출은 [`UserInfoFetcher`] trait 뒤에 있어서 테스트에서는 고정 응답으로 바꿔 끼웁니다.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::OAuthProviderSettings;
use crate::core::clock::Clock;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::dto::auth::response::LoginUrlResponse;
use crate::domain::models::oauth::{OAuthProvider, ProviderAttributes};

/// authorization code를 사용자 속성 문서로 바꾸는 협력자
#[async_trait]
pub trait UserInfoFetcher: Send + Sync {
    async fn fetch(&self, provider: OAuthProvider, code: &str, state: &str) -> AppResult<ProviderAttributes>;
}

#[derive(Debug, Deserialize)]
struct ProviderTokenResponse {
    access_token: String,
}

/// reqwest 기반 구현
pub struct HttpUserInfoFetcher {
    client: reqwest::Client,
    providers: HashMap<OAuthProvider, OAuthProviderSettings>,
}

impl HttpUserInfoFetcher {
    pub fn new(providers: HashMap<OAuthProvider, OAuthProviderSettings>) -> Self {
        Self {
            client: reqwest::Client::new(),
            providers,
        }
    }

    async fn exchange_code_for_token(
        &self,
        provider: OAuthProvider,
        settings: &OAuthProviderSettings,
        code: &str,
        state: &str,
    ) -> AppResult<String> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("state", state),
        ];

        let response = self
            .client
            .post(&settings.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 토큰 요청 실패: {}", provider, e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 토큰 교환 실패: {}",
                provider, error_text
            )));
        }

        response
            .json::<ProviderTokenResponse>()
            .await
            .map(|token| token.access_token)
            .map_err(|e| AppError::ExternalServiceError(format!("{} 토큰 응답 파싱 실패: {}", provider, e)))
    }

    async fn get_user_info(
        &self,
        provider: OAuthProvider,
        settings: &OAuthProviderSettings,
        access_token: &str,
    ) -> AppResult<ProviderAttributes> {
        let response = self
            .client
            .get(&settings.user_info_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 사용자 정보 요청 실패: {}", provider, e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 사용자 정보 조회 실패: {}",
                provider, error_text
            )));
        }

        response
            .json::<ProviderAttributes>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 사용자 정보 파싱 실패: {}", provider, e)))
    }
}

#[async_trait]
impl UserInfoFetcher for HttpUserInfoFetcher {
    async fn fetch(&self, provider: OAuthProvider, code: &str, state: &str) -> AppResult<ProviderAttributes> {
        let settings = self
            .providers
            .get(&provider)
            .ok_or_else(|| AppError::UnsupportedProvider(provider.as_str().to_string()))?;

        let access_token = self.exchange_code_for_token(provider, settings, code, state).await?;
        self.get_user_info(provider, settings, &access_token).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OAuthStateClaims {
    provider: OAuthProvider,
    nonce: String,
    exp: i64,
}

/// 로그인 시작 결과
///
/// `response`는 클라이언트에 그대로 내려 주고, `nonce`는 state 쿠키로 브라우저에 묶습니다.
#[derive(Debug, Clone)]
pub struct AuthorizationStart {
    pub response: LoginUrlResponse,
    pub nonce: String,
}

pub struct OAuthService {
    providers: HashMap<OAuthProvider, OAuthProviderSettings>,
    fetcher: Arc<dyn UserInfoFetcher>,
    state_secret: String,
    state_lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl OAuthService {
    pub fn new(
        providers: HashMap<OAuthProvider, OAuthProviderSettings>,
        fetcher: Arc<dyn UserInfoFetcher>,
        state_secret: String,
        state_lifetime: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            fetcher,
            state_secret,
            state_lifetime,
            clock,
        }
    }

    fn settings(&self, provider: OAuthProvider) -> AppResult<&OAuthProviderSettings> {
        self.providers
            .get(&provider)
            .ok_or_else(|| AppError::UnsupportedProvider(provider.as_str().to_string()))
    }

    pub fn state_lifetime(&self) -> Duration {
        self.state_lifetime
    }

    /// 프로바이더 로그인 URL과 state
    pub fn get_login_url(&self, provider: OAuthProvider) -> AppResult<AuthorizationStart> {
        let settings = self.settings(provider)?;
        let (state, nonce) = self.issue_state(provider)?;

        let mut params = vec![
            ("client_id", settings.client_id.as_str()),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("response_type", "code"),
            ("state", state.as_str()),
        ];
        if !settings.scope.is_empty() {
            params.push(("scope", settings.scope.as_str()));
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(AuthorizationStart {
            response: LoginUrlResponse {
                login_url: format!("{}?{}", settings.auth_uri, query_string),
                state,
            },
            nonce,
        })
    }

    /// 서명된 state와 그 안의 nonce
    fn issue_state(&self, provider: OAuthProvider) -> AppResult<(String, String)> {
        let claims = OAuthStateClaims {
            provider,
            nonce: Uuid::new_v4().to_string(),
            exp: (self.clock.now() + self.state_lifetime).timestamp(),
        };

        let state = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.state_secret.as_bytes()),
        )
        .context("OAuth state 생성 실패")?;
        Ok((state, claims.nonce))
    }

    /// state 검증 (서명, 만료, 프로바이더 일치, 브라우저 nonce 일치)
    ///
    /// `browser_nonce`는 로그인을 시작한 브라우저의 state 쿠키 값입니다. 없으면 거부합니다.
    pub fn verify_state(&self, provider: OAuthProvider, state: &str, browser_nonce: Option<&str>) -> AppResult<()> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        let claims = decode::<OAuthStateClaims>(
            state,
            &DecodingKey::from_secret(self.state_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::InvalidOAuthState)?
        .claims;

        if claims.provider != provider || self.clock.now().timestamp() >= claims.exp {
            return Err(AppError::InvalidOAuthState);
        }
        if browser_nonce != Some(claims.nonce.as_str()) {
            return Err(AppError::InvalidOAuthState);
        }
        Ok(())
    }

    /// 콜백 처리: state 검증 후 code를 사용자 속성 문서로 교환
    pub async fn fetch_attributes(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
        browser_nonce: Option<&str>,
        correlation_id: &str,
    ) -> AppResult<ProviderAttributes> {
        self.settings(provider)?;
        self.verify_state(provider, state, browser_nonce)?;

        let attributes = self.fetcher.fetch(provider, code, state).await?;
        log::debug!("[req={}] {} 사용자 정보 수신", correlation_id, provider);
        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use serde_json::json;

    struct StaticFetcher;

    #[async_trait]
    impl UserInfoFetcher for StaticFetcher {
        async fn fetch(&self, _provider: OAuthProvider, code: &str, _state: &str) -> AppResult<ProviderAttributes> {
            Ok(json!({"sub": code, "email": "a@x.com"}).as_object().cloned().unwrap_or_default())
        }
    }

    fn settings() -> OAuthProviderSettings {
        OAuthProviderSettings {
            client_id: "client-1".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://app.example.com/callback".to_string(),
            auth_uri: "https://accounts.example.com/auth".to_string(),
            token_uri: "https://accounts.example.com/token".to_string(),
            user_info_uri: "https://accounts.example.com/userinfo".to_string(),
            scope: "openid email".to_string(),
        }
    }

    fn service() -> (OAuthService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let providers = HashMap::from([(OAuthProvider::Google, settings())]);
        let service = OAuthService::new(
            providers,
            Arc::new(StaticFetcher),
            "state-secret".to_string(),
            Duration::minutes(10),
            clock.clone(),
        );
        (service, clock)
    }

    #[test]
    fn test_login_url_contains_encoded_params() {
        let (service, _) = service();
        let start = service.get_login_url(OAuthProvider::Google).unwrap();
        let response = &start.response;

        assert!(response.login_url.starts_with("https://accounts.example.com/auth?"));
        assert!(response.login_url.contains("client_id=client-1"));
        assert!(response
            .login_url
            .contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fcallback"));
        assert!(response.login_url.contains("scope=openid%20email"));
        assert!(service
            .verify_state(OAuthProvider::Google, &response.state, Some(start.nonce.as_str()))
            .is_ok());
    }

    #[test]
    fn test_unconfigured_provider() {
        let (service, _) = service();
        assert!(matches!(
            service.get_login_url(OAuthProvider::Kakao),
            Err(AppError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_state_bound_to_provider_and_time() {
        let (service, clock) = service();
        let (state, nonce) = service.issue_state(OAuthProvider::Google).unwrap();

        assert!(matches!(
            service.verify_state(OAuthProvider::Naver, &state, Some(nonce.as_str())),
            Err(AppError::InvalidOAuthState)
        ));
        assert!(matches!(
            service.verify_state(OAuthProvider::Google, "forged", Some(nonce.as_str())),
            Err(AppError::InvalidOAuthState)
        ));

        clock.advance(Duration::minutes(11));
        assert!(matches!(
            service.verify_state(OAuthProvider::Google, &state, Some(nonce.as_str())),
            Err(AppError::InvalidOAuthState)
        ));
    }

    #[test]
    fn test_state_bound_to_browser_nonce() {
        let (service, _) = service();
        let (state, nonce) = service.issue_state(OAuthProvider::Google).unwrap();
        let (_, other_nonce) = service.issue_state(OAuthProvider::Google).unwrap();

        assert!(service.verify_state(OAuthProvider::Google, &state, Some(nonce.as_str())).is_ok());
        assert!(matches!(
            service.verify_state(OAuthProvider::Google, &state, None),
            Err(AppError::InvalidOAuthState)
        ));
        assert!(matches!(
            service.verify_state(OAuthProvider::Google, &state, Some(other_nonce.as_str())),
            Err(AppError::InvalidOAuthState)
        ));
    }

    #[actix_web::test]
    async fn test_fetch_attributes_requires_valid_state() {
        let (service, _) = service();
        let (state, nonce) = service.issue_state(OAuthProvider::Google).unwrap();

        let attributes = service
            .fetch_attributes(OAuthProvider::Google, "ext-1", &state, Some(nonce.as_str()), "req")
            .await
            .unwrap();
        assert_eq!(attributes["sub"], "ext-1");

        assert!(matches!(
            service
                .fetch_attributes(OAuthProvider::Google, "ext-1", "bad-state", Some(nonce.as_str()), "req")
                .await,
            Err(AppError::InvalidOAuthState)
        ));
    }
}
