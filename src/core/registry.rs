//! # Service Registry
//!
//! 애플리케이션의 모든 서비스를 한 번에 조립해 `web::Data`로 공유하는 컨테이너입니다.
//!
//! 저장소와 시계는 trait 객체로 주입됩니다. 운영에서는 MongoDB/Redis 구현을,
//! 테스트에서는 인메모리 저장소와 [`ManualClock`](crate::core::clock::ManualClock)을 넣습니다.
//!
//! ```text
//! ServiceRegistry
//!  ├─ TokenService        (TokenSettings, Clock)
//!  ├─ RefreshTokenLedger  (RefreshTokenStore, Clock)
//!  ├─ SessionCookieCodec  (CookieSettings)
//!  ├─ MemberService       (MemberStore, Ledger, ProfanityFilter, Clock)
//!  ├─ AuthService         (ProvideStore, MemberStore, MemberService, TokenService, Ledger, Clock)
//!  └─ OAuthService        (프로바이더 설정, UserInfoFetcher, Clock)
//! ```
//!
//! ```rust,ignore
//! let registry = ServiceRegistry::builder()
//!     .provide_store(Arc::new(MongoProvideStore::new(db.clone())))
//!     .member_store(Arc::new(MongoMemberStore::new(db)))
//!     .refresh_token_store(Arc::new(RedisRefreshTokenStore::new(redis)))
//!     .token_settings(TokenSettings::from_env(&environment)?)
//!     .build();
//!
//! App::new().app_data(web::Data::new(registry))
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;

use crate::config::{CookieSettings, OAuthProviderSettings, TokenSettings};
use crate::core::clock::{Clock, SystemClock};
use crate::domain::models::oauth::OAuthProvider;
use crate::domain::models::token::TokenKind;
use crate::repositories::memory::{InMemoryMemberStore, InMemoryProvideStore, InMemoryRefreshTokenStore};
use crate::repositories::{MemberStore, ProvideStore, RefreshTokenStore};
use crate::services::auth::auth_service::AuthService;
use crate::services::auth::oauth_service::{HttpUserInfoFetcher, OAuthService, UserInfoFetcher};
use crate::services::auth::refresh_ledger::RefreshTokenLedger;
use crate::services::auth::session_cookie::SessionCookieCodec;
use crate::services::auth::token_service::TokenService;
use crate::services::members::member_service::MemberService;
use crate::services::members::profanity::{BannedWordFilter, ProfanityFilter};
use crate::utils::display_terminal::print_registry_summary;

const STORE_COUNT: usize = 3;
const SERVICE_COUNT: usize = 6;

const DEFAULT_STATE_SECRET: &str = "dev-oauth-state-secret-change-me";

pub struct ServiceRegistry {
    pub clock: Arc<dyn Clock>,
    pub tokens: Arc<TokenService>,
    pub ledger: Arc<RefreshTokenLedger>,
    pub cookies: Arc<SessionCookieCodec>,
    pub members: Arc<MemberService>,
    pub auth: Arc<AuthService>,
    pub oauth: Arc<OAuthService>,
    providers: Vec<OAuthProvider>,
}

impl ServiceRegistry {
    pub fn builder() -> ServiceRegistryBuilder {
        ServiceRegistryBuilder::default()
    }

    /// 설정이 완료된 OAuth 프로바이더 목록
    pub fn providers(&self) -> &[OAuthProvider] {
        &self.providers
    }

    /// 기동 로그용 구성 요약 출력
    pub fn print_summary(&self) {
        let providers: Vec<String> = self.providers.iter().map(|p| p.to_string()).collect();
        print_registry_summary(STORE_COUNT, SERVICE_COUNT, &providers);
    }
}

/// [`ServiceRegistry`] 조립기
///
/// 지정하지 않은 협력 객체는 인메모리 저장소, 시스템 시계, 개발용 토큰 설정으로 채워집니다.
pub struct ServiceRegistryBuilder {
    provides: Option<Arc<dyn ProvideStore>>,
    members: Option<Arc<dyn MemberStore>>,
    refresh_tokens: Option<Arc<dyn RefreshTokenStore>>,
    clock: Arc<dyn Clock>,
    token_settings: TokenSettings,
    cookie_settings: CookieSettings,
    profanity: Arc<dyn ProfanityFilter>,
    providers: HashMap<OAuthProvider, OAuthProviderSettings>,
    fetcher: Option<Arc<dyn UserInfoFetcher>>,
    state_secret: String,
    state_lifetime: Duration,
}

impl Default for ServiceRegistryBuilder {
    fn default() -> Self {
        Self {
            provides: None,
            members: None,
            refresh_tokens: None,
            clock: Arc::new(SystemClock),
            token_settings: TokenSettings::development(),
            cookie_settings: CookieSettings::default(),
            profanity: Arc::new(BannedWordFilter::default()),
            providers: HashMap::new(),
            fetcher: None,
            state_secret: DEFAULT_STATE_SECRET.to_string(),
            state_lifetime: Duration::minutes(10),
        }
    }
}

impl ServiceRegistryBuilder {
    pub fn provide_store(mut self, store: Arc<dyn ProvideStore>) -> Self {
        self.provides = Some(store);
        self
    }

    pub fn member_store(mut self, store: Arc<dyn MemberStore>) -> Self {
        self.members = Some(store);
        self
    }

    pub fn refresh_token_store(mut self, store: Arc<dyn RefreshTokenStore>) -> Self {
        self.refresh_tokens = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn token_settings(mut self, settings: TokenSettings) -> Self {
        self.token_settings = settings;
        self
    }

    pub fn cookie_settings(mut self, settings: CookieSettings) -> Self {
        self.cookie_settings = settings;
        self
    }

    pub fn profanity_filter(mut self, filter: Arc<dyn ProfanityFilter>) -> Self {
        self.profanity = filter;
        self
    }

    pub fn oauth_providers(mut self, providers: HashMap<OAuthProvider, OAuthProviderSettings>) -> Self {
        self.providers = providers;
        self
    }

    /// 프로바이더 사용자 정보 조회기. 지정하지 않으면 HTTP 구현을 사용합니다.
    pub fn user_info_fetcher(mut self, fetcher: Arc<dyn UserInfoFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn oauth_state(mut self, secret: impl Into<String>, lifetime: Duration) -> Self {
        self.state_secret = secret.into();
        self.state_lifetime = lifetime;
        self
    }

    pub fn build(self) -> ServiceRegistry {
        let provides = self
            .provides
            .unwrap_or_else(|| Arc::new(InMemoryProvideStore::default()));
        let members = self
            .members
            .unwrap_or_else(|| Arc::new(InMemoryMemberStore::default()));
        let refresh_tokens = self
            .refresh_tokens
            .unwrap_or_else(|| Arc::new(InMemoryRefreshTokenStore::default()));
        let clock = self.clock;

        let refresh_lifetime = self.token_settings.lifetime(TokenKind::Refresh);
        let cookies = Arc::new(SessionCookieCodec::new(self.cookie_settings, &self.token_settings));
        let tokens = Arc::new(TokenService::new(self.token_settings, clock.clone()));
        let ledger = Arc::new(RefreshTokenLedger::new(
            refresh_tokens,
            clock.clone(),
            refresh_lifetime,
        ));

        let member_service = Arc::new(MemberService::new(
            members.clone(),
            ledger.clone(),
            self.profanity,
            clock.clone(),
        ));
        let auth = Arc::new(AuthService::new(
            provides,
            members,
            member_service.clone(),
            tokens.clone(),
            ledger.clone(),
            clock.clone(),
        ));

        let mut provider_list: Vec<OAuthProvider> = self.providers.keys().copied().collect();
        provider_list.sort_by_key(|p| p.as_str());

        let fetcher = self
            .fetcher
            .unwrap_or_else(|| Arc::new(HttpUserInfoFetcher::new(self.providers.clone())));
        let oauth = Arc::new(OAuthService::new(
            self.providers,
            fetcher,
            self.state_secret,
            self.state_lifetime,
            clock.clone(),
        ));

        log::debug!(
            "Service registry assembled ({} stores, {} services, {} oauth providers)",
            STORE_COUNT,
            SERVICE_COUNT,
            provider_list.len()
        );

        ServiceRegistry {
            clock,
            tokens,
            ledger,
            cookies,
            members: member_service,
            auth,
            oauth,
            providers: provider_list,
        }
    }
}
