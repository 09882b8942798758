//! 회원 인증 서비스 메인 애플리케이션
//!
//! MongoDB, Redis 연결을 설정하고 서비스 레지스트리를 조립한 뒤 HTTP 서버를 구동합니다.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use member_auth_service::caching::redis::RedisClient;
use member_auth_service::config::{
    CookieConfig, Environment, OAuthConfig, OAuthProviderConfig, RateLimitConfig, ServerConfig, TokenSettings,
};
use member_auth_service::core::registry::ServiceRegistry;
use member_auth_service::core::request_context::REQUEST_ID_HEADER;
use member_auth_service::db::Database;
use member_auth_service::repositories::members::member_repo::MongoMemberStore;
use member_auth_service::repositories::provides::provide_repo::MongoProvideStore;
use member_auth_service::repositories::tokens::RedisRefreshTokenStore;
use member_auth_service::routes::configure_all_routes;
use member_auth_service::services::members::profanity::BannedWordFilter;
use member_auth_service::utils::display_terminal::{
    print_boxed_title, print_step_complete, print_step_start, print_sub_task,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    let environment = Environment::current();
    info!("🚀 회원 인증 서비스 시작중... ({:?})", environment);
    print_boxed_title("MEMBER AUTH SERVICE");

    // 데이터 스토어 초기화
    let (database, redis_client) = initialize_data_stores().await;

    let registry = build_registry(&environment, database, redis_client)
        .await
        .expect("서비스 초기화 실패");
    registry.print_summary();

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    // HTTP 서버 시작
    start_http_server(web::Data::new(registry)).await
}

/// 저장소를 준비하고 서비스 레지스트리를 조립합니다
///
/// 운영 환경에서 토큰 비밀 키나 OAuth state 비밀 키가 없으면 실패합니다.
async fn build_registry(
    environment: &Environment,
    database: Arc<Database>,
    redis_client: Arc<RedisClient>,
) -> Result<ServiceRegistry, Box<dyn std::error::Error>> {
    print_step_start(2, "저장소 인덱스 준비");
    let provide_store = MongoProvideStore::new(database.clone());
    provide_store.create_indexes().await?;
    print_sub_task("provides", "✓ (provider, externalId) unique");

    let member_store = MongoMemberStore::new(database);
    member_store.create_indexes().await?;
    print_sub_task("members", "✓ nickname, provideId");
    print_step_complete(2, "저장소 인덱스 준비", 2);

    print_step_start(3, "서비스 레지스트리 구성");
    let token_settings = TokenSettings::from_env(environment)?;
    let providers = OAuthProviderConfig::configured();
    for provider in providers.keys() {
        print_sub_task(&provider.to_string(), "✓ configured");
    }

    let registry = ServiceRegistry::builder()
        .provide_store(Arc::new(provide_store))
        .member_store(Arc::new(member_store))
        .refresh_token_store(Arc::new(RedisRefreshTokenStore::new(redis_client)))
        .token_settings(token_settings)
        .cookie_settings(CookieConfig::settings())
        .profanity_filter(Arc::new(BannedWordFilter::from_env()))
        .oauth_providers(providers)
        .oauth_state(
            OAuthConfig::state_secret(environment)?,
            chrono::Duration::minutes(OAuthConfig::session_timeout_minutes()),
        )
        .build();
    print_step_complete(3, "서비스 레지스트리 구성", 6);

    Ok(registry)
}

/// HTTP 서버를 구성하고 실행합니다
///
/// CORS, Rate Limiting, 로깅, 경로 정규화 미들웨어를 포함합니다.
async fn start_http_server(registry: web::Data<ServiceRegistry>) -> std::io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    // Rate Limiting 설정
    let per_second = RateLimitConfig::per_second();
    let burst_size = RateLimitConfig::burst_size();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(per_second)
        .burst_size(burst_size)
        .use_headers()
        .finish()
        .expect("Rate Limiting 설정이 올바르지 않습니다");

    info!("🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개", per_second, burst_size);

    let allowed_origins = ServerConfig::cors_allowed_origins();
    info!("🔗 CORS 허용 Origin: {:?}", allowed_origins);

    HttpServer::new(move || {
        App::new()
            .app_data(registry.clone())
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&allowed_origins))
            .wrap(middleware::Logger::new(&format!(
                "%a \"%r\" %s %b %T req=%{{{}}}i",
                REQUEST_ID_HEADER
            )))
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 초기화합니다
///
/// # Panics
///
/// * MongoDB 연결 실패 시
/// * Redis 연결 실패 시
async fn initialize_data_stores() -> (Arc<Database>, Arc<RedisClient>) {
    print_step_start(1, "데이터 스토어 연결");

    let database = match Database::new().await {
        Ok(database) => Arc::new(database),
        Err(e) => {
            error!("데이터베이스 연결 실패: {}", e);
            panic!("데이터베이스 연결 실패");
        }
    };
    print_sub_task("MongoDB", &format!("✓ Connected ({})", database.database_name()));

    let redis_client = match RedisClient::new().await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Redis 연결 실패: {}", e);
            panic!("Redis 연결 실패");
        }
    };
    print_sub_task("Redis", "✓ Connected");
    print_step_complete(1, "데이터 스토어 연결", 2);

    (database, redis_client)
}

/// 자격 증명(쿠키)을 허용하는 CORS 설정
fn configure_cors(allowed_origins: &[String]) -> Cors {
    let cors = allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .supports_credentials()
        .max_age(3600)
}
