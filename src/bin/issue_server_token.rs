//! FONT_CREATE_SERVER 토큰 발급 도구
//!
//! 신뢰된 폰트 생성 워커에 넣어 줄 Bearer 토큰을 출력합니다.
//! 서버와 같은 `FONT_CREATE_SERVER_TOKEN_SECRET` 으로 서명되어야 하므로 같은 env 파일을 읽습니다.
//!
//! ```bash
//! PROFILE=prod cargo run --bin issue_server_token
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use env_logger::Env;

use member_auth_service::config::{Environment, TokenSettings};
use member_auth_service::core::clock::SystemClock;
use member_auth_service::services::auth::token_service::TokenService;

fn main() -> ExitCode {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());
    match profile.as_str() {
        "prod" => {
            dotenv::from_filename(".env.prod").ok();
        }
        "dev" => {
            dotenv::from_filename(".env.dev").ok();
        }
        _ => {
            dotenv::dotenv().ok();
        }
    }
    env_logger::init_from_env(Env::default().default_filter_or("warn"));

    let environment = Environment::current();
    let settings = match TokenSettings::from_env(&environment) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("토큰 설정을 읽지 못했습니다: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let service = TokenService::new(settings, Arc::new(SystemClock));
    match service.issue_server_token() {
        Ok(token) => {
            eprintln!(
                "subject={} expires_at={}",
                token.subject,
                token.expires_at.to_rfc3339()
            );
            println!("{}", token.value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("토큰 발급 실패: {}", e);
            ExitCode::FAILURE
        }
    }
}
