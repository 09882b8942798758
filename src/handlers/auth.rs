//! Authentication HTTP Handlers
//!
//! OAuth 로그인, 온보딩 완료, 토큰 재발급, 로그아웃 엔드포인트입니다.
//! 토큰은 응답 본문에 싣지 않고 세션 쿠키로만 내려 보냅니다.
//!
//! # Endpoints
//!
//! - `GET /auth/{provider}/login` - 로그인 URL 생성
//! - `GET /auth/{provider}/callback` - 콜백 처리, 회원 연결 후 쿠키 발급
//! - `POST /auth/onboarding` - 온보딩 완료 (TEMP_PROVIDE 쿠키 필요)
//! - `POST /auth/refresh` - 토큰 재발급 (REFRESH 쿠키 필요)
//! - `POST /auth/logout` - 로그아웃 (ACCESS 또는 REFRESH 토큰으로 회원 식별)
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::core::errors::{ApiError, AppError};
use crate::core::registry::ServiceRegistry;
use crate::core::request_context::RequestContext;
use crate::domain::dto::auth::request::{OAuthCallbackQuery, OnboardingRequest};
use crate::domain::dto::auth::response::{MessageResponse, SessionResponse};
use crate::domain::models::auth::ProvideSession;
use crate::domain::models::oauth::OAuthProvider;
use crate::domain::models::token::TokenKind;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::auth_service::LoginOutcome;
use crate::services::auth::session_cookie::SessionCookieCodec;
use crate::services::auth::token_service::TokenService;

/// OAuth 로그인 URL 생성 핸들러
///
/// state nonce를 `oauthState` 쿠키로 함께 내려 보냅니다.
///
/// # Endpoint
/// `GET /auth/{provider}/login`
#[get("/{provider}/login")]
pub async fn oauth_login_url(
    provider: web::Path<String>,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let provider = provider.parse::<OAuthProvider>().map_err(|e| ctx.fail(e))?;
    let start = registry.oauth.get_login_url(provider).map_err(|e| ctx.fail(e))?;

    Ok(HttpResponse::Ok()
        .cookie(ctx.cookies().state_cookie(&start.nonce, registry.oauth.state_lifetime()))
        .json(start.response))
}

/// OAuth 콜백 처리 핸들러
///
/// 프로바이더 사용자 정보를 받아 로그인합니다. 활성 회원이면 ACCESS + REFRESH 쿠키,
/// 온보딩이 남아 있으면 TEMP_PROVIDE 쿠키를 내려 줍니다.
///
/// # Endpoint
/// `GET /auth/{provider}/callback?code={code}&state={state}`
#[get("/{provider}/callback")]
pub async fn oauth_callback(
    req: HttpRequest,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let provider = provider.parse::<OAuthProvider>().map_err(|e| ctx.fail(e))?;

    // 사용자가 동의를 거부했거나 프로바이더가 에러를 돌려준 경우
    if let Some(error) = &query.error {
        let description = query
            .error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("[req={}] {} OAuth 에러: {} - {}", ctx.correlation_id, provider, error, description);
        return Err(ctx.fail(AppError::ValidationError(description.to_string())));
    }

    let (Some(code), Some(state)) = (query.code.as_deref(), query.state.as_deref()) else {
        return Err(ctx.fail(AppError::ValidationError(
            "code와 state 파라미터가 필요합니다".to_string(),
        )));
    };

    let browser_nonce = SessionCookieCodec::extract_state_nonce(&req);
    let attributes = registry
        .oauth
        .fetch_attributes(provider, code, state, browser_nonce.as_deref(), &ctx.correlation_id)
        .await
        .map_err(|e| ctx.fail(e))?;

    let outcome = registry
        .auth
        .login_with_provider(provider, &attributes, &ctx.correlation_id)
        .await
        .map_err(|e| ctx.fail(e))?;

    Ok(login_response(ctx.cookies(), outcome))
}

/// 콜백 응답. 사용이 끝난 state 쿠키도 만료시킵니다.
fn login_response(cookies: &SessionCookieCodec, outcome: LoginOutcome) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    builder.cookie(cookies.clear_state_cookie());

    match outcome {
        LoginOutcome::Authenticated { member, tokens } => {
            for cookie in cookies.encode(&tokens) {
                builder.cookie(cookie);
            }
            if let Some(expired) = cookies.clear_kind(TokenKind::TempProvide) {
                builder.cookie(expired);
            }
            builder.json(SessionResponse::Authenticated {
                member: member.into(),
            })
        }
        LoginOutcome::OnboardingRequired { provide, token, .. } => {
            if let Some(cookie) = cookies.encode_token(&token) {
                builder.cookie(cookie);
            }
            builder.json(SessionResponse::OnboardingRequired {
                provide_id: provide.id,
            })
        }
    }
}

/// 온보딩 완료 핸들러
///
/// # Endpoint
/// `POST /auth/onboarding`
#[post("/onboarding", wrap = "AuthMiddleware::temp_provide()")]
pub async fn complete_onboarding(
    session: ProvideSession,
    payload: web::Json<OnboardingRequest>,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| ctx.fail(AppError::ValidationError(e.to_string())))?;

    let result = registry
        .auth
        .complete_onboarding(&session.provide_id, payload.into_inner().into_profile(), &ctx.correlation_id)
        .await
        .map_err(|e| ctx.fail(e))?;

    let mut builder = HttpResponse::Ok();
    for cookie in ctx.cookies().encode(&result.tokens) {
        builder.cookie(cookie);
    }
    if let Some(expired) = ctx.cookies().clear_kind(TokenKind::TempProvide) {
        builder.cookie(expired);
    }

    Ok(builder.json(SessionResponse::Authenticated {
        member: result.member.into(),
    }))
}

/// 토큰 재발급 핸들러
///
/// REFRESH 쿠키를 회전시키고 새 ACCESS + REFRESH 쿠키를 내려 줍니다.
///
/// # Endpoint
/// `POST /auth/refresh`
#[post("/refresh")]
pub async fn refresh_tokens(
    req: HttpRequest,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let refresh_token = SessionCookieCodec::extract(&req, TokenKind::Refresh)
        .ok_or_else(|| ctx.fail(AppError::AuthenticationRequired))?;

    let tokens = registry
        .auth
        .refresh(&refresh_token, &ctx.correlation_id)
        .await
        .map_err(|e| ctx.fail(e))?;

    let mut builder = HttpResponse::Ok();
    for cookie in ctx.cookies().encode(&tokens) {
        builder.cookie(cookie);
    }

    Ok(builder.json(MessageResponse::new("토큰이 재발급되었습니다")))
}

/// 로그아웃 핸들러
///
/// ACCESS 토큰이 만료된 뒤에도 REFRESH 쿠키로 원장 기록을 지울 수 있도록 인증 미들웨어를
/// 거치지 않습니다. 세션 쿠키는 항상 만료시킵니다.
///
/// # Endpoint
/// `POST /auth/logout`
#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let access_token = SessionCookieCodec::extract(&req, TokenKind::Access).or_else(|| {
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(TokenService::extract_bearer_token)
            .map(str::to_string)
    });
    let refresh_token = SessionCookieCodec::extract(&req, TokenKind::Refresh);

    registry
        .auth
        .logout_session(access_token.as_deref(), refresh_token.as_deref(), &ctx.correlation_id)
        .await
        .map_err(|e| ctx.fail(e))?;

    let mut builder = HttpResponse::Ok();
    for cookie in ctx.cookies().clear() {
        builder.cookie(cookie);
    }

    Ok(builder.json(MessageResponse::new("로그아웃되었습니다")))
}
