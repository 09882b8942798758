//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::errors::{ApiError, AppError, AppResult};
use crate::core::registry::ServiceRegistry;
use crate::core::request_context::{correlation_id_of, fail_with};
use crate::domain::models::auth::authentication_request::{AuthMode, CredentialSource};
use crate::domain::models::auth::{AuthenticatedMember, ProvideSession, ServerPrincipal};
use crate::domain::models::token::VerifiedToken;
use crate::services::auth::session_cookie::SessionCookieCodec;
use crate::services::auth::token_service::TokenService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;

        Box::pin(async move {
            let correlation_id = correlation_id_of(&req);

            let Some(registry) = req.app_data::<web::Data<ServiceRegistry>>().cloned() else {
                log::error!("[req={}] 서비스 레지스트리가 등록되지 않았습니다", correlation_id);
                let error = ApiError::new(
                    AppError::InternalError("service registry missing".to_string()),
                    correlation_id,
                );
                return Ok(reject(req, &error));
            };

            match authenticate(&req, mode, &registry.tokens) {
                Ok(verified) => {
                    log::debug!("[req={}] 인증 성공: {} {}", correlation_id, verified.kind, verified.subject);
                    insert_principal(&req, mode, verified);
                }
                Err(err) => {
                    log::warn!("[req={}] 인증 실패 ({:?}): {}", correlation_id, mode, err);
                    let error = fail_with(&registry.cookies, err, &correlation_id);
                    return Ok(reject(req, &error));
                }
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, error: &ApiError) -> ServiceResponse<EitherBody<B>> {
    let response = error.error_response();
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

/// 모드가 정한 위치 순서대로 첫 번째 토큰을 찾아 검증합니다.
///
/// 토큰이 하나도 없으면 `AuthenticationRequired`, 토큰이 있는데 유효하지 않으면
/// 검증 실패 사유를 그대로 돌려줍니다.
fn authenticate(req: &ServiceRequest, mode: AuthMode, tokens: &TokenService) -> AppResult<VerifiedToken> {
    let kind = mode.token_kind();
    let credential = mode
        .credential_sources()
        .iter()
        .find_map(|source| match source {
            CredentialSource::Cookie => SessionCookieCodec::extract(req, kind),
            CredentialSource::BearerHeader => req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(TokenService::extract_bearer_token)
                .map(str::to_string),
        })
        .ok_or(AppError::AuthenticationRequired)?;

    tokens.verify(kind, &credential)
}

fn insert_principal(req: &ServiceRequest, mode: AuthMode, verified: VerifiedToken) {
    let mut extensions = req.extensions_mut();
    match mode {
        AuthMode::Member => {
            extensions.insert(AuthenticatedMember {
                member_id: verified.subject,
            });
        }
        AuthMode::ProvideSession => {
            extensions.insert(ProvideSession {
                provide_id: verified.subject,
            });
        }
        AuthMode::TrustedServer => {
            extensions.insert(ServerPrincipal {
                subject: verified.subject,
            });
        }
    }
}
