//! 요청 단위 컨텍스트
//!
//! 모든 요청에는 상관관계 ID가 하나 붙습니다. 클라이언트가 `X-Request-Id`를 보내면 그대로 쓰고,
//! 없으면 새로 만듭니다. 같은 ID가 로그와 에러 응답 본문(`requestId`)에 함께 실립니다.

use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::core::errors::{ApiError, AppError};
use crate::core::registry::ServiceRegistry;
use crate::services::auth::session_cookie::SessionCookieCodec;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// 요청 extensions에 보관되는 상관관계 ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

/// 요청의 상관관계 ID를 돌려줍니다. 처음 호출될 때 결정되어 요청 extensions에 저장됩니다.
pub fn correlation_id_of<M: HttpMessage>(req: &M) -> String {
    let existing = req.extensions().get::<CorrelationId>().cloned();
    if let Some(CorrelationId(id)) = existing {
        return id;
    }

    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(CorrelationId(id.clone()));
    id
}

/// 핸들러용 요청 컨텍스트
///
/// 상관관계 ID와 세션 쿠키 코덱을 들고 있어서, 핸들러가 도메인 에러를
/// 응답용 [`ApiError`]로 바꿀 때 401이면 세션 쿠키 만료까지 붙여 줍니다.
pub struct RequestContext {
    pub correlation_id: String,
    cookies: Arc<SessionCookieCodec>,
}

impl RequestContext {
    pub fn new(correlation_id: impl Into<String>, cookies: Arc<SessionCookieCodec>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            cookies,
        }
    }

    pub fn cookies(&self) -> &SessionCookieCodec {
        &self.cookies
    }

    pub fn fail(&self, error: AppError) -> ApiError {
        fail_with(&self.cookies, error, &self.correlation_id)
    }
}

/// 에러를 응답용으로 변환합니다. 세션을 끊어야 하는 에러는 모든 세션 쿠키를 만료시킵니다.
pub fn fail_with(cookies: &SessionCookieCodec, error: AppError, correlation_id: &str) -> ApiError {
    let clears = error.clears_session();
    let api_error = ApiError::new(error, correlation_id);
    if clears {
        api_error.with_cleared_cookies(cookies.clear())
    } else {
        api_error
    }
}

impl FromRequest for RequestContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let correlation_id = correlation_id_of(req);
        let result = match req.app_data::<web::Data<ServiceRegistry>>() {
            Some(registry) => Ok(Self::new(correlation_id, registry.cookies.clone())),
            None => Err(ApiError::new(
                AppError::InternalError("서비스 레지스트리가 등록되지 않았습니다".to_string()),
                correlation_id,
            )),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CookieSettings, TokenSettings};
    use actix_web::test::TestRequest;

    #[test]
    fn test_correlation_id_from_header_is_reused() {
        let req = TestRequest::default()
            .insert_header((REQUEST_ID_HEADER, "req-123"))
            .to_http_request();

        assert_eq!(correlation_id_of(&req), "req-123");
        assert_eq!(correlation_id_of(&req), "req-123");
    }

    #[test]
    fn test_correlation_id_is_generated_once() {
        let req = TestRequest::default().to_http_request();

        let first = correlation_id_of(&req);
        let second = correlation_id_of(&req);
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn test_oversized_request_id_is_replaced() {
        let req = TestRequest::default()
            .insert_header((REQUEST_ID_HEADER, "x".repeat(200)))
            .to_http_request();

        assert!(Uuid::parse_str(&correlation_id_of(&req)).is_ok());
    }

    #[test]
    fn test_fail_clears_cookies_only_for_session_errors() {
        let codec = Arc::new(SessionCookieCodec::new(
            CookieSettings::default(),
            &TokenSettings::development(),
        ));
        let ctx = RequestContext::new("req-1", codec);

        let unauthorized = ctx.fail(AppError::InvalidRefreshToken);
        assert_eq!(unauthorized.cleared_cookies().len(), 3);
        assert_eq!(unauthorized.correlation_id, "req-1");

        let conflict = ctx.fail(AppError::DuplicateNickname("alice".to_string()));
        assert!(conflict.cleared_cookies().is_empty());
    }
}
