use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::core::errors::{ApiError, AppError};
use crate::core::request_context::correlation_id_of;

/// ACCESS 토큰에서 추출된 회원 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedMember {
    pub member_id: String,
}

/// TEMP_PROVIDE 토큰에서 추출된 연동 세션
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvideSession {
    pub provide_id: String,
}

/// FONT_CREATE_SERVER 토큰에서 추출된 서비스 주체
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPrincipal {
    pub subject: String,
}

/// 인증 미들웨어가 넣어둔 값을 꺼내는 공통 구현
fn from_extensions<T: Clone + 'static>(req: &HttpRequest) -> Ready<Result<T, ApiError>> {
    let value = req.extensions().get::<T>().cloned();
    match value {
        Some(value) => ready(Ok(value)),
        None => ready(Err(ApiError::new(
            AppError::AuthenticationRequired,
            correlation_id_of(req),
        ))),
    }
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedMember {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        from_extensions(req)
    }
}

impl FromRequest for ProvideSession {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        from_extensions(req)
    }
}

impl FromRequest for ServerPrincipal {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        from_extensions(req)
    }
}
