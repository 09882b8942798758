//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 인증 코어에서 발생할 수 있는 모든 실패를 하나의 닫힌 열거형 [`AppError`]로 표현합니다.
//! 각 변형은 HTTP 상태 코드와 기계 판독용 에러 코드에 1:1로 매핑되며,
//! 요청 식별자(correlation id)는 [`ApiError`]를 만들 때 명시적으로 전달합니다.
//!
//! ## 상태 코드 정책
//!
//! | 분류 | 상태 코드 | 세션 쿠키 |
//! |------|-----------|-----------|
//! | 프로바이더/요청 형식 오류 | 400 | 유지 |
//! | 토큰/인증 오류 | 401 | 삭제 |
//! | 탈퇴 회원, 금칙어 | 403 | 유지 |
//! | 회원/연동 정보 없음 | 404 | 유지 |
//! | 닉네임 중복, 잘못된 상태 전이 | 409 | 유지 |
//! | 인프라 오류 | 500 / 502 | 유지 |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::core::errors::{AppError, AppResult};
//!
//! fn ensure_terms(accepted: bool) -> AppResult<()> {
//!     if !accepted {
//!         return Err(AppError::ValidationError("약관 동의가 필요합니다".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::members::member::MemberStatus;
use crate::domain::models::token::token::TokenKind;

/// 애플리케이션 전역 에러 타입
///
/// 새 실패 유형을 추가하면 `status_code()`와 `code()`의 `match`가
/// 컴파일 타임에 누락을 알려줍니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 외부 서비스 에러 (502 Bad Gateway)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("지원하지 않는 OAuth 프로바이더입니다: {0}")]
    UnsupportedProvider(String),

    #[error("프로바이더 응답에 필수 속성이 없습니다: {0}")]
    MissingProviderAttribute(String),

    #[error("유효하지 않은 OAuth state 입니다")]
    InvalidOAuthState,

    #[error("회원을 찾을 수 없습니다: {0}")]
    MemberNotFound(String),

    #[error("OAuth 연동 정보를 찾을 수 없습니다: {0}")]
    ProvideNotFound(String),

    #[error("탈퇴한 회원입니다")]
    MemberDisabled,

    #[error("이미 탈퇴 처리된 회원입니다")]
    AlreadyDisabled,

    #[error("이미 사용 중인 닉네임입니다: {0}")]
    DuplicateNickname(String),

    #[error("사용할 수 없는 단어가 포함되어 있습니다")]
    ProfaneContent,

    #[error("{from} 상태의 회원은 {action} 할 수 없습니다")]
    InvalidStateTransition {
        from: MemberStatus,
        action: &'static str,
    },

    #[error("{0} 토큰이 만료되었습니다")]
    TokenExpired(TokenKind),

    #[error("유효하지 않은 {kind} 토큰입니다: {reason}")]
    TokenInvalid { kind: TokenKind, reason: String },

    #[error("이미 사용되었거나 폐기된 리프레시 토큰입니다")]
    InvalidRefreshToken,

    #[error("인증이 필요합니다")]
    AuthenticationRequired,
}

impl AppError {
    /// 에러에 대응하는 HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::UnsupportedProvider(_)
            | AppError::MissingProviderAttribute(_)
            | AppError::InvalidOAuthState => StatusCode::BAD_REQUEST,

            AppError::TokenExpired(_)
            | AppError::TokenInvalid { .. }
            | AppError::InvalidRefreshToken
            | AppError::AuthenticationRequired => StatusCode::UNAUTHORIZED,

            AppError::MemberDisabled | AppError::ProfaneContent => StatusCode::FORBIDDEN,

            AppError::MemberNotFound(_) | AppError::ProvideNotFound(_) => StatusCode::NOT_FOUND,

            AppError::ConflictError(_)
            | AppError::DuplicateNickname(_)
            | AppError::InvalidStateTransition { .. }
            | AppError::AlreadyDisabled => StatusCode::CONFLICT,

            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,

            AppError::DatabaseError(_) | AppError::RedisError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 클라이언트가 분기 처리에 사용하는 기계 판독용 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::RedisError(_) => "CACHE_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ConflictError(_) => "CONFLICT",
            AppError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
            AppError::UnsupportedProvider(_) => "UNSUPPORTED_PROVIDER",
            AppError::MissingProviderAttribute(_) => "MISSING_PROVIDER_ATTRIBUTE",
            AppError::InvalidOAuthState => "INVALID_OAUTH_STATE",
            AppError::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            AppError::ProvideNotFound(_) => "PROVIDE_NOT_FOUND",
            AppError::MemberDisabled => "MEMBER_DISABLED",
            AppError::AlreadyDisabled => "ALREADY_DISABLED",
            AppError::DuplicateNickname(_) => "DUPLICATE_NICKNAME",
            AppError::ProfaneContent => "PROFANE_CONTENT",
            AppError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            AppError::TokenExpired(_) => "TOKEN_EXPIRED",
            AppError::TokenInvalid { .. } => "TOKEN_INVALID",
            AppError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AppError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
        }
    }

    /// 401 계열 실패는 클라이언트의 세션 쿠키를 만료시켜야 합니다.
    pub fn clears_session(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }

    /// 응답 본문에 실을 메시지
    ///
    /// 인프라 오류는 내부 사정을 숨기고 일반 메시지로 대체합니다.
    pub fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::RedisError(_) | AppError::InternalError(_) => {
                "서버 내부 오류가 발생했습니다".to_string()
            }
            AppError::ExternalServiceError(_) => "외부 인증 서버와 통신하지 못했습니다".to_string(),
            other => other.to_string(),
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: &'static str,
    message: String,
    request_id: &'a str,
}

/// HTTP 경계에서 사용하는 에러
///
/// 도메인 에러에 요청 식별자와 (필요한 경우) 만료 쿠키를 붙여 응답으로 변환합니다.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub correlation_id: String,
    cleared_cookies: Vec<Cookie<'static>>,
}

impl ApiError {
    pub fn new(error: AppError, correlation_id: impl Into<String>) -> Self {
        Self {
            error,
            correlation_id: correlation_id.into(),
            cleared_cookies: Vec::new(),
        }
    }

    /// 응답에 함께 실을 만료 쿠키를 지정합니다.
    pub fn with_cleared_cookies(mut self, cookies: Vec<Cookie<'static>>) -> Self {
        self.cleared_cookies = cookies;
        self
    }

    pub fn cleared_cookies(&self) -> &[Cookie<'static>] {
        &self.cleared_cookies
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[req={}] {}", self.correlation_id, self.error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        for cookie in &self.cleared_cookies {
            builder.cookie(cookie.clone());
        }

        builder.json(ErrorBody {
            error: self.error.code(),
            message: self.error.public_message(),
            request_id: &self.correlation_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("nickname is required".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(!error.clears_session());
    }

    #[test]
    fn test_provider_errors_are_bad_request() {
        assert_eq!(
            AppError::UnsupportedProvider("twitter".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingProviderAttribute("sub".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_token_errors_collapse_to_unauthorized() {
        let errors = [
            AppError::TokenExpired(TokenKind::Access),
            AppError::TokenInvalid {
                kind: TokenKind::Refresh,
                reason: "bad signature".to_string(),
            },
            AppError::InvalidRefreshToken,
            AppError::AuthenticationRequired,
        ];

        for error in errors {
            assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
            assert!(error.clears_session());
        }
    }

    #[test]
    fn test_domain_errors_are_forbidden_or_conflict() {
        assert_eq!(AppError::MemberDisabled.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ProfaneContent.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::DuplicateNickname("alice".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::AlreadyDisabled.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidStateTransition {
                from: MemberStatus::Activate,
                action: "온보딩 완료",
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = AppError::DatabaseError("connection reset by peer".to_string());
        assert!(!error.public_message().contains("connection reset"));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_api_error_body_carries_request_id() {
        let error = ApiError::new(AppError::AuthenticationRequired, "req-42")
            .with_cleared_cookies(vec![Cookie::new("accessToken", "")]);
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.cookies().count(), 1);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "AUTHENTICATION_REQUIRED");
        assert_eq!(json["requestId"], "req-42");
        assert_eq!(json["message"], "인증이 필요합니다");
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }

    #[test]
    fn test_with_context_hides_detail_from_clients() {
        let result: Result<(), String> = Err("invalid key length".to_string());
        let error = result.with_context(|| format!("{} 토큰 생성 실패", "ACCESS")).unwrap_err();

        assert_eq!(error.to_string(), "Internal server error: ACCESS 토큰 생성 실패: invalid key length");
        assert_eq!(error.public_message(), "서버 내부 오류가 발생했습니다");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
