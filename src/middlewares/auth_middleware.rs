//! 토큰 인증 미들웨어
//!
//! 보호 구간마다 [`AuthMode`]를 정해 감싸면, 해당 종류의 토큰을 찾아 검증하고
//! 결과 주체(회원, 연동 세션, 서비스)를 request extensions에 넣어 둡니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::models::auth::authentication_request::AuthMode;
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// 토큰 인증 미들웨어
pub struct AuthMiddleware {
    mode: AuthMode,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }

    /// ACCESS 토큰 (쿠키 → Bearer)
    pub fn access() -> Self {
        Self::new(AuthMode::Member)
    }

    /// TEMP_PROVIDE 토큰 (쿠키)
    pub fn temp_provide() -> Self {
        Self::new(AuthMode::ProvideSession)
    }

    /// FONT_CREATE_SERVER 토큰 (Bearer)
    pub fn font_create_server() -> Self {
        Self::new(AuthMode::TrustedServer)
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::registry::ServiceRegistry;
    use crate::domain::models::auth::{AuthenticatedMember, ProvideSession, ServerPrincipal};
    use crate::domain::models::token::TokenKind;
    use actix_web::cookie::Cookie;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, web, App, HttpResponse};
    use chrono::Duration;
    use std::sync::Arc;

    async fn whoami(member: AuthenticatedMember) -> HttpResponse {
        HttpResponse::Ok().body(member.member_id)
    }

    async fn provide(session: ProvideSession) -> HttpResponse {
        HttpResponse::Ok().body(session.provide_id)
    }

    async fn server(principal: ServerPrincipal) -> HttpResponse {
        HttpResponse::Ok().body(principal.subject)
    }

    macro_rules! test_app {
        ($registry:expr) => {
            test::init_service(
                App::new()
                    .app_data($registry.clone())
                    .service(web::scope("/member").wrap(AuthMiddleware::access()).route("", web::get().to(whoami)))
                    .service(web::scope("/provide").wrap(AuthMiddleware::temp_provide()).route("", web::get().to(provide)))
                    .service(web::scope("/server").wrap(AuthMiddleware::font_create_server()).route("", web::get().to(server))),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_credentials_is_generic_and_clears_cookies() {
        let registry = web::Data::new(ServiceRegistry::builder().build());
        let app = test_app!(registry);

        let res = test::call_service(&app, test::TestRequest::get().uri("/member").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let cleared: Vec<String> = res.response().cookies().map(|c| c.name().to_string()).collect();
        assert_eq!(cleared.len(), 3);
        assert!(cleared.contains(&"accessToken".to_string()));

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "AUTHENTICATION_REQUIRED");
        assert!(body["requestId"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_access_cookie_and_bearer_are_accepted() {
        let registry = web::Data::new(ServiceRegistry::builder().build());
        let app = test_app!(registry);
        let access = registry.tokens.issue(TokenKind::Access, "member-1").unwrap();

        let req = test::TestRequest::get()
            .uri("/member")
            .cookie(Cookie::new("accessToken", access.value.clone()))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "member-1");

        let req = test::TestRequest::get()
            .uri("/member")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", access.value)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "member-1");
    }

    #[actix_web::test]
    async fn test_wrong_kind_reports_specific_failure() {
        let registry = web::Data::new(ServiceRegistry::builder().build());
        let app = test_app!(registry);
        let refresh = registry.tokens.issue(TokenKind::Refresh, "member-1").unwrap();

        let req = test::TestRequest::get()
            .uri("/member")
            .cookie(Cookie::new("accessToken", refresh.value))
            .insert_header(("X-Request-Id", "req-77"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "TOKEN_INVALID");
        assert_eq!(body["requestId"], "req-77");
    }

    #[actix_web::test]
    async fn test_expired_access_token_is_reported_as_expired() {
        let clock = Arc::new(ManualClock::starting_now());
        let registry = web::Data::new(ServiceRegistry::builder().clock(clock.clone()).build());
        let app = test_app!(registry);
        let access = registry.tokens.issue(TokenKind::Access, "member-1").unwrap();

        clock.advance(Duration::minutes(31));
        let req = test::TestRequest::get()
            .uri("/member")
            .cookie(Cookie::new("accessToken", access.value))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.response()
                .cookies()
                .find(|c| c.name() == "accessToken")
                .map(|c| c.value().to_string()),
            Some(String::new())
        );

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "TOKEN_EXPIRED");
        assert_eq!(body["message"], "ACCESS 토큰이 만료되었습니다");
    }

    #[actix_web::test]
    async fn test_provide_session_reads_cookie_only() {
        let registry = web::Data::new(ServiceRegistry::builder().build());
        let app = test_app!(registry);
        let temp = registry.tokens.issue(TokenKind::TempProvide, "provide-1").unwrap();

        let req = test::TestRequest::get()
            .uri("/provide")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", temp.value)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/provide")
            .cookie(Cookie::new("provideToken", temp.value))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "provide-1");
    }

    #[actix_web::test]
    async fn test_trusted_server_requires_bearer() {
        let registry = web::Data::new(ServiceRegistry::builder().build());
        let app = test_app!(registry);
        let server_token = registry.tokens.issue_server_token().unwrap();

        let req = test::TestRequest::get()
            .uri("/server")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", server_token.value)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "font-create-server");

        let access = registry.tokens.issue(TokenKind::Access, "member-1").unwrap();
        let req = test::TestRequest::get()
            .uri("/server")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", access.value)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
