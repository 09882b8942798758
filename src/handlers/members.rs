//! Member HTTP Handlers
//!
//! 로그인한 회원 본인의 프로필 조회/수정/탈퇴와 닉네임 중복 확인 엔드포인트입니다.
use actix_web::{delete, get, patch, web, HttpResponse};
use validator::Validate;

use crate::core::errors::{ApiError, AppError};
use crate::core::registry::ServiceRegistry;
use crate::core::request_context::RequestContext;
use crate::domain::dto::auth::response::MessageResponse;
use crate::domain::dto::members::request::{NicknameQuery, UpdateProfileRequest};
use crate::domain::dto::members::response::{DuplicateCheckResponse, MemberResponse};
use crate::domain::models::auth::AuthenticatedMember;
use crate::middlewares::AuthMiddleware;

/// 내 정보 조회
///
/// # Endpoint
/// `GET /members/me`
#[get("/me", wrap = "AuthMiddleware::access()")]
pub async fn get_me(
    member: AuthenticatedMember,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let member = registry
        .members
        .get_member(&member.member_id)
        .await
        .map_err(|e| ctx.fail(e))?;

    Ok(HttpResponse::Ok().json(MemberResponse::from(member)))
}

/// 내 프로필 수정
///
/// # Endpoint
/// `PATCH /members/me`
#[patch("/me", wrap = "AuthMiddleware::access()")]
pub async fn update_me(
    member: AuthenticatedMember,
    payload: web::Json<UpdateProfileRequest>,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| ctx.fail(AppError::ValidationError(e.to_string())))?;

    let member = registry
        .members
        .update_profile(&member.member_id, payload.into_inner().into_changes(), &ctx.correlation_id)
        .await
        .map_err(|e| ctx.fail(e))?;

    Ok(HttpResponse::Ok().json(MemberResponse::from(member)))
}

/// 회원 탈퇴
///
/// 탈퇴 후에는 세션 쿠키를 모두 만료시킵니다.
///
/// # Endpoint
/// `DELETE /members/me`
#[delete("/me", wrap = "AuthMiddleware::access()")]
pub async fn disable_me(
    member: AuthenticatedMember,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    registry
        .members
        .disable(&member.member_id, &ctx.correlation_id)
        .await
        .map_err(|e| ctx.fail(e))?;

    let mut builder = HttpResponse::Ok();
    for cookie in ctx.cookies().clear() {
        builder.cookie(cookie);
    }

    Ok(builder.json(MessageResponse::new("탈퇴 처리되었습니다")))
}

/// 닉네임 중복 확인
///
/// # Endpoint
/// `GET /members/check-duplicate?nickname={nickname}`
#[get("/check-duplicate")]
pub async fn check_duplicate(
    query: web::Query<NicknameQuery>,
    registry: web::Data<ServiceRegistry>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    query
        .validate()
        .map_err(|e| ctx.fail(AppError::ValidationError(e.to_string())))?;

    let duplicate = registry
        .members
        .is_nickname_taken(&query.nickname)
        .await
        .map_err(|e| ctx.fail(e))?;

    Ok(HttpResponse::Ok().json(DuplicateCheckResponse { duplicate }))
}
