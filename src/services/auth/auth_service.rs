//! # 로그인/온보딩 오케스트레이터
//!
//! OAuth 콜백으로 들어온 외부 신원을 회원으로 이어 주고, 회원 상태에 맞는 토큰을 발급합니다.
//!
//! ## 로그인 상태 머신
//!
//! | 입력 상태 | 동작 | 결과 |
//! |-----------|------|------|
//! | 연동 정보 없음 | 연동 정보 생성 (회원 미연결) | 아래 단계로 계속 |
//! | 연동 정보 미연결 | 온보딩 회원 생성 후 조건부 연결 | ONBOARDING |
//! | 회원 ONBOARDING | TEMP_PROVIDE 토큰 발급 | 온보딩 필요 |
//! | 회원 ACTIVATE | ACCESS + REFRESH 발급, 원장 저장 | 로그인 완료 |
//! | 회원 DEACTIVATE | 거부 (`MemberDisabled`) | - |
//!
//! ## 동시성
//!
//! 같은 신원으로 첫 로그인이 동시에 들어오면 연동 정보 생성은 유니크 인덱스가,
//! 회원 연결은 "비어 있을 때만 설정" 조건부 갱신이 하나만 통과시킵니다.
//! 경쟁에서 진 요청은 자신이 만든 회원을 지우고 이긴 쪽 회원을 사용합니다.

use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::members::member::{Member, MemberStatus, OnboardingProfile};
use crate::domain::entities::provides::provide::Provide;
use crate::domain::models::oauth::{ExternalIdentity, OAuthProvider, ProviderAttributes};
use crate::domain::models::token::{IssuedToken, TokenKind, TokenPair};
use crate::repositories::{MemberStore, ProvideStore};
use crate::services::auth::identity_resolver::IdentityResolver;
use crate::services::auth::refresh_ledger::RefreshTokenLedger;
use crate::services::auth::token_service::TokenService;
use crate::services::members::member_service::MemberService;

/// 로그인 결과
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// 활성 회원. ACCESS + REFRESH 발급됨
    Authenticated { member: Member, tokens: TokenPair },
    /// 온보딩 미완료. TEMP_PROVIDE 발급됨
    OnboardingRequired {
        provide: Provide,
        member: Member,
        token: IssuedToken,
    },
}

/// 온보딩 완료 결과
#[derive(Debug, Clone)]
pub struct OnboardingResult {
    pub member: Member,
    pub tokens: TokenPair,
}

pub struct AuthService {
    provides: Arc<dyn ProvideStore>,
    members: Arc<dyn MemberStore>,
    member_service: Arc<MemberService>,
    tokens: Arc<TokenService>,
    ledger: Arc<RefreshTokenLedger>,
    resolver: IdentityResolver,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        provides: Arc<dyn ProvideStore>,
        members: Arc<dyn MemberStore>,
        member_service: Arc<MemberService>,
        tokens: Arc<TokenService>,
        ledger: Arc<RefreshTokenLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provides,
            members,
            member_service,
            tokens,
            ledger,
            resolver: IdentityResolver,
            clock,
        }
    }

    /// 프로바이더 이름과 원본 속성으로 로그인
    ///
    /// # Errors
    ///
    /// * `UnsupportedProvider` / `MissingProviderAttribute` - 신원 정규화 실패
    /// * `MemberDisabled` - 탈퇴한 회원
    pub async fn login(
        &self,
        provider: &str,
        attributes: &ProviderAttributes,
        correlation_id: &str,
    ) -> AppResult<LoginOutcome> {
        let identity = self.resolver.resolve_named(provider, attributes)?;
        self.login_with_identity(identity, correlation_id).await
    }

    pub async fn login_with_provider(
        &self,
        provider: OAuthProvider,
        attributes: &ProviderAttributes,
        correlation_id: &str,
    ) -> AppResult<LoginOutcome> {
        let identity = self.resolver.resolve(provider, attributes)?;
        self.login_with_identity(identity, correlation_id).await
    }

    pub async fn login_with_identity(
        &self,
        identity: ExternalIdentity,
        correlation_id: &str,
    ) -> AppResult<LoginOutcome> {
        let provide = self.find_or_create_provide(&identity, correlation_id).await?;
        let member = self.find_or_create_member(&provide, correlation_id).await?;

        match member.status {
            MemberStatus::Deactivate => {
                log::warn!(
                    "[req={}] 탈퇴 회원 로그인 시도 - member_id: {}, provider: {}",
                    correlation_id,
                    member.id,
                    identity.provider
                );
                Err(AppError::MemberDisabled)
            }
            MemberStatus::Onboarding => {
                let token = self.tokens.issue(TokenKind::TempProvide, &provide.id)?;
                log::info!(
                    "[req={}] 온보딩 필요 - provide_id: {}, member_id: {}",
                    correlation_id,
                    provide.id,
                    member.id
                );
                Ok(LoginOutcome::OnboardingRequired { provide, member, token })
            }
            MemberStatus::Activate => {
                let tokens = self.start_session(&member.id).await?;
                log::info!("[req={}] 로그인 성공 - member_id: {}", correlation_id, member.id);
                Ok(LoginOutcome::Authenticated { member, tokens })
            }
        }
    }

    async fn find_or_create_provide(&self, identity: &ExternalIdentity, correlation_id: &str) -> AppResult<Provide> {
        if let Some(existing) = self
            .provides
            .find_by_identity(identity.provider, &identity.external_id)
            .await?
        {
            return Ok(existing);
        }

        let candidate = Provide::from_identity(identity, self.clock.now());
        match self.provides.save(candidate).await {
            Ok(created) => {
                log::info!(
                    "[req={}] 새 연동 정보 생성 - provider: {}, provide_id: {}",
                    correlation_id,
                    created.provider,
                    created.id
                );
                Ok(created)
            }
            Err(AppError::ConflictError(_)) => {
                log::debug!("[req={}] 연동 정보 동시 생성 감지, 기존 정보 사용", correlation_id);
                self.provides
                    .find_by_identity(identity.provider, &identity.external_id)
                    .await?
                    .ok_or_else(|| AppError::InternalError("연동 정보 충돌 후 재조회 실패".to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn find_or_create_member(&self, provide: &Provide, correlation_id: &str) -> AppResult<Member> {
        if let Some(member_id) = provide.member_id.as_deref() {
            return self.member_service.get_member(member_id).await;
        }

        let now = self.clock.now();
        let candidate = self.members.save(Member::new_onboarding(&provide.id, now)).await?;
        let linked = self
            .provides
            .link_member_if_absent(&provide.id, &candidate.id, now)
            .await?;

        match linked.member_id.as_deref() {
            Some(member_id) if member_id == candidate.id => {
                log::info!(
                    "[req={}] 온보딩 회원 생성 - member_id: {}, provide_id: {}",
                    correlation_id,
                    candidate.id,
                    provide.id
                );
                Ok(candidate)
            }
            Some(winner) => {
                log::debug!(
                    "[req={}] 회원 연결 경쟁 패배, 기존 회원 사용 - member_id: {}",
                    correlation_id,
                    winner
                );
                self.members.delete(&candidate.id).await?;
                self.member_service.get_member(winner).await
            }
            None => Err(AppError::InternalError(format!(
                "연동 정보에 회원을 연결하지 못했습니다: {}",
                provide.id
            ))),
        }
    }

    /// ACCESS + REFRESH를 발급하고 원장에 REFRESH를 기록합니다.
    pub async fn start_session(&self, member_id: &str) -> AppResult<TokenPair> {
        let tokens = self.tokens.issue_pair(member_id)?;
        self.ledger.save(member_id, &tokens.refresh.value).await?;
        Ok(tokens)
    }

    /// 온보딩 완료 (`ONBOARDING` → `ACTIVATE`)
    ///
    /// # Arguments
    ///
    /// * `provide_id` - 검증된 TEMP_PROVIDE 토큰의 subject
    ///
    /// # Errors
    ///
    /// * `ProvideNotFound` - 연동 정보 없음
    /// * `InvalidStateTransition` - 온보딩 상태가 아닌 회원
    /// * `ValidationError` - 약관 미동의
    /// * `ProfaneContent` / `DuplicateNickname` - 닉네임 정책 위반
    pub async fn complete_onboarding(
        &self,
        provide_id: &str,
        profile: OnboardingProfile,
        correlation_id: &str,
    ) -> AppResult<OnboardingResult> {
        let provide = self
            .provides
            .find_by_id(provide_id)
            .await?
            .ok_or_else(|| AppError::ProvideNotFound(provide_id.to_string()))?;
        let member_id = provide
            .member_id
            .ok_or_else(|| AppError::MemberNotFound(format!("연동 정보 {}에 연결된 회원이 없습니다", provide_id)))?;

        let mut member = self.member_service.get_member(&member_id).await?;
        if member.status != MemberStatus::Onboarding {
            return Err(AppError::InvalidStateTransition {
                from: member.status,
                action: "온보딩 완료",
            });
        }
        if !profile.terms {
            return Err(AppError::ValidationError("약관 동의가 필요합니다".to_string()));
        }
        self.member_service
            .ensure_nickname_available(&profile.nickname)
            .await?;

        member.complete_onboarding(profile, self.clock.now())?;
        let member = self.members.save(member).await?;
        let tokens = self.start_session(&member.id).await?;

        log::info!("[req={}] 온보딩 완료 - member_id: {}", correlation_id, member.id);
        Ok(OnboardingResult { member, tokens })
    }

    /// 리프레시 토큰 회전
    ///
    /// 제시된 토큰이 원장의 현재 기록과 같을 때만 새 쌍을 발급하고 원장을 교체합니다.
    ///
    /// # Errors
    ///
    /// * `TokenExpired` / `TokenInvalid` - REFRESH 토큰 검증 실패
    /// * `InvalidRefreshToken` - 이미 교체되었거나 로그아웃/탈퇴로 폐기된 토큰, 또는 활성 회원이 아님
    pub async fn refresh(&self, refresh_token: &str, correlation_id: &str) -> AppResult<TokenPair> {
        let verified = self.tokens.verify(TokenKind::Refresh, refresh_token)?;

        let active = self
            .members
            .find_by_id(&verified.subject)
            .await?
            .is_some_and(|member| member.status == MemberStatus::Activate);
        if !active {
            log::warn!(
                "[req={}] 비활성 회원의 토큰 재발급 시도 - member_id: {}",
                correlation_id,
                verified.subject
            );
            return Err(AppError::InvalidRefreshToken);
        }

        let next = self.tokens.issue_pair(&verified.subject)?;

        if let Err(e) = self
            .ledger
            .rotate(&verified.subject, refresh_token, &next.refresh.value)
            .await
        {
            log::warn!(
                "[req={}] 리프레시 토큰 재사용 또는 폐기된 토큰 - member_id: {}",
                correlation_id,
                verified.subject
            );
            return Err(e);
        }

        log::info!("[req={}] 토큰 재발급 - member_id: {}", correlation_id, verified.subject);
        Ok(next)
    }

    /// 로그아웃: 원장 기록 삭제
    pub async fn logout(&self, member_id: &str, correlation_id: &str) -> AppResult<()> {
        self.ledger.remove(member_id).await?;
        log::info!("[req={}] 로그아웃 - member_id: {}", correlation_id, member_id);
        Ok(())
    }

    /// 요청에 실린 세션 토큰으로 로그아웃
    ///
    /// 유효한 ACCESS 토큰이 있으면 그 회원의 원장 기록을 지우고, ACCESS가 없거나 만료됐으면
    /// REFRESH 토큰이 원장의 현재 기록일 때만 지웁니다. 어느 쪽으로도 회원을 알 수 없으면
    /// 아무것도 하지 않습니다.
    ///
    /// # Returns
    ///
    /// 원장 기록을 지운 회원 ID
    pub async fn logout_session(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
        correlation_id: &str,
    ) -> AppResult<Option<String>> {
        if let Some(verified) = access_token.and_then(|token| self.tokens.verify(TokenKind::Access, token).ok()) {
            self.logout(&verified.subject, correlation_id).await?;
            return Ok(Some(verified.subject));
        }

        let Some(token) = refresh_token else {
            log::debug!("[req={}] 로그아웃 요청에 세션 토큰 없음", correlation_id);
            return Ok(None);
        };
        let Ok(verified) = self.tokens.verify(TokenKind::Refresh, token) else {
            log::debug!("[req={}] 로그아웃 요청의 REFRESH 토큰 검증 실패", correlation_id);
            return Ok(None);
        };

        if self.ledger.remove_if_current(&verified.subject, token).await? {
            log::info!("[req={}] 로그아웃 - member_id: {}", correlation_id, verified.subject);
            Ok(Some(verified.subject))
        } else {
            Ok(None)
        }
    }
}
