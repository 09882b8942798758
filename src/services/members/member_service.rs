//! 회원 서비스
//!
//! 회원 조회, 닉네임 정책, 프로필 수정, 탈퇴를 담당합니다.
//! 탈퇴는 리프레시 토큰 원장 기록까지 지워서 이후 토큰 재발급을 막습니다.
//! 원장 기록을 먼저 지우고 회원 상태를 저장하므로, 원장 삭제가 실패하면 회원은
//! 활성 상태로 남고 같은 요청을 다시 시도할 수 있습니다.

use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::members::member::{Member, ProfileChanges};
use crate::repositories::MemberStore;
use crate::services::auth::refresh_ledger::RefreshTokenLedger;
use crate::services::members::profanity::ProfanityFilter;

pub struct MemberService {
    members: Arc<dyn MemberStore>,
    ledger: Arc<RefreshTokenLedger>,
    profanity: Arc<dyn ProfanityFilter>,
    clock: Arc<dyn Clock>,
}

impl MemberService {
    pub fn new(
        members: Arc<dyn MemberStore>,
        ledger: Arc<RefreshTokenLedger>,
        profanity: Arc<dyn ProfanityFilter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            members,
            ledger,
            profanity,
            clock,
        }
    }

    pub async fn get_member(&self, member_id: &str) -> AppResult<Member> {
        self.members
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::MemberNotFound(member_id.to_string()))
    }

    /// 닉네임이 이미 쓰이고 있는지 (탈퇴 회원 제외, 대소문자 구분)
    pub async fn is_nickname_taken(&self, nickname: &str) -> AppResult<bool> {
        self.members.exists_by_nickname(nickname).await
    }

    /// 새로 사용할 닉네임 검사
    ///
    /// # Errors
    ///
    /// * `ProfaneContent` - 금칙어 포함
    /// * `DuplicateNickname` - 다른 회원이 사용 중
    pub async fn ensure_nickname_available(&self, nickname: &str) -> AppResult<()> {
        if self.profanity.contains_banned_content(nickname) {
            return Err(AppError::ProfaneContent);
        }
        if self.is_nickname_taken(nickname).await? {
            return Err(AppError::DuplicateNickname(nickname.to_string()));
        }
        Ok(())
    }

    /// 활성 회원의 프로필 수정
    ///
    /// 닉네임을 바꾸는 경우에만 중복/금칙어를 검사합니다. 현재 닉네임과 같으면 검사하지 않습니다.
    pub async fn update_profile(
        &self,
        member_id: &str,
        changes: ProfileChanges,
        correlation_id: &str,
    ) -> AppResult<Member> {
        let mut member = self.get_member(member_id).await?;

        if let Some(nickname) = changes.nickname.as_deref() {
            if member.nickname.as_deref() != Some(nickname) {
                self.ensure_nickname_available(nickname).await?;
            }
        }

        member.update_profile(changes, self.clock.now())?;
        let member = self.members.save(member).await?;

        log::info!("[req={}] 프로필 수정 완료 - member_id: {}", correlation_id, member.id);
        Ok(member)
    }

    /// 회원 탈퇴
    ///
    /// # Errors
    ///
    /// * `MemberNotFound`
    /// * `AlreadyDisabled` - 이미 탈퇴한 회원
    /// * `InvalidStateTransition` - 온보딩을 마치지 않은 회원
    pub async fn disable(&self, member_id: &str, correlation_id: &str) -> AppResult<Member> {
        let mut member = self.get_member(member_id).await?;
        member.disable(self.clock.now())?;

        self.ledger.remove(member_id).await?;
        let member = self.members.save(member).await?;

        log::info!("[req={}] 회원 탈퇴 처리 - member_id: {}", correlation_id, member_id);
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::domain::entities::members::member::{Gender, MemberStatus, OnboardingProfile};
    use crate::repositories::memory::{InMemoryMemberStore, InMemoryRefreshTokenStore};
    use crate::repositories::{RefreshTokenRecord, RefreshTokenStore};
    use crate::services::members::profanity::BannedWordFilter;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// `remove`만 실패하도록 전환할 수 있는 원장 저장소
    #[derive(Default)]
    struct FlakyRemoveStore {
        inner: InMemoryRefreshTokenStore,
        fail_remove: AtomicBool,
    }

    #[async_trait]
    impl RefreshTokenStore for FlakyRemoveStore {
        async fn save(&self, record: &RefreshTokenRecord, ttl_seconds: u64) -> AppResult<()> {
            self.inner.save(record, ttl_seconds).await
        }

        async fn get(&self, member_id: &str) -> AppResult<Option<RefreshTokenRecord>> {
            self.inner.get(member_id).await
        }

        async fn remove(&self, member_id: &str) -> AppResult<()> {
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(AppError::RedisError("timeout".to_string()));
            }
            self.inner.remove(member_id).await
        }

        async fn rotate(&self, expected_hash: &str, next: &RefreshTokenRecord, ttl_seconds: u64) -> AppResult<bool> {
            self.inner.rotate(expected_hash, next, ttl_seconds).await
        }
    }

    struct Fixture {
        service: MemberService,
        members: Arc<InMemoryMemberStore>,
        ledger: Arc<RefreshTokenLedger>,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::starting_now());
        let members = Arc::new(InMemoryMemberStore::default());
        let ledger = Arc::new(RefreshTokenLedger::new(
            Arc::new(InMemoryRefreshTokenStore::default()),
            clock.clone(),
            Duration::days(14),
        ));
        let service = MemberService::new(
            members.clone(),
            ledger.clone(),
            Arc::new(BannedWordFilter::default()),
            clock.clone(),
        );
        Fixture {
            service,
            members,
            ledger,
            clock,
        }
    }

    async fn active_member(fixture: &Fixture, nickname: &str) -> Member {
        let now = fixture.clock.now();
        let mut member = Member::new_onboarding("provide-1", now);
        member
            .complete_onboarding(
                OnboardingProfile {
                    nickname: nickname.to_string(),
                    gender: Gender::None,
                    birth: None,
                    terms: true,
                    profile_image_key: None,
                },
                now,
            )
            .unwrap();
        fixture.members.save(member).await.unwrap()
    }

    #[actix_web::test]
    async fn test_disable_removes_refresh_record() {
        let fixture = fixture();
        let member = active_member(&fixture, "alice").await;
        fixture.ledger.save(&member.id, "refresh-a").await.unwrap();

        let disabled = fixture.service.disable(&member.id, "req-1").await.unwrap();
        assert_eq!(disabled.status, MemberStatus::Deactivate);
        assert!(fixture.ledger.get(&member.id).await.unwrap().is_none());

        assert!(matches!(
            fixture.service.disable(&member.id, "req-2").await,
            Err(AppError::AlreadyDisabled)
        ));
    }

    #[actix_web::test]
    async fn test_failed_ledger_removal_keeps_member_active() {
        let clock = Arc::new(ManualClock::starting_now());
        let store = Arc::new(FlakyRemoveStore::default());
        let members = Arc::new(InMemoryMemberStore::default());
        let ledger = Arc::new(RefreshTokenLedger::new(store.clone(), clock.clone(), Duration::days(14)));
        let fixture = Fixture {
            service: MemberService::new(
                members.clone(),
                ledger.clone(),
                Arc::new(BannedWordFilter::default()),
                clock.clone(),
            ),
            members,
            ledger,
            clock,
        };
        let member = active_member(&fixture, "alice").await;
        fixture.ledger.save(&member.id, "refresh-a").await.unwrap();

        store.fail_remove.store(true, Ordering::SeqCst);
        assert!(matches!(
            fixture.service.disable(&member.id, "req-1").await,
            Err(AppError::RedisError(_))
        ));
        let unchanged = fixture.service.get_member(&member.id).await.unwrap();
        assert_eq!(unchanged.status, MemberStatus::Activate);
        assert!(fixture.ledger.get(&member.id).await.unwrap().is_some());

        // 저장소가 회복되면 재시도가 성공
        store.fail_remove.store(false, Ordering::SeqCst);
        let disabled = fixture.service.disable(&member.id, "req-2").await.unwrap();
        assert_eq!(disabled.status, MemberStatus::Deactivate);
        assert!(fixture.ledger.get(&member.id).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_disable_unknown_member() {
        let fixture = fixture();
        assert!(matches!(
            fixture.service.disable("nobody", "req-1").await,
            Err(AppError::MemberNotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_nickname_policy() {
        let fixture = fixture();
        active_member(&fixture, "alice").await;

        assert!(matches!(
            fixture.service.ensure_nickname_available("alice").await,
            Err(AppError::DuplicateNickname(_))
        ));
        assert!(fixture.service.ensure_nickname_available("Alice").await.is_ok());
        assert!(matches!(
            fixture.service.ensure_nickname_available("씨발").await,
            Err(AppError::ProfaneContent)
        ));
    }

    #[actix_web::test]
    async fn test_disabled_member_releases_nickname() {
        let fixture = fixture();
        let member = active_member(&fixture, "alice").await;
        fixture.service.disable(&member.id, "req-1").await.unwrap();

        assert!(!fixture.service.is_nickname_taken("alice").await.unwrap());
    }

    #[actix_web::test]
    async fn test_update_profile_checks_new_nickname_only() {
        let fixture = fixture();
        active_member(&fixture, "bob").await;
        let member = active_member(&fixture, "alice").await;

        let same = ProfileChanges {
            nickname: Some("alice".to_string()),
            gender: Some(Gender::Male),
            ..Default::default()
        };
        let updated = fixture.service.update_profile(&member.id, same, "req-1").await.unwrap();
        assert_eq!(updated.gender, Gender::Male);

        let taken = ProfileChanges {
            nickname: Some("bob".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            fixture.service.update_profile(&member.id, taken, "req-2").await,
            Err(AppError::DuplicateNickname(_))
        ));
    }
}
