//! 메모리 기반 저장소 구현
//!
//! 외부 인프라 없이 서비스와 HTTP 흐름을 검증할 때 사용합니다.
//! 각 저장소의 제약(연동 정보 유일성, 조건부 연결, 원장 CAS)은 운영 구현과 같게 지킵니다.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::members::member::{Member, MemberStatus};
use crate::domain::entities::provides::provide::Provide;
use crate::domain::models::oauth::OAuthProvider;
use crate::repositories::{MemberStore, ProvideStore, RefreshTokenRecord, RefreshTokenStore};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Default)]
pub struct InMemoryProvideStore {
    provides: Mutex<HashMap<String, Provide>>,
}

impl InMemoryProvideStore {
    pub fn len(&self) -> usize {
        lock(&self.provides).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProvideStore for InMemoryProvideStore {
    async fn find_by_identity(&self, provider: OAuthProvider, external_id: &str) -> AppResult<Option<Provide>> {
        Ok(lock(&self.provides)
            .values()
            .find(|p| p.provider == provider && p.external_id == external_id)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Provide>> {
        Ok(lock(&self.provides).get(id).cloned())
    }

    async fn save(&self, provide: Provide) -> AppResult<Provide> {
        let mut provides = lock(&self.provides);
        let duplicate = provides.values().any(|p| {
            p.id != provide.id && p.provider == provide.provider && p.external_id == provide.external_id
        });
        if duplicate {
            return Err(AppError::ConflictError(format!(
                "이미 등록된 연동 정보입니다: {}/{}",
                provide.provider, provide.external_id
            )));
        }
        provides.insert(provide.id.clone(), provide.clone());
        Ok(provide)
    }

    async fn link_member_if_absent(
        &self,
        provide_id: &str,
        member_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Provide> {
        let mut provides = lock(&self.provides);
        let provide = provides
            .get_mut(provide_id)
            .ok_or_else(|| AppError::ProvideNotFound(provide_id.to_string()))?;
        provide.link_member(member_id, now);
        Ok(provide.clone())
    }
}

#[derive(Default)]
pub struct InMemoryMemberStore {
    members: Mutex<HashMap<String, Member>>,
}

impl InMemoryMemberStore {
    pub fn len(&self) -> usize {
        lock(&self.members).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Member>> {
        Ok(lock(&self.members).get(id).cloned())
    }

    async fn save(&self, member: Member) -> AppResult<Member> {
        lock(&self.members).insert(member.id.clone(), member.clone());
        Ok(member)
    }

    async fn exists_by_nickname(&self, nickname: &str) -> AppResult<bool> {
        Ok(lock(&self.members)
            .values()
            .any(|m| m.status != MemberStatus::Deactivate && m.nickname.as_deref() == Some(nickname)))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        lock(&self.members).remove(id);
        Ok(())
    }
}

/// TTL은 저장하지 않습니다. 만료 판단은 레코드의 `expires_at`으로 원장이 합니다.
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    records: Mutex<HashMap<String, RefreshTokenRecord>>,
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn save(&self, record: &RefreshTokenRecord, _ttl_seconds: u64) -> AppResult<()> {
        lock(&self.records).insert(record.member_id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, member_id: &str) -> AppResult<Option<RefreshTokenRecord>> {
        Ok(lock(&self.records).get(member_id).cloned())
    }

    async fn remove(&self, member_id: &str) -> AppResult<()> {
        lock(&self.records).remove(member_id);
        Ok(())
    }

    async fn rotate(&self, expected_hash: &str, next: &RefreshTokenRecord, _ttl_seconds: u64) -> AppResult<bool> {
        let mut records = lock(&self.records);
        match records.get(&next.member_id) {
            Some(current) if current.token_hash == expected_hash => {
                records.insert(next.member_id.clone(), next.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::oauth::ExternalIdentity;

    fn identity(external_id: &str) -> ExternalIdentity {
        ExternalIdentity {
            provider: OAuthProvider::Google,
            external_id: external_id.to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_provide_identity_is_unique() {
        let store = InMemoryProvideStore::default();
        let now = Utc::now();

        store.save(Provide::from_identity(&identity("ext-1"), now)).await.unwrap();
        let duplicate = store.save(Provide::from_identity(&identity("ext-1"), now)).await;

        assert!(matches!(duplicate, Err(AppError::ConflictError(_))));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_link_member_if_absent_keeps_first_link() {
        let store = InMemoryProvideStore::default();
        let now = Utc::now();
        let provide = store.save(Provide::from_identity(&identity("ext-1"), now)).await.unwrap();

        let first = store.link_member_if_absent(&provide.id, "m-1", now).await.unwrap();
        let second = store.link_member_if_absent(&provide.id, "m-2", now).await.unwrap();

        assert_eq!(first.member_id.as_deref(), Some("m-1"));
        assert_eq!(second.member_id.as_deref(), Some("m-1"));
    }

    #[actix_web::test]
    async fn test_nickname_check_ignores_deactivated() {
        let store = InMemoryMemberStore::default();
        let now = Utc::now();
        let mut member = Member::new_onboarding("p-1", now);
        member.nickname = Some("alice".to_string());
        member.status = MemberStatus::Deactivate;
        store.save(member.clone()).await.unwrap();

        assert!(!store.exists_by_nickname("alice").await.unwrap());

        member.status = MemberStatus::Activate;
        store.save(member).await.unwrap();
        assert!(store.exists_by_nickname("alice").await.unwrap());
        assert!(!store.exists_by_nickname("Alice").await.unwrap());
    }

    #[actix_web::test]
    async fn test_rotate_requires_matching_hash() {
        let store = InMemoryRefreshTokenStore::default();
        let record = |hash: &str| RefreshTokenRecord {
            member_id: "m-1".to_string(),
            token_hash: hash.to_string(),
            issued_at: 0,
            expires_at: 100,
        };

        assert!(!store.rotate("a", &record("b"), 100).await.unwrap());

        store.save(&record("a"), 100).await.unwrap();
        assert!(store.rotate("a", &record("b"), 100).await.unwrap());
        assert!(!store.rotate("a", &record("c"), 100).await.unwrap());
        assert_eq!(store.get("m-1").await.unwrap().unwrap().token_hash, "b");
    }
}
