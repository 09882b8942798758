//! # OAuth 연동 정보 리포지토리
//!
//! `provides` 컬렉션에 대한 MongoDB 구현입니다.
//!
//! ## 인덱스
//!
//! - `(provider, externalId)` 유니크 인덱스: 동시에 첫 로그인이 들어와도 연동 정보는 하나만 생깁니다.
//! - `memberId` 인덱스

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, to_bson};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::db::Database;
use crate::domain::entities::provides::provide::Provide;
use crate::domain::models::oauth::OAuthProvider;
use crate::repositories::members::member_repo::is_duplicate_key;
use crate::repositories::ProvideStore;

const COLLECTION: &str = "provides";

pub struct MongoProvideStore {
    db: Arc<Database>,
}

impl MongoProvideStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Provide> {
        self.db.collection::<Provide>(COLLECTION)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let identity_index = IndexModel::builder()
            .keys(doc! { "provider": 1, "externalId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("provider_external_id_unique".to_string())
                    .build(),
            )
            .build();

        let member_index = IndexModel::builder()
            .keys(doc! { "memberId": 1 })
            .options(IndexOptions::builder().name("member_id".to_string()).build())
            .build();

        self.collection()
            .create_indexes([identity_index, member_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ProvideStore for MongoProvideStore {
    async fn find_by_identity(&self, provider: OAuthProvider, external_id: &str) -> AppResult<Option<Provide>> {
        let provider = to_bson(&provider).context("provider BSON 변환 실패")?;

        self.collection()
            .find_one(doc! { "provider": provider, "externalId": external_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Provide>> {
        self.collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn save(&self, provide: Provide) -> AppResult<Provide> {
        self.collection()
            .replace_one(doc! { "_id": provide.id.as_str() }, &provide)
            .upsert(true)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::ConflictError(format!(
                        "이미 등록된 연동 정보입니다: {}/{}",
                        provide.provider, provide.external_id
                    ))
                } else {
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        Ok(provide)
    }

    async fn link_member_if_absent(
        &self,
        provide_id: &str,
        member_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Provide> {
        let updated_at = to_bson(&now).context("updated_at BSON 변환 실패")?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let linked = self
            .collection()
            .find_one_and_update(
                doc! { "_id": provide_id, "memberId": null },
                doc! { "$set": { "memberId": member_id, "updatedAt": updated_at } },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        match linked {
            Some(provide) => Ok(provide),
            // 조건 불일치: 이미 연결되어 있거나 존재하지 않음
            None => self
                .find_by_id(provide_id)
                .await?
                .ok_or_else(|| AppError::ProvideNotFound(provide_id.to_string())),
        }
    }
}
