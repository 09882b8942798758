//! # 회원 리포지토리
//!
//! `members` 컬렉션에 대한 MongoDB 구현입니다.
//!
//! 닉네임 유일성은 탈퇴 회원을 제외하고 판단하므로 유니크 인덱스 대신
//! 조회 시점 검사로 보장합니다.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, to_bson};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::db::Database;
use crate::domain::entities::members::member::{Member, MemberStatus};
use crate::repositories::MemberStore;

const COLLECTION: &str = "members";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB 중복 키(E11000) 에러인지 확인합니다.
pub(crate) fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

pub struct MongoMemberStore {
    db: Arc<Database>,
}

impl MongoMemberStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Member> {
        self.db.collection::<Member>(COLLECTION)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let nickname_index = IndexModel::builder()
            .keys(doc! { "nickname": 1, "status": 1 })
            .options(IndexOptions::builder().name("nickname_status".to_string()).build())
            .build();

        let provide_index = IndexModel::builder()
            .keys(doc! { "provideId": 1 })
            .options(IndexOptions::builder().name("provide_id".to_string()).build())
            .build();

        self.collection()
            .create_indexes([nickname_index, provide_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl MemberStore for MongoMemberStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Member>> {
        self.collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn save(&self, member: Member) -> AppResult<Member> {
        self.collection()
            .replace_one(doc! { "_id": member.id.as_str() }, &member)
            .upsert(true)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(member)
    }

    async fn exists_by_nickname(&self, nickname: &str) -> AppResult<bool> {
        let deactivated = to_bson(&MemberStatus::Deactivate).context("회원 상태 BSON 변환 실패")?;

        let count = self
            .collection()
            .count_documents(doc! { "nickname": nickname, "status": { "$ne": deactivated } })
            .limit(1)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.collection()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
