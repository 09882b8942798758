//! 도메인 엔티티
//!
//! MongoDB에 영속화되는 두 엔티티를 정의합니다.
//!
//! - [`provides::provide::Provide`] - 외부 OAuth 신원 ↔ 회원 연동 정보 (`provides` 컬렉션)
//! - [`members::member::Member`] - 회원 계정과 생명주기 상태 (`members` 컬렉션)
//!
//! 두 엔티티 모두 `_id`에 UUID 문자열을 쓰고, 필드 이름은 camelCase로 저장됩니다.

pub mod members;
pub mod provides;

pub use members::member::{Gender, Member, MemberStatus};
pub use provides::provide::Provide;
