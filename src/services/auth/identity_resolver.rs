//! 외부 신원 정규화
//!
//! 프로바이더 이름과 원본 사용자 속성 문서를 [`ExternalIdentity`]로 바꿉니다.
//! 부수 효과가 없는 순수 매핑입니다.
//!
//! | 프로바이더 | 식별자 | 이메일 |
//! |------------|--------|--------|
//! | GOOGLE | `sub` | `email` |
//! | NAVER | `response.id` | `response.email` |
//! | KAKAO | `id` (숫자 또는 문자열) | `kakao_account.email` |

use serde_json::Value;

use crate::core::errors::{AppError, AppResult};
use crate::domain::models::oauth::{ExternalIdentity, OAuthProvider, ProviderAttributes};

/// 프로바이더별 속성 경로
struct AttributeKeys {
    principal: &'static [&'static str],
    email: &'static [&'static str],
}

fn attribute_keys(provider: OAuthProvider) -> AttributeKeys {
    match provider {
        OAuthProvider::Google => AttributeKeys {
            principal: &["sub"],
            email: &["email"],
        },
        OAuthProvider::Naver => AttributeKeys {
            principal: &["response", "id"],
            email: &["response", "email"],
        },
        OAuthProvider::Kakao => AttributeKeys {
            principal: &["id"],
            email: &["kakao_account", "email"],
        },
    }
}

fn lookup<'a>(attributes: &'a ProviderAttributes, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(attributes.get(*first)?, |value, key| value.get(*key))
}

/// 문자열이거나 정수인 값을 비어 있지 않은 문자열로
fn as_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityResolver;

impl IdentityResolver {
    /// 프로바이더 이름(대소문자 무시)으로 정규화
    ///
    /// # Errors
    ///
    /// * `UnsupportedProvider` - 알 수 없는 프로바이더
    /// * `MissingProviderAttribute` - 식별자나 이메일이 없음
    pub fn resolve_named(&self, provider: &str, attributes: &ProviderAttributes) -> AppResult<ExternalIdentity> {
        self.resolve(provider.parse()?, attributes)
    }

    pub fn resolve(&self, provider: OAuthProvider, attributes: &ProviderAttributes) -> AppResult<ExternalIdentity> {
        let keys = attribute_keys(provider);
        let missing = |path: &[&str]| AppError::MissingProviderAttribute(format!("{}: {}", provider, path.join(".")));

        let external_id = lookup(attributes, keys.principal)
            .and_then(as_identifier)
            .ok_or_else(|| missing(keys.principal))?;

        let email = lookup(attributes, keys.email)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| missing(keys.email))?
            .to_string();

        Ok(ExternalIdentity {
            provider,
            external_id,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> ProviderAttributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_resolve_google() {
        let identity = IdentityResolver
            .resolve_named("google", &attrs(json!({"sub": "ext-1", "email": "a@x.com", "name": "A"})))
            .unwrap();

        assert_eq!(
            identity,
            ExternalIdentity {
                provider: OAuthProvider::Google,
                external_id: "ext-1".to_string(),
                email: "a@x.com".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_naver_nested_response() {
        let identity = IdentityResolver
            .resolve(
                OAuthProvider::Naver,
                &attrs(json!({"resultcode": "00", "response": {"id": "nv-9", "email": "n@x.com"}})),
            )
            .unwrap();

        assert_eq!(identity.external_id, "nv-9");
        assert_eq!(identity.email, "n@x.com");
    }

    #[test]
    fn test_resolve_kakao_numeric_id() {
        let identity = IdentityResolver
            .resolve_named(
                "KAKAO",
                &attrs(json!({"id": 123456789, "kakao_account": {"email": "k@x.com"}})),
            )
            .unwrap();

        assert_eq!(identity.provider, OAuthProvider::Kakao);
        assert_eq!(identity.external_id, "123456789");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let document = attrs(json!({"sub": "ext-1", "email": "a@x.com"}));
        let first = IdentityResolver.resolve(OAuthProvider::Google, &document).unwrap();
        let second = IdentityResolver.resolve(OAuthProvider::Google, &document).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsupported_provider() {
        let document = attrs(json!({"sub": "ext-1", "email": "a@x.com"}));
        for provider in ["github", "apple", ""] {
            assert!(matches!(
                IdentityResolver.resolve_named(provider, &document),
                Err(AppError::UnsupportedProvider(_))
            ));
        }
    }

    #[test]
    fn test_missing_attributes() {
        let cases = [
            (OAuthProvider::Google, json!({"email": "a@x.com"})),
            (OAuthProvider::Google, json!({"sub": "ext-1"})),
            (OAuthProvider::Google, json!({"sub": "", "email": "a@x.com"})),
            (OAuthProvider::Naver, json!({"id": "nv-9", "email": "n@x.com"})),
            (OAuthProvider::Kakao, json!({"id": 1.5, "kakao_account": {"email": "k@x.com"}})),
            (OAuthProvider::Kakao, json!({"id": 1, "kakao_account": {}})),
        ];

        for (provider, document) in cases {
            assert!(matches!(
                IdentityResolver.resolve(provider, &attrs(document)),
                Err(AppError::MissingProviderAttribute(_))
            ));
        }
    }
}
