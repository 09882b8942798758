//! 금칙어 필터
//!
//! 닉네임 등 사용자가 입력하는 자유 텍스트에 금칙어가 있는지 검사합니다.
//! 비교 전에 소문자화하고 공백과 흔한 구분 문자를 제거하므로 `f u c k`, `시-발` 같은 우회도 걸러냅니다.

use std::env;

use once_cell::sync::Lazy;

pub trait ProfanityFilter: Send + Sync {
    fn contains_banned_content(&self, text: &str) -> bool;
}

static DEFAULT_BANNED_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "시발", "씨발", "씨빨", "ㅅㅂ", "ㅆㅂ", "병신", "ㅂㅅ", "개새끼", "좆", "존나", "미친놈", "fuck", "shit",
        "bitch", "asshole", "bastard",
        // 운영자 사칭
        "운영자", "관리자", "admin",
    ]
});

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '-' | '.' | '*' | '~' | '!' | '@' | '#'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// 단어 목록 기반 필터
#[derive(Debug, Clone)]
pub struct BannedWordFilter {
    words: Vec<String>,
}

impl BannedWordFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        words.sort();
        words.dedup();
        Self { words }
    }

    /// 기본 목록에 `BANNED_WORDS`(쉼표 구분) 환경 변수를 더합니다.
    pub fn from_env() -> Self {
        let extra = env::var("BANNED_WORDS").unwrap_or_default();
        Self::new(
            DEFAULT_BANNED_WORDS
                .iter()
                .copied()
                .chain(extra.split(','))
                .map(str::to_string),
        )
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for BannedWordFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BANNED_WORDS.iter())
    }
}

impl ProfanityFilter for BannedWordFilter {
    fn contains_banned_content(&self, text: &str) -> bool {
        let normalized = normalize(text);
        !normalized.is_empty() && self.words.iter().any(|word| normalized.contains(word.as_str()))
    }
}
