//! Speech Context - Value Objects

use serde::{Deserialize, Serialize};

use super::SpeechError;

/// 说话人变体数量（Bark 每种语言提供 speaker_0 ~ speaker_4）
pub const SPEAKER_COUNT: u8 = 5;

/// 支持的语言
///
/// `Announcer` 不是真正的语言，表示使用默认播报员音色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Announcer,
    De,
    En,
    Es,
    Fr,
    Hi,
    It,
    Ja,
    Ko,
    Pl,
    Ru,
    Tr,
    Zh,
}

/// 支持的语言列表（顺序固定，Announcer 在首位）
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language::Announcer,
    Language::De,
    Language::En,
    Language::Es,
    Language::Fr,
    Language::Hi,
    Language::It,
    Language::Ja,
    Language::Ko,
    Language::Pl,
    Language::Ru,
    Language::Tr,
    Language::Zh,
];

impl Language {
    /// 语言标签
    pub fn code(&self) -> &'static str {
        match self {
            Self::Announcer => "announcer",
            Self::De => "de",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::Hi => "hi",
            Self::It => "it",
            Self::Ja => "ja",
            Self::Ko => "ko",
            Self::Pl => "pl",
            Self::Ru => "ru",
            Self::Tr => "tr",
            Self::Zh => "zh",
        }
    }

    pub fn is_announcer(&self) -> bool {
        matches!(self, Self::Announcer)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = SpeechError;

    /// 精确匹配语言标签（区分大小写，与宿主的配置校验一致）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| SpeechError::UnsupportedLanguage(s.to_string()))
    }
}

/// 音色提示（Bark 的 history_prompt）
///
/// 取值:
/// - `{lang}_speaker_{n}`，n 在 [0, SPEAKER_COUNT) 内
/// - `announcer`，默认播报员音色
/// - 调用方显式指定的任意字符串
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoicePrompt(String);

impl VoicePrompt {
    /// 调用方显式指定的音色，原样使用
    pub fn explicit(prompt: impl Into<String>) -> Self {
        Self(prompt.into())
    }

    /// 默认播报员音色
    pub fn announcer() -> Self {
        Self(Language::Announcer.code().to_string())
    }

    /// 某语言的第 `speaker` 号说话人
    ///
    /// `speaker` 超出范围时按 SPEAKER_COUNT 取模
    pub fn speaker(language: Language, speaker: u8) -> Self {
        Self(format!(
            "{}_speaker_{}",
            language.code(),
            speaker % SPEAKER_COUNT
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoicePrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
