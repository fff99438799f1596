//! 音色解析
//!
//! 根据请求语言和可选的显式音色确定 Bark 的 history_prompt

use super::{Language, VoicePrompt};

/// 音色解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResolution {
    /// 显式音色
    Explicit(VoicePrompt),
    /// 由语言推导出的随机说话人
    Speaker(VoicePrompt),
    /// 播报员音色
    Announcer(VoicePrompt),
    /// 不支持的语言，回退到播报员音色
    Fallback(VoicePrompt),
}

impl PromptResolution {
    pub fn prompt(&self) -> &VoicePrompt {
        match self {
            Self::Explicit(p) | Self::Speaker(p) | Self::Announcer(p) | Self::Fallback(p) => p,
        }
    }

    pub fn into_prompt(self) -> VoicePrompt {
        match self {
            Self::Explicit(p) | Self::Speaker(p) | Self::Announcer(p) | Self::Fallback(p) => p,
        }
    }
}

/// 解析音色
///
/// 优先级:
/// 1. 显式音色，原样使用
/// 2. 支持的语言（非 announcer）: `{lang}_speaker_{pick()}`
/// 3. announcer: 播报员音色
/// 4. 其它: 回退到播报员音色
///
/// `pick` 只在第 2 种情况下调用
pub fn resolve_voice_prompt(
    language: &str,
    explicit: Option<&str>,
    pick: impl FnOnce() -> u8,
) -> PromptResolution {
    if let Some(prompt) = explicit {
        return PromptResolution::Explicit(VoicePrompt::explicit(prompt));
    }

    match language.parse::<Language>() {
        Ok(lang) if lang.is_announcer() => PromptResolution::Announcer(VoicePrompt::announcer()),
        Ok(lang) => PromptResolution::Speaker(VoicePrompt::speaker(lang, pick())),
        Err(_) => PromptResolution::Fallback(VoicePrompt::announcer()),
    }
}
