//! TTS Provider Port - 宿主调用的语音合成接口
//!
//! 宿主只依赖这个接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::{AudioFormat, TranscodeError};
use crate::domain::Language;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Error {status} on load url {url}: {body}")]
    ServiceError {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transcode error: {0}")]
    Transcode(#[from] TranscodeError),
}

/// 合成选项
///
/// 宿主以键值映射传入，未知键忽略
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TtsOptions {
    /// 显式指定的音色，覆盖按语言推导的结果
    #[serde(default)]
    pub history_prompt: Option<String>,
}

impl TtsOptions {
    pub fn with_history_prompt(prompt: impl Into<String>) -> Self {
        Self {
            history_prompt: Some(prompt.into()),
        }
    }
}

/// 合成成功的音频
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsAudio {
    pub format: AudioFormat,
    pub data: Vec<u8>,
}

/// TTS Provider Port
///
/// 每次 `get_tts_audio` 调用要么返回音频，要么返回 `None`，不会返回错误
#[async_trait]
pub trait TtsProviderPort: Send + Sync {
    /// Provider 名称
    fn name(&self) -> &str;

    /// 默认语言
    fn default_language(&self) -> Language;

    /// 支持的语言列表
    fn supported_languages(&self) -> &'static [Language];

    /// 合成音频
    ///
    /// `language` 可以是任意字符串，不支持的语言会回退到默认音色
    async fn get_tts_audio(
        &self,
        message: &str,
        language: &str,
        options: Option<&TtsOptions>,
    ) -> Option<TtsAudio>;
}
