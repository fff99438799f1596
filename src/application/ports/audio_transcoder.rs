//! Audio Transcoder Port - 音频转码抽象
//!
//! 定义音频转码的抽象接口，将 Bark 返回的 WAV 转换为宿主需要的格式

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// 音频输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// 原始 WAV，不转码
    Wav,
    /// MP3 格式 - 宿主播放管线通用兼容
    #[default]
    Mp3,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wav" => Ok(AudioFormat::Wav),
            "mp3" => Ok(AudioFormat::Mp3),
            _ => Err(TranscodeError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// 转码配置
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// 输出格式
    pub format: AudioFormat,
    /// 目标比特率（kbps），仅用于 MP3
    /// 语音 48-64kbps 足够
    pub bitrate_kbps: u32,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            format: AudioFormat::Mp3,
            bitrate_kbps: 64,
        }
    }
}

/// 转码结果
#[derive(Debug, Clone)]
pub struct TranscodeResult {
    /// 转码后的音频数据
    pub audio_data: Vec<u8>,
    /// 输出格式
    pub format: AudioFormat,
    /// 原始大小（字节）
    pub original_size: usize,
    /// 转码后大小（字节）
    pub transcoded_size: usize,
}

/// Audio Transcoder Port
///
/// 给定 WAV 数据，输出目标格式的数据
#[async_trait]
pub trait AudioTranscoderPort: Send + Sync {
    /// 转码音频
    ///
    /// # Arguments
    /// * `wav_data` - 输入的 WAV 音频数据
    /// * `config` - 转码配置
    async fn transcode(
        &self,
        wav_data: Vec<u8>,
        config: &TranscodeConfig,
    ) -> Result<TranscodeResult, TranscodeError>;

    /// 获取音频信息（不转码）
    fn get_audio_info(&self, wav_data: &[u8]) -> Result<AudioInfo, TranscodeError>;
}

/// 音频信息
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// 时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u8,
    /// 位深度
    pub bits_per_sample: u16,
    /// 数据大小（字节）
    pub data_size: usize,
}
