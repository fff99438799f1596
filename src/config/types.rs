//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{AudioFormat, TranscodeConfig};
use crate::domain::Language;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// TTS 服务配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// TTS 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 默认语言
    #[serde(default)]
    pub language: Language,

    /// Bark 预测接口 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 整个合成操作的超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_url() -> String {
    "http://localhost:5000/predictions".to_string()
}

fn default_tts_timeout() -> u64 {
    300
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

impl TtsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 输出格式
    /// 可选: wav, mp3
    #[serde(default)]
    pub output_format: AudioFormat,

    /// MP3 比特率（kbps）
    #[serde(default = "default_bitrate")]
    pub bitrate_kbps: u32,
}

fn default_bitrate() -> u32 {
    64
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output_format: AudioFormat::default(),
            bitrate_kbps: default_bitrate(),
        }
    }
}

impl AudioConfig {
    pub fn transcode_config(&self) -> TranscodeConfig {
        TranscodeConfig {
            format: self.output_format,
            bitrate_kbps: self.bitrate_kbps,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
