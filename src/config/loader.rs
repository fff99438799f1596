//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（barktts.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["barktts", "barktts.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `BARKTTS_`，层级分隔符 `__`）
/// 2. 配置文件（barktts.toml 或 barktts.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `BARKTTS_TTS__URL=http://bark:5000/predictions`
/// - `BARKTTS_TTS__LANGUAGE=en`
/// - `BARKTTS_AUDIO__OUTPUT_FORMAT=wav`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("tts.language", "announcer")?
        .set_default("tts.url", "http://localhost:5000/predictions")?
        .set_default("tts.timeout_secs", 300)?
        .set_default("audio.output_format", "mp3")?
        .set_default("audio.bitrate_kbps", 64)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: BARKTTS_TTS__URL=http://bark:5000/predictions
    builder = builder.add_source(
        Environment::with_prefix("BARKTTS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub(crate) fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    let url = reqwest::Url::parse(&config.tts.url).map_err(|e| {
        ConfigError::ValidationError(format!("Invalid TTS URL '{}': {}", config.tts.url, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "TTS URL must be http or https: {}",
            config.tts.url
        )));
    }

    if config.tts.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "TTS timeout cannot be 0".to_string(),
        ));
    }

    if config.audio.bitrate_kbps == 0 {
        return Err(ConfigError::ValidationError(
            "MP3 bitrate cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== BarkTTS Configuration ===");
    tracing::info!("TTS URL: {}", config.tts.url);
    tracing::info!("TTS Language: {}", config.tts.language);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Output Format: {}", config.audio.output_format);
    if config.audio.output_format == crate::application::ports::AudioFormat::Mp3 {
        tracing::info!("MP3 Bitrate: {}kbps", config.audio.bitrate_kbps);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=============================");
}
