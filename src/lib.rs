//! BarkTTS - 自托管 Bark 语音合成服务的 TTS Provider
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Speech Context: 支持的语言、音色（history_prompt）解析
//!
//! 应用层 (application/):
//! - Ports: TtsProvider（宿主调用）、AudioTranscoder、SpeakerSelector
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Bark HTTP Client、BarkProvider、WAV → MP3 转码、随机说话人选择
//!
//! 用法:
//! ```no_run
//! use barktts::{load_config, BarkProvider, TtsProviderPort};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! barktts::logging::init_logging(&config.log);
//!
//! let provider = BarkProvider::from_config(&config)?;
//! if let Some(audio) = provider.get_tts_audio("Hello", "en", None).await {
//!     println!("{} bytes of {}", audio.data.len(), audio.format);
//! }
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{AudioFormat, TtsAudio, TtsError, TtsOptions, TtsProviderPort};
pub use config::{load_config, AppConfig};
pub use domain::{Language, VoicePrompt, SUPPORTED_LANGUAGES};
pub use infrastructure::{BarkProvider, BarkProviderConfig};
