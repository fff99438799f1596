//! Speech Context - 语音合成限界上下文
//!
//! 职责:
//! - 支持的语言
//! - 音色（history_prompt）解析

mod errors;
mod value_objects;
mod voice_prompt;

pub use errors::SpeechError;
pub use value_objects::{Language, VoicePrompt, SPEAKER_COUNT, SUPPORTED_LANGUAGES};
pub use voice_prompt::{resolve_voice_prompt, PromptResolution};
