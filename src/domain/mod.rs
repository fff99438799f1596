//! Domain Layer - 领域层
//!
//! Speech Context: 语言与音色

pub mod speech;

pub use speech::{
    resolve_voice_prompt, Language, PromptResolution, SpeechError, VoicePrompt, SPEAKER_COUNT,
    SUPPORTED_LANGUAGES,
};
