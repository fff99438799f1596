//! Application Ports - 端口定义
//!
//! 定义宿主、应用层与基础设施层之间的抽象接口

mod audio_transcoder;
mod speaker_selector;
mod tts_provider;

pub use audio_transcoder::{
    AudioFormat, AudioInfo, AudioTranscoderPort, TranscodeConfig, TranscodeError, TranscodeResult,
};
pub use speaker_selector::{FixedSpeakerSelector, SpeakerSelector};
pub use tts_provider::{TtsAudio, TtsError, TtsOptions, TtsProviderPort};
