//! 应用层
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsProvider、AudioTranscoder、SpeakerSelector）

pub mod ports;

pub use ports::{
    AudioFormat, AudioInfo, AudioTranscoderPort, FixedSpeakerSelector, SpeakerSelector,
    TranscodeConfig, TranscodeError, TranscodeResult, TtsAudio, TtsError, TtsOptions,
    TtsProviderPort,
};
