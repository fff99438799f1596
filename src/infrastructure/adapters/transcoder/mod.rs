//! Transcoder Adapter - WAV 转码实现

mod wav_transcoder;

pub use wav_transcoder::WavTranscoder;

#[cfg(test)]
pub(crate) use wav_transcoder::tests;
