//! WAV Transcoder - 基于 symphonia + LAME 的音频转码器
//!
//! 支持：
//! - WAV 解析和信息提取
//! - WAV pass-through（不转码）
//! - WAV → MP3 编码（单声道）

use async_trait::async_trait;
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, MonoPcm};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{
    AudioFormat, AudioInfo, AudioTranscoderPort, TranscodeConfig, TranscodeError, TranscodeResult,
};

/// WAV 转码器
///
/// 解码用 symphonia，MP3 编码用 LAME。
/// 编码是 CPU 密集操作，在 blocking 线程池中执行
#[derive(Debug, Default, Clone, Copy)]
pub struct WavTranscoder;

impl WavTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// 解析 WAV 文件头
    fn parse_wav_header(data: &[u8]) -> Result<WavHeader, TranscodeError> {
        if data.len() < 44 {
            return Err(TranscodeError::InvalidInput(
                "WAV data too short".to_string(),
            ));
        }

        // 验证 RIFF 头
        if &data[0..4] != b"RIFF" {
            return Err(TranscodeError::InvalidInput(
                "Invalid WAV: missing RIFF header".to_string(),
            ));
        }

        // 验证 WAVE 标识
        if &data[8..12] != b"WAVE" {
            return Err(TranscodeError::InvalidInput(
                "Invalid WAV: missing WAVE identifier".to_string(),
            ));
        }

        let mut pos = 12;
        let mut fmt_chunk: Option<FmtChunk> = None;
        let mut data_size = 0;

        while pos + 8 <= data.len() {
            let chunk_id = &data[pos..pos + 4];
            let chunk_size =
                u32::from_le_bytes([data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]])
                    as usize;

            match chunk_id {
                b"fmt " => {
                    if chunk_size < 16 || pos + 8 + 16 > data.len() {
                        return Err(TranscodeError::InvalidInput(
                            "Invalid fmt chunk size".to_string(),
                        ));
                    }
                    let fmt_data = &data[pos + 8..pos + 8 + 16];
                    fmt_chunk = Some(FmtChunk {
                        num_channels: u16::from_le_bytes([fmt_data[2], fmt_data[3]]),
                        sample_rate: u32::from_le_bytes([
                            fmt_data[4],
                            fmt_data[5],
                            fmt_data[6],
                            fmt_data[7],
                        ]),
                        bits_per_sample: u16::from_le_bytes([fmt_data[14], fmt_data[15]]),
                    });
                }
                b"data" => {
                    // 流式写出的 WAV 可能在 data 头里写 0 或 0xFFFFFFFF
                    data_size = chunk_size.min(data.len() - (pos + 8));
                    break;
                }
                _ => {}
            }

            pos += 8 + chunk_size;
            // 对齐到偶数字节
            if chunk_size % 2 != 0 {
                pos += 1;
            }
        }

        let fmt = fmt_chunk.ok_or_else(|| {
            TranscodeError::InvalidInput("Invalid WAV: missing fmt chunk".to_string())
        })?;

        if data_size == 0 {
            return Err(TranscodeError::InvalidInput(
                "Invalid WAV: missing data chunk".to_string(),
            ));
        }

        Ok(WavHeader { fmt, data_size })
    }

    /// 使用 symphonia 解码 WAV 获取 PCM 数据
    fn decode_wav_to_pcm(data: Vec<u8>) -> Result<DecodedAudio, TranscodeError> {
        let cursor = Cursor::new(data);
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("wav");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| TranscodeError::DecodingError(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| TranscodeError::DecodingError("No audio track found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| TranscodeError::DecodingError("Unknown sample rate".to_string()))?;

        let channels = track
            .codec_params
            .channels
            .map(|c| c.count())
            .ok_or_else(|| TranscodeError::DecodingError("Unknown channel count".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| TranscodeError::DecodingError(format!("Decoder creation failed: {}", e)))?;

        let track_id = track.id;
        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(TranscodeError::DecodingError(format!(
                        "Packet read error: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Decode error (skipping packet): {}", e);
                    continue;
                }
            };

            let spec = *decoded.spec();
            let num_frames = decoded.frames();
            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            let actual_samples = num_frames * spec.channels.count();
            samples.extend(&sample_buf.samples()[..actual_samples]);
        }

        Ok(DecodedAudio {
            samples,
            sample_rate,
            channels,
        })
    }

    /// 混音为单声道并转换为 i16
    fn downmix_to_mono(pcm: &DecodedAudio) -> Vec<i16> {
        let channels = pcm.channels.max(1);
        pcm.samples
            .chunks(channels)
            .map(|frame| {
                let mixed = frame.iter().sum::<f32>() / frame.len() as f32;
                (mixed.clamp(-1.0, 1.0) * 32767.0) as i16
            })
            .collect()
    }

    /// 选择不超过目标值的最大 LAME 比特率
    fn lame_bitrate(kbps: u32) -> Bitrate {
        match kbps {
            320.. => Bitrate::Kbps320,
            256.. => Bitrate::Kbps256,
            224.. => Bitrate::Kbps224,
            192.. => Bitrate::Kbps192,
            160.. => Bitrate::Kbps160,
            128.. => Bitrate::Kbps128,
            112.. => Bitrate::Kbps112,
            96.. => Bitrate::Kbps96,
            80.. => Bitrate::Kbps80,
            64.. => Bitrate::Kbps64,
            48.. => Bitrate::Kbps48,
            40.. => Bitrate::Kbps40,
            32.. => Bitrate::Kbps32,
            24.. => Bitrate::Kbps24,
            16.. => Bitrate::Kbps16,
            _ => Bitrate::Kbps8,
        }
    }

    /// 将 PCM 编码为 MP3
    fn encode_mp3(pcm: &DecodedAudio, bitrate_kbps: u32) -> Result<Vec<u8>, TranscodeError> {
        let mono = Self::downmix_to_mono(pcm);

        let mut builder = Builder::new().ok_or_else(|| {
            TranscodeError::EncodingError("Failed to create LAME builder".to_string())
        })?;
        builder
            .set_num_channels(1)
            .map_err(|e| TranscodeError::EncodingError(format!("Failed to set channels: {:?}", e)))?;
        builder
            .set_sample_rate(pcm.sample_rate)
            .map_err(|e| {
                TranscodeError::EncodingError(format!("Failed to set sample rate: {:?}", e))
            })?;
        builder
            .set_brate(Self::lame_bitrate(bitrate_kbps))
            .map_err(|e| TranscodeError::EncodingError(format!("Failed to set bitrate: {:?}", e)))?;
        let mut encoder = builder.build().map_err(|e| {
            TranscodeError::EncodingError(format!("Failed to initialize LAME encoder: {:?}", e))
        })?;

        let mut mp3 = Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(mono.len()));
        encoder
            .encode_to_vec(MonoPcm(mono.as_slice()), &mut mp3)
            .map_err(|e| TranscodeError::EncodingError(format!("MP3 encode failed: {:?}", e)))?;

        // flush 最多写出 7200 字节
        mp3.reserve(7200);
        encoder
            .flush_to_vec::<FlushNoGap>(&mut mp3)
            .map_err(|e| TranscodeError::EncodingError(format!("MP3 flush failed: {:?}", e)))?;

        Ok(mp3)
    }

    fn transcode_blocking(
        wav_data: Vec<u8>,
        config: &TranscodeConfig,
    ) -> Result<TranscodeResult, TranscodeError> {
        let original_size = wav_data.len();

        match config.format {
            AudioFormat::Wav => Ok(TranscodeResult {
                audio_data: wav_data,
                format: AudioFormat::Wav,
                original_size,
                transcoded_size: original_size,
            }),
            AudioFormat::Mp3 => {
                let decoded = Self::decode_wav_to_pcm(wav_data)?;
                let mp3_data = Self::encode_mp3(&decoded, config.bitrate_kbps)?;

                tracing::debug!(
                    original_size = original_size,
                    mp3_size = mp3_data.len(),
                    sample_rate = decoded.sample_rate,
                    channels = decoded.channels,
                    bitrate_kbps = config.bitrate_kbps,
                    "Encoded to MP3"
                );

                Ok(TranscodeResult {
                    transcoded_size: mp3_data.len(),
                    audio_data: mp3_data,
                    format: AudioFormat::Mp3,
                    original_size,
                })
            }
        }
    }
}

#[derive(Debug)]
struct WavHeader {
    fmt: FmtChunk,
    data_size: usize,
}

#[derive(Debug)]
struct FmtChunk {
    num_channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

#[derive(Debug)]
struct DecodedAudio {
    /// 交错排列的样本
    samples: Vec<f32>,
    sample_rate: u32,
    channels: usize,
}

#[async_trait]
impl AudioTranscoderPort for WavTranscoder {
    async fn transcode(
        &self,
        wav_data: Vec<u8>,
        config: &TranscodeConfig,
    ) -> Result<TranscodeResult, TranscodeError> {
        if config.format == AudioFormat::Wav {
            return Self::transcode_blocking(wav_data, config);
        }

        let config = config.clone();
        tokio::task::spawn_blocking(move || Self::transcode_blocking(wav_data, &config))
            .await
            .map_err(|e| TranscodeError::EncodingError(format!("Transcode task failed: {}", e)))?
    }

    fn get_audio_info(&self, wav_data: &[u8]) -> Result<AudioInfo, TranscodeError> {
        let header = Self::parse_wav_header(wav_data)?;

        let samples_per_channel = if header.fmt.bits_per_sample >= 8 && header.fmt.num_channels > 0
        {
            header.data_size
                / (header.fmt.bits_per_sample as usize / 8)
                / header.fmt.num_channels as usize
        } else {
            0
        };

        let duration_ms = if header.fmt.sample_rate > 0 {
            (samples_per_channel as u64 * 1000) / header.fmt.sample_rate as u64
        } else {
            0
        };

        Ok(AudioInfo {
            duration_ms,
            sample_rate: header.fmt.sample_rate,
            channels: header.fmt.num_channels as u8,
            bits_per_sample: header.fmt.bits_per_sample,
            data_size: header.data_size,
        })
    }
}
