//! Bark HTTP Client - 调用 Bark 预测服务
//!
//! Bark API (Cog 预测接口):
//! POST http://localhost:5000/predictions
//! Request: {"input": {"prompt": "...", "history_prompt": "en_speaker_1"}}  (JSON)
//! Response: {"output": {"audio_out": "data:audio/x-wav;base64,<base64 wav>"}}

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::TtsError;
use crate::domain::VoicePrompt;

/// audio_out 字段的固定前缀
pub const AUDIO_OUT_PREFIX: &str = "data:audio/x-wav;base64,";

/// 预测请求体 (JSON)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    pub input: PredictionInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionInput {
    /// 要合成的文本
    pub prompt: String,
    /// 音色
    pub history_prompt: VoicePrompt,
}

impl PredictionRequest {
    pub fn new(prompt: impl Into<String>, history_prompt: VoicePrompt) -> Self {
        Self {
            input: PredictionInput {
                prompt: prompt.into(),
                history_prompt,
            },
        }
    }
}

/// 预测响应体，只关心 output.audio_out
#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    output: Option<PredictionOutput>,
}

#[derive(Debug, Deserialize)]
struct PredictionOutput {
    #[serde(default)]
    audio_out: Option<String>,
}

/// 从 `data:audio/x-wav;base64,...` 中解出 WAV 字节
pub fn decode_audio_out(audio_out: &str) -> Result<Vec<u8>, TtsError> {
    let (_, encoded) = audio_out.split_once(AUDIO_OUT_PREFIX).ok_or_else(|| {
        TtsError::InvalidResponse(format!(
            "audio_out does not contain '{}'",
            AUDIO_OUT_PREFIX
        ))
    })?;

    STANDARD
        .decode(encoded.trim())
        .map_err(|e| TtsError::InvalidResponse(format!("Invalid base64 audio: {}", e)))
}

/// Bark HTTP 客户端
///
/// 不做重试，不设置 reqwest 超时；整体超时由 BarkProvider 控制
#[derive(Debug, Clone)]
pub struct BarkClient {
    client: Client,
    url: String,
}

impl BarkClient {
    /// 使用宿主提供的 reqwest 客户端（共享连接池）
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// 使用独立的 reqwest 客户端
    pub fn with_default_client(url: impl Into<String>) -> Result<Self, TtsError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;
        Ok(Self::new(client, url))
    }

    /// 发送预测请求，返回 WAV 字节
    pub async fn predict(&self, request: &PredictionRequest) -> Result<Vec<u8>, TtsError> {
        tracing::debug!(
            url = %self.url,
            text_len = request.input.prompt.len(),
            history_prompt = %request.input.history_prompt,
            "Sending Bark prediction request"
        );

        // .json() 会设置 Content-Type: application/json
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to Bark service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let body: PredictionResponse = response
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let audio_out = body
            .output
            .and_then(|output| output.audio_out)
            .ok_or_else(|| TtsError::InvalidResponse("Missing output.audio_out".to_string()))?;

        let wav = decode_audio_out(&audio_out)?;

        tracing::debug!(audio_size = wav.len(), "Bark prediction completed");

        Ok(wav)
    }
}
