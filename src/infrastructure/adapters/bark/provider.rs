//! Bark Provider - 宿主侧 TTS Provider 实现
//!
//! 实现 TtsProviderPort trait：解析音色 → 调用 Bark → 按配置转码。
//! 所有错误在 `get_tts_audio` 中记录日志并转换为 `None`

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::bark_client::{BarkClient, PredictionRequest};
use crate::application::ports::{
    AudioFormat, AudioTranscoderPort, SpeakerSelector, TranscodeConfig, TtsAudio, TtsError,
    TtsOptions, TtsProviderPort,
};
use crate::config::{print_config, AppConfig};
use crate::domain::{resolve_voice_prompt, Language, PromptResolution, SUPPORTED_LANGUAGES};
use crate::infrastructure::adapters::speaker::RandomSpeakerSelector;
use crate::infrastructure::adapters::transcoder::WavTranscoder;

/// Provider 名称
pub const PROVIDER_NAME: &str = "BarkTTS";

/// Bark Provider 配置
#[derive(Debug, Clone)]
pub struct BarkProviderConfig {
    /// 默认语言
    pub language: Language,
    /// Bark 预测接口 URL
    pub url: String,
    /// 整个合成操作的超时时间
    pub timeout: Duration,
    /// 输出格式与比特率
    pub transcode: TranscodeConfig,
}

impl Default for BarkProviderConfig {
    fn default() -> Self {
        Self {
            language: Language::Announcer,
            url: "http://localhost:5000/predictions".to_string(),
            timeout: Duration::from_secs(300),
            transcode: TranscodeConfig::default(),
        }
    }
}

impl BarkProviderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_output_format(mut self, format: AudioFormat) -> Self {
        self.transcode.format = format;
        self
    }
}

impl From<&AppConfig> for BarkProviderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            language: config.tts.language,
            url: config.tts.url.clone(),
            timeout: config.tts.timeout(),
            transcode: config.audio.transcode_config(),
        }
    }
}

/// Bark TTS Provider
///
/// 只持有不可变配置，可在多个并发调用间共享
pub struct BarkProvider {
    client: BarkClient,
    config: BarkProviderConfig,
    transcoder: Arc<dyn AudioTranscoderPort>,
    speaker_selector: Arc<dyn SpeakerSelector>,
}

impl BarkProvider {
    /// 使用独立的 HTTP 客户端创建 Provider
    pub fn new(config: BarkProviderConfig) -> Result<Self, TtsError> {
        let client = BarkClient::with_default_client(config.url.clone())?;
        Ok(Self::with_parts(client, config))
    }

    /// 使用宿主提供的 HTTP 客户端创建 Provider
    pub fn with_client(client: Client, config: BarkProviderConfig) -> Self {
        Self::with_parts(BarkClient::new(client, config.url.clone()), config)
    }

    /// 从应用配置创建
    pub fn from_config(config: &AppConfig) -> Result<Self, TtsError> {
        print_config(config);
        Self::new(BarkProviderConfig::from(config))
    }

    fn with_parts(client: BarkClient, config: BarkProviderConfig) -> Self {
        tracing::info!(
            url = %config.url,
            language = %config.language,
            output_format = %config.transcode.format,
            timeout_secs = config.timeout.as_secs(),
            "BarkProvider initialized"
        );

        Self {
            client,
            config,
            transcoder: Arc::new(WavTranscoder::new()),
            speaker_selector: Arc::new(RandomSpeakerSelector),
        }
    }

    /// 替换转码器
    pub fn with_transcoder(mut self, transcoder: Arc<dyn AudioTranscoderPort>) -> Self {
        self.transcoder = transcoder;
        self
    }

    /// 替换说话人选择器（测试中用于固定说话人）
    pub fn with_speaker_selector(mut self, selector: Arc<dyn SpeakerSelector>) -> Self {
        self.speaker_selector = selector;
        self
    }

    pub fn config(&self) -> &BarkProviderConfig {
        &self.config
    }

    /// 构造预测请求
    ///
    /// 显式音色 → 语言推导 → 播报员音色
    pub fn build_request(
        &self,
        message: &str,
        language: &str,
        options: Option<&TtsOptions>,
    ) -> PredictionRequest {
        let explicit = options.and_then(|o| o.history_prompt.as_deref());
        let resolution =
            resolve_voice_prompt(language, explicit, || self.speaker_selector.pick());

        if let PromptResolution::Fallback(_) = resolution {
            tracing::warn!(language = %language, "Unsupported language '{}'", language);
        }

        PredictionRequest::new(message, resolution.into_prompt())
    }

    /// 合成音频，返回详细错误
    ///
    /// 整个操作（请求、解码、转码）受 `timeout` 限制，超时后请求被取消
    pub async fn synthesize(
        &self,
        message: &str,
        language: &str,
        options: Option<&TtsOptions>,
    ) -> Result<TtsAudio, TtsError> {
        let request = self.build_request(message, language, options);

        match tokio::time::timeout(self.config.timeout, self.run(&request)).await {
            Ok(result) => result,
            Err(_) => Err(TtsError::Timeout),
        }
    }

    async fn run(&self, request: &PredictionRequest) -> Result<TtsAudio, TtsError> {
        let wav = self.client.predict(request).await?;

        if wav.is_empty() {
            return Err(TtsError::InvalidResponse("Empty audio".to_string()));
        }

        if self.config.transcode.format == AudioFormat::Wav {
            return Ok(TtsAudio {
                format: AudioFormat::Wav,
                data: wav,
            });
        }

        match self.transcoder.get_audio_info(&wav) {
            Ok(info) => tracing::debug!(
                duration_ms = info.duration_ms,
                sample_rate = info.sample_rate,
                channels = info.channels,
                "Received Bark audio"
            ),
            Err(e) => tracing::debug!(error = %e, "Could not read WAV header"),
        }

        let result = self
            .transcoder
            .transcode(wav, &self.config.transcode)
            .await?;

        if result.audio_data.is_empty() {
            return Err(TtsError::InvalidResponse(
                "Transcoder produced no audio".to_string(),
            ));
        }

        Ok(TtsAudio {
            format: result.format,
            data: result.audio_data,
        })
    }
}

#[async_trait]
impl TtsProviderPort for BarkProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn default_language(&self) -> Language {
        self.config.language
    }

    fn supported_languages(&self) -> &'static [Language] {
        SUPPORTED_LANGUAGES
    }

    async fn get_tts_audio(
        &self,
        message: &str,
        language: &str,
        options: Option<&TtsOptions>,
    ) -> Option<TtsAudio> {
        match self.synthesize(message, language, options).await {
            Ok(audio) => {
                tracing::info!(
                    format = %audio.format,
                    audio_size = audio.data.len(),
                    "BarkTTS synthesis completed"
                );
                Some(audio)
            }
            Err(TtsError::Timeout) => {
                tracing::error!(url = %self.config.url, "Timeout for BarkTTS API");
                None
            }
            Err(TtsError::ServiceError { status, url, body }) => {
                tracing::error!("Error {} on load url {}: {}", status, url, body);
                None
            }
            Err(e) => {
                tracing::error!(url = %self.config.url, error = %e, "BarkTTS request failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::FixedSpeakerSelector;
    use crate::infrastructure::adapters::transcoder::tests::create_test_wav;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn audio_out_response(wav: &[u8]) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "succeeded",
            "output": {
                "audio_out": format!("data:audio/x-wav;base64,{}", STANDARD.encode(wav)),
            },
        }))
    }

    fn wav_provider(server: &MockServer) -> BarkProvider {
        let config = BarkProviderConfig::new(format!("{}/predictions", server.uri()))
            .with_output_format(AudioFormat::Wav);
        BarkProvider::new(config)
            .unwrap()
            .with_speaker_selector(Arc::new(FixedSpeakerSelector::new(3)))
    }

    #[test]
    fn test_config_default() {
        let config = BarkProviderConfig::default();
        assert_eq!(config.language, Language::Announcer);
        assert_eq!(config.url, "http://localhost:5000/predictions");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.transcode.format, AudioFormat::Mp3);
    }

    #[test]
    fn test_config_from_app_config() {
        let mut app = AppConfig::default();
        app.tts.language = Language::Fr;
        app.tts.timeout_secs = 30;
        app.audio.output_format = AudioFormat::Wav;

        let config = BarkProviderConfig::from(&app);
        assert_eq!(config.language, Language::Fr);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.transcode.format, AudioFormat::Wav);
    }

    #[test]
    fn test_from_config() {
        let mut app = AppConfig::default();
        app.tts.language = Language::Pl;
        app.audio.output_format = AudioFormat::Wav;

        let provider = BarkProvider::from_config(&app).unwrap();
        assert_eq!(provider.default_language(), Language::Pl);
        assert_eq!(provider.config().url, "http://localhost:5000/predictions");
        assert_eq!(provider.config().transcode.format, AudioFormat::Wav);
    }

    #[test]
    fn test_accessors() {
        let provider =
            BarkProvider::new(BarkProviderConfig::default().with_language(Language::Ko)).unwrap();
        assert_eq!(provider.name(), "BarkTTS");
        assert_eq!(provider.default_language(), Language::Ko);
        assert_eq!(provider.supported_languages().len(), 13);
        assert_eq!(provider.supported_languages()[0], Language::Announcer);
    }

    #[test]
    fn test_build_request_prompts() {
        let provider = BarkProvider::new(BarkProviderConfig::default())
            .unwrap()
            .with_speaker_selector(Arc::new(FixedSpeakerSelector::new(4)));

        let cases = [
            ("en", None, "en_speaker_4"),
            ("zh", None, "zh_speaker_4"),
            ("announcer", None, "announcer"),
            ("xx", None, "announcer"),
            ("en", Some("custom_voice"), "custom_voice"),
        ];

        for (language, prompt, expected) in cases {
            let options = prompt.map(TtsOptions::with_history_prompt);
            let request = provider.build_request("hi", language, options.as_ref());
            assert_eq!(request.input.history_prompt.as_str(), expected);
            assert_eq!(request.input.prompt, "hi");
        }
    }

    #[test]
    fn test_build_request_random_speaker_in_range() {
        let provider = BarkProvider::new(BarkProviderConfig::default()).unwrap();
        for _ in 0..50 {
            let request = provider.build_request("hi", "it", None);
            let prompt = request.input.history_prompt.as_str().to_string();
            let n: u8 = prompt
                .strip_prefix("it_speaker_")
                .unwrap()
                .parse()
                .unwrap();
            assert!(n <= 4);
        }
    }

    #[test]
    fn test_explicit_prompt_gives_identical_requests() {
        let provider = BarkProvider::new(BarkProviderConfig::default()).unwrap();
        let options = TtsOptions::with_history_prompt("en_speaker_0");
        let first = provider.build_request("same", "en", Some(&options));
        let second = provider.build_request("same", "en", Some(&options));
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_wav_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predictions"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "input": {"prompt": "Hello world", "history_prompt": "en_speaker_3"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"audio_out": "data:audio/x-wav;base64,AAAA"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = wav_provider(&server);
        let audio = provider
            .get_tts_audio("Hello world", "en", None)
            .await
            .unwrap();

        assert_eq!(audio.format, AudioFormat::Wav);
        assert_eq!(audio.data, vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn test_wav_bytes_returned_verbatim() {
        let server = MockServer::start().await;
        let wav = create_test_wav(24000, 1);
        Mock::given(method("POST"))
            .respond_with(audio_out_response(&wav))
            .mount(&server)
            .await;

        let audio = wav_provider(&server)
            .get_tts_audio("Hello", "announcer", None)
            .await
            .unwrap();
        assert_eq!(audio.data, wav);
    }

    #[tokio::test]
    async fn test_mp3_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(audio_out_response(&create_test_wav(24000, 1)))
            .mount(&server)
            .await;

        let provider =
            BarkProvider::new(BarkProviderConfig::new(format!("{}/predictions", server.uri())))
                .unwrap();
        let audio = provider.get_tts_audio("Hello", "en", None).await.unwrap();

        assert_eq!(audio.format, AudioFormat::Mp3);
        assert_eq!(audio.data[0], 0xFF);
    }

    #[tokio::test]
    async fn test_mp3_with_invalid_wav_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"audio_out": "data:audio/x-wav;base64,AAAA"}
            })))
            .mount(&server)
            .await;

        let provider =
            BarkProvider::new(BarkProviderConfig::new(format!("{}/predictions", server.uri())))
                .unwrap();
        assert!(provider.get_tts_audio("Hello", "en", None).await.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
            .expect(2)
            .mount(&server)
            .await;

        let provider = wav_provider(&server);
        assert!(provider.get_tts_audio("Hello", "en", None).await.is_none());

        match provider.synthesize("Hello", "en", None).await {
            Err(TtsError::ServiceError { status, body, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "model crashed");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_bodies_return_none() {
        let bodies = [
            ResponseTemplate::new(200).set_body_string("not json"),
            ResponseTemplate::new(200).set_body_json(serde_json::json!({})),
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": null})),
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": {}})),
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"output": {"audio_out": "AAAA"}})),
            ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"output": {"audio_out": "data:audio/x-wav;base64,"}}),
            ),
        ];

        for body in bodies {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(body)
                .mount(&server)
                .await;

            assert!(wav_provider(&server)
                .get_tts_audio("Hello", "en", None)
                .await
                .is_none());
        }
    }

    #[tokio::test]
    async fn test_timeout_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "output": {"audio_out": "data:audio/x-wav;base64,AAAA"}
                    }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = BarkProviderConfig::new(format!("{}/predictions", server.uri()))
            .with_output_format(AudioFormat::Wav)
            .with_timeout(Duration::from_millis(200));
        let provider = BarkProvider::new(config).unwrap();

        assert!(matches!(
            provider.synthesize("Hello", "en", None).await,
            Err(TtsError::Timeout)
        ));
        assert!(provider.get_tts_audio("Hello", "en", None).await.is_none());
    }

    #[tokio::test]
    async fn test_connection_refused_returns_none() {
        let server = MockServer::start().await;
        let url = format!("{}/predictions", server.uri());
        drop(server);

        let provider =
            BarkProvider::new(BarkProviderConfig::new(url).with_output_format(AudioFormat::Wav))
                .unwrap();
        assert!(provider.get_tts_audio("Hello", "en", None).await.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_language_sends_announcer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({
                "input": {"prompt": "Hallo", "history_prompt": "announcer"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"audio_out": "data:audio/x-wav;base64,AAAA"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let audio = wav_provider(&server)
            .get_tts_audio("Hallo", "de-DE", None)
            .await;
        assert!(audio.is_some());
    }

    #[tokio::test]
    async fn test_shared_host_client() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"audio_out": "data:audio/x-wav;base64,AAAA"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let config = BarkProviderConfig::new(format!("{}/predictions", server.uri()))
            .with_output_format(AudioFormat::Wav);
        let provider = Arc::new(BarkProvider::with_client(Client::new(), config));

        let (a, b) = tokio::join!(
            provider.get_tts_audio("one", "en", None),
            provider.get_tts_audio("two", "fr", None)
        );
        assert!(a.is_some());
        assert!(b.is_some());
    }
}
