//! Bark Adapter - Bark 预测服务客户端与 Provider 实现

mod bark_client;
mod provider;

pub use bark_client::{
    decode_audio_out, BarkClient, PredictionInput, PredictionRequest, AUDIO_OUT_PREFIX,
};
pub use provider::{BarkProvider, BarkProviderConfig, PROVIDER_NAME};
