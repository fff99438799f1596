//! Speech Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Unsupported language '{0}'")]
    UnsupportedLanguage(String),
}
