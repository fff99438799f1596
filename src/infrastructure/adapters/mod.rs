//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod bark;
pub mod speaker;
pub mod transcoder;

pub use bark::*;
pub use speaker::*;
pub use transcoder::WavTranscoder;
