//! Speaker Selector Port - 说话人选择
//!
//! 为每次合成选择 [0, SPEAKER_COUNT) 内的说话人编号，测试中可固定

use crate::domain::SPEAKER_COUNT;

pub trait SpeakerSelector: Send + Sync {
    /// 返回 [0, SPEAKER_COUNT) 内的说话人编号
    fn pick(&self) -> u8;
}

/// 固定说话人
#[derive(Debug, Clone, Copy)]
pub struct FixedSpeakerSelector(u8);

impl FixedSpeakerSelector {
    pub fn new(speaker: u8) -> Self {
        Self(speaker % SPEAKER_COUNT)
    }
}

impl SpeakerSelector for FixedSpeakerSelector {
    fn pick(&self) -> u8 {
        self.0
    }
}
