//! 基于线程本地 RNG 的说话人选择

use rand::Rng;

use crate::application::ports::SpeakerSelector;
use crate::domain::SPEAKER_COUNT;

/// 每次调用均匀随机选择说话人
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSpeakerSelector;

impl SpeakerSelector for RandomSpeakerSelector {
    fn pick(&self) -> u8 {
        rand::thread_rng().gen_range(0..SPEAKER_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_in_range() {
        let selector = RandomSpeakerSelector;
        let mut seen = [false; SPEAKER_COUNT as usize];
        for _ in 0..1000 {
            let n = selector.pick();
            assert!(n < SPEAKER_COUNT);
            seen[n as usize] = true;
        }
        // 1000 次内五个说话人都应出现
        assert!(seen.iter().all(|s| *s));
    }
}
