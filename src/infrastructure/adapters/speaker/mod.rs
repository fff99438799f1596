//! Speaker Adapter - 随机说话人选择

mod random_selector;

pub use random_selector::RandomSpeakerSelector;
