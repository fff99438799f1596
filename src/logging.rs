//! 日志初始化
//!
//! `RUST_LOG` 优先于配置中的日志级别

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// 构造日志过滤器
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    let log_filter = format!("{},barktts={}", config.level, config.level);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter))
}

/// 安装全局 tracing subscriber
///
/// 宿主已安装 subscriber 时返回 false，不覆盖宿主的设置
pub fn init_logging(config: &LogConfig) -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(config));

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_only_once() {
        let config = LogConfig::default();
        // 第二次初始化一定失败（全局 subscriber 已存在）
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
