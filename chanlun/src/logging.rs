//! 日志初始化。级别默认 INFO，可通过环境变量 `CHANLUN_LOG` 覆盖（如 `debug`）。

use std::str::FromStr;

use tracing::Level;

pub const LOG_LEVEL_ENV: &str = "CHANLUN_LOG";

pub fn init_logging() {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|x| Level::from_str(x.trim()).ok())
        .unwrap_or(Level::INFO);
    init_logging_with(level);
}

/// Installs a global fmt subscriber; later calls are ignored.
pub fn init_logging_with(level: Level) {
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
}
