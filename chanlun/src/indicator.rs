pub mod core;
pub mod ema;
pub mod macd;

pub use self::core::Indicator;
pub use ema::Ema;
pub use macd::Macd;
