use crate::bar::SBar;

use super::core::Indicator;
use super::ema::Ema;

/// MACD 柱：`2 * (DIF - DEA)`。
#[derive(Debug, Clone)]
pub struct Macd {
    name: String,
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("macd_{fast}_{slow}_{signal}"),
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
        }
    }

    pub fn next(&mut self, price: f64) -> f64 {
        let dif = self.fast.next(price) - self.slow.next(price);
        let dea = self.signal.next(dif);
        2.0 * (dif - dea)
    }

    /// Histogram aligned with `sbars`, one value per bar.
    pub fn histogram(fast: usize, slow: usize, signal: usize, sbars: &[SBar]) -> Vec<f64> {
        Self::new(fast, slow, signal).series(sbars)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
    }

    fn update(&mut self, bar: &SBar) -> f64 {
        self.next(bar.close_price)
    }
}
