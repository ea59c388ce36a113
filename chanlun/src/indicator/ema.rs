use crate::bar::SBar;

use super::core::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    name: String,
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    /// A zero period is treated as 1.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            name: format!("ema_{period}"),
            alpha: 2.0 / (period as f64 + 1.0),
            value: None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// 首个值作为种子。
    pub fn next(&mut self, price: f64) -> f64 {
        let value = match self.value {
            None => price,
            Some(prev) => prev + self.alpha * (price - prev),
        };
        self.value = Some(value);
        value
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn update(&mut self, bar: &SBar) -> f64 {
        self.next(bar.close_price)
    }
}
