use crate::bar::SBar;

/// 逐根 K 线推进的指标。
pub trait Indicator: Send {
    fn name(&self) -> &str;
    fn reset(&mut self);
    fn update(&mut self, bar: &SBar) -> f64;

    /// Resets, then replays `sbars`; one value per bar.
    fn series(&mut self, sbars: &[SBar]) -> Vec<f64> {
        self.reset();
        sbars.iter().map(|x| self.update(x)).collect()
    }
}
