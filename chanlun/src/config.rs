use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::{Const, DataError, StrokeMode, Timeframe};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChanConfig {
    pub stroke_mode: StrokeMode,
    /// Bars per stroke for `StrokeMode::Custom`.
    pub stroke_bar_count: usize,

    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,

    pub min_bars: usize,
    pub stroke_divergence_ratio: f64,
    pub segment_divergence_ratio: f64,
    pub divergence_window_bars: usize,

    /// Nominal bar interval; inferred from bar timestamps when absent.
    pub timeframe: Option<Timeframe>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChanConfigPatch {
    pub stroke_mode: Option<StrokeMode>,
    pub stroke_bar_count: Option<usize>,

    pub macd_fast: Option<usize>,
    pub macd_slow: Option<usize>,
    pub macd_signal: Option<usize>,

    pub min_bars: Option<usize>,
    pub stroke_divergence_ratio: Option<f64>,
    pub segment_divergence_ratio: Option<f64>,
    pub divergence_window_bars: Option<usize>,

    pub timeframe: Option<Timeframe>,
}

impl Default for ChanConfig {
    fn default() -> Self {
        Self {
            stroke_mode: StrokeMode::New,
            stroke_bar_count: 5,

            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,

            min_bars: Const::MIN_BARS,
            stroke_divergence_ratio: Const::STROKE_DIVERGENCE_RATIO,
            segment_divergence_ratio: Const::SEGMENT_DIVERGENCE_RATIO,
            divergence_window_bars: Const::DIVERGENCE_WINDOW_BARS,

            timeframe: None,
        }
    }
}

impl ChanConfig {
    pub fn apply_patch(mut self, patch: ChanConfigPatch) -> Self {
        if let Some(v) = patch.stroke_mode {
            self.stroke_mode = v;
        }
        if let Some(v) = patch.stroke_bar_count {
            self.stroke_bar_count = v;
        }

        if let Some(v) = patch.macd_fast {
            self.macd_fast = v;
        }
        if let Some(v) = patch.macd_slow {
            self.macd_slow = v;
        }
        if let Some(v) = patch.macd_signal {
            self.macd_signal = v;
        }

        if let Some(v) = patch.min_bars {
            self.min_bars = v;
        }
        if let Some(v) = patch.stroke_divergence_ratio {
            self.stroke_divergence_ratio = v;
        }
        if let Some(v) = patch.segment_divergence_ratio {
            self.segment_divergence_ratio = v;
        }
        if let Some(v) = patch.divergence_window_bars {
            self.divergence_window_bars = v;
        }

        if patch.timeframe.is_some() {
            self.timeframe = patch.timeframe;
        }
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let patch: ChanConfigPatch = serde_yaml::from_str(yaml)?;
        Ok(Self::default().apply_patch(patch))
    }

    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let patch: ChanConfigPatch = serde_json::from_str(json)?;
        Ok(Self::default().apply_patch(patch))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|x| x.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
