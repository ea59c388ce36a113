//! 结构分析入口。
//!
//! 每次调用都从 SBar 快照完整重算：
//! `SBar -> CBar -> Fractal -> Stroke -> Segment -> Pivot(笔/段) -> Signal/Trend`。
//! 不保存任何跨调用状态，输入不足或异常时返回空结果而不报错。

use serde::Serialize;
use tracing::{debug, warn};

use crate::bar::{CBar, SBar};
use crate::cbar::merge_bars;
use crate::config::ChanConfig;
use crate::constant::{Level, Trend};
use crate::fractal::{Fractal, detect_fractals};
use crate::indicator::Macd;
use crate::pivot::{Pivot, build_pivots};
use crate::segment::{Segment, build_segments};
use crate::signal::{DivergenceSummary, Signal, SignalAnalyzer, trend};
use crate::stroke::{Stroke, StrokeBuilder};
use crate::utils::{finite_or_zero, nominal_interval};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChanAnalysis {
    cbars: Vec<CBar>,
    fractals: Vec<Fractal>,
    strokes: Vec<Stroke>,
    segments: Vec<Segment>,
    stroke_pivots: Vec<Pivot>,
    segment_pivots: Vec<Pivot>,
    pivots: Vec<Pivot>,
    signals: Vec<Signal>,
    divergence: DivergenceSummary,
    trend: Trend,
}

impl ChanAnalysis {
    /// 空结果：无结构、无信号，走势为盘整。
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cbars.is_empty()
    }

    pub fn cbars(&self) -> &[CBar] {
        &self.cbars
    }

    pub fn fractals(&self) -> &[Fractal] {
        &self.fractals
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Stroke and segment pivots together, ordered by start time.
    pub fn pivots(&self) -> &[Pivot] {
        &self.pivots
    }

    pub fn stroke_pivots(&self) -> &[Pivot] {
        &self.stroke_pivots
    }

    pub fn segment_pivots(&self) -> &[Pivot] {
        &self.segment_pivots
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn divergence(&self) -> &DivergenceSummary {
        &self.divergence
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChanAnalyzer {
    config: ChanConfig,
}

impl ChanAnalyzer {
    pub fn new(config: ChanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChanConfig {
        &self.config
    }

    /// Runs the full pipeline, computing the MACD histogram from closes.
    pub fn analyze(&self, sbars: &[SBar]) -> ChanAnalysis {
        if !self.accepts(sbars) {
            return ChanAnalysis::empty();
        }
        let histogram = Macd::histogram(
            self.config.macd_fast,
            self.config.macd_slow,
            self.config.macd_signal,
            sbars,
        );
        self.run(sbars, histogram)
    }

    /// Runs the full pipeline with an externally supplied histogram keyed by bar index.
    pub fn analyze_with_histogram(&self, sbars: &[SBar], histogram: &[f64]) -> ChanAnalysis {
        if !self.accepts(sbars) {
            return ChanAnalysis::empty();
        }
        if histogram.len() != sbars.len() {
            warn!(
                bars = sbars.len(),
                histogram = histogram.len(),
                "histogram length mismatch, padding with zeros"
            );
        }
        let mut histogram: Vec<f64> = histogram.iter().map(|x| finite_or_zero(*x)).collect();
        histogram.resize(sbars.len(), 0.0);
        self.run(sbars, histogram)
    }

    fn accepts(&self, sbars: &[SBar]) -> bool {
        if sbars.len() < self.config.min_bars {
            debug!(bars = sbars.len(), min = self.config.min_bars, "not enough bars");
            return false;
        }
        if let Some(pos) = sbars.iter().position(|x| !x.is_finite()) {
            warn!(index = pos, "non-finite bar price, skipping analysis");
            return false;
        }
        true
    }

    fn run(&self, sbars: &[SBar], histogram: Vec<f64>) -> ChanAnalysis {
        let cbars = merge_bars(sbars);
        let fractals = detect_fractals(sbars, &cbars);
        let strokes = StrokeBuilder::new(self.config.stroke_mode, self.config.stroke_bar_count)
            .build(&fractals);
        let segments = build_segments(&strokes);
        let stroke_pivots = build_pivots(&strokes, Level::Stroke);
        let segment_pivots = build_pivots(&segments, Level::Segment);

        let analyzer = SignalAnalyzer {
            stroke_ratio: self.config.stroke_divergence_ratio,
            segment_ratio: self.config.segment_divergence_ratio,
            window_bars: self.config.divergence_window_bars,
        };
        let mut signals = analyzer.signals(&strokes, &stroke_pivots, &histogram, Level::Stroke);
        signals.extend(analyzer.signals(&segments, &segment_pivots, &histogram, Level::Segment));
        signals.sort_by_key(|x| x.datetime);

        let interval = self
            .config
            .timeframe
            .map(|x| x.duration())
            .or_else(|| nominal_interval(sbars));
        let divergence = match sbars.last() {
            Some(last) => analyzer.divergence(&signals, last.datetime, interval),
            None => DivergenceSummary::default(),
        };
        let trend = trend(&strokes, &stroke_pivots, &segment_pivots);

        let mut pivots: Vec<Pivot> = stroke_pivots
            .iter()
            .chain(segment_pivots.iter())
            .cloned()
            .collect();
        pivots.sort_by_key(|x| x.start_datetime);

        debug!(
            bars = sbars.len(),
            cbars = cbars.len(),
            fractals = fractals.len(),
            strokes = strokes.len(),
            segments = segments.len(),
            pivots = pivots.len(),
            signals = signals.len(),
            trend = trend.as_str(),
            "structure analysis finished"
        );

        ChanAnalysis {
            cbars,
            fractals,
            strokes,
            segments,
            stroke_pivots,
            segment_pivots,
            pivots,
            signals,
            divergence,
            trend,
        }
    }
}
