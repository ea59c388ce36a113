//! 买卖点与走势判定。
//!
//! - 力度：段内 MACD 柱绝对值之和；
//! - 一类买卖点：同向相邻两段创新极值但力度衰减；
//! - 二类买卖点：一类点之后的同向段未能再创新极值；
//! - 三类买卖点：离开中枢后回抽不回到中枢区间；
//! - 走势：比较最近两个中枢的位置。

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::constant::{Const, Direction, Level, Trend};
use crate::pivot::{Pivot, Swing};
use crate::utils::finite_or_zero;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SignalKind {
    FirstBuy,
    FirstSell,
    SecondBuy,
    SecondSell,
    ThirdBuy,
    ThirdSell,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstBuy => "1B",
            Self::FirstSell => "1S",
            Self::SecondBuy => "2B",
            Self::SecondSell => "2S",
            Self::ThirdBuy => "3B",
            Self::ThirdSell => "3S",
        }
    }

    pub fn is_buy(self) -> bool {
        matches!(self, Self::FirstBuy | Self::SecondBuy | Self::ThirdBuy)
    }

    pub fn is_divergence(self) -> bool {
        matches!(self, Self::FirstBuy | Self::FirstSell)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub level: Level,
    pub datetime: DateTime<Utc>,
    pub price: f64,
    pub sbar_index: usize,
    /// Swing that emitted the signal, within its level's list.
    pub swing_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DivergenceSummary {
    pub active: bool,
    /// Latest `1B`/`1S`, active or not.
    pub signal: Option<Signal>,
}

/// Sum of absolute histogram values over the bars a swing covers.
pub fn swing_force<S: Swing>(swing: &S, histogram: &[f64]) -> f64 {
    let (a, b) = (swing.sbar_start_index(), swing.sbar_end_index());
    let (start, end) = (a.min(b), a.max(b));
    if start >= histogram.len() {
        return 0.0;
    }
    let end = end.min(histogram.len() - 1);
    histogram[start..=end]
        .iter()
        .map(|x| finite_or_zero(*x).abs())
        .sum()
}

#[derive(Debug, Clone, Copy)]
pub struct SignalAnalyzer {
    pub stroke_ratio: f64,
    pub segment_ratio: f64,
    pub window_bars: usize,
}

impl Default for SignalAnalyzer {
    fn default() -> Self {
        Self {
            stroke_ratio: Const::STROKE_DIVERGENCE_RATIO,
            segment_ratio: Const::SEGMENT_DIVERGENCE_RATIO,
            window_bars: Const::DIVERGENCE_WINDOW_BARS,
        }
    }
}

impl SignalAnalyzer {
    fn ratio(&self, level: Level) -> f64 {
        match level {
            Level::Stroke => self.stroke_ratio,
            Level::Segment => self.segment_ratio,
        }
    }

    /// 一类、二类、三类买卖点，按时间排序。
    pub fn signals<S: Swing>(
        &self,
        swings: &[S],
        pivots: &[Pivot],
        histogram: &[f64],
        level: Level,
    ) -> Vec<Signal> {
        let first = self.first_type(swings, histogram, level);
        let second = second_type(swings, &first, level);
        let third = third_type(swings, pivots, level);

        let mut rows: Vec<Signal> = first.into_iter().chain(second).chain(third).collect();
        rows.sort_by_key(|x| x.datetime);
        rows
    }

    pub fn first_type<S: Swing>(&self, swings: &[S], histogram: &[f64], level: Level) -> Vec<Signal> {
        let ratio = self.ratio(level);
        let forces: Vec<f64> = swings.iter().map(|x| swing_force(x, histogram)).collect();

        let mut rows = Vec::new();
        for i in 2..swings.len() {
            let (prev, curr) = (&swings[i - 2], &swings[i]);
            if prev.direction() != curr.direction() {
                continue;
            }
            if !(forces[i] < forces[i - 2] * ratio) {
                continue;
            }
            let kind = match curr.direction() {
                Direction::Up if curr.end_price() > prev.end_price() => SignalKind::FirstSell,
                Direction::Down if curr.end_price() < prev.end_price() => SignalKind::FirstBuy,
                _ => continue,
            };
            rows.push(signal_at(curr, kind, level, i));
        }
        rows
    }

    /// 最近一个一类点是否仍处于 `window_bars` 根 K 线的有效期内。
    pub fn divergence(
        &self,
        signals: &[Signal],
        latest: DateTime<Utc>,
        interval: Option<Duration>,
    ) -> DivergenceSummary {
        let Some(signal) = signals
            .iter()
            .filter(|x| x.kind.is_divergence())
            .max_by_key(|x| x.datetime)
        else {
            return DivergenceSummary::default();
        };

        // 窗口溢出时视为无限期
        let active = interval.is_some_and(|step| {
            let bars = i32::try_from(self.window_bars).unwrap_or(i32::MAX);
            step.checked_mul(bars).is_none_or(|window| latest - signal.datetime <= window)
        });
        DivergenceSummary {
            active,
            signal: Some(signal.clone()),
        }
    }
}

fn signal_at<S: Swing>(swing: &S, kind: SignalKind, level: Level, swing_index: usize) -> Signal {
    Signal {
        kind,
        level,
        datetime: swing.end_datetime(),
        price: swing.end_price(),
        sbar_index: swing.sbar_end_index(),
        swing_index,
    }
}

pub fn second_type<S: Swing>(swings: &[S], first: &[Signal], level: Level) -> Vec<Signal> {
    let mut rows = Vec::new();
    for origin in first {
        let i = origin.swing_index;
        let Some(next) = swings.get(i + 2) else {
            continue;
        };
        if next.direction() != swings[i].direction() {
            continue;
        }
        let kind = match origin.kind {
            SignalKind::FirstSell if next.end_price() < origin.price => SignalKind::SecondSell,
            SignalKind::FirstBuy if next.end_price() > origin.price => SignalKind::SecondBuy,
            _ => continue,
        };
        rows.push(signal_at(next, kind, level, i + 2));
    }
    rows
}

/// 离开段突破中枢边界、回抽段不回到 `[zd, zg]` 时给出三类点。
///
/// 离开段起点位于中枢内部，通常已被中枢吸收，因此中枢可结束于 `i - 1`；
/// 笔序列存在断口时也可能结束于 `i - 2`。
pub fn third_type<S: Swing>(swings: &[S], pivots: &[Pivot], level: Level) -> Vec<Signal> {
    let mut rows = Vec::new();
    for i in 2..swings.len() {
        let Some(pivot) = pivots
            .iter()
            .rev()
            .find(|x| x.end_index + 2 == i || x.end_index + 1 == i)
        else {
            continue;
        };
        let (breakout, retest) = (&swings[i - 1], &swings[i]);
        let kind = match (breakout.direction(), retest.direction()) {
            (Direction::Up, Direction::Down)
                if breakout.end_price() > pivot.zg && retest.low_price() > pivot.zg =>
            {
                SignalKind::ThirdBuy
            }
            (Direction::Down, Direction::Up)
                if breakout.end_price() < pivot.zd && retest.high_price() < pivot.zd =>
            {
                SignalKind::ThirdSell
            }
            _ => continue,
        };
        rows.push(signal_at(retest, kind, level, i));
    }
    rows
}

/// 优先使用线段中枢，其次笔中枢，都不足两个时取最后一笔的方向。
pub fn trend<S: Swing>(strokes: &[S], stroke_pivots: &[Pivot], segment_pivots: &[Pivot]) -> Trend {
    let pivots = if segment_pivots.len() >= 2 {
        segment_pivots
    } else if stroke_pivots.len() >= 2 {
        stroke_pivots
    } else {
        return match strokes.last().map(|x| x.direction()) {
            Some(Direction::Up) => Trend::Up,
            Some(Direction::Down) => Trend::Down,
            _ => Trend::Consolidation,
        };
    };

    let (previous, latest) = (&pivots[pivots.len() - 2], &pivots[pivots.len() - 1]);
    if latest.zd > previous.zg {
        Trend::Up
    } else if latest.zg < previous.zd {
        Trend::Down
    } else {
        Trend::Consolidation
    }
}
