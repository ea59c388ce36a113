//! 结构回放导出：把一次分析结果整理成前端绘图用的 JSON 载荷。
//!
//! 时间统一为秒级时间戳，方向与分型类型输出为字符串。

use chanlun::{
    CBar, ChanAnalysis, Direction, Fractal, FractalType, Pivot, SBar, Segment, Signal, Stroke,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ExportPayload {
    pub candles: Vec<CandlePoint>,
    pub cbar_candles: Vec<CBarCandlePoint>,
    pub fractals: Vec<FractalMarker>,
    pub strokes: Vec<AnchoredSegment>,
    pub segments: Vec<AnchoredSegment>,
    pub pivots: Vec<PivotBox>,
    pub signals: Vec<SignalMarker>,
    pub trend: String,
    pub divergence_active: bool,
}

#[derive(Debug, Serialize)]
pub struct CandlePoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Serialize)]
pub struct CBarCandlePoint {
    pub id: u64,
    pub t0: i64,
    pub t1: i64,
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Serialize)]
pub struct FractalMarker {
    pub time: i64,
    pub price: f64,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct AnchoredSegment {
    pub id: u64,
    pub direction: String,
    pub start_kind: String,
    pub end_kind: String,
    pub t0: i64,
    pub t1: i64,
    pub v0: f64,
    pub v1: f64,
    pub is_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct PivotBox {
    pub level: String,
    pub t0: i64,
    pub t1: i64,
    pub upper: f64,
    pub lower: f64,
    pub gg: f64,
    pub dd: f64,
}

#[derive(Debug, Serialize)]
pub struct SignalMarker {
    pub kind: String,
    pub level: String,
    pub time: i64,
    pub price: f64,
}

pub fn build_payload(sbars: &[SBar], analysis: &ChanAnalysis) -> ExportPayload {
    let candles = sbars
        .iter()
        .map(|bar| CandlePoint {
            time: bar.datetime.timestamp(),
            open: bar.open_price,
            high: bar.high_price,
            low: bar.low_price,
            close: bar.close_price,
        })
        .collect();

    let strokes = analysis
        .strokes()
        .iter()
        .enumerate()
        .map(|(id, x)| stroke_segment(id, x))
        .collect();
    let segments = analysis
        .segments()
        .iter()
        .enumerate()
        .map(|(id, x)| segment_line(id, x))
        .collect();

    ExportPayload {
        candles,
        cbar_candles: analysis.cbars().iter().map(cbar_candle).collect(),
        fractals: analysis.fractals().iter().map(fractal_marker).collect(),
        strokes,
        segments,
        pivots: analysis.pivots().iter().map(pivot_box).collect(),
        signals: analysis.signals().iter().map(signal_marker).collect(),
        trend: analysis.trend().as_str().to_string(),
        divergence_active: analysis.divergence().active,
    }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "Up",
        Direction::Down => "Down",
        Direction::None => "None",
    }
}

fn fractal_type_label(fractal_type: FractalType) -> &'static str {
    match fractal_type {
        FractalType::Top => "Top",
        FractalType::Bottom => "Bottom",
    }
}

fn cbar_candle(cbar: &CBar) -> CBarCandlePoint {
    CBarCandlePoint {
        id: cbar.index as u64,
        t0: cbar.start_datetime.timestamp(),
        t1: cbar.end_datetime.timestamp(),
        high: cbar.high_price,
        low: cbar.low_price,
    }
}

fn fractal_marker(fractal: &Fractal) -> FractalMarker {
    FractalMarker {
        time: fractal.datetime.timestamp(),
        price: fractal.price,
        kind: fractal_type_label(fractal.fractal_type).to_string(),
    }
}

fn anchored(
    id: usize,
    direction: Direction,
    start: &Fractal,
    end: &Fractal,
    is_completed: bool,
) -> AnchoredSegment {
    AnchoredSegment {
        id: id as u64,
        direction: direction_label(direction).to_string(),
        start_kind: fractal_type_label(start.fractal_type).to_string(),
        end_kind: fractal_type_label(end.fractal_type).to_string(),
        t0: start.datetime.timestamp(),
        t1: end.datetime.timestamp(),
        v0: start.price,
        v1: end.price,
        is_completed,
    }
}

fn stroke_segment(id: usize, stroke: &Stroke) -> AnchoredSegment {
    anchored(id, stroke.direction, &stroke.start, &stroke.end, true)
}

fn segment_line(id: usize, segment: &Segment) -> AnchoredSegment {
    anchored(
        id,
        segment.direction,
        &segment.start,
        &segment.end,
        segment.is_completed,
    )
}

fn pivot_box(pivot: &Pivot) -> PivotBox {
    PivotBox {
        level: pivot.level.as_str().to_string(),
        t0: pivot.start_datetime.timestamp(),
        t1: pivot.end_datetime.timestamp(),
        upper: pivot.zg,
        lower: pivot.zd,
        gg: pivot.gg,
        dd: pivot.dd,
    }
}

fn signal_marker(signal: &Signal) -> SignalMarker {
    SignalMarker {
        kind: signal.kind.as_str().to_string(),
        level: signal.level.as_str().to_string(),
        time: signal.datetime.timestamp(),
        price: signal.price,
    }
}
