//! 结构导出为 polars `DataFrame`，时间统一为毫秒时间戳。

use polars::df;
use polars::prelude::DataFrame;

use crate::bar::CBar;
use crate::constant::{DataError, FractalType};
use crate::engine::ChanAnalysis;
use crate::fractal::Fractal;
use crate::pivot::Pivot;
use crate::segment::Segment;
use crate::signal::Signal;
use crate::stroke::Stroke;

#[derive(Debug, Clone)]
pub struct AnalysisFrames {
    pub cbars: DataFrame,
    pub fractals: DataFrame,
    pub strokes: DataFrame,
    pub segments: DataFrame,
    pub pivots: DataFrame,
    pub signals: DataFrame,
}

impl ChanAnalysis {
    pub fn to_frames(&self) -> Result<AnalysisFrames, DataError> {
        Ok(AnalysisFrames {
            cbars: cbars_frame(self.cbars())?,
            fractals: fractals_frame(self.fractals())?,
            strokes: strokes_frame(self.strokes())?,
            segments: segments_frame(self.segments())?,
            pivots: pivots_frame(self.pivots())?,
            signals: signals_frame(self.signals())?,
        })
    }
}

fn fractal_sign(fractal_type: FractalType) -> i32 {
    match fractal_type {
        FractalType::Top => 1,
        FractalType::Bottom => -1,
    }
}

pub fn cbars_frame(rows: &[CBar]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "index" => rows.iter().map(|x| x.index as u64).collect::<Vec<_>>(),
        "sbar_start_index" => rows.iter().map(|x| x.sbar_start_index as u64).collect::<Vec<_>>(),
        "sbar_end_index" => rows.iter().map(|x| x.sbar_end_index as u64).collect::<Vec<_>>(),
        "high_price" => rows.iter().map(|x| x.high_price).collect::<Vec<_>>(),
        "low_price" => rows.iter().map(|x| x.low_price).collect::<Vec<_>>(),
        "start_datetime" => rows.iter().map(|x| x.start_datetime.timestamp_millis()).collect::<Vec<_>>(),
        "end_datetime" => rows.iter().map(|x| x.end_datetime.timestamp_millis()).collect::<Vec<_>>()
    )?;
    Ok(frame)
}

pub fn fractals_frame(rows: &[Fractal]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "index" => rows.iter().map(|x| x.index as u64).collect::<Vec<_>>(),
        "cbar_index" => rows.iter().map(|x| x.cbar_index as u64).collect::<Vec<_>>(),
        "price" => rows.iter().map(|x| x.price).collect::<Vec<_>>(),
        "fractal_type" => rows.iter().map(|x| fractal_sign(x.fractal_type)).collect::<Vec<_>>(),
        "datetime" => rows.iter().map(|x| x.datetime.timestamp_millis()).collect::<Vec<_>>()
    )?;
    Ok(frame)
}

pub fn strokes_frame(rows: &[Stroke]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "direction" => rows.iter().map(|x| x.direction.sign()).collect::<Vec<_>>(),
        "start_index" => rows.iter().map(|x| x.start.index as u64).collect::<Vec<_>>(),
        "end_index" => rows.iter().map(|x| x.end.index as u64).collect::<Vec<_>>(),
        "start_price" => rows.iter().map(|x| x.start.price).collect::<Vec<_>>(),
        "end_price" => rows.iter().map(|x| x.end.price).collect::<Vec<_>>(),
        "start_datetime" => rows.iter().map(|x| x.start.datetime.timestamp_millis()).collect::<Vec<_>>(),
        "end_datetime" => rows.iter().map(|x| x.end.datetime.timestamp_millis()).collect::<Vec<_>>()
    )?;
    Ok(frame)
}

pub fn segments_frame(rows: &[Segment]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "direction" => rows.iter().map(|x| x.direction.sign()).collect::<Vec<_>>(),
        "stroke_start_index" => rows.iter().map(|x| x.stroke_start_index as u64).collect::<Vec<_>>(),
        "stroke_end_index" => rows.iter().map(|x| x.stroke_end_index as u64).collect::<Vec<_>>(),
        "start_price" => rows.iter().map(|x| x.start.price).collect::<Vec<_>>(),
        "end_price" => rows.iter().map(|x| x.end.price).collect::<Vec<_>>(),
        "start_datetime" => rows.iter().map(|x| x.start.datetime.timestamp_millis()).collect::<Vec<_>>(),
        "end_datetime" => rows.iter().map(|x| x.end.datetime.timestamp_millis()).collect::<Vec<_>>(),
        "is_completed" => rows.iter().map(|x| x.is_completed).collect::<Vec<_>>()
    )?;
    Ok(frame)
}

pub fn pivots_frame(rows: &[Pivot]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "level" => rows.iter().map(|x| x.level.as_str()).collect::<Vec<_>>(),
        "zg" => rows.iter().map(|x| x.zg).collect::<Vec<_>>(),
        "zd" => rows.iter().map(|x| x.zd).collect::<Vec<_>>(),
        "gg" => rows.iter().map(|x| x.gg).collect::<Vec<_>>(),
        "dd" => rows.iter().map(|x| x.dd).collect::<Vec<_>>(),
        "start_index" => rows.iter().map(|x| x.start_index as u64).collect::<Vec<_>>(),
        "end_index" => rows.iter().map(|x| x.end_index as u64).collect::<Vec<_>>(),
        "start_datetime" => rows.iter().map(|x| x.start_datetime.timestamp_millis()).collect::<Vec<_>>(),
        "end_datetime" => rows.iter().map(|x| x.end_datetime.timestamp_millis()).collect::<Vec<_>>()
    )?;
    Ok(frame)
}

pub fn signals_frame(rows: &[Signal]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "kind" => rows.iter().map(|x| x.kind.as_str()).collect::<Vec<_>>(),
        "level" => rows.iter().map(|x| x.level.as_str()).collect::<Vec<_>>(),
        "datetime" => rows.iter().map(|x| x.datetime.timestamp_millis()).collect::<Vec<_>>(),
        "price" => rows.iter().map(|x| x.price).collect::<Vec<_>>(),
        "sbar_index" => rows.iter().map(|x| x.sbar_index as u64).collect::<Vec<_>>()
    )?;
    Ok(frame)
}
