//! 笔的构建。
//!
//! 1. 同类分型只保留更极端者，保证顶底交替；
//! 2. 相邻顶底按笔模式检查中间合并 K 线数量；
//! 3. 合格的笔按顺序串联，不合格处保留断口，不做桥接。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constant::{Direction, FractalType, StrokeMode};
use crate::fractal::Fractal;
use crate::pivot::Swing;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub start: Fractal,
    pub end: Fractal,
    pub direction: Direction,
}

impl Stroke {
    /// Merged bars strictly between the two fractals.
    pub fn cbar_gap(&self) -> usize {
        gap_between(&self.start, &self.end)
    }

    /// `true` when this stroke ends where `next` starts.
    pub fn connects(&self, next: &Stroke) -> bool {
        self.end.index == next.start.index && self.end.fractal_type == next.start.fractal_type
    }
}

impl Swing for Stroke {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn start_price(&self) -> f64 {
        self.start.price
    }

    fn end_price(&self) -> f64 {
        self.end.price
    }

    fn start_datetime(&self) -> DateTime<Utc> {
        self.start.datetime
    }

    fn end_datetime(&self) -> DateTime<Utc> {
        self.end.datetime
    }

    fn sbar_start_index(&self) -> usize {
        self.start.index
    }

    fn sbar_end_index(&self) -> usize {
        self.end.index
    }
}

fn gap_between(start: &Fractal, end: &Fractal) -> usize {
    end.cbar_index.saturating_sub(start.cbar_index).saturating_sub(1)
}

#[derive(Debug, Clone, Copy)]
pub struct StrokeBuilder {
    mode: StrokeMode,
    bar_count: usize,
}

impl Default for StrokeBuilder {
    fn default() -> Self {
        Self::new(StrokeMode::default(), 5)
    }
}

impl StrokeBuilder {
    pub fn new(mode: StrokeMode, bar_count: usize) -> Self {
        Self { mode, bar_count }
    }

    /// 同类相邻分型只保留更高的顶或更低的底，相等时保留先出现者。
    pub fn alternate(&self, fractals: &[Fractal]) -> Vec<Fractal> {
        let mut rows: Vec<Fractal> = Vec::with_capacity(fractals.len());
        for fractal in fractals {
            match rows.last_mut() {
                Some(last) if last.fractal_type == fractal.fractal_type => {
                    if fractal.exceeds(last) {
                        *last = fractal.clone();
                    }
                }
                _ => rows.push(fractal.clone()),
            }
        }
        rows
    }

    pub fn is_valid(&self, start: &Fractal, end: &Fractal) -> bool {
        gap_between(start, end) >= self.mode.min_gap(self.bar_count)
    }

    pub fn build(&self, fractals: &[Fractal]) -> Vec<Stroke> {
        let points = self.alternate(fractals);
        if points.len() < 2 {
            return Vec::new();
        }

        points
            .windows(2)
            .filter(|pair| self.is_valid(&pair[0], &pair[1]))
            .map(|pair| {
                let direction = match pair[0].fractal_type {
                    FractalType::Bottom => Direction::Up,
                    FractalType::Top => Direction::Down,
                };
                Stroke {
                    start: pair[0].clone(),
                    end: pair[1].clone(),
                    direction,
                }
            })
            .collect()
    }
}
