//! 中枢识别。
//!
//! 笔与线段共用同一套逻辑，通过 `Swing` trait 抽象起止价格与方向：
//! - 进入段之后的三段重叠构成中枢核心 `[zd, zg]`；
//! - 后续与核心区间仍有重叠的段被吸收，更新 `gg`/`dd`；
//! - 最后一段视为离开段，不并入中枢；
//! - 一个中枢结束后从其吸收范围之后继续扫描。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bar::PriceRange;
use crate::constant::{Direction, Level};

/// Directional move between two prices, shared by strokes and segments.
pub trait Swing {
    fn direction(&self) -> Direction;
    fn start_price(&self) -> f64;
    fn end_price(&self) -> f64;
    fn start_datetime(&self) -> DateTime<Utc>;
    fn end_datetime(&self) -> DateTime<Utc>;
    fn sbar_start_index(&self) -> usize;
    fn sbar_end_index(&self) -> usize;

    fn high_price(&self) -> f64 {
        self.start_price().max(self.end_price())
    }

    fn low_price(&self) -> f64 {
        self.start_price().min(self.end_price())
    }

    fn range(&self) -> PriceRange {
        PriceRange::new(self.start_price(), self.end_price())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pivot {
    pub level: Level,
    pub zg: f64,
    pub zd: f64,
    pub gg: f64,
    pub dd: f64,
    /// First swing of the pivot, as an index into its level's swing list.
    pub start_index: usize,
    /// Last absorbed swing (inclusive).
    pub end_index: usize,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub sbar_start_index: usize,
    pub sbar_end_index: usize,
}

impl Pivot {
    pub fn swing_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn band(&self) -> PriceRange {
        PriceRange {
            high: self.zg,
            low: self.zd,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.zg > self.zd && self.gg >= self.zg && self.dd <= self.zd
    }
}

pub fn build_pivots<S: Swing>(swings: &[S], level: Level) -> Vec<Pivot> {
    let mut rows = Vec::new();
    if swings.len() < 3 {
        return rows;
    }
    // 首段为进入段，末段为离开段
    let last = swings.len() - 1;

    let mut i = 1;
    while i + 2 < last {
        let (a, b, c) = (&swings[i], &swings[i + 1], &swings[i + 2]);
        if a.direction() == b.direction() {
            i += 1;
            continue;
        }

        let zg = a.high_price().min(b.high_price()).min(c.high_price());
        let zd = a.low_price().max(b.low_price()).max(c.low_price());
        if !(zg > zd) {
            i += 1;
            continue;
        }

        let band = PriceRange { high: zg, low: zd };
        let mut gg = a.high_price().max(b.high_price()).max(c.high_price());
        let mut dd = a.low_price().min(b.low_price()).min(c.low_price());
        let mut end = i + 2;
        while end + 1 < last {
            let next = &swings[end + 1];
            if !next.range().overlaps(&band) {
                break;
            }
            gg = gg.max(next.high_price());
            dd = dd.min(next.low_price());
            end += 1;
        }

        rows.push(Pivot {
            level,
            zg,
            zd,
            gg,
            dd,
            start_index: i,
            end_index: end,
            start_datetime: swings[i].start_datetime(),
            end_datetime: swings[end].end_datetime(),
            sbar_start_index: swings[i].sbar_start_index(),
            sbar_end_index: swings[end].sbar_end_index(),
        });
        i = end + 1;
    }
    rows
}
