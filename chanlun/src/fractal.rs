use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bar::{CBar, SBar};
use crate::constant::FractalType;

/// 分型点：价格与时间取自极值所在的原始 K 线。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fractal {
    /// Index into the source `SBar` list.
    pub index: usize,
    pub cbar_index: usize,
    pub price: f64,
    pub fractal_type: FractalType,
    pub datetime: DateTime<Utc>,
}

impl Fractal {
    /// Strict three-bar rule over merged bars; ties never qualify.
    pub fn verify(left: &CBar, middle: &CBar, right: &CBar) -> Option<FractalType> {
        if middle.high_price > left.high_price && middle.high_price > right.high_price {
            return Some(FractalType::Top);
        }
        if middle.low_price < left.low_price && middle.low_price < right.low_price {
            return Some(FractalType::Bottom);
        }
        None
    }

    /// `true` when `self` is a more extreme point of the same kind than `other`.
    pub fn exceeds(&self, other: &Fractal) -> bool {
        match self.fractal_type {
            FractalType::Top => self.price > other.price,
            FractalType::Bottom => self.price < other.price,
        }
    }
}

pub fn detect_fractals(sbars: &[SBar], cbars: &[CBar]) -> Vec<Fractal> {
    cbars
        .windows(3)
        .filter_map(|w| {
            let (left, middle, right) = (&w[0], &w[1], &w[2]);
            let fractal_type = Fractal::verify(left, middle, right)?;
            let (index, price) = match fractal_type {
                FractalType::Top => (middle.high_index, middle.high_price),
                FractalType::Bottom => (middle.low_index, middle.low_price),
            };
            let datetime = sbars
                .get(index)
                .map(|x| x.datetime)
                .unwrap_or(middle.end_datetime);
            Some(Fractal {
                index,
                cbar_index: middle.index,
                price,
                fractal_type,
                datetime,
            })
        })
        .collect()
}
