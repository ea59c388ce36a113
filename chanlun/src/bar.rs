use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constant::Direction;

/// 原始 K 线（standard bar）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SBar {
    pub datetime: DateTime<Utc>,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

impl SBar {
    pub fn new(
        datetime: DateTime<Utc>,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Self {
            datetime,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
        }
    }

    pub fn range(&self) -> PriceRange {
        PriceRange::new(self.high_price, self.low_price)
    }

    pub fn is_finite(&self) -> bool {
        self.high_price.is_finite() && self.low_price.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub high: f64,
    pub low: f64,
}

impl PriceRange {
    /// Builds a range from two prices in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            high: a.max(b),
            low: a.min(b),
        }
    }

    /// One range lies inside the other (edges inclusive).
    pub fn contains_or_within(&self, other: &Self) -> bool {
        (self.high >= other.high && self.low <= other.low)
            || (self.high <= other.high && self.low >= other.low)
    }

    /// `next` makes a strictly higher high and a strictly lower low than `self`.
    pub fn is_outside(&self, next: &Self) -> bool {
        next.high > self.high && next.low < self.low
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.low.max(other.low) <= self.high.min(other.high)
    }

    pub fn moves(&self, next: &Self) -> Direction {
        if next.high > self.high && next.low > self.low {
            Direction::Up
        } else if next.high < self.high && next.low < self.low {
            Direction::Down
        } else {
            Direction::None
        }
    }
}

/// K 线包含关系：一方区间被另一方覆盖。
///
/// 严格外包（更高的高点且更低的低点）不算包含，由调用方另起一根合并 K 线。
pub fn is_inclusive(prev: &PriceRange, next: &PriceRange) -> bool {
    prev.contains_or_within(next) && !prev.is_outside(next)
}

/// 包含处理：向上取高高，向下取低低。`Direction::None` 按向上处理。
pub fn merge_range(a: PriceRange, b: PriceRange, direction: Direction) -> PriceRange {
    match direction {
        Direction::Down => PriceRange {
            high: a.high.min(b.high),
            low: a.low.min(b.low),
        },
        Direction::Up | Direction::None => PriceRange {
            high: a.high.max(b.high),
            low: a.low.max(b.low),
        },
    }
}

/// 合并 K 线（combined bar）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CBar {
    pub index: usize,
    pub sbar_start_index: usize,
    pub sbar_end_index: usize,
    pub high_price: f64,
    pub low_price: f64,
    /// Source bar that supplied `high_price`.
    pub high_index: usize,
    /// Source bar that supplied `low_price`.
    pub low_index: usize,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
}

impl CBar {
    pub fn range(&self) -> PriceRange {
        PriceRange {
            high: self.high_price,
            low: self.low_price,
        }
    }

    pub fn is_inclusive(&self, other: &Self) -> bool {
        is_inclusive(&self.range(), &other.range())
    }

    pub fn span(&self) -> usize {
        self.sbar_end_index - self.sbar_start_index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_range_keeps_stronger_side() {
        let a = PriceRange::new(10.0, 5.0);
        let b = PriceRange::new(9.0, 6.0);

        let up = merge_range(a, b, Direction::Up);
        assert_eq!(up, PriceRange { high: 10.0, low: 6.0 });

        let down = merge_range(a, b, Direction::Down);
        assert_eq!(down, PriceRange { high: 9.0, low: 5.0 });

        assert_eq!(merge_range(a, b, Direction::None), up);
    }

    #[test]
    fn strict_outside_bar_is_not_inclusive() {
        let prev = PriceRange::new(10.0, 5.0);
        assert!(is_inclusive(&prev, &PriceRange::new(9.0, 6.0)));
        assert!(is_inclusive(&prev, &PriceRange::new(11.0, 5.0)));
        assert!(!is_inclusive(&prev, &PriceRange::new(11.0, 4.0)));
        assert!(!is_inclusive(&prev, &PriceRange::new(11.0, 6.0)));
    }
}
