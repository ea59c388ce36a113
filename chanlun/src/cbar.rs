//! K 线包含处理。
//!
//! 以显式累加器做左折叠：
//! - 累加器保存当前方向与已生成的 CBar；
//! - 新 SBar 与末尾 CBar 存在包含关系时按方向合并，并持续向前合并直到无包含；
//! - 严格外包 K 线视为非包含，另起一根且不改变方向。

use crate::bar::{CBar, PriceRange, SBar, is_inclusive, merge_range};
use crate::constant::Direction;
use crate::utils::approx_eq_f64;

#[derive(Debug, Default)]
struct MergeState {
    direction: Direction,
    rows: Vec<CBar>,
}

impl MergeState {
    fn push(mut self, index: usize, sbar: &SBar) -> Self {
        let range = sbar.range();
        let mut current = CBar {
            index: 0,
            sbar_start_index: index,
            sbar_end_index: index,
            high_price: range.high,
            low_price: range.low,
            high_index: index,
            low_index: index,
            start_datetime: sbar.datetime,
            end_datetime: sbar.datetime,
        };

        while let Some(last) = self.rows.last() {
            if !is_inclusive(&last.range(), &current.range()) {
                break;
            }
            if let Some(last) = self.rows.pop() {
                current = combine(last, current, self.direction);
            }
        }

        if let Some(prev) = self.rows.last() {
            match prev.range().moves(&current.range()) {
                Direction::None => {}
                moved => self.direction = moved,
            }
        }

        current.index = self.rows.len();
        self.rows.push(current);
        self
    }
}

fn combine(earlier: CBar, later: CBar, direction: Direction) -> CBar {
    let merged: PriceRange = merge_range(earlier.range(), later.range(), direction);
    // 相等时保留较早的极值 K 线
    let high_index = if approx_eq_f64(earlier.high_price, merged.high) {
        earlier.high_index
    } else {
        later.high_index
    };
    let low_index = if approx_eq_f64(earlier.low_price, merged.low) {
        earlier.low_index
    } else {
        later.low_index
    };

    CBar {
        index: earlier.index,
        sbar_start_index: earlier.sbar_start_index,
        sbar_end_index: later.sbar_end_index,
        high_price: merged.high,
        low_price: merged.low,
        high_index,
        low_index,
        start_datetime: earlier.start_datetime,
        end_datetime: later.end_datetime,
    }
}

/// Merges contained bars until no two adjacent `CBar`s are inclusive.
pub fn merge_bars(sbars: &[SBar]) -> Vec<CBar> {
    sbars
        .iter()
        .enumerate()
        .fold(MergeState::default(), |state, (index, sbar)| {
            state.push(index, sbar)
        })
        .rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn mk_sbar(i: i64, high: f64, low: f64) -> SBar {
        let dt = Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap() + Duration::minutes(15 * i);
        SBar::new(dt, (high + low) / 2.0, high, low, (high + low) / 2.0, 0.0)
    }

    #[test]
    fn test_multiple_inclusive_merge() {
        // s1 包含 s2，随后 s3 与合并结果共享高点 -> 只剩一根 cbar
        let sbars = vec![mk_sbar(0, 10.0, 1.0), mk_sbar(1, 9.0, 2.0), mk_sbar(2, 10.0, 0.0)];

        let cbars = merge_bars(&sbars);
        assert_eq!(cbars.len(), 1);
        let c = &cbars[0];
        assert_eq!(c.sbar_start_index, 0);
        assert_eq!(c.sbar_end_index, 2);
        // 初始方向未知，按向上处理：高高、低高
        assert_eq!(c.high_price, 10.0);
        assert_eq!(c.low_price, 2.0);
        assert_eq!(c.high_index, 0);
        assert_eq!(c.low_index, 1);
    }

    #[test]
    fn merge_follows_down_direction() {
        let sbars = vec![
            mk_sbar(0, 12.0, 10.0),
            mk_sbar(1, 11.0, 9.0),
            mk_sbar(2, 10.8, 9.2),
        ];

        let cbars = merge_bars(&sbars);
        assert_eq!(cbars.len(), 2);
        assert_eq!(cbars[1].high_price, 10.8);
        assert_eq!(cbars[1].low_price, 9.0);
        assert_eq!(cbars[1].high_index, 2);
        assert_eq!(cbars[1].low_index, 1);
        assert_eq!(cbars[1].index, 1);
    }

    #[test]
    fn outside_bar_starts_new_cbar() {
        let sbars = vec![
            mk_sbar(0, 10.0, 8.0),
            mk_sbar(1, 11.0, 9.0),
            mk_sbar(2, 12.0, 7.0),
        ];

        let cbars = merge_bars(&sbars);
        assert_eq!(cbars.len(), 3);
        assert!(!cbars[1].is_inclusive(&cbars[2]));
    }
}
