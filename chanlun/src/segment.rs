//! 线段划分。
//!
//! 对笔序列做特征序列破坏判定：
//! - 候选极值：与线段同向、终点创出新高（向上段）或新低（向下段）的笔；
//! - 特征序列：候选之后的反向笔，相邻元素存在包含关系时按反方向规则合并，并顺延到下一元素；
//! - 破坏成立：特征元素反向移动，且两元素之间的同向笔未能越过候选极值；
//! - 成立后候选笔为本段最后一笔，下一笔开始新线段，方向取该笔方向
//!   （笔连续时即为反向，存在断口时可与上一段同向）；未找到破坏则本段延续到末尾。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bar::{PriceRange, merge_range};
use crate::constant::Direction;
use crate::fractal::Fractal;
use crate::pivot::Swing;
use crate::stroke::Stroke;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub direction: Direction,
    pub stroke_start_index: usize,
    /// Last owned stroke (inclusive).
    pub stroke_end_index: usize,
    pub start: Fractal,
    pub end: Fractal,
    /// `false` for the trailing segment that no destruction has closed yet.
    pub is_completed: bool,
}

impl Segment {
    pub fn stroke_count(&self) -> usize {
        self.stroke_end_index - self.stroke_start_index + 1
    }

    pub fn strokes<'a>(&self, all: &'a [Stroke]) -> &'a [Stroke] {
        all.get(self.stroke_start_index..=self.stroke_end_index)
            .unwrap_or(&[])
    }
}

impl Swing for Segment {
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

pub fn build_segments(strokes: &[Stroke]) -> Vec<Segment> {
    let mut rows = Vec::new();
    if strokes.len() < 3 {
        return rows;
    }

    let last = strokes.len() - 1;
    let mut start = 0;
    let mut direction = strokes[0].direction;
    while start <= last {
        match find_end(strokes, start, direction) {
            Some(end) => {
                rows.push(make_segment(strokes, start, end, direction, true));
                start = end + 1;
                // 笔序列有断口时，下一段方向取其首笔方向
                direction = match strokes.get(start) {
                    Some(x) => x.direction,
                    None => direction.opposite(),
                };
            }
            None => {
                rows.push(make_segment(strokes, start, last, direction, false));
                break;
            }
        }
    }
    rows
}

fn make_segment(
    strokes: &[Stroke],
    start: usize,
    end: usize,
    direction: Direction,
    is_completed: bool,
) -> Segment {
    Segment {
        direction,
        stroke_start_index: start,
        stroke_end_index: end,
        start: strokes[start].start.clone(),
        end: strokes[end].end.clone(),
        is_completed,
    }
}

/// `price` lies strictly beyond `reference` in `direction`.
fn beyond(price: f64, reference: f64, direction: Direction) -> bool {
    match direction {
        Direction::Up => price > reference,
        Direction::Down => price < reference,
        Direction::None => false,
    }
}

/// Index of the stroke that closes the segment starting at `start`.
fn find_end(strokes: &[Stroke], start: usize, direction: Direction) -> Option<usize> {
    let mut extreme: Option<f64> = None;
    for (candidate, stroke) in strokes.iter().enumerate().skip(start) {
        if stroke.direction != direction {
            continue;
        }
        let price = stroke.end.price;
        if extreme.is_some_and(|x| !beyond(price, x, direction)) {
            continue;
        }
        extreme = Some(price);
        if is_destroyed(strokes, candidate, direction) {
            return Some(candidate);
        }
    }
    None
}

fn is_destroyed(strokes: &[Stroke], candidate: usize, direction: Direction) -> bool {
    let peak = strokes[candidate].end.price;
    let mut feature: Option<PriceRange> = None;
    let mut rebound: Option<f64> = None;

    for stroke in &strokes[candidate + 1..] {
        if stroke.direction == direction {
            if beyond(stroke.end.price, peak, direction) {
                // 新极值出现，由下一个候选接手
                return false;
            }
            rebound = Some(stroke.end.price);
            continue;
        }

        let range = stroke.range();
        let Some(prev) = feature else {
            feature = Some(range);
            rebound = None;
            continue;
        };

        if prev.contains_or_within(&range) {
            feature = Some(merge_range(prev, range, direction.opposite()));
            continue;
        }

        let reversed = prev.moves(&range) == direction.opposite();
        let retraced = rebound.is_some_and(|x| beyond(peak, x, direction));
        if reversed && retraced {
            return true;
        }
        feature = Some(range);
        rebound = None;
    }
    false
}
