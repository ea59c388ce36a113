use chanlun::signal::{second_type, third_type, trend};
use chanlun::{
    ChanAnalyzer, ChanConfig, Direction, Fractal, FractalType, Level, Pivot, SBar, SignalAnalyzer,
    SignalKind, Stroke, Trend, build_pivots, swing_force,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap()
}

fn bars_from_centers(centers: &[f64]) -> Vec<SBar> {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| {
            SBar::new(
                base() + Duration::minutes(15 * i as i64),
                *c,
                c + 1.0,
                c - 1.0,
                *c,
                100.0,
            )
        })
        .collect()
}

fn strokes_from(prices: &[f64]) -> Vec<Stroke> {
    let points: Vec<Fractal> = prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let is_low = match prices.get(i + 1) {
                Some(x) => *x > *price,
                None => prices[i - 1] > *price,
            };
            Fractal {
                index: i * 5,
                cbar_index: i * 5,
                price: *price,
                fractal_type: if is_low {
                    FractalType::Bottom
                } else {
                    FractalType::Top
                },
                datetime: base() + Duration::minutes(75 * i as i64),
            }
        })
        .collect();
    points
        .windows(2)
        .map(|w| Stroke {
            start: w[0].clone(),
            end: w[1].clone(),
            direction: if w[1].price > w[0].price {
                Direction::Up
            } else {
                Direction::Down
            },
        })
        .collect()
}

fn pivot(zd: f64, zg: f64) -> Pivot {
    Pivot {
        level: Level::Stroke,
        zg,
        zd,
        gg: zg + 1.0,
        dd: zd - 1.0,
        start_index: 1,
        end_index: 3,
        start_datetime: base(),
        end_datetime: base(),
        sbar_start_index: 0,
        sbar_end_index: 0,
    }
}

/// 上 - 下 - 上，第二个上笔创新高：bottom@2, top@7 (16), bottom@11, top@17 (18)。
const DOUBLE_TOP: [f64; 20] = [
    12.0, 11.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 14.0, 13.0, 12.0, 11.0, 12.0, 13.0, 14.0,
    15.0, 16.0, 17.0, 16.0, 15.0,
];

fn fading_histogram(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| match i {
            3..=7 => 1.0,
            12..=17 => 0.1,
            _ => 0.0,
        })
        .collect()
}

#[test]
fn weaker_higher_high_emits_first_sell() {
    let sbars = bars_from_centers(&DOUBLE_TOP);
    let analysis = ChanAnalyzer::default()
        .analyze_with_histogram(&sbars, &fading_histogram(sbars.len()));

    assert_eq!(analysis.strokes().len(), 3);
    assert_eq!(analysis.signals().len(), 1);
    let signal = &analysis.signals()[0];
    assert_eq!(signal.kind, SignalKind::FirstSell);
    assert_eq!(signal.level, Level::Stroke);
    assert_eq!(signal.sbar_index, 17);
    assert_eq!(signal.price, 18.0);
    assert_eq!(signal.datetime, sbars[17].datetime);

    assert!(analysis.divergence().active);
    assert_eq!(analysis.divergence().signal.as_ref(), Some(signal));
    assert_eq!(analysis.trend(), Trend::Up);
}

#[test]
fn stale_divergence_is_inactive() {
    let sbars = bars_from_centers(&DOUBLE_TOP);
    let config = ChanConfig {
        divergence_window_bars: 1,
        ..ChanConfig::default()
    };
    let analysis =
        ChanAnalyzer::new(config).analyze_with_histogram(&sbars, &fading_histogram(sbars.len()));

    assert_eq!(analysis.signals().len(), 1);
    assert!(!analysis.divergence().active);
    assert!(analysis.divergence().signal.is_some());
}

#[test]
fn divergence_without_interval_is_inactive() {
    let sbars = bars_from_centers(&DOUBLE_TOP);
    let analysis = ChanAnalyzer::default()
        .analyze_with_histogram(&sbars, &fading_histogram(sbars.len()));

    let summary = SignalAnalyzer::default().divergence(
        analysis.signals(),
        sbars[sbars.len() - 1].datetime,
        None,
    );
    assert!(!summary.active);
    assert_eq!(summary.signal.map(|x| x.kind), Some(SignalKind::FirstSell));
}

#[test]
fn oversized_window_stays_active_without_overflow() {
    let sbars = bars_from_centers(&DOUBLE_TOP);
    let analysis = ChanAnalyzer::default()
        .analyze_with_histogram(&sbars, &fading_histogram(sbars.len()));

    let analyzer = SignalAnalyzer {
        window_bars: usize::MAX,
        ..SignalAnalyzer::default()
    };
    let summary = analyzer.divergence(
        analysis.signals(),
        sbars[sbars.len() - 1].datetime,
        Some(Duration::days(365 * 50)),
    );
    assert!(summary.active);
    assert_eq!(summary.signal.map(|x| x.kind), Some(SignalKind::FirstSell));
}

#[test]
fn zero_force_emits_no_divergence() {
    let sbars = bars_from_centers(&DOUBLE_TOP);
    let analysis = ChanAnalyzer::default().analyze_with_histogram(&sbars, &vec![0.0; sbars.len()]);

    assert!(analysis.signals().is_empty());
    assert!(!analysis.divergence().active);
    assert!(analysis.divergence().signal.is_none());
}

#[test]
fn swing_force_ignores_non_finite_values() {
    let strokes = strokes_from(&[0.0, 10.0]);
    let mut histogram = vec![1.0; 6];
    histogram[2] = f64::NAN;
    histogram[3] = -f64::INFINITY;
    histogram[4] = -2.0;

    let force = swing_force(&strokes[0], &histogram);
    assert!(force.is_finite());
    assert_eq!(force, 1.0 + 1.0 + 2.0 + 1.0);
    assert_eq!(swing_force(&strokes[0], &[]), 0.0);
}

#[test]
fn retest_above_pivot_emits_third_buy() {
    let strokes = strokes_from(&[0.0, 10.0, 5.0, 9.0, 6.0, 14.0, 11.0, 16.0]);
    let pivots = build_pivots(&strokes, Level::Stroke);
    let histogram = vec![0.0; 40];

    let signals = SignalAnalyzer::default().signals(&strokes, &pivots, &histogram, Level::Stroke);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].kind, SignalKind::ThirdBuy);
    assert_eq!(signals[0].swing_index, 5);
    assert_eq!(signals[0].price, 11.0);
    assert!(signals[0].kind.is_buy());
}

#[test]
fn retest_below_pivot_emits_third_sell() {
    let strokes = strokes_from(&[20.0, 10.0, 15.0, 11.0, 14.0, 6.0, 9.0, 4.0]);
    let pivots = build_pivots(&strokes, Level::Stroke);
    assert_eq!(pivots.len(), 1);
    assert_eq!((pivots[0].zd, pivots[0].zg), (11.0, 14.0));

    let signals = third_type(&strokes, &pivots, Level::Stroke);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].kind, SignalKind::ThirdSell);
    assert_eq!(signals[0].price, 9.0);
}

#[test]
fn retest_into_pivot_emits_nothing() {
    let strokes = strokes_from(&[0.0, 10.0, 5.0, 9.0, 6.0, 14.0, 8.0, 16.0]);
    let pivots = build_pivots(&strokes, Level::Stroke);
    assert!(third_type(&strokes, &pivots, Level::Stroke).is_empty());
}

#[test]
fn failed_new_high_after_first_sell_emits_second_sell() {
    let strokes = strokes_from(&[0.0, 10.0, 5.0, 12.0, 8.0, 11.0]);
    let mut histogram = vec![0.0; 30];
    for x in histogram.iter_mut().take(6) {
        *x = 1.0;
    }

    let analyzer = SignalAnalyzer::default();
    let first = analyzer.first_type(&strokes, &histogram, Level::Stroke);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].kind, SignalKind::FirstSell);
    assert_eq!(first[0].swing_index, 2);

    let second = second_type(&strokes, &first, Level::Stroke);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].kind, SignalKind::SecondSell);
    assert_eq!(second[0].swing_index, 4);
    assert_eq!(second[0].price, 11.0);
}

#[test]
fn trend_compares_latest_two_pivots() {
    let strokes = strokes_from(&[0.0, 10.0]);

    assert_eq!(trend(&strokes, &[pivot(1.0, 3.0), pivot(4.0, 6.0)], &[]), Trend::Up);
    assert_eq!(trend(&strokes, &[pivot(4.0, 6.0), pivot(1.0, 3.0)], &[]), Trend::Down);
    assert_eq!(
        trend(&strokes, &[pivot(1.0, 5.0), pivot(4.0, 6.0)], &[]),
        Trend::Consolidation
    );
    // 线段中枢优先
    assert_eq!(
        trend(
            &strokes,
            &[pivot(1.0, 3.0), pivot(4.0, 6.0)],
            &[pivot(4.0, 6.0), pivot(1.0, 3.0)]
        ),
        Trend::Down
    );
}

#[test]
fn trend_falls_back_to_last_stroke() {
    let up = strokes_from(&[0.0, 10.0]);
    let down = strokes_from(&[10.0, 0.0]);
    let none: Vec<Stroke> = Vec::new();

    assert_eq!(trend(&up, &[pivot(1.0, 3.0)], &[]), Trend::Up);
    assert_eq!(trend(&down, &[], &[]), Trend::Down);
    assert_eq!(trend(&none, &[], &[]), Trend::Consolidation);
}
