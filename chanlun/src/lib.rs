pub mod bar;
pub mod cbar;
pub mod config;
pub mod constant;
pub mod engine;
pub mod fractal;
pub mod frame;
pub mod indicator;
pub mod loader;
pub mod logging;
pub mod pivot;
pub mod segment;
pub mod signal;
pub mod stroke;
mod utils;

pub use bar::{CBar, PriceRange, SBar, is_inclusive, merge_range};
pub use cbar::merge_bars;
pub use config::{ChanConfig, ChanConfigPatch};
pub use constant::{Const, DataError, Direction, FractalType, Level, StrokeMode, Timeframe, Trend};
pub use engine::{ChanAnalysis, ChanAnalyzer};
pub use fractal::{Fractal, detect_fractals};
pub use frame::AnalysisFrames;
pub use indicator::{Ema, Indicator, Macd};
pub use loader::{load_bars_csv, load_bars_from_reader};
pub use logging::{init_logging, init_logging_with};
pub use pivot::{Pivot, Swing, build_pivots};
pub use segment::{Segment, build_segments};
pub use signal::{DivergenceSummary, Signal, SignalAnalyzer, SignalKind, swing_force};
pub use stroke::{Stroke, StrokeBuilder};
