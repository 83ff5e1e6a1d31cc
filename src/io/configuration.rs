//! Statistical constants and runtime configuration defaults

use crate::io::image::FigureFormat;

// Defaults reproduce the worked example of a 20-member committee
/// Default total number of appointments
pub const DEFAULT_TOTAL: u64 = 20;
/// Default expected number of appointments of the group
pub const DEFAULT_EXPECTED: f64 = 10.0;
/// Default actual number of appointments of the group
pub const DEFAULT_ACTUAL: u64 = 7;

// Full distributions are materialized, one f64 per possible count
/// Largest total number of appointments accepted
pub const MAX_TOTAL: u64 = 10_000_000;

/// Half-width of the Gaussian interval, in standard deviations (~95%)
pub const INTERVAL_STD_DEVIATIONS: f64 = 2.0;

/// Relative tolerance when collecting outcomes no more likely than the observed one
pub const TWO_SIDED_RELATIVE_TOLERANCE: f64 = 1e-7;

// Summary formatting
/// Significant figures shown in tables and figure labels
pub const SIGNIFICANT_FIGURES: usize = 3;
/// Significant figures shown for the fractions f_e and f_a in figures
pub const FRACTION_SIGNIFICANT_FIGURES: usize = 2;

// Figure layout
/// Bar charts are replaced by a notice above this many appointments
pub const DEFAULT_MAX_BARS: u64 = 1000;
/// Default rendered figure width in pixels
pub const DEFAULT_FIGURE_WIDTH: u32 = 800;
/// Default rendered figure height in pixels
pub const DEFAULT_FIGURE_HEIGHT: u32 = 800;
/// Smallest figure edge that still leaves room for both panels
pub const MIN_FIGURE_EDGE: u32 = 200;
/// Largest figure edge accepted, to bound memory use
pub const MAX_FIGURE_EDGE: u32 = 8000;
/// Fraction of each slot covered by a bar
pub const BAR_WIDTH: f64 = 0.95;
/// Opacity of bars over the background
pub const BAR_ALPHA: f64 = 0.7;
/// Opacity of the interval band
pub const BAND_ALPHA: f64 = 0.05;
/// Height of the interval band relative to the tallest bar
pub const BAND_HEIGHT_FACTOR: f64 = 1.2;
/// `n_e` and `n_a` closer than `n / MARKER_GAP_DIVISOR` share one label
pub const MARKER_GAP_DIVISOR: f64 = 20.0;
/// Upper bound on x-axis ticks for large totals
pub const MAX_TICKS: u64 = 10;

// Colours (RGBA)
/// Colour of the full distribution (cornflower blue)
pub const DIST_COLOR: [u8; 4] = [100, 149, 237, 255];
/// Colour of the part of the distribution being summed (dark blue)
pub const TAIL_COLOR: [u8; 4] = [0, 0, 139, 255];
/// Colour of intervals, markers and text
pub const INTERVAL_COLOR: [u8; 4] = [0, 0, 0, 255];
/// Figure background
pub const BACKGROUND_COLOR: [u8; 4] = [255, 255, 255, 255];

// Output settings
/// Format of figures rendered in batch mode; SVG keeps the text
pub const DEFAULT_BATCH_FORMAT: FigureFormat = FigureFormat::Svg;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
