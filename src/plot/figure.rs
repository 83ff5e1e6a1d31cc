//! Renderer-independent layout of the two-panel bias figure
//!
//! Panel (a) shows the distribution of appointments under a fair process with
//! the summed tail shaded. Panel (b) shows the distribution of future
//! appointments at the observed rate, shading the outcomes that would look
//! fair. Both carry the 95% interval band and labels for `n_e` and `n_a`.

use crate::analysis::bias::BiasResult;
use crate::analysis::summary::format_significant;
use crate::io::configuration::{
    BACKGROUND_COLOR, BAND_HEIGHT_FACTOR, DEFAULT_FIGURE_HEIGHT, DEFAULT_FIGURE_WIDTH,
    DEFAULT_MAX_BARS, DIST_COLOR, FRACTION_SIGNIFICANT_FIGURES, INTERVAL_COLOR,
    MARKER_GAP_DIVISOR, MAX_TICKS, SIGNIFICANT_FIGURES, TAIL_COLOR,
};
use bitvec::vec::BitVec;
use ndarray::Array1;

/// Colours used when rendering a figure (RGBA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Bars of the full distribution
    pub distribution: [u8; 4],
    /// Bars that make up a reported probability
    pub tail: [u8; 4],
    /// Interval bands, markers, axes and text
    pub interval: [u8; 4],
    /// Background
    pub background: [u8; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            distribution: DIST_COLOR,
            tail: TAIL_COLOR,
            interval: INTERVAL_COLOR,
            background: BACKGROUND_COLOR,
        }
    }
}

/// Options controlling figure layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotOptions {
    /// Bars are omitted, and a notice shown, above this many appointments
    pub max_bars: u64,
    /// Label the panels "(a)" and "(b)"
    pub letters: bool,
    /// Break the title of the first panel across two lines
    pub wrap_title: bool,
    /// Figure width in pixels
    pub width: u32,
    /// Figure height in pixels
    pub height: u32,
    /// Colours
    pub palette: Palette,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            max_bars: DEFAULT_MAX_BARS,
            letters: true,
            wrap_title: false,
            width: DEFAULT_FIGURE_WIDTH,
            height: DEFAULT_FIGURE_HEIGHT,
            palette: Palette::default(),
        }
    }
}

/// Horizontal alignment of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Text starts at the anchor point
    Left,
    /// Text ends at the anchor point
    Right,
}

/// Block of text placed in data coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Lines from top to bottom
    pub lines: Vec<String>,
    /// Horizontal position, in appointments
    pub x: f64,
    /// Vertical position of the first line, in probability
    pub y: f64,
    /// Alignment relative to `x`
    pub anchor: Anchor,
}

/// Label drawn just above the bar of a reference count
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Text of the label
    pub label: &'static str,
    /// Count the label refers to
    pub x: u64,
    /// Height of the label's baseline
    pub y: f64,
}

/// Horizontal band spanning a 95% interval, with a dot at its centre
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalBand {
    /// First count inside the interval
    pub low: u64,
    /// Last count inside the interval
    pub high: u64,
    /// Position of the centre dot
    pub center: f64,
    /// Height of the band
    pub y: f64,
}

/// One bar chart of a distribution over `0..=n`
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Title above the chart; may contain line breaks
    pub title: String,
    /// Frame letter such as "(a)"
    pub letter: Option<&'static str>,
    /// Label of the horizontal axis
    pub x_label: &'static str,
    /// Label of the vertical axis
    pub y_label: &'static str,
    /// Probability of each count
    pub heights: Array1<f64>,
    /// Counts drawn in the tail colour
    pub highlighted: BitVec,
    /// False when there are too many counts to draw individual bars
    pub show_bars: bool,
    /// Top of the vertical axis
    pub y_max: f64,
    /// Positions of the horizontal axis ticks
    pub ticks: Vec<u64>,
    /// 95% interval
    pub band: IntervalBand,
    /// Labels for `n_e` and `n_a`
    pub markers: Vec<Marker>,
    /// Statistics text
    pub annotation: Annotation,
}

impl Panel {
    /// Largest count on the horizontal axis
    pub fn x_max(&self) -> u64 {
        self.heights.len().saturating_sub(1) as u64
    }
}

/// Two-panel figure of a bias calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Fair-process distribution, then future distribution
    pub panels: Vec<Panel>,
    /// Message shown in place of the bars when they are omitted
    pub notice: Option<String>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Colours
    pub palette: Palette,
}

/// Pixel rectangle of a panel's plotting area, with data-to-pixel mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels
    pub left: f64,
    /// Top edge in pixels
    pub top: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
    x_max: f64,
    y_max: f64,
}

impl Viewport {
    /// Horizontal pixel of a count; bars extend half a slot either side
    pub fn x(&self, count: f64) -> f64 {
        let span = self.x_max + 1.0;
        self.left + (count + 0.5) / span * self.width
    }

    /// Vertical pixel of a probability
    pub fn y(&self, probability: f64) -> f64 {
        let fraction = (probability / self.y_max).clamp(0.0, 1.0);
        self.top + (1.0 - fraction) * self.height
    }

    /// Width in pixels of one count's slot
    pub fn slot_width(&self) -> f64 {
        self.width / (self.x_max + 1.0)
    }

    /// Bottom edge in pixels
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

impl Figure {
    /// Lay out the figure for a calculated result
    pub fn from_result(result: &BiasResult, options: &PlotOptions) -> Self {
        let inputs = &result.inputs;
        let n = inputs.total();
        let total = n as f64;
        let expected = inputs.expected();
        let actual = inputs.actual();
        let show_bars = n <= options.max_bars;
        let ticks = axis_ticks(n);
        let sig = |value: f64| format_significant(value, SIGNIFICANT_FIGURES);

        // Too-close labels would overlap, so each panel keeps only its own
        let rounded_expected = expected.round() as u64;
        let gap = rounded_expected.abs_diff(actual) as f64 > total / MARKER_GAP_DIVISOR;

        let separator = if options.wrap_title { "\n" } else { " " };
        let fair_title = format!(
            "Expected (n_e = {}) vs. actual (n_a = {actual}){separator}out of n_t = {n} appointments",
            sig(expected)
        );

        let fair_peak = peak(&result.expected_pmf);
        let fair_lines = vec![
            format!(
                "f_e = {}",
                format_significant(inputs.f_expected(), FRACTION_SIGNIFICANT_FIGURES)
            ),
            format!(
                "f_a = {}",
                format_significant(inputs.f_actual(), FRACTION_SIGNIFICANT_FIGURES)
            ),
            String::new(),
            format!("{} = {}", result.tail.label(), sig(result.tail_probability)),
            format!("B = {}", sig(result.bias)),
        ];
        let fair = Panel {
            title: fair_title,
            letter: options.letters.then_some("(a)"),
            x_label: "Number of appointments",
            y_label: "Probability",
            heights: result.expected_pmf.clone(),
            highlighted: result.tail_region(),
            show_bars,
            y_max: axis_top(fair_peak),
            ticks: ticks.clone(),
            band: IntervalBand {
                low: result.expected_interval.0,
                high: result.expected_interval.1,
                center: expected,
                y: BAND_HEIGHT_FACTOR * fair_peak,
            },
            markers: markers(&result.expected_pmf, rounded_expected, actual, true, gap),
            annotation: side_annotation(
                fair_lines,
                expected,
                total,
                BAND_HEIGHT_FACTOR * fair_peak,
            ),
        };

        let future_peak = peak(&result.actual_pmf);
        let future = Panel {
            title: "Predicted distribution of future appointments".to_string(),
            letter: options.letters.then_some("(b)"),
            x_label: "Number of appointments",
            y_label: "Probability",
            heights: result.actual_pmf.clone(),
            highlighted: result.future_region(),
            show_bars,
            y_max: axis_top(future_peak),
            ticks,
            band: IntervalBand {
                low: result.actual_interval.0,
                high: result.actual_interval.1,
                center: actual as f64,
                y: BAND_HEIGHT_FACTOR * future_peak,
            },
            markers: markers(&result.actual_pmf, rounded_expected, actual, false, gap),
            annotation: side_annotation(
                vec![format!("P_fut = {}", sig(result.p_future))],
                actual as f64,
                total,
                future_peak,
            ),
        };

        let notice = (!show_bars)
            .then(|| format!("Cannot show bar chart for n_t > {}", options.max_bars));

        Self {
            panels: vec![fair, future],
            notice,
            width: options.width,
            height: options.height,
            palette: options.palette,
        }
    }

    /// Plotting areas of the panels, stacked top to bottom
    ///
    /// Margins leave room for titles above and tick labels below each panel.
    pub fn viewports(&self) -> Vec<Viewport> {
        let width = f64::from(self.width);
        let panel_height = f64::from(self.height) / self.panels.len().max(1) as f64;
        let left = (width * 0.1).max(40.0);
        let right = (width * 0.03).max(10.0);
        let top = (panel_height * 0.2).max(30.0);
        let bottom = (panel_height * 0.15).max(25.0);

        self.panels
            .iter()
            .enumerate()
            .map(|(i, panel)| Viewport {
                left,
                top: i as f64 * panel_height + top,
                width: (width - left - right).max(1.0),
                height: (panel_height - top - bottom).max(1.0),
                x_max: panel.x_max() as f64,
                y_max: panel.y_max,
            })
            .collect()
    }
}

/// Step between x-axis ticks for `n` appointments
///
/// Fixed steps for small totals, otherwise the smallest 1-2-5 step that
/// keeps the tick count at or below [`MAX_TICKS`].
pub fn tick_step(n: u64) -> u64 {
    match n {
        0..=10 => 1,
        11..=20 => 2,
        21..=50 => 5,
        51..=100 => 10,
        _ => {
            let raw = n.div_ceil(MAX_TICKS);
            let mut magnitude = 1;
            while magnitude * 10 <= raw {
                magnitude *= 10;
            }
            [1, 2, 5, 10]
                .into_iter()
                .map(|factor| factor * magnitude)
                .find(|&step| step >= raw)
                .unwrap_or(10 * magnitude)
        }
    }
}

/// Tick positions from zero to `n`
pub fn axis_ticks(n: u64) -> Vec<u64> {
    let step = tick_step(n) as usize;
    (0..=n).step_by(step).collect()
}

fn peak(pmf: &Array1<f64>) -> f64 {
    pmf.iter().copied().fold(0.0, f64::max).max(f64::MIN_POSITIVE)
}

// Leaves room for the band and its caption above the tallest bar
fn axis_top(peak: f64) -> f64 {
    1.35 * peak
}

fn markers(pmf: &Array1<f64>, expected: u64, actual: u64, fair: bool, gap: bool) -> Vec<Marker> {
    let lift = 0.05 * peak(pmf);
    let at = |label, x: u64| Marker {
        label,
        x,
        y: pmf.get(x as usize).copied().unwrap_or(0.0) + lift,
    };

    let mut labels = Vec::with_capacity(2);
    if gap || fair {
        labels.push(at("n_e", expected));
    }
    if gap || !fair {
        labels.push(at("n_a", actual));
    }
    labels
}

// Statistics go on the side away from the bulk of the distribution
fn side_annotation(lines: Vec<String>, center: f64, total: f64, y: f64) -> Annotation {
    if center < total / 2.0 {
        Annotation {
            lines,
            x: total * 0.9,
            y,
            anchor: Anchor::Right,
        }
    } else {
        Annotation {
            lines,
            x: total * 0.1,
            y,
            anchor: Anchor::Left,
        }
    }
}
