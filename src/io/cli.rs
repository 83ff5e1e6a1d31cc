//! Command-line interface for single calculations and batches of scenarios

use crate::analysis::bias::{BiasCalculator, Tail};
use crate::analysis::inputs::{BiasInputs, Share, whole_count};
use crate::analysis::summary::Summary;
use crate::io::configuration::{
    DEFAULT_ACTUAL, DEFAULT_BATCH_FORMAT, DEFAULT_EXPECTED, DEFAULT_FIGURE_HEIGHT,
    DEFAULT_FIGURE_WIDTH, DEFAULT_MAX_BARS, DEFAULT_TOTAL, MAX_FIGURE_EDGE, MIN_FIGURE_EDGE,
};
use crate::io::error::{BiasError, Result, WithScenario, invalid_input};
use crate::io::image::{FigureFormat, export_figure};
use crate::io::progress::ProgressManager;
use crate::io::scenarios::{Scenario, load_scenarios, paper_scenarios};
use crate::plot::figure::PlotOptions;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "binomialbias")]
#[command(
    author,
    version,
    about = "Estimate bias in appointments from the binomial distribution"
)]
/// Command-line arguments for the bias calculator
// Output and display preferences are independent switches
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Total number of appointments
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOTAL as f64, allow_negative_numbers = true)]
    pub total: f64,

    /// Expected number of appointments of the group under a fair process; always
    /// a count, even below 1 (use --f-e for a fraction, whereas batch files read
    /// `0.38` or `38%` as fractions)
    #[arg(short, long, default_value_t = DEFAULT_EXPECTED, allow_negative_numbers = true)]
    pub expected: f64,

    /// Actual number of appointments of the group
    #[arg(short, long, default_value_t = DEFAULT_ACTUAL as f64, allow_negative_numbers = true)]
    pub actual: f64,

    /// Expected fraction of appointments; overrides --expected
    #[arg(long = "f-e", allow_negative_numbers = true)]
    pub f_e: Option<f64>,

    /// Actual fraction of appointments; overrides --actual
    #[arg(long = "f-a", allow_negative_numbers = true)]
    pub f_a: Option<f64>,

    /// Tail of the fair-process distribution to sum
    #[arg(short, long, value_enum, default_value_t = Tail::Lower)]
    pub tail: Tail,

    /// Write the figure to this file (.png or .svg)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Figure width in pixels
    #[arg(long, default_value_t = DEFAULT_FIGURE_WIDTH)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = DEFAULT_FIGURE_HEIGHT)]
    pub height: u32,

    /// Omit bars when there are more appointments than this
    #[arg(long, default_value_t = DEFAULT_MAX_BARS)]
    pub max_bars: u64,

    /// Do not label the panels (a) and (b)
    #[arg(long)]
    pub no_letters: bool,

    /// Break the first panel's title across two lines
    #[arg(long)]
    pub wrap: bool,

    /// Print statistics as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Process scenarios listed in FILE, one `label n expected actual` per line
    #[arg(long, value_name = "FILE", conflicts_with = "paper")]
    pub batch: Option<PathBuf>,

    /// Render the six figures of the manuscript
    #[arg(long)]
    pub paper: bool,

    /// Directory for figures rendered by --batch and --paper
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Format of figures rendered by --batch and --paper; PNG has no text
    #[arg(long, value_enum, default_value_t = DEFAULT_BATCH_FORMAT)]
    pub format: FigureFormat,

    /// Render scenarios even if their figure exists
    #[arg(long)]
    pub no_skip: bool,

    /// Suppress progress output and warnings
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log computed statistics
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by --quiet and --verbose
    pub const fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::WARN
        }
    }

    /// Validated inputs of a single calculation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for values outside their domain
    pub fn inputs(&self) -> Result<BiasInputs> {
        let n = whole_count("n", self.total)?;
        let expected = self
            .f_e
            .map_or(Share::Count(self.expected), Share::Fraction);
        let actual = self.f_a.map_or(Share::Count(self.actual), Share::Fraction);
        BiasInputs::new(n, expected, actual)
    }

    /// Figure layout options
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the width or height is outside the supported range
    pub fn plot_options(&self) -> Result<PlotOptions> {
        check_edge("width", self.width)?;
        check_edge("height", self.height)?;
        Ok(PlotOptions {
            max_bars: self.max_bars,
            letters: !self.no_letters,
            wrap_title: self.wrap,
            width: self.width,
            height: self.height,
            ..PlotOptions::default()
        })
    }
}

fn check_edge(parameter: &'static str, pixels: u32) -> Result<()> {
    if (MIN_FIGURE_EDGE..=MAX_FIGURE_EDGE).contains(&pixels) {
        Ok(())
    } else {
        Err(invalid_input(
            parameter,
            &pixels,
            &format!("must lie between {MIN_FIGURE_EDGE} and {MAX_FIGURE_EDGE} pixels"),
        ))
    }
}

#[derive(Serialize)]
struct ScenarioReport<'a> {
    label: &'a str,
    #[serde(flatten)]
    summary: Summary,
}

/// Runs the calculations requested on the command line
pub struct BiasRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl BiasRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run and print results to standard output
    ///
    /// # Errors
    ///
    /// Returns an error if inputs are invalid, a calculation fails, or output
    /// cannot be written
    pub fn process(&mut self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.process_to(&mut out)
    }

    /// Run and print results to `out`
    ///
    /// # Errors
    ///
    /// Same as [`BiasRunner::process`]
    pub fn process_to(&mut self, out: &mut impl Write) -> Result<()> {
        let calculator =
            BiasCalculator::new(self.cli.tail).with_plot_options(self.cli.plot_options()?);

        if self.cli.paper {
            self.process_batch(&calculator, &paper_scenarios(), out)
        } else if let Some(path) = self.cli.batch.clone() {
            let scenarios = load_scenarios(&path)?;
            self.process_batch(&calculator, &scenarios, out)
        } else {
            self.process_single(&calculator, out)
        }
    }

    fn process_single(&self, calculator: &BiasCalculator, out: &mut impl Write) -> Result<()> {
        let inputs = self.cli.inputs()?;
        let result = calculator.calculate(&inputs)?;
        let summary = Summary::from(&result);

        if self.cli.json {
            writeln!(out, "{}", summary.to_json()?).map_err(write_error)?;
        } else {
            write!(out, "{summary}").map_err(write_error)?;
        }

        if let Some(ref output) = self.cli.output {
            export_figure(&calculator.plot(&result), output)?;
        }
        Ok(())
    }

    fn process_batch(
        &mut self,
        calculator: &BiasCalculator,
        scenarios: &[Scenario],
        out: &mut impl Write,
    ) -> Result<()> {
        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(scenarios.len());
        }

        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            if let Some(ref pm) = self.progress_manager {
                pm.start_scenario(&scenario.label);
            }

            if let Some(summary) = self.process_scenario(calculator, scenario)? {
                if self.cli.json {
                    reports.push(ScenarioReport {
                        label: &scenario.label,
                        summary,
                    });
                } else {
                    writeln!(out, "{}\n{summary}", scenario.label).map_err(write_error)?;
                }
            }

            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_scenario();
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        if self.cli.json {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|source| BiasError::Serialization { source })?;
            writeln!(out, "{json}").map_err(write_error)?;
        }
        Ok(())
    }

    // None when the scenario's figure already exists and is skipped
    fn process_scenario(
        &self,
        calculator: &BiasCalculator,
        scenario: &Scenario,
    ) -> Result<Option<Summary>> {
        let output_path = Self::figure_path(&self.cli.out_dir, &scenario.label, self.cli.format);
        if self.cli.skip_existing() && output_path.exists() {
            tracing::warn!(
                scenario = %scenario.label,
                path = %output_path.display(),
                "skipping scenario, figure exists"
            );
            return Ok(None);
        }

        let inputs = scenario.to_inputs()?;
        let result = calculator
            .calculate(&inputs)
            .with_scenario(&scenario.label)?;
        export_figure(&calculator.plot(&result), &output_path).with_scenario(&scenario.label)?;
        tracing::info!(scenario = %scenario.label, "rendered scenario");

        Ok(Some(Summary::from(&result)))
    }

    /// Path of the figure rendered for a scenario
    pub fn figure_path(out_dir: &Path, label: &str, format: FigureFormat) -> PathBuf {
        out_dir.join(format!("{label}.{}", format.extension()))
    }
}

fn write_error(source: std::io::Error) -> BiasError {
    BiasError::FileSystem {
        path: PathBuf::from("<stdout>"),
        operation: "write results",
        source,
    }
}
