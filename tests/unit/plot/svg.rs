//! Tests for SVG rendering

#[cfg(test)]
mod tests {
    use binomialbias::analysis::bias::BiasCalculator;
    use binomialbias::analysis::inputs::BiasInputs;
    use binomialbias::plot::figure::{Figure, PlotOptions};
    use binomialbias::plot::svg::render_svg;

    fn figure(n: u64, expected: f64, actual: u64, options: PlotOptions) -> Figure {
        let inputs = BiasInputs::from_counts(n, expected, actual).expect("valid inputs");
        let calculator = BiasCalculator::default().with_plot_options(options);
        calculator.assess(&inputs).expect("calculation succeeds").1
    }

    // Tests the document is a complete SVG with the figure's size
    // Verified by omitting the closing tag
    #[test]
    fn test_document_structure() {
        let svg = render_svg(&figure(20, 10.0, 7, PlotOptions::default()));
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"width="800" height="800""#));
        assert_eq!(svg.matches("<g>").count(), 2);
    }

    // Tests titles, statistics and labels are written as text
    // Verified by skipping the annotation lines
    #[test]
    fn test_text_content() {
        let svg = render_svg(&figure(20, 10.0, 7, PlotOptions::default()));
        for text in [
            "Expected (n_e = 10) vs. actual (n_a = 7) out of n_t = 20 appointments",
            "Predicted distribution of future appointments",
            "P(n ≤ n_a) = 0.132",
            "B = 1.86",
            "P_fut = 0.754",
            "95% CI",
            "(a)",
            "(b)",
            ">n_e<",
            ">n_a<",
            "Number of appointments",
            "Probability",
        ] {
            assert!(svg.contains(text), "missing {text}");
        }
    }

    // Tests one bar per count in each panel
    // Verified by drawing bars from 1 instead of 0
    #[test]
    fn test_bar_count() {
        let svg = render_svg(&figure(20, 10.0, 7, PlotOptions::default()));
        let bars = svg
            .lines()
            .filter(|line| line.starts_with("<rect") && line.contains("fill-opacity=\"0.7\""))
            .count();
        assert_eq!(bars, 2 * 21);
    }

    // Tests the notice replaces the bars for large totals
    // Verified by leaving the notice out
    #[test]
    fn test_notice() {
        let options = PlotOptions {
            max_bars: 10,
            ..PlotOptions::default()
        };
        let svg = render_svg(&figure(20, 10.0, 7, options));
        assert!(svg.contains("Cannot show bar chart for n_t &gt; 10"));
        assert!(!svg.contains("fill-opacity=\"0.7\""));
    }

    // Tests wrapped titles become separate text elements
    // Verified by writing the title with its line break
    #[test]
    fn test_wrapped_title() {
        let options = PlotOptions {
            wrap_title: true,
            ..PlotOptions::default()
        };
        let svg = render_svg(&figure(20, 10.0, 7, options));
        assert!(svg.contains(">Expected (n_e = 10) vs. actual (n_a = 7)</text>"));
        assert!(svg.contains(">out of n_t = 20 appointments</text>"));
    }
}
