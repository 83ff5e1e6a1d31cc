//! Tests for figure layout: panels, labels, ticks and viewports

#[cfg(test)]
mod tests {
    use binomialbias::analysis::bias::{BiasCalculator, BiasResult, Tail};
    use binomialbias::analysis::inputs::BiasInputs;
    use binomialbias::plot::figure::{Anchor, Figure, PlotOptions, axis_ticks, tick_step};

    fn result(n: u64, expected: f64, actual: u64) -> BiasResult {
        let inputs = BiasInputs::from_counts(n, expected, actual).expect("valid inputs");
        BiasCalculator::new(Tail::Lower)
            .calculate(&inputs)
            .expect("calculation succeeds")
    }

    fn figure(n: u64, expected: f64, actual: u64) -> Figure {
        Figure::from_result(&result(n, expected, actual), &PlotOptions::default())
    }

    fn marker_labels(figure: &Figure, panel: usize) -> Vec<&'static str> {
        figure
            .panels
            .get(panel)
            .map(|p| p.markers.iter().map(|m| m.label).collect())
            .unwrap_or_default()
    }

    // Tests both panels are laid out with their titles and letters
    // Verified by swapping the panel order
    #[test]
    fn test_two_panels() {
        let figure = figure(20, 10.0, 7);
        assert_eq!(figure.panels.len(), 2);

        let (Some(fair), Some(future)) = (figure.panels.first(), figure.panels.get(1)) else {
            unreachable!("figure has two panels");
        };
        assert_eq!(
            fair.title,
            "Expected (n_e = 10) vs. actual (n_a = 7) out of n_t = 20 appointments"
        );
        assert_eq!(future.title, "Predicted distribution of future appointments");
        assert_eq!(fair.letter, Some("(a)"));
        assert_eq!(future.letter, Some("(b)"));
        assert!(figure.notice.is_none());
    }

    // Tests the annotation lists fractions, the tail probability and the bias
    // Verified by omitting the blank separator line
    #[test]
    fn test_fair_annotation() {
        let figure = figure(20, 10.0, 7);
        let lines = figure
            .panels
            .first()
            .map(|p| p.annotation.lines.clone())
            .unwrap_or_default();
        assert_eq!(
            lines,
            vec!["f_e = 0.5", "f_a = 0.35", "", "P(n ≤ n_a) = 0.132", "B = 1.86"]
        );

        let future = figure
            .panels
            .get(1)
            .map(|p| p.annotation.lines.clone())
            .unwrap_or_default();
        assert_eq!(future, vec!["P_fut = 0.754"]);
    }

    // Tests annotations sit on the side away from the distribution
    // Verified by inverting the side comparison
    #[test]
    fn test_annotation_side() {
        let low = figure(20, 5.0, 7);
        let annotation = low.panels.first().map(|p| p.annotation.clone());
        assert!(annotation.is_some_and(|a| a.anchor == Anchor::Right && (a.x - 18.0).abs() < 1e-9));

        let high = figure(20, 15.0, 12);
        let annotation = high.panels.first().map(|p| p.annotation.clone());
        assert!(annotation.is_some_and(|a| a.anchor == Anchor::Left && (a.x - 2.0).abs() < 1e-9));
    }

    // Tests both labels appear when n_e and n_a are far apart
    // Verified by always dropping the other label
    #[test]
    fn test_markers_far_apart() {
        let figure = figure(20, 10.0, 7);
        assert_eq!(marker_labels(&figure, 0), vec!["n_e", "n_a"]);
        assert_eq!(marker_labels(&figure, 1), vec!["n_e", "n_a"]);
    }

    // Tests each panel keeps only its own label when n_e and n_a are close
    // Verified by comparing against n/10 instead of n/20
    #[test]
    fn test_markers_close_together() {
        let figure = figure(40, 20.0, 19);
        assert_eq!(marker_labels(&figure, 0), vec!["n_e"]);
        assert_eq!(marker_labels(&figure, 1), vec!["n_a"]);
    }

    // Tests the highlighted bars follow the tail and the future interval
    // Verified by highlighting the upper tail in panel (a)
    #[test]
    fn test_highlighting() {
        let figure = figure(20, 10.0, 7);
        let fair = figure.panels.first().map(|p| p.highlighted.clone()).unwrap_or_default();
        assert_eq!(fair.len(), 21);
        assert_eq!(fair.count_ones(), 8);
        assert!(fair.get(7).is_some_and(|b| *b));
        assert!(fair.get(8).is_some_and(|b| !*b));

        let future = figure.panels.get(1).map(|p| p.highlighted.clone()).unwrap_or_default();
        assert_eq!(future.count_ones(), 9);
        assert!(future.get(6).is_some_and(|b| *b));
        assert!(future.get(15).is_some_and(|b| !*b));
    }

    // Tests bars are replaced by a notice above the bar limit
    // Verified by comparing with >= instead of >
    #[test]
    fn test_too_many_bars() {
        let options = PlotOptions {
            max_bars: 100,
            ..PlotOptions::default()
        };
        let shown = Figure::from_result(&result(100, 50.0, 40), &options);
        assert!(shown.notice.is_none());
        assert!(shown.panels.iter().all(|p| p.show_bars));

        let hidden = Figure::from_result(&result(101, 50.0, 40), &options);
        assert_eq!(hidden.notice.as_deref(), Some("Cannot show bar chart for n_t > 100"));
        assert!(hidden.panels.iter().all(|p| !p.show_bars));
    }

    // Tests letters can be disabled and the title wrapped
    // Verified by ignoring the wrap option
    #[test]
    fn test_options() {
        let options = PlotOptions {
            letters: false,
            wrap_title: true,
            ..PlotOptions::default()
        };
        let figure = Figure::from_result(&result(20, 10.0, 7), &options);
        assert!(figure.panels.iter().all(|p| p.letter.is_none()));
        assert_eq!(figure.panels.first().map(|p| p.title.lines().count()), Some(2));
    }

    // Tests tick steps for each band of totals
    // Verified by removing the 2-step band
    #[test]
    fn test_tick_steps() {
        assert_eq!(tick_step(8), 1);
        assert_eq!(tick_step(20), 2);
        assert_eq!(tick_step(40), 5);
        assert_eq!(tick_step(100), 10);
        assert_eq!(tick_step(150), 20);
        assert_eq!(tick_step(1000), 100);
        assert_eq!(tick_step(3000), 500);
        assert_eq!(axis_ticks(20), vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
        assert!(axis_ticks(12_345).len() <= 11);
    }

    // Tests viewports stack the panels and map data into their rectangles
    // Verified by placing both panels at the same height
    #[test]
    fn test_viewports() {
        let figure = figure(20, 10.0, 7);
        let viewports = figure.viewports();
        assert_eq!(viewports.len(), 2);

        let (Some(top), Some(bottom)) = (viewports.first(), viewports.get(1)) else {
            unreachable!("two viewports");
        };
        assert!(top.bottom() < bottom.top);
        assert!(bottom.bottom() <= f64::from(figure.height));
        assert!(top.x(0.0) > top.left && top.x(20.0) < top.left + top.width);
        assert!((top.y(0.0) - top.bottom()).abs() < 1e-9);
        assert!(top.y(1.0) >= top.top);
        assert!((top.slot_width() * 21.0 - top.width).abs() < 1e-9);
    }
}
