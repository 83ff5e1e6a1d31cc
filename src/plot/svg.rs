//! SVG rendering of figures, including titles, labels and statistics text

use crate::io::configuration::{BAND_ALPHA, BAR_ALPHA, BAR_WIDTH};
use crate::plot::figure::{Anchor, Figure, Panel, Viewport};
use std::fmt::{self, Write};

const FONT_SIZE: f64 = 12.0;
const TITLE_FONT_SIZE: f64 = 13.0;
const LINE_HEIGHT: f64 = 1.25;

/// Render a figure as a standalone SVG document
pub fn render_svg(figure: &Figure) -> String {
    let mut out = String::new();
    write_document(&mut out, figure).unwrap_or_default();
    out
}

fn write_document(out: &mut String, figure: &Figure) -> fmt::Result {
    let width = figure.width;
    let height = figure.height;
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="{FONT_SIZE}">"#
    )?;
    writeln!(
        out,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        color(figure.palette.background)
    )?;

    let viewports = figure.viewports();
    for (panel, viewport) in figure.panels.iter().zip(&viewports) {
        write_panel(out, panel, viewport, figure)?;
    }

    if let (Some(notice), Some(first)) = (&figure.notice, viewports.first()) {
        writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}">{}</text>"#,
            first.left + first.width / 2.0,
            first.top + first.height / 2.0,
            color(figure.palette.interval),
            escape(notice)
        )?;
    }

    writeln!(out, "</svg>")
}

fn write_panel(
    out: &mut String,
    panel: &Panel,
    viewport: &Viewport,
    figure: &Figure,
) -> fmt::Result {
    let palette = figure.palette;
    let ink = color(palette.interval);
    let half_bar = viewport.slot_width() * BAR_WIDTH / 2.0;
    writeln!(out, "<g>")?;

    // Title, centred above the plotting area, one text line per title line
    let title_lines: Vec<&str> = panel.title.lines().collect();
    let title_step = TITLE_FONT_SIZE * LINE_HEIGHT;
    let title_top = viewport.top - 8.0 - (title_lines.len() as f64 - 1.0) * title_step;
    let center = viewport.left + viewport.width / 2.0;
    for (i, line) in title_lines.iter().enumerate() {
        writeln!(
            out,
            r#"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-size="{TITLE_FONT_SIZE}" fill="{ink}">{}</text>"#,
            title_top + i as f64 * title_step,
            escape(line)
        )?;
    }
    if let Some(letter) = panel.letter {
        writeln!(
            out,
            r#"<text x="4" y="{title_top:.1}" font-weight="bold" fill="{ink}">{letter}</text>"#
        )?;
    }

    // Interval band behind the bars, with its line, dot and caption
    let band = &panel.band;
    let band_left = viewport.x(band.low as f64) - half_bar;
    let band_right = viewport.x(band.high as f64) + half_bar;
    let band_y = viewport.y(band.y);
    writeln!(
        out,
        r#"<rect x="{band_left:.2}" y="{band_y:.2}" width="{:.2}" height="{:.2}" fill="{ink}" fill-opacity="{BAND_ALPHA}"/>"#,
        band_right - band_left,
        viewport.bottom() - band_y
    )?;

    if panel.show_bars {
        let tail = color(palette.tail);
        let distribution = color(palette.distribution);
        for (k, &height) in panel.heights.iter().enumerate() {
            let top = viewport.y(height);
            let fill = if panel.highlighted.get(k).is_some_and(|bit| *bit) {
                &tail
            } else {
                &distribution
            };
            writeln!(
                out,
                r#"<rect x="{:.2}" y="{top:.2}" width="{:.2}" height="{:.2}" fill="{fill}" fill-opacity="{BAR_ALPHA}"/>"#,
                viewport.x(k as f64) - half_bar,
                2.0 * half_bar,
                viewport.bottom() - top
            )?;
        }
    }

    writeln!(
        out,
        r#"<line x1="{band_left:.2}" y1="{band_y:.2}" x2="{band_right:.2}" y2="{band_y:.2}" stroke="{ink}" stroke-width="2"/>"#
    )?;
    writeln!(
        out,
        r#"<circle cx="{:.2}" cy="{band_y:.2}" r="4" fill="{ink}"/>"#,
        viewport.x(band.center)
    )?;
    writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" fill="{ink}">95% CI</text>"#,
        (band_left + band_right) / 2.0,
        band_y - 6.0
    )?;

    for marker in &panel.markers {
        writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" fill="{ink}">{}</text>"#,
            viewport.x(marker.x as f64),
            viewport.y(marker.y),
            marker.label
        )?;
    }

    let annotation = &panel.annotation;
    let text_anchor = match annotation.anchor {
        Anchor::Left => "start",
        Anchor::Right => "end",
    };
    let annotation_x = viewport.x(annotation.x);
    let annotation_y = viewport.y(annotation.y);
    for (i, line) in annotation.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        writeln!(
            out,
            r#"<text x="{annotation_x:.2}" y="{:.2}" text-anchor="{text_anchor}" fill="{ink}">{}</text>"#,
            annotation_y + i as f64 * FONT_SIZE * LINE_HEIGHT,
            escape(line)
        )?;
    }

    write_axes(out, panel, viewport, &ink)?;
    writeln!(out, "</g>")
}

fn write_axes(out: &mut String, panel: &Panel, viewport: &Viewport, ink: &str) -> fmt::Result {
    let bottom = viewport.bottom();
    let left = viewport.left;
    let right = left + viewport.width;

    writeln!(
        out,
        r#"<line x1="{left:.2}" y1="{bottom:.2}" x2="{right:.2}" y2="{bottom:.2}" stroke="{ink}"/>"#
    )?;
    writeln!(
        out,
        r#"<line x1="{left:.2}" y1="{:.2}" x2="{left:.2}" y2="{bottom:.2}" stroke="{ink}"/>"#,
        viewport.top
    )?;

    for &tick in &panel.ticks {
        let x = viewport.x(tick as f64);
        writeln!(
            out,
            r#"<line x1="{x:.2}" y1="{bottom:.2}" x2="{x:.2}" y2="{:.2}" stroke="{ink}"/>"#,
            bottom + 4.0
        )?;
        writeln!(
            out,
            r#"<text x="{x:.2}" y="{:.2}" text-anchor="middle" fill="{ink}">{tick}</text>"#,
            bottom + 4.0 + FONT_SIZE
        )?;
    }

    writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" fill="{ink}">{}</text>"#,
        left + viewport.width / 2.0,
        bottom + 6.0 + 2.0 * FONT_SIZE,
        panel.x_label
    )?;
    let label_x = (left - 8.0).max(FONT_SIZE);
    let label_y = viewport.top + viewport.height / 2.0;
    writeln!(
        out,
        r#"<text x="{label_x:.2}" y="{label_y:.2}" text-anchor="middle" transform="rotate(-90 {label_x:.2} {label_y:.2})" fill="{ink}">{}</text>"#,
        panel.y_label
    )
}

fn color([r, g, b, _]: [u8; 4]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
