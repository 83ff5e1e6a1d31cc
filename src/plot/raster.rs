//! Raster rendering of figures with alpha blending
//!
//! Only geometry is drawn: bars, interval bands, reference ticks and axes.
//! Text needs the SVG renderer.

use crate::io::configuration::{BAND_ALPHA, BAR_ALPHA, BAR_WIDTH};
use crate::plot::figure::{Figure, Panel, Viewport};
use image::{Rgba, RgbaImage};

/// Rasterize a figure at its configured size
pub fn render_raster(figure: &Figure) -> RgbaImage {
    let palette = figure.palette;
    let mut img = RgbaImage::from_pixel(
        figure.width.max(1),
        figure.height.max(1),
        Rgba(palette.background),
    );

    for (panel, viewport) in figure.panels.iter().zip(figure.viewports()) {
        draw_panel(&mut img, panel, &viewport, figure);
    }

    img
}

fn draw_panel(img: &mut RgbaImage, panel: &Panel, viewport: &Viewport, figure: &Figure) {
    let palette = figure.palette;
    let slot = viewport.slot_width();
    let half_bar = (slot * BAR_WIDTH / 2.0).max(0.5);

    // Interval band sits behind the bars
    let band = &panel.band;
    let band_left = viewport.x(band.low as f64) - half_bar;
    let band_right = viewport.x(band.high as f64) + half_bar;
    let band_y = viewport.y(band.y);
    fill_rect(
        img,
        (band_left, band_y),
        (band_right, viewport.bottom()),
        palette.interval,
        BAND_ALPHA,
    );

    if panel.show_bars {
        for (k, &height) in panel.heights.iter().enumerate() {
            let highlighted = panel.highlighted.get(k).is_some_and(|bit| *bit);
            let color = if highlighted {
                palette.tail
            } else {
                palette.distribution
            };
            let center = viewport.x(k as f64);
            fill_rect(
                img,
                (center - half_bar, viewport.y(height)),
                (center + half_bar, viewport.bottom()),
                color,
                BAR_ALPHA,
            );
        }
    }

    // Band line and centre dot
    fill_rect(
        img,
        (band_left, band_y - 1.0),
        (band_right, band_y + 1.0),
        palette.interval,
        1.0,
    );
    fill_circle(
        img,
        (viewport.x(band.center), band_y),
        (slot / 2.0).clamp(2.5, 5.0),
        palette.interval,
    );

    // Reference ticks above the n_e and n_a bars
    for marker in &panel.markers {
        let x = viewport.x(marker.x as f64);
        let y = viewport.y(marker.y);
        fill_rect(img, (x - 1.0, y - 8.0), (x + 1.0, y), palette.interval, 1.0);
    }

    draw_axes(img, panel, viewport, palette.interval);
}

fn draw_axes(img: &mut RgbaImage, panel: &Panel, viewport: &Viewport, color: [u8; 4]) {
    let bottom = viewport.bottom();
    let left = viewport.left;
    let right = viewport.left + viewport.width;

    fill_rect(img, (left, bottom), (right, bottom + 1.0), color, 1.0);
    fill_rect(img, (left - 1.0, viewport.top), (left, bottom + 1.0), color, 1.0);
    for &tick in &panel.ticks {
        let x = viewport.x(tick as f64);
        fill_rect(img, (x - 0.5, bottom + 1.0), (x + 0.5, bottom + 5.0), color, 1.0);
    }
}

/// Blend `color` at `alpha` over every pixel whose centre lies in the rectangle
fn fill_rect(
    img: &mut RgbaImage,
    top_left: (f64, f64),
    bottom_right: (f64, f64),
    color: [u8; 4],
    alpha: f64,
) {
    let (x0, x1) = pixel_span(top_left.0, bottom_right.0, img.width());
    let (y0, y1) = pixel_span(top_left.1, bottom_right.1, img.height());

    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
                blend(pixel, color, alpha);
            }
        }
    }
}

fn fill_circle(img: &mut RgbaImage, center: (f64, f64), radius: f64, color: [u8; 4]) {
    let (x0, x1) = pixel_span(center.0 - radius, center.0 + radius, img.width());
    let (y0, y1) = pixel_span(center.1 - radius, center.1 + radius, img.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = f64::from(x) + 0.5 - center.0;
            let dy = f64::from(y) + 0.5 - center.1;
            if dx.hypot(dy) > radius {
                continue;
            }
            if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
                blend(pixel, color, 1.0);
            }
        }
    }
}

// Half-open pixel range covering [start, end), at least one pixel wide
fn pixel_span(start: f64, end: f64, limit: u32) -> (u32, u32) {
    let limit = f64::from(limit);
    let low = start.min(end).round().clamp(0.0, limit);
    let high = start.max(end).round().clamp(0.0, limit);
    let high = if high <= low { (low + 1.0).min(limit) } else { high };
    (low as u32, high as u32)
}

fn blend(pixel: &mut Rgba<u8>, color: [u8; 4], alpha: f64) {
    let source_alpha = alpha.clamp(0.0, 1.0) * f64::from(color[3]) / 255.0;
    for (channel, &source) in pixel.0.iter_mut().zip(color.iter()).take(3) {
        let mixed =
            f64::from(source).mul_add(source_alpha, f64::from(*channel) * (1.0 - source_alpha));
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
    let destination_alpha = f64::from(pixel.0[3]) / 255.0;
    let combined = source_alpha + destination_alpha * (1.0 - source_alpha);
    pixel.0[3] = (combined * 255.0).round().clamp(0.0, 255.0) as u8;
}
