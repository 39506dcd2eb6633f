use crate::models::SweepResults;
use camino::Utf8Path;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error as StdError;
use std::fs;
use std::ops::Range;
use thiserror::Error;

/// Figure size in inches (width, height)
pub const FIGURE_SIZE_IN: (u32, u32) = (14, 10);

/// Raster resolution
pub const DPI: u32 = 300;

/// Pixels per typographic point at [`DPI`]
const PX_PER_PT: f64 = DPI as f64 / 72.0;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to render figure {path}: {message}")]
    Render { path: String, message: String },
}

/// One of the four charts
struct Panel {
    title: &'static str,
    y_label: &'static str,
    color: RGBColor,
    values: Vec<f64>,
}

/// Pixel size of the whole figure
pub fn figure_pixels() -> (u32, u32) {
    (FIGURE_SIZE_IN.0 * DPI, FIGURE_SIZE_IN.1 * DPI)
}

fn px(points: f64) -> u32 {
    (points * PX_PER_PT).round() as u32
}

fn font_px(points: f64) -> f64 {
    points * PX_PER_PT
}

/// Axis range covering `values` with 5% padding on both sides.
///
/// No values gives `0..1`; a single value (or a flat series) gets a unit-wide band.
pub fn axis_range(values: &[f64]) -> Range<f64> {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let span = max - min;
    if span.abs() < f64::EPSILON {
        let pad = if min.abs() > 0.0 { min.abs() * 0.05 } else { 1.0 };
        return (min - pad)..(max + pad);
    }

    let pad = span * 0.05;
    (min - pad)..(max + pad)
}

/// Where the "Optimal" marker goes on the electron chart: (thickness μm, electrons)
pub fn optimum_marker(results: &SweepResults) -> Option<(f64, f64)> {
    results
        .optimal()
        .map(|p| (f64::from(p.thickness.micrometers()), p.measurement.electrons))
}

/// Render the 2×2 sweep figure as a PNG at `path`.
pub fn render_figure(
    results: &SweepResults,
    material: &str,
    path: &Utf8Path,
) -> Result<(), PlotError> {
    if let Some(parent) = path.parent() {
        if !parent.as_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| render_error(path, &e))?;
        }
    }

    draw_figure(results, material, path).map_err(|e| render_error(path, &*e))?;

    tracing::info!("Plot saved as '{}'", path);
    Ok(())
}

fn render_error(path: &Utf8Path, error: &dyn StdError) -> PlotError {
    PlotError::Render {
        path: path.to_string(),
        message: error.to_string(),
    }
}

fn draw_figure(
    results: &SweepResults,
    material: &str,
    path: &Utf8Path,
) -> Result<(), Box<dyn StdError>> {
    let points = results.points();
    let xs: Vec<f64> = points
        .iter()
        .map(|p| f64::from(p.thickness.micrometers()))
        .collect();

    let panels = [
        Panel {
            title: "Total Light Output",
            y_label: "Scintillation Photons Created",
            color: BLUE,
            values: points
                .iter()
                .map(|p| p.measurement.photons_created as f64)
                .collect(),
        },
        Panel {
            title: "Detected Signal (Photoelectrons)",
            y_label: "Photoelectrons Generated",
            color: RED,
            values: points.iter().map(|p| p.measurement.electrons).collect(),
        },
        Panel {
            title: "Light Collection Efficiency",
            y_label: "Detection Efficiency (%)",
            color: GREEN,
            values: points
                .iter()
                .map(|p| p.measurement.detection_efficiency)
                .collect(),
        },
        Panel {
            title: "Collected Scintillation Photons",
            y_label: "Photons Detected at PD",
            color: MAGENTA,
            values: points
                .iter()
                .map(|p| p.measurement.photons_detected as f64)
                .collect(),
        },
    ];

    let root = BitMapBackend::new(path.as_std_path(), figure_pixels()).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!("{} Thickness Optimization for TDI Camera", material);
    let body = root.titled(
        &title,
        FontDesc::new(FontFamily::SansSerif, font_px(16.0), FontStyle::Bold),
    )?;
    let areas = body.split_evenly((2, 2));

    let x_label = format!("{} Thickness (μm)", material);
    let optimum = optimum_marker(results);

    for (idx, (panel, area)) in panels.iter().zip(areas.iter()).enumerate() {
        // the photoelectron chart is the second panel
        let marker = if idx == 1 { optimum } else { None };
        draw_panel(area, panel, &xs, &x_label, marker)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &Panel,
    xs: &[f64],
    x_label: &str,
    optimum: Option<(f64, f64)>,
) -> Result<(), Box<dyn StdError>> {
    let x_range = axis_range(xs);

    // leave headroom for the annotation, which sits 5% above the peak
    let y_range = match optimum {
        Some((_, peak)) => {
            let mut values = panel.values.clone();
            values.push(peak * 1.12);
            axis_range(&values)
        }
        None => axis_range(&panel.values),
    };

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, ("sans-serif", font_px(13.0)))
        .margin(px(10.0))
        .x_label_area_size(px(40.0))
        .y_label_area_size(px(70.0))
        .build_cartesian_2d(x_range, y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(panel.y_label)
        .axis_desc_style(("sans-serif", font_px(12.0)))
        .label_style(("sans-serif", font_px(10.0)))
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.08))
        .draw()?;

    let series: Vec<(f64, f64)> = xs.iter().copied().zip(panel.values.iter().copied()).collect();

    chart.draw_series(LineSeries::new(
        series.iter().copied(),
        panel.color.stroke_width(px(2.0)),
    ))?;
    chart.draw_series(
        series
            .iter()
            .map(|&point| Circle::new(point, px(3.0), panel.color.filled())),
    )?;

    if let Some((x, peak)) = optimum {
        let marker_width = px(2.0);
        chart.draw_series(dashes(y_range.start, y_range.end, 40).into_iter().map(
            move |(y0, y1)| {
                PathElement::new(
                    vec![(x, y0), (x, y1)],
                    GREEN.mix(0.7).stroke_width(marker_width),
                )
            },
        ))?;

        let label_style = FontDesc::new(FontFamily::SansSerif, font_px(10.0), FontStyle::Bold)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        let line_height = font_px(12.0).round() as i32;

        chart.draw_series(std::iter::once(
            EmptyElement::at((x, peak * 1.05))
                + Text::new("Optimal:".to_string(), (0, -line_height), label_style.clone())
                + Text::new(format!("{}μm", x), (0, 0), label_style),
        ))?;
    }

    Ok(())
}

/// Split `start..end` into `count` dash segments with equal gaps
fn dashes(start: f64, end: f64, count: usize) -> Vec<(f64, f64)> {
    let step = (end - start) / (count * 2) as f64;
    (0..count)
        .map(|i| {
            let y0 = start + step * (2 * i) as f64;
            (y0, y0 + step)
        })
        .collect()
}
