use std::path::Path;

use plotters::prelude::*;

use crate::data::matrix::TargetVector;
use crate::data::ratings::{MAX_RATING, MIN_RATING};
use crate::error::{Error, Result};
use crate::eval::coefficients::FeatureWeight;
use crate::eval::loo::Predictions;

/// Plot dimensions in pixels.
const PLOT_SIZE: (u32, u32) = (800, 600);

/// Padding factor for axis ranges (5% of range).
const PLOT_PADDING: f64 = 0.05;

/// Default padding when a range is degenerate.
const DEFAULT_PADDING: f64 = 0.5;

/// Scatter of out-of-fold predictions against actual ratings, with the
/// identity line; points far from the line are the divergence report's
/// albums.
pub fn plot_predicted_vs_actual(
    predictions: &Predictions,
    truth: &TargetVector,
    path: &Path,
) -> Result<()> {
    render_scatter(predictions, truth, path).map_err(|e| Error::Plot(e.to_string()))
}

fn render_scatter(
    predictions: &Predictions,
    truth: &TargetVector,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let points: Vec<(f64, f64)> = truth
        .iter()
        .filter_map(|(album, actual)| predictions.get(album).map(|p| (actual, p)))
        .collect();

    // Axis range covers the rating scale and any prediction that escapes it.
    let mut low = MIN_RATING;
    let mut high = MAX_RATING;
    for &(actual, predicted) in &points {
        low = low.min(actual).min(predicted);
        high = high.max(actual).max(predicted);
    }
    let padding = ((high - low) * PLOT_PADDING).max(DEFAULT_PADDING * PLOT_PADDING);
    let range = (low - padding)..(high + padding);

    let mut chart = ChartBuilder::on(&root)
        .caption("Predicted vs actual ratings", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(range.clone(), range)?;

    chart
        .configure_mesh()
        .x_desc("Actual rating")
        .y_desc("Predicted rating")
        .draw()?;

    chart.draw_series(LineSeries::new(
        vec![(low, low), (high, high)],
        &BLACK.mix(0.4),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Signed bar chart of per-feature weights from the full-dataset fit.
pub fn plot_feature_weights(weights: &[FeatureWeight], path: &Path) -> Result<()> {
    render_weights(weights, path).map_err(|e| Error::Plot(e.to_string()))
}

fn render_weights(
    weights: &[FeatureWeight],
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let min_w = weights.iter().map(|w| w.weight).fold(0.0f64, f64::min);
    let max_w = weights.iter().map(|w| w.weight).fold(0.0f64, f64::max);
    let padding = if (max_w - min_w).abs() < f64::EPSILON {
        DEFAULT_PADDING
    } else {
        (max_w - min_w) * PLOT_PADDING
    };

    let names: Vec<&str> = weights.iter().map(|w| w.feature.as_str()).collect();
    let mut chart = ChartBuilder::on(&root)
        .caption("Feature weights", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(40)
        .build_cartesian_2d(0..weights.len(), (min_w - padding)..(max_w + padding))?;

    chart
        .configure_mesh()
        .x_labels(weights.len())
        .x_label_formatter(&|idx| names.get(*idx).map(|n| n.to_string()).unwrap_or_default())
        .y_desc("Weight")
        .draw()?;

    chart.draw_series(weights.iter().enumerate().map(|(i, w)| {
        let color = if w.weight >= 0.0 { BLUE } else { RED };
        let (y0, y1) = if w.weight >= 0.0 {
            (0.0, w.weight)
        } else {
            (w.weight, 0.0)
        };
        Rectangle::new([(i, y0), (i + 1, y1)], color.mix(0.6).filled())
    }))?;

    root.present()?;
    Ok(())
}
