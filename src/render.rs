// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Headless trajectory plot.
//!
//! Rendering is explicit setup: the renderer is built once from config and
//! handed only the finished happiness series. Output is an SVG document held
//! in memory and base64-encoded; nothing touches the filesystem.

use base64::Engine;
use plotters::prelude::*;
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::{Error, Result};

pub const PLOT_TITLE: &str = "Relationship Dynamics with Periodic Effort (Floquet-Markov)";

const PERSON_A: RGBColor = RGBColor(0x00, 0xFF, 0xFF);
const PERSON_B: RGBColor = RGBColor(0xFF, 0x00, 0xFF);
const Y_RANGE: std::ops::Range<f64> = -1.1..1.1;

/// Turns happiness trajectories into a base64-encoded image.
pub trait TrajectoryRenderer: Send + Sync {
    fn render(&self, times: &[f64], data_a: &[f64], data_b: &[f64]) -> Result<String>;
}

/// plotters SVG backend on a dark background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgRenderer {
    width: u32,
    height: u32,
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.width, config.height)
    }

    /// Raw SVG text.
    pub fn render_svg(&self, times: &[f64], data_a: &[f64], data_b: &[f64]) -> Result<String> {
        if times.len() != data_a.len() || times.len() != data_b.len() {
            return Err(Error::Render(format!(
                "series lengths differ: {} times, {} A, {} B",
                times.len(),
                data_a.len(),
                data_b.len()
            )));
        }

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            root.fill(&BLACK).map_err(render_err)?;

            let t0 = times.first().copied().unwrap_or(0.0);
            let mut t1 = times.last().copied().unwrap_or(1.0);
            if t1 <= t0 {
                t1 = t0 + 1.0;
            }

            let mut chart = ChartBuilder::on(&root)
                .caption(PLOT_TITLE, ("sans-serif", 22).into_font().color(&WHITE))
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(t0..t1, Y_RANGE)
                .map_err(render_err)?;

            chart
                .configure_mesh()
                .x_desc("time")
                .y_desc("happiness")
                .axis_style(WHITE)
                .light_line_style(WHITE.mix(0.08))
                .bold_line_style(WHITE.mix(0.2))
                .label_style(("sans-serif", 14).into_font().color(&WHITE))
                .draw()
                .map_err(render_err)?;

            chart
                .draw_series(DashedLineSeries::new(
                    [(t0, 0.0), (t1, 0.0)],
                    2,
                    5,
                    WHITE.mix(0.5).stroke_width(1),
                ))
                .map_err(render_err)?;

            chart
                .draw_series(LineSeries::new(
                    times.iter().copied().zip(data_a.iter().copied()),
                    PERSON_A.stroke_width(2),
                ))
                .map_err(render_err)?
                .label("Person A")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PERSON_A.stroke_width(2)));

            chart
                .draw_series(DashedLineSeries::new(
                    times.iter().copied().zip(data_b.iter().copied()),
                    8,
                    5,
                    PERSON_B.stroke_width(2),
                ))
                .map_err(render_err)?
                .label("Person B")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PERSON_B.stroke_width(2)));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font(("sans-serif", 14).into_font().color(&WHITE))
                .background_style(BLACK.mix(0.8))
                .border_style(WHITE)
                .draw()
                .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }

        debug!(bytes = svg.len(), points = times.len(), "trajectory plot rendered");
        Ok(svg)
    }
}

impl TrajectoryRenderer for SvgRenderer {
    fn render(&self, times: &[f64], data_a: &[f64], data_b: &[f64]) -> Result<String> {
        let svg = self.render_svg(times, data_a, data_b)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(svg))
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.3).collect();
        let a = times.iter().map(|t| t.cos()).collect();
        let b = times.iter().map(|t| -(0.5 * t).sin()).collect();
        (times, a, b)
    }

    #[test]
    fn test_render_decodes_to_svg() {
        let (t, a, b) = series(200);
        let encoded = SvgRenderer::new(800, 480).render(&t, &a, &b).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Relationship Dynamics"));
        let upper = svg.to_uppercase();
        assert!(upper.contains("#00FFFF"));
        assert!(upper.contains("#FF00FF"));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let (t, a, _) = series(10);
        let err = SvgRenderer::new(400, 300).render(&t, &a, &a[..5]).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_single_point_still_renders() {
        let svg = SvgRenderer::new(400, 300).render_svg(&[0.0], &[1.0], &[1.0]).unwrap();
        assert!(svg.contains("Person A"));
    }

    #[test]
    fn test_renderer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SvgRenderer>();
    }
}
