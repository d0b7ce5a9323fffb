//! Plotters-powered chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - one draw path for any number of marker/line traces
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{ChartSpec, TraceMode};

/// Render-only view of a `ChartSpec`.
///
/// Bounds are computed outside the render call so the axis tick labels drawn
/// around the widget agree with what Plotters draws inside it.
pub struct KzPlottersChart<'a> {
    pub spec: &'a ChartSpec,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Point under the inspect cursor, drawn on top of everything else.
    pub cursor: Option<(f64, f64)>,
}

/// Parse `#rrggbb` into its components.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.strip_prefix('#')?;
    if h.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Ratatui colour for a trace (legend swatches).
pub fn trace_color(hex: &str) -> Color {
    parse_hex_color(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::White)
}

impl<'a> Widget for KzPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let spec = self.spec;
        let cursor = self.cursor;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Tick labels are drawn by the caller in terminal cells; keep only the axes.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&WHITE)
                .draw()?;

            for trace in spec.traces.iter().filter(|t| t.mode == TraceMode::Lines) {
                let (r, g, b) = parse_hex_color(&trace.style.color).unwrap_or((255, 255, 255));
                let color = RGBColor(r, g, b);
                chart.draw_series(LineSeries::new(
                    trace.points().filter(|(x, y)| x.is_finite() && y.is_finite()),
                    &color,
                ))?;
            }

            // Markers as single pixels: `plotters-ratatui-backend` maps circle
            // radii to normalized canvas units, producing huge circles.
            for trace in spec.traces.iter().filter(|t| t.mode == TraceMode::Markers) {
                let (r, g, b) = parse_hex_color(&trace.style.color).unwrap_or((255, 255, 255));
                let color = RGBColor(r, g, b);
                chart.draw_series(
                    trace
                        .points()
                        .filter(|(x, y)| x.is_finite() && y.is_finite())
                        .map(|p| Pixel::new(p, color)),
                )?;
            }

            if let Some(p) = cursor {
                chart.draw_series(std::iter::once(Pixel::new(p, RGBColor(255, 0, 0))))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#32cd32"), Some((50, 205, 50)));
        assert_eq!(parse_hex_color("#EF553B"), Some((239, 85, 59)));
        assert_eq!(parse_hex_color("limegreen"), None);
        assert_eq!(trace_color("#zzzzzz"), Color::White);
    }
}
