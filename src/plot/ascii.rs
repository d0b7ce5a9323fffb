//! ASCII plotting of a `ChartSpec` for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - marker traces: `o`
//! - line traces: `-` for the first, then `*`, `+`, `#`, ... per trace

use crate::chart::{AxisKind, ChartSpec, TraceMode};

const LINE_GLYPHS: [char; 8] = ['-', '*', '+', '#', '=', '~', ':', '%'];
const MARKER_GLYPH: char = 'o';

/// Render `spec` into a `width` x `height` character grid with a header and legend.
pub fn render_chart_ascii(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut out = String::new();
    out.push_str(&spec.title);
    out.push('\n');

    let Some(([x_min, x_max], [y_min, y_max])) = spec.bounds() else {
        out.push_str("(no data)\n");
        return out;
    };

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers overlay them.
    let mut legend = Vec::with_capacity(spec.traces.len());
    let mut line_idx = 0usize;
    for trace in spec.traces.iter().filter(|t| t.mode == TraceMode::Lines) {
        let glyph = LINE_GLYPHS[line_idx % LINE_GLYPHS.len()];
        line_idx += 1;
        let points: Vec<(f64, f64)> = trace.points().collect();
        draw_curve(&mut grid, &points, [x_min, x_max], [y_min, y_max], glyph);
        legend.push((glyph, trace.name.as_str()));
    }
    for trace in spec.traces.iter().filter(|t| t.mode == TraceMode::Markers) {
        for (x, y) in trace.points() {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = MARKER_GLYPH;
        }
        legend.push((MARKER_GLYPH, trace.name.as_str()));
    }

    out.push_str(&format!(
        "Plot: {}=[{}, {}] | {}=[{}, {}]\n",
        spec.x_axis.label,
        fmt_x(x_min, spec.x_axis.kind),
        fmt_x(x_max, spec.x_axis.kind),
        spec.y_axis.label,
        fmt_y(y_min),
        fmt_y(y_max),
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    for (glyph, name) in legend {
        out.push_str(&format!("  {glyph} {name}\n"));
    }

    out
}

fn fmt_x(v: f64, kind: AxisKind) -> String {
    match kind {
        AxisKind::Year => format!("{v:.0}"),
        AxisKind::Linear => format!("{v:.2}"),
    }
}

fn fmt_y(v: f64) -> String {
    format!("{v:.2}")
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], xb: [f64; 2], yb: [f64; 2], glyph: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let col = map_x(x, xb[0], xb[1], width);
        let row = map_y(y, yb[0], yb[1], height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, glyph),
            None => {
                if grid[row][col] == ' ' {
                    grid[row][col] = glyph;
                }
            }
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Axis, Trace, TraceStyle};

    fn style() -> TraceStyle {
        TraceStyle { color: "#000000".into(), marker_symbol: None, marker_size: None, line_width: None }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let spec = ChartSpec {
            title: "Kuznets environmental curve for A".into(),
            x_axis: Axis { label: "gdp".into(), kind: AxisKind::Linear },
            y_axis: Axis { label: "dep".into(), kind: AxisKind::Linear },
            height: None,
            traces: vec![
                Trace {
                    name: "A".into(),
                    mode: TraceMode::Markers,
                    x: vec![1.0, 10.0],
                    y: vec![100.0, 110.0],
                    hover: Vec::new(),
                    style: style(),
                },
                Trace {
                    name: "Trend Line".into(),
                    mode: TraceMode::Lines,
                    x: vec![1.0, 10.0],
                    y: vec![100.0, 100.0],
                    hover: Vec::new(),
                    style: style(),
                },
            ],
        };

        let txt = render_chart_ascii(&spec, 10, 5);
        let expected = concat!(
            "Kuznets environmental curve for A\n",
            "Plot: gdp=[1.00, 10.00] | dep=[99.50, 110.50]\n",
            "         o\n",
            "\n",
            "\n",
            "\n",
            "o---------\n",
            "  - Trend Line\n",
            "  o A\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_chart_says_so() {
        let spec = ChartSpec {
            title: "Empty".into(),
            x_axis: Axis { label: "x".into(), kind: AxisKind::Year },
            y_axis: Axis { label: "y".into(), kind: AxisKind::Linear },
            height: None,
            traces: Vec::new(),
        };
        assert_eq!(render_chart_ascii(&spec, 20, 5), "Empty\n(no data)\n");
    }
}
