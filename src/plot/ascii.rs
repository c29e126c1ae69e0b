//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements, per series in column order:
//! - raw points: `o`, `x`, `+`, `*`
//! - best-fit line or curve: `-`, `~`, `=`, `:`
//! - crossing point of a pair: `@`

use crate::domain::Analysis;

const POINT_GLYPHS: [char; 4] = ['o', 'x', '+', '*'];
const FIT_GLYPHS: [char; 4] = ['-', '~', '=', ':'];
const INTERSECTION_GLYPH: char = '@';

/// Render raw points, fitted shapes and the intersection marker.
pub fn render_ascii_plot(analysis: &Analysis, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let fits: Vec<Vec<(f64, f64)>> = analysis
        .series
        .iter()
        .map(|s| {
            let (xs, ys) = s.fit.shape.to_xy();
            xs.into_iter().zip(ys).collect()
        })
        .collect();

    let (x_min, x_max) = x_range(&analysis.x);
    let (y_min, y_max) = y_range(analysis, &fits).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Fits first so points can overlay.
    for (i, fit) in fits.iter().enumerate() {
        draw_curve(&mut grid, fit, (x_min, x_max), (y_min, y_max), FIT_GLYPHS[i % FIT_GLYPHS.len()]);
    }

    for (i, s) in analysis.series.iter().enumerate() {
        let glyph = POINT_GLYPHS[i % POINT_GLYPHS.len()];
        for (&x, &y) in analysis.x.iter().zip(s.data.iter()) {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = glyph;
        }
    }

    if let Some(hit) = analysis.intersection {
        let col = map_x(hit.time, x_min, x_max, width);
        let row = map_y(hit.voltage, y_min, y_max, height);
        grid[row][col] = INTERSECTION_GLYPH;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    out.push_str(&legend(analysis));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn legend(analysis: &Analysis) -> String {
    let mut parts: Vec<String> = analysis
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", POINT_GLYPHS[i % POINT_GLYPHS.len()], s.name))
        .collect();
    if analysis.intersection.is_some() {
        parts.push(format!("{INTERSECTION_GLYPH} intersection"));
    }
    format!("Legend: {}\n", parts.join("  "))
}

fn x_range(xs: &[f64]) -> (f64, f64) {
    let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) }
}

fn y_range(analysis: &Analysis, fits: &[Vec<(f64, f64)>]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let raw = analysis.series.iter().flat_map(|s| s.data.iter().copied());
    let fitted = fits.iter().flat_map(|f| f.iter().map(|&(_, y)| y));
    for y in raw.chain(fitted) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        Some((min_y - 0.5, max_y + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y max is row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], xr: (f64, f64), yr: (f64, f64), ch: char) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, xr.0, xr.1, width);
        let row = map_y(y, yr.0, yr.1, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None => {
                if grid[row][col] == ' ' {
                    grid[row][col] = ch;
                }
            }
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham). Only fills empty cells.
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
