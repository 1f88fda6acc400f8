//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - score profile: `-` line, x axis is `ln(scale)`
//! - profile minimum: `*`
//! - optional marker (e.g. a calibrated scale): `|` column

use crate::fit::ScoreProfile;

/// Render a score profile, optionally marking a scale with a vertical bar.
pub fn render_profile_plot(
    profile: &ScoreProfile,
    width: usize,
    height: usize,
    marker: Option<f64>,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let curve: Vec<(f64, f64)> = profile
        .points
        .iter()
        .filter(|p| p.total_score.is_finite())
        .map(|p| (p.scale.ln(), p.total_score))
        .collect();

    let (x_min, x_max) = x_range(&curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(&curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Marker first so the curve draws over it.
    if let Some(scale) = marker.filter(|s| s.is_finite() && *s > 0.0) {
        let x = map_x(scale.ln(), x_min, x_max, width);
        for row in grid.iter_mut() {
            row[x] = '|';
        }
    }

    draw_curve(&mut grid, &curve, x_min, x_max, y_min, y_max);

    let bx = map_x(profile.best.scale.ln(), x_min, x_max, width);
    let by = map_y(profile.best.total_score, y_min, y_max, height);
    grid[by][bx] = '*';

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | scale=[{:.3}, {:.3}] (log axis) | score=[{y_min:.4}, {y_max:.4}]\n",
        profile.score.display_name(),
        x_min.exp(),
        x_max.exp(),
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

fn x_range(curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in curve {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in curve {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
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
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let xx = map_x(x, x_min, x_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, xx, yy, '-');
        } else {
            grid[yy][xx] = '-';
        }
        prev = Some((xx, yy));
    }
}

/// Integer line drawing (Bresenham-ish). Only blank or marker cells are overwritten.
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
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            let cell = &mut grid[y0 as usize][x0 as usize];
            if *cell == ' ' || *cell == '|' {
                *cell = ch;
            }
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
    use crate::domain::{ProfilePoint, ScoreKind};

    fn profile() -> ScoreProfile {
        let e = std::f64::consts::E;
        let points = vec![
            ProfilePoint { scale: 1.0, total_score: 2.0 },
            ProfilePoint { scale: e, total_score: 0.0 },
            ProfilePoint { scale: e * e, total_score: 2.0 },
        ];
        ScoreProfile {
            score: ScoreKind::Log,
            best: points[1],
            points,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_profile_plot(&profile(), 10, 5, None);
        let expected = concat!(
            "Plot: LogScore | scale=[1.000, 7.389] (log axis) | score=[-0.1000, 2.1000]\n",
            "-        -\n",
            " -      -\n",
            "  --   -\n",
            "    - -\n",
            "     *\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn marker_draws_a_column() {
        let txt = render_profile_plot(&profile(), 10, 5, Some(1.0));
        let body: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(body.len(), 5);
        // The curve starts in the marker column, so only rows below it keep the bar.
        assert!(body[0].starts_with('-'));
        assert!(body[1..].iter().all(|row| row.starts_with('|')));
    }
}
