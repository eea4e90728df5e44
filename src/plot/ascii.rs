//! ASCII/Unicode rendering for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - one glyph per line (`*`, `+`, `o`, `x`, `#`, cycling)
//! - zero reference line: `.` (only when the domain crosses zero)
//! - lines are aligned by index, not by date

use crate::chart::{ChartView, Sparkline, ValueDomain, scale_x};

const LINE_GLYPHS: [char; 5] = ['*', '+', 'o', 'x', '#'];
const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a chart view as a fixed-size text plot.
pub fn render_chart(view: &ChartView, width: usize, height: usize) -> String {
    let mut out = String::new();
    out.push_str(view.payload.title());
    out.push('\n');

    let Some(domain) = view.domain else {
        out.push_str("(no data to plot)\n");
        return out;
    };

    let width = width.max(10);
    let height = height.max(5);
    let mut grid = vec![vec![' '; width]; height];

    let lines = view.payload.lines();
    let max_len = lines.iter().map(|l| l.len()).max().unwrap_or(0);

    for (n, line) in lines.iter().enumerate() {
        let glyph = LINE_GLYPHS[n % LINE_GLYPHS.len()];
        let mut prev = None;
        for (i, p) in line.iter().enumerate() {
            let x = column(i, max_len, width);
            let y = row(p.value, &domain, height);
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, glyph),
                None => grid[y][x] = glyph,
            }
            prev = Some((x, y));
        }
    }

    if domain.crosses_zero {
        let zero_row = row(0.0, &domain, height);
        for cell in grid[zero_row].iter_mut() {
            if *cell == ' ' {
                *cell = '.';
            }
        }
    }

    out.push_str(&format!("y=[{:.2}, {:.2}]\n", domain.min, domain.max));
    for cells in grid {
        out.push_str(&cells.into_iter().collect::<String>());
        out.push('\n');
    }

    if let (Some(first), Some(last)) = (&view.first_date, &view.last_date) {
        out.push_str(&format!("{first} .. {last}\n"));
    }

    if let crate::domain::ChartPayload::Multi { series, .. } = &view.payload {
        let legend: Vec<String> = series
            .iter()
            .enumerate()
            .map(|(n, s)| format!("{} {}", LINE_GLYPHS[n % LINE_GLYPHS.len()], s.material))
            .collect();
        out.push_str(&legend.join("  "));
        out.push('\n');
    }

    out
}

/// One-row sparkline using block glyphs (trailing `width` values).
///
/// When the window is cut, the shown values get their own domain so the
/// bars still reach the bottom and top.
pub fn render_sparkline(spark: &Sparkline, width: usize) -> String {
    let skip = spark.values.len().saturating_sub(width);
    let domain = if skip == 0 {
        spark.domain
    } else {
        ValueDomain::of(spark.values[skip..].iter().copied())
    };
    let Some(domain) = domain else {
        return String::new();
    };

    let top = SPARK_BARS.len() - 1;
    spark.values[skip..]
        .iter()
        .map(|&v| SPARK_BARS[top - cell(domain.scale_y(v, top as f64), top)])
        .collect()
}

/// Grid column of point `index` out of `count`.
fn column(index: usize, count: usize, width: usize) -> usize {
    let last = width.max(2) - 1;
    cell(scale_x(index, count, last as f64), last)
}

/// Grid row of `value`; the domain max lands on row 0.
fn row(value: f64, domain: &ValueDomain, height: usize) -> usize {
    let last = height.max(2) - 1;
    cell(domain.scale_y(value, last as f64), last)
}

/// Round a scaled coordinate onto `0..=last`.
fn cell(coord: f64, last: usize) -> usize {
    (coord.round().max(0.0) as usize).min(last)
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
