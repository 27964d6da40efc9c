//! Raster plot of the temperature profile, T(x) against x.
//!
//! Only ever drawn from a [`ResultSnapshot`], never from a run in flight.

use crate::snapshot::{ResultSnapshot, SnapshotCell};
use crate::{ResultsError, ResultsResult};
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;
use std::sync::Arc;

pub const PLOT_WIDTH: u32 = 800;
pub const PLOT_HEIGHT: u32 = 500;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const CURVE: Rgb<u8> = Rgb([200, 60, 30]);

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 40;
const GRID_DIVISIONS: u32 = 5;

/// Data range mapped onto the plotting area.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x_min: f64,
    x_max: f64,
    t_min: f64,
    t_max: f64,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn new(snapshot: &ResultSnapshot, width: u32, height: u32) -> Self {
        let positions = &snapshot.result.positions;
        let x_min = positions.first().copied().unwrap_or(0.0);
        let mut x_max = positions.last().copied().unwrap_or(1.0);
        if x_max <= x_min {
            x_max = x_min + 1.0;
        }

        let (mut t_min, mut t_max) = snapshot
            .result
            .temperatures
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });
        if !t_min.is_finite() || !t_max.is_finite() {
            t_min = 0.0;
            t_max = 1.0;
        }
        // flat profile (Tb == Tinf)
        if t_max - t_min < 1e-9 {
            t_min -= 1.0;
            t_max += 1.0;
        }

        Self {
            x_min,
            x_max,
            t_min,
            t_max,
            left: f64::from(MARGIN_LEFT),
            right: f64::from(width.saturating_sub(MARGIN_RIGHT + 1)),
            top: f64::from(MARGIN_TOP),
            bottom: f64::from(height.saturating_sub(MARGIN_BOTTOM + 1)),
        }
    }

    fn to_pixel(&self, x: f64, t: f64) -> (f64, f64) {
        let u = (x - self.x_min) / (self.x_max - self.x_min);
        let v = (t - self.t_min) / (self.t_max - self.t_min);
        (
            self.left + u * (self.right - self.left),
            self.bottom - v * (self.bottom - self.top),
        )
    }
}

/// Draw the profile of `snapshot` into a fresh `width` x `height` image.
pub fn render_profile(snapshot: &ResultSnapshot, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let frame = Frame::new(snapshot, width, height);

    for i in 0..=GRID_DIVISIONS {
        let f = f64::from(i) / f64::from(GRID_DIVISIONS);
        let x = frame.left + f * (frame.right - frame.left);
        let y = frame.top + f * (frame.bottom - frame.top);
        draw_line(&mut img, (x, frame.top), (x, frame.bottom), GRID, 1);
        draw_line(&mut img, (frame.left, y), (frame.right, y), GRID, 1);
    }
    draw_line(
        &mut img,
        (frame.left, frame.bottom),
        (frame.right, frame.bottom),
        AXIS,
        1,
    );
    draw_line(
        &mut img,
        (frame.left, frame.top),
        (frame.left, frame.bottom),
        AXIS,
        1,
    );

    let points: Vec<(f64, f64)> = snapshot
        .result
        .samples()
        .map(|(x, t)| frame.to_pixel(x, t))
        .collect();
    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], CURVE, 2);
    }
    img
}

/// Render `snapshot` at the default size and save it as PNG.
pub fn write_png(snapshot: &ResultSnapshot, path: &Path) -> ResultsResult<()> {
    render_profile(snapshot, PLOT_WIDTH, PLOT_HEIGHT).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Plot the current snapshot to `path`. Refuses when there is none.
pub fn export_png(cell: &SnapshotCell, path: &Path) -> ResultsResult<Arc<ResultSnapshot>> {
    let snapshot = cell.get().ok_or(ResultsError::NoSnapshot)?;
    write_png(&snapshot, path)?;
    tracing::info!(path = %path.display(), run_id = %snapshot.run_id, "profile plot exported");
    Ok(snapshot)
}

fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>, thickness: u32) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    for s in 0..=steps {
        let f = f64::from(s) / f64::from(steps);
        let x = (from.0 + f * dx).round() as i64;
        let y = (from.1 + f * dy).round() as i64;
        for ox in 0..i64::from(thickness) {
            for oy in 0..i64::from(thickness) {
                put(img, x + ox, y + oy, color);
            }
        }
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    img.put_pixel(x as u32, y as u32, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fin_solver::{FinParameters, solve};

    fn snapshot(params: FinParameters) -> ResultSnapshot {
        ResultSnapshot::new(params, solve(params, 50).unwrap())
    }

    #[test]
    fn base_sample_sits_at_top_left() {
        let snap = snapshot(FinParameters::default());
        let frame = Frame::new(&snap, PLOT_WIDTH, PLOT_HEIGHT);
        let (px, py) = frame.to_pixel(0.0, snap.result.base_temperature().unwrap());
        assert_eq!(px, f64::from(MARGIN_LEFT));
        assert_eq!(py, f64::from(MARGIN_TOP));

        let img = render_profile(&snap, PLOT_WIDTH, PLOT_HEIGHT);
        assert_eq!(img.dimensions(), (PLOT_WIDTH, PLOT_HEIGHT));
        assert_eq!(*img.get_pixel(px as u32, py as u32), CURVE);
    }

    #[test]
    fn tip_sample_is_on_the_right_edge() {
        let snap = snapshot(FinParameters::default());
        let frame = Frame::new(&snap, PLOT_WIDTH, PLOT_HEIGHT);
        let tip = snap.result.tip_temperature().unwrap();
        let (px, py) = frame.to_pixel(0.03, tip);
        assert_eq!(px, f64::from(PLOT_WIDTH - MARGIN_RIGHT - 1));
        // coolest point of a cooling fin
        assert_eq!(py, f64::from(PLOT_HEIGHT - MARGIN_BOTTOM - 1));
    }

    #[test]
    fn flat_profile_still_renders() {
        let params = FinParameters {
            t_base: 600.0,
            t_inf: 600.0,
            ..FinParameters::default()
        };
        let img = render_profile(&snapshot(params), 120, 90);
        assert!(img.pixels().any(|p| *p == CURVE));
    }

    #[test]
    fn export_png_requires_snapshot() {
        let cell = SnapshotCell::new();
        let path = std::env::temp_dir().join("fin_results_no_snapshot.png");
        let _ = std::fs::remove_file(&path);
        let err = export_png(&cell, &path).unwrap_err();
        assert!(matches!(err, ResultsError::NoSnapshot));
        assert!(!path.exists());
    }
}
