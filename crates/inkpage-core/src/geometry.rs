//! Pure geometry helpers for erase-gesture detection.
//!
//! Nothing in here touches a surface or any capture state, so every function
//! can be exercised directly from tests.

use crate::config::EraseConfig;
use kurbo::Point;
use std::f64::consts::{FRAC_PI_2, PI};

/// Orientation test: true when `a`, `b`, `c` wind counter-clockwise.
fn ccw(a: Point, b: Point, c: Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Check whether segment `p1-p2` crosses segment `p3-p4`.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    ccw(p1, p3, p4) != ccw(p2, p3, p4) && ccw(p1, p2, p3) != ccw(p1, p2, p4)
}

/// Check whether any segment of polyline `a` crosses any segment of `b`.
///
/// Polylines with fewer than two points have no segments and never intersect.
pub fn polylines_intersect(a: &[Point], b: &[Point]) -> bool {
    a.windows(2).any(|sa| {
        b.windows(2)
            .any(|sb| segments_intersect(sa[0], sa[1], sb[0], sb[1]))
    })
}

/// Wrap an angle difference into `[-π, π]`.
fn wrap_angle(mut diff: f64) -> f64 {
    while diff > PI {
        diff -= 2.0 * PI;
    }
    while diff < -PI {
        diff += 2.0 * PI;
    }
    diff
}

/// Count the sharp turns (over 90°) along a polyline.
///
/// Directions are measured between samples `i - 2` and `i`. Displacements
/// shorter than `noise` are skipped and do not update the previous direction.
pub fn count_direction_reversals(points: &[Point], noise: f64) -> usize {
    let mut reversals = 0;
    let mut prev_angle: Option<f64> = None;

    for i in 2..points.len() {
        let delta = points[i] - points[i - 2];
        if delta.hypot() < noise {
            continue;
        }

        let angle = delta.atan2();
        if let Some(prev) = prev_angle {
            if wrap_angle(angle - prev).abs() > FRAC_PI_2 {
                reversals += 1;
            }
        }
        prev_angle = Some(angle);
    }

    reversals
}

/// Check whether a polyline looks like a back-and-forth scribble.
pub fn is_scratch_pattern(points: &[Point], config: &EraseConfig) -> bool {
    if points.len() < config.min_points {
        return false;
    }

    let reversals = count_direction_reversals(points, config.noise_threshold);
    log::debug!(
        "scratch check: {} points, {} reversals (need {})",
        points.len(),
        reversals,
        config.min_reversals
    );
    reversals >= config.min_reversals
}
