//! Restricted zones and point containment.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Distance in pixels within which a point counts as lying on a zone edge.
const BOUNDARY_EPS: f64 = 1e-6;

/// Closed polygon marking a restricted area (e.g. a yellow box junction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Ordered vertices, implicitly closed (last connects back to first).
    pub points: Vec<Point2<f64>>,
    /// Optional name carried into evidence records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Zone {
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        Self {
            points,
            label: None,
        }
    }

    /// Axis-aligned rectangle zone from TLBR corners, as produced by a box detector.
    pub fn from_rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(vec![
            Point2::new(x1, y1),
            Point2::new(x2, y1),
            Point2::new(x2, y2),
            Point2::new(x1, y2),
        ])
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Signed shoelace area; positive for counter-clockwise vertex order.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// A zone that can never match: fewer than three vertices, a non-finite
    /// vertex, or no enclosed area.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
            || self.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite())
            || self.signed_area().abs() <= f64::EPSILON
    }

    /// Inclusive containment: points on an edge or vertex are inside.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        if self.is_degenerate() || !point.x.is_finite() || !point.y.is_finite() {
            return false;
        }

        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[j];
            let b = self.points[i];
            if on_segment(point, &a, &b) {
                return true;
            }
            if (b.y > point.y) != (a.y > point.y) {
                let x_cross = (a.x - b.x) * (point.y - b.y) / (a.y - b.y) + b.x;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

fn on_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> bool {
    let ab = b - a;
    let ap = p - a;
    let len = ab.norm();
    if len == 0.0 {
        return ap.norm() <= BOUNDARY_EPS;
    }
    let cross = ab.x * ap.y - ab.y * ap.x;
    if cross.abs() > BOUNDARY_EPS * len {
        return false;
    }
    let dot = ap.dot(&ab);
    dot >= -BOUNDARY_EPS * len && dot <= ab.norm_squared() + BOUNDARY_EPS * len
}

/// Resolve the zone a position falls in.
///
/// Zones are tested in slice order and the first containing zone wins, so
/// callers set priority by ordering. Degenerate zones never match.
/// Returns the zone's index in `zones` alongside the zone itself.
pub fn locate<'a>(position: &Point2<f64>, zones: &'a [Zone]) -> Option<(usize, &'a Zone)> {
    zones
        .iter()
        .enumerate()
        .find(|(_, zone)| zone.contains(position))
}
