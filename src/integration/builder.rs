//! Builder for creating Zone objects from various input formats.

use nalgebra::Point2;

use crate::violation::Zone;

/// Builder for creating [`Zone`] objects from boxes or hand-drawn polygons.
#[derive(Debug, Clone, Default)]
pub struct ZoneBuilder {
    points: Vec<Point2<f64>>,
    label: Option<String>,
}

impl ZoneBuilder {
    /// Create a new zone builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zone to a rectangle in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.points = Zone::from_rect(x1, y1, x2, y2).points;
        self
    }

    /// Set the zone to a rectangle in XYWH format (center_x, center_y, width, height).
    pub fn xywh(self, cx: f64, cy: f64, w: f64, h: f64) -> Self {
        self.tlbr(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }

    /// Append one polygon vertex.
    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.points.push(Point2::new(x, y));
        self
    }

    /// Append polygon vertices in order, e.g. from a hand-drawn junction outline.
    pub fn points<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        self.points
            .extend(points.into_iter().map(|(x, y)| Point2::new(x, y)));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build the final `Zone`.
    pub fn build(self) -> Zone {
        Zone {
            points: self.points,
            label: self.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xywh_matches_tlbr() {
        let a = ZoneBuilder::new().xywh(50.0, 50.0, 20.0, 10.0).build();
        let b = ZoneBuilder::new().tlbr(40.0, 45.0, 60.0, 55.0).build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_polygon_points() {
        let zone = ZoneBuilder::new()
            .points([(700.0, 350.0), (1200.0, 350.0), (1550.0, 720.0)])
            .point(650.0, 720.0)
            .label("yellow box")
            .build();

        assert_eq!(zone.points.len(), 4);
        assert_eq!(zone.label.as_deref(), Some("yellow box"));
        assert!(zone.contains(&Point2::new(950.0, 500.0)));
    }
}
