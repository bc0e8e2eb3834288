//! Conversions from zone detector output.

use ndarray::{Array2, ArrayView2};

use crate::violation::Zone;

/// Helper trait for converting a zone detector's output to [`Zone`]s.
///
/// Zones are re-detected every frame, so their count and order may change
/// between frames. Conversion keeps the input order, which is also the
/// priority order used when zones overlap.
pub trait IntoZones {
    fn into_zones(self) -> Vec<Zone>;
}

impl IntoZones for Vec<Zone> {
    fn into_zones(self) -> Vec<Zone> {
        self
    }
}

/// Rectangles in TLBR format, one per detected box.
impl IntoZones for Vec<[f32; 4]> {
    fn into_zones(self) -> Vec<Zone> {
        self.into_iter()
            .map(|[x1, y1, x2, y2]| Zone::from_rect(x1 as f64, y1 as f64, x2 as f64, y2 as f64))
            .collect()
    }
}

/// `N x 4` box tensor in TLBR format. Extra columns (score, class) are ignored;
/// arrays with fewer than four columns yield no zones.
impl IntoZones for ArrayView2<'_, f32> {
    fn into_zones(self) -> Vec<Zone> {
        if self.ncols() < 4 {
            return Vec::new();
        }
        self.rows()
            .into_iter()
            .map(|row| Zone::from_rect(row[0] as f64, row[1] as f64, row[2] as f64, row[3] as f64))
            .collect()
    }
}

impl IntoZones for &Array2<f32> {
    fn into_zones(self) -> Vec<Zone> {
        self.view().into_zones()
    }
}

impl IntoZones for Array2<f32> {
    fn into_zones(self) -> Vec<Zone> {
        self.view().into_zones()
    }
}
