use nalgebra::Point2;

/// Outcome of a single dwell update for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationSignal {
    /// Not (yet) violating
    #[default]
    None,
    /// Stall count just reached the threshold; report this one
    NewlyViolating,
    /// Past the threshold in an episode that was already reported
    StillViolating,
}

/// Per-entity dwell bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct DwellState {
    /// Most recent observed center, inside a zone or not
    pub last_position: Option<Point2<f64>>,
    /// Consecutive in-zone frames below the movement threshold
    pub stall_count: u32,
    /// Frame on which the tracker last reported this entity
    pub last_seen_frame: u64,
}

impl DwellState {
    pub fn new(frame_id: u64) -> Self {
        Self {
            last_position: None,
            stall_count: 0,
            last_seen_frame: frame_id,
        }
    }
}
