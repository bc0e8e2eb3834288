use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::violation::rect::BBox;
use crate::violation::zone::Zone;

/// One tracker output row for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedEntity {
    pub track_id: u64,
    pub bbox: BBox,
}

impl TrackedEntity {
    pub fn new(track_id: u64, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            track_id,
            bbox: BBox::from_tlbr(x1, y1, x2, y2),
        }
    }
}

/// A newly detected "stationary inside restricted zone" violation.
///
/// Emitted once per episode, on the frame the stall threshold is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationEvent {
    pub track_id: u64,
    pub frame_id: u64,
    /// Index of the matched zone in that frame's zone list
    pub zone_index: usize,
    pub zone: Zone,
    /// Box center the violation was detected at
    pub position: Point2<f64>,
    pub bbox: BBox,
    /// Stall count at emission; equals the session's stop frames
    pub stall_frames: u32,
}
