//! Frame-level orchestration of zone lookup and dwell tracking.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::violation::dwell_state::ViolationSignal;
use crate::violation::dwell_tracker::DwellTracker;
use crate::violation::event::{TrackedEntity, ViolationEvent};
use crate::violation::zone::{Zone, locate};

/// Turns per-frame tracker output into violation events.
///
/// Entities missing from a frame keep their dwell state untouched until
/// they return (or are evicted, when `max_idle_frames` is configured).
#[derive(Debug, Clone)]
pub struct ViolationEngine {
    config: SessionConfig,
    tracker: DwellTracker,
    last_frame: Option<u64>,
}

impl ViolationEngine {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let tracker = DwellTracker::from_config(&config)?;
        Ok(Self {
            config,
            tracker,
            last_frame: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tracker(&self) -> &DwellTracker {
        &self.tracker
    }

    pub fn stop_frames(&self) -> u32 {
        self.tracker.stop_frames()
    }

    /// Evaluate one frame and return the violations that started on it.
    ///
    /// Each entity is evaluated at most once, in input order. Entities with an
    /// invalid box are skipped: their position and stall count stay as they
    /// were, but they still count as present for gap and idle tracking.
    /// Degenerate zones never match.
    pub fn process_frame(
        &mut self,
        frame_id: u64,
        entities: &[TrackedEntity],
        zones: &[Zone],
    ) -> Vec<ViolationEvent> {
        if let Some(last) = self.last_frame.filter(|&last| frame_id <= last) {
            warn!(frame_id, last_frame = last, "frame arrived out of order");
        }
        self.last_frame = Some(frame_id);
        self.tracker.begin_frame(frame_id);

        let degenerate = zones.iter().filter(|z| z.is_degenerate()).count();
        if degenerate > 0 {
            warn!(frame_id, degenerate, "ignoring degenerate zones");
        }

        let mut seen = HashSet::with_capacity(entities.len());
        let mut events = Vec::new();

        for entity in entities {
            if !seen.insert(entity.track_id) {
                debug!(frame_id, track_id = entity.track_id, "duplicate entity in frame");
                continue;
            }
            if !entity.bbox.is_valid() {
                warn!(
                    frame_id,
                    track_id = entity.track_id,
                    bbox = ?entity.bbox,
                    "skipping invalid bounding box"
                );
                self.tracker.touch(entity.track_id);
                continue;
            }

            let position = entity.bbox.center();
            let hit = locate(&position, zones);
            let signal = self
                .tracker
                .update(entity.track_id, position, hit.map(|(idx, _)| idx));

            if signal != ViolationSignal::NewlyViolating {
                continue;
            }
            let Some((zone_index, zone)) = hit else {
                continue;
            };

            info!(
                frame_id,
                track_id = entity.track_id,
                zone_index,
                x = position.x,
                y = position.y,
                "stationary in restricted zone"
            );
            events.push(ViolationEvent {
                track_id: entity.track_id,
                frame_id,
                zone_index,
                zone: zone.clone(),
                position,
                bbox: entity.bbox,
                stall_frames: self.tracker.stall_count(entity.track_id),
            });
        }

        self.tracker.evict_stale();
        events
    }

    /// Drop all per-entity state, e.g. when the stream restarts.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.last_frame = None;
    }
}
