//! Per-entity dwell-time state machine.

use std::collections::HashMap;

use nalgebra::Point2;
use tracing::debug;

use crate::config::{ReappearPolicy, SessionConfig};
use crate::error::ConfigError;
use crate::violation::dwell_state::{DwellState, ViolationSignal};

/// Tracks how long each entity has stayed still inside a zone.
///
/// Frames must be fed in stream order. The tracker owns all per-entity
/// state; one instance serves exactly one video session.
#[derive(Debug, Clone)]
pub struct DwellTracker {
    states: HashMap<u64, DwellState>,
    stop_frames: u32,
    move_threshold: f64,
    reappear_policy: ReappearPolicy,
    max_idle_frames: Option<u64>,
    frame_id: u64,
}

impl DwellTracker {
    /// Tracker with the default identity policy: resume after gaps, never evict.
    ///
    /// Parameters are trusted; public construction goes through
    /// [`DwellTracker::from_config`], which validates them.
    pub(crate) fn new(stop_frames: u32, move_threshold: f64) -> Self {
        Self {
            states: HashMap::new(),
            stop_frames: stop_frames.max(1),
            move_threshold,
            reappear_policy: ReappearPolicy::Resume,
            max_idle_frames: None,
            frame_id: 0,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut tracker = Self::new(config.stop_frames(), config.move_threshold_px);
        tracker.reappear_policy = config.reappear_policy;
        tracker.max_idle_frames = config.max_idle_frames;
        Ok(tracker)
    }

    /// Set the frame the following updates belong to.
    pub fn begin_frame(&mut self, frame_id: u64) {
        self.frame_id = frame_id;
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    pub fn stop_frames(&self) -> u32 {
        self.stop_frames
    }

    pub fn move_threshold(&self) -> f64 {
        self.move_threshold
    }

    /// Feed one observation of `track_id` at `position`.
    ///
    /// `zone` is the index of the zone the position fell in this frame, or
    /// `None` when it is outside every zone. Returns
    /// [`ViolationSignal::NewlyViolating`] only on the frame the stall count
    /// reaches the threshold.
    pub fn update(
        &mut self,
        track_id: u64,
        position: Point2<f64>,
        zone: Option<usize>,
    ) -> ViolationSignal {
        let frame_id = self.frame_id;

        if self.reappear_policy == ReappearPolicy::Restart {
            let gap = self
                .states
                .get(&track_id)
                .is_some_and(|s| frame_id > s.last_seen_frame.saturating_add(1));
            if gap {
                debug!(track_id, frame_id, "entity reappeared after gap, restarting dwell");
                self.states.remove(&track_id);
            }
        }

        let state = self
            .states
            .entry(track_id)
            .or_insert_with(|| DwellState::new(frame_id));
        state.last_seen_frame = frame_id;

        if zone.is_none() {
            state.stall_count = 0;
            state.last_position = Some(position);
            return ViolationSignal::None;
        }

        let Some(last) = state.last_position else {
            state.last_position = Some(position);
            state.stall_count = 0;
            return ViolationSignal::None;
        };

        let displacement = nalgebra::distance(&last, &position);
        if displacement >= self.move_threshold {
            state.stall_count = 0;
        } else {
            state.stall_count = state.stall_count.saturating_add(1);
        }
        state.last_position = Some(position);

        debug!(track_id, stall_count = state.stall_count, displacement, "dwell update");

        if state.stall_count == self.stop_frames {
            ViolationSignal::NewlyViolating
        } else if state.stall_count > self.stop_frames {
            ViolationSignal::StillViolating
        } else {
            ViolationSignal::None
        }
    }

    /// Mark an already known entity as present on the current frame without
    /// evaluating it. Position and stall count are left as they are.
    ///
    /// Returns `false` for unknown entities, which are not created.
    pub fn touch(&mut self, track_id: u64) -> bool {
        match self.states.get_mut(&track_id) {
            Some(state) => {
                state.last_seen_frame = self.frame_id;
                true
            }
            None => false,
        }
    }

    /// Drop entities unseen for more than the configured idle window.
    ///
    /// Returns the number of evicted entities. No-op without `max_idle_frames`.
    pub fn evict_stale(&mut self) -> usize {
        let Some(max_idle) = self.max_idle_frames else {
            return 0;
        };
        let frame_id = self.frame_id;
        let before = self.states.len();
        self.states
            .retain(|_, s| frame_id.saturating_sub(s.last_seen_frame) <= max_idle);
        let evicted = before - self.states.len();
        if evicted > 0 {
            debug!(evicted, frame_id, "evicted stale dwell states");
        }
        evicted
    }

    pub fn state(&self, track_id: u64) -> Option<&DwellState> {
        self.states.get(&track_id)
    }

    /// Current stall count, zero for unknown entities.
    pub fn stall_count(&self, track_id: u64) -> u32 {
        self.states.get(&track_id).map_or(0, |s| s.stall_count)
    }

    pub fn remove(&mut self, track_id: u64) -> Option<DwellState> {
        self.states.remove(&track_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_first_sighting_initializes() {
        let mut tracker = DwellTracker::new(3, 5.0);
        assert_eq!(tracker.update(1, p(10.0, 10.0), Some(0)), ViolationSignal::None);
        let state = tracker.state(1).unwrap();
        assert_eq!(state.last_position, Some(p(10.0, 10.0)));
        assert_eq!(state.stall_count, 0);
    }

    #[test]
    fn test_outside_zone_resets_and_records_position() {
        let mut tracker = DwellTracker::new(10, 5.0);
        for _ in 0..5 {
            tracker.update(1, p(10.0, 10.0), Some(0));
        }
        assert_eq!(tracker.stall_count(1), 4);

        assert_eq!(tracker.update(1, p(12.0, 10.0), None), ViolationSignal::None);
        assert_eq!(tracker.stall_count(1), 0);
        assert_eq!(tracker.state(1).unwrap().last_position, Some(p(12.0, 10.0)));

        // Re-entry measures displacement from the outside sample.
        tracker.update(1, p(13.0, 10.0), Some(0));
        assert_eq!(tracker.stall_count(1), 1);
    }

    #[test]
    fn test_displacement_at_threshold_resets() {
        let mut tracker = DwellTracker::new(10, 5.0);
        tracker.update(1, p(0.0, 0.0), Some(0));
        tracker.update(1, p(3.0, 0.0), Some(0));
        assert_eq!(tracker.stall_count(1), 1);
        // 3-4-5 triangle: exactly the threshold.
        tracker.update(1, p(6.0, 4.0), Some(0));
        assert_eq!(tracker.stall_count(1), 0);
    }

    #[test]
    fn test_threshold_edge_and_after() {
        let mut tracker = DwellTracker::new(2, 5.0);
        assert_eq!(tracker.update(7, p(1.0, 1.0), Some(0)), ViolationSignal::None);
        assert_eq!(tracker.update(7, p(1.0, 1.0), Some(0)), ViolationSignal::None);
        assert_eq!(
            tracker.update(7, p(1.0, 1.0), Some(0)),
            ViolationSignal::NewlyViolating
        );
        assert_eq!(
            tracker.update(7, p(1.0, 1.0), Some(0)),
            ViolationSignal::StillViolating
        );
    }

    #[test]
    fn test_zero_move_threshold_never_stalls() {
        let mut tracker = DwellTracker::new(1, 0.0);
        tracker.update(1, p(1.0, 1.0), Some(0));
        assert_eq!(tracker.update(1, p(1.0, 1.0), Some(0)), ViolationSignal::None);
        assert_eq!(tracker.stall_count(1), 0);
    }

    #[test]
    fn test_restart_policy_discards_state_after_gap() {
        let config = SessionConfig::default()
            .with_fps(1.0)
            .with_stop_time(10.0)
            .with_reappear_policy(ReappearPolicy::Restart);
        let mut tracker = DwellTracker::from_config(&config).unwrap();

        for frame in 0..4 {
            tracker.begin_frame(frame);
            tracker.update(1, p(5.0, 5.0), Some(0));
        }
        assert_eq!(tracker.stall_count(1), 3);

        tracker.begin_frame(10);
        assert_eq!(tracker.update(1, p(5.0, 5.0), Some(0)), ViolationSignal::None);
        assert_eq!(tracker.stall_count(1), 0);
        assert_eq!(tracker.state(1).unwrap().last_seen_frame, 10);
    }

    #[test]
    fn test_resume_policy_keeps_state_after_gap() {
        let mut tracker = DwellTracker::new(100, 5.0);
        for frame in 0..4 {
            tracker.begin_frame(frame);
            tracker.update(1, p(5.0, 5.0), Some(0));
        }
        tracker.begin_frame(50);
        tracker.update(1, p(5.0, 5.0), Some(0));
        assert_eq!(tracker.stall_count(1), 4);
    }

    #[test]
    fn test_evict_stale() {
        let config = SessionConfig::default().with_max_idle_frames(Some(5));
        let mut tracker = DwellTracker::from_config(&config).unwrap();

        tracker.begin_frame(0);
        tracker.update(1, p(0.0, 0.0), Some(0));
        tracker.update(2, p(50.0, 50.0), None);

        tracker.begin_frame(5);
        tracker.update(2, p(50.0, 50.0), None);
        assert_eq!(tracker.evict_stale(), 0);

        tracker.begin_frame(6);
        assert_eq!(tracker.evict_stale(), 1);
        assert!(tracker.state(1).is_none());
        assert!(tracker.state(2).is_some());
    }

    #[test]
    fn test_touch_only_refreshes_presence() {
        let mut tracker = DwellTracker::new(10, 5.0);
        tracker.begin_frame(0);
        tracker.update(1, p(5.0, 5.0), Some(0));
        tracker.update(1, p(5.0, 5.0), Some(0));

        tracker.begin_frame(3);
        assert!(tracker.touch(1));
        let state = tracker.state(1).unwrap();
        assert_eq!(state.last_seen_frame, 3);
        assert_eq!(state.stall_count, 1);
        assert_eq!(state.last_position, Some(p(5.0, 5.0)));

        assert!(!tracker.touch(2));
        assert!(tracker.state(2).is_none());
    }

    #[test]
    fn test_from_config_rejects_nan_move_threshold() {
        let config = SessionConfig::default().with_move_threshold(f64::NAN);
        assert!(matches!(
            DwellTracker::from_config(&config),
            Err(ConfigError::InvalidMoveThreshold(_))
        ));
    }

    #[test]
    fn test_evict_disabled_by_default() {
        let mut tracker = DwellTracker::new(3, 5.0);
        tracker.update(1, p(0.0, 0.0), Some(0));
        tracker.begin_frame(1_000_000);
        assert_eq!(tracker.evict_stale(), 0);
        assert_eq!(tracker.len(), 1);
    }
}
