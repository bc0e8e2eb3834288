//! Detection of vehicles that stop inside restricted zones.
//!
//! Consumes per-frame tracker output (track ids and bounding boxes) plus the
//! restricted zones visible in that frame, and reports each "stationary
//! inside zone" episode exactly once, on the frame it crosses the dwell
//! threshold.
//!
//! ```ignore
//! use dwellzone_rs::{SessionConfig, TrackedEntity, ViolationEngine, Zone};
//!
//! let mut engine = ViolationEngine::new(SessionConfig::default().with_fps(25.0))?;
//! let zones = vec![Zone::from_rect(700.0, 350.0, 1200.0, 720.0)];
//! let tracks = vec![TrackedEntity::new(3, 900.0, 400.0, 1000.0, 480.0)];
//! for event in engine.process_frame(0, &tracks, &zones) {
//!     println!("track {} violated on frame {}", event.track_id, event.frame_id);
//! }
//! ```

pub mod config;
pub mod error;
pub mod integration;
pub mod violation;

pub use config::{ReappearPolicy, SessionConfig};
pub use error::{ConfigError, EvidenceError};
pub use integration::{EvidenceSink, IntoZones, JsonLogSink, ViolationPipeline, ZoneBuilder};
pub use violation::{
    BBox, DwellState, DwellTracker, TrackedEntity, ViolationEngine, ViolationEvent,
    ViolationSignal, Zone, locate,
};
