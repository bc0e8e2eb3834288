mod dwell_state;
mod dwell_tracker;
mod engine;
mod event;
mod rect;
mod zone;

pub use dwell_state::{DwellState, ViolationSignal};
pub use dwell_tracker::DwellTracker;
pub use engine::ViolationEngine;
pub use event::{TrackedEntity, ViolationEvent};
pub use rect::BBox;
pub use zone::{Zone, locate};
