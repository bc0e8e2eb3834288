//! Integration module for connecting the violation engine with its collaborators.
//!
//! This module provides traits and utilities for feeding zone detector output
//! into the engine and handing detected violations to evidence storage.

mod builder;
mod json_sink;
mod pipeline;
mod sink;
mod zones;

pub use builder::ZoneBuilder;
pub use json_sink::{DEFAULT_VIOLATION_TYPE, EvidenceRecord, JsonLogSink};
pub use pipeline::ViolationPipeline;
pub use sink::{EvidenceSink, MemorySink, PlateReader};
pub use zones::IntoZones;
