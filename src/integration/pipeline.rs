//! ViolationPipeline for combining the engine with an evidence sink.

use std::fmt::Display;

use image::RgbImage;
use tracing::warn;

use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::violation::{TrackedEntity, ViolationEngine, ViolationEvent};

use super::{EvidenceSink, IntoZones};

/// Bundles a [`ViolationEngine`] with an [`EvidenceSink`].
///
/// Every event the engine emits is handed to the sink on the same call. A
/// sink failure is logged and counted; it never stops the remaining events
/// of the frame and is never retried.
pub struct ViolationPipeline<S: EvidenceSink> {
    engine: ViolationEngine,
    sink: S,
    sink_failures: u64,
}

impl<S> ViolationPipeline<S>
where
    S: EvidenceSink,
    S::Error: Display,
{
    /// Create a new pipeline with the given sink and session config.
    pub fn new(sink: S, config: SessionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: ViolationEngine::new(config)?,
            sink,
            sink_failures: 0,
        })
    }

    /// Create a new pipeline with the default session config at the stream's fps.
    pub fn with_fps(sink: S, fps: f64) -> Result<Self, ConfigError> {
        Self::new(sink, SessionConfig::default().with_fps(fps))
    }

    /// Process a single frame of tracker output and this frame's zones.
    ///
    /// # Returns
    /// The violations that started on this frame, whether or not the sink
    /// accepted them.
    pub fn process_frame<Z: IntoZones>(
        &mut self,
        frame_id: u64,
        entities: &[TrackedEntity],
        zones: Z,
    ) -> Vec<ViolationEvent> {
        let zones = zones.into_zones();
        let events = self.engine.process_frame(frame_id, entities, &zones);
        for event in &events {
            let result = self.sink.record(event);
            self.note_failure(event, result);
        }
        events
    }

    /// Same as [`Self::process_frame`], handing the decoded frame to the sink
    /// so it can store image evidence.
    pub fn process_image_frame<Z: IntoZones>(
        &mut self,
        frame_id: u64,
        frame: &RgbImage,
        entities: &[TrackedEntity],
        zones: Z,
    ) -> Vec<ViolationEvent> {
        let zones = zones.into_zones();
        let events = self.engine.process_frame(frame_id, entities, &zones);
        for event in &events {
            let result = self.sink.record_with_frame(event, frame);
            self.note_failure(event, result);
        }
        events
    }

    fn note_failure(&mut self, event: &ViolationEvent, result: Result<(), S::Error>) {
        if let Err(err) = result {
            self.sink_failures += 1;
            warn!(
                frame_id = event.frame_id,
                track_id = event.track_id,
                error = %err,
                "failed to record violation evidence"
            );
        }
    }

    /// Number of events the sink rejected so far.
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures
    }

    /// Get a reference to the underlying engine.
    pub fn engine(&self) -> &ViolationEngine {
        &self.engine
    }

    /// Get a mutable reference to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut ViolationEngine {
        &mut self.engine
    }

    /// Get a reference to the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the underlying sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
