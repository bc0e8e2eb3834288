//! Traits for the collaborators that persist and enrich violation evidence.

use image::RgbImage;

use crate::violation::ViolationEvent;

/// Destination for violation events.
///
/// Implement this to persist evidence (images, log records, database rows).
/// The engine considers an event delivered once it is handed over; retries
/// and verification belong to the implementation.
///
/// # Example
///
/// ```ignore
/// use dwellzone_rs::{EvidenceSink, ViolationEvent};
///
/// struct StdoutSink;
///
/// impl EvidenceSink for StdoutSink {
///     type Error = std::io::Error;
///
///     fn record(&mut self, event: &ViolationEvent) -> Result<(), Self::Error> {
///         println!("track {} stopped in zone {}", event.track_id, event.zone_index);
///         Ok(())
///     }
/// }
/// ```
pub trait EvidenceSink {
    /// Error type for persistence failures.
    type Error;

    /// Persist a single violation.
    fn record(&mut self, event: &ViolationEvent) -> Result<(), Self::Error>;

    /// Persist a violation together with the frame it was detected on.
    ///
    /// Sinks that store images override this. The default ignores the frame.
    fn record_with_frame(
        &mut self,
        event: &ViolationEvent,
        frame: &RgbImage,
    ) -> Result<(), Self::Error> {
        let _ = frame;
        self.record(event)
    }
}

/// Source of license plate text for a violating vehicle.
///
/// Any `FnMut(&ViolationEvent) -> Option<String>` closure is a plate reader,
/// so an OCR backend can be plugged in without a wrapper type.
pub trait PlateReader {
    fn read_plate(&mut self, event: &ViolationEvent) -> Option<String>;
}

impl<F> PlateReader for F
where
    F: FnMut(&ViolationEvent) -> Option<String>,
{
    fn read_plate(&mut self, event: &ViolationEvent) -> Option<String> {
        self(event)
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Vec<ViolationEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViolationEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<ViolationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EvidenceSink for MemorySink {
    type Error = std::convert::Infallible;

    fn record(&mut self, event: &ViolationEvent) -> Result<(), Self::Error> {
        self.events.push(event.clone());
        Ok(())
    }
}
