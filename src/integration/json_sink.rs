//! JSON evidence log writer.
//!
//! Writes one pretty-printed JSON file per violation, in the shape the
//! reporting dashboard joins videos to logs by (`time`, `plate`, `type`,
//! `image`). Given the frame, [`EvidenceSink::record_with_frame`] also saves
//! the vehicle crop as a JPEG at [`JsonLogSink::image_path`].

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use image::imageops;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{EvidenceSink, PlateReader};
use crate::error::EvidenceError;
use crate::violation::ViolationEvent;

/// Label written to the `type` field unless overridden.
pub const DEFAULT_VIOLATION_TYPE: &str = "Stop in Yellow Box";

const TIME_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Structured log entry for one violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub time: String,
    pub plate: String,
    #[serde(rename = "type")]
    pub violation_type: String,
    /// Image reference relative to the evidence image root
    pub image: String,
    pub track_id: u64,
    pub frame_id: u64,
    pub zone_index: usize,
    pub position: [f64; 2],
}

/// [`EvidenceSink`] writing [`EvidenceRecord`]s as JSON files.
pub struct JsonLogSink {
    image_dir: PathBuf,
    log_dir: PathBuf,
    violation_type: String,
    plate_reader: Option<Box<dyn PlateReader>>,
}

impl JsonLogSink {
    /// Create the sink, creating both directories if needed.
    pub fn new(
        image_dir: impl Into<PathBuf>,
        log_dir: impl Into<PathBuf>,
    ) -> Result<Self, EvidenceError> {
        let image_dir = image_dir.into();
        let log_dir = log_dir.into();
        fs::create_dir_all(&image_dir)?;
        fs::create_dir_all(&log_dir)?;
        Ok(Self {
            image_dir,
            log_dir,
            violation_type: DEFAULT_VIOLATION_TYPE.to_string(),
            plate_reader: None,
        })
    }

    pub fn with_violation_type(mut self, violation_type: impl Into<String>) -> Self {
        self.violation_type = violation_type.into();
        self
    }

    pub fn with_plate_reader(mut self, reader: impl PlateReader + 'static) -> Self {
        self.plate_reader = Some(Box::new(reader));
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Where the evidence image for `event` is expected to live.
    pub fn image_path(&self, event: &ViolationEvent) -> PathBuf {
        self.image_dir.join(format!("{}.jpg", file_stem(event)))
    }

    pub fn log_path(&self, event: &ViolationEvent) -> PathBuf {
        self.log_dir.join(format!("{}.json", file_stem(event)))
    }

    /// Build the record for `event` without writing it.
    pub fn build_record(&mut self, event: &ViolationEvent) -> EvidenceRecord {
        let plate = self
            .plate_reader
            .as_mut()
            .and_then(|reader| reader.read_plate(event))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "N/A".to_string());

        let image_root = self
            .image_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let image = if image_root.is_empty() {
            format!("{}.jpg", file_stem(event))
        } else {
            format!("{}/{}.jpg", image_root, file_stem(event))
        };

        EvidenceRecord {
            time: chrono::Local::now().format(TIME_FORMAT).to_string(),
            plate,
            violation_type: self.violation_type.clone(),
            image,
            track_id: event.track_id,
            frame_id: event.frame_id,
            zone_index: event.zone_index,
            position: [event.position.x, event.position.y],
        }
    }
}

impl EvidenceSink for JsonLogSink {
    type Error = EvidenceError;

    fn record(&mut self, event: &ViolationEvent) -> Result<(), Self::Error> {
        let record = self.build_record(event);
        let path = self.log_path(event);
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json)?;
        info!(
            track_id = event.track_id,
            plate = %record.plate,
            path = %path.display(),
            "evidence saved"
        );
        Ok(())
    }

    /// Save the vehicle crop from `frame`, then the log record.
    ///
    /// When the box does not overlap the frame there is nothing to save, and
    /// neither file is written.
    fn record_with_frame(
        &mut self,
        event: &ViolationEvent,
        frame: &RgbImage,
    ) -> Result<(), Self::Error> {
        let Some(crop) = event.bbox.clamp_to(frame.width(), frame.height()) else {
            warn!(
                track_id = event.track_id,
                frame_id = event.frame_id,
                bbox = ?event.bbox,
                "empty vehicle crop, skipping evidence"
            );
            return Ok(());
        };

        let vehicle = imageops::crop_imm(
            frame,
            crop.x1 as u32,
            crop.y1 as u32,
            crop.width() as u32,
            crop.height() as u32,
        )
        .to_image();
        vehicle.save(self.image_path(event))?;
        self.record(event)
    }
}

fn file_stem(event: &ViolationEvent) -> String {
    format!("violation_f{}_id{}", event.frame_id, event.track_id)
}
