//! Multichannel EEG recording container

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{BandpowerError, BandpowerResult};
use crate::events::Event;
use crate::montage::ChannelInfo;

/// Continuous recording: channels × samples plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Recording identifier
    pub name: String,
    /// Signal values, one row per channel
    #[serde(with = "crate::matrix_rows")]
    pub data: Array2<f64>,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Channel metadata, one entry per data row
    pub channels: Vec<ChannelInfo>,
    /// Event table
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Recording {
    /// Create a validated recording
    pub fn new(
        name: impl Into<String>,
        data: Array2<f64>,
        sampling_rate: f64,
        channels: Vec<ChannelInfo>,
        events: Vec<Event>,
    ) -> BandpowerResult<Self> {
        let recording = Self {
            name: name.into(),
            data,
            sampling_rate,
            channels,
            events,
        };
        recording.validate()?;
        Ok(recording)
    }

    /// Check rate, shape and sample values
    pub fn validate(&self) -> BandpowerResult<()> {
        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(BandpowerError::InvalidRecording {
                reason: format!("sampling rate must be positive, got {}", self.sampling_rate),
            });
        }

        if self.data.nrows() != self.channels.len() {
            return Err(BandpowerError::ChannelMismatch {
                expected: self.channels.len(),
                actual: self.data.nrows(),
            });
        }

        if self.data.iter().any(|v| !v.is_finite()) {
            return Err(BandpowerError::InvalidRecording {
                reason: "signal contains NaN or infinite values".to_string(),
            });
        }

        Ok(())
    }

    pub fn channel_count(&self) -> usize {
        self.data.nrows()
    }

    pub fn sample_count(&self) -> usize {
        self.data.ncols()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.sample_count() as f64 / self.sampling_rate
    }

    /// Copy of the recording restricted to the given channel rows
    pub fn select_channels(&self, indices: &[usize]) -> BandpowerResult<Recording> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.channel_count()) {
            return Err(BandpowerError::InvalidRecording {
                reason: format!(
                    "channel index {} out of range for {} channels",
                    bad,
                    self.channel_count()
                ),
            });
        }

        Ok(Recording {
            name: self.name.clone(),
            data: self.data.select(Axis(0), indices),
            sampling_rate: self.sampling_rate,
            channels: indices.iter().map(|&i| self.channels[i].clone()).collect(),
            events: self.events.clone(),
        })
    }

    /// Export recording as JSON
    pub fn to_json(&self) -> BandpowerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Import and validate a recording from JSON
    pub fn from_json(json: &str) -> BandpowerResult<Self> {
        let recording: Recording = serde_json::from_str(json)?;
        recording.validate()?;
        Ok(recording)
    }
}
