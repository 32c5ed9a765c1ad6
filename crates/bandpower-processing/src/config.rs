//! Configuration for band-power feature extraction

use bandpower_core::{config_error, BandpowerError, BandpowerResult, Headset};
use serde::{Deserialize, Serialize};

use crate::mask::TAIL_EXCLUSION;

/// Relative tolerance when checking that sub-windows tile a window
const RATIO_TOLERANCE: f64 = 1e-9;

/// Frequency band in Hz, serialized as a `[low, high]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct SubBand {
    /// Lower edge (Hz), 0 for a lowpass
    pub low_hz: f64,
    /// Upper edge (Hz)
    pub high_hz: f64,
}

impl SubBand {
    pub fn new(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }

    /// Width of the band in Hz
    pub fn width(&self) -> f64 {
        self.high_hz - self.low_hz
    }

    /// True when both edges are finite, ordered and non-negative
    pub fn is_well_formed(&self) -> bool {
        self.low_hz.is_finite()
            && self.high_hz.is_finite()
            && self.low_hz >= 0.0
            && self.high_hz > self.low_hz
    }
}

impl From<(f64, f64)> for SubBand {
    fn from((low_hz, high_hz): (f64, f64)) -> Self {
        Self { low_hz, high_hz }
    }
}

impl From<SubBand> for (f64, f64) {
    fn from(band: SubBand) -> Self {
        (band.low_hz, band.high_hz)
    }
}

/// Extraction parameters
///
/// Missing fields take their default values when deserialized, so a
/// partial JSON document such as `{"step": 0.5}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sub-bands in output order
    pub subbands: Vec<SubBand>,
    /// Band-pass filter order
    pub filter_order: usize,
    /// Window length in seconds
    pub window_length: f64,
    /// Sub-window length in seconds, must divide `window_length`
    pub sub_window_length: f64,
    /// Step between consecutive sub-windows in seconds
    pub step: f64,
    /// Optional headset to align recordings to
    pub target_headset: Option<Headset>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            subbands: vec![SubBand::new(0.0, 50.0)],
            filter_order: 500,
            window_length: 1.0,
            sub_window_length: 0.25,
            step: 0.25,
            target_headset: None,
        }
    }
}

impl ExtractionConfig {
    /// Classic EEG rhythm bands: delta, theta, alpha, beta, gamma
    pub fn canonical_bands() -> Self {
        Self::default().with_subbands(vec![
            SubBand::new(1.0, 4.0),
            SubBand::new(4.0, 8.0),
            SubBand::new(8.0, 13.0),
            SubBand::new(13.0, 30.0),
            SubBand::new(30.0, 45.0),
        ])
    }

    pub fn with_subbands(mut self, subbands: Vec<SubBand>) -> Self {
        self.subbands = subbands;
        self
    }

    pub fn with_filter_order(mut self, filter_order: usize) -> Self {
        self.filter_order = filter_order;
        self
    }

    pub fn with_target_headset(mut self, headset: Headset) -> Self {
        self.target_headset = Some(headset);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> BandpowerResult<()> {
        if self.subbands.is_empty() {
            return Err(config_error!("at least one sub-band is required"));
        }

        for (index, band) in self.subbands.iter().enumerate() {
            if !band.is_well_formed() {
                return Err(config_error!(
                    "sub-band {} [{}, {}] Hz is malformed",
                    index,
                    band.low_hz,
                    band.high_hz
                ));
            }
        }

        if self.filter_order == 0 {
            return Err(config_error!("filter order must be greater than 0"));
        }

        for (name, value) in [
            ("window_length", self.window_length),
            ("sub_window_length", self.sub_window_length),
            ("step", self.step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(config_error!("{} must be positive, got {}", name, value));
            }
        }

        let ratio = self.window_length / self.sub_window_length;
        if ratio < 1.0 - RATIO_TOLERANCE || (ratio - ratio.round()).abs() > RATIO_TOLERANCE * ratio {
            return Err(config_error!(
                "sub_window_length {} must divide window_length {}",
                self.sub_window_length,
                self.window_length
            ));
        }

        // Shifted blocks leave sub_window_count - 1 stale trailing columns,
        // all of which must fall inside the excluded tail
        let stale = self.sub_window_count() - 1;
        if stale > TAIL_EXCLUSION {
            return Err(config_error!(
                "window_length {} holds {} sub-windows, at most {} are supported",
                self.window_length,
                self.sub_window_count(),
                TAIL_EXCLUSION + 1
            ));
        }

        if let Some(headset) = &self.target_headset {
            headset.validate()?;
        }

        Ok(())
    }

    /// Number of sub-windows aggregated into one window
    pub fn sub_window_count(&self) -> usize {
        (self.window_length / self.sub_window_length).round() as usize
    }

    /// Rows of the feature matrix for `n_channels` channels
    pub fn feature_dimension(&self, n_channels: usize) -> usize {
        n_channels * self.subbands.len() * self.sub_window_count()
    }

    /// Export configuration as JSON
    pub fn to_json(&self) -> BandpowerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BandpowerError::Serialization {
            reason: format!("Failed to serialize configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> BandpowerResult<Self> {
        serde_json::from_str(json).map_err(|e| BandpowerError::Serialization {
            reason: format!("Failed to deserialize configuration: {}", e),
        })
    }
}
