//! Sub-window band-power features

use bandpower_core::{BandpowerError, BandpowerResult, Recording};
use ndarray::{s, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ExtractionConfig, SubBand};
use crate::filters::BandPassFilter;
use crate::mask::ExclusionMask;

/// Standard deviation below which a channel is treated as flat
const FLAT_CHANNEL_STD: f64 = 1e-12;

/// Fixed-length sub-windows laid out on the sample axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubWindowGrid {
    /// Sub-window length in samples
    pub sub_frame: usize,
    /// Distance between sub-window starts in samples
    pub step_frame: usize,
    /// Number of sub-windows fitting in the recording
    pub count: usize,
}

impl SubWindowGrid {
    /// Grid of sub-windows for `n_samples` samples
    ///
    /// Lengths are rounded half away from zero to whole samples. Only
    /// sub-windows lying entirely inside the recording are kept.
    pub fn new(
        sampling_rate: f64,
        sub_window_length: f64,
        step: f64,
        n_samples: usize,
    ) -> BandpowerResult<Self> {
        let sub_frame = (sampling_rate * sub_window_length).round() as usize;
        let step_frame = (sampling_rate * step).round() as usize;

        if sub_frame == 0 || step_frame == 0 {
            return Err(BandpowerError::InvalidConfig {
                reason: format!(
                    "sub-window ({} s) and step ({} s) must span at least one sample at {} Hz",
                    sub_window_length, step, sampling_rate
                ),
            });
        }

        let count = if n_samples >= sub_frame {
            (n_samples - sub_frame) / step_frame + 1
        } else {
            0
        };

        if count == 0 {
            return Err(BandpowerError::InvalidRecording {
                reason: format!(
                    "recording shorter than one sub-window ({} < {} samples)",
                    n_samples, sub_frame
                ),
            });
        }

        Ok(Self {
            sub_frame,
            step_frame,
            count,
        })
    }

    /// Grid for a recording under the given configuration
    pub fn for_recording(recording: &Recording, config: &ExtractionConfig) -> BandpowerResult<Self> {
        Self::new(
            recording.sampling_rate,
            config.sub_window_length,
            config.step,
            recording.sample_count(),
        )
    }

    /// First sample of sub-window `j`
    pub fn start(&self, j: usize) -> usize {
        j * self.step_frame
    }

    /// Effective step in seconds after rounding to whole samples
    pub fn step_seconds(&self, sampling_rate: f64) -> f64 {
        self.step_frame as f64 / sampling_rate
    }

    /// Start time in seconds of every sub-window
    pub fn times(&self, sampling_rate: f64) -> Vec<f64> {
        (0..self.count)
            .map(|j| self.start(j) as f64 / sampling_rate)
            .collect()
    }
}

/// Z-normalize every row over time
///
/// Uses the sample standard deviation (N - 1). Flat rows are only centred.
pub fn zscore(data: &Array2<f64>) -> Array2<f64> {
    let mut normalized = data.clone();
    for (channel, mut row) in normalized.outer_iter_mut().enumerate() {
        let n = row.len();
        if n == 0 {
            continue;
        }
        let mean = row.sum() / n as f64;
        let std = if n > 1 { row.std(1.0) } else { 0.0 };

        if std <= FLAT_CHANNEL_STD {
            warn!(channel, "flat channel, centring without scaling");
            row.mapv_inplace(|v| v - mean);
        } else {
            row.mapv_inplace(|v| (v - mean) / std);
        }
    }
    normalized
}

/// Mean instantaneous power per channel, sub-band and sub-window
pub struct BandPowerExtractor<'a> {
    filter: &'a dyn BandPassFilter,
    subbands: &'a [SubBand],
    filter_order: usize,
}

impl<'a> BandPowerExtractor<'a> {
    pub fn new(filter: &'a dyn BandPassFilter, config: &'a ExtractionConfig) -> Self {
        Self {
            filter,
            subbands: &config.subbands,
            filter_order: config.filter_order,
        }
    }

    /// Band powers stacked band-major: (channels · bands) × sub-windows
    pub fn extract(&self, recording: &Recording, grid: &SubWindowGrid) -> BandpowerResult<Array2<f64>> {
        let n_channels = recording.channel_count();
        let mut features = Array2::zeros((n_channels * self.subbands.len(), grid.count));

        for (m, band) in self.subbands.iter().enumerate() {
            let filtered = self.filter.filter(
                &recording.data,
                recording.sampling_rate,
                *band,
                self.filter_order,
            )?;

            if filtered.dim() != recording.data.dim() {
                return Err(BandpowerError::FilterFailed {
                    low_hz: band.low_hz,
                    high_hz: band.high_hz,
                    reason: format!(
                        "filter '{}' returned shape {:?}, expected {:?}",
                        self.filter.name(),
                        filtered.dim(),
                        recording.data.dim()
                    ),
                });
            }

            let power = zscore(&filtered).mapv(|v| v * v);
            let mut block = features.slice_mut(s![m * n_channels..(m + 1) * n_channels, ..]);

            for j in 0..grid.count {
                let start = grid.start(j);
                let window = power.slice(s![.., start..start + grid.sub_frame]);
                let mean_power = window.mean_axis(Axis(1)).ok_or_else(|| {
                    BandpowerError::InvalidRecording {
                        reason: "empty sub-window".to_string(),
                    }
                })?;
                block.column_mut(j).assign(&mean_power);
            }

            debug!(
                band = m,
                low_hz = band.low_hz,
                high_hz = band.high_hz,
                sub_windows = grid.count,
                "band power computed"
            );
        }

        Ok(features)
    }
}

/// Extracted features for one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Recording identifier
    pub name: String,
    /// Channels contributing to the features
    pub n_channels: usize,
    /// Feature dimension × output samples
    #[serde(with = "bandpower_core::matrix_rows")]
    pub samples: Array2<f64>,
    /// Event labels per output sample
    pub labels: Vec<Vec<String>>,
    /// Start time of every output sample in seconds
    pub times: Vec<f64>,
    /// Excluded samples and reasons
    pub mask: ExclusionMask,
}

impl FeatureSet {
    pub fn sample_count(&self) -> usize {
        self.samples.ncols()
    }

    pub fn feature_dimension(&self) -> usize {
        self.samples.nrows()
    }

    /// Indices of samples not excluded by the mask
    pub fn included_indices(&self) -> Vec<usize> {
        (0..self.sample_count())
            .filter(|&i| !self.mask.is_excluded(i))
            .collect()
    }

    /// Feature matrix restricted to included samples
    pub fn included_samples(&self) -> Array2<f64> {
        self.samples.select(Axis(1), &self.included_indices())
    }
}
