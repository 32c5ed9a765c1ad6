//! End-to-end feature extraction for one recording

use bandpower_core::{BandpowerResult, ExtractionError, Recording};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::channels::select_scalp_channels;
use crate::config::ExtractionConfig;
use crate::features::{BandPowerExtractor, FeatureSet, SubWindowGrid};
use crate::filters::{BandPassFilter, FirBandPass};
use crate::headset::{HeadsetAligner, MontageInterpolator, NoInterpolation};
use crate::labels::LabelMapper;
use crate::mask::ExclusionMasker;
use crate::windowing::WindowAssembler;

/// Feature set together with the configuration that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub features: FeatureSet,
    pub config: ExtractionConfig,
}

impl Extraction {
    /// Export extraction as JSON
    pub fn to_json(&self) -> BandpowerResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Band-power feature extractor with injected filter and interpolator
pub struct FeatureExtractor {
    filter: Box<dyn BandPassFilter>,
    interpolator: Box<dyn MontageInterpolator>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    /// FIR band-pass filtering, no headset interpolation
    pub fn new() -> Self {
        Self {
            filter: Box::new(FirBandPass::new()),
            interpolator: Box::new(NoInterpolation),
        }
    }

    pub fn with_filter(mut self, filter: impl BandPassFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_interpolator(mut self, interpolator: impl MontageInterpolator + 'static) -> Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    /// Extract windowed band-power features from `recording`
    ///
    /// The first error aborts the extraction; it is logged and returned
    /// wrapped in an [`ExtractionError`]. The recording is never modified.
    pub fn extract(
        &self,
        recording: &Recording,
        config: &ExtractionConfig,
    ) -> Result<Extraction, ExtractionError> {
        info!(
            recording = %recording.name,
            channels = recording.channel_count(),
            samples = recording.sample_count(),
            filter = self.filter.name(),
            "starting feature extraction"
        );

        match self.run(recording, config) {
            Ok(features) => {
                info!(
                    recording = %recording.name,
                    feature_dimension = features.feature_dimension(),
                    samples = features.sample_count(),
                    excluded = features.mask.excluded_count(),
                    "feature extraction finished"
                );
                Ok(Extraction {
                    features,
                    config: config.clone(),
                })
            }
            Err(source) => {
                let err = ExtractionError::new(recording.name.clone(), source);
                error!(recording = %recording.name, status = %err.status, "{}", err);
                Err(err)
            }
        }
    }

    fn run(&self, recording: &Recording, config: &ExtractionConfig) -> BandpowerResult<FeatureSet> {
        config.validate()?;
        recording.validate()?;

        let scalp = select_scalp_channels(recording)?;
        if scalp.channel_count() == 0 {
            return Err(bandpower_core::recording_error!(
                "recording '{}' has no scalp channels",
                recording.name
            ));
        }

        let aligned = HeadsetAligner::new(self.interpolator.as_ref())
            .align(scalp, config.target_headset.as_ref())?;
        let sampling_rate = aligned.sampling_rate;

        let grid = SubWindowGrid::for_recording(&aligned, config)?;
        debug!(
            sub_frame = grid.sub_frame,
            step_frame = grid.step_frame,
            sub_windows = grid.count,
            "sub-window grid"
        );

        let band_power = BandPowerExtractor::new(self.filter.as_ref(), config).extract(&aligned, &grid)?;
        let samples = WindowAssembler::from_config(config)?.assemble(&band_power);
        debug!(rows = samples.nrows(), columns = samples.ncols(), "windows assembled");

        let times = grid.times(sampling_rate);
        let labels = LabelMapper::for_grid(&grid, sampling_rate).map(&aligned.events, grid.count);
        let mask = ExclusionMasker::new(sampling_rate).build(&times, &aligned.events);

        Ok(FeatureSet {
            name: recording.name.clone(),
            n_channels: aligned.channel_count(),
            samples,
            labels,
            times,
            mask,
        })
    }
}

/// Extract features with the default FIR filter and no interpolation
pub fn extract_features(
    recording: &Recording,
    config: &ExtractionConfig,
) -> Result<Extraction, ExtractionError> {
    FeatureExtractor::new().extract(recording, config)
}
