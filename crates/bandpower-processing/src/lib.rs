//! Bandpower-Processing: windowed average-band-power feature extraction
//!
//! Per sub-band filtering and power averaging, sliding-window assembly,
//! event labels and the exclusion mask, wired together by [`FeatureExtractor`].

pub mod channels;
pub mod config;
pub mod features;
pub mod filters;
pub mod headset;
pub mod labels;
pub mod mask;
pub mod pipeline;
pub mod windowing;

pub use channels::{scalp_channel_indices, select_scalp_channels};
pub use config::{ExtractionConfig, SubBand};
pub use features::{zscore, BandPowerExtractor, FeatureSet, SubWindowGrid};
pub use filters::{BandPassFilter, FilterResponse, FirBandPass, IdentityFilter};
pub use headset::{is_bijection, HeadsetAligner, MontageInterpolator, NoInterpolation};
pub use labels::LabelMapper;
pub use mask::{ExclusionMask, ExclusionMasker};
pub use pipeline::{extract_features, Extraction, FeatureExtractor};
pub use windowing::WindowAssembler;
