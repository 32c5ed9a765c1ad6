//! Alignment of recordings to a target headset layout
//!
//! Interpolating a recording onto a different montage is delegated to a
//! [`MontageInterpolator`]. The aligner only decides whether that is needed
//! and checks what comes back.

use bandpower_core::{common_channels, BandpowerError, BandpowerResult, Headset, Recording};
use std::collections::HashSet;
use tracing::debug;

/// Maps a recording onto another channel layout
pub trait MontageInterpolator: Send + Sync {
    /// Recording resampled onto `target`, one row per target channel
    fn interpolate(&self, recording: &Recording, target: &Headset) -> BandpowerResult<Recording>;

    /// Interpolator name/identifier
    fn name(&self) -> &str;
}

/// Interpolator that refuses every layout change
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterpolation;

impl MontageInterpolator for NoInterpolation {
    fn interpolate(&self, recording: &Recording, target: &Headset) -> BandpowerResult<Recording> {
        Err(BandpowerError::InterpolationFailed {
            reason: format!(
                "unsupported headset mismatch: recording '{}' has {} channels, headset '{}' has {}",
                recording.name,
                recording.channel_count(),
                target.name,
                target.channel_count()
            ),
        })
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// True when `pairs` match every channel on both sides exactly once
pub fn is_bijection(pairs: &[(usize, usize)], left: usize, right: usize) -> bool {
    if left != right || pairs.len() != left {
        return false;
    }
    let lhs: HashSet<usize> = pairs.iter().map(|&(i, _)| i).collect();
    let rhs: HashSet<usize> = pairs.iter().map(|&(_, j)| j).collect();
    lhs.len() == left && rhs.len() == right
}

/// Brings recordings onto an optional target headset
pub struct HeadsetAligner<'a> {
    interpolator: &'a dyn MontageInterpolator,
}

impl<'a> HeadsetAligner<'a> {
    pub fn new(interpolator: &'a dyn MontageInterpolator) -> Self {
        Self { interpolator }
    }

    /// Align `recording` to `target`
    ///
    /// Without a target, or when the recording already has exactly the
    /// target's channel positions, the recording is returned unchanged.
    pub fn align(&self, recording: Recording, target: Option<&Headset>) -> BandpowerResult<Recording> {
        let Some(target) = target else {
            return Ok(recording);
        };

        let pairs = common_channels(&recording.channels, &target.channels);
        if is_bijection(&pairs, recording.channel_count(), target.channel_count()) {
            debug!(headset = %target.name, "recording already matches target headset");
            return Ok(recording);
        }

        debug!(
            headset = %target.name,
            interpolator = self.interpolator.name(),
            common = pairs.len(),
            "interpolating onto target headset"
        );
        let interpolated = self.interpolator.interpolate(&recording, target)?;
        interpolated.validate()?;

        if interpolated.sample_count() != recording.sample_count()
            || interpolated.sampling_rate != recording.sampling_rate
        {
            return Err(BandpowerError::InterpolationFailed {
                reason: format!(
                    "interpolator '{}' changed the time axis: {} samples at {} Hz, expected {} at {} Hz",
                    self.interpolator.name(),
                    interpolated.sample_count(),
                    interpolated.sampling_rate,
                    recording.sample_count(),
                    recording.sampling_rate
                ),
            });
        }

        if interpolated.channel_count() != target.channel_count() {
            return Err(BandpowerError::ChannelMismatch {
                expected: target.channel_count(),
                actual: interpolated.channel_count(),
            });
        }

        Ok(interpolated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn recording_on(channels: Vec<bandpower_core::ChannelInfo>) -> Recording {
        let data = Array2::zeros((channels.len(), 16));
        Recording::new("rec", data, 100.0, channels, Vec::new()).unwrap()
    }

    /// Keeps the first `n` target channels, zero-filled
    struct Truncating(usize);

    impl MontageInterpolator for Truncating {
        fn interpolate(&self, recording: &Recording, target: &Headset) -> BandpowerResult<Recording> {
            let channels = target.channels[..self.0].to_vec();
            Recording::new(
                recording.name.clone(),
                Array2::zeros((channels.len(), recording.sample_count())),
                recording.sampling_rate,
                channels,
                recording.events.clone(),
            )
        }

        fn name(&self) -> &str {
            "truncating"
        }
    }

    #[test]
    fn test_no_target_is_passthrough() {
        let recording = recording_on(Headset::standard_1020().channels[..4].to_vec());
        let aligned = HeadsetAligner::new(&NoInterpolation)
            .align(recording.clone(), None)
            .unwrap();
        assert_eq!(aligned, recording);
    }

    #[test]
    fn test_matching_layout_is_passthrough() {
        let headset = Headset::standard_1020();
        let mut channels = headset.channels.clone();
        channels.reverse();
        let recording = recording_on(channels);

        let aligned = HeadsetAligner::new(&NoInterpolation)
            .align(recording.clone(), Some(&headset))
            .unwrap();
        assert_eq!(aligned, recording);
    }

    #[test]
    fn test_mismatch_without_interpolator_fails() {
        let headset = Headset::standard_1020();
        let recording = recording_on(headset.channels[..10].to_vec());

        let result = HeadsetAligner::new(&NoInterpolation).align(recording, Some(&headset));
        match result {
            Err(BandpowerError::InterpolationFailed { reason }) => {
                assert!(reason.contains("unsupported headset mismatch"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_interpolator_channel_count_checked() {
        let headset = Headset::standard_1020();
        let recording = recording_on(headset.channels[..10].to_vec());

        let result = HeadsetAligner::new(&Truncating(12)).align(recording.clone(), Some(&headset));
        assert_eq!(
            result.unwrap_err(),
            BandpowerError::ChannelMismatch {
                expected: 19,
                actual: 12
            }
        );

        let aligned = HeadsetAligner::new(&Truncating(19))
            .align(recording, Some(&headset))
            .unwrap();
        assert_eq!(aligned.channel_count(), 19);
    }

    /// Full target layout with a tampered result
    struct Tampering(fn(Recording) -> Recording);

    impl MontageInterpolator for Tampering {
        fn interpolate(&self, recording: &Recording, target: &Headset) -> BandpowerResult<Recording> {
            let full = Truncating(target.channel_count()).interpolate(recording, target)?;
            Ok((self.0)(full))
        }

        fn name(&self) -> &str {
            "tampering"
        }
    }

    #[test]
    fn test_interpolator_time_axis_checked() {
        let headset = Headset::standard_1020();
        let recording = recording_on(headset.channels[..10].to_vec());

        let shortened = Tampering(|mut rec| {
            rec.data = Array2::zeros((rec.channel_count(), 8));
            rec
        });
        let result = HeadsetAligner::new(&shortened).align(recording.clone(), Some(&headset));
        assert!(matches!(result, Err(BandpowerError::InterpolationFailed { .. })));

        let resampled = Tampering(|mut rec| {
            rec.sampling_rate = 50.0;
            rec
        });
        let result = HeadsetAligner::new(&resampled).align(recording, Some(&headset));
        assert!(matches!(result, Err(BandpowerError::InterpolationFailed { .. })));
    }

    #[test]
    fn test_interpolated_recording_validated() {
        let headset = Headset::standard_1020();
        let recording = recording_on(headset.channels[..10].to_vec());

        let missing_rows = Tampering(|mut rec| {
            rec.data = Array2::zeros((5, rec.sample_count()));
            rec
        });
        let result = HeadsetAligner::new(&missing_rows).align(recording.clone(), Some(&headset));
        assert!(matches!(result, Err(BandpowerError::ChannelMismatch { .. })));

        let not_finite = Tampering(|mut rec| {
            rec.data[[0, 0]] = f64::NAN;
            rec
        });
        let result = HeadsetAligner::new(&not_finite).align(recording, Some(&headset));
        assert!(matches!(result, Err(BandpowerError::InvalidRecording { .. })));
    }

    #[test]
    fn test_bijection() {
        assert!(is_bijection(&[(0, 1), (1, 0)], 2, 2));
        assert!(!is_bijection(&[(0, 1), (1, 1)], 2, 2));
        assert!(!is_bijection(&[(0, 0)], 2, 2));
        assert!(!is_bijection(&[(0, 0), (1, 1)], 2, 3));
    }
}
