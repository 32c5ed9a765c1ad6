//! Band-pass filtering capability
//!
//! The extractor only sees the [`BandPassFilter`] trait. [`FirBandPass`] is
//! the default: a Hamming-windowed sinc FIR applied with zero phase through
//! FFT convolution. [`IdentityFilter`] leaves the data untouched and is
//! meant for tests that need exact control over the signal.

use bandpower_core::{BandpowerError, BandpowerResult};
use ndarray::Array2;
use realfft::RealFftPlanner;
use std::f64::consts::PI;
use tracing::debug;

use crate::config::SubBand;

/// Filter applied to every channel (row) of a recording
pub trait BandPassFilter: Send + Sync {
    /// Filter `data` (channels × samples) to `band`
    fn filter(
        &self,
        data: &Array2<f64>,
        sampling_rate: f64,
        band: SubBand,
        order: usize,
    ) -> BandpowerResult<Array2<f64>>;

    /// Filter name/identifier
    fn name(&self) -> &str;
}

/// Pass-through filter
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFilter;

impl BandPassFilter for IdentityFilter {
    fn filter(
        &self,
        data: &Array2<f64>,
        _sampling_rate: f64,
        _band: SubBand,
        _order: usize,
    ) -> BandpowerResult<Array2<f64>> {
        Ok(data.clone())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Shape of the response realised for a band at a given sampling rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterResponse {
    /// Band covers `[0, nyquist]`
    AllPass,
    /// Lowpass at the given cutoff (Hz)
    LowPass(f64),
    /// Highpass at the given cutoff (Hz)
    HighPass(f64),
    /// Bandpass between the two cutoffs (Hz)
    BandPass(f64, f64),
}

impl FilterResponse {
    /// Classify a band; a zero lower edge means lowpass, an upper edge at or
    /// above Nyquist means highpass
    pub fn classify(band: SubBand, sampling_rate: f64) -> BandpowerResult<Self> {
        let fail = |reason: String| BandpowerError::FilterFailed {
            low_hz: band.low_hz,
            high_hz: band.high_hz,
            reason,
        };

        if !band.is_well_formed() {
            return Err(fail("band edges must be finite, non-negative and increasing".to_string()));
        }

        let nyquist = sampling_rate / 2.0;
        if band.low_hz >= nyquist {
            return Err(fail(format!("lower edge at or above Nyquist ({} Hz)", nyquist)));
        }

        let response = match (band.low_hz > 0.0, band.high_hz < nyquist) {
            (false, false) => FilterResponse::AllPass,
            (false, true) => FilterResponse::LowPass(band.high_hz),
            (true, false) => FilterResponse::HighPass(band.low_hz),
            (true, true) => FilterResponse::BandPass(band.low_hz, band.high_hz),
        };
        Ok(response)
    }
}

/// Zero-phase Hamming-windowed sinc FIR band-pass
///
/// `order` is the number of taps minus one and must be even so that the
/// group delay is a whole number of samples. Band edges are the -6 dB
/// points of the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirBandPass;

impl FirBandPass {
    pub fn new() -> Self {
        Self
    }

    /// Filter taps for a band, `None` for an all-pass band
    pub fn design(
        band: SubBand,
        sampling_rate: f64,
        order: usize,
    ) -> BandpowerResult<Option<Vec<f64>>> {
        if order == 0 || order % 2 != 0 {
            return Err(BandpowerError::FilterFailed {
                low_hz: band.low_hz,
                high_hz: band.high_hz,
                reason: format!("filter order must be even and positive, got {}", order),
            });
        }

        let taps = match FilterResponse::classify(band, sampling_rate)? {
            FilterResponse::AllPass => return Ok(None),
            FilterResponse::LowPass(cutoff) => lowpass_taps(cutoff, sampling_rate, order),
            FilterResponse::HighPass(cutoff) => {
                let mut taps = lowpass_taps(cutoff, sampling_rate, order);
                taps.iter_mut().for_each(|t| *t = -*t);
                taps[order / 2] += 1.0;
                taps
            }
            FilterResponse::BandPass(low, high) => {
                let upper = lowpass_taps(high, sampling_rate, order);
                let lower = lowpass_taps(low, sampling_rate, order);
                upper.iter().zip(lower.iter()).map(|(u, l)| u - l).collect()
            }
        };
        Ok(Some(taps))
    }
}

impl BandPassFilter for FirBandPass {
    fn filter(
        &self,
        data: &Array2<f64>,
        sampling_rate: f64,
        band: SubBand,
        order: usize,
    ) -> BandpowerResult<Array2<f64>> {
        if order >= data.ncols() {
            return Err(BandpowerError::FilterFailed {
                low_hz: band.low_hz,
                high_hz: band.high_hz,
                reason: format!(
                    "filter order {} requires more than {} samples",
                    order,
                    data.ncols()
                ),
            });
        }

        match Self::design(band, sampling_rate, order)? {
            Some(taps) => {
                debug!(
                    low_hz = band.low_hz,
                    high_hz = band.high_hz,
                    taps = taps.len(),
                    "applying FIR band-pass"
                );
                zero_phase_convolve(data, &taps, band)
            }
            None => Ok(data.clone()),
        }
    }

    fn name(&self) -> &str {
        "fir_hamming"
    }
}

/// Hamming-windowed sinc lowpass with unit DC gain
fn lowpass_taps(cutoff_hz: f64, sampling_rate: f64, order: usize) -> Vec<f64> {
    let fc = cutoff_hz / sampling_rate;
    let mid = (order / 2) as f64;

    let mut taps: Vec<f64> = (0..=order)
        .map(|k| {
            let x = k as f64 - mid;
            let ideal = if x == 0.0 {
                2.0 * fc
            } else {
                (2.0 * PI * fc * x).sin() / (PI * x)
            };
            let window = 0.54 - 0.46 * (2.0 * PI * k as f64 / order as f64).cos();
            ideal * window
        })
        .collect();

    let gain: f64 = taps.iter().sum();
    if gain.abs() > f64::EPSILON {
        taps.iter_mut().for_each(|t| *t /= gain);
    }
    taps
}

/// Convolve every row with a symmetric kernel and drop the group delay
///
/// Rows are padded on both sides with half a kernel of their edge values.
fn zero_phase_convolve(
    data: &Array2<f64>,
    taps: &[f64],
    band: SubBand,
) -> BandpowerResult<Array2<f64>> {
    let fft_failed = |e: realfft::FftError| BandpowerError::FilterFailed {
        low_hz: band.low_hz,
        high_hz: band.high_hz,
        reason: e.to_string(),
    };

    let order = taps.len() - 1;
    let half = order / 2;
    let n = data.ncols();
    let fft_len = (n + 2 * order).next_power_of_two();

    let mut planner = RealFftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut kernel_input = forward.make_input_vec();
    kernel_input[..taps.len()].copy_from_slice(taps);
    let mut kernel = forward.make_output_vec();
    forward
        .process(&mut kernel_input, &mut kernel)
        .map_err(fft_failed)?;

    let mut buffer = forward.make_input_vec();
    let mut spectrum = forward.make_output_vec();
    let mut result = inverse.make_output_vec();
    let scale = 1.0 / fft_len as f64;

    let mut output = Array2::zeros(data.raw_dim());
    for (row, mut out_row) in data.outer_iter().zip(output.outer_iter_mut()) {
        let first = row[0];
        let last = row[n - 1];

        buffer.iter_mut().for_each(|v| *v = 0.0);
        buffer[..half].iter_mut().for_each(|v| *v = first);
        for (dst, &src) in buffer[half..half + n].iter_mut().zip(row.iter()) {
            *dst = src;
        }
        buffer[half + n..n + order].iter_mut().for_each(|v| *v = last);

        forward
            .process(&mut buffer, &mut spectrum)
            .map_err(fft_failed)?;
        for (bin, k) in spectrum.iter_mut().zip(kernel.iter()) {
            *bin = *bin * *k;
        }
        // DC and Nyquist bins of a real signal are real
        spectrum[0].im = 0.0;
        if let Some(nyquist_bin) = spectrum.last_mut() {
            nyquist_bin.im = 0.0;
        }

        inverse
            .process(&mut spectrum, &mut result)
            .map_err(fft_failed)?;

        for (i, value) in out_row.iter_mut().enumerate() {
            *value = result[i + order] * scale;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    const SAMPLING_RATE: f64 = 250.0;

    fn sinusoid(freq_hz: f64, n: usize) -> Array2<f64> {
        let row = Array1::from_iter(
            (0..n).map(|i| (2.0 * PI * freq_hz * i as f64 / SAMPLING_RATE).sin()),
        );
        row.insert_axis(ndarray::Axis(0))
    }

    /// RMS of the central half of the first row, away from edge effects
    fn central_rms(data: &Array2<f64>) -> f64 {
        let n = data.ncols();
        let slice: Vec<f64> = data.row(0).iter().skip(n / 4).take(n / 2).copied().collect();
        (slice.iter().map(|v| v * v).sum::<f64>() / slice.len() as f64).sqrt()
    }

    #[test]
    fn test_response_classification() {
        assert_eq!(
            FilterResponse::classify(SubBand::new(0.0, 125.0), SAMPLING_RATE).unwrap(),
            FilterResponse::AllPass
        );
        assert_eq!(
            FilterResponse::classify(SubBand::new(0.0, 50.0), SAMPLING_RATE).unwrap(),
            FilterResponse::LowPass(50.0)
        );
        assert_eq!(
            FilterResponse::classify(SubBand::new(30.0, 200.0), SAMPLING_RATE).unwrap(),
            FilterResponse::HighPass(30.0)
        );
        assert_eq!(
            FilterResponse::classify(SubBand::new(8.0, 13.0), SAMPLING_RATE).unwrap(),
            FilterResponse::BandPass(8.0, 13.0)
        );
        assert!(FilterResponse::classify(SubBand::new(130.0, 140.0), SAMPLING_RATE).is_err());
    }

    #[test]
    fn test_bandpass_passes_in_band_sinusoid() {
        let input = sinusoid(10.5, 4000);
        let output = FirBandPass::new()
            .filter(&input, SAMPLING_RATE, SubBand::new(8.0, 13.0), 400)
            .unwrap();

        assert_eq!(output.dim(), input.dim());
        let ratio = central_rms(&output) / central_rms(&input);
        assert!(ratio > 0.95, "in-band gain {}", ratio);
    }

    #[test]
    fn test_bandpass_attenuates_out_of_band_sinusoid() {
        let input = sinusoid(40.0, 4000);
        let output = FirBandPass::new()
            .filter(&input, SAMPLING_RATE, SubBand::new(8.0, 13.0), 400)
            .unwrap();

        let ratio = central_rms(&output) / central_rms(&input);
        assert!(ratio < 0.01, "stop-band gain {}", ratio);
    }

    #[test]
    fn test_lowpass_and_highpass() {
        let slow = sinusoid(5.0, 3000);
        let fast = sinusoid(60.0, 3000);
        let filter = FirBandPass::new();

        let low = SubBand::new(0.0, 30.0);
        let passed = filter.filter(&slow, SAMPLING_RATE, low, 200).unwrap();
        let blocked = filter.filter(&fast, SAMPLING_RATE, low, 200).unwrap();
        assert!(central_rms(&passed) / central_rms(&slow) > 0.95);
        assert!(central_rms(&blocked) / central_rms(&fast) < 0.01);

        let high = SubBand::new(30.0, 125.0);
        let passed = filter.filter(&fast, SAMPLING_RATE, high, 200).unwrap();
        let blocked = filter.filter(&slow, SAMPLING_RATE, high, 200).unwrap();
        assert!(central_rms(&passed) / central_rms(&fast) > 0.95);
        assert!(central_rms(&blocked) / central_rms(&slow) < 0.01);
    }

    #[test]
    fn test_all_pass_band_is_identity() {
        let input = sinusoid(20.0, 600);
        let output = FirBandPass::new()
            .filter(&input, SAMPLING_RATE, SubBand::new(0.0, 125.0), 100)
            .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_constant_signal_preserved_by_lowpass() {
        let input = Array2::from_elem((2, 500), 3.0);
        let output = FirBandPass::new()
            .filter(&input, SAMPLING_RATE, SubBand::new(0.0, 40.0), 100)
            .unwrap();
        assert!(output.iter().all(|v| (v - 3.0).abs() < 1e-9));
    }

    #[test]
    fn test_filter_errors() {
        let input = sinusoid(10.0, 300);
        let filter = FirBandPass::new();

        let too_long = filter.filter(&input, SAMPLING_RATE, SubBand::new(8.0, 13.0), 300);
        assert!(matches!(too_long, Err(BandpowerError::FilterFailed { .. })));

        let inverted = filter.filter(&input, SAMPLING_RATE, SubBand::new(13.0, 8.0), 100);
        assert!(matches!(inverted, Err(BandpowerError::FilterFailed { .. })));

        let odd = filter.filter(&input, SAMPLING_RATE, SubBand::new(8.0, 13.0), 101);
        assert!(matches!(odd, Err(BandpowerError::FilterFailed { .. })));
    }

    #[test]
    fn test_identity_filter() {
        let input = sinusoid(10.0, 64);
        let output = IdentityFilter
            .filter(&input, SAMPLING_RATE, SubBand::new(8.0, 13.0), 500)
            .unwrap();
        assert_eq!(output, input);
        assert_eq!(IdentityFilter.name(), "identity");
    }
}
