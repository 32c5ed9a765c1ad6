//! Synthetic multichannel EEG recordings

use bandpower_core::{
    BandpowerError, BandpowerResult, ChannelInfo, Event, EventLabel, Headset, Recording,
};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::rhythms::Rhythm;

/// Amplitude (µV) of the slow drift on external channels
const EXTERNAL_DRIFT_AMPLITUDE: f64 = 50.0;

/// Configuration for recording simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Recording length in seconds
    pub duration: f64,
    /// Scalp channels, taken in order from the 10-20 layout
    pub channel_count: usize,
    /// Channels without a position appended after the scalp channels
    pub external_channels: usize,
    /// Rhythms summed on every scalp channel
    pub rhythms: Vec<Rhythm>,
    /// Standard deviation of the white noise (µV)
    pub noise_std: f64,
    /// Power-line interference frequency
    pub line_noise: Option<f64>,
    /// Seconds between stimulus events, none when absent
    pub event_interval: Option<f64>,
    /// Stimulus event types, used in rotation
    pub event_labels: Vec<EventLabel>,
    /// Boundary annotations as (onset, duration) in seconds
    pub boundaries: Vec<(f64, f64)>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 250.0,
            duration: 10.0,
            channel_count: 19,
            external_channels: 0,
            rhythms: vec![Rhythm::theta(), Rhythm::alpha(), Rhythm::beta()],
            noise_std: 5.0,
            line_noise: None,
            event_interval: Some(2.0),
            event_labels: vec![EventLabel::Numeric(1), EventLabel::Numeric(2)],
            boundaries: Vec::new(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> BandpowerResult<()> {
        let invalid = |reason: String| BandpowerError::InvalidConfig { reason };
        let scalp_channels = Headset::standard_1020().channel_count();

        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(invalid(format!("sampling rate must be positive, got {}", self.sampling_rate)));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(invalid(format!("duration must be positive, got {}", self.duration)));
        }
        if self.channel_count == 0 || self.channel_count > scalp_channels {
            return Err(invalid(format!(
                "channel count must be between 1 and {}, got {}",
                scalp_channels, self.channel_count
            )));
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(invalid(format!("noise std must be non-negative, got {}", self.noise_std)));
        }
        if let Some(interval) = self.event_interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(invalid(format!("event interval must be positive, got {}", interval)));
            }
        }
        if let Some(&(onset, duration)) = self
            .boundaries
            .iter()
            .find(|(onset, duration)| *onset < 0.0 || *duration < 0.0)
        {
            return Err(invalid(format!(
                "boundary ({}, {}) must have non-negative onset and duration",
                onset, duration
            )));
        }
        Ok(())
    }
}

/// Generator of synthetic recordings
pub struct RecordingSimulator {
    config: SimulationConfig,
    rng: StdRng,
    noise: Normal<f64>,
}

impl RecordingSimulator {
    pub fn new(config: SimulationConfig) -> BandpowerResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let noise = Normal::new(0.0, config.noise_std).map_err(|e| BandpowerError::InvalidConfig {
            reason: format!("Failed to create normal distribution: {}", e),
        })?;

        Ok(Self { config, rng, noise })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Generate one recording
    pub fn generate(&mut self, name: &str) -> BandpowerResult<Recording> {
        let sampling_rate = self.config.sampling_rate;
        let n_samples = (self.config.duration * sampling_rate).round() as usize;
        let n_scalp = self.config.channel_count;
        let n_channels = n_scalp + self.config.external_channels;

        let mut channels: Vec<ChannelInfo> = Headset::standard_1020()
            .channels
            .into_iter()
            .take(n_scalp)
            .collect();
        channels.extend((0..self.config.external_channels).map(|k| ChannelInfo::external(format!("EXG{}", k + 1))));

        let mut data = Array2::zeros((n_channels, n_samples));
        for (channel, mut row) in data.outer_iter_mut().enumerate() {
            let external = channel >= n_scalp;
            let components: Vec<(Rhythm, f64, f64)> = if external {
                let phase = self.rng.gen_range(0.0..2.0 * PI);
                vec![(
                    Rhythm::Drift {
                        frequency: 0.3,
                        amplitude: EXTERNAL_DRIFT_AMPLITUDE,
                    },
                    phase,
                    1.0,
                )]
            } else {
                self.config
                    .rhythms
                    .iter()
                    .map(|rhythm| (*rhythm, self.rng.gen_range(0.0..2.0 * PI), self.rng.gen_range(0.8..1.2)))
                    .collect()
            };

            for (i, value) in row.iter_mut().enumerate() {
                let t = i as f64 / sampling_rate;
                let mut sample: f64 = components
                    .iter()
                    .map(|(rhythm, phase, gain)| gain * rhythm.value_at(t, *phase))
                    .sum();
                sample += self.noise.sample(&mut self.rng);
                if let Some(line) = self.config.line_noise {
                    sample += 2.0 * (2.0 * PI * line * t).sin();
                }
                *value = sample;
            }
        }

        let events = self.events();
        debug!(
            recording = name,
            channels = n_channels,
            samples = n_samples,
            events = events.len(),
            "simulated recording"
        );

        Recording::new(name, data, sampling_rate, channels, events)
    }

    /// Stimulus and boundary events ordered by latency
    fn events(&self) -> Vec<Event> {
        let sampling_rate = self.config.sampling_rate;
        let mut events = Vec::new();

        if let (Some(interval), false) = (self.config.event_interval, self.config.event_labels.is_empty()) {
            let mut k = 1;
            while (k as f64) * interval < self.config.duration {
                let label = self.config.event_labels[(k - 1) % self.config.event_labels.len()].clone();
                let latency = ((k as f64) * interval * sampling_rate).round();
                events.push(Event {
                    kind: label,
                    latency,
                    duration: None,
                });
                k += 1;
            }
        }

        events.extend(
            self.config
                .boundaries
                .iter()
                .map(|&(onset, duration)| Event::boundary(onset * sampling_rate, duration * sampling_rate)),
        );

        events.sort_by(|a, b| a.latency.total_cmp(&b.latency));
        events
    }
}
