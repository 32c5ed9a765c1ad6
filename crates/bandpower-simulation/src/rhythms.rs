//! EEG rhythm generators

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Oscillatory component of a simulated EEG channel (amplitudes in µV)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Rhythm {
    /// Continuous sinusoid
    Oscillation { frequency: f64, amplitude: f64 },
    /// Sinusoid gated on and off, e.g. alpha bursts or sleep spindles
    Burst {
        frequency: f64,
        amplitude: f64,
        on_duration: f64,
        off_duration: f64,
    },
    /// Slow baseline wander
    Drift { frequency: f64, amplitude: f64 },
}

impl Rhythm {
    /// Value at time `t` (s) for a channel-specific phase (rad)
    pub fn value_at(&self, t: f64, phase: f64) -> f64 {
        match *self {
            Rhythm::Oscillation { frequency, amplitude } | Rhythm::Drift { frequency, amplitude } => {
                amplitude * (2.0 * PI * frequency * t + phase).sin()
            }
            Rhythm::Burst {
                frequency,
                amplitude,
                on_duration,
                off_duration,
            } => {
                let cycle = on_duration + off_duration;
                if cycle <= 0.0 || t.rem_euclid(cycle) >= on_duration {
                    return 0.0;
                }
                // Hann envelope over the burst
                let envelope = (PI * t.rem_euclid(cycle) / on_duration).sin().powi(2);
                envelope * amplitude * (2.0 * PI * frequency * t + phase).sin()
            }
        }
    }

    pub fn frequency(&self) -> f64 {
        match *self {
            Rhythm::Oscillation { frequency, .. }
            | Rhythm::Burst { frequency, .. }
            | Rhythm::Drift { frequency, .. } => frequency,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rhythm::Oscillation { .. } => "Continuous oscillation",
            Rhythm::Burst { .. } => "Gated bursts",
            Rhythm::Drift { .. } => "Baseline drift",
        }
    }

    pub fn delta() -> Self {
        Rhythm::Oscillation { frequency: 2.0, amplitude: 20.0 }
    }

    pub fn theta() -> Self {
        Rhythm::Oscillation { frequency: 6.0, amplitude: 10.0 }
    }

    pub fn alpha() -> Self {
        Rhythm::Burst {
            frequency: 10.0,
            amplitude: 25.0,
            on_duration: 1.5,
            off_duration: 0.5,
        }
    }

    pub fn beta() -> Self {
        Rhythm::Oscillation { frequency: 20.0, amplitude: 5.0 }
    }

    pub fn gamma() -> Self {
        Rhythm::Oscillation { frequency: 40.0, amplitude: 2.0 }
    }

    /// Named presets
    pub fn presets() -> Vec<(&'static str, Rhythm)> {
        vec![
            ("delta", Self::delta()),
            ("theta", Self::theta()),
            ("alpha", Self::alpha()),
            ("beta", Self::beta()),
            ("gamma", Self::gamma()),
        ]
    }
}
