//! Channel metadata and headset layouts
//!
//! A channel is a label plus an optional 3D position on the unit head
//! sphere. Channels without a position are external (EOG, ECG, reference
//! leads) and never take part in scalp feature extraction.

use serde::{Deserialize, Serialize};

use crate::error::{BandpowerError, BandpowerResult};

/// Maximum per-axis difference for two positions to count as the same
pub const POSITION_TOLERANCE: f64 = 1e-6;

/// Channel label and optional scalp position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel label (e.g. "Cz")
    pub label: String,
    /// Cartesian position on the unit sphere, `None` for external channels
    #[serde(default)]
    pub position: Option<[f64; 3]>,
}

impl ChannelInfo {
    /// Scalp channel at the given position
    pub fn new(label: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            label: label.into(),
            position: Some(position),
        }
    }

    /// Channel without a position
    pub fn external(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            position: None,
        }
    }

    pub fn is_external(&self) -> bool {
        self.position.is_none()
    }

    /// True when both channels have positions equal within tolerance
    pub fn same_position(&self, other: &ChannelInfo) -> bool {
        match (self.position, other.position) {
            (Some(a), Some(b)) => a
                .iter()
                .zip(b.iter())
                .all(|(x, y)| (x - y).abs() <= POSITION_TOLERANCE),
            _ => false,
        }
    }
}

/// Named scalp layout that recordings can be aligned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headset {
    /// Layout name
    pub name: String,
    /// Channels in layout order
    pub channels: Vec<ChannelInfo>,
}

impl Headset {
    /// Create a headset, every channel must carry a position
    pub fn new(name: impl Into<String>, channels: Vec<ChannelInfo>) -> BandpowerResult<Self> {
        let headset = Self {
            name: name.into(),
            channels,
        };
        headset.validate()?;
        Ok(headset)
    }

    /// Check that the layout is non-empty and fully positioned
    pub fn validate(&self) -> BandpowerResult<()> {
        if self.channels.is_empty() {
            return Err(BandpowerError::InvalidConfig {
                reason: format!("headset '{}' has no channels", self.name),
            });
        }
        if let Some(channel) = self.channels.iter().find(|c| c.is_external()) {
            return Err(BandpowerError::InvalidConfig {
                reason: format!(
                    "headset '{}' channel '{}' has no position",
                    self.name, channel.label
                ),
            });
        }
        Ok(())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 19-channel international 10-20 layout
    pub fn standard_1020() -> Self {
        // (label, azimuth, elevation) in degrees; azimuth 0 is the nose,
        // positive towards the left ear
        const LAYOUT: [(&str, f64, f64); 19] = [
            ("Fp1", 18.0, 0.0),
            ("Fp2", -18.0, 0.0),
            ("F7", 54.0, 0.0),
            ("F3", 40.0, 40.0),
            ("Fz", 0.0, 60.0),
            ("F4", -40.0, 40.0),
            ("F8", -54.0, 0.0),
            ("T3", 90.0, 0.0),
            ("C3", 90.0, 45.0),
            ("Cz", 0.0, 90.0),
            ("C4", -90.0, 45.0),
            ("T4", -90.0, 0.0),
            ("T5", 126.0, 0.0),
            ("P3", 140.0, 40.0),
            ("Pz", 180.0, 60.0),
            ("P4", -140.0, 40.0),
            ("T6", -126.0, 0.0),
            ("O1", 162.0, 0.0),
            ("O2", -162.0, 0.0),
        ];

        let channels = LAYOUT
            .iter()
            .map(|&(label, azimuth, elevation)| {
                let az = azimuth.to_radians();
                let el = elevation.to_radians();
                ChannelInfo::new(
                    label,
                    [el.cos() * az.cos(), el.cos() * az.sin(), el.sin()],
                )
            })
            .collect();

        Self {
            name: "standard_1020".to_string(),
            channels,
        }
    }
}

/// Pairs `(i, j)` of channels sharing a position
///
/// Every channel of `a` is paired with the first channel of `b` at the same
/// position. Channels without a position are never matched.
pub fn common_channels(a: &[ChannelInfo], b: &[ChannelInfo]) -> Vec<(usize, usize)> {
    a.iter()
        .enumerate()
        .filter_map(|(i, ca)| {
            b.iter()
                .position(|cb| ca.same_position(cb))
                .map(|j| (i, j))
        })
        .collect()
}
