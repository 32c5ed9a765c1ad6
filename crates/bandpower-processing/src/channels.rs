//! Scalp channel selection

use bandpower_core::{BandpowerResult, Recording};
use tracing::debug;

/// Rows of channels that carry a scalp position
pub fn scalp_channel_indices(recording: &Recording) -> Vec<usize> {
    recording
        .channels
        .iter()
        .enumerate()
        .filter(|(_, channel)| !channel.is_external())
        .map(|(i, _)| i)
        .collect()
}

/// Recording restricted to scalp channels, original order kept
pub fn select_scalp_channels(recording: &Recording) -> BandpowerResult<Recording> {
    let keep = scalp_channel_indices(recording);
    let dropped = recording.channel_count() - keep.len();
    debug!(
        recording = %recording.name,
        kept = keep.len(),
        dropped,
        "selected scalp channels"
    );
    recording.select_channels(&keep)
}
