//! Bandpower-Core: foundation types for EEG band-power feature extraction
//!
//! Recording container, channel and event metadata, headset layouts and
//! the error types shared by every crate in the workspace.

pub mod error;
pub mod events;
pub mod matrix_rows;
pub mod montage;
pub mod recording;

pub use error::{BandpowerError, BandpowerResult, ExtractionError, ExtractionStatus};
pub use events::{Event, EventLabel, BOUNDARY_EVENT};
pub use montage::{common_channels, ChannelInfo, Headset, POSITION_TOLERANCE};
pub use recording::Recording;
