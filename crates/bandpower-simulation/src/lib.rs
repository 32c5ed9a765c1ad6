//! Bandpower-Simulation: synthetic EEG recordings
//!
//! Seeded multichannel recordings built from oscillatory rhythms and noise,
//! with 10-20 scalp positions, optional external channels, stimulus events
//! and boundary annotations. Used by tests, benches and the CLI.

pub mod rhythms;
pub mod simulator;

pub use rhythms::Rhythm;
pub use simulator::{RecordingSimulator, SimulationConfig};
