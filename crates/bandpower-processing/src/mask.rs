//! Exclusion mask for unreliable output samples

use bandpower_core::Event;
use serde::{Deserialize, Serialize};

/// Trailing samples whose windows run past the recorded sub-windows
pub const TAIL_EXCLUSION: usize = 7;

/// Samples on either side of a boundary sample that are also excluded
pub const BOUNDARY_NEIGHBOURHOOD: usize = 7;

pub const REASON_TAIL: &str = "not enough sub-windows";
pub const REASON_BOUNDARY: &str = "boundary samples";
pub const REASON_OVERLAP: &str = "overlapped with boundary";

/// Per-sample exclusion flags and reasons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionMask {
    /// `true` when the sample is excluded
    pub index: Vec<bool>,
    /// Distinct reasons per sample, in the order they were first raised
    pub comments: Vec<Vec<String>>,
}

impl ExclusionMask {
    /// Mask over `n` samples with nothing excluded
    pub fn new(n: usize) -> Self {
        Self {
            index: vec![false; n],
            comments: vec![Vec::new(); n],
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Exclude sample `i`; repeated reasons are recorded once
    pub fn exclude(&mut self, i: usize, reason: &str) {
        if i >= self.len() {
            return;
        }
        self.index[i] = true;
        if !self.comments[i].iter().any(|r| r == reason) {
            self.comments[i].push(reason.to_string());
        }
    }

    pub fn is_excluded(&self, i: usize) -> bool {
        self.index.get(i).copied().unwrap_or(false)
    }

    pub fn excluded_count(&self) -> usize {
        self.index.iter().filter(|&&excluded| excluded).count()
    }

    /// Samples carrying the given reason
    pub fn indices_with_reason(&self, reason: &str) -> Vec<usize> {
        self.comments
            .iter()
            .enumerate()
            .filter(|(_, reasons)| reasons.iter().any(|r| r == reason))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Builds the exclusion mask from sample times and boundary events
#[derive(Debug, Clone, Copy)]
pub struct ExclusionMasker {
    sampling_rate: f64,
}

impl ExclusionMasker {
    pub fn new(sampling_rate: f64) -> Self {
        Self { sampling_rate }
    }

    /// Mask for samples starting at `times` (seconds)
    pub fn build(&self, times: &[f64], events: &[Event]) -> ExclusionMask {
        let n = times.len();
        let mut mask = ExclusionMask::new(n);

        for i in n.saturating_sub(TAIL_EXCLUSION)..n {
            mask.exclude(i, REASON_TAIL);
        }

        let mut on_boundary = vec![false; n];
        for event in events.iter().filter(|e| e.kind.is_boundary()) {
            let onset = event.onset_seconds(self.sampling_rate);
            let offset = event.offset_seconds(self.sampling_rate);
            for (i, &t) in times.iter().enumerate() {
                if t >= onset && t <= offset {
                    mask.exclude(i, REASON_BOUNDARY);
                    on_boundary[i] = true;
                }
            }
        }

        for centre in (0..n).filter(|&i| on_boundary[i]) {
            let first = centre.saturating_sub(BOUNDARY_NEIGHBOURHOOD);
            let last = (centre + BOUNDARY_NEIGHBOURHOOD).min(n - 1);
            for i in first..=last {
                mask.exclude(i, REASON_OVERLAP);
            }
        }

        mask
    }
}
