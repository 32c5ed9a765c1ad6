//! Projection of recording events onto output samples

use bandpower_core::Event;
use tracing::warn;

use crate::features::SubWindowGrid;

/// Maps event latencies to output-sample labels
#[derive(Debug, Clone, Copy)]
pub struct LabelMapper {
    sampling_rate: f64,
    step: f64,
}

impl LabelMapper {
    /// `step` is the configured step in seconds
    pub fn new(sampling_rate: f64, step: f64) -> Self {
        Self { sampling_rate, step }
    }

    /// Mapper on the grid's rounded step, so labels follow `SubWindowGrid::times`
    pub fn for_grid(grid: &SubWindowGrid, sampling_rate: f64) -> Self {
        Self::new(sampling_rate, grid.step_seconds(sampling_rate))
    }

    /// 1-based output sample an event falls on
    pub fn sample_index(&self, event: &Event) -> Option<usize> {
        let seconds = event.onset_seconds(self.sampling_rate);
        let index = (seconds / self.step).floor() + 1.0;
        if index.is_finite() && index >= 1.0 {
            Some(index as usize)
        } else {
            None
        }
    }

    /// Labels for `n_samples` output samples
    ///
    /// Events at or past the last sample are dropped. Several events on the
    /// same sample all contribute, duplicates included.
    pub fn map(&self, events: &[Event], n_samples: usize) -> Vec<Vec<String>> {
        let mut labels = vec![Vec::new(); n_samples];

        for event in events {
            let Some(label) = event.kind.as_label() else {
                warn!(latency = event.latency, "ignoring event with unsupported type");
                continue;
            };

            match self.sample_index(event) {
                Some(index) if index < n_samples => labels[index - 1].push(label),
                _ => {}
            }
        }

        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandpower_core::EventLabel;

    #[test]
    fn test_sample_index() {
        let mapper = LabelMapper::new(250.0, 0.25);
        assert_eq!(mapper.sample_index(&Event::new("a", 0.0)), Some(1));
        assert_eq!(mapper.sample_index(&Event::new("a", 62.0)), Some(1));
        assert_eq!(mapper.sample_index(&Event::new("a", 62.5)), Some(2));
        assert_eq!(mapper.sample_index(&Event::new("a", -10.0)), None);
    }

    #[test]
    fn test_label_mapping() {
        let mapper = LabelMapper::new(250.0, 0.25);
        let events = vec![
            Event::new(3_i64, 0.0),
            Event::new("stim_on", 100.0),
            Event::new("stim_on", 110.0),
            Event {
                kind: EventLabel::Unknown,
                latency: 100.0,
                duration: None,
            },
        ];

        let labels = mapper.map(&events, 10);
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], vec!["3".to_string()]);
        assert_eq!(labels[1], vec!["stim_on".to_string(), "stim_on".to_string()]);
        assert!(labels[2..].iter().all(Vec::is_empty));
    }

    #[test]
    fn test_events_past_last_sample_dropped() {
        let mapper = LabelMapper::new(100.0, 0.5);
        // Index 4 lands on the last of 4 samples and is dropped
        let events = vec![Event::new("late", 150.0), Event::new("later", 10_000.0), Event::new("ok", 100.0)];
        let labels = mapper.map(&events, 4);
        assert_eq!(labels[2], vec!["ok".to_string()]);
        assert!(labels[3].is_empty());
        assert_eq!(labels.iter().map(Vec::len).sum::<usize>(), 1);
    }

    #[test]
    fn test_grid_step_follows_sample_times() {
        // 0.25 s rounds to 63 samples at 250 Hz
        let grid = SubWindowGrid::new(250.0, 0.25, 0.25, 150_100).unwrap();
        let times = grid.times(250.0);
        let mapper = LabelMapper::for_grid(&grid, 250.0);

        for latency in [75_000.0, 150_000.0] {
            let index = mapper.sample_index(&Event::new("stim", latency)).unwrap();
            let onset = latency / 250.0;
            assert!(times[index - 1] <= onset);
            assert!(onset < times[index - 1] + 0.252);
        }

        let labels = mapper.map(&[Event::new("late", 150_000.0)], grid.count);
        assert_eq!(labels[2380], vec!["late".to_string()]);
    }

    #[test]
    fn test_no_samples() {
        let mapper = LabelMapper::new(100.0, 0.5);
        assert!(mapper.map(&[Event::new("a", 0.0)], 0).is_empty());
    }
}
