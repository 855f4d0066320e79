//! The sliding window of visible samples.

use std::collections::VecDeque;

use crate::range::Extremes;

/// One measurement in the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f32,
    pub value: f32,
}

impl Sample {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Time-ordered samples with front eviction.
///
/// Samples arrive in non-decreasing time order and leave from the oldest
/// end once they scroll out of the window (plus a one-unit margin so the
/// curve still reaches the left edge). An empty window is valid;
/// consumers skip their work on it.
#[derive(Debug, Default)]
pub struct DataWindow {
    samples: VecDeque<Sample>,
}

impl DataWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample. Time must be non-decreasing.
    pub fn push(&mut self, sample: Sample) {
        debug_assert!(
            self.samples
                .back()
                .is_none_or(|last| sample.time >= last.time),
            "samples must arrive in non-decreasing time order"
        );
        self.samples.push_back(sample);
    }

    /// Drop samples older than `current_time - window_width - 1`.
    pub fn evict_before(&mut self, current_time: f32, window_width: f32) {
        let cutoff = current_time - window_width - 1.0;
        while self
            .samples
            .front()
            .is_some_and(|sample| sample.time < cutoff)
        {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Minimum and maximum value over the retained samples.
    pub fn extremes(&self) -> Option<Extremes> {
        let mut iter = self.samples.iter();
        let first = iter.next()?;
        let mut extremes = Extremes {
            min: first.value,
            max: first.value,
        };
        for sample in iter {
            extremes.min = extremes.min.min(sample.value);
            extremes.max = extremes.max.max(sample.value);
        }
        Some(extremes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_from(samples: &[(f32, f32)]) -> DataWindow {
        let mut window = DataWindow::new();
        for &(time, value) in samples {
            window.push(Sample::new(time, value));
        }
        window
    }

    #[test]
    fn eviction_keeps_everything_at_and_past_the_cutoff() {
        let mut window = window_from(&[(0.0, 0.5), (1.0, 0.9), (2.0, 0.95)]);

        // Cutoff is 2 - 5 - 1 = -4; nothing leaves.
        window.evict_before(2.0, 5.0);
        assert_eq!(window.len(), 3);

        // Cutoff is 10 - 5 - 1 = 4; everything leaves.
        window.evict_before(10.0, 5.0);
        assert!(window.is_empty());
    }

    #[test]
    fn eviction_boundary_is_exclusive() {
        let mut window = window_from(&[(4.0, 0.1), (5.0, 0.2)]);

        // Sample at exactly the cutoff time stays.
        window.evict_before(10.0, 5.0);
        assert_eq!(window.len(), 2);

        window.evict_before(10.1, 5.0);
        assert_eq!(window.len(), 1);
        assert_eq!(window.iter().next().unwrap().time, 5.0);
    }

    #[test]
    fn every_remaining_sample_is_within_the_margin() {
        let mut window = window_from(&[
            (0.0, 0.1),
            (0.5, 0.2),
            (1.5, 0.3),
            (3.0, 0.4),
            (6.0, 0.5),
            (9.0, 0.6),
        ]);

        let (t, w) = (9.0, 4.0);
        window.evict_before(t, w);
        assert!(window.iter().all(|sample| sample.time >= t - w - 1.0));
        assert!(!window.is_empty());
    }

    #[test]
    fn empty_window_is_valid() {
        let mut window = DataWindow::new();
        window.evict_before(100.0, 5.0);
        assert!(window.is_empty());
        assert!(window.extremes().is_none());
        assert!(window.last().is_none());
    }

    #[test]
    fn extremes_cover_all_values() {
        let window = window_from(&[(0.0, 0.5), (1.0, 0.9), (2.0, 0.1), (3.0, 0.7)]);
        let extremes = window.extremes().unwrap();
        assert_eq!(extremes.min, 0.1);
        assert_eq!(extremes.max, 0.9);
    }
}
