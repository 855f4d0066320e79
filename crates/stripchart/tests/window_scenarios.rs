//! End-to-end scenarios for the sliding window, label cache and range
//! controller, driven frame by frame the way the driver loop does it.

use stripchart::{DataWindow, Sample, TickLabelCache, VerticalRange};
use stripchart_raster::{FontSpec, TextShaper};

const WINDOW_WIDTH: f32 = 5.0;

fn cached_ticks(cache: &TickLabelCache) -> Vec<i64> {
    cache.iter().map(|label| label.tick).collect()
}

#[test]
fn scrolling_scenario_evicts_on_the_documented_boundary() {
    let mut shaper = TextShaper::new();
    let font = FontSpec::sans(30.0);

    let mut data = DataWindow::new();
    let mut ticks = TickLabelCache::new();
    let mut range = VerticalRange::default();

    // Three one-second frames with one sample each.
    for &(t, value) in &[(0.0, 0.5), (1.0, 0.9), (2.0, 0.95)] {
        data.push(Sample::new(t, value));
        data.evict_before(t, WINDOW_WIDTH);
        ticks.evict_before(t, WINDOW_WIDTH);
        ticks.ensure_coverage(t, &mut shaper, &font);
        if let Some(extremes) = data.extremes() {
            range = range.updated(extremes);
        }
    }

    // At t=2 the eviction boundary is 2 - 5 - 1 = -4: labels 1, 2, 3 are
    // present and tick 0 has not yet been evicted.
    let at_two = cached_ticks(&ticks);
    assert!(at_two.contains(&1) && at_two.contains(&2) && at_two.contains(&3));
    assert_eq!(at_two, vec![0, 1, 2, 3]);
    assert_eq!(data.len(), 3);

    // Advance frame by frame to t=10, where the boundary is 4: tick 0
    // must be gone and the run must stay contiguous.
    for t in 3..=10 {
        let t = t as f32;
        data.evict_before(t, WINDOW_WIDTH);
        ticks.evict_before(t, WINDOW_WIDTH);
        ticks.ensure_coverage(t, &mut shaper, &font);
    }

    let at_ten = cached_ticks(&ticks);
    assert!(!at_ten.contains(&0));
    assert_eq!(at_ten, (4..=11).collect::<Vec<i64>>());

    // All three samples are older than the boundary.
    assert!(data.is_empty());

    // An empty window skips the range update entirely; the bounds stay
    // finite and untouched.
    let before = range;
    if let Some(extremes) = data.extremes() {
        range = range.updated(extremes);
    }
    assert_eq!(range, before);
    assert!(range.bottom.is_finite() && range.top.is_finite());
    assert!(range.top > range.bottom);
}

#[test]
fn range_follows_data_that_escapes_upward() {
    let mut data = DataWindow::new();
    let mut range = VerticalRange::default();

    data.push(Sample::new(0.0, 2.5));
    let extremes = data.extremes().unwrap();

    let updated = range.updated(extremes);
    assert!(updated.adjusting);
    assert!(updated.top > range.top);

    range = updated;
    let again = range.updated(extremes);
    assert!(again.top > range.top);
}

#[test]
fn labels_are_never_regenerated_for_a_tick() {
    let mut shaper = TextShaper::new();
    let font = FontSpec::sans(30.0);
    let mut ticks = TickLabelCache::new();

    ticks.ensure_coverage(1.0, &mut shaper, &font);
    let count = ticks.len();

    // Re-running coverage for the same time generates nothing new.
    ticks.ensure_coverage(1.0, &mut shaper, &font);
    assert_eq!(ticks.len(), count);
}
