//! Cached tick labels for the x axis.

use std::collections::VecDeque;

use stripchart_raster::{FontSpec, ShapedText, TextShaper};

/// One shaped label for an integer tick.
pub struct TickLabel {
    pub tick: i64,
    pub text: ShapedText,
}

/// Shaped labels for every integer tick in the visible range, plus one
/// unit of lookahead and lookbehind.
///
/// Labels are generated lazily in strictly increasing tick order and
/// never regenerated; eviction mirrors the data window's boundary. After
/// a large time jump the run restarts from the tick nearest the new
/// time, because generation only restarts when the cache is empty.
pub struct TickLabelCache {
    labels: VecDeque<TickLabel>,
    separator: char,
}

impl TickLabelCache {
    pub fn new() -> Self {
        Self {
            labels: VecDeque::new(),
            separator: grouping_separator(),
        }
    }

    /// Extend the run of labels until it covers `current_time + 1`.
    pub fn ensure_coverage(&mut self, current_time: f32, shaper: &mut TextShaper, font: &FontSpec) {
        let horizon = current_time.floor() as i64 + 1;
        while self.labels.back().is_none_or(|label| label.tick < horizon) {
            let tick = match self.labels.back() {
                Some(label) => label.tick + 1,
                // Start at the tick nearest the current time, not zero,
                // so the cache is correct after a large jump.
                None => current_time.round() as i64,
            };

            let text = shaper.shape(&group_digits(tick, self.separator), font);
            self.labels.push_back(TickLabel { tick, text });
        }
    }

    /// Drop labels older than `current_time - window_width - 1`.
    pub fn evict_before(&mut self, current_time: f32, window_width: f32) {
        let cutoff = current_time - window_width - 1.0;
        while self
            .labels
            .front()
            .is_some_and(|label| (label.tick as f32) < cutoff)
        {
            self.labels.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickLabel> {
        self.labels.iter()
    }
}

impl Default for TickLabelCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Thousands separator for the current process locale.
///
/// Locales that group with a period use one; everything else, including
/// the C locale, gets a comma.
fn grouping_separator() -> char {
    let locale = sys_locale::get_locale().unwrap_or_default();
    let language = locale.split(['-', '_']).next().unwrap_or("");
    match language {
        "de" | "es" | "it" | "nl" | "pt" | "tr" | "id" => '.',
        _ => ',',
    }
}

/// Format an integer with grouped digits, e.g. `1234567` -> `1,234,567`.
fn group_digits(value: i64, separator: char) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    let leading = digits.len() % 3;
    for (index, digit) in digits.chars().enumerate() {
        if index != 0 && index % 3 == leading % 3 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_font() -> FontSpec {
        FontSpec::sans(30.0)
    }

    fn ticks_of(cache: &TickLabelCache) -> Vec<i64> {
        cache.iter().map(|label| label.tick).collect()
    }

    #[test]
    fn coverage_starts_at_the_nearest_tick() {
        let mut shaper = TextShaper::new();
        let mut cache = TickLabelCache::new();

        cache.ensure_coverage(2.0, &mut shaper, &tick_font());
        assert_eq!(ticks_of(&cache), vec![2, 3]);
    }

    #[test]
    fn advancing_time_extends_the_run_contiguously() {
        let mut shaper = TextShaper::new();
        let mut cache = TickLabelCache::new();
        let font = tick_font();

        for step in 0..=20 {
            let t = step as f32 * 0.1;
            cache.ensure_coverage(t, &mut shaper, &font);
        }

        // Gapless, duplicate-free run from the first tick to floor(t)+1.
        assert_eq!(ticks_of(&cache), vec![0, 1, 2, 3]);
    }

    #[test]
    fn eviction_boundary_matches_the_data_window() {
        let mut shaper = TextShaper::new();
        let mut cache = TickLabelCache::new();
        let font = tick_font();

        for t in [0.0, 1.0, 2.0] {
            cache.evict_before(t, 5.0);
            cache.ensure_coverage(t, &mut shaper, &font);
        }

        // At t=2 with a 5-unit window the cutoff is -4: nothing has left.
        assert_eq!(ticks_of(&cache), vec![0, 1, 2, 3]);

        // Advance frame by frame to t=10. The cutoff there is 4, so
        // ticks 0..=3 are gone and the run stays gapless up to 11.
        for t in 3..=10 {
            cache.evict_before(t as f32, 5.0);
            cache.ensure_coverage(t as f32, &mut shaper, &font);
        }
        assert_eq!(ticks_of(&cache), vec![4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn large_jump_with_empty_cache_restarts_nearby() {
        let mut shaper = TextShaper::new();
        let mut cache = TickLabelCache::new();
        let font = tick_font();

        cache.ensure_coverage(1.0, &mut shaper, &font);
        cache.evict_before(1_000_000.0, 5.0);
        assert!(cache.is_empty());

        cache.ensure_coverage(1_000_000.0, &mut shaper, &font);
        assert_eq!(ticks_of(&cache), vec![1_000_000, 1_000_001]);
    }

    #[test]
    fn grouping_inserts_separators() {
        assert_eq!(group_digits(0, ','), "0");
        assert_eq!(group_digits(999, ','), "999");
        assert_eq!(group_digits(1_000, ','), "1,000");
        assert_eq!(group_digits(1_234_567, ','), "1,234,567");
        assert_eq!(group_digits(-1_234, ','), "-1,234");
        assert_eq!(group_digits(12_345, '.'), "12.345");
    }
}
