//! Adaptive vertical range with hysteresis.

/// Minimum and maximum value over the visible samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes {
    pub min: f32,
    pub max: f32,
}

/// Vertical mapping bounds plus whether the controller is tracking.
///
/// This is a continuous smoothing filter, not a state machine:
/// `adjusting` is a hysteresis flag derived from where the data sits in
/// the projected [0, 1] interval, and the bounds ease toward the data
/// extremes while it is set. The dead band between the stop thresholds
/// (0.2/0.8) and the resume thresholds (0.4/0.6) keeps the plot from
/// oscillating between rescales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalRange {
    pub bottom: f32,
    pub top: f32,
    pub adjusting: bool,
}

impl Default for VerticalRange {
    fn default() -> Self {
        Self {
            bottom: 0.0,
            top: 1.0,
            adjusting: true,
        }
    }
}

impl VerticalRange {
    /// Map a value to a normalized vertical position: 0 at `bottom`,
    /// 1 at `top`.
    #[inline]
    pub fn project(&self, value: f32) -> f32 {
        (value - self.bottom) / (self.top - self.bottom)
    }

    /// One controller step for a frame with visible data.
    #[must_use]
    pub fn updated(self, extremes: Extremes) -> VerticalRange {
        let projected_max = self.project(extremes.max);
        let projected_min = self.project(extremes.min);

        let mut adjusting = self.adjusting;

        // Data comfortably fills the plot: stop chasing it.
        if projected_max > 0.8 && projected_min < 0.2 {
            adjusting = false;
        }

        if projected_max > 1.0 || projected_min < 0.0 {
            // Data escaped the visible range.
            adjusting = true;
        } else if projected_max < 0.6 || projected_min > 0.4 {
            // Data occupies too little of the plot.
            adjusting = true;
        }

        let (bottom, top) = if adjusting {
            (
                0.95 * self.bottom + 0.05 * extremes.min,
                0.95 * self.top + 0.05 * extremes.max,
            )
        } else {
            (self.bottom, self.top)
        };

        VerticalRange {
            bottom,
            top,
            adjusting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(bottom: f32, top: f32, adjusting: bool) -> VerticalRange {
        VerticalRange {
            bottom,
            top,
            adjusting,
        }
    }

    #[test]
    fn comfortable_data_reaches_a_fixed_point() {
        // Projections land in (0.8, 1.0) and (0.0, 0.2): tracking stops.
        let settled = range(0.0, 1.0, true).updated(Extremes { min: 0.1, max: 0.9 });
        assert!(!settled.adjusting);

        // Repeated frames with unchanged data leave the bounds alone.
        let again = settled.updated(Extremes { min: 0.1, max: 0.9 });
        assert_eq!(again, settled);
    }

    #[test]
    fn escaped_maximum_forces_tracking_toward_the_data() {
        let start = range(0.0, 1.0, false);
        let updated = start.updated(Extremes { min: 0.1, max: 1.5 });

        assert!(updated.adjusting);
        assert!(updated.top > start.top);
        assert!(updated.top < 1.5);
    }

    #[test]
    fn escaped_minimum_forces_tracking() {
        let updated = range(0.0, 1.0, false).updated(Extremes {
            min: -0.5,
            max: 0.9,
        });
        assert!(updated.adjusting);
        assert!(updated.bottom < 0.0);
    }

    #[test]
    fn shrunken_data_resumes_tracking() {
        // Everything between 0.45 and 0.55: far from both edges.
        let updated = range(0.0, 1.0, false).updated(Extremes {
            min: 0.45,
            max: 0.55,
        });
        assert!(updated.adjusting);
        assert!(updated.top < 1.0);
        assert!(updated.bottom > 0.0);
    }

    #[test]
    fn dead_band_holds_the_range_steady() {
        // Projections at 0.7/0.3 trip neither the stop band nor the
        // resume bands; a non-adjusting range stays put.
        let start = range(0.0, 1.0, false);
        let updated = start.updated(Extremes { min: 0.3, max: 0.7 });
        assert_eq!(updated, start);
    }

    #[test]
    fn blend_converges_exponentially() {
        let mut current = range(0.0, 1.0, true);
        let extremes = Extremes { min: 2.0, max: 4.0 };

        for _ in 0..400 {
            current = current.updated(extremes);
        }

        assert!((current.bottom - 2.0).abs() < 1e-2);
        assert!((current.top - 4.0).abs() < 1e-2);
    }

    #[test]
    fn default_range_starts_tracking() {
        let range = VerticalRange::default();
        assert_eq!(range.bottom, 0.0);
        assert_eq!(range.top, 1.0);
        assert!(range.adjusting);
    }

    #[test]
    fn projection_is_affine_in_the_bounds() {
        let range = range(2.0, 6.0, false);
        assert_eq!(range.project(2.0), 0.0);
        assert_eq!(range.project(6.0), 1.0);
        assert_eq!(range.project(4.0), 0.5);
    }
}
