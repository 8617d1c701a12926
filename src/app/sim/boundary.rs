use crate::scenario::Zone;

pub(in crate::app) const MIN_BOUNDARY: f32 = 10.0;
pub(in crate::app) const MAX_BOUNDARY: f32 = 90.0;
pub(in crate::app) const MIN_GAP: f32 = 10.0;

/// The two lane separators, as percentages of canvas width. Invariants held
/// by construction: both values in [10, 90] and `upper - lower >= 10`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Boundaries {
    lower: f32,
    upper: f32,
}

impl Default for Boundaries {
    fn default() -> Self {
        Self::new(33.0, 66.0)
    }
}

impl Boundaries {
    pub(in crate::app) fn new(lower: f32, upper: f32) -> Self {
        let lower = lower.clamp(MIN_BOUNDARY, MAX_BOUNDARY - MIN_GAP);
        let upper = upper.clamp(lower + MIN_GAP, MAX_BOUNDARY);
        Self { lower, upper }
    }

    pub(in crate::app) fn lower(self) -> f32 {
        self.lower
    }

    pub(in crate::app) fn upper(self) -> f32 {
        self.upper
    }

    /// Moves the lower separator, clamped against the upper one.
    pub(in crate::app) fn with_lower(self, lower: f32) -> Self {
        Self {
            lower: lower.clamp(MIN_BOUNDARY, self.upper - MIN_GAP),
            upper: self.upper,
        }
    }

    /// Moves the upper separator, clamped against the lower one.
    pub(in crate::app) fn with_upper(self, upper: f32) -> Self {
        Self {
            lower: self.lower,
            upper: upper.clamp(self.lower + MIN_GAP, MAX_BOUNDARY),
        }
    }

    /// Classifies a horizontal position (percent of canvas width).
    pub(in crate::app) fn zone_at(self, x_percent: f32) -> Zone {
        if x_percent < self.lower {
            Zone::Ai
        } else if x_percent > self.upper {
            Zone::Human
        } else {
            Zone::Shared
        }
    }

    /// Horizontal center of a zone's lane, as a percent of canvas width.
    pub(in crate::app) fn lane_center(self, zone: Zone) -> f32 {
        match zone {
            Zone::Ai => self.lower * 0.5,
            Zone::Shared => self.lower + (self.upper - self.lower) * 0.5,
            Zone::Human => self.upper + (100.0 - self.upper) * 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(boundaries: Boundaries) {
        assert!(boundaries.lower() >= MIN_BOUNDARY, "{boundaries:?}");
        assert!(boundaries.upper() <= MAX_BOUNDARY, "{boundaries:?}");
        assert!(
            boundaries.upper() - boundaries.lower() >= MIN_GAP,
            "{boundaries:?}"
        );
    }

    #[test]
    fn construction_clamps_invalid_pairs() {
        assert_valid(Boundaries::new(50.0, 40.0));
        assert_valid(Boundaries::new(-20.0, 400.0));
        assert_valid(Boundaries::new(90.0, 90.0));
        assert_valid(Boundaries::new(0.0, 0.0));

        let swapped = Boundaries::new(80.0, 20.0);
        assert_eq!(swapped.lower(), 80.0);
        assert_eq!(swapped.upper(), 90.0);
    }

    #[test]
    fn single_handle_moves_respect_the_margin() {
        let boundaries = Boundaries::new(33.0, 66.0);

        assert_eq!(boundaries.with_lower(80.0).lower(), 56.0);
        assert_eq!(boundaries.with_lower(-5.0).lower(), 10.0);
        assert_eq!(boundaries.with_upper(20.0).upper(), 43.0);
        assert_eq!(boundaries.with_upper(99.0).upper(), 90.0);

        for value in [-100.0, 0.0, 10.0, 37.0, 62.5, 90.0, 250.0] {
            assert_valid(boundaries.with_lower(value));
            assert_valid(boundaries.with_upper(value));
        }
    }

    #[test]
    fn zone_at_splits_the_axis_into_three_lanes() {
        let boundaries = Boundaries::new(33.0, 66.0);

        assert_eq!(boundaries.zone_at(0.0), Zone::Ai);
        assert_eq!(boundaries.zone_at(32.9), Zone::Ai);
        assert_eq!(boundaries.zone_at(33.0), Zone::Shared);
        assert_eq!(boundaries.zone_at(50.0), Zone::Shared);
        assert_eq!(boundaries.zone_at(66.0), Zone::Shared);
        assert_eq!(boundaries.zone_at(66.1), Zone::Human);
        assert_eq!(boundaries.zone_at(100.0), Zone::Human);
    }

    #[test]
    fn zone_at_is_stable_for_a_fixed_position() {
        let boundaries = Boundaries::new(33.0, 66.0);
        for percent in [0.0, 33.0, 40.0, 66.0, 95.0] {
            assert_eq!(boundaries.zone_at(percent), boundaries.zone_at(percent));
        }
    }

    #[test]
    fn lane_centers_sit_inside_their_lanes() {
        let boundaries = Boundaries::new(33.0, 66.0);
        assert_eq!(boundaries.zone_at(boundaries.lane_center(Zone::Ai)), Zone::Ai);
        assert_eq!(
            boundaries.zone_at(boundaries.lane_center(Zone::Shared)),
            Zone::Shared
        );
        assert_eq!(
            boundaries.zone_at(boundaries.lane_center(Zone::Human)),
            Zone::Human
        );
    }
}
