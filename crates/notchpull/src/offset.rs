//! Offset calibration and pull progress.
//!
//! Raw offset samples arrive in the scroll container's coordinate space; the
//! tracker rebases them against the indicator's resting position and turns
//! the pull distance into a normalized progress value.

/// Fixed calibration subtracted from every raw offset sample.
///
/// The indicator rests this many layout units below the container's
/// coordinate origin, so a content offset of exactly `OFFSET_BIAS` reads as
/// "not pulled at all".
pub const OFFSET_BIAS: f32 = 59.0;

/// Pull distance (after bias) at which a release commits to a refresh.
///
/// Doubles as the spacer travel: the top spacer grows to
/// `ARM_THRESHOLD * progress`, so a pull to the threshold shows the fully
/// stretched indicator at progress 1.
pub const ARM_THRESHOLD: f32 = 150.0;

/// Field updates produced from one raw offset sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedOffset {
    /// Rebased offset; always updated, armed or not (it keeps re-centering
    /// the morphing symbol while the pull signal is pinned).
    pub content_offset: f32,
    /// `None` while armed: progress and scroll offset stay where the release
    /// left them until the cycle resets.
    pub pull: Option<PullSignal>,
}

/// The live pull-distance signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PullSignal {
    pub scroll_offset: f32,
    /// Normalized pull distance, clamped to `[0, 1]`.
    pub progress: f32,
}

/// Converts a raw offset sample into the fields it may update.
///
/// Pure: the same `(raw_offset, armed)` pair always produces the same
/// result.
pub fn track_offset(raw_offset: f32, armed: bool) -> TrackedOffset {
    let adjusted = raw_offset - OFFSET_BIAS;
    TrackedOffset {
        content_offset: adjusted,
        pull: (!armed).then(|| PullSignal {
            scroll_offset: adjusted,
            progress: (adjusted / ARM_THRESHOLD).clamp(0.0, 1.0),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_matches_clamped_bias_formula() {
        for raw in [-100.0, 0.0, 59.0, 100.0, 134.0, 209.0, 500.0] {
            let tracked = track_offset(raw, false);
            let expected = ((raw - OFFSET_BIAS) / ARM_THRESHOLD).clamp(0.0, 1.0);
            assert_eq!(tracked.pull.unwrap().progress, expected, "raw={raw}");
        }
    }

    #[test]
    fn progress_saturates_at_the_bounds() {
        assert_eq!(track_offset(-500.0, false).pull.unwrap().progress, 0.0);
        assert_eq!(track_offset(5000.0, false).pull.unwrap().progress, 1.0);
    }

    #[test]
    fn resting_offset_reads_as_zero() {
        let tracked = track_offset(OFFSET_BIAS, false);
        assert_eq!(tracked.content_offset, 0.0);
        let pull = tracked.pull.unwrap();
        assert_eq!(pull.scroll_offset, 0.0);
        assert_eq!(pull.progress, 0.0);
    }

    #[test]
    fn armed_samples_only_update_content_offset() {
        let tracked = track_offset(300.0, true);
        assert_eq!(tracked.content_offset, 300.0 - OFFSET_BIAS);
        assert!(tracked.pull.is_none());
    }

    #[test]
    fn tracking_is_idempotent() {
        assert_eq!(track_offset(123.0, false), track_offset(123.0, false));
        assert_eq!(track_offset(123.0, true), track_offset(123.0, true));
    }
}
