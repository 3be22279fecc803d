//! Flag counts and percentage formatting.

/// Placeholder shown when a percentage has no defined value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Flagged and total counts for one data selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagSummary {
    /// Number of data points in the selection.
    pub total: u64,
    /// Number of those points marked invalid. Never exceeds `total`.
    pub flagged: u64,
}

impl FlagSummary {
    /// Create a summary, checking `flagged <= total`.
    pub fn new(total: u64, flagged: u64) -> Result<Self, FlagError> {
        let summary = Self { total, flagged };
        summary.validate()?;
        Ok(summary)
    }

    /// Check `flagged <= total`.
    pub fn validate(&self) -> Result<(), FlagError> {
        if self.flagged > self.total {
            return Err(FlagError::FlaggedExceedsTotal {
                flagged: self.flagged,
                total: self.total,
            });
        }
        Ok(())
    }
}

/// Error for inconsistent flag counts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FlagError {
    #[error("flagged count {flagged} exceeds total {total}")]
    FlaggedExceedsTotal { flagged: u64, total: u64 },
}

/// Percentage of the selection that is flagged, to three decimals.
///
/// Returns [`NOT_AVAILABLE`] for an empty selection.
///
/// ```
/// use recipe_flags::{FlagSummary, percent_flagged};
///
/// assert_eq!(percent_flagged(&FlagSummary { total: 200, flagged: 50 }), "25.000%");
/// assert_eq!(percent_flagged(&FlagSummary { total: 0, flagged: 0 }), "N/A");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn percent_flagged(summary: &FlagSummary) -> String {
    if summary.total == 0 {
        return NOT_AVAILABLE.to_owned();
    }
    format_percent(100.0 * summary.flagged as f64 / summary.total as f64)
}

/// Additional percentage flagged between two snapshots of the same selection.
///
/// The flagged-count difference is taken over `before.total`, which is
/// assumed equal to `after.total`. Negative when flags were removed.
///
/// ```
/// use recipe_flags::{FlagSummary, percent_flagged_delta};
///
/// let before = FlagSummary { total: 200, flagged: 50 };
/// let after = FlagSummary { total: 200, flagged: 70 };
/// assert_eq!(percent_flagged_delta(&before, &after), "10.000%");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn percent_flagged_delta(before: &FlagSummary, after: &FlagSummary) -> String {
    if before.total == 0 {
        return NOT_AVAILABLE.to_owned();
    }
    let delta = after.flagged as f64 - before.flagged as f64;
    format_percent(100.0 * delta / before.total as f64)
}

fn format_percent(value: f64) -> String {
    format!("{value:.3}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total: u64, flagged: u64) -> FlagSummary {
        FlagSummary { total, flagged }
    }

    #[test]
    fn test_percent_flagged() {
        assert_eq!(percent_flagged(&summary(200, 50)), "25.000%");
        assert_eq!(percent_flagged(&summary(3, 1)), "33.333%");
        assert_eq!(percent_flagged(&summary(3, 2)), "66.667%");
        assert_eq!(percent_flagged(&summary(10, 0)), "0.000%");
        assert_eq!(percent_flagged(&summary(10, 10)), "100.000%");
    }

    #[test]
    fn test_percent_flagged_zero_total() {
        assert_eq!(percent_flagged(&summary(0, 0)), NOT_AVAILABLE);
    }

    #[test]
    fn test_delta() {
        assert_eq!(
            percent_flagged_delta(&summary(200, 50), &summary(200, 70)),
            "10.000%"
        );
        assert_eq!(
            percent_flagged_delta(&summary(200, 50), &summary(200, 50)),
            "0.000%"
        );
    }

    #[test]
    fn test_delta_negative() {
        assert_eq!(
            percent_flagged_delta(&summary(200, 70), &summary(200, 60)),
            "-5.000%"
        );
    }

    #[test]
    fn test_delta_uses_before_total() {
        // after.total is ignored even when it disagrees
        assert_eq!(
            percent_flagged_delta(&summary(100, 10), &summary(400, 30)),
            "20.000%"
        );
    }

    #[test]
    fn test_delta_shared_denominator_avoids_rounding_composition() {
        // 1/3 and 2/3 round to 33.333 and 66.667, whose difference is 33.334
        assert_eq!(
            percent_flagged_delta(&summary(3, 1), &summary(3, 2)),
            "33.333%"
        );
    }

    #[test]
    fn test_delta_zero_total() {
        assert_eq!(
            percent_flagged_delta(&summary(0, 0), &summary(10, 5)),
            NOT_AVAILABLE
        );
    }

    #[test]
    fn test_checked_constructor() {
        assert_eq!(FlagSummary::new(10, 3), Ok(summary(10, 3)));
        assert_eq!(
            FlagSummary::new(10, 11),
            Err(FlagError::FlaggedExceedsTotal {
                flagged: 11,
                total: 10
            })
        );
    }
}
