//! Random-cuts planning
//!
//! Samples sub-clips anywhere in the source until the cumulative duration
//! reaches the target. Clips may overlap and are kept in generation order.

use rand::Rng;

use crate::domain::errors::PlanError;
use crate::domain::model::{DurationRange, FragmentPlan, Interval, PlanMode};

use super::{ensure_positive, uniform, EPSILON};

/// Build a random-cuts plan.
///
/// Requires `0 < range.min <= range.max < total_duration`. The target defaults
/// to `total_duration`. The last clip is shortened so the durations sum to the
/// target.
pub fn plan_random_cuts<R: Rng + ?Sized>(
    rng: &mut R,
    total_duration: f64,
    range: DurationRange,
    target_total: Option<f64>,
) -> Result<FragmentPlan, PlanError> {
    ensure_positive("source duration", total_duration)?;
    let range = DurationRange::new(range.min, range.max)?;
    if range.max >= total_duration {
        return Err(PlanError::invalid(format!(
            "maximum fragment duration {}s must be shorter than the source ({}s)",
            range.max, total_duration
        )));
    }

    let target = target_total.unwrap_or(total_duration);
    ensure_positive("target duration", target)?;

    let latest_start = total_duration - range.max;
    let mut intervals = Vec::new();
    let mut accumulated = 0.0;

    while target - accumulated > EPSILON {
        let start = uniform(rng, 0.0, latest_start);
        let mut length = uniform(rng, range.min, range.max);

        let gap = target - accumulated;
        let closes_target = length >= gap;
        if closes_target {
            length = gap;
        }

        let end = (start + length).min(total_duration);
        intervals.push(Interval::new(start, end)?);
        accumulated += length;

        if closes_target {
            break;
        }
    }

    Ok(FragmentPlan::new(PlanMode::RandomCuts, total_duration, intervals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::seeded_rng;

    fn range(min: f64, max: f64) -> DurationRange {
        DurationRange::new(min, max).unwrap()
    }

    #[test]
    fn test_fixed_length_clips_hit_target() {
        let mut rng = seeded_rng(42);
        let plan = plan_random_cuts(&mut rng, 5.0, range(2.0, 2.0), Some(4.0)).unwrap();

        assert_eq!(plan.len(), 2);
        for interval in plan.iter() {
            assert!((interval.duration() - 2.0).abs() < 1e-9);
        }
        assert!((plan.total_duration - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_last_clip_is_shortened() {
        let mut rng = seeded_rng(3);
        let plan = plan_random_cuts(&mut rng, 10.0, range(2.0, 2.0), Some(5.0)).unwrap();

        assert_eq!(plan.len(), 3);
        let last = plan.intervals.last().unwrap();
        assert!((last.duration() - 1.0).abs() < 1e-9);
        assert!((plan.total_duration - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_target_defaults_to_source_duration() {
        let mut rng = seeded_rng(11);
        let plan = plan_random_cuts(&mut rng, 12.0, range(1.0, 2.0), None).unwrap();
        assert!((plan.total_duration - 12.0).abs() < 1e-6);
        assert_eq!(plan.mode, PlanMode::RandomCuts);
        assert_eq!(plan.source_duration, 12.0);
    }

    #[test]
    fn test_target_shorter_than_min_yields_single_clip() {
        let mut rng = seeded_rng(8);
        let plan = plan_random_cuts(&mut rng, 10.0, range(1.0, 2.0), Some(0.5)).unwrap();
        assert_eq!(plan.len(), 1);
        assert!((plan.total_duration - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_max_not_shorter_than_source() {
        let mut rng = seeded_rng(0);
        let err = plan_random_cuts(&mut rng, 2.0, range(1.0, 2.0), None).unwrap_err();
        assert!(matches!(err, PlanError::InvalidRange { .. }));

        let err = plan_random_cuts(&mut rng, 1.5, range(1.0, 2.0), None).unwrap_err();
        assert!(matches!(err, PlanError::InvalidRange { .. }));
    }

    #[test]
    fn test_rejects_bad_target() {
        let mut rng = seeded_rng(0);
        assert!(plan_random_cuts(&mut rng, 10.0, range(1.0, 2.0), Some(0.0)).is_err());
        assert!(plan_random_cuts(&mut rng, 10.0, range(1.0, 2.0), Some(-3.0)).is_err());
        assert!(plan_random_cuts(&mut rng, 10.0, range(1.0, 2.0), Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_rejects_unvalidated_range() {
        let mut rng = seeded_rng(0);
        let inverted = DurationRange { min: 3.0, max: 1.0 };
        assert!(plan_random_cuts(&mut rng, 10.0, inverted, None).is_err());
    }

    #[test]
    fn test_intervals_stay_within_source() {
        for seed in 0..50 {
            let mut rng = seeded_rng(seed);
            let plan = plan_random_cuts(&mut rng, 7.5, range(0.5, 3.0), Some(40.0)).unwrap();
            for interval in plan.iter() {
                assert!(interval.fits_within(7.5), "seed {seed}: {interval}");
            }
        }
    }
}
