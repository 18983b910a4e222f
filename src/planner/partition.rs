//! Partition-and-shuffle planning
//!
//! Cuts the whole source into contiguous fragments of random length, then
//! permutes their order. Start and end times are never changed by the shuffle.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::errors::PlanError;
use crate::domain::model::{DurationRange, FragmentPlan, Interval, PlanMode};

use super::{ensure_positive, uniform, EPSILON};

/// Split `[0, total_duration)` into contiguous fragments in source order.
///
/// A tail shorter than `range.min` is merged into the previous fragment, so the
/// last fragment may run up to `range.max + range.min`. A source shorter than
/// `range.min` becomes a single fragment covering all of it.
pub fn partition<R: Rng + ?Sized>(
    rng: &mut R,
    total_duration: f64,
    range: DurationRange,
) -> Result<Vec<Interval>, PlanError> {
    ensure_positive("source duration", total_duration)?;
    let range = DurationRange::new(range.min, range.max)?;

    if total_duration < range.min {
        return Ok(vec![Interval::new(0.0, total_duration)?]);
    }

    let mut fragments: Vec<Interval> = Vec::new();
    let mut current = 0.0;

    loop {
        let remaining = total_duration - current;
        if remaining < range.min {
            if let Some(last) = fragments.last_mut() {
                last.end = total_duration;
            }
            break;
        }

        let length = uniform(rng, range.min, range.max.min(remaining));
        let mut end = current + length;
        if total_duration - end < EPSILON {
            end = total_duration;
        }

        fragments.push(Interval::new(current, end)?);
        current = end;
    }

    Ok(fragments)
}

/// Partition the source, then apply a uniform random permutation to the order.
pub fn plan_partition_shuffle<R: Rng + ?Sized>(
    rng: &mut R,
    total_duration: f64,
    range: DurationRange,
) -> Result<FragmentPlan, PlanError> {
    let mut fragments = partition(rng, total_duration, range)?;
    fragments.shuffle(rng);

    let mut plan = FragmentPlan::new(PlanMode::PartitionShuffle, total_duration, fragments);
    // The fragments tile the source, so the sum is the source duration.
    plan.total_duration = total_duration;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::seeded_rng;

    fn range(min: f64, max: f64) -> DurationRange {
        DurationRange::new(min, max).unwrap()
    }

    fn assert_tiles(fragments: &[Interval], total: f64) {
        assert_eq!(fragments.first().unwrap().start, 0.0);
        assert_eq!(fragments.last().unwrap().end, total);
        for pair in fragments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_partition_ten_seconds() {
        let mut rng = seeded_rng(2024);
        let fragments = partition(&mut rng, 10.0, range(1.0, 2.0)).unwrap();

        assert!((5..=10).contains(&fragments.len()), "got {}", fragments.len());
        assert_tiles(&fragments, 10.0);
    }

    #[test]
    fn test_partition_merges_short_tail() {
        // 2 + 2 + 2 leaves 0.5s, which joins the last fragment.
        let mut rng = seeded_rng(1);
        let fragments = partition(&mut rng, 6.5, range(2.0, 2.0)).unwrap();

        assert_eq!(fragments.len(), 3);
        assert_tiles(&fragments, 6.5);
        assert!((fragments[2].duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_partition_exact_multiple() {
        let mut rng = seeded_rng(1);
        let fragments = partition(&mut rng, 6.0, range(2.0, 2.0)).unwrap();
        assert_eq!(fragments.len(), 3);
        assert_tiles(&fragments, 6.0);
    }

    #[test]
    fn test_source_shorter_than_min_is_one_fragment() {
        let mut rng = seeded_rng(1);
        let fragments = partition(&mut rng, 0.75, range(1.0, 2.0)).unwrap();
        assert_eq!(fragments, vec![Interval::new(0.0, 0.75).unwrap()]);

        let plan = plan_partition_shuffle(&mut rng, 0.75, range(1.0, 2.0)).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.total_duration, 0.75);
    }

    #[test]
    fn test_max_larger_than_source() {
        let mut rng = seeded_rng(17);
        let fragments = partition(&mut rng, 3.0, range(1.0, 10.0)).unwrap();
        assert_tiles(&fragments, 3.0);
    }

    #[test]
    fn test_shuffle_keeps_fragments() {
        let mut rng = seeded_rng(77);
        let plan = plan_partition_shuffle(&mut rng, 30.0, range(1.0, 2.0)).unwrap();

        let mut sorted = plan.intervals.clone();
        sorted.sort_by(|a, b| a.start.total_cmp(&b.start));
        assert_tiles(&sorted, 30.0);
        assert_eq!(plan.total_duration, 30.0);
        assert_eq!(plan.mode, PlanMode::PartitionShuffle);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let mut rng = seeded_rng(0);
        assert!(partition(&mut rng, 0.0, range(1.0, 2.0)).is_err());
        assert!(partition(&mut rng, f64::INFINITY, range(1.0, 2.0)).is_err());
        assert!(partition(&mut rng, 10.0, DurationRange { min: 0.0, max: 2.0 }).is_err());
    }
}
