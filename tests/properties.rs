//! Property-based tests for the cascade.

use proptest::prelude::*;

use lottery_cascade::{DuplicateWinPolicy, Simulator};

#[derive(Debug, Clone)]
struct StageSpec {
    ratio: f64,
    extra: i64,
    weight: f64,
}

/// Strategy: a stage with integer-valued weight in 1..=10.
fn stage_strategy() -> impl Strategy<Value = StageSpec> {
    (0.0..=1.0f64, 0..50_000i64, 1..=10u32).prop_map(|(ratio, extra, weight)| StageSpec {
        ratio,
        extra,
        weight: f64::from(weight),
    })
}

/// Strategy: a simulator whose attendance is drawn from `attendance`.
fn simulator_with(
    attendance: impl Strategy<Value = u64>,
) -> impl Strategy<Value = (Simulator, Vec<StageSpec>)> {
    (
        attendance,
        1..=50i64,
        1..=5i64,
        0..500_000u64,
        prop::option::of(0.0..=1.0f64),
        prop::collection::vec(stage_strategy(), 0..=6),
    )
        .prop_map(|(attendance, events, targets, population, rate, stages)| {
            let policy = rate.map(DuplicateWinPolicy::seat_reduction);
            let mut sim =
                Simulator::new(attendance, events, [("target", targets)], population, policy)
                    .unwrap();
            for (i, s) in stages.iter().enumerate() {
                sim.add_stage(format!("stage-{i}"), s.ratio, s.extra, s.weight)
                    .unwrap();
            }
            (sim, stages)
        })
}

/// Strategy: any valid simulator, including zero and tiny attendance where
/// stage shares round to nothing and the last stage's remainder clamps to 0.
fn simulator_strategy() -> impl Strategy<Value = (Simulator, Vec<StageSpec>)> {
    simulator_with(prop_oneof![0..=64u64, 0..2_000_000u64])
}

/// Strategy: a simulator with at least 200 seats across its targeted events,
/// so every stage's share stays above the accumulated rounding error.
fn roomy_simulator_strategy() -> impl Strategy<Value = (Simulator, Vec<StageSpec>)> {
    simulator_with(10_000..2_000_000u64)
}

proptest! {
    // 1. The distribution sums to one
    #[test]
    fn distribution_sums_to_one((mut sim, _) in simulator_strategy()) {
        let total = sim.calculate().unwrap().probabilities.total();
        prop_assert!((total - 1.0).abs() < 1e-6, "total={total}");
    }

    // 1b. Zero attendance leaves every stage empty and the whole mass on "no win"
    #[test]
    fn zero_attendance_means_no_win((mut sim, _) in simulator_with(Just(0u64))) {
        let result = sim.calculate().unwrap();
        prop_assert!(result.stages.iter().all(|s| s.allocated_seats == 0 && s.winners == 0));
        prop_assert_eq!(result.probabilities.no_win(), Some(1.0));
    }

    // 2. Every probability is a probability
    #[test]
    fn probabilities_in_unit_interval((mut sim, _) in simulator_strategy()) {
        let result = sim.calculate().unwrap();
        for entry in &result.probabilities {
            prop_assert!((0.0..=1.0).contains(&entry.probability), "{entry:?}");
        }
        for stage in &result.stages {
            prop_assert!((0.0..=1.0).contains(&stage.conditional_win_prob));
        }
    }

    // 3. Allocations add up to the rounded seat total
    #[test]
    fn last_stage_absorbs_remainder((mut sim, stages) in roomy_simulator_strategy()) {
        prop_assume!(!stages.is_empty());
        let expected = sim.total_seats_for_target_events().round_ties_even();
        let result = sim.calculate().unwrap();
        let sum: u64 = result.stages.iter().map(|s| s.allocated_seats).sum();
        #[allow(clippy::cast_precision_loss)]
        let sum = sum as f64;
        prop_assert_eq!(sum, expected);
    }

    // 4. Effective seats follow the reduction formula
    #[test]
    fn effective_seats_follow_reduction((mut sim, _) in simulator_strategy()) {
        let rate = sim
            .duplicate_win_policy()
            .map_or(0.0, |p| p.reduction_rate().unwrap());
        let result = sim.calculate().unwrap();
        for stage in &result.stages {
            #[allow(clippy::cast_precision_loss)]
            let expected = (stage.allocated_seats as f64 * (1.0 - rate)).round_ties_even();
            #[allow(clippy::cast_precision_loss)]
            let effective = stage.effective_seats as f64;
            prop_assert_eq!(effective, expected);
            prop_assert!(stage.effective_seats <= stage.allocated_seats);
        }
    }

    // 5. Earlier winners never re-apply
    #[test]
    fn carry_forward((mut sim, _) in simulator_strategy()) {
        let result = sim.calculate().unwrap();
        let mut earlier_winners = 0u64;
        for stage in &result.stages {
            prop_assert_eq!(
                stage.actual_applicants,
                stage.premise_applicants.saturating_sub(earlier_winners)
            );
            prop_assert!(stage.winners <= stage.effective_seats.min(stage.actual_applicants));
            earlier_winners += stage.winners;
        }
    }

    // 6. More weight never means fewer seats for that stage
    #[test]
    fn weight_monotonicity(
        stages in prop::collection::vec(stage_strategy(), 1..=6),
        pick in any::<prop::sample::Index>(),
        extra_weight in 1..=10u32,
    ) {
        let build = |bump: f64, idx: usize| {
            let mut sim = Simulator::new(300_000, 20, [("tokyo", 3)], 100_000, None).unwrap();
            for (i, s) in stages.iter().enumerate() {
                let weight = if i == idx { s.weight + bump } else { s.weight };
                sim.add_stage(format!("stage-{i}"), s.ratio, s.extra, weight).unwrap();
            }
            sim.calculate().unwrap().stages[idx].allocated_seats
        };
        let idx = pick.index(stages.len());
        let before = build(0.0, idx);
        let after = build(f64::from(extra_weight), idx);
        prop_assert!(after >= before, "before={before} after={after}");
    }
}
