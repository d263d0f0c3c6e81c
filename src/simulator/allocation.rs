//! Seat allocation across stages.

use tracing::debug;

use crate::error::ConfigurationError;
use crate::policy::{effective_reduction_rate, DuplicateWinPolicy};
use crate::rounding::round_count;
use crate::stage::Stage;

/// Seats assigned to one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeatAllocation {
    /// Share of the total seats by weight.
    pub allocated: u64,
    /// What is left for new winners after the duplicate-win reduction.
    pub effective: u64,
}

/// Splits `total_seats` across `stages` proportionally to weight.
///
/// Every stage except the last gets `round(total_seats * weight / total_weight)`;
/// the last stage takes whatever remains of `round(total_seats)`, so the
/// allocations always add up to it. A negative remainder (more rounded-up
/// stages than seats) clamps to zero.
/// Effective seats are then `round(allocated * (1 - reduction_rate))`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn allocate_seats(
    stages: &[Stage],
    total_weight: f64,
    total_seats: f64,
    policy: Option<&DuplicateWinPolicy>,
) -> Result<Vec<SeatAllocation>, ConfigurationError> {
    // Unreachable through `Simulator::add_stage`, which rejects weight <= 0.
    if !stages.is_empty() && total_weight == 0.0 {
        return Err(ConfigurationError::ZeroTotalWeight {
            stage_count: stages.len(),
        });
    }
    let Some(last) = stages.len().checked_sub(1) else {
        return Ok(Vec::new());
    };

    let rounded_total = round_count(total_seats);
    let mut running_allocated: u64 = 0;
    let mut allocated = Vec::with_capacity(stages.len());
    for (i, stage) in stages.iter().enumerate() {
        let seats = if i < last {
            round_count(total_seats * (stage.weight() / total_weight))
        } else {
            rounded_total.saturating_sub(running_allocated)
        };
        running_allocated = running_allocated.saturating_add(seats);
        allocated.push(seats);
    }

    let reduction_rate = effective_reduction_rate(policy)?;
    debug!(
        total_seats,
        total_weight,
        reduction_rate,
        stages = stages.len(),
        "allocated seats"
    );

    Ok(allocated
        .into_iter()
        .map(|seats| SeatAllocation {
            allocated: seats,
            effective: round_count(seats as f64 * (1.0 - reduction_rate)),
        })
        .collect())
}
