multiversx_sc::imports!();

use crate::accumulators::Accumulators;
use crate::types::{Bounds, Proposal};
use crate::wide::{abs_diff, WideUint};

/// Share of the epoch's stake pool owed to `proposal`.
///
/// With `e` the proposal's squared error, `S` the epoch's total squared error
/// and `W` its stake-weighted total:
///
/// `reward = T · stake·(S − e) / (T·S − W)`, `T = stake_total`
///
/// The numerators over the epoch sum to `T·S − W`, so rewards sum to `T`
/// up to one unit of flooring per proposal. An epoch with a single proposal,
/// or where every proposal hits the ground truth exactly, refunds stakes.
pub fn proposal_reward<M: ManagedTypeApi>(
    accumulators: &Accumulators<M>,
    ground_truth: &Bounds<M>,
    proposal: &Proposal<M>,
) -> BigUint<M> {
    if accumulators.proposal_count == 1 {
        return proposal.stake.clone();
    }

    let lower_error = abs_diff(&proposal.lower, &ground_truth.lower);
    let upper_error = abs_diff(&proposal.upper, &ground_truth.upper);
    let own_error = WideUint::square(&lower_error).add(&WideUint::square(&upper_error));

    let sum_sq_err = accumulators.squared_error(ground_truth);
    let sum_sq_err_weighted = accumulators.weighted_squared_error(ground_truth);

    let denominator = sum_sq_err
        .mul_scalar(&accumulators.stake_total)
        .sub(&sum_sq_err_weighted);
    if denominator.is_zero() {
        return proposal.stake.clone();
    }

    let numerator = sum_sq_err.sub(&own_error).mul_scalar(&proposal.stake);
    numerator
        .mul_scalar(&accumulators.stake_total)
        .div(&denominator)
}

/// Amount actually paid for a claim owed `owed` out of an epoch pool with
/// `unclaimed` left. The final claim of an epoch takes the whole remainder,
/// so flooring dust goes to the last claimant instead of staying locked.
pub fn payout<M: ManagedTypeApi>(
    owed: BigUint<M>,
    unclaimed: &BigUint<M>,
    is_last_claim: bool,
) -> BigUint<M> {
    if is_last_claim || owed > *unclaimed {
        unclaimed.clone()
    } else {
        owed
    }
}
