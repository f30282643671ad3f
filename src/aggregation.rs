multiversx_sc::imports!();

use multiversx_sc::api::ErrorApiImpl;

use crate::accumulators::Accumulators;
use crate::types::{Bounds, Proposal};
use crate::wide::mul_div;

pub const ERR_NO_LIVE_STAKE: &[u8] = b"No live stake";

/// Portion of a proposal on one side of the mean: `(stake·width, ⌊(a+b)/2⌋)`.
struct Side<M: ManagedTypeApi> {
    weighted_width: BigUint<M>,
    midpoint: BigUint<M>,
}

fn below<M: ManagedTypeApi>(proposal: &Proposal<M>, mean: &BigUint<M>) -> Option<Side<M>> {
    if proposal.lower >= *mean {
        return None;
    }
    let top = if proposal.upper < *mean {
        proposal.upper.clone()
    } else {
        mean.clone()
    };
    Some(Side {
        weighted_width: &proposal.stake * &(&top - &proposal.lower),
        midpoint: (&proposal.lower + &top) / 2u64,
    })
}

fn above<M: ManagedTypeApi>(proposal: &Proposal<M>, mean: &BigUint<M>) -> Option<Side<M>> {
    if proposal.upper <= *mean {
        return None;
    }
    let bottom = if proposal.lower > *mean {
        proposal.lower.clone()
    } else {
        mean.clone()
    };
    Some(Side {
        weighted_width: &proposal.stake * &(&proposal.upper - &bottom),
        midpoint: (&bottom + &proposal.upper) / 2u64,
    })
}

/// Stake-weighted consensus interval of the live proposals.
///
/// The center is the stake-weighted mean of midpoints. Each side's spread is
/// the mean distance of that side's proposal mass from the center, weighted
/// by `stake·width`, so the interval is asymmetric when the proposals are.
/// Zero-stake entries are skipped.
pub fn aggregate<M: ManagedTypeApi>(
    accumulators: &Accumulators<M>,
    proposals: &ManagedVec<M, Proposal<M>>,
) -> Bounds<M> {
    if accumulators.stake_total == 0u64 {
        M::error_api_impl().signal_error(ERR_NO_LIVE_STAKE)
    }
    let mean = &accumulators.stake_1st_moment_raw / &accumulators.stake_total;

    let mut raw_moment_lower = BigUint::zero();
    let mut raw_moment_upper = BigUint::zero();
    for proposal in proposals.iter() {
        if proposal.stake == 0u64 {
            continue;
        }
        if let Some(side) = below(&proposal, &mean) {
            raw_moment_lower += &side.weighted_width;
        }
        if let Some(side) = above(&proposal, &mean) {
            raw_moment_upper += &side.weighted_width;
        }
    }

    let mut second_moment_lower = BigUint::zero();
    let mut second_moment_upper = BigUint::zero();
    for proposal in proposals.iter() {
        if proposal.stake == 0u64 {
            continue;
        }
        if let Some(side) = below(&proposal, &mean) {
            let distance = &mean - &side.midpoint;
            second_moment_lower += &mul_div(&side.weighted_width, &distance, &raw_moment_lower);
        }
        if let Some(side) = above(&proposal, &mean) {
            let distance = &side.midpoint - &mean;
            second_moment_upper += &mul_div(&side.weighted_width, &distance, &raw_moment_upper);
        }
    }

    Bounds {
        lower: &mean - &second_moment_lower,
        upper: &mean + &second_moment_upper,
    }
}
