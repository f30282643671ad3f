multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::types::Bounds;
use crate::wide::WideUint;

// ============================================================
// Accumulators: running sums over the live proposal set
// ============================================================

/// Running sums over every live proposal of the active epoch.
///
/// At all times this equals the elementwise sum of `Contribution::new` over
/// the live set. Rewards are computed from a frozen copy, so any drift here
/// would leak or burn stake.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct Accumulators<M: ManagedTypeApi> {
    pub proposal_count: u64,
    pub stake_total: BigUint<M>,
    /// Σ stake·⌊(lower+upper)/2⌋
    pub stake_1st_moment_raw: BigUint<M>,
    pub sum_of_lower_bounds: BigUint<M>,
    pub sum_of_upper_bounds: BigUint<M>,
    /// Σ stake·lower
    pub sum_of_lower_bounds_weighted: BigUint<M>,
    /// Σ stake·upper
    pub sum_of_upper_bounds_weighted: BigUint<M>,
    /// Σ (lower² + upper²)
    pub sum_of_squared_bounds: WideUint<M>,
    /// Σ stake·(lower² + upper²)
    pub sum_of_squared_bounds_weighted: WideUint<M>,
}

/// What a single `(stake, lower, upper)` adds to the `Accumulators`.
pub struct Contribution<M: ManagedTypeApi> {
    pub stake: BigUint<M>,
    pub stake_midpoint: BigUint<M>,
    pub lower: BigUint<M>,
    pub upper: BigUint<M>,
    pub stake_lower: BigUint<M>,
    pub stake_upper: BigUint<M>,
    pub squared: WideUint<M>,
    pub squared_weighted: WideUint<M>,
}

impl<M: ManagedTypeApi> Contribution<M> {
    pub fn new(stake: &BigUint<M>, lower: &BigUint<M>, upper: &BigUint<M>) -> Self {
        let midpoint = (lower + upper) / 2u64;
        let squared = WideUint::square(lower).add(&WideUint::square(upper));
        let squared_weighted = squared.mul_scalar(stake);

        Contribution {
            stake: stake.clone(),
            stake_midpoint: stake * &midpoint,
            lower: lower.clone(),
            upper: upper.clone(),
            stake_lower: stake * lower,
            stake_upper: stake * upper,
            squared,
            squared_weighted,
        }
    }
}

impl<M: ManagedTypeApi> Default for Accumulators<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ManagedTypeApi> Accumulators<M> {
    pub fn new() -> Self {
        Accumulators {
            proposal_count: 0,
            stake_total: BigUint::zero(),
            stake_1st_moment_raw: BigUint::zero(),
            sum_of_lower_bounds: BigUint::zero(),
            sum_of_upper_bounds: BigUint::zero(),
            sum_of_lower_bounds_weighted: BigUint::zero(),
            sum_of_upper_bounds_weighted: BigUint::zero(),
            sum_of_squared_bounds: WideUint::zero(),
            sum_of_squared_bounds_weighted: WideUint::zero(),
        }
    }

    pub fn accumulate(&mut self, contribution: &Contribution<M>) {
        self.stake_total += &contribution.stake;
        self.stake_1st_moment_raw += &contribution.stake_midpoint;
        self.sum_of_lower_bounds += &contribution.lower;
        self.sum_of_upper_bounds += &contribution.upper;
        self.sum_of_lower_bounds_weighted += &contribution.stake_lower;
        self.sum_of_upper_bounds_weighted += &contribution.stake_upper;
        self.sum_of_squared_bounds = self.sum_of_squared_bounds.add(&contribution.squared);
        self.sum_of_squared_bounds_weighted = self
            .sum_of_squared_bounds_weighted
            .add(&contribution.squared_weighted);
    }

    /// Exact inverse of `accumulate` for a contribution that is part of the sums.
    pub fn unaccumulate(&mut self, contribution: &Contribution<M>) {
        self.stake_total -= &contribution.stake;
        self.stake_1st_moment_raw -= &contribution.stake_midpoint;
        self.sum_of_lower_bounds -= &contribution.lower;
        self.sum_of_upper_bounds -= &contribution.upper;
        self.sum_of_lower_bounds_weighted -= &contribution.stake_lower;
        self.sum_of_upper_bounds_weighted -= &contribution.stake_upper;
        self.sum_of_squared_bounds = self.sum_of_squared_bounds.sub(&contribution.squared);
        self.sum_of_squared_bounds_weighted = self
            .sum_of_squared_bounds_weighted
            .sub(&contribution.squared_weighted);
    }

    /// Σ (lower − target.lower)² + (upper − target.upper)² over all proposals.
    pub fn squared_error(&self, target: &Bounds<M>) -> WideUint<M> {
        expand_squared_error(
            &self.sum_of_squared_bounds,
            &self.sum_of_lower_bounds,
            &self.sum_of_upper_bounds,
            &BigUint::from(self.proposal_count),
            target,
        )
    }

    /// Stake-weighted counterpart of `squared_error`.
    pub fn weighted_squared_error(&self, target: &Bounds<M>) -> WideUint<M> {
        expand_squared_error(
            &self.sum_of_squared_bounds_weighted,
            &self.sum_of_lower_bounds_weighted,
            &self.sum_of_upper_bounds_weighted,
            &self.stake_total,
            target,
        )
    }
}

/// `Σ(b−t)² = Σb² − 2t·Σb + n·t²`, for both bounds at once.
fn expand_squared_error<M: ManagedTypeApi>(
    sum_of_squares: &WideUint<M>,
    sum_of_lower: &BigUint<M>,
    sum_of_upper: &BigUint<M>,
    n: &BigUint<M>,
    target: &Bounds<M>,
) -> WideUint<M> {
    let target_squares = WideUint::square(&target.lower).add(&WideUint::square(&target.upper));
    let positive = sum_of_squares.add(&target_squares.mul_scalar(n));

    let cross_lower = WideUint::from_biguint(sum_of_lower).mul_scalar(&(&target.lower * 2u64));
    let cross_upper = WideUint::from_biguint(sum_of_upper).mul_scalar(&(&target.upper * 2u64));
    let negative = cross_lower.add(&cross_upper);

    positive.sub(&negative)
}
