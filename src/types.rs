multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::accumulators::Accumulators;

/// Bit width of bounds, stakes and the live stake pool accepted by the ledger.
///
/// The reward numerator `T·stake·(S−e)` is bounded by `n·2^(4·VALUE_BITS+1)`,
/// which must stay below the 512-bit wide range.
pub const VALUE_BITS: usize = 96;

/// Largest accepted bound, stake or pool total, `2^96 - 1`. Ground truth
/// saturates here.
pub fn max_value<M: ManagedTypeApi>() -> BigUint<M> {
    (BigUint::from(1u64) << VALUE_BITS) - BigUint::from(1u64)
}

// ============================================================
// Bounds: a forecast or observed interval
// ============================================================

/// `{lower, upper}` in the shared fixed-point price format
/// (see `PRICE_FRACTIONAL_BITS`).
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct Bounds<M: ManagedTypeApi> {
    pub lower: BigUint<M>,
    pub upper: BigUint<M>,
}

impl<M: ManagedTypeApi> Bounds<M> {
    pub fn new(lower: BigUint<M>, upper: BigUint<M>) -> Self {
        Bounds { lower, upper }
    }

    pub fn zero() -> Self {
        Bounds {
            lower: BigUint::zero(),
            upper: BigUint::zero(),
        }
    }
}

// ============================================================
// Proposal: one staked forecast
// ============================================================

#[type_abi]
#[derive(
    TopEncode, TopDecode, NestedEncode, NestedDecode, ManagedVecItem, Clone, PartialEq, Debug,
)]
pub struct Proposal<M: ManagedTypeApi> {
    pub source: ManagedAddress<M>,
    /// Epoch the forecast was submitted in. Immutable after creation.
    pub epoch: u64,
    pub lower: BigUint<M>,
    pub upper: BigUint<M>,
    pub stake: BigUint<M>,
}

// ============================================================
// Epoch Summary: frozen state of a completed epoch
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct EpochSummary<M: ManagedTypeApi> {
    /// Resolved one advance after the epoch itself closes
    pub ground_truth: Option<Bounds<M>>,
    pub aggregate: Bounds<M>,
    pub accumulators: Accumulators<M>,
}
