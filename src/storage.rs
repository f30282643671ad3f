multiversx_sc::imports!();

use crate::accumulators::Accumulators;
use crate::types::{EpochSummary, Proposal};

#[multiversx_sc::module]
pub trait StorageModule {
    // ── Configuration ──

    #[storage_mapper("stakeToken")]
    fn stake_token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[storage_mapper("oracleAddress")]
    fn oracle_address(&self) -> SingleValueMapper<ManagedAddress>;

    /// Ground-truth half-width in basis points of one standard deviation
    #[storage_mapper("groundTruthWidthBps")]
    fn ground_truth_width_bps(&self) -> SingleValueMapper<u64>;

    // ── Epoch state ──

    #[view(getCurrentEpoch)]
    #[storage_mapper("currentEpoch")]
    fn current_epoch(&self) -> SingleValueMapper<u64>;

    #[view(getEpochStart)]
    #[storage_mapper("epochStart")]
    fn epoch_start(&self) -> SingleValueMapper<u64>;

    #[view(getAccumulators)]
    #[storage_mapper("accumulators")]
    fn accumulators(&self) -> SingleValueMapper<Accumulators<Self::Api>>;

    #[storage_mapper("epochSummary")]
    fn epoch_summary(&self, epoch: u64) -> SingleValueMapper<EpochSummary<Self::Api>>;

    /// Stake of a closed epoch not yet paid out
    #[view(getEpochUnclaimedStake)]
    #[storage_mapper("epochUnclaimedStake")]
    fn epoch_unclaimed_stake(&self, epoch: u64) -> SingleValueMapper<BigUint>;

    /// Whether oracle ticks are negated when resolving the next ground truth
    #[view(isPriceInverted)]
    #[storage_mapper("invertPrice")]
    fn invert_price(&self) -> SingleValueMapper<bool>;

    // ── Proposals ──

    /// Highest index assigned so far
    #[storage_mapper("proposalCount")]
    fn proposal_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, index: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    /// Unclaimed proposal indices per epoch
    #[storage_mapper("epochProposals")]
    fn epoch_proposals(&self, epoch: u64) -> UnorderedSetMapper<u64>;
}
