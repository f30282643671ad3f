#![no_std]

multiversx_sc::imports!();

pub mod accumulators;
pub mod aggregation;
pub mod events;
pub mod ground_truth;
pub mod ledger;
pub mod oracle_proxy;
pub mod reward;
pub mod storage;
pub mod tick_math;
pub mod types;
pub mod wide;

use accumulators::Accumulators;
use ground_truth::{OBSERVATION_COUNT, OBSERVATION_OFFSETS, ORACLE_CARDINALITY};
use types::{max_value, Bounds, EpochSummary, Proposal};

// ============================================================
// Constants
// ============================================================

/// Epoch length: 1 hour in seconds
pub const EPOCH_DURATION: u64 = 3_600;

// ============================================================
// Contract
// ============================================================

#[multiversx_sc::contract]
pub trait PredictionsMarket:
    storage::StorageModule + events::EventsModule + ledger::LedgerModule
{
    // ========================================================
    // Init / Upgrade
    // ========================================================

    #[init]
    fn init(
        &self,
        stake_token: TokenIdentifier,
        oracle_address: ManagedAddress,
        ground_truth_width_bps: u64,
    ) {
        self.configure(stake_token, oracle_address, ground_truth_width_bps);
        self.request_oracle_history();
    }

    #[upgrade]
    fn upgrade(&self) {}

    fn configure(
        &self,
        stake_token: TokenIdentifier,
        oracle_address: ManagedAddress,
        ground_truth_width_bps: u64,
    ) {
        require!(
            stake_token.is_valid_esdt_identifier(),
            "Invalid stake token"
        );
        require!(
            ground_truth_width_bps > 0,
            "Ground truth width must be positive"
        );

        self.stake_token().set(&stake_token);
        self.oracle_address().set(&oracle_address);
        self.ground_truth_width_bps().set(ground_truth_width_bps);
        self.current_epoch().set(0u64);
        self.epoch_start().set(self.blockchain().get_block_timestamp());
        self.accumulators().set(Accumulators::new());
        self.invert_price().set(false);
        self.proposal_count().set(0u64);
    }

    /// The oldest observation offset must stay within the oracle's history.
    fn request_oracle_history(&self) {
        let oracle = self.oracle_address().get();
        self.tx()
            .to(&oracle)
            .typed(oracle_proxy::OracleProxy)
            .increase_observation_cardinality_next(ORACLE_CARDINALITY)
            .sync_call();
    }

    // ========================================================
    // ENDPOINT: advance
    // Permissionless. Freezes the current epoch and resolves
    // ground truth for the one before it.
    // ========================================================

    #[endpoint(advance)]
    fn advance(&self) {
        let now = self.blockchain().get_block_timestamp();
        require!(
            now >= self.epoch_start().get() + EPOCH_DURATION,
            "Epoch has not ended"
        );

        let closed = self.freeze_epoch(now);
        if closed > 0 {
            let tick_cumulatives = self.observe_oracle();
            self.resolve_ground_truth(closed - 1, &tick_cumulatives);
        }
    }

    /// Stores the summary of the current epoch, resets the live accumulators
    /// and opens the next epoch. Returns the index of the closed epoch.
    fn freeze_epoch(&self, now: u64) -> u64 {
        let epoch = self.current_epoch().get();
        let accumulators = self.accumulators().get();

        let aggregate = if accumulators.stake_total == 0u64 {
            Bounds::zero()
        } else {
            aggregation::aggregate(&accumulators, &self.live_proposals(epoch))
        };
        self.epoch_unclaimed_stake(epoch).set(&accumulators.stake_total);
        self.epoch_summary(epoch).set(EpochSummary {
            ground_truth: None,
            aggregate,
            accumulators,
        });

        self.accumulators().set(Accumulators::new());
        self.current_epoch().set(epoch + 1);
        self.epoch_start().set(now);

        self.advanced_event(epoch + 1, now);
        epoch
    }

    fn observe_oracle(&self) -> [i64; OBSERVATION_COUNT] {
        let mut seconds_agos: MultiValueEncoded<u64> = MultiValueEncoded::new();
        for offset in OBSERVATION_OFFSETS.iter() {
            seconds_agos.push(*offset);
        }

        let oracle = self.oracle_address().get();
        let observed: MultiValueEncoded<i64> = self
            .tx()
            .to(&oracle)
            .typed(oracle_proxy::OracleProxy)
            .observe(seconds_agos)
            .returns(ReturnsResult)
            .sync_call_readonly();

        let mut tick_cumulatives = [0i64; OBSERVATION_COUNT];
        let mut received = 0usize;
        for tick_cumulative in observed.into_iter() {
            require!(
                received < OBSERVATION_COUNT,
                "Unexpected oracle observation count"
            );
            tick_cumulatives[received] = tick_cumulative;
            received += 1;
        }
        require!(
            received == OBSERVATION_COUNT,
            "Unexpected oracle observation count"
        );
        tick_cumulatives
    }

    fn resolve_ground_truth(&self, epoch: u64, tick_cumulatives: &[i64; OBSERVATION_COUNT]) {
        let resolved = ground_truth::from_observations(
            tick_cumulatives,
            self.invert_price().get(),
            self.ground_truth_width_bps().get(),
            &max_value::<Self::Api>(),
        );
        self.invert_price().set(resolved.invert_next);

        self.epoch_summary(epoch)
            .update(|summary| summary.ground_truth = Some(resolved.bounds.clone()));

        self.ground_truth_resolved_event(epoch, &resolved.bounds.lower, &resolved.bounds.upper);
    }

    // ========================================================
    // ENDPOINT: claimReward
    // Pays the proposal's source and deletes the proposal.
    // ========================================================

    #[endpoint(claimReward)]
    fn claim_reward(&self, index: u64) -> BigUint {
        let (proposal, reward) = self.settle(index);

        self.proposals(index).clear();
        self.epoch_proposals(proposal.epoch).swap_remove(&index);
        self.epoch_unclaimed_stake(proposal.epoch)
            .update(|unclaimed| *unclaimed -= &reward);

        if reward > 0u64 {
            self.send()
                .direct_esdt(&proposal.source, &self.stake_token().get(), 0, &reward);
        }

        self.claimed_reward_event(&proposal.source, proposal.epoch, index, &reward);
        reward
    }

    fn settle(&self, index: u64) -> (Proposal<Self::Api>, BigUint) {
        require!(
            !self.proposals(index).is_empty(),
            "Proposal does not exist"
        );
        let proposal = self.proposals(index).get();
        require!(
            !self.epoch_summary(proposal.epoch).is_empty(),
            "Ground truth not yet known"
        );

        let summary = self.epoch_summary(proposal.epoch).get();
        let owed = match &summary.ground_truth {
            Some(ground_truth) => {
                reward::proposal_reward(&summary.accumulators, ground_truth, &proposal)
            }
            None => sc_panic!("Ground truth not yet known"),
        };

        let is_last_claim = self.epoch_proposals(proposal.epoch).len() == 1;
        let reward = reward::payout(
            owed,
            &self.epoch_unclaimed_stake(proposal.epoch).get(),
            is_last_claim,
        );
        (proposal, reward)
    }

    // ========================================================
    // VIEWS: read-only queries
    // ========================================================

    /// Aggregate of the most recently completed epoch.
    #[view(current)]
    fn current(&self) -> Bounds<Self::Api> {
        let epoch = self.current_epoch().get();
        require!(epoch > 0, "No completed epoch");
        self.epoch_summary(epoch - 1).get().aggregate
    }

    /// Aggregate of the live proposals of the current epoch.
    #[view(aggregate)]
    fn aggregate(&self) -> Bounds<Self::Api> {
        let accumulators = self.accumulators().get();
        let epoch = self.current_epoch().get();
        aggregation::aggregate(&accumulators, &self.live_proposals(epoch))
    }

    #[view(getPendingReward)]
    fn get_pending_reward(&self, index: u64) -> BigUint {
        let (_, reward) = self.settle(index);
        reward
    }

    #[view(getProposal)]
    fn get_proposal(&self, index: u64) -> Proposal<Self::Api> {
        require!(
            !self.proposals(index).is_empty(),
            "Proposal does not exist"
        );
        self.proposals(index).get()
    }

    #[view(getProposals)]
    fn get_proposals(&self, from: u64, count: u64) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        let total = self.proposal_count().get();
        if count == 0 || total == 0 {
            return result;
        }
        let start = if from == 0 { 1u64 } else { from };
        if start > total {
            return result;
        }
        let end = core::cmp::min(start.saturating_add(count - 1), total);

        for index in start..=end {
            if !self.proposals(index).is_empty() {
                result.push(self.proposals(index).get());
            }
        }
        result
    }

    #[view(getEpochProposals)]
    fn get_epoch_proposals(&self, epoch: u64) -> MultiValueEncoded<u64> {
        let mut result = MultiValueEncoded::new();
        for index in self.epoch_proposals(epoch).iter() {
            result.push(index);
        }
        result
    }

    #[view(getEpochSummary)]
    fn get_epoch_summary(&self, epoch: u64) -> EpochSummary<Self::Api> {
        require!(
            !self.epoch_summary(epoch).is_empty(),
            "Epoch not completed"
        );
        self.epoch_summary(epoch).get()
    }

    #[view(getMarketConfig)]
    fn get_market_config(&self) -> MultiValue4<TokenIdentifier, ManagedAddress, u64, u64> {
        let stake_token = self.stake_token().get();
        let oracle = self.oracle_address().get();
        let width = self.ground_truth_width_bps().get();
        (stake_token, oracle, width, EPOCH_DURATION).into()
    }
}
