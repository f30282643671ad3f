multiversx_sc::imports!();

use crate::accumulators::{Accumulators, Contribution};
use crate::types::{max_value, Proposal};

// ============================================================
// Proposal Ledger: stake custody and incremental accumulation
// ============================================================

#[multiversx_sc::module]
pub trait LedgerModule: crate::storage::StorageModule + crate::events::EventsModule {
    // ========================================================
    // ENDPOINT: submitProposal
    // Stake is the attached payment in the stake token.
    // ========================================================

    #[payable("*")]
    #[endpoint(submitProposal)]
    fn submit_proposal(&self, lower: BigUint, upper: BigUint) -> u64 {
        let caller = self.blockchain().get_caller();
        let stake = self.received_stake();
        self.require_valid_forecast(&lower, &upper, &stake);

        let index = match self.proposal_count().get().checked_add(1) {
            Some(index) => index,
            None => sc_panic!("Proposal index space exhausted"),
        };
        let epoch = self.current_epoch().get();

        let mut accumulators = self.accumulators().get();
        accumulators.proposal_count += 1;
        accumulators.accumulate(&Contribution::new(&stake, &lower, &upper));
        self.store_live_accumulators(&accumulators);

        let proposal = Proposal {
            source: caller.clone(),
            epoch,
            lower,
            upper,
            stake,
        };
        self.proposals(index).set(&proposal);
        self.proposal_count().set(index);
        self.epoch_proposals(epoch).insert(index);

        self.proposal_submitted_event(
            &caller,
            epoch,
            index,
            &proposal.lower,
            &proposal.upper,
            &proposal.stake,
        );

        index
    }

    // ========================================================
    // ENDPOINT: updateProposal
    // Increases attach the difference; decreases are refunded.
    // ========================================================

    #[payable("*")]
    #[endpoint(updateProposal)]
    fn update_proposal(&self, index: u64, lower: BigUint, upper: BigUint, stake: BigUint) {
        let caller = self.blockchain().get_caller();
        let mut proposal = self.fluid_proposal(index, &caller);
        self.require_valid_forecast(&lower, &upper, &stake);

        let payment = self.received_stake();
        let refund = if stake > proposal.stake {
            require!(
                payment == &stake - &proposal.stake,
                "Payment must match stake increase"
            );
            BigUint::zero()
        } else {
            require!(payment == 0u64, "No payment expected");
            &proposal.stake - &stake
        };

        let mut accumulators = self.accumulators().get();
        accumulators.unaccumulate(&Contribution::new(
            &proposal.stake,
            &proposal.lower,
            &proposal.upper,
        ));
        accumulators.accumulate(&Contribution::new(&stake, &lower, &upper));
        self.store_live_accumulators(&accumulators);

        proposal.lower = lower;
        proposal.upper = upper;
        proposal.stake = stake;
        self.proposals(index).set(&proposal);

        if refund > 0u64 {
            self.send()
                .direct_esdt(&caller, &self.stake_token().get(), 0, &refund);
        }

        self.proposal_updated_event(
            &caller,
            proposal.epoch,
            index,
            &proposal.lower,
            &proposal.upper,
            &proposal.stake,
        );
    }

    // ========================================================
    // ENDPOINT: removeProposal
    // Withdraws a fluid proposal and refunds its full stake.
    // ========================================================

    #[endpoint(removeProposal)]
    fn remove_proposal(&self, index: u64) {
        let caller = self.blockchain().get_caller();
        let proposal = self.fluid_proposal(index, &caller);

        self.accumulators().update(|acc| {
            acc.proposal_count -= 1;
            acc.unaccumulate(&Contribution::new(
                &proposal.stake,
                &proposal.lower,
                &proposal.upper,
            ));
        });

        self.proposals(index).clear();
        self.epoch_proposals(proposal.epoch).swap_remove(&index);

        self.send()
            .direct_esdt(&caller, &self.stake_token().get(), 0, &proposal.stake);

        self.proposal_removed_event(&caller, proposal.epoch, index, &proposal.stake);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    /// Amount of stake token attached to the call. Other tokens are rejected.
    fn received_stake(&self) -> BigUint {
        let payment = self.call_value().egld_or_single_esdt();
        if payment.amount == 0u64 {
            return BigUint::zero();
        }
        require!(
            payment.token_identifier == EgldOrEsdtTokenIdentifier::esdt(self.stake_token().get())
                && payment.token_nonce == 0,
            "Invalid stake token"
        );
        payment.amount
    }

    fn require_valid_forecast(&self, lower: &BigUint, upper: &BigUint, stake: &BigUint) {
        require!(*stake > 0u64, "Stake must be positive");
        require!(lower < upper, "Lower bound must be below upper bound");

        let max = max_value::<Self::Api>();
        require!(*upper <= max, "Bound out of range");
        require!(*stake <= max, "Stake out of range");
    }

    /// The live pool total is held to the same cap as a single stake.
    fn store_live_accumulators(&self, accumulators: &Accumulators<Self::Api>) {
        require!(
            accumulators.stake_total <= max_value::<Self::Api>(),
            "Stake pool out of range"
        );
        self.accumulators().set(accumulators);
    }

    /// Loads a proposal the caller may still modify.
    fn fluid_proposal(&self, index: u64, caller: &ManagedAddress) -> Proposal<Self::Api> {
        require!(
            !self.proposals(index).is_empty(),
            "Proposal does not exist"
        );
        let proposal = self.proposals(index).get();
        require!(
            proposal.source == *caller,
            "Only the proposal source can modify it"
        );
        require!(
            proposal.epoch == self.current_epoch().get(),
            "Proposal epoch has already advanced"
        );
        proposal
    }

    /// Live proposals of `epoch`, in set order.
    fn live_proposals(&self, epoch: u64) -> ManagedVec<Proposal<Self::Api>> {
        let mut result = ManagedVec::new();
        for index in self.epoch_proposals(epoch).iter() {
            result.push(self.proposals(index).get());
        }
        result
    }
}
