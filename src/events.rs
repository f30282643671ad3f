multiversx_sc::imports!();

#[multiversx_sc::module]
pub trait EventsModule {
    #[event("proposalSubmitted")]
    fn proposal_submitted_event(
        &self,
        #[indexed] source: &ManagedAddress,
        #[indexed] epoch: u64,
        #[indexed] index: u64,
        #[indexed] lower: &BigUint,
        #[indexed] upper: &BigUint,
        stake: &BigUint,
    );

    #[event("proposalUpdated")]
    fn proposal_updated_event(
        &self,
        #[indexed] source: &ManagedAddress,
        #[indexed] epoch: u64,
        #[indexed] index: u64,
        #[indexed] lower: &BigUint,
        #[indexed] upper: &BigUint,
        stake: &BigUint,
    );

    #[event("proposalRemoved")]
    fn proposal_removed_event(
        &self,
        #[indexed] source: &ManagedAddress,
        #[indexed] epoch: u64,
        #[indexed] index: u64,
        refund: &BigUint,
    );

    #[event("advanced")]
    fn advanced_event(&self, #[indexed] epoch: u64, #[indexed] start: u64);

    #[event("groundTruthResolved")]
    fn ground_truth_resolved_event(
        &self,
        #[indexed] epoch: u64,
        #[indexed] lower: &BigUint,
        #[indexed] upper: &BigUint,
    );

    #[event("claimedReward")]
    fn claimed_reward_event(
        &self,
        #[indexed] recipient: &ManagedAddress,
        #[indexed] epoch: u64,
        #[indexed] index: u64,
        amount: &BigUint,
    );
}
