use multiversx_sc_scenario::imports::*;

use predictions_market::accumulators::{Accumulators, Contribution};
use predictions_market::aggregation::aggregate;
use predictions_market::types::{max_value, Bounds, Proposal};

const SCALE: u64 = 1 << 32;

fn big(value: u64) -> BigUint<StaticApi> {
    BigUint::from(value)
}

fn proposal(lower: u64, upper: u64, stake: u64) -> Proposal<StaticApi> {
    Proposal {
        source: ManagedAddress::zero(),
        epoch: 0,
        lower: big(lower * SCALE),
        upper: big(upper * SCALE),
        stake: big(stake),
    }
}

fn live_set(
    entries: &[(u64, u64, u64)],
) -> (Accumulators<StaticApi>, ManagedVec<StaticApi, Proposal<StaticApi>>) {
    let mut acc = Accumulators::new();
    let mut proposals = ManagedVec::new();
    for &(lower, upper, stake) in entries {
        let p = proposal(lower, upper, stake);
        acc.proposal_count += 1;
        acc.accumulate(&Contribution::new(&p.stake, &p.lower, &p.upper));
        proposals.push(p);
    }
    (acc, proposals)
}

#[test]
fn test_single_proposal_halves_each_side() {
    let (acc, proposals) = live_set(&[(50_000, 70_000, 1)]);

    let result = aggregate(&acc, &proposals);
    assert_eq!(
        result,
        Bounds::new(big(55_000 * SCALE), big(65_000 * SCALE))
    );
}

#[test]
fn test_three_proposal_reference_vector() {
    let (acc, proposals) = live_set(&[
        (40_000, 60_000, 1_000_000_000),
        (30_000, 50_000, 5_000_000_000),
        (50_000, 70_000, 1),
    ]);

    let result = aggregate(&acc, &proposals);
    assert_eq!(result.lower, big(154_499_518_016_363));
    assert_eq!(result.upper, big(203_414_423_350_011));
}

#[test]
fn test_interval_is_asymmetric_for_skewed_proposals() {
    let (acc, proposals) = live_set(&[(10_000, 20_000, 10), (19_000, 60_000, 1)]);

    let result = aggregate(&acc, &proposals);
    let mean = &acc.stake_1st_moment_raw / &acc.stake_total;
    let below = &mean - &result.lower;
    let above = &result.upper - &mean;
    assert!(above > below);
}

#[test]
fn test_zero_stake_entries_are_skipped() {
    let (acc, mut proposals) = live_set(&[(40_000, 60_000, 3), (45_000, 50_000, 2)]);
    let expected = aggregate(&acc, &proposals);

    proposals.push(proposal(1, 90_000, 0));
    assert_eq!(aggregate(&acc, &proposals), expected);
}

#[test]
#[should_panic]
fn test_no_live_stake_fails() {
    let acc = Accumulators::<StaticApi>::new();
    let proposals = ManagedVec::<StaticApi, Proposal<StaticApi>>::new();
    let _ = aggregate(&acc, &proposals);
}

#[test]
fn test_max_valued_proposals_aggregate() {
    let max = max_value::<StaticApi>();
    let half = &max / 2u64;
    let quarter = &max / 4u64;

    let mut acc = Accumulators::new();
    let mut proposals = ManagedVec::<StaticApi, Proposal<StaticApi>>::new();
    for (lower, upper) in [
        (BigUint::zero(), max.clone()),
        (BigUint::zero(), half.clone()),
        (half.clone(), max.clone()),
        (big(1), max.clone()),
    ] {
        let p = Proposal {
            source: ManagedAddress::zero(),
            epoch: 0,
            lower,
            upper,
            stake: quarter.clone(),
        };
        acc.proposal_count += 1;
        acc.accumulate(&Contribution::new(&p.stake, &p.lower, &p.upper));
        proposals.push(p);
    }

    let result = aggregate(&acc, &proposals);
    assert_eq!(
        result.lower,
        BigUint::from_bytes_be(&19_807_040_628_566_084_398_385_987_585u128.to_be_bytes())
    );
    assert_eq!(
        result.upper,
        BigUint::from_bytes_be(&59_421_121_885_698_253_195_157_962_750u128.to_be_bytes())
    );
    assert!(result.upper <= max);
}
