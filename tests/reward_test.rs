use multiversx_sc_scenario::imports::*;

use predictions_market::accumulators::{Accumulators, Contribution};
use predictions_market::reward::{payout, proposal_reward};
use predictions_market::types::{max_value, Bounds, Proposal};

const SCALE: u128 = 1 << 32;
const E: u128 = 1_000_000_000_000_000_000_000_000_000;

fn big(value: u128) -> BigUint<StaticApi> {
    BigUint::from_bytes_be(&value.to_be_bytes())
}

fn raw_proposal(
    lower: BigUint<StaticApi>,
    upper: BigUint<StaticApi>,
    stake: BigUint<StaticApi>,
) -> Proposal<StaticApi> {
    Proposal {
        source: ManagedAddress::zero(),
        epoch: 0,
        lower,
        upper,
        stake,
    }
}

fn freeze(proposals: Vec<Proposal<StaticApi>>) -> (Accumulators<StaticApi>, Vec<Proposal<StaticApi>>) {
    let mut acc = Accumulators::new();
    for p in proposals.iter() {
        acc.proposal_count += 1;
        acc.accumulate(&Contribution::new(&p.stake, &p.lower, &p.upper));
    }
    (acc, proposals)
}

/// Bounds in whole price units, stakes in raw token units.
fn closed_epoch(entries: &[(u128, u128, u128)]) -> (Accumulators<StaticApi>, Vec<Proposal<StaticApi>>) {
    freeze(
        entries
            .iter()
            .map(|&(lower, upper, stake)| {
                raw_proposal(big(lower * SCALE), big(upper * SCALE), big(stake))
            })
            .collect(),
    )
}

fn ground_truth(lower: u128, upper: u128) -> Bounds<StaticApi> {
    Bounds::new(big(lower * SCALE), big(upper * SCALE))
}

fn assert_conserved(acc: &Accumulators<StaticApi>, rewards: &[BigUint<StaticApi>]) {
    let total = rewards
        .iter()
        .fold(BigUint::<StaticApi>::zero(), |sum, reward| sum + reward);
    let floor_loss = big(rewards.len() as u128);
    assert!(total <= acc.stake_total);
    assert!(&total + &floor_loss >= acc.stake_total);
}

fn all_rewards(
    acc: &Accumulators<StaticApi>,
    truth: &Bounds<StaticApi>,
    proposals: &[Proposal<StaticApi>],
) -> Vec<BigUint<StaticApi>> {
    proposals
        .iter()
        .map(|p| proposal_reward(acc, truth, p))
        .collect()
}

#[test]
fn test_three_proposal_rewards() {
    let (acc, proposals) = closed_epoch(&[
        (40_000, 60_000, 1_000_000_000),
        (30_000, 50_000, 5_000_000_000),
        (50_000, 70_000, 1),
    ]);
    let truth = ground_truth(45_000, 55_000);

    let rewards = all_rewards(&acc, &truth, &proposals);
    assert_eq!(rewards[0], big(1_500_000_000));
    assert_eq!(rewards[1], big(4_500_000_000));
    assert_eq!(rewards[2], big(0));
}

#[test]
fn test_rewards_conserve_stake_total() {
    let (acc, proposals) = closed_epoch(&[
        (41_000, 47_500, 3_250_000_000_000_000_000),
        (39_000, 52_000, 1_000_000_000_000_000_000),
        (44_000, 46_000, 750_000_000_000_000_000),
        (10_000, 90_000, 5_000_000_000_000_000_000),
        (45_500, 45_600, 12_000_000_000_000_000),
        (47_000, 61_000, 9_990_000_000_000_000_000),
    ]);
    let truth = ground_truth(44_800, 46_100);

    assert_conserved(&acc, &all_rewards(&acc, &truth, &proposals));
}

#[test]
fn test_rewards_conserve_stake_total_with_wide_denominator() {
    // Errors near 2^180 push T·S − W past one limb.
    let (acc, proposals) = freeze(vec![
        raw_proposal(big(15 * E), big(20 * E), big(E)),
        raw_proposal(big(20 * E), big(40 * E), big(3 * E)),
        raw_proposal(big(10 * E), big(50 * E), big(2 * E / 3)),
        raw_proposal(big(25 * E), big(26 * E), big(7 * E)),
        raw_proposal(big(5 * E), big(60 * E), big(E / 9)),
    ]);
    let truth = Bounds::new(big(22 * E), big(27 * E));

    let rewards = all_rewards(&acc, &truth, &proposals);
    assert_conserved(&acc, &rewards);
    assert_eq!(rewards[3], big(7_313_137_487_107_002_330_289_949_191));
}

#[test]
fn test_max_valued_epoch_settles() {
    let max = max_value::<StaticApi>();
    let half = &max / 2u64;
    let third = &max / 3u64;
    let (acc, proposals) = freeze(vec![
        raw_proposal(BigUint::zero(), max.clone(), third.clone()),
        raw_proposal(BigUint::zero(), half.clone(), third.clone()),
        raw_proposal(half, max.clone(), third),
    ]);
    assert_eq!(acc.stake_total, max);

    let truth = Bounds::new(BigUint::zero(), big(1));
    assert_conserved(&acc, &all_rewards(&acc, &truth, &proposals));
}

#[test]
fn test_single_proposal_gets_stake_back() {
    let (acc, proposals) = closed_epoch(&[(1_000, 2_000, 777)]);
    let truth = ground_truth(90_000, 95_000);

    assert_eq!(proposal_reward(&acc, &truth, &proposals[0]), big(777));
}

#[test]
fn test_exact_forecast_takes_the_pool() {
    let (acc, proposals) = closed_epoch(&[(45_000, 55_000, 100), (20_000, 30_000, 100)]);
    let truth = ground_truth(45_000, 55_000);

    let rewards = all_rewards(&acc, &truth, &proposals);
    assert_eq!(rewards[0], big(200));
    assert_eq!(rewards[1], big(0));
}

#[test]
fn test_closer_forecast_beats_its_stake() {
    let (acc, proposals) = closed_epoch(&[
        (44_000, 56_000, 100),
        (30_000, 70_000, 100),
        (35_000, 60_000, 100),
    ]);
    let truth = ground_truth(45_000, 55_000);

    let rewards = all_rewards(&acc, &truth, &proposals);
    assert!(rewards[0] > big(100));
    assert!(rewards[1] < big(100));
}

#[test]
fn test_unanimous_exact_forecasts_refund_stakes() {
    let (acc, proposals) = closed_epoch(&[(45_000, 55_000, 30), (45_000, 55_000, 70)]);
    let truth = ground_truth(45_000, 55_000);

    let rewards = all_rewards(&acc, &truth, &proposals);
    assert_eq!(rewards[0], big(30));
    assert_eq!(rewards[1], big(70));
}

#[test]
fn test_payout_caps_at_unclaimed_pool() {
    assert_eq!(payout(big(40), &big(100), false), big(40));
    assert_eq!(payout(big(101), &big(100), false), big(100));
}

#[test]
fn test_last_claim_sweeps_flooring_dust() {
    let (acc, proposals) = closed_epoch(&[
        (41_000, 47_500, 3_250_000_000_000_000_000),
        (39_000, 52_000, 1_000_000_000_000_000_000),
        (10_000, 90_000, 5_000_000_000_000_000_000),
    ]);
    let truth = ground_truth(44_800, 46_100);

    let mut unclaimed = acc.stake_total.clone();
    let mut paid = BigUint::<StaticApi>::zero();
    for (position, p) in proposals.iter().enumerate() {
        let owed = proposal_reward(&acc, &truth, p);
        let amount = payout(owed, &unclaimed, position + 1 == proposals.len());
        unclaimed -= &amount;
        paid += &amount;
    }

    assert_eq!(paid, acc.stake_total);
    assert_eq!(unclaimed, BigUint::zero());
}
