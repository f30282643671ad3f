multiversx_sc::imports!();

use crate::tick_math::{mean_tick, price_at_tick, PRICE_FRACTIONAL_BITS};
use crate::types::Bounds;

// ============================================================
// Observation schedule
// ============================================================

pub const OBSERVATION_COUNT: usize = 10;

/// Seconds-ago offsets requested from the oracle, oldest first.
/// Nine 6-minute windows covering 57 to 3 minutes ago.
pub const OBSERVATION_OFFSETS: [u64; OBSERVATION_COUNT] =
    [3_420, 3_060, 2_700, 2_340, 1_980, 1_620, 1_260, 900, 540, 180];

pub const SAMPLE_WINDOW: u64 = 360;

pub const FULL_WINDOW: u64 = 3_240;

/// Observations the oracle must retain to answer the oldest offset
/// (one per 6-second block).
pub const ORACLE_CARDINALITY: u64 = 600;

/// sqrt(pi/2): mean absolute deviation to standard deviation under a normal.
const MAD_TO_STDDEV_NUMERATOR: u64 = 12_533_141;
const MAD_TO_STDDEV_DENOMINATOR: u64 = 10_000_000;

pub const BPS_DENOMINATOR: u64 = 10_000;

pub struct GroundTruth<M: ManagedTypeApi> {
    pub bounds: Bounds<M>,
    /// Orientation to use for the following round
    pub invert_next: bool,
}

fn oriented(tick: i64, invert: bool) -> i64 {
    if invert {
        -tick
    } else {
        tick
    }
}

/// Derives the observed interval from oracle tick cumulatives sampled at
/// `OBSERVATION_OFFSETS`.
///
/// The center is the full-window geometric mean price. The half-width is the
/// mean absolute deviation of the nine window prices from it, converted to a
/// standard deviation and scaled by `width_bps / 10_000`. Both edges saturate
/// at `[0, max_bound]`.
pub fn from_observations<M: ManagedTypeApi>(
    tick_cumulatives: &[i64; OBSERVATION_COUNT],
    invert: bool,
    width_bps: u64,
    max_bound: &BigUint<M>,
) -> GroundTruth<M> {
    let full_tick = mean_tick::<M>(
        tick_cumulatives[0],
        tick_cumulatives[OBSERVATION_COUNT - 1],
        FULL_WINDOW,
    );
    let mean = price_at_tick::<M>(oriented(full_tick, invert), max_bound);

    let mut deviation_total = BigUint::zero();
    for window in tick_cumulatives.windows(2) {
        let tick = mean_tick::<M>(window[0], window[1], SAMPLE_WINDOW);
        let price = price_at_tick::<M>(oriented(tick, invert), max_bound);
        deviation_total += &crate::wide::abs_diff(&price, &mean);
    }
    let mad = deviation_total / (OBSERVATION_COUNT as u64 - 1);

    let band = (mad * MAD_TO_STDDEV_NUMERATOR * width_bps)
        / (MAD_TO_STDDEV_DENOMINATOR * BPS_DENOMINATOR);

    let lower = if band >= mean {
        BigUint::zero()
    } else {
        &mean - &band
    };
    let raised = &mean + &band;
    let upper = if raised > *max_bound {
        max_bound.clone()
    } else {
        raised
    };

    let one = BigUint::from(1u64) << PRICE_FRACTIONAL_BITS;
    let invert_next = if mean < one { !invert } else { invert };

    GroundTruth {
        bounds: Bounds::new(lower, upper),
        invert_next,
    }
}
