multiversx_sc::imports!();

use multiversx_sc::api::ErrorApiImpl;

/// Ticks beyond this magnitude have no representable square-root price.
pub const MAX_TICK: i64 = 887_272;

/// Fractional bits of the shared price format.
pub const PRICE_FRACTIONAL_BITS: usize = 32;

pub const ERR_TICK_OUT_OF_RANGE: &[u8] = b"Tick out of range";

/// Q128.128 factors `sqrt(1.0001)^-(2^i)` for bit `i` of the absolute tick,
/// starting at bit 1 (bit 0 seeds the ratio directly).
const TICK_FACTORS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x09aa508b5b7a84e1c677de54f3e99bc9,
    0x005d6af8dedb81196699c329225ee604,
    0x00002216e584f5fa1ea926041bedfe98,
    0x00000000048a170391f7dc42444e8fa2,
];

const TICK_SEED_ODD: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

fn q128<M: ManagedTypeApi>(factor: u128) -> BigUint<M> {
    BigUint::from_bytes_be(&factor.to_be_bytes())
}

/// `sqrt(1.0001^tick)` as a Q128.128 fixed-point value.
pub fn sqrt_ratio_at_tick<M: ManagedTypeApi>(tick: i64) -> BigUint<M> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_TICK as u64 {
        M::error_api_impl().signal_error(ERR_TICK_OUT_OF_RANGE)
    }

    let mut ratio = if abs_tick & 1 != 0 {
        q128(TICK_SEED_ODD)
    } else {
        BigUint::from(1u64) << 128
    };
    for (bit, factor) in TICK_FACTORS.iter().enumerate() {
        if abs_tick & (2u64 << bit) != 0 {
            ratio = (ratio * q128(*factor)) >> 128;
        }
    }

    if tick > 0 {
        let max_q256 = (BigUint::from(1u64) << 256) - BigUint::from(1u64);
        ratio = max_q256 / ratio;
    }
    ratio
}

/// `1.0001^tick` in the shared price format, saturating at `max_price`.
pub fn price_at_tick<M: ManagedTypeApi>(tick: i64, max_price: &BigUint<M>) -> BigUint<M> {
    let sqrt_ratio = sqrt_ratio_at_tick::<M>(tick);
    let price = (&sqrt_ratio * &sqrt_ratio) >> (256 - PRICE_FRACTIONAL_BITS);
    if price > *max_price {
        max_price.clone()
    } else {
        price
    }
}

/// Arithmetic mean tick between two cumulative samples, rounded toward
/// negative infinity.
///
/// Fails when the cumulatives are too far apart to be real oracle data.
pub fn mean_tick<M: ManagedTypeApi>(
    earlier_cumulative: i64,
    later_cumulative: i64,
    window: u64,
) -> i64 {
    let delta = match later_cumulative.checked_sub(earlier_cumulative) {
        Some(delta) => delta,
        None => M::error_api_impl().signal_error(ERR_TICK_OUT_OF_RANGE),
    };
    let window = window as i64;
    let mut tick = delta / window;
    if delta < 0 && delta % window != 0 {
        tick -= 1;
    }
    tick
}
