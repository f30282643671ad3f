multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use core::cmp::Ordering;

use multiversx_sc::api::ErrorApiImpl;

/// Width of one limb. A `WideUint` holds two of them.
pub const LIMB_BITS: usize = 256;

pub const ERR_WIDE_OVERFLOW: &[u8] = b"Wide arithmetic overflow";
pub const ERR_DIVISION_BY_ZERO: &[u8] = b"Division by zero";

fn fail<M: ManagedTypeApi>(message: &[u8]) -> ! {
    M::error_api_impl().signal_error(message)
}

/// 2^256, the radix of a single limb.
pub fn limb_base<M: ManagedTypeApi>() -> BigUint<M> {
    BigUint::from(1u64) << LIMB_BITS
}

fn require_limb<M: ManagedTypeApi>(value: &BigUint<M>) {
    if *value >= limb_base::<M>() {
        fail::<M>(ERR_WIDE_OVERFLOW)
    }
}

// ============================================================
// WideUint: 512-bit unsigned integer as two 256-bit limbs
// ============================================================

/// Unsigned integer in `[0, 2^512)`: `ms * 2^256 + ls`.
///
/// Every operation is exact. Results that would leave the 512-bit range
/// abort the transaction instead of wrapping.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct WideUint<M: ManagedTypeApi> {
    /// Least significant 256 bits
    pub ls: BigUint<M>,
    /// Most significant 256 bits
    pub ms: BigUint<M>,
}

impl<M: ManagedTypeApi> WideUint<M> {
    pub fn zero() -> Self {
        WideUint {
            ls: BigUint::zero(),
            ms: BigUint::zero(),
        }
    }

    /// Splits an arbitrary value into limbs. Fails for values of 2^512 and above.
    pub fn from_biguint(value: &BigUint<M>) -> Self {
        let ms = value >> LIMB_BITS;
        require_limb(&ms);
        let ls = value % &limb_base::<M>();
        WideUint { ls, ms }
    }

    pub fn to_biguint(&self) -> BigUint<M> {
        (&self.ms << LIMB_BITS) + &self.ls
    }

    pub fn is_zero(&self) -> bool {
        self.ls == 0u64 && self.ms == 0u64
    }

    /// Full-precision product of two single-limb values.
    pub fn full_mul(a: &BigUint<M>, b: &BigUint<M>) -> Self {
        require_limb(a);
        require_limb(b);
        let product = a * b;
        let ms = &product >> LIMB_BITS;
        let ls = product % &limb_base::<M>();
        WideUint { ls, ms }
    }

    pub fn square(x: &BigUint<M>) -> Self {
        Self::full_mul(x, x)
    }

    pub fn add(&self, other: &Self) -> Self {
        let base = limb_base::<M>();
        let mut ls = &self.ls + &other.ls;
        let mut ms = &self.ms + &other.ms;
        if ls >= base {
            ls -= &base;
            ms += &BigUint::from(1u64);
        }
        if ms >= base {
            fail::<M>(ERR_WIDE_OVERFLOW)
        }
        WideUint { ls, ms }
    }

    /// `self - other`. The caller guarantees `self >= other`.
    pub fn sub(&self, other: &Self) -> Self {
        if self.ls >= other.ls {
            WideUint {
                ls: &self.ls - &other.ls,
                ms: &self.ms - &other.ms,
            }
        } else {
            let borrowed = &self.ls + &limb_base::<M>();
            WideUint {
                ls: &borrowed - &other.ls,
                ms: &self.ms - &(&other.ms + &BigUint::from(1u64)),
            }
        }
    }

    /// Multiplies by a single-limb scalar. The product must stay below 2^512.
    pub fn mul_scalar(&self, scalar: &BigUint<M>) -> Self {
        require_limb(scalar);
        let base = limb_base::<M>();
        let low = &self.ls * scalar;
        let carry = &low >> LIMB_BITS;
        let ls = low % &base;
        let ms = &(&self.ms * scalar) + &carry;
        if ms >= base {
            fail::<M>(ERR_WIDE_OVERFLOW)
        }
        WideUint { ls, ms }
    }

    pub fn shr(&self, bits: usize) -> Self {
        Self::from_biguint(&(self.to_biguint() >> bits))
    }

    /// Exact `⌊self / divisor⌋` for a single-limb divisor.
    pub fn div_by_limb(&self, divisor: &BigUint<M>) -> BigUint<M> {
        if *divisor == 0u64 {
            fail::<M>(ERR_DIVISION_BY_ZERO)
        }
        require_limb(divisor);
        self.to_biguint() / divisor
    }

    /// `⌊self / denominator⌋`.
    ///
    /// Exact when the denominator fits in one limb. Otherwise both operands
    /// are shifted right until the denominator does; the relative error of
    /// that path stays below 2^-250 plus one unit of flooring.
    pub fn div(&self, denominator: &Self) -> BigUint<M> {
        if denominator.is_zero() {
            fail::<M>(ERR_DIVISION_BY_ZERO)
        }
        if denominator.ms == 0u64 {
            return self.div_by_limb(&denominator.ls);
        }

        let shift = (log2_floor(&denominator.ms) + 1) as usize;
        let normalized = denominator.shr(shift);
        self.shr(shift).div_by_limb(&normalized.ls)
    }
}

impl<M: ManagedTypeApi> PartialEq for WideUint<M> {
    fn eq(&self, other: &Self) -> bool {
        self.ms == other.ms && self.ls == other.ls
    }
}

impl<M: ManagedTypeApi> PartialOrd for WideUint<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.ms.partial_cmp(&other.ms) {
            Some(Ordering::Equal) => self.ls.partial_cmp(&other.ls),
            ordering => ordering,
        }
    }
}

// ============================================================
// Scalar helpers
// ============================================================

/// `⌊a * b / denominator⌋` without losing the high half of the product.
pub fn mul_div<M: ManagedTypeApi>(
    a: &BigUint<M>,
    b: &BigUint<M>,
    denominator: &BigUint<M>,
) -> BigUint<M> {
    WideUint::full_mul(a, b).div_by_limb(denominator)
}

/// Index of the highest set bit. Zero maps to zero.
pub fn log2_floor<M: ManagedTypeApi>(x: &BigUint<M>) -> u32 {
    let bytes = x.to_bytes_be_buffer();
    let len = bytes.len();
    if len == 0 {
        return 0;
    }

    let mut leading = [0u8; 1];
    if bytes.load_slice(0, &mut leading).is_err() || leading[0] == 0 {
        return 0;
    }
    (len as u32 - 1) * 8 + (7 - leading[0].leading_zeros())
}

/// `|a - b|`
pub fn abs_diff<M: ManagedTypeApi>(a: &BigUint<M>, b: &BigUint<M>) -> BigUint<M> {
    if a >= b {
        a - b
    } else {
        b - a
    }
}
