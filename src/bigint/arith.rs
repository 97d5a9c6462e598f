//! Add, subtract, negate.
//!
//! Grounded on `SecureBigUint::add_assign`/`sub_assign`
//! (`pkg/math/src/big/secure/uint.rs`) for the ripple-carry-across-limbs
//! shape, generalized from unsigned wraparound to the signed overflow rule
//! from the add/sub design note: the sum's true sign is
//! `sign_a XOR sign_b XOR final_carry` (add) or `sign_a XOR sign_b` flipped
//! by the final borrow (sub); a mismatch against the actually-stored top-bit
//! means the non-truncating result is NaN.
//!
//! Every function here returns a fresh `BigInt` built from read-only access
//! to its operands, so operand aliasing (including `a.add(&a)`) is safe by
//! construction — there is no pre-existing destination buffer for a source
//! to alias into.

use alloc::vec;
use alloc::vec::Vec;

use super::{top_limb_valid_bits, BigInt, LIMB_BITS, LIMB_MASK};
use crate::primitives::Mask;

pub(crate) fn add_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = vec![0u32; a.len()];
    let mut carry = 0u32;
    for i in 0..a.len() {
        let s = a[i] + b[i] + carry;
        out[i] = s & LIMB_MASK;
        carry = s >> LIMB_BITS;
    }
    out
}

/// `a - b`, computed as `a + (b complemented within each 31-bit window) + 1`
/// — the standard multi-limb subtraction-via-addition identity, carried
/// limb to limb exactly like [`add_limbs`].
pub(crate) fn sub_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = vec![0u32; a.len()];
    let mut carry = 1u32;
    for i in 0..a.len() {
        let s = a[i] + (b[i] ^ LIMB_MASK) + carry;
        out[i] = s & LIMB_MASK;
        carry = s >> LIMB_BITS;
    }
    out
}

fn top_sign(limbs: &[u32], width: usize) -> Mask {
    let valid = top_limb_valid_bits(width);
    Mask::new((limbs[limbs.len() - 1] >> (valid - 1)) & 1)
}

impl BigInt {
    fn arith_result(
        &self,
        other: &BigInt,
        limbs: Vec<u32>,
        overflow_on_equal_signs: bool,
        check_overflow: bool,
    ) -> BigInt {
        let mut out = BigInt::init(self.width);
        let actual_sign = top_sign(&limbs, self.width);
        let sign_a = self.sign_mask();
        let sign_b = other.sign_mask();
        let signs_equal = !(sign_a ^ sign_b);
        let sign_changed = sign_a ^ actual_sign;
        let trigger = if overflow_on_equal_signs {
            signs_equal
        } else {
            !signs_equal
        };
        let overflow = (trigger & sign_changed).to_bool();

        let is_nan = self.nan | other.nan | (check_overflow && overflow);
        out.commit(is_nan, limbs);
        out.sign_extend_top_limb();
        out
    }

    /// NaN on shape mismatch, NaN input, or overflow (the sum does not fit
    /// `width` bits).
    pub fn add(&self, other: &BigInt) -> BigInt {
        if !self.same_shape(other) {
            return BigInt::init(self.width);
        }
        let limbs = add_limbs(&self.limbs, &other.limbs);
        self.arith_result(other, limbs, true, true)
    }

    /// As [`BigInt::add`], but reduces modulo `2^width` instead of producing
    /// NaN on overflow.
    pub fn add_trunc(&self, other: &BigInt) -> BigInt {
        if !self.same_shape(other) {
            return BigInt::init(self.width);
        }
        let limbs = add_limbs(&self.limbs, &other.limbs);
        self.arith_result(other, limbs, true, false)
    }

    pub fn sub(&self, other: &BigInt) -> BigInt {
        if !self.same_shape(other) {
            return BigInt::init(self.width);
        }
        let limbs = sub_limbs(&self.limbs, &other.limbs);
        self.arith_result(other, limbs, false, true)
    }

    pub fn sub_trunc(&self, other: &BigInt) -> BigInt {
        if !self.same_shape(other) {
            return BigInt::init(self.width);
        }
        let limbs = sub_limbs(&self.limbs, &other.limbs);
        self.arith_result(other, limbs, false, false)
    }

    /// `-self`. NaN exactly when `self` equals the most negative
    /// representable value (the one magnitude with no positive counterpart),
    /// which this catches for free: it is computed as `zero - self`, and
    /// `sub`'s own overflow detection flags exactly that case.
    pub fn negate(&self) -> BigInt {
        self.negate_impl(true)
    }

    pub fn negate_trunc(&self) -> BigInt {
        self.negate_impl(false)
    }

    fn negate_impl(&self, check_overflow: bool) -> BigInt {
        let mut zero = BigInt::init(self.width);
        zero.reset_zero();
        let limbs = sub_limbs(&zero.limbs, &self.limbs);
        zero.arith_result(self, limbs, false, check_overflow)
    }
}
