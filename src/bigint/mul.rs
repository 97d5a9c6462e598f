//! Signed multiply.
//!
//! Grounded on `SecureBigUint::mul` (`pkg/math/src/big/secure/uint.rs`) for
//! the schoolbook double loop over 31-bit limbs driven by [`mulu32w`], and
//! on the multiply design note for the sign handling: multiply the
//! magnitudes, then restore the sign and check the wide product against the
//! sign-extension pattern the spec's overflow rule describes.
//!
//! The magnitude extraction exploits the representation directly: a
//! sign-extended two's-complement limb array, complemented and incremented
//! as one long carry chain, is already its own absolute value — no separate
//! "compute |x|" arithmetic with its own NaN cases is needed.

use alloc::vec::Vec;

use super::scratch::Scratch;
use super::{fits_width, BigInt, LIMB_BITS, LIMB_MASK};
use crate::primitives::{mulu32w, Mask};

pub(crate) fn negate_raw(limbs: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(limbs.len());
    let mut carry = 1u32;
    for &l in limbs {
        let s = (l ^ LIMB_MASK) + carry;
        out.push(s & LIMB_MASK);
        carry = s >> LIMB_BITS;
    }
    out
}

pub(crate) fn cond_negate(limbs: &[u32], sel: Mask) -> Vec<u32> {
    let neg = negate_raw(limbs);
    let m = sel.raw();
    limbs
        .iter()
        .zip(neg.iter())
        .map(|(&x, &n)| x ^ ((x ^ n) & m))
        .collect()
}

/// Unsigned schoolbook multiply of two equal-length 31-bit-limb magnitudes,
/// producing `2*l` limbs. Returns `None` if the double-width working buffer
/// exceeds the scratch budget and heap is unavailable.
fn umul_limbs(a: &[u32], b: &[u32]) -> Option<Vec<u32>> {
    let l = a.len();
    let mut scratch = Scratch::new(2 * l)?;
    let out = scratch.as_mut_slice();

    for i in 0..l {
        let mut carry: u64 = 0;
        for j in 0..l {
            let idx = i + j;
            let p = mulu32w(a[i], b[j]) + out[idx] as u64 + carry;
            out[idx] = (p & LIMB_MASK as u64) as u32;
            carry = p >> LIMB_BITS;
        }
        // Propagate the remaining carry all the way to the top, always the
        // same number of steps for a given `i` (public), never conditioned
        // on whether the carry happens to be zero.
        let mut k = i + l;
        while k < 2 * l {
            let p = out[k] as u64 + carry;
            out[k] = (p & LIMB_MASK as u64) as u32;
            carry = p >> LIMB_BITS;
            k += 1;
        }
    }
    Some(out.to_vec())
}

impl BigInt {
    fn mul_impl(&self, other: &BigInt, check_overflow: bool) -> BigInt {
        let mut out = BigInt::init(self.width);
        if !self.same_shape(other) {
            return out;
        }

        let sign_a = self.sign_mask();
        let sign_b = other.sign_mask();
        let abs_a = cond_negate(&self.limbs, sign_a);
        let abs_b = cond_negate(&other.limbs, sign_b);

        let Some(raw_product) = umul_limbs(&abs_a, &abs_b) else {
            // Scratch exhausted and heap unavailable: `out` is already NaN
            // from `BigInt::init`.
            return out;
        };

        // Predicted sign: negative iff exactly one operand is negative and
        // neither is zero (per the multiply design note's boundary case).
        let result_negative = (sign_a ^ sign_b) & self.neq0() & other.neq0();
        let signed_product = cond_negate(&raw_product, result_negative);

        let overflow = !fits_width(&signed_product, self.width, result_negative.to_bool());
        let is_nan = self.nan | other.nan | (check_overflow && overflow);

        let n = out.limb_count();
        out.commit(is_nan, signed_product[..n].to_vec());
        out.sign_extend_top_limb();
        out
    }

    /// NaN on shape mismatch, NaN input, or a product that does not fit
    /// `width` bits.
    pub fn mul(&self, other: &BigInt) -> BigInt {
        self.mul_impl(other, true)
    }

    /// As [`BigInt::mul`], but reduces modulo `2^width` instead of producing
    /// NaN on overflow.
    pub fn mul_trunc(&self, other: &BigInt) -> BigInt {
        self.mul_impl(other, false)
    }
}
