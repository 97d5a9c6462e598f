//! Bitwise logic: `and`, `or`, `xor`, `eqv` (XNOR), `not`.
//!
//! Grounded on `SecureBigUint`'s limb-wise bitwise operators
//! (`pkg/math/src/big/secure/uint.rs`), which already operate one 31-bit
//! limb at a time; the only addition here is NaN propagation and the
//! shape check, since two's-complement sign handling falls out for free —
//! each limb's replicated sign bits combine the same way the data bits do,
//! so [`BigInt::sign_extend_top_limb`] just re-confirms an already-consistent
//! pattern.

use alloc::vec::Vec;

use super::{BigInt, LIMB_MASK};

impl BigInt {
    fn logic_result(&self, other: &BigInt, limbs: Vec<u32>) -> BigInt {
        let mut out = BigInt::init(self.width);
        out.commit(self.nan | other.nan, limbs);
        out.sign_extend_top_limb();
        out
    }

    pub fn and(&self, other: &BigInt) -> BigInt {
        if !self.same_shape(other) {
            return BigInt::init(self.width);
        }
        let limbs = self.limbs.iter().zip(&other.limbs).map(|(&a, &b)| a & b).collect();
        self.logic_result(other, limbs)
    }

    pub fn or(&self, other: &BigInt) -> BigInt {
        if !self.same_shape(other) {
            return BigInt::init(self.width);
        }
        let limbs = self.limbs.iter().zip(&other.limbs).map(|(&a, &b)| a | b).collect();
        self.logic_result(other, limbs)
    }

    pub fn xor(&self, other: &BigInt) -> BigInt {
        if !self.same_shape(other) {
            return BigInt::init(self.width);
        }
        let limbs = self.limbs.iter().zip(&other.limbs).map(|(&a, &b)| a ^ b).collect();
        self.logic_result(other, limbs)
    }

    /// Bitwise XNOR: `!(a ^ b)`, masked back into the 31-bit limb window.
    pub fn eqv(&self, other: &BigInt) -> BigInt {
        if !self.same_shape(other) {
            return BigInt::init(self.width);
        }
        let limbs = self
            .limbs
            .iter()
            .zip(&other.limbs)
            .map(|(&a, &b)| !(a ^ b) & LIMB_MASK)
            .collect();
        self.logic_result(other, limbs)
    }

    pub fn not(&self) -> BigInt {
        let limbs: Vec<u32> = self.limbs.iter().map(|&a| !a & LIMB_MASK).collect();
        let mut out = BigInt::init(self.width);
        out.commit(self.nan, limbs);
        out.sign_extend_top_limb();
        out
    }
}
