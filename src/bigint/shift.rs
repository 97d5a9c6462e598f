//! Left/right shift, each in an unprotected (count may leak) and a
//! protected (count itself treated as secret) form.
//!
//! Grounded on `SecureBigUint`'s limb-shift helpers
//! (`pkg/math/src/big/secure/uint.rs`) for the `d = count / LIMB_BITS`,
//! `m = count % LIMB_BITS` split, and on the shift-count-protection design
//! note for the protected kernel: compose the total shift from 32
//! conditionally-applied power-of-two sub-shifts, so the instruction trace
//! never depends on which bits of the count are set.

use alloc::vec;
use alloc::vec::Vec;

use super::{top_limb_valid_bits, BigInt, LIMB_BITS, LIMB_MASK};
use crate::primitives::Mask;

fn raw_sign(limbs: &[u32], width: usize) -> bool {
    let valid = top_limb_valid_bits(width);
    ((limbs[limbs.len() - 1] >> (valid - 1)) & 1) == 1
}

/// Shifts `limbs` left by `k` bits. Returns the shifted limbs and whether
/// any bit pushed past the `(width-1)`-bit magnitude differed from the
/// source's sign (the left-shift overflow condition).
fn lsh_kernel(limbs: &[u32], width: usize, k: usize) -> (Vec<u32>, Mask) {
    let n = limbs.len();
    let d = k / LIMB_BITS as usize;
    let m = (k % LIMB_BITS as usize) as u32;

    let mut out = vec![0u32; n];
    for i in (0..n).rev() {
        let src_idx = i as isize - d as isize;
        let mut v: u32 = 0;
        if src_idx >= 0 {
            let si = src_idx as usize;
            v = limbs[si] << m;
            if m > 0 && si > 0 {
                v |= limbs[si - 1] >> (LIMB_BITS - m);
            }
        }
        out[i] = v & LIMB_MASK;
    }

    let sign = raw_sign(limbs, width) as u32;
    let mut overflow = Mask::FALSE;
    let lo = width.saturating_sub(k);
    for j in lo..width {
        let idx = j / LIMB_BITS as usize;
        let pos = (j % LIMB_BITS as usize) as u32;
        let raw = limbs.get(idx).copied().unwrap_or(if sign == 1 { LIMB_MASK } else { 0 });
        let bit = (raw >> pos) & 1;
        overflow |= Mask::new(bit ^ sign);
    }
    (out, overflow)
}

/// Arithmetic right shift of `limbs` by `k` bits, sign-filling vacated high
/// bits. Never overflows.
fn rsh_kernel(limbs: &[u32], width: usize, k: usize) -> Vec<u32> {
    let n = limbs.len();
    let d = k / LIMB_BITS as usize;
    let m = (k % LIMB_BITS as usize) as u32;
    let sign = raw_sign(limbs, width);
    let fill = if sign { LIMB_MASK } else { 0 };

    let mut out = vec![0u32; n];
    for i in 0..n {
        let src_idx = i + d;
        let lo_limb = if src_idx < n { limbs[src_idx] } else { fill };
        let hi_limb = if src_idx + 1 < n { limbs[src_idx + 1] } else { fill };
        let mut v = lo_limb >> m;
        if m > 0 {
            v |= (hi_limb << (LIMB_BITS - m)) & LIMB_MASK;
        }
        out[i] = v & LIMB_MASK;
    }
    out
}

fn select_limbs(sel: Mask, a: &[u32], b: &[u32]) -> Vec<u32> {
    let m = sel.raw();
    a.iter().zip(b.iter()).map(|(&x, &y)| y ^ ((x ^ y) & m)).collect()
}

/// Runs the unprotected kernel 32 times, once per bit of `k`, each time
/// conditionally committing a shift by `2^i` bits to the running value. The
/// same 32 kernel invocations happen regardless of `k`'s value — only the
/// selection at each step depends on it.
fn shift_prot(limbs: &[u32], width: usize, k: usize, left: bool) -> (Vec<u32>, Mask) {
    let mut cur = limbs.to_vec();
    let mut overflow = Mask::FALSE;
    for i in 0..32u32 {
        let amt = 1usize << i;
        let bit = Mask::new((k >> i) & 1);
        if left {
            let (shifted, ov) = lsh_kernel(&cur, width, amt);
            cur = select_limbs(bit, &shifted, &cur);
            overflow |= bit & ov;
        } else {
            let shifted = rsh_kernel(&cur, width, amt);
            cur = select_limbs(bit, &shifted, &cur);
        }
    }
    (cur, overflow)
}

impl BigInt {
    fn lsh_impl(&self, k: usize, check_overflow: bool) -> BigInt {
        let mut out = BigInt::init(self.width);
        let (limbs, ov) = lsh_kernel(&self.limbs, self.width, k);
        out.commit(self.nan | (check_overflow && ov.to_bool()), limbs);
        out.sign_extend_top_limb();
        out
    }

    /// NaN on NaN input or if any bit shifted out of the magnitude differs
    /// from the sign bit. `k` may be revealed by this function's timing.
    pub fn lsh(&self, k: usize) -> BigInt {
        self.lsh_impl(k, true)
    }

    pub fn lsh_trunc(&self, k: usize) -> BigInt {
        self.lsh_impl(k, false)
    }

    /// Arithmetic right shift, sign-extended. Cannot overflow, so there is
    /// no truncating variant. `k` may be revealed by this function's
    /// timing.
    pub fn rsh(&self, k: usize) -> BigInt {
        let mut out = BigInt::init(self.width);
        let limbs = rsh_kernel(&self.limbs, self.width, k);
        out.commit(self.nan, limbs);
        out.sign_extend_top_limb();
        out
    }

    /// As [`BigInt::lsh`], but the instruction trace does not depend on
    /// `k`'s value — only on `self.width` (32 fixed kernel invocations
    /// either way).
    pub fn lsh_prot(&self, k: usize) -> BigInt {
        self.lsh_prot_impl(k, true)
    }

    pub fn lsh_prot_trunc(&self, k: usize) -> BigInt {
        self.lsh_prot_impl(k, false)
    }

    fn lsh_prot_impl(&self, k: usize, check_overflow: bool) -> BigInt {
        let mut out = BigInt::init(self.width);
        let (limbs, ov) = shift_prot(&self.limbs, self.width, k, true);
        out.commit(self.nan | (check_overflow && ov.to_bool()), limbs);
        out.sign_extend_top_limb();
        out
    }

    /// As [`BigInt::rsh`], with the count treated as secret.
    pub fn rsh_prot(&self, k: usize) -> BigInt {
        let mut out = BigInt::init(self.width);
        let (limbs, _) = shift_prot(&self.limbs, self.width, k, false);
        out.commit(self.nan, limbs);
        out.sign_extend_top_limb();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn of(width: usize, v: i64) -> BigInt {
        let mut x = BigInt::init(width);
        x.set_s64(v);
        x
    }

    #[test]
    fn lsh_basic() {
        let a = of(16, 5);
        assert_eq!(a.lsh(3).to_s64(), 40);
    }

    #[test]
    fn lsh_overflow_is_nan() {
        let a = of(8, 5); // 0b0000_0101
        let r = a.lsh(6); // would be 320, doesn't fit i8
        assert!(r.isnan().to_bool());
        let t = a.lsh_trunc(6);
        assert!(!t.isnan().to_bool());
        assert_eq!(t.to_s64_trunc(), (5i64 << 6) as i8 as i64);
    }

    #[test]
    fn rsh_is_arithmetic_and_sign_extends() {
        let neg = of(16, -16);
        assert_eq!(neg.rsh(2).to_s64(), -4);
        let pos = of(16, 16);
        assert_eq!(pos.rsh(2).to_s64(), 4);
    }

    #[test]
    fn lsh_prot_matches_lsh() {
        for k in 0..10usize {
            let a = of(32, 12345);
            assert_eq!(a.lsh(k).to_s64(), a.lsh_prot(k).to_s64());
            assert_eq!(a.lsh(k).isnan().to_bool(), a.lsh_prot(k).isnan().to_bool());
        }
    }

    #[test]
    fn lsh_prot_matches_lsh_on_overflow() {
        // k in this range pushes a 32-bit value's high bits out of range,
        // which lsh/lsh_prot must agree drives the result to NaN.
        for k in 20..40usize {
            let a = of(32, 12345);
            assert_eq!(a.lsh(k).isnan().to_bool(), a.lsh_prot(k).isnan().to_bool(), "k={k}");
            assert_eq!(a.lsh(k).to_s64(), a.lsh_prot(k).to_s64(), "k={k}");
        }
    }

    #[test]
    fn rsh_prot_matches_rsh() {
        for k in 0..10usize {
            let a = of(32, -987654);
            assert_eq!(a.rsh(k).to_s64(), a.rsh_prot(k).to_s64());
        }
    }

    #[test]
    fn shift_by_zero_is_identity() {
        let a = of(32, -42);
        assert_eq!(a.lsh(0).to_s64(), -42);
        assert_eq!(a.rsh(0).to_s64(), -42);
    }

    #[test]
    fn rsh_then_lsh_recovers_low_bits_cleared() {
        let a = of(32, 0b1010_0000);
        let shifted_back = a.lsh_trunc(5).rsh(5);
        assert_eq!(shifted_back.to_s64(), a.to_s64());
    }
}
