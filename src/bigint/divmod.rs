//! Euclidean divide (`divrem`) and nonnegative modulo (`mod_`).
//!
//! Grounded on the divide/modulo design note's bit-at-a-time restoring
//! division: walk `j` from `width-1` down to `0`, compare the running
//! remainder against `|b| << j`, and commit the `j`th quotient bit and the
//! subtraction through a mask rather than a branch. The magnitude extraction
//! reuses [`mul::negate_raw`]/[`mul::cond_negate`] exactly as multiply does.
//!
//! Unlike the design note, the working magnitudes here are plain `Vec<u32>`
//! limb arrays rather than shaped `BigInt`s, so `|MinValue|` (which does not
//! fit back into a signed `width`-bit value) never has to round-trip through
//! a NaN-checking type mid-computation — the note's "adjust `a` by `|b|`
//! before the loop" workaround is for a representation that does not apply
//! here. Only the final quotient/remainder are converted back to signed
//! form, and by construction neither ever needs a value `|MinValue|` would
//! have produced except in the one case the spec already calls out as NaN.

use alloc::vec;
use alloc::vec::Vec;

use super::arith::sub_limbs;
use super::mul::{cond_negate, negate_raw};
use super::scratch::Scratch;
use super::{limb_count, BigInt, LIMB_BITS, LIMB_MASK};
use crate::primitives::{u32_eq0, u32_gt, u32_lt, Mask};

fn limbs_eq(a: &[u32], b: &[u32]) -> Mask {
    let acc = a.iter().zip(b).fold(0u32, |acc, (&x, &y)| acc | (x ^ y));
    u32_eq0(acc)
}

fn magnitude_is_zero(limbs: &[u32]) -> Mask {
    let acc = limbs.iter().fold(0u32, |acc, &l| acc | l);
    u32_eq0(acc)
}

fn magnitude_is_one(limbs: &[u32]) -> Mask {
    let acc = limbs[1..].iter().fold(limbs[0] ^ 1, |acc, &l| acc | l);
    u32_eq0(acc)
}

/// Zero-extends `src` left by `j` bits into `out`. Used both to pad a
/// magnitude into the wider working buffer (`j = 0`) and to compute
/// `|b| << j` inside the division loop.
fn raw_shl_into(src: &[u32], j: usize, out: &mut [u32]) {
    let d = j / LIMB_BITS as usize;
    let m = (j % LIMB_BITS as usize) as u32;
    for i in (0..out.len()).rev() {
        let src_idx = i as isize - d as isize;
        let mut v = 0u32;
        if src_idx >= 0 {
            let si = src_idx as usize;
            if si < src.len() {
                v = src[si] << m;
            }
            if m > 0 && si > 0 && si - 1 < src.len() {
                v |= src[si - 1] >> (LIMB_BITS - m);
            }
        }
        out[i] = v & LIMB_MASK;
    }
}

/// Plain unsigned compare of two equal-length magnitude buffers, most
/// significant limb first. No sign-bit handling: these are never
/// two's-complement values, just nonnegative quantities.
fn raw_cmp(a: &[u32], b: &[u32]) -> i32 {
    let mut r = 0i32;
    for i in (0..a.len()).rev() {
        let lt = u32_lt(a[i], b[i]).bit() as i32;
        let gt = u32_gt(a[i], b[i]).bit() as i32;
        let z = gt - lt;
        let still_zero = u32_eq0(r as u32).raw() as i32;
        r = (z & still_zero) | (r & !still_zero);
    }
    r
}

fn select(sel: Mask, a: &[u32], b: &[u32]) -> Vec<u32> {
    let m = sel.raw();
    a.iter().zip(b).map(|(&x, &y)| y ^ ((x ^ y) & m)).collect()
}

/// Divides two nonnegative magnitudes of `width` bits each, returning
/// `(quotient, remainder)` as `limb_count(width)`-limb buffers. Every one of
/// the `width` loop steps runs the same shift/compare/subtract regardless of
/// the operands, including when `b` is zero (the caller masks that case into
/// NaN afterward rather than skipping the loop).
///
/// The running remainder `r` and the shifted divisor `t` are both `2*n`
/// limbs wide — wider than the final output, same as multiply's
/// double-width accumulator — so both are acquired through [`Scratch`]
/// rather than a bare `Vec`. Returns `None` if that scratch request exceeds
/// the budget; the caller turns that into NaN.
fn divrem_magnitude(abs_a: &[u32], abs_b: &[u32], width: usize) -> Option<(Vec<u32>, Vec<u32>)> {
    let n = limb_count(width);
    let wide = 2 * n;
    let mut r = Scratch::new(wide)?;
    let mut t = Scratch::new(wide)?;
    raw_shl_into(abs_a, 0, r.as_mut_slice());
    let mut q = vec![0u32; n];

    for j in (0..width).rev() {
        raw_shl_into(abs_b, j, t.as_mut_slice());
        let take = Mask::new((raw_cmp(r.as_slice(), t.as_slice()) >= 0) as u32);
        let diff = sub_limbs(r.as_slice(), t.as_slice());
        let committed = select(take, &diff, r.as_slice());
        r.as_mut_slice().copy_from_slice(&committed);

        let limb_idx = j / LIMB_BITS as usize;
        let pos = (j % LIMB_BITS as usize) as u32;
        q[limb_idx] |= take.raw() & (1u32 << pos);
    }
    Some((q, r.as_slice()[..n].to_vec()))
}

impl BigInt {
    /// Quotient and remainder with truncation toward zero: `self = q*other +
    /// r`, `|r| < |other|`, and `r` takes the sign of `self` (or is zero).
    ///
    /// Both outputs are NaN if either operand is NaN, if `other` is zero, or
    /// on a shape mismatch. `self == MinValue && other == -1` is the one
    /// additional domain error: the true quotient has no representable
    /// value, so the quotient is NaN while the remainder is still the
    /// correct `0`.
    pub fn divrem(&self, other: &BigInt) -> (BigInt, BigInt) {
        let width = self.width;
        let mut qout = BigInt::init(width);
        let mut rout = BigInt::init(width);
        if !self.same_shape(other) {
            return (qout, rout);
        }

        let sign_a = self.sign_mask();
        let sign_b = other.sign_mask();
        let abs_a = cond_negate(&self.limbs, sign_a);
        let abs_b = cond_negate(&other.limbs, sign_b);

        let Some((q_mag, r_mag)) = divrem_magnitude(&abs_a, &abs_b, width) else {
            // Scratch budget exhausted: `qout`/`rout` are already NaN from
            // `BigInt::init`.
            return (qout, rout);
        };

        let sign_q = sign_a ^ sign_b;
        let q_signed = cond_negate(&q_mag, sign_q);
        let r_signed = cond_negate(&r_mag, sign_a);

        let is_min = sign_a & limbs_eq(&self.limbs, &negate_raw(&self.limbs));
        let is_minus_one = sign_b & magnitude_is_one(&abs_b);
        let quotient_unrepresentable = is_min & is_minus_one;

        let base_nan = self.nan | other.nan | other.eq0().to_bool();
        let q_nan = base_nan | quotient_unrepresentable.to_bool();
        let r_nan = base_nan;

        let r_final = select(quotient_unrepresentable, &vec![0u32; rout.limb_count()], &r_signed);

        qout.commit(q_nan, q_signed);
        qout.sign_extend_top_limb();
        rout.commit(r_nan, r_final);
        rout.sign_extend_top_limb();
        (qout, rout)
    }

    /// Nonnegative remainder in `[0, |other|)`: the truncating remainder
    /// from [`BigInt::divrem`], plus `|other|` if it came out negative.
    /// NaN under the same conditions `divrem`'s remainder is, and never NaN
    /// on the `MinValue / -1` case (the mathematical remainder there is `0`
    /// regardless of the quotient's representability).
    pub fn mod_(&self, other: &BigInt) -> BigInt {
        let width = self.width;
        let mut out = BigInt::init(width);
        if !self.same_shape(other) {
            return out;
        }

        let sign_a = self.sign_mask();
        let sign_b = other.sign_mask();
        let abs_a = cond_negate(&self.limbs, sign_a);
        let abs_b = cond_negate(&other.limbs, sign_b);
        let Some((_, r_mag)) = divrem_magnitude(&abs_a, &abs_b, width) else {
            // Scratch budget exhausted: `out` is already NaN from `BigInt::init`.
            return out;
        };

        let need_add = sign_a & !magnitude_is_zero(&r_mag);
        let diff = sub_limbs(&abs_b, &r_mag);
        let result = select(need_add, &diff, &r_mag);

        let is_nan = self.nan | other.nan | other.eq0().to_bool();
        out.commit(is_nan, result);
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
    fn divrem_matches_native_truncation() {
        let samples = [-100i64, -13, -7, -1, 0, 1, 7, 13, 100];
        for &a in &samples {
            for &b in &samples {
                if b == 0 {
                    continue;
                }
                let (q, r) = of(16, a).divrem(&of(16, b));
                assert_eq!(q.to_s64(), a / b, "{a} / {b}");
                assert_eq!(r.to_s64(), a % b, "{a} rem {b}");
            }
        }
    }

    #[test]
    fn s3_min_value_edge_cases() {
        let (q, r) = of(8, -128).divrem(&of(8, -1));
        assert!(q.isnan().to_bool());
        assert_eq!(r.to_s64(), 0);

        let (q2, r2) = of(8, -128).divrem(&of(8, 2));
        assert_eq!(q2.to_s64(), -64);
        assert_eq!(r2.to_s64(), 0);
    }

    #[test]
    fn s4_mod_sign() {
        let (q, r) = of(16, -7).divrem(&of(16, 3));
        assert_eq!(q.to_s64(), -2);
        assert_eq!(r.to_s64(), -1);

        let m = of(16, -7).mod_(&of(16, 3));
        assert_eq!(m.to_s64(), 2);
    }

    #[test]
    fn mod_matches_euclidean_definition() {
        let samples = [-100i64, -13, -7, -1, 0, 1, 7, 13, 100];
        for &a in &samples {
            for &b in &samples {
                if b == 0 {
                    continue;
                }
                let expected = ((a % b) + b.abs()) % b.abs();
                let m = of(16, a).mod_(&of(16, b));
                assert_eq!(m.to_s64(), expected, "{a} mod {b}");
                assert!(m.to_s64() >= 0);
            }
        }
    }

    #[test]
    fn divide_by_zero_is_nan() {
        let (q, r) = of(16, 5).divrem(&of(16, 0));
        assert!(q.isnan().to_bool());
        assert!(r.isnan().to_bool());
        assert!(of(16, 5).mod_(&of(16, 0)).isnan().to_bool());
    }

    #[test]
    fn nan_propagates() {
        let nan = BigInt::init(16);
        let x = of(16, 3);
        let (q, r) = nan.divrem(&x);
        assert!(q.isnan().to_bool());
        assert!(r.isnan().to_bool());
    }

    #[test]
    fn shape_mismatch_is_nan() {
        let a = of(8, 10);
        let b = of(16, 3);
        let (q, r) = a.divrem(&b);
        assert!(q.isnan().to_bool());
        assert!(r.isnan().to_bool());
    }

    #[test]
    fn min_value_divided_by_one_is_min_value() {
        let (q, r) = of(8, -128).divrem(&of(8, 1));
        assert_eq!(q.to_s64(), -128);
        assert_eq!(r.to_s64(), 0);
    }

    #[test]
    fn mod_by_min_value_divisor() {
        // |b| == 2^(width-1): not representable as a positive BigInt on its
        // own, but `mod_` never needs to materialize it as one.
        let m = of(8, 100).mod_(&of(8, -128));
        assert_eq!(m.to_s64(), 100i64.rem_euclid(128));
    }

    #[test]
    fn wide_division_matches_native() {
        let a = of(64, 123_456_789_012i64);
        let b = of(64, 97);
        let (q, r) = a.divrem(&b);
        assert_eq!(q.to_s64(), 123_456_789_012i64 / 97);
        assert_eq!(r.to_s64(), 123_456_789_012i64 % 97);
    }
}
