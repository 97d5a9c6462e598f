//! Comparisons, copy/swap/select, over `BigInt`.
//!
//! Grounded on `SecureBigUint::cmp` (`pkg/math/src/big/secure/uint.rs`) for
//! the mask-accumulating, all-limbs-visited comparison shape, and on
//! `SecureBigUint::copy_if` for the copy/swap/select family. The sign-bit
//! handling (flip the true sign bit, mask off the replicated padding above
//! it, then compare the rest unsigned) is specific to this crate's packed
//! signed representation and has no direct analogue in the unsigned
//! teacher type.

use super::{top_limb_valid_bits, BigInt};
use crate::obuf;
use crate::primitives::{u32_eq0, u32_gt, u32_lt, Mask};

/// Three-way compare of two same-width, non-NaN limb vectors, most
/// significant limb first. Every limb is visited regardless of where the
/// values first differ; the result is frozen into `r` with a mask rather
/// than a `break`.
fn limb_cmp(a: &[u32], b: &[u32], width: usize) -> i32 {
    let n = a.len();
    let valid = top_limb_valid_bits(width);
    let topmask = (1u32 << valid) - 1;
    let flip = 1u32 << (valid - 1);

    let mut r: i32 = 0;
    for i in (0..n).rev() {
        let (av, bv) = if i == n - 1 {
            ((a[i] & topmask) ^ flip, (b[i] & topmask) ^ flip)
        } else {
            (a[i], b[i])
        };
        let lt = u32_lt(av, bv).bit() as i32;
        let gt = u32_gt(av, bv).bit() as i32;
        let z = gt - lt;

        let still_zero = u32_eq0(r as u32).raw() as i32;
        r = (z & still_zero) | (r & !still_zero);
    }
    r
}

impl BigInt {
    fn is_zero_mask(&self) -> Mask {
        let acc = self.limbs.iter().fold(0u32, |acc, &l| acc | l);
        u32_eq0(acc)
    }

    /// `-1 / 0 / 1` three-way compare; `0` on NaN or shape mismatch.
    pub fn cmp(&self, other: &BigInt) -> i32 {
        if self.nan || other.nan || !self.same_shape(other) {
            return 0;
        }
        limb_cmp(&self.limbs, &other.limbs, self.width)
    }

    /// `-1 / 0 / 1`; `0` on NaN.
    pub fn sign(&self) -> i32 {
        if self.nan {
            return 0;
        }
        if self.is_zero_mask().to_bool() {
            0
        } else if self.sign_mask().to_bool() {
            -1
        } else {
            1
        }
    }

    pub fn eq(&self, other: &BigInt) -> Mask {
        if self.nan || other.nan || !self.same_shape(other) {
            return Mask::FALSE;
        }
        u32_eq0(limb_cmp(&self.limbs, &other.limbs, self.width) as u32)
    }

    pub fn neq(&self, other: &BigInt) -> Mask {
        if self.nan || other.nan || !self.same_shape(other) {
            return Mask::FALSE;
        }
        !u32_eq0(limb_cmp(&self.limbs, &other.limbs, self.width) as u32)
    }

    pub fn lt(&self, other: &BigInt) -> Mask {
        self.ordered(other, |r| r < 0)
    }

    pub fn leq(&self, other: &BigInt) -> Mask {
        self.ordered(other, |r| r <= 0)
    }

    pub fn gt(&self, other: &BigInt) -> Mask {
        self.ordered(other, |r| r > 0)
    }

    pub fn geq(&self, other: &BigInt) -> Mask {
        self.ordered(other, |r| r >= 0)
    }

    fn ordered(&self, other: &BigInt, pred: impl Fn(i32) -> bool) -> Mask {
        if self.nan || other.nan || !self.same_shape(other) {
            return Mask::FALSE;
        }
        let r = limb_cmp(&self.limbs, &other.limbs, self.width);
        Mask::new(pred(r) as u32)
    }

    pub fn eq0(&self) -> Mask {
        if self.nan {
            return Mask::FALSE;
        }
        self.is_zero_mask()
    }

    pub fn neq0(&self) -> Mask {
        if self.nan {
            return Mask::FALSE;
        }
        !self.is_zero_mask()
    }

    pub fn lt0(&self) -> Mask {
        if self.nan {
            return Mask::FALSE;
        }
        self.sign_mask()
    }

    pub fn geq0(&self) -> Mask {
        if self.nan {
            return Mask::FALSE;
        }
        !self.sign_mask()
    }

    pub fn gt0(&self) -> Mask {
        if self.nan {
            return Mask::FALSE;
        }
        !self.sign_mask() & !self.is_zero_mask()
    }

    pub fn leq0(&self) -> Mask {
        if self.nan {
            return Mask::FALSE;
        }
        self.sign_mask() | self.is_zero_mask()
    }

    /// Makes `self` a copy of `src`; NaN if the shapes differ. Widths are
    /// public (declared at construction), so branching on a shape mismatch
    /// leaks nothing secret.
    pub fn copy_from(&mut self, src: &BigInt) {
        self.cond_copy_from(Mask::TRUE, src);
    }

    /// As [`BigInt::copy_from`], but under a selector: `self` becomes `src`
    /// when `sel` is true and is left unchanged when it is false. Every limb
    /// is written either way, through [`obuf::cond_copy`] over each limb
    /// viewed as four bytes.
    pub fn cond_copy_from(&mut self, sel: Mask, src: &BigInt) {
        if !self.same_shape(src) {
            self.set_nan();
            return;
        }
        let bit = sel.bit();
        let nan_x = ((self.nan as u32) ^ (src.nan as u32)) & bit;
        self.nan = (self.nan as u32 ^ nan_x) != 0;

        for (d, s) in self.limbs.iter_mut().zip(src.limbs.iter()) {
            let mut d_bytes = d.to_ne_bytes();
            let s_bytes = s.to_ne_bytes();
            obuf::cond_copy(sel, &mut d_bytes, &s_bytes, 4);
            *d = u32::from_ne_bytes(d_bytes);
        }
    }

    pub fn swap_with(&mut self, other: &mut BigInt) {
        self.cond_swap_with(Mask::TRUE, other);
    }

    /// As [`BigInt::swap_with`], but under a selector, through
    /// [`obuf::cond_swap`] over each limb pair viewed as four bytes.
    pub fn cond_swap_with(&mut self, sel: Mask, other: &mut BigInt) {
        if !self.same_shape(other) {
            self.set_nan();
            other.set_nan();
            return;
        }
        let bit = sel.bit();
        let mut a_nan = self.nan as u32;
        let mut b_nan = other.nan as u32;
        let nan_x = (a_nan ^ b_nan) & bit;
        a_nan ^= nan_x;
        b_nan ^= nan_x;
        self.nan = a_nan != 0;
        other.nan = b_nan != 0;

        for (x, y) in self.limbs.iter_mut().zip(other.limbs.iter_mut()) {
            let mut x_bytes = x.to_ne_bytes();
            let mut y_bytes = y.to_ne_bytes();
            obuf::cond_swap(sel, &mut x_bytes, &mut y_bytes, 4);
            *x = u32::from_ne_bytes(x_bytes);
            *y = u32::from_ne_bytes(y_bytes);
        }
    }

    /// `self = sel ? a : b`. NaN if any two of `self`, `a`, `b` disagree in
    /// shape.
    ///
    /// Implemented as a full [`BigInt::copy_from`] of `b` followed by a
    /// selective [`obuf::cond_copy`] overwrite from `a`, rather than a
    /// three-way primitive of its own — `obuf` only has two-operand
    /// conditional copy/swap, so a mux is this crate's composition of them.
    /// `self` never aliases `a`/`b` here (the borrow checker enforces it),
    /// so the intermediate `copy_from(b)` is never visible as a distinct
    /// step to anything but `self`.
    pub fn mux_from(&mut self, sel: Mask, a: &BigInt, b: &BigInt) {
        if !a.same_shape(b) || !self.same_shape(a) {
            self.set_nan();
            return;
        }
        self.copy_from(b);
        let bit = sel.bit();
        let nan_x = ((a.nan as u32) ^ (b.nan as u32)) & bit;
        self.nan = (self.nan as u32 ^ nan_x) != 0;

        for (d, s) in self.limbs.iter_mut().zip(a.limbs.iter()) {
            let mut d_bytes = d.to_ne_bytes();
            let s_bytes = s.to_ne_bytes();
            obuf::cond_copy(sel, &mut d_bytes, &s_bytes, 4);
            *d = u32::from_ne_bytes(d_bytes);
        }
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
    fn ordering_matches_native_i64() {
        let samples = [-128i64, -100, -1, 0, 1, 100, 127];
        for &a in &samples {
            for &b in &samples {
                let x = of(8, a);
                let y = of(8, b);
                assert_eq!(x.lt(&y).to_bool(), a < b, "{a} < {b}");
                assert_eq!(x.gt(&y).to_bool(), a > b, "{a} > {b}");
                assert_eq!(x.leq(&y).to_bool(), a <= b, "{a} <= {b}");
                assert_eq!(x.geq(&y).to_bool(), a >= b, "{a} >= {b}");
                assert_eq!(x.eq(&y).to_bool(), a == b, "{a} == {b}");
                assert_eq!(x.neq(&y).to_bool(), a != b, "{a} != {b}");
                assert_eq!(x.cmp(&y), (a > b) as i32 - (a < b) as i32);
            }
        }
    }

    #[test]
    fn zero_relative_predicates() {
        let neg = of(16, -5);
        let zero = of(16, 0);
        let pos = of(16, 5);
        assert!(neg.lt0().to_bool());
        assert!(!neg.geq0().to_bool());
        assert!(zero.eq0().to_bool());
        assert!(!zero.lt0().to_bool());
        assert!(!zero.gt0().to_bool());
        assert!(pos.gt0().to_bool());
        assert!(pos.geq0().to_bool());
    }

    #[test]
    fn nan_comparisons_are_all_false() {
        let nan = BigInt::init(16);
        let x = of(16, 3);
        assert!(!nan.eq(&x).to_bool());
        assert!(!nan.neq(&x).to_bool());
        assert!(!nan.lt(&x).to_bool());
        assert!(!nan.eq0().to_bool());
        assert!(!nan.neq0().to_bool());
        assert_eq!(nan.cmp(&x), 0);
        assert_eq!(nan.sign(), 0);
    }

    #[test]
    fn shape_mismatch_is_false_and_nan() {
        let a = of(16, 1);
        let b = of(32, 1);
        assert!(!a.eq(&b).to_bool());
        assert_eq!(a.cmp(&b), 0);

        let mut dst = of(16, 9);
        dst.copy_from(&b);
        assert!(dst.isnan().to_bool());
    }

    #[test]
    fn cond_copy_and_swap() {
        let mut dst = of(8, 1);
        let src = of(8, 2);
        dst.cond_copy_from(Mask::FALSE, &src);
        assert_eq!(dst.to_s64(), 1);
        dst.cond_copy_from(Mask::TRUE, &src);
        assert_eq!(dst.to_s64(), 2);

        let mut a = of(8, 10);
        let mut b = of(8, 20);
        a.cond_swap_with(Mask::TRUE, &mut b);
        assert_eq!(a.to_s64(), 20);
        assert_eq!(b.to_s64(), 10);
        a.cond_swap_with(Mask::FALSE, &mut b);
        assert_eq!(a.to_s64(), 20);
        assert_eq!(b.to_s64(), 10);
    }

    #[test]
    fn mux_selects() {
        let mut dst = BigInt::init(8);
        let a = of(8, 7);
        let b = of(8, -7);
        dst.mux_from(Mask::TRUE, &a, &b);
        assert_eq!(dst.to_s64(), 7);
        dst.mux_from(Mask::FALSE, &a, &b);
        assert_eq!(dst.to_s64(), -7);
    }
}
