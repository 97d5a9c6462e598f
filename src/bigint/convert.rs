//! Conversions between `BigInt` and the native 32/64-bit integer types.
//!
//! Grounded on `BigUint::from_usize`/`to_usize` (`pkg/math/src/big/uint.rs`)
//! for the limb-folding shape, generalized to sign-aware two's-complement
//! folding and to the strict (NaN-on-range-loss) vs `_trunc` (wrap) pairing
//! the byte codecs in [`super::codec`] also use.

use super::{BigInt, LIMB_BITS, LIMB_MASK};

impl BigInt {
    fn write_raw_i128(&mut self, mut acc: i128) {
        let n = self.limb_count();
        for i in 0..n {
            self.limbs[i] = (acc & LIMB_MASK as i128) as u32;
            acc >>= LIMB_BITS;
        }
        self.nan = false;
        self.sign_extend_top_limb();
    }

    /// Reconstructs the exact two's-complement value held in the low `take`
    /// limbs, and reports whether every limb above that window equals the
    /// uniform sign-extension pattern (i.e. whether the full value is
    /// exactly representable within that window).
    fn window_value(&self, take: usize) -> (i128, bool) {
        let nlimbs = self.limb_count();
        let take = take.min(nlimbs);
        let sign = self.sign_mask().to_bool();
        let fits = nlimbs <= take || self.high_limbs_match_sign(take, sign);

        let mut raw: i128 = 0;
        for i in (0..take).rev() {
            raw = (raw << LIMB_BITS) | (self.limbs[i] as i128);
        }
        let width_bits = take as u32 * LIMB_BITS;
        let signed = if width_bits == 0 {
            0
        } else if (raw >> (width_bits - 1)) & 1 == 1 {
            raw - (1i128 << width_bits)
        } else {
            raw
        };
        (signed, fits)
    }

    fn high_limbs_match_sign(&self, from: usize, sign: bool) -> bool {
        let pattern = if sign { LIMB_MASK } else { 0 };
        self.limbs[from..].iter().all(|&l| l == pattern)
    }

    // --- setters ---------------------------------------------------------

    /// Sets this value from `v`, or NaN if `v` does not fit in `width` bits.
    pub fn set_s64(&mut self, v: i64) {
        if fits_signed(self.width, v as i128) {
            self.write_raw_i128(v as i128);
        } else {
            self.set_nan();
        }
    }

    /// As [`BigInt::set_s64`], but reduces `v` modulo `2^width` instead of
    /// producing NaN on range loss.
    pub fn set_s64_trunc(&mut self, v: i64) {
        self.write_raw_i128(v as i128);
    }

    pub fn set_s32(&mut self, v: i32) {
        self.set_s64(v as i64);
    }

    pub fn set_s32_trunc(&mut self, v: i32) {
        self.set_s64_trunc(v as i64);
    }

    pub fn set_u64(&mut self, v: u64) {
        if fits_signed(self.width, v as i128) {
            self.write_raw_i128(v as i128);
        } else {
            self.set_nan();
        }
    }

    pub fn set_u64_trunc(&mut self, v: u64) {
        self.write_raw_i128(v as i128);
    }

    pub fn set_u32(&mut self, v: u32) {
        self.set_u64(v as u64);
    }

    pub fn set_u32_trunc(&mut self, v: u32) {
        self.set_u64_trunc(v as u64);
    }

    /// Copies `src` into `self`; NaN if the shapes differ (see
    /// [`super::compare::BigInt::copy_from`] for the constant-time form used
    /// elsewhere). Kept here as the native-conversion module's `set(dst,
    /// src)` entry from the representation note.
    pub fn set(&mut self, src: &BigInt) {
        self.copy_from(src);
    }

    // --- getters -----------------------------------------------------------

    pub fn to_s64(&self) -> i64 {
        if self.nan {
            return 0;
        }
        let (v, fits) = self.window_value(3);
        if !fits || v < i64::MIN as i128 || v > i64::MAX as i128 {
            0
        } else {
            v as i64
        }
    }

    pub fn to_s64_trunc(&self) -> i64 {
        if self.nan {
            return 0;
        }
        self.window_value(3).0 as i64
    }

    pub fn to_s32(&self) -> i32 {
        if self.nan {
            return 0;
        }
        let (v, fits) = self.window_value(2);
        if !fits || v < i32::MIN as i128 || v > i32::MAX as i128 {
            0
        } else {
            v as i32
        }
    }

    pub fn to_s32_trunc(&self) -> i32 {
        if self.nan {
            return 0;
        }
        self.window_value(2).0 as i32
    }

    pub fn to_u64(&self) -> u64 {
        if self.nan {
            return 0;
        }
        let (v, fits) = self.window_value(3);
        if !fits || v < 0 || v > u64::MAX as i128 {
            0
        } else {
            v as u64
        }
    }

    pub fn to_u64_trunc(&self) -> u64 {
        if self.nan {
            return 0;
        }
        self.window_value(3).0 as u64
    }

    pub fn to_u32(&self) -> u32 {
        if self.nan {
            return 0;
        }
        let (v, fits) = self.window_value(2);
        if !fits || v < 0 || v > u32::MAX as i128 {
            0
        } else {
            v as u32
        }
    }

    pub fn to_u32_trunc(&self) -> u32 {
        if self.nan {
            return 0;
        }
        self.window_value(2).0 as u32
    }
}

/// Whether `v` fits `[-2^(width-1), 2^(width-1)-1]`. `width >= 128` is always
/// true for the `i128`-representable native values this module deals with.
fn fits_signed(width: usize, v: i128) -> bool {
    if width >= 128 {
        return true;
    }
    let hi: i128 = (1i128 << (width - 1)) - 1;
    let lo: i128 = -(1i128 << (width - 1));
    v >= lo && v <= hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_s64_in_range() {
        let mut x = BigInt::init(16);
        x.set_s64(1234);
        assert!(!x.isnan().to_bool());
        assert_eq!(x.to_s64(), 1234);
    }

    #[test]
    fn set_s64_out_of_range_is_nan() {
        let mut x = BigInt::init(8);
        x.set_s64(100);
        assert!(!x.isnan().to_bool());
        x.set_s64(1000);
        assert!(x.isnan().to_bool());
    }

    #[test]
    fn set_s64_trunc_wraps() {
        let mut x = BigInt::init(8);
        x.set_s64_trunc(200);
        assert!(!x.isnan().to_bool());
        // 200 mod 256, reinterpreted signed 8-bit, is -56.
        assert_eq!(x.to_s64(), -56);
    }

    #[test]
    fn negative_round_trips() {
        let mut x = BigInt::init(64);
        x.set_s64(-987654321);
        assert_eq!(x.to_s64(), -987654321);
    }

    #[test]
    fn unsigned_round_trip_u32() {
        let mut x = BigInt::init(64);
        x.set_u32(u32::MAX);
        assert_eq!(x.to_u32(), u32::MAX);
        assert_eq!(x.to_u64(), u32::MAX as u64);
    }

    #[test]
    fn to_s64_zero_on_nan() {
        let x = BigInt::init(32);
        assert_eq!(x.to_s64(), 0);
        assert_eq!(x.to_u32_trunc(), 0);
    }

    #[test]
    fn wide_value_round_trips_through_native_window() {
        let mut x = BigInt::init(129);
        x.set_s64(-5);
        assert_eq!(x.to_s64(), -5);
        assert_eq!(x.to_s32(), -5);
    }
}
