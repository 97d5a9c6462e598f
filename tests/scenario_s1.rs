//! End-to-end walk of a single value through construction, repeated
//! addition, division, and a fixed-point "average as decimal string" helper,
//! exercising `bigint`'s modules together rather than in isolation.
//!
//! Sequence: sum `[1, 2, 3, 4, 5]` into a width-129 `BigInt` via repeated
//! `add`, divide by the count, and compute a twelve-digit fractional
//! remainder the way a caller printing `"3.000000000000"` would.

use ctbigint::bigint::BigInt;

fn from_u32(width: usize, v: u32) -> BigInt {
    let mut x = BigInt::init(width);
    x.set_u32(v);
    x
}

#[test]
fn width_129_average_of_one_through_five() {
    const WIDTH: usize = 129;
    let values = [1u32, 2, 3, 4, 5];
    let num = from_u32(WIDTH, values.len() as u32);

    let mut sum = from_u32(WIDTH, 0);
    for &v in &values {
        sum = sum.add(&from_u32(WIDTH, v));
        assert!(!sum.isnan().to_bool());
    }
    assert_eq!(sum.to_u64(), 15);

    let (quotient, remainder) = sum.divrem(&num);
    assert!(!quotient.isnan().to_bool());
    assert!(!remainder.isnan().to_bool());
    assert_eq!(quotient.to_s64(), 3);
    assert_eq!(remainder.to_s64(), 0);

    // fractional = (r * 10^12 + num/2) / num, the rounding-aware fixed-point
    // expansion a caller would use to print "3.000000000000".
    let mut scale = BigInt::init(WIDTH);
    scale.set_u64(1_000_000_000_000u64);
    let half_num = num.divrem(&from_u32(WIDTH, 2)).0;
    let scaled_remainder = remainder.mul(&scale);
    assert!(!scaled_remainder.isnan().to_bool());
    let numerator = scaled_remainder.add(&half_num);
    let fractional = numerator.divrem(&num).0;

    assert_eq!(fractional.to_u64(), 0);
}

#[test]
fn width_129_matches_native_for_larger_sums() {
    const WIDTH: usize = 129;
    let values: [u32; 6] = [7, 11, 13, 17, 19, 23];
    let num = from_u32(WIDTH, values.len() as u32);

    let mut sum = from_u32(WIDTH, 0);
    for &v in &values {
        sum = sum.add(&from_u32(WIDTH, v));
    }
    let expected_sum: u64 = values.iter().map(|&v| v as u64).sum();
    assert_eq!(sum.to_u64(), expected_sum);

    let (q, r) = sum.divrem(&num);
    assert_eq!(q.to_s64(), (expected_sum / values.len() as u64) as i64);
    assert_eq!(r.to_s64(), (expected_sum % values.len() as u64) as i64);
}
