//! Oblivious byte-buffer operations (`OBUF`).
//!
//! Conditional copy/swap and secret-indexed array read/write over plain
//! `[u8]` slices. The access pattern of every function here is a function
//! only of the buffer lengths, never of the buffer contents or (for
//! `array_read`/`array_write`) the requested index.
//!
//! Grounded on [`crate::bigint`]'s `SecureBigUint::copy_if`-style masked
//! byte update (`dst ^= (src XOR dst) AND mask`) and on its mask-accumulating
//! comparison, generalized from fixed-width limb arrays to arbitrary byte
//! buffers.

use crate::primitives::{u32_eq, u32_eq0, Mask};

/// If `sel` is true, makes `dst` a byte-wise copy of `src` as it existed at
/// the start of the call (`memmove` semantics: safe even if `dst` and `src`
/// overlap). If `sel` is false, `dst` is left unchanged. Either way every
/// byte of `dst` is read and rewritten, so the instruction trace does not
/// reveal `sel`.
///
/// `dst` and `src` must have equal length.
pub fn cond_copy(sel: Mask, dst: &mut [u8], src: &[u8], n: usize) {
    assert_eq!(dst.len(), n);
    assert_eq!(src.len(), n);

    let mask = (sel.raw() & 0xff) as u8;

    // memmove semantics: choose the iteration direction from the *addresses*
    // (a public property of where the caller put these buffers), never from
    // the bytes stored in them.
    let dst_addr = dst.as_ptr() as usize;
    let src_addr = src.as_ptr() as usize;

    if dst_addr <= src_addr {
        for i in 0..n {
            let s = src[i];
            let d = dst[i];
            dst[i] = d ^ ((s ^ d) & mask);
        }
    } else {
        for i in (0..n).rev() {
            let s = src[i];
            let d = dst[i];
            dst[i] = d ^ ((s ^ d) & mask);
        }
    }
}

/// If `sel` is true, exchanges the contents of `a` and `b`. If `sel` is
/// false, both are left unchanged. `a` and `b` must be disjoint (unlike
/// [`cond_copy`], this does not define overlap semantics) and of equal
/// length. Every byte of both buffers is touched in both cases.
pub fn cond_swap(sel: Mask, a: &mut [u8], b: &mut [u8], n: usize) {
    assert_eq!(a.len(), n);
    assert_eq!(b.len(), n);

    let mask = (sel.raw() & 0xff) as u8;

    for i in 0..n {
        let x = (a[i] ^ b[i]) & mask;
        a[i] ^= x;
        b[i] ^= x;
    }
}

/// Reads element `idx` of an array of `num` elements of `elt` bytes each,
/// stored contiguously in `a`, into `dst`. Every element of `a` is visited
/// exactly once regardless of `idx`, so the access pattern does not leak
/// which index was requested.
///
/// `dst.len() == elt` and `a.len() == elt * num` are required.
pub fn array_read(dst: &mut [u8], a: &[u8], elt: usize, num: usize, idx: usize) {
    assert_eq!(dst.len(), elt);
    assert_eq!(a.len(), elt * num);

    for b in dst.iter_mut() {
        *b = 0;
    }

    for i in 0..num {
        let sel = u32_eq(i as u32, idx as u32);
        let mask = (sel.raw() & 0xff) as u8;
        let elem = &a[i * elt..(i + 1) * elt];
        for (d, s) in dst.iter_mut().zip(elem.iter()) {
            *d |= mask & *s;
        }
    }
}

/// Writes `src` into element `idx` of an array of `num` elements of `elt`
/// bytes each, stored contiguously in `a`. Every element of `a` is visited
/// exactly once regardless of `idx`.
pub fn array_write(a: &mut [u8], elt: usize, num: usize, idx: usize, src: &[u8]) {
    assert_eq!(src.len(), elt);
    assert_eq!(a.len(), elt * num);

    for i in 0..num {
        let sel = u32_eq(i as u32, idx as u32);
        let mask = (sel.raw() & 0xff) as u8;
        let elem = &mut a[i * elt..(i + 1) * elt];
        for (d, s) in elem.iter_mut().zip(src.iter()) {
            *d ^= mask & (*d ^ *s);
        }
    }
}

/// Byte-wise equality. All bytes of both buffers are examined regardless of
/// where (or whether) a difference is found.
pub fn array_eq(a: &[u8], b: &[u8], n: usize) -> Mask {
    assert_eq!(a.len(), n);
    assert_eq!(b.len(), n);

    let mut diff: u32 = 0;
    for i in 0..n {
        diff |= (a[i] ^ b[i]) as u32;
    }
    u32_eq0(diff)
}

/// Lexicographic compare of unsigned byte values: `-1`, `0`, or `1`. All
/// bytes are examined; the position of the first differing byte is not
/// revealed by the control flow (only by the final numeric result, which is
/// the point of the function).
pub fn array_cmp(a: &[u8], b: &[u8], n: usize) -> i32 {
    assert_eq!(a.len(), n);
    assert_eq!(b.len(), n);

    // r starts at 0 ("still equal so far"). For each byte pair we compute a
    // tri-state token z in {-1, 0, 1}; once r becomes non-zero it is frozen
    // for the rest of the scan. The freeze is done with a mask built from
    // r's low bit rather than a branch.
    let mut r: i32 = 0;
    for i in 0..n {
        let x = a[i] as i32;
        let y = b[i] as i32;
        let z = if x < y {
            -1
        } else if x > y {
            1
        } else {
            0
        };

        // `still_zero` is all-ones while r == 0, all-zeros afterward.
        let still_zero = u32_eq0(r as u32).raw() as i32;
        r = (z & still_zero) | (r & !still_zero);
    }
    r
}
