//! Constant-time branch-free primitives, oblivious buffer operations, and a
//! fixed-width signed big-integer engine for secret-dependent data.
//!
//! - [`primitives`] — the scalar building blocks: a multiplexer, 0/1
//!   comparisons, and a widening multiply, all data-independent in their
//!   instruction trace and memory access pattern.
//! - [`obuf`] — oblivious operations over byte buffers: conditional copy
//!   (with `memmove` overlap semantics), conditional swap, and secret-indexed
//!   element read/write.
//! - [`bigint`] — [`bigint::BigInt`], a variable-precision signed integer
//!   with a fixed bit width chosen at construction and a sticky NaN state
//!   that propagates through every operation in place of panics or `Result`.
#![cfg_attr(not(feature = "std"), no_std)]

// `alloc` is a hard dependency, not a toggle: `BigInt`'s limb storage and
// `Scratch`'s heap path both need it unconditionally. `std` only chooses
// `no_std` vs. not; it carries no separate allocation story.
extern crate alloc;

pub mod bigint;
pub mod obuf;
pub mod primitives;
