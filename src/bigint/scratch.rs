//! Stack-first, heap-fallback scratch buffers for operations (multiply,
//! divide) whose working set is larger than their final output.
//!
//! Grounded on the scratch-allocation policy in the representation note
//! (stack up to a configurable budget, heap above that) and on the teacher
//! crate's `alloc`/`std` feature ladder (`pkg/common/Cargo.toml`,
//! `pkg/base/error/Cargo.toml`), generalized here into a single helper
//! rather than duplicated at each call site. `alloc` itself is a mandatory
//! crate dependency (see `src/lib.rs`), not something a caller can disable;
//! what stays bounded is the *size* of any one scratch request, via
//! [`MAX_SCRATCH_LIMBS`], so a pathologically wide operand still NaNs out
//! instead of asking the allocator for an unbounded amount of memory.

/// Default stack scratch budget in bytes, matching the representation note's
/// suggested default. Expressed in limbs (`u32`s) for direct use against
/// limb counts.
pub(crate) const STACK_SCRATCH_LIMBS: usize = 4096 / 4;

/// Ceiling on a single scratch request regardless of how it would be backed.
/// [`Scratch::new`] returns `None` above this, which callers turn into NaN —
/// the one form "scratch exhaustion" can still take once `alloc` is always
/// available.
pub(crate) const MAX_SCRATCH_LIMBS: usize = 1 << 20;

/// A scratch limb buffer: a fixed-size inline array up to
/// [`STACK_SCRATCH_LIMBS`] (no allocation), a heap `Vec` above that and up to
/// [`MAX_SCRATCH_LIMBS`].
pub(crate) enum Scratch {
    Stack([u32; STACK_SCRATCH_LIMBS], usize),
    Heap(alloc::vec::Vec<u32>),
}

impl Scratch {
    /// Acquires `len` zeroed limbs of scratch. Returns `None` above
    /// [`MAX_SCRATCH_LIMBS`] — the caller must turn that into a NaN result,
    /// per the failure-semantics contract (scratch exhaustion is never a
    /// panic or a silent truncation).
    pub(crate) fn new(len: usize) -> Option<Self> {
        if len <= STACK_SCRATCH_LIMBS {
            return Some(Scratch::Stack([0u32; STACK_SCRATCH_LIMBS], len));
        }
        if len > MAX_SCRATCH_LIMBS {
            return None;
        }
        Some(Scratch::Heap(alloc::vec![0u32; len]))
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u32] {
        match self {
            Scratch::Stack(buf, len) => &mut buf[..*len],
            Scratch::Heap(v) => v.as_mut_slice(),
        }
    }

    pub(crate) fn as_slice(&self) -> &[u32] {
        match self {
            Scratch::Stack(buf, len) => &buf[..*len],
            Scratch::Heap(v) => v.as_slice(),
        }
    }
}
