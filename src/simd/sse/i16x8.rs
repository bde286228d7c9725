//! SSE4.1 8-lane i16 kernels.
//!
//! `I16x8` wraps an `__m128i` register holding 8 signed 16-bit lanes.
//! [`binary`] runs one lane-wise operator over whole 8-lane chunks of its
//! operands and reports how many lanes it wrote; the caller finishes the
//! remainder with the scalar lane function.
//!
//! # Supported Operations
//!
//! - **Arithmetic**: ADD, SUB, MUL (all wrapping)
//! - **Bitwise**: AND, OR, XOR
//! - **Ordering**: MIN, MAX (signed), UMIN, UMAX (unsigned)
//! - **Saturating**: SADD, SSUB (signed), SUADD, SUSUB (unsigned)

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::operators::BinaryOp;

/// Number of i16 lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 8;

/// SSE register holding 8 packed i16 lanes.
#[derive(Copy, Clone, Debug)]
pub struct I16x8 {
    pub elements: __m128i,
}

impl I16x8 {
    /// Loads 8 lanes from `ptr` without alignment requirements.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 8 `i16` values and SSE4.1 must be
    /// available on the running CPU.
    #[inline]
    #[target_feature(enable = "sse4.1")]
    pub unsafe fn load_unaligned(ptr: *const i16) -> Self {
        I16x8 {
            elements: _mm_loadu_si128(ptr as *const __m128i),
        }
    }

    /// Stores the 8 lanes to `ptr` without alignment requirements.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 8 `i16` values and SSE4.1 must be
    /// available on the running CPU.
    #[inline]
    #[target_feature(enable = "sse4.1")]
    pub unsafe fn store_unaligned_at(&self, ptr: *mut i16) {
        _mm_storeu_si128(ptr as *mut __m128i, self.elements)
    }
}

/// Whether [`binary`] has a kernel for `op`.
pub(crate) fn supports(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::And
            | BinaryOp::Or
            | BinaryOp::Xor
            | BinaryOp::Min
            | BinaryOp::Max
            | BinaryOp::UMin
            | BinaryOp::UMax
            | BinaryOp::SAdd
            | BinaryOp::SSub
            | BinaryOp::SuAdd
            | BinaryOp::SuSub
    )
}

/// Applies `op` to every full 8-lane chunk of `a` and `b`, writing `out`.
///
/// Returns the number of lanes written, always a multiple of
/// [`LANE_COUNT`]; zero when `op` has no kernel.
///
/// # Safety
///
/// SSE4.1 must be available on the running CPU.
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn binary(op: BinaryOp, a: &[i16], b: &[i16], out: &mut [i16]) -> usize {
    let chunks = out.len().min(a.len()).min(b.len()) / LANE_COUNT;

    macro_rules! run {
        ($intrinsic:ident) => {
            for chunk in 0..chunks {
                let i = chunk * LANE_COUNT;
                let x = I16x8::load_unaligned(a.as_ptr().add(i));
                let y = I16x8::load_unaligned(b.as_ptr().add(i));
                let r = I16x8 {
                    elements: $intrinsic(x.elements, y.elements),
                };
                r.store_unaligned_at(out.as_mut_ptr().add(i));
            }
        };
    }

    match op {
        BinaryOp::Add => run!(_mm_add_epi16),
        BinaryOp::Sub => run!(_mm_sub_epi16),
        BinaryOp::Mul => run!(_mm_mullo_epi16),
        BinaryOp::And => run!(_mm_and_si128),
        BinaryOp::Or => run!(_mm_or_si128),
        BinaryOp::Xor => run!(_mm_xor_si128),
        BinaryOp::Min => run!(_mm_min_epi16),
        BinaryOp::Max => run!(_mm_max_epi16),
        BinaryOp::UMin => run!(_mm_min_epu16),
        BinaryOp::UMax => run!(_mm_max_epu16),
        BinaryOp::SAdd => run!(_mm_adds_epi16),
        BinaryOp::SSub => run!(_mm_subs_epi16),
        BinaryOp::SuAdd => run!(_mm_adds_epu16),
        BinaryOp::SuSub => run!(_mm_subs_epu16),
        _ => return 0,
    }

    chunks * LANE_COUNT
}
