//! NEON 8-lane i16 kernels.
//!
//! `I16x8` wraps an `int16x8_t` register. Unsigned operators reinterpret the
//! register as `uint16x8_t`, which is free at runtime.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::simd::operators::BinaryOp;

/// Number of i16 lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 8;

/// NEON register holding 8 packed i16 lanes.
#[derive(Copy, Clone, Debug)]
pub struct I16x8 {
    pub elements: int16x8_t,
}

impl I16x8 {
    /// Loads 8 lanes from `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 8 `i16` values.
    #[inline(always)]
    pub unsafe fn load(ptr: *const i16) -> Self {
        I16x8 {
            elements: vld1q_s16(ptr),
        }
    }

    /// Stores the 8 lanes to `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 8 `i16` values.
    #[inline(always)]
    pub unsafe fn store_at(&self, ptr: *mut i16) {
        vst1q_s16(ptr, self.elements)
    }
}

#[inline(always)]
unsafe fn vminq_u16_as_s16(a: int16x8_t, b: int16x8_t) -> int16x8_t {
    vreinterpretq_s16_u16(vminq_u16(vreinterpretq_u16_s16(a), vreinterpretq_u16_s16(b)))
}

#[inline(always)]
unsafe fn vmaxq_u16_as_s16(a: int16x8_t, b: int16x8_t) -> int16x8_t {
    vreinterpretq_s16_u16(vmaxq_u16(vreinterpretq_u16_s16(a), vreinterpretq_u16_s16(b)))
}

#[inline(always)]
unsafe fn vqaddq_u16_as_s16(a: int16x8_t, b: int16x8_t) -> int16x8_t {
    vreinterpretq_s16_u16(vqaddq_u16(vreinterpretq_u16_s16(a), vreinterpretq_u16_s16(b)))
}

#[inline(always)]
unsafe fn vqsubq_u16_as_s16(a: int16x8_t, b: int16x8_t) -> int16x8_t {
    vreinterpretq_s16_u16(vqsubq_u16(vreinterpretq_u16_s16(a), vreinterpretq_u16_s16(b)))
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
/// Returns the number of lanes written; zero when `op` has no kernel.
///
/// # Safety
///
/// NEON must be available, which holds on every AArch64 target.
pub(crate) unsafe fn binary(op: BinaryOp, a: &[i16], b: &[i16], out: &mut [i16]) -> usize {
    let chunks = out.len().min(a.len()).min(b.len()) / LANE_COUNT;

    macro_rules! run {
        ($intrinsic:ident) => {
            for chunk in 0..chunks {
                let i = chunk * LANE_COUNT;
                let x = I16x8::load(a.as_ptr().add(i));
                let y = I16x8::load(b.as_ptr().add(i));
                let r = I16x8 {
                    elements: $intrinsic(x.elements, y.elements),
                };
                r.store_at(out.as_mut_ptr().add(i));
            }
        };
    }

    match op {
        BinaryOp::Add => run!(vaddq_s16),
        BinaryOp::Sub => run!(vsubq_s16),
        BinaryOp::Mul => run!(vmulq_s16),
        BinaryOp::And => run!(vandq_s16),
        BinaryOp::Or => run!(vorrq_s16),
        BinaryOp::Xor => run!(veorq_s16),
        BinaryOp::Min => run!(vminq_s16),
        BinaryOp::Max => run!(vmaxq_s16),
        BinaryOp::UMin => run!(vminq_u16_as_s16),
        BinaryOp::UMax => run!(vmaxq_u16_as_s16),
        BinaryOp::SAdd => run!(vqaddq_s16),
        BinaryOp::SSub => run!(vqsubq_s16),
        BinaryOp::SuAdd => run!(vqaddq_u16_as_s16),
        BinaryOp::SuSub => run!(vqsubq_u16_as_s16),
        _ => return 0,
    }

    chunks * LANE_COUNT
}
