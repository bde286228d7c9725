//! Dispatch from lane-wise operators to the hardware kernels.
//!
//! The build script decides which ISA modules exist; on x86 the kernels are
//! additionally gated on runtime feature detection, probed once per process.

use crate::simd::operators::BinaryOp;

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
use crate::simd::avx2::i16x16;

#[cfg(all(any(avx2, sse), any(target_arch = "x86", target_arch = "x86_64")))]
use crate::simd::sse::i16x8 as sse_i16x8;

#[cfg(all(neon, target_arch = "aarch64"))]
use crate::simd::neon::i16x8 as neon_i16x8;

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
static AVX2_AVAILABLE: once_cell::sync::Lazy<bool> = once_cell::sync::Lazy::new(|| {
    let available = is_x86_feature_detected!("avx2");
    log::debug!("avx2 i16 kernels {}", if available { "enabled" } else { "unavailable" });
    available
});

#[cfg(all(any(avx2, sse), any(target_arch = "x86", target_arch = "x86_64")))]
static SSE41_AVAILABLE: once_cell::sync::Lazy<bool> = once_cell::sync::Lazy::new(|| {
    let available = is_x86_feature_detected!("sse4.1");
    log::debug!("sse4.1 i16 kernels {}", if available { "enabled" } else { "unavailable" });
    available
});

/// Runs `op` over the longest prefix of `a`/`b` a kernel can handle,
/// writing `out`, and returns the prefix length.
///
/// The AVX2 kernel takes 16-lane chunks and the 128-bit kernels mop up a
/// remaining 8-lane chunk. Lanes past the returned length are untouched.
#[cfg_attr(fallback, allow(unused_variables))]
pub(crate) fn i16_binary(op: BinaryOp, a: &[i16], b: &[i16], out: &mut [i16]) -> usize {
    #[allow(unused_mut)]
    let mut done = 0;

    #[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if *AVX2_AVAILABLE && i16x16::supports(op) {
            // SAFETY: AVX2 presence was checked at runtime
            done = unsafe { i16x16::binary(op, a, b, out) };
        }
    }

    #[cfg(all(any(avx2, sse), any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if *SSE41_AVAILABLE && sse_i16x8::supports(op) {
            // SAFETY: SSE4.1 presence was checked at runtime
            done += unsafe { sse_i16x8::binary(op, &a[done..], &b[done..], &mut out[done..]) };
        }
    }

    #[cfg(all(neon, target_arch = "aarch64"))]
    {
        if neon_i16x8::supports(op) {
            // SAFETY: NEON is part of the AArch64 baseline
            done = unsafe { neon_i16x8::binary(op, a, b, out) };
        }
    }

    done
}
