//! Lane element types.
//!
//! A [`Lane`] is one scalar slot of a vector. The trait is implemented for
//! the signed integer family and carries everything the generic vector code
//! needs: the same-width unsigned bit pattern, exact and wrapping conversions
//! from `i64`, native-endian byte access and an optional hook into the
//! hardware kernels.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use num::traits::{WrappingAdd, WrappingMul, WrappingNeg, WrappingSub};
use num::{PrimInt, Signed, Unsigned};

use crate::simd::operators::BinaryOp;

/// Runtime tag naming a lane element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaneType {
    I8,
    I16,
    I32,
    I64,
}

impl LaneType {
    /// All lane types, in registry order.
    pub const ALL: [LaneType; 4] = [LaneType::I8, LaneType::I16, LaneType::I32, LaneType::I64];

    /// Element width in bits.
    pub const fn bits(self) -> usize {
        match self {
            LaneType::I8 => 8,
            LaneType::I16 => 16,
            LaneType::I32 => 32,
            LaneType::I64 => 64,
        }
    }

    /// Element width in bytes.
    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }

    pub const fn name(self) -> &'static str {
        match self {
            LaneType::I8 => "i8",
            LaneType::I16 => "i16",
            LaneType::I32 => "i32",
            LaneType::I64 => "i64",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            LaneType::I8 => 0,
            LaneType::I16 => 1,
            LaneType::I32 => 2,
            LaneType::I64 => 3,
        }
    }
}

impl Display for LaneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A signed integer lane element.
pub trait Lane:
    PrimInt
    + Signed
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + WrappingNeg
    + Default
    + Debug
    + Display
    + Hash
    + Send
    + Sync
    + 'static
{
    /// Same-width unsigned type holding the raw bit pattern.
    type Bits: PrimInt + Unsigned + Default + Debug + Hash + Send + Sync + 'static;

    const LANE_TYPE: LaneType;

    /// Element width in bits.
    const BITS: u32;

    /// Element width in bytes.
    const BYTES: usize;

    /// Reinterprets the lane as its unsigned bit pattern.
    fn to_bits(self) -> Self::Bits;

    /// Reinterprets an unsigned bit pattern as a lane.
    fn from_bits(bits: Self::Bits) -> Self;

    /// Exact widening conversion.
    fn widen(self) -> i64;

    /// Narrowing conversion, `None` when `value` does not fit.
    fn from_i64_exact(value: i64) -> Option<Self>;

    /// Narrowing conversion keeping the low bits.
    fn from_i64_wrapping(value: i64) -> Self;

    /// Reads one lane from the first `BYTES` bytes in native byte order.
    ///
    /// Callers guarantee `bytes.len() >= Self::BYTES`.
    fn read_ne(bytes: &[u8]) -> Self;

    /// Writes one lane into the first `BYTES` bytes in native byte order.
    ///
    /// Callers guarantee `bytes.len() >= Self::BYTES`.
    fn write_ne(self, bytes: &mut [u8]);

    /// Runs `op` over a prefix of the operands with a hardware kernel.
    ///
    /// Returns the number of leading lanes written to `out`; the caller
    /// finishes the remaining lanes with the portable loop. The default
    /// handles nothing.
    #[inline(always)]
    fn accelerated_binary(_op: BinaryOp, _a: &[Self], _b: &[Self], _out: &mut [Self]) -> usize {
        0
    }
}

macro_rules! impl_lane {
    ($t:ty, $u:ty, $tag:expr $(, $extra:item)*) => {
        impl Lane for $t {
            type Bits = $u;

            const LANE_TYPE: LaneType = $tag;
            const BITS: u32 = <$t>::BITS;
            const BYTES: usize = std::mem::size_of::<$t>();

            #[inline(always)]
            fn to_bits(self) -> $u {
                self as $u
            }

            #[inline(always)]
            fn from_bits(bits: $u) -> Self {
                bits as $t
            }

            #[inline(always)]
            fn widen(self) -> i64 {
                self as i64
            }

            #[inline(always)]
            fn from_i64_exact(value: i64) -> Option<Self> {
                <$t>::try_from(value).ok()
            }

            #[inline(always)]
            fn from_i64_wrapping(value: i64) -> Self {
                value as $t
            }

            #[inline(always)]
            fn read_ne(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                <$t>::from_ne_bytes(raw)
            }

            #[inline(always)]
            fn write_ne(self, bytes: &mut [u8]) {
                bytes[..std::mem::size_of::<$t>()].copy_from_slice(&self.to_ne_bytes());
            }

            $($extra)*
        }
    };
}

impl_lane!(i8, u8, LaneType::I8);
impl_lane!(
    i16,
    u16,
    LaneType::I16,
    #[inline(always)]
    fn accelerated_binary(op: BinaryOp, a: &[i16], b: &[i16], out: &mut [i16]) -> usize {
        crate::simd::kernels::i16_binary(op, a, b, out)
    }
);
impl_lane!(i32, u32, LaneType::I32);
impl_lane!(i64, u64, LaneType::I64);

/// Parallel bit extract: packs the bits of `src` selected by `mask` into the
/// low end of the result.
pub(crate) fn compress_bits<B: PrimInt + Unsigned>(src: B, mask: B) -> B {
    let mut result = B::zero();
    let mut k = 0usize;
    for bit in 0..B::zero().count_zeros() as usize {
        let probe = B::one() << bit;
        if mask & probe != B::zero() {
            if src & probe != B::zero() {
                result = result | (B::one() << k);
            }
            k += 1;
        }
    }
    result
}

/// Parallel bit deposit: spreads the low bits of `src` over the positions
/// selected by `mask`.
pub(crate) fn expand_bits<B: PrimInt + Unsigned>(src: B, mask: B) -> B {
    let mut result = B::zero();
    let mut k = 0usize;
    for bit in 0..B::zero().count_zeros() as usize {
        let probe = B::one() << bit;
        if mask & probe != B::zero() {
            if src & (B::one() << k) != B::zero() {
                result = result | probe;
            }
            k += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_bits_reinterpretation() {
            assert_eq!((-1i16).to_bits(), 0xFFFFu16);
            assert_eq!(i16::from_bits(0x8000), i16::MIN);
            assert_eq!((-2i8).to_bits(), 0xFEu8);
        }

        #[test]
        fn test_exact_narrowing() {
            assert_eq!(i16::from_i64_exact(32_767), Some(i16::MAX));
            assert_eq!(i16::from_i64_exact(32_768), None);
            assert_eq!(i8::from_i64_exact(-129), None);
            assert_eq!(i64::from_i64_exact(i64::MIN), Some(i64::MIN));
        }

        #[test]
        fn test_wrapping_narrowing() {
            assert_eq!(i16::from_i64_wrapping(0x1_0001), 1);
            assert_eq!(i8::from_i64_wrapping(255), -1);
        }

        #[test]
        fn test_native_byte_access() {
            let mut buf = [0u8; 4];
            0x1234i16.write_ne(&mut buf[1..]);
            assert_eq!(i16::read_ne(&buf[1..]), 0x1234);
            assert_eq!(&buf[1..3], &0x1234i16.to_ne_bytes());
        }

        #[test]
        fn test_lane_type_metadata() {
            assert_eq!(<i16 as Lane>::BITS, 16);
            assert_eq!(<i64 as Lane>::BYTES, 8);
            assert_eq!(LaneType::I32.bytes(), 4);
            assert_eq!(LaneType::I8.to_string(), "i8");
        }
    }

    mod bit_permutation_tests {
        use super::*;

        #[test]
        fn test_compress_bits() {
            assert_eq!(compress_bits(0b1011_0110u32, 0b1111_0000u32), 0b1011);
            assert_eq!(compress_bits(0xFFFF_FFFFu32, 0), 0);
            assert_eq!(compress_bits(u64::MAX, 0x8000_0000_0000_0001), 0b11);
        }

        #[test]
        fn test_expand_bits() {
            assert_eq!(expand_bits(0b1011u32, 0b1111_0000u32), 0b1011_0000);
            assert_eq!(expand_bits(0b11u64, 0x8000_0000_0000_0001), 0x8000_0000_0000_0001);
        }

        #[test]
        fn test_expand_inverts_compress_on_mask() {
            let mask = 0x0F0F_00F0u32;
            let src = 0x1234_5678u32;
            assert_eq!(expand_bits(compress_bits(src, mask), mask), src & mask);
        }
    }
}
