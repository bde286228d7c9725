//! Lane-wise vectors, masks and shuffles.
//!
//! The portable core (`lane`, `shape`, `species`, `mask`, `shuffle`,
//! `vector`, `memory`, `segment`) works on every target. The ISA modules
//! below are compiled only when the build script detects the matching
//! instruction set, and are reached exclusively through `kernels`.

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx2;

#[cfg(all(any(avx2, sse), any(target_arch = "x86", target_arch = "x86_64")))]
pub mod sse;

#[cfg(all(neon, target_arch = "aarch64"))]
pub mod neon;

pub(crate) mod kernels;

pub mod lane;
pub mod mask;
pub mod memory;
pub mod operators;
pub mod segment;
pub mod shape;
pub mod shuffle;
pub mod slice;
pub mod species;
pub mod traits;
pub mod vector;

pub use lane::{Lane, LaneType};
pub use mask::Mask;
pub use memory::ByteOrder;
pub use operators::{
    flags, AssociativeOp, BinaryOp, ComparisonOp, Operator, TernaryOp, TestOp, UnaryOp,
};
pub use segment::{Arena, ArenaKind, MemorySegment};
pub use shape::VectorShape;
pub use shuffle::Shuffle;
pub use species::{species_info, Species, SpeciesInfo};
pub use traits::{SimdLanewise, SimdReduce};
pub use vector::Vector;

use crate::MAX_VECTOR_BITS;

/// Lane count of 16-bit lanes in the `Max` shape.
pub const SHORT_MAX_LANES: usize = MAX_VECTOR_BITS / 16;

pub type ShortVector64 = Vector<i16, 4>;
pub type ShortVector128 = Vector<i16, 8>;
pub type ShortVector256 = Vector<i16, 16>;
pub type ShortVector512 = Vector<i16, 32>;
/// 16-bit vector of the platform's preferred shape.
pub type ShortVectorMax = Vector<i16, SHORT_MAX_LANES>;

pub type ShortMask64 = Mask<i16, 4>;
pub type ShortMask128 = Mask<i16, 8>;
pub type ShortMask256 = Mask<i16, 16>;
pub type ShortMask512 = Mask<i16, 32>;
pub type ShortMaskMax = Mask<i16, SHORT_MAX_LANES>;

pub type ShortShuffle64 = Shuffle<i16, 4>;
pub type ShortShuffle128 = Shuffle<i16, 8>;
pub type ShortShuffle256 = Shuffle<i16, 16>;
pub type ShortShuffle512 = Shuffle<i16, 32>;
pub type ShortShuffleMax = Shuffle<i16, SHORT_MAX_LANES>;

pub type ShortSpecies64 = Species<i16, 4>;
pub type ShortSpecies128 = Species<i16, 8>;
pub type ShortSpecies256 = Species<i16, 16>;
pub type ShortSpecies512 = Species<i16, 32>;
pub type ShortSpeciesMax = Species<i16, SHORT_MAX_LANES>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_match_shapes() {
        assert!(ShortSpecies64::of(VectorShape::S64).is_ok());
        assert!(ShortSpecies128::of(VectorShape::S128).is_ok());
        assert!(ShortSpecies256::of(VectorShape::S256).is_ok());
        assert!(ShortSpecies512::of(VectorShape::S512).is_ok());
        assert!(ShortSpeciesMax::of(VectorShape::Max).is_ok());
        assert!(ShortSpeciesMax::preferred().is_ok());
    }

    #[test]
    fn test_max_species_is_its_own_species() {
        let max = ShortSpeciesMax::preferred().unwrap();
        assert_eq!(max.shape(), VectorShape::Max);
        assert_eq!(max.vector_bit_size(), MAX_VECTOR_BITS);
        assert_eq!(max.length(), SHORT_MAX_LANES);
    }
}
