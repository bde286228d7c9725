//! # simdlane
//!
//! Portable lane-wise SIMD vectors over the signed integer lane family
//! (`i8`, `i16`, `i32`, `i64`), with masks, shuffles, reductions and a
//! bounds-checked memory layer (arrays, byte slices, arena-scoped segments,
//! gather/scatter).
//!
//! Every concrete (lane type x shape) pair is its own monomorphized type, so
//! the generic algorithms compile down to straight-line code per width. Binary
//! lanewise operations on 16-bit lanes are lowered to AVX2, SSE4.1 or NEON
//! kernels when the build script detects one of those instruction sets; every
//! other path is a portable per-lane loop with bit-identical results.
//!
//! ```rust
//! use simdlane::simd::{BinaryOp, ComparisonOp, ShortVector64, Species, VectorShape};
//!
//! let species = Species::<i16, 4>::of(VectorShape::S64).unwrap();
//! let v = ShortVector64::from_array(species, &[1, 2, 3, 4], 0).unwrap();
//!
//! let sum = v.lanewise_scalar(BinaryOp::Add, 10).unwrap();
//! assert_eq!(sum.to_array(), [11, 12, 13, 14]);
//!
//! let gt = v.compare_scalar(ComparisonOp::Gt, 2);
//! assert_eq!(gt.to_array(), [false, false, true, true]);
//! ```

pub mod error;
pub mod simd;

pub use error::{Result, VectorError};

/// Minimum slice length for which bulk operations use vector kernels.
///
/// Below this size the per-call setup dominates and the scalar loop wins.
pub const SIMD_THRESHOLD: usize = 128;

/// Minimum slice length for which bulk operations are split across threads.
pub const PARALLEL_SIMD_THRESHOLD: usize = 262_144;

/// Number of elements handed to each rayon task by the parallel bulk operations.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;

/// Bit width of the `Max` vector shape on this build.
#[cfg(max_vector_bits = "256")]
pub const MAX_VECTOR_BITS: usize = 256;

/// Bit width of the `Max` vector shape on this build.
#[cfg(not(max_vector_bits = "256"))]
pub const MAX_VECTOR_BITS: usize = 128;
