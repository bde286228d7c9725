use crate::error::Result;
use crate::simd::lane::Lane;
use crate::simd::operators::{AssociativeOp, BinaryOp};
use crate::simd::species::Species;

/// Lane-wise binary operations over whole slices.
///
/// Every operation comes in three flavors: a plain per-element loop, a
/// vectorized loop over chunks of one species, and a parallel vectorized
/// loop that splits large inputs across the rayon thread pool. All three
/// produce identical results.
pub trait SimdLanewise<E: Lane, Rhs = Self> {
    type Output;

    fn scalar_lanewise(self, op: BinaryOp, rhs: Rhs) -> Self::Output;
    fn simd_lanewise<const N: usize>(
        self,
        species: Species<E, N>,
        op: BinaryOp,
        rhs: Rhs,
    ) -> Self::Output;
    fn par_simd_lanewise<const N: usize>(
        self,
        species: Species<E, N>,
        op: BinaryOp,
        rhs: Rhs,
    ) -> Self::Output;
}

/// Reductions of a whole slice to one lane value.
pub trait SimdReduce<E: Lane> {
    fn scalar_reduce_lanes(self, op: AssociativeOp) -> Result<E>;
    fn simd_reduce_lanes<const N: usize>(self, species: Species<E, N>, op: AssociativeOp)
        -> Result<E>;
    fn par_simd_reduce_lanes<const N: usize>(
        self,
        species: Species<E, N>,
        op: AssociativeOp,
    ) -> Result<E>;
}
