//! Bulk lane-wise operations over slices.
//!
//! Each operation walks its input in chunks of one species: full chunks are
//! loaded and stored unmasked, the final partial chunk goes through masked
//! loads and stores built from `index_in_range`. Inputs shorter than
//! [`SIMD_THRESHOLD`] use the scalar loop; inputs longer than
//! [`PARALLEL_SIMD_THRESHOLD`] are split into [`PARALLEL_CHUNK_SIZE`] pieces
//! for the parallel variants.

use rayon::prelude::*;

use crate::error::{bounds_error, div_zero_error, Result, VectorError};
use crate::simd::lane::Lane;
use crate::simd::operators::{AssociativeOp, BinaryOp};
use crate::simd::species::Species;
use crate::simd::traits::{SimdLanewise, SimdReduce};
use crate::simd::vector::lanewise::binary_lane_fn;
use crate::simd::vector::reduce::identity;
use crate::simd::vector::Vector;
use crate::{PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD, SIMD_THRESHOLD};

#[inline(always)]
fn check_lengths<E>(a: &[E], b: &[E]) -> Result<()> {
    if a.len() != b.len() {
        return Err(bounds_error(
            b.len() as i64,
            a.len() as i64,
            "operand slices must have the same length",
        ));
    }
    Ok(())
}

/// Moves a lane-relative division error to its position in the slice.
fn rebase(err: VectorError, base: usize) -> VectorError {
    match err {
        VectorError::DivisionByZero { lane } => div_zero_error(base + lane),
        other => other,
    }
}

/// Largest multiple of `N` not above [`PARALLEL_CHUNK_SIZE`], at least `N`.
#[inline(always)]
fn parallel_chunk_size<const N: usize>() -> usize {
    ((PARALLEL_CHUNK_SIZE / N) * N).max(N)
}

// ================================================================================================
// LANEWISE
// ================================================================================================

pub(crate) fn scalar_lanewise<E: Lane>(op: BinaryOp, a: &[E], b: &[E]) -> Result<Vec<E>> {
    check_lengths(a, b)?;
    let f = binary_lane_fn::<E>(op)?;
    if op == BinaryOp::Div {
        if let Some(i) = b.iter().position(|d| d.is_zero()) {
            return Err(div_zero_error(i));
        }
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
}

/// Runs `op` over one block; `base` is the block's position in the whole
/// input, used for error reporting.
fn simd_lanewise_block<E: Lane, const N: usize>(
    species: Species<E, N>,
    op: BinaryOp,
    a: &[E],
    b: &[E],
    c: &mut [E],
    base: usize,
) -> Result<()> {
    let size = c.len();
    let full = size - size % N;

    for i in (0..full).step_by(N) {
        let offset = i as isize;
        let va = Vector::from_array(species, a, offset)?;
        let vb = Vector::from_array(species, b, offset)?;
        va.lanewise(op, vb)
            .map_err(|e| rebase(e, base + i))?
            .into_array(c, offset)?;
    }

    if full < size {
        let offset = full as isize;
        let m = species.index_in_range(offset, size as isize);
        let va = Vector::from_array_masked(species, a, offset, m)?;
        let vb = Vector::from_array_masked(species, b, offset, m)?;
        va.lanewise_masked(op, vb, m)
            .map_err(|e| rebase(e, base + full))?
            .into_array_masked(c, offset, m)?;
    }

    Ok(())
}

pub(crate) fn simd_lanewise<E: Lane, const N: usize>(
    species: Species<E, N>,
    op: BinaryOp,
    a: &[E],
    b: &[E],
) -> Result<Vec<E>> {
    if a.len() < SIMD_THRESHOLD {
        return scalar_lanewise(op, a, b);
    }
    check_lengths(a, b)?;
    binary_lane_fn::<E>(op)?;

    let mut c = vec![E::zero(); a.len()];
    simd_lanewise_block(species, op, a, b, &mut c, 0)?;
    Ok(c)
}

pub(crate) fn parallel_simd_lanewise<E: Lane, const N: usize>(
    species: Species<E, N>,
    op: BinaryOp,
    a: &[E],
    b: &[E],
) -> Result<Vec<E>> {
    // For small inputs, fall back to the single-threaded kernel
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        return simd_lanewise(species, op, a, b);
    }
    check_lengths(a, b)?;
    binary_lane_fn::<E>(op)?;

    let mut c = vec![E::zero(); a.len()];
    let chunk_size = parallel_chunk_size::<N>();

    c.par_chunks_mut(chunk_size)
        .enumerate()
        .try_for_each(|(chunk_idx, c_chunk)| {
            let start = chunk_idx * chunk_size;
            let end = start + c_chunk.len();
            simd_lanewise_block(species, op, &a[start..end], &b[start..end], c_chunk, start)
        })?;

    Ok(c)
}

impl<'b, E: Lane> SimdLanewise<E, &'b [E]> for &[E] {
    type Output = Result<Vec<E>>;

    #[inline(always)]
    fn scalar_lanewise(self, op: BinaryOp, rhs: &'b [E]) -> Self::Output {
        scalar_lanewise(op, self, rhs)
    }

    #[inline(always)]
    fn simd_lanewise<const N: usize>(
        self,
        species: Species<E, N>,
        op: BinaryOp,
        rhs: &'b [E],
    ) -> Self::Output {
        simd_lanewise(species, op, self, rhs)
    }

    #[inline(always)]
    fn par_simd_lanewise<const N: usize>(
        self,
        species: Species<E, N>,
        op: BinaryOp,
        rhs: &'b [E],
    ) -> Self::Output {
        parallel_simd_lanewise(species, op, self, rhs)
    }
}

// ================================================================================================
// REDUCTIONS
// ================================================================================================

pub(crate) fn scalar_reduce_lanes<E: Lane>(op: AssociativeOp, a: &[E]) -> Result<E> {
    let f = binary_lane_fn::<E>(BinaryOp::from(op))?;
    Ok(a.iter().fold(identity::<E>(op), |acc, &x| f(acc, x)))
}

/// Loads the chunk at `offset`; lanes past the end of `a` hold `fill`.
fn load_chunk<E: Lane, const N: usize>(
    species: Species<E, N>,
    a: &[E],
    offset: usize,
    fill: E,
) -> Result<Vector<E, N>> {
    if offset + N <= a.len() {
        return Vector::from_array(species, a, offset as isize);
    }
    let m = species.index_in_range(offset as isize, a.len() as isize);
    let v = Vector::from_array_masked(species, a, offset as isize, m)?;
    species.broadcast(fill).blend(v, m)
}

fn simd_reduce_block<E: Lane, const N: usize>(
    species: Species<E, N>,
    op: AssociativeOp,
    a: &[E],
) -> Result<E> {
    let id = identity::<E>(op);

    // lane-parallel accumulation would reorder the scan
    if op == AssociativeOp::FirstNonzero {
        for offset in (0..a.len()).step_by(N) {
            let found = load_chunk(species, a, offset, id)?.reduce_lanes(op);
            if !found.is_zero() {
                return Ok(found);
            }
        }
        return Ok(id);
    }

    let mut acc = species.broadcast(id);
    for offset in (0..a.len()).step_by(N) {
        acc = acc.lanewise(op.into(), load_chunk(species, a, offset, id)?)?;
    }
    Ok(acc.reduce_lanes(op))
}

pub(crate) fn simd_reduce_lanes<E: Lane, const N: usize>(
    species: Species<E, N>,
    op: AssociativeOp,
    a: &[E],
) -> Result<E> {
    if a.len() < SIMD_THRESHOLD {
        return scalar_reduce_lanes(op, a);
    }
    simd_reduce_block(species, op, a)
}

pub(crate) fn parallel_simd_reduce_lanes<E: Lane, const N: usize>(
    species: Species<E, N>,
    op: AssociativeOp,
    a: &[E],
) -> Result<E> {
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        return simd_reduce_lanes(species, op, a);
    }

    // rayon keeps chunk order, so order-sensitive folds stay correct
    let partials: Vec<E> = a
        .par_chunks(parallel_chunk_size::<N>())
        .map(|chunk| simd_reduce_block(species, op, chunk))
        .collect::<Result<_>>()?;

    scalar_reduce_lanes(op, &partials)
}

impl<E: Lane> SimdReduce<E> for &[E] {
    #[inline(always)]
    fn scalar_reduce_lanes(self, op: AssociativeOp) -> Result<E> {
        scalar_reduce_lanes(op, self)
    }

    #[inline(always)]
    fn simd_reduce_lanes<const N: usize>(
        self,
        species: Species<E, N>,
        op: AssociativeOp,
    ) -> Result<E> {
        simd_reduce_lanes(species, op, self)
    }

    #[inline(always)]
    fn par_simd_reduce_lanes<const N: usize>(
        self,
        species: Species<E, N>,
        op: AssociativeOp,
    ) -> Result<E> {
        parallel_simd_reduce_lanes(species, op, self)
    }
}
