//! Lane permutations.
//!
//! A shuffle holds one source index per lane. Indices are stored partially
//! wrapped: an index already in `[0, N)` is kept as is, any other index `x`
//! is stored as `x mod N - N`, a negative "exceptional" index that still
//! names the lane it wraps to.

use std::fmt::{self, Display};

use crate::error::{bounds_error, Result};
use crate::simd::lane::Lane;
use crate::simd::mask::{check_from_index_size, Mask};
use crate::simd::species::Species;
use crate::simd::vector::Vector;

/// Reduces `index` into `[0, n)`.
#[inline(always)]
pub(crate) fn wrap_index(index: i64, n: usize) -> usize {
    index.rem_euclid(n as i64) as usize
}

/// Keeps in-range indices and maps the rest into `[-n, 0)`.
#[inline(always)]
pub(crate) fn partially_wrap_index(index: i64, n: usize) -> i32 {
    if index >= 0 && index < n as i64 {
        index as i32
    } else {
        wrap_index(index, n) as i32 - n as i32
    }
}

/// An immutable per-lane source index table bound to one species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shuffle<E: Lane, const N: usize> {
    species: Species<E, N>,
    indices: [i32; N],
}

impl<E: Lane, const N: usize> Shuffle<E, N> {
    /// Builds a shuffle from raw indices, partially wrapping each one.
    pub(crate) fn from_raw(species: Species<E, N>, raw: [i64; N]) -> Self {
        Shuffle {
            species,
            indices: raw.map(|index| partially_wrap_index(index, N)),
        }
    }

    /// Shuffle from exactly `N` source indices.
    pub fn from_values(species: Species<E, N>, indices: &[i32]) -> Result<Self> {
        if indices.len() != N {
            return Err(bounds_error(
                indices.len() as i64,
                N as i64,
                "shuffle index count must equal lane count",
            ));
        }
        Ok(Self::from_raw(
            species,
            std::array::from_fn(|i| indices[i] as i64),
        ))
    }

    /// Shuffle from `N` indices of `indices` starting at `offset`.
    pub fn from_array(species: Species<E, N>, indices: &[i32], offset: usize) -> Result<Self> {
        check_from_index_size(offset, N, indices.len())?;
        Ok(Self::from_raw(
            species,
            std::array::from_fn(|i| indices[offset + i] as i64),
        ))
    }

    /// Shuffle whose lane `i` sources `f(i)`.
    pub fn from_op(species: Species<E, N>, f: impl Fn(usize) -> i32) -> Self {
        Self::from_raw(species, std::array::from_fn(|i| f(i) as i64))
    }

    /// Shuffle with lane `i` sourcing `start + i * step`.
    pub fn iota(species: Species<E, N>, start: i32, step: i32, wrap: bool) -> Self {
        let raw: [i64; N] = std::array::from_fn(|i| start as i64 + i as i64 * step as i64);
        if wrap {
            Shuffle {
                species,
                indices: raw.map(|index| wrap_index(index, N) as i32),
            }
        } else {
            Self::from_raw(species, raw)
        }
    }

    /// Shuffle that makes lane `i` take from lane `(i + origin) mod N`.
    pub fn make_rotate(species: Species<E, N>, origin: i32) -> Self {
        Self::iota(species, origin, 1, true)
    }

    pub fn species(&self) -> Species<E, N> {
        self.species
    }

    #[inline(always)]
    pub const fn length(&self) -> usize {
        N
    }

    /// The stored (partially wrapped) index of lane `i`.
    pub fn lane_source(&self, i: usize) -> Result<i32> {
        self.indices
            .get(i)
            .copied()
            .ok_or_else(|| bounds_error(i as i64, N as i64, "shuffle lane"))
    }

    /// The lane selected by lane `i`, always in `[0, N)`.
    #[inline(always)]
    pub(crate) fn source(&self, i: usize) -> usize {
        wrap_index(self.indices[i] as i64, N)
    }

    pub fn to_array(&self) -> [i32; N] {
        self.indices
    }

    /// Stores the indices into `out` starting at `offset`.
    pub fn into_array(&self, out: &mut [i32], offset: usize) -> Result<()> {
        check_from_index_size(offset, N, out.len())?;
        out[offset..offset + N].copy_from_slice(&self.indices);
        Ok(())
    }

    /// Lanes whose index was in range when the shuffle was built.
    pub fn lane_is_valid(&self) -> Mask<E, N> {
        Mask::from_bits(self.species, self.indices.map(|index| index >= 0))
    }

    /// Replaces every exceptional index by the lane it wraps to.
    pub fn wrap_indexes(&self) -> Self {
        Shuffle {
            species: self.species,
            indices: std::array::from_fn(|i| self.source(i) as i32),
        }
    }

    /// Fails with a bounds error if any index is exceptional.
    pub fn check_indexes(&self) -> Result<Self> {
        if let Some(i) = self.indices.iter().position(|&index| index < 0) {
            return Err(bounds_error(
                self.indices[i] as i64,
                N as i64,
                format!("exceptional shuffle index in lane {i}"),
            ));
        }
        Ok(*self)
    }

    /// Composes two shuffles: lane `i` of the result is
    /// `self[other[i] mod N]`.
    pub fn rearrange(&self, other: &Self) -> Result<Self> {
        self.species.check(&other.species)?;
        Ok(Shuffle {
            species: self.species,
            indices: std::array::from_fn(|i| self.indices[other.source(i)]),
        })
    }

    /// The indices as lane values.
    pub fn to_vector(&self) -> Vector<E, N> {
        Vector::from_lanes(
            self.species,
            self.indices.map(|index| E::from_i64_wrapping(index as i64)),
        )
    }
}

impl<E: Lane, const N: usize> Display for Shuffle<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shuffle{:?}", self.indices)
    }
}
