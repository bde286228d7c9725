//! Per-lane boolean selectors.

use std::fmt::{self, Display};

use log::trace;

use crate::error::{bounds_error, Result};
use crate::simd::lane::Lane;
use crate::simd::species::Species;
use crate::simd::vector::Vector;

/// An immutable set of `N` lane flags bound to one species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask<E: Lane, const N: usize> {
    species: Species<E, N>,
    bits: [bool; N],
}

impl<E: Lane, const N: usize> Mask<E, N> {
    #[inline(always)]
    pub(crate) fn from_bits(species: Species<E, N>, bits: [bool; N]) -> Self {
        Mask { species, bits }
    }

    /// Loads `N` flags from `bits` starting at `offset`.
    pub fn from_array(species: Species<E, N>, bits: &[bool], offset: usize) -> Result<Self> {
        check_from_index_size(offset, N, bits.len())?;
        let mut out = [false; N];
        out.copy_from_slice(&bits[offset..offset + N]);
        Ok(Mask::from_bits(species, out))
    }

    /// Mask whose lane `i` is bit `i` of `bits`; bits beyond `N` are ignored.
    pub fn from_long(species: Species<E, N>, bits: u64) -> Self {
        Mask::from_bits(species, std::array::from_fn(|i| (bits >> i) & 1 == 1))
    }

    pub fn species(&self) -> Species<E, N> {
        self.species
    }

    #[inline(always)]
    pub const fn length(&self) -> usize {
        N
    }

    pub fn to_array(&self) -> [bool; N] {
        self.bits
    }

    /// Stores the flags into `out` starting at `offset`.
    pub fn into_array(&self, out: &mut [bool], offset: usize) -> Result<()> {
        check_from_index_size(offset, N, out.len())?;
        out[offset..offset + N].copy_from_slice(&self.bits);
        Ok(())
    }

    /// Packs the flags into the low `N` bits of a `u64`.
    pub fn to_long(&self) -> u64 {
        self.bits
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &set)| acc | ((set as u64) << i))
    }

    /// Whether lane `i` is set; fails for `i >= N`.
    pub fn lane_is_set(&self, i: usize) -> Result<bool> {
        self.bits
            .get(i)
            .copied()
            .ok_or_else(|| bounds_error(i as i64, N as i64, "mask lane"))
    }

    #[inline(always)]
    pub(crate) fn test(&self, i: usize) -> bool {
        self.bits[i]
    }

    pub fn any_true(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }

    pub fn all_true(&self) -> bool {
        self.bits.iter().all(|&b| b)
    }

    pub fn true_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Index of the lowest set lane.
    pub fn first_true(&self) -> Option<usize> {
        self.bits.iter().position(|&b| b)
    }

    /// Index of the highest set lane.
    pub fn last_true(&self) -> Option<usize> {
        self.bits.iter().rposition(|&b| b)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(bool, bool) -> bool) -> Result<Self> {
        self.species.check(&other.species)?;
        Ok(Mask::from_bits(
            self.species,
            std::array::from_fn(|i| f(self.bits[i], other.bits[i])),
        ))
    }

    pub fn and(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn or(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn xor(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// Lanes set in `self` but not in `other`.
    pub fn and_not(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a & !b)
    }

    /// Lanes where both masks agree.
    #[allow(clippy::should_implement_trait)]
    pub fn eq(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a == b)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> Self {
        Mask::from_bits(self.species, self.bits.map(|b| !b))
    }

    /// Mask with the first `true_count()` lanes set.
    pub fn compress(&self) -> Self {
        let count = self.true_count();
        Mask::from_bits(self.species, std::array::from_fn(|i| i < count))
    }

    /// Vector with set lanes `-1` and unset lanes `0`.
    pub fn to_vector(&self) -> Vector<E, N> {
        Vector::from_lanes(
            self.species,
            self.bits
                .map(|set| if set { E::zero() - E::one() } else { E::zero() }),
        )
    }

    /// Clears every lane `i` for which `offset + i` is outside `[0, limit)`.
    pub fn index_in_range(&self, offset: isize, limit: isize) -> Self {
        let range = self.species.index_in_range(offset, limit);
        Mask::from_bits(
            self.species,
            std::array::from_fn(|i| self.bits[i] && range.bits[i]),
        )
    }

    /// Checks that every set lane addresses an in-bounds element.
    ///
    /// Lane `i` touches `[offset + i * scale, offset + i * scale + scale)`,
    /// which must lie within `[0, limit)`. Unset lanes are not checked.
    pub fn check_index_by_lane(&self, offset: isize, limit: usize, scale: usize) -> Result<()> {
        for i in (0..N).filter(|&i| self.bits[i]) {
            let position = (offset as i64).saturating_add((i * scale) as i64);
            let in_range = position >= 0
                && position
                    .checked_add(scale as i64)
                    .is_some_and(|end| end <= limit as i64);
            if !in_range {
                trace!("rejected masked access: lane {i} at {position}, limit {limit}");
                return Err(bounds_error(position, limit as i64, "masked lane out of range"));
            }
        }
        Ok(())
    }
}

impl<E: Lane, const N: usize> Display for Mask<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mask[")?;
        for &set in &self.bits {
            f.write_str(if set { "T" } else { "." })?;
        }
        f.write_str("]")
    }
}

/// Fails unless `[offset, offset + size)` lies within `[0, length)`.
pub(crate) fn check_from_index_size(offset: usize, size: usize, length: usize) -> Result<()> {
    if offset > length || length - offset < size {
        trace!("rejected access: range {offset}+{size} outside length {length}");
        return Err(bounds_error(offset as i64, length as i64, format!("range of {size} elements")));
    }
    Ok(())
}
