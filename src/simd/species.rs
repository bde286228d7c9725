//! Species: the (lane type, shape) descriptor of a vector.
//!
//! Each combination is described once by an immutable [`SpeciesInfo`] held in
//! a process-wide registry. [`Species`] itself is a zero-cost `Copy` handle
//! that ties a lane type and lane count (type parameters) to one shape.

use std::fmt::{self, Display};
use std::marker::PhantomData;

use log::debug;
use once_cell::sync::Lazy;

use crate::error::{bounds_error, range_error, species_mismatch, Result};
use crate::simd::lane::{Lane, LaneType};
use crate::simd::mask::Mask;
use crate::simd::shape::VectorShape;
use crate::simd::shuffle::Shuffle;
use crate::simd::vector::Vector;

/// Immutable metadata about one (lane type, shape) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesInfo {
    pub lane_type: LaneType,
    pub shape: VectorShape,
    pub lane_count: usize,
    pub element_bits: usize,
    pub vector_bits: usize,
    pub vector_bytes: usize,
    pub name: String,
}

impl SpeciesInfo {
    fn new(lane_type: LaneType, shape: VectorShape) -> Self {
        let lane_count = shape.lane_count(lane_type);
        SpeciesInfo {
            lane_type,
            shape,
            lane_count,
            element_bits: lane_type.bits(),
            vector_bits: shape.vector_bits(),
            vector_bytes: shape.vector_bytes(),
            name: format!("Species[{}, {}, {}]", lane_type, lane_count, shape),
        }
    }
}

/// Process-wide species registry, indexed by lane type then shape.
static REGISTRY: Lazy<Vec<SpeciesInfo>> = Lazy::new(|| {
    let registry: Vec<SpeciesInfo> = LaneType::ALL
        .iter()
        .flat_map(|&lane_type| {
            VectorShape::ALL
                .iter()
                .map(move |&shape| SpeciesInfo::new(lane_type, shape))
        })
        .collect();

    debug!(
        "species registry initialized: {} species, max shape {} bits",
        registry.len(),
        VectorShape::Max.vector_bits()
    );

    registry
});

/// Looks up the registry entry for a (lane type, shape) pair.
pub fn species_info(lane_type: LaneType, shape: VectorShape) -> &'static SpeciesInfo {
    &REGISTRY[lane_type.index() * VectorShape::ALL.len() + shape.index()]
}

/// Handle to the species of `N` lanes of type `E`.
///
/// Two species are equal iff they share lane type, lane count and shape.
/// In particular the `Max` species is distinct from the fixed shape of the
/// same bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Species<E: Lane, const N: usize> {
    shape: VectorShape,
    _lane: PhantomData<E>,
}

impl<E: Lane, const N: usize> Species<E, N> {
    /// Returns the species of shape `shape`.
    ///
    /// # Errors
    ///
    /// Fails with a species mismatch when `N` is not the lane count of `E`
    /// lanes in `shape`.
    pub fn of(shape: VectorShape) -> Result<Self> {
        let info = species_info(E::LANE_TYPE, shape);
        if info.lane_count != N {
            return Err(species_mismatch(
                format!("Species[{}, {}, _]", E::LANE_TYPE, N),
                &info.name,
            ));
        }
        Ok(Self::new_unchecked(shape))
    }

    /// The species of the platform's preferred (`Max`) shape.
    pub fn preferred() -> Result<Self> {
        Self::of(VectorShape::preferred())
    }

    /// Internal constructor; callers guarantee the lane count matches.
    pub(crate) const fn new_unchecked(shape: VectorShape) -> Self {
        Species {
            shape,
            _lane: PhantomData,
        }
    }

    pub fn info(&self) -> &'static SpeciesInfo {
        species_info(E::LANE_TYPE, self.shape)
    }

    pub fn shape(&self) -> VectorShape {
        self.shape
    }

    pub fn lane_type(&self) -> LaneType {
        E::LANE_TYPE
    }

    /// Number of lanes.
    #[inline(always)]
    pub const fn length(&self) -> usize {
        N
    }

    /// Lane width in bits.
    pub fn element_size(&self) -> usize {
        E::BITS as usize
    }

    pub fn vector_bit_size(&self) -> usize {
        self.shape.vector_bits()
    }

    pub fn vector_byte_size(&self) -> usize {
        self.shape.vector_bytes()
    }

    /// Vector with every lane zero.
    pub fn zero(self) -> Vector<E, N> {
        Vector::from_lanes(self, [E::zero(); N])
    }

    /// Vector holding `0, 1, ..., N-1`.
    pub fn iota(self) -> Vector<E, N> {
        self.from_fn(|i| E::from_i64_wrapping(i as i64))
    }

    /// Vector with every lane set to `e`.
    pub fn broadcast(self, e: E) -> Vector<E, N> {
        Vector::from_lanes(self, [e; N])
    }

    /// Broadcasts a wide value, failing when it does not fit a lane.
    pub fn broadcast_long(self, e: i64) -> Result<Vector<E, N>> {
        Ok(self.broadcast(self.check_value(e)?))
    }

    /// Narrows `value` to the lane type, failing with a range error when it
    /// is not exactly representable.
    pub fn check_value(&self, value: i64) -> Result<E> {
        E::from_i64_exact(value).ok_or_else(|| range_error(value, E::LANE_TYPE.name()))
    }

    /// Validates the scale of an index vector: `N * scale` must be
    /// representable by the lane type.
    pub fn check_scale(&self, scale: i32) -> Result<()> {
        (N as i64)
            .checked_mul(scale as i64)
            .and_then(E::from_i64_exact)
            .map(|_| ())
            .ok_or_else(|| range_error(scale as i64, E::LANE_TYPE.name()))
    }

    /// Builds a vector from per-lane values computed by `f`.
    pub fn from_fn(self, f: impl FnMut(usize) -> E) -> Vector<E, N> {
        Vector::from_lanes(self, std::array::from_fn(f))
    }

    /// Builds a vector from exactly `N` `i32` values, each of which must fit
    /// the lane type.
    pub fn from_int_values(self, values: &[i32]) -> Result<Vector<E, N>> {
        if values.len() != N {
            return Err(bounds_error(
                values.len() as i64,
                N as i64,
                "int value count must equal lane count",
            ));
        }
        let mut lanes = [E::zero(); N];
        for (lane, &value) in lanes.iter_mut().zip(values) {
            *lane = self.check_value(value as i64)?;
        }
        Ok(Vector::from_lanes(self, lanes))
    }

    /// Mask with every lane set to `bit`.
    pub fn mask_all(self, bit: bool) -> Mask<E, N> {
        Mask::from_bits(self, [bit; N])
    }

    /// Loads a mask from `N` booleans starting at `offset`.
    pub fn load_mask(self, bits: &[bool], offset: usize) -> Result<Mask<E, N>> {
        Mask::from_array(self, bits, offset)
    }

    /// Mask of lanes `i` with `0 <= offset + i < limit`.
    pub fn index_in_range(self, offset: isize, limit: isize) -> Mask<E, N> {
        Mask::from_bits(
            self,
            std::array::from_fn(|i| {
                (offset as i64)
                    .checked_add(i as i64)
                    .is_some_and(|index| index >= 0 && index < limit as i64)
            }),
        )
    }

    /// Shuffle with lane `i` sourcing `start + i * step`.
    ///
    /// With `wrap` the indices are reduced modulo `N`; otherwise
    /// out-of-range indices are kept as exceptional (negative) indices.
    pub fn iota_shuffle(self, start: i32, step: i32, wrap: bool) -> Shuffle<E, N> {
        Shuffle::iota(self, start, step, wrap)
    }

    /// Shuffle from exactly `N` source indices.
    pub fn shuffle_from_values(self, indices: &[i32]) -> Result<Shuffle<E, N>> {
        Shuffle::from_values(self, indices)
    }

    /// Fails with a species mismatch unless `other` equals `self`.
    #[inline]
    pub(crate) fn check(&self, other: &Self) -> Result<()> {
        if self != other {
            return Err(species_mismatch(self, other));
        }
        Ok(())
    }
}

impl<E: Lane, const N: usize> Display for Species<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info().name)
    }
}
