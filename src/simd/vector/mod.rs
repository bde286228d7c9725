//! The immutable lane vector and its core operations.
//!
//! [`Vector`] is a plain `Copy` value: `N` lanes of type `E` tagged with the
//! species they belong to. Every operation returns a new vector; the lane
//! array is never shared with the caller.
//!
//! Operations are split by concern:
//! - [`lanewise`]: unary/binary/ternary lane operators, comparisons, tests
//! - [`reduce`]: folding all lanes to one scalar
//! - [`rearrange`]: shuffles, slices, compress/expand, select-from

pub mod lanewise;
pub mod rearrange;
pub mod reduce;

use std::fmt::{self, Display};
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::error::{bounds_error, range_error, species_mismatch, Result};
use crate::simd::lane::Lane;
use crate::simd::mask::Mask;
use crate::simd::operators::{BinaryOp, ComparisonOp, TernaryOp};
use crate::simd::species::Species;

/// A vector of `N` lanes of type `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector<E: Lane, const N: usize> {
    species: Species<E, N>,
    lanes: [E; N],
}

impl<E: Lane, const N: usize> Vector<E, N> {
    /// Wraps an owned lane array.
    #[inline(always)]
    pub(crate) fn from_lanes(species: Species<E, N>, lanes: [E; N]) -> Self {
        Vector { species, lanes }
    }

    /// Same species, new lanes.
    #[inline(always)]
    pub(crate) fn with_lanes(self, lanes: [E; N]) -> Self {
        Vector {
            species: self.species,
            lanes,
        }
    }

    pub fn species(self) -> Species<E, N> {
        self.species
    }

    #[inline(always)]
    pub const fn length(self) -> usize {
        N
    }

    /// Vector of the same species with every lane set to `e`.
    pub fn broadcast(self, e: E) -> Self {
        self.species.broadcast(e)
    }

    /// Range-checked broadcast of a wide value.
    pub fn broadcast_long(self, e: i64) -> Result<Self> {
        self.species.broadcast_long(e)
    }

    /// Value of lane `i`.
    pub fn lane(self, i: usize) -> Result<E> {
        self.lanes
            .get(i)
            .copied()
            .ok_or_else(|| bounds_error(i as i64, N as i64, "vector lane"))
    }

    /// Copy of the vector with lane `i` replaced by `e`.
    pub fn with_lane(self, i: usize, e: E) -> Result<Self> {
        if i >= N {
            return Err(bounds_error(i as i64, N as i64, "vector lane"));
        }
        let mut lanes = self.lanes;
        lanes[i] = e;
        Ok(self.with_lanes(lanes))
    }

    pub fn to_array(self) -> [E; N] {
        self.lanes
    }

    /// Lanes widened to `i32`; fails for lanes that do not fit.
    pub fn to_int_array(self) -> Result<[i32; N]> {
        let mut out = [0i32; N];
        for (slot, lane) in out.iter_mut().zip(self.lanes) {
            let wide = lane.widen();
            *slot = i32::try_from(wide).map_err(|_| range_error(wide, "i32"))?;
        }
        Ok(out)
    }

    pub fn to_long_array(self) -> [i64; N] {
        self.lanes.map(E::widen)
    }

    /// Lanes converted to `f64`; exact for lanes up to 32 bits.
    pub fn to_double_array(self) -> [f64; N] {
        self.lanes.map(|lane| lane.widen() as f64)
    }

    /// Reinterprets the vector's bits as a vector of another species with
    /// the same byte size, lane by lane in native byte order.
    pub fn reinterpret<F: Lane, const M: usize>(self, species: Species<F, M>) -> Result<Vector<F, M>> {
        if self.species.vector_byte_size() != species.vector_byte_size() {
            return Err(species_mismatch(self.species, species));
        }
        let mut bytes = vec![0u8; N * E::BYTES];
        for (lane, chunk) in self.lanes.iter().zip(bytes.chunks_exact_mut(E::BYTES)) {
            lane.write_ne(chunk);
        }
        Ok(species.from_fn(|i| F::read_ne(&bytes[i * F::BYTES..])))
    }

    /// Integral lanes already are their own bit view.
    pub fn view_as_integral_lanes(self) -> Self {
        self
    }

    /// Lane `i` is `v[i]` where `m` is set, else `self[i]`.
    pub fn blend(self, v: Self, m: Mask<E, N>) -> Result<Self> {
        self.species.check(&v.species)?;
        self.species.check(&m.species())?;
        Ok(self.blend_unchecked(&v.lanes, &m))
    }

    pub fn blend_scalar(self, e: E, m: Mask<E, N>) -> Result<Self> {
        self.blend(self.broadcast(e), m)
    }

    pub fn blend_long(self, e: i64, m: Mask<E, N>) -> Result<Self> {
        self.blend(self.broadcast_long(e)?, m)
    }

    #[inline(always)]
    pub(crate) fn blend_unchecked(self, v: &[E; N], m: &Mask<E, N>) -> Self {
        self.with_lanes(std::array::from_fn(|i| {
            if m.test(i) {
                v[i]
            } else {
                self.lanes[i]
            }
        }))
    }

    #[inline(always)]
    pub(crate) fn lanes(&self) -> &[E; N] {
        &self.lanes
    }

    #[inline(always)]
    pub(crate) fn map_lanes(self, f: impl Fn(E) -> E) -> Self {
        self.with_lanes(self.lanes.map(f))
    }
}

/// Named shortcuts for the common operators.
#[allow(clippy::should_implement_trait)]
impl<E: Lane, const N: usize> Vector<E, N> {
    pub fn add(self, v: Self) -> Result<Self> {
        self.lanewise(BinaryOp::Add, v)
    }

    pub fn add_masked(self, v: Self, m: Mask<E, N>) -> Result<Self> {
        self.lanewise_masked(BinaryOp::Add, v, m)
    }

    pub fn sub(self, v: Self) -> Result<Self> {
        self.lanewise(BinaryOp::Sub, v)
    }

    pub fn sub_masked(self, v: Self, m: Mask<E, N>) -> Result<Self> {
        self.lanewise_masked(BinaryOp::Sub, v, m)
    }

    pub fn mul(self, v: Self) -> Result<Self> {
        self.lanewise(BinaryOp::Mul, v)
    }

    pub fn mul_masked(self, v: Self, m: Mask<E, N>) -> Result<Self> {
        self.lanewise_masked(BinaryOp::Mul, v, m)
    }

    /// Lane-wise division; fails if any divisor lane is zero.
    pub fn div(self, v: Self) -> Result<Self> {
        self.lanewise(BinaryOp::Div, v)
    }

    /// Masked division; only set lanes are checked for zero divisors.
    pub fn div_masked(self, v: Self, m: Mask<E, N>) -> Result<Self> {
        self.lanewise_masked(BinaryOp::Div, v, m)
    }

    pub fn min(self, v: Self) -> Result<Self> {
        self.lanewise(BinaryOp::Min, v)
    }

    pub fn max(self, v: Self) -> Result<Self> {
        self.lanewise(BinaryOp::Max, v)
    }

    pub fn and(self, v: Self) -> Result<Self> {
        self.lanewise(BinaryOp::And, v)
    }

    pub fn or(self, v: Self) -> Result<Self> {
        self.lanewise(BinaryOp::Or, v)
    }

    pub fn not(self) -> Self {
        self.map_lanes(lanewise::not_lane)
    }

    pub fn neg(self) -> Self {
        self.map_lanes(lanewise::neg_lane)
    }

    /// Two's-complement absolute value; the minimum value maps to itself.
    pub fn abs(self) -> Self {
        self.map_lanes(lanewise::abs_lane)
    }

    /// Takes bits of `bits` where `mask` has ones, else bits of `self`.
    pub fn bitwise_blend(self, bits: Self, mask: Self) -> Result<Self> {
        self.lanewise_ternary(TernaryOp::BitwiseBlend, bits, mask)
    }

    pub fn eq(self, v: Self) -> Result<Mask<E, N>> {
        self.compare(ComparisonOp::Eq, v)
    }

    pub fn eq_scalar(self, e: E) -> Mask<E, N> {
        self.compare_scalar(ComparisonOp::Eq, e)
    }

    /// Signed less-than; see [`ComparisonOp::Ult`] for the unsigned order.
    pub fn lt(self, v: Self) -> Result<Mask<E, N>> {
        self.compare(ComparisonOp::Lt, v)
    }

    pub fn lt_scalar(self, e: E) -> Mask<E, N> {
        self.compare_scalar(ComparisonOp::Lt, e)
    }
}

impl<E: Lane, const N: usize> Display for Vector<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.lanes)
    }
}

macro_rules! impl_binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        /// # Panics
        ///
        /// Panics if the operands belong to different species, or (for
        /// division) if a divisor lane is zero.
        impl<E: Lane, const N: usize> $trait for Vector<E, N> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self::Output {
                match self.lanewise($op, rhs) {
                    Ok(v) => v,
                    Err(err) => panic!("{}", err),
                }
            }
        }
    };
}

impl_binary_operator!(Add, add, BinaryOp::Add);
impl_binary_operator!(Sub, sub, BinaryOp::Sub);
impl_binary_operator!(Mul, mul, BinaryOp::Mul);
impl_binary_operator!(Div, div, BinaryOp::Div);
impl_binary_operator!(BitAnd, bitand, BinaryOp::And);
impl_binary_operator!(BitOr, bitor, BinaryOp::Or);
impl_binary_operator!(BitXor, bitxor, BinaryOp::Xor);

impl<E: Lane, const N: usize> Neg for Vector<E, N> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.map_lanes(lanewise::neg_lane)
    }
}

impl<E: Lane, const N: usize> Not for Vector<E, N> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        self.map_lanes(lanewise::not_lane)
    }
}

impl<E: Lane, const N: usize> From<Vector<E, N>> for [E; N] {
    fn from(v: Vector<E, N>) -> [E; N] {
        v.lanes
    }
}
