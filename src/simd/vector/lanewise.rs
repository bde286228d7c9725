//! Lane-wise operators, comparisons and tests.
//!
//! Every operator resolves once to a plain lane function (`fn(E) -> E`,
//! `fn(E, E) -> E`, ...) and is then mapped over the lanes. Masked forms
//! compute the full result and keep the first operand's lane wherever the
//! mask is unset.

use num::{Bounded, One, PrimInt, Saturating};

use crate::error::{div_zero_error, unsupported, Result};
use crate::simd::lane::{compress_bits, expand_bits, Lane};
use crate::simd::mask::Mask;
use crate::simd::operators::{
    flags, BinaryOp, ComparisonOp, Operator, TernaryOp, TestOp, UnaryOp,
};
use crate::simd::vector::Vector;

// ================================================================================================
// LANE FUNCTIONS
// ================================================================================================

#[inline(always)]
pub(crate) fn not_lane<E: Lane>(a: E) -> E {
    !a
}

#[inline(always)]
pub(crate) fn neg_lane<E: Lane>(a: E) -> E {
    a.wrapping_neg()
}

#[inline(always)]
pub(crate) fn abs_lane<E: Lane>(a: E) -> E {
    if a.is_negative() {
        a.wrapping_neg()
    } else {
        a
    }
}

#[inline(always)]
fn zomo_lane<E: Lane>(a: E) -> E {
    if a.is_zero() {
        a
    } else {
        !E::zero()
    }
}

#[inline(always)]
fn bit_count_lane<E: Lane>(a: E) -> E {
    E::from_i64_wrapping(a.count_ones() as i64)
}

#[inline(always)]
fn trailing_zeros_lane<E: Lane>(a: E) -> E {
    E::from_i64_wrapping(a.trailing_zeros() as i64)
}

#[inline(always)]
fn leading_zeros_lane<E: Lane>(a: E) -> E {
    E::from_i64_wrapping(a.leading_zeros() as i64)
}

#[inline(always)]
fn reverse_bytes_lane<E: Lane>(a: E) -> E {
    a.swap_bytes()
}

/// Bit reversal: reverse the bytes, then swap nibbles, bit pairs and
/// single bits inside every byte.
fn reverse_lane<E: Lane>(a: E) -> E {
    if a.is_zero() || a == !E::zero() {
        return a;
    }

    let one = E::Bits::one();
    let ones = E::Bits::max_value();
    let nibbles = ones / ((one << 4) | one);
    let pairs = ones / ((one << 2) | one);
    let singles = ones / ((one << 1) | one);

    let mut b = a.to_bits().swap_bytes();
    b = ((b & nibbles) << 4) | ((b >> 4) & nibbles);
    b = ((b & pairs) << 2) | ((b >> 2) & pairs);
    b = ((b & singles) << 1) | ((b >> 1) & singles);
    E::from_bits(b)
}

/// Shift count reduced to the lane width.
#[inline(always)]
fn shift_count<E: Lane>(n: E) -> usize {
    (n.widen() & (E::BITS as i64 - 1)) as usize
}

#[inline(always)]
fn div_lane<E: Lane>(a: E, b: E) -> E {
    // only MIN / -1 overflows; it wraps back to MIN
    a.checked_div(&b).unwrap_or_else(|| a.wrapping_neg())
}

#[inline(always)]
fn first_nonzero_lane<E: Lane>(a: E, b: E) -> E {
    if a.is_zero() {
        b
    } else {
        a
    }
}

#[inline(always)]
fn rotate_left_lane<E: Lane>(a: E, n: E) -> E {
    E::from_bits(a.to_bits().rotate_left(shift_count(n) as u32))
}

#[inline(always)]
fn rotate_right_lane<E: Lane>(a: E, n: E) -> E {
    E::from_bits(a.to_bits().rotate_right(shift_count(n) as u32))
}

#[inline(always)]
pub(crate) fn umin_lane<E: Lane>(a: E, b: E) -> E {
    if a.to_bits() <= b.to_bits() {
        a
    } else {
        b
    }
}

#[inline(always)]
pub(crate) fn umax_lane<E: Lane>(a: E, b: E) -> E {
    if a.to_bits() >= b.to_bits() {
        a
    } else {
        b
    }
}

#[inline(always)]
pub(crate) fn suadd_lane<E: Lane>(a: E, b: E) -> E {
    E::from_bits(a.to_bits().saturating_add(b.to_bits()))
}

/// Resolves a unary operator to its lane function.
pub(crate) fn unary_lane_fn<E: Lane>(op: UnaryOp) -> Result<fn(E) -> E> {
    op.check_supported::<E>()?;
    let f: fn(E) -> E = match op {
        UnaryOp::Neg => neg_lane,
        UnaryOp::Abs => abs_lane,
        UnaryOp::Not => not_lane,
        UnaryOp::Zomo => zomo_lane,
        UnaryOp::BitCount => bit_count_lane,
        UnaryOp::TrailingZerosCount => trailing_zeros_lane,
        UnaryOp::LeadingZerosCount => leading_zeros_lane,
        UnaryOp::Reverse => reverse_lane,
        UnaryOp::ReverseBytes => reverse_bytes_lane,
        UnaryOp::Sqrt | UnaryOp::Sin | UnaryOp::Cos | UnaryOp::Exp | UnaryOp::Log => {
            return Err(unsupported(op.name(), E::LANE_TYPE.name()))
        }
    };
    Ok(f)
}

/// Resolves a binary operator to its lane function.
///
/// Shift and rotate counts are reduced modulo the lane width inside the
/// lane function. `Div` expects a nonzero divisor.
pub(crate) fn binary_lane_fn<E: Lane>(op: BinaryOp) -> Result<fn(E, E) -> E> {
    op.check_supported::<E>()?;
    let f: fn(E, E) -> E = match op {
        BinaryOp::Add => |a, b| a.wrapping_add(&b),
        BinaryOp::Sub => |a, b| a.wrapping_sub(&b),
        BinaryOp::Mul => |a, b| a.wrapping_mul(&b),
        BinaryOp::Div => div_lane,
        BinaryOp::Min => |a, b| a.min(b),
        BinaryOp::Max => |a, b| a.max(b),
        BinaryOp::And => |a, b| a & b,
        BinaryOp::Or => |a, b| a | b,
        BinaryOp::Xor => |a, b| a ^ b,
        BinaryOp::AndNot => |a, b| a & !b,
        BinaryOp::FirstNonzero => first_nonzero_lane,
        BinaryOp::Lshl => |a, n| a << shift_count(n),
        BinaryOp::Ashr => |a, n| a >> shift_count(n),
        BinaryOp::Lshr => |a, n| E::from_bits(a.to_bits() >> shift_count(n)),
        BinaryOp::Rol => rotate_left_lane,
        BinaryOp::Ror => rotate_right_lane,
        BinaryOp::UMin => umin_lane,
        BinaryOp::UMax => umax_lane,
        BinaryOp::SAdd => |a, b| a.saturating_add(b),
        BinaryOp::SSub => |a, b| a.saturating_sub(b),
        BinaryOp::SuAdd => suadd_lane,
        BinaryOp::SuSub => |a, b| E::from_bits(a.to_bits().saturating_sub(b.to_bits())),
        BinaryOp::CompressBits => |a, b| E::from_bits(compress_bits(a.to_bits(), b.to_bits())),
        BinaryOp::ExpandBits => |a, b| E::from_bits(expand_bits(a.to_bits(), b.to_bits())),
        BinaryOp::Atan2 | BinaryOp::Pow | BinaryOp::Hypot => {
            return Err(unsupported(op.name(), E::LANE_TYPE.name()))
        }
    };
    Ok(f)
}

/// Resolves a ternary operator to its lane function.
pub(crate) fn ternary_lane_fn<E: Lane>(op: TernaryOp) -> Result<fn(E, E, E) -> E> {
    op.check_supported::<E>()?;
    let f: fn(E, E, E) -> E = match op {
        TernaryOp::BitwiseBlend => |a, b, c| a ^ ((a ^ b) & c),
        TernaryOp::Fma => return Err(unsupported(op.name(), E::LANE_TYPE.name())),
    };
    Ok(f)
}

/// Resolves a comparison to its lane predicate.
pub(crate) fn compare_lane_fn<E: Lane>(op: ComparisonOp) -> fn(E, E) -> bool {
    match op {
        ComparisonOp::Eq => |a, b| a == b,
        ComparisonOp::Ne => |a, b| a != b,
        ComparisonOp::Lt => |a, b| a < b,
        ComparisonOp::Le => |a, b| a <= b,
        ComparisonOp::Gt => |a, b| a > b,
        ComparisonOp::Ge => |a, b| a >= b,
        ComparisonOp::Ult => |a, b| a.to_bits() < b.to_bits(),
        ComparisonOp::Ule => |a, b| a.to_bits() <= b.to_bits(),
        ComparisonOp::Ugt => |a, b| a.to_bits() > b.to_bits(),
        ComparisonOp::Uge => |a, b| a.to_bits() >= b.to_bits(),
    }
}

// ================================================================================================
// VECTOR OPERATIONS
// ================================================================================================

impl<E: Lane, const N: usize> Vector<E, N> {
    /// Runs `op` over every lane pair, handing full register chunks to the
    /// hardware kernel when one exists.
    fn apply_binary(self, op: BinaryOp, that: &[E; N]) -> Result<[E; N]> {
        let f = binary_lane_fn::<E>(op)?;
        let mut out = [E::zero(); N];
        let done = E::accelerated_binary(op, self.lanes(), that, &mut out);
        for ((slot, &a), &b) in out.iter_mut().zip(self.lanes()).zip(that).skip(done) {
            *slot = f(a, b);
        }
        Ok(out)
    }

    /// Applies a unary operator to every lane.
    pub fn lanewise_unary(self, op: UnaryOp) -> Result<Self> {
        let f = unary_lane_fn::<E>(op)?;
        Ok(self.map_lanes(f))
    }

    /// Applies a unary operator to the set lanes; unset lanes are unchanged.
    pub fn lanewise_unary_masked(self, op: UnaryOp, m: Mask<E, N>) -> Result<Self> {
        self.species().check(&m.species())?;
        let r = self.lanewise_unary(op)?;
        Ok(self.blend_unchecked(r.lanes(), &m))
    }

    /// Combines corresponding lanes of `self` and `v`.
    ///
    /// # Errors
    ///
    /// - species mismatch between `self` and `v`
    /// - unsupported operator for the lane type
    /// - division by zero in any lane for [`BinaryOp::Div`]
    pub fn lanewise(self, op: BinaryOp, v: Self) -> Result<Self> {
        self.species().check(&v.species())?;
        if op == BinaryOp::Div {
            if let Some(lane) = v.lanes().iter().position(|b| b.is_zero()) {
                return Err(div_zero_error(lane));
            }
        }
        Ok(self.with_lanes(self.apply_binary(op, v.lanes())?))
    }

    /// Masked binary operation: set lanes get `op(self, v)`, unset lanes
    /// keep `self`.
    ///
    /// For [`BinaryOp::Div`] only set lanes are checked for zero divisors.
    pub fn lanewise_masked(self, op: BinaryOp, v: Self, m: Mask<E, N>) -> Result<Self> {
        self.species().check(&v.species())?;
        self.species().check(&m.species())?;

        let mut divisor = *v.lanes();
        if op == BinaryOp::Div {
            if let Some(lane) = (0..N).find(|&i| m.test(i) && divisor[i].is_zero()) {
                return Err(div_zero_error(lane));
            }
            // unset zero divisors become -1 so the full-width division is total
            for d in divisor.iter_mut().filter(|d| d.is_zero()) {
                *d = not_lane(*d);
            }
        }

        let r = self.apply_binary(op, &divisor)?;
        Ok(self.blend_unchecked(&r, &m))
    }

    /// Combines every lane with the scalar `e`.
    pub fn lanewise_scalar(self, op: BinaryOp, e: E) -> Result<Self> {
        self.lanewise(op, self.broadcast(e))
    }

    pub fn lanewise_scalar_masked(self, op: BinaryOp, e: E, m: Mask<E, N>) -> Result<Self> {
        self.lanewise_masked(op, self.broadcast(e), m)
    }

    /// Combines every lane with a wide scalar.
    ///
    /// `e` must fit the lane type, except that shift counts may be any `i32`
    /// value since they are reduced modulo the lane width anyway.
    pub fn lanewise_long(self, op: BinaryOp, e: i64) -> Result<Self> {
        self.lanewise_scalar(op, self.narrow_operand(op, e)?)
    }

    pub fn lanewise_long_masked(self, op: BinaryOp, e: i64, m: Mask<E, N>) -> Result<Self> {
        self.lanewise_scalar_masked(op, self.narrow_operand(op, e)?, m)
    }

    fn narrow_operand(self, op: BinaryOp, e: i64) -> Result<E> {
        if op.has_flag(flags::SHIFT) && i32::try_from(e).is_ok() {
            return Ok(E::from_i64_wrapping(e));
        }
        self.species().check_value(e)
    }

    /// Applies a ternary operator lane by lane.
    pub fn lanewise_ternary(self, op: TernaryOp, v1: Self, v2: Self) -> Result<Self> {
        self.species().check(&v1.species())?;
        self.species().check(&v2.species())?;
        let f = ternary_lane_fn::<E>(op)?;
        let (a, b, c) = (self.lanes(), v1.lanes(), v2.lanes());
        Ok(self.with_lanes(std::array::from_fn(|i| f(a[i], b[i], c[i]))))
    }

    /// Masked ternary operation; unset lanes keep `self`.
    pub fn lanewise_ternary_masked(
        self,
        op: TernaryOp,
        v1: Self,
        v2: Self,
        m: Mask<E, N>,
    ) -> Result<Self> {
        self.species().check(&m.species())?;
        let r = self.lanewise_ternary(op, v1, v2)?;
        Ok(self.blend_unchecked(r.lanes(), &m))
    }

    pub fn lanewise_ternary_scalars(self, op: TernaryOp, e1: E, e2: E) -> Result<Self> {
        self.lanewise_ternary(op, self.broadcast(e1), self.broadcast(e2))
    }

    pub fn lanewise_ternary_scalars_masked(
        self,
        op: TernaryOp,
        e1: E,
        e2: E,
        m: Mask<E, N>,
    ) -> Result<Self> {
        self.lanewise_ternary_masked(op, self.broadcast(e1), self.broadcast(e2), m)
    }

    pub fn lanewise_ternary_vector_scalar(self, op: TernaryOp, v1: Self, e2: E) -> Result<Self> {
        self.lanewise_ternary(op, v1, self.broadcast(e2))
    }

    pub fn lanewise_ternary_scalar_vector(self, op: TernaryOp, e1: E, v2: Self) -> Result<Self> {
        self.lanewise_ternary(op, self.broadcast(e1), v2)
    }

    /// Lane-wise comparison producing a mask.
    pub fn compare(self, op: ComparisonOp, v: Self) -> Result<Mask<E, N>> {
        self.species().check(&v.species())?;
        Ok(self.compare_unchecked(op, v.lanes()))
    }

    /// Masked comparison: the plain comparison ANDed with `m`.
    pub fn compare_masked(self, op: ComparisonOp, v: Self, m: Mask<E, N>) -> Result<Mask<E, N>> {
        self.compare(op, v)?.and(&m)
    }

    /// Compares every lane with the scalar `e`.
    pub fn compare_scalar(self, op: ComparisonOp, e: E) -> Mask<E, N> {
        self.compare_unchecked(op, &[e; N])
    }

    pub fn compare_scalar_masked(self, op: ComparisonOp, e: E, m: Mask<E, N>) -> Result<Mask<E, N>> {
        self.compare_scalar(op, e).and(&m)
    }

    /// Compares every lane with a wide scalar, which must fit the lane type.
    pub fn compare_long(self, op: ComparisonOp, e: i64) -> Result<Mask<E, N>> {
        Ok(self.compare_scalar(op, self.species().check_value(e)?))
    }

    fn compare_unchecked(self, op: ComparisonOp, that: &[E; N]) -> Mask<E, N> {
        let f = compare_lane_fn::<E>(op);
        let a = self.lanes();
        Mask::from_bits(self.species(), std::array::from_fn(|i| f(a[i], that[i])))
    }

    /// Lane-wise predicate: `IsDefault` is `== 0`, `IsNegative` is `< 0`.
    pub fn test(self, op: TestOp) -> Result<Mask<E, N>> {
        op.check_supported::<E>()?;
        match op {
            TestOp::IsDefault => Ok(self.compare_scalar(ComparisonOp::Eq, E::zero())),
            TestOp::IsNegative => Ok(self.compare_scalar(ComparisonOp::Lt, E::zero())),
            TestOp::IsFinite | TestOp::IsNan | TestOp::IsInfinite => {
                Err(unsupported(op.name(), E::LANE_TYPE.name()))
            }
        }
    }

    pub fn test_masked(self, op: TestOp, m: Mask<E, N>) -> Result<Mask<E, N>> {
        self.test(op)?.and(&m)
    }
}
