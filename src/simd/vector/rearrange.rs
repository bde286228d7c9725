//! Cross-lane data movement: rearrange, slice, compress, select.
//!
//! Slices are built from a wrapping iota shuffle and a mask comparing lane
//! indices against the origin, then blended, so every form shares the same
//! two primitives as [`Vector::rearrange`] and [`Vector::blend`].

use crate::error::{bounds_error, Result};
use crate::simd::lane::Lane;
use crate::simd::mask::Mask;
use crate::simd::operators::{BinaryOp, ComparisonOp};
use crate::simd::shuffle::{wrap_index, Shuffle};
use crate::simd::vector::Vector;

impl<E: Lane, const N: usize> Vector<E, N> {
    #[inline]
    fn check_origin(origin: usize) -> Result<()> {
        if origin > N {
            return Err(bounds_error(origin as i64, N as i64 + 1, "slice origin"));
        }
        Ok(())
    }

    /// Mask of lanes whose index compares to `bound` under `op`.
    fn iota_compare(self, op: ComparisonOp, bound: usize) -> Mask<E, N> {
        self.species()
            .iota()
            .compare_scalar(op, E::from_i64_wrapping(bound as i64))
    }

    #[inline(always)]
    fn rearrange_unchecked(self, s: &Shuffle<E, N>) -> Self {
        let lanes = self.lanes();
        self.with_lanes(std::array::from_fn(|i| lanes[s.source(i)]))
    }

    // --------------------------------------------------------------------------------------------
    // rearrange
    // --------------------------------------------------------------------------------------------

    /// Lane `i` of the result is `self[s[i] mod N]`.
    ///
    /// Exceptional shuffle indices wrap; they are not an error here.
    pub fn rearrange(self, s: Shuffle<E, N>) -> Result<Self> {
        self.species().check(&s.species())?;
        Ok(self.rearrange_unchecked(&s))
    }

    /// Rearranges, then zeroes every lane where `m` is unset.
    ///
    /// Unlike the lanewise masked forms, unset lanes do not keep the
    /// receiver's value: a destination lane has no corresponding source
    /// lane under an arbitrary shuffle.
    pub fn rearrange_masked(self, s: Shuffle<E, N>, m: Mask<E, N>) -> Result<Self> {
        self.species().check(&s.species())?;
        self.species().check(&m.species())?;
        let r = self.rearrange_unchecked(&s);
        Ok(self.species().zero().blend_unchecked(r.lanes(), &m))
    }

    /// Two-source rearrange: lanes with a valid shuffle index take from
    /// `self`, lanes with an exceptional index take from `v`.
    pub fn rearrange_two(self, s: Shuffle<E, N>, v: Self) -> Result<Self> {
        self.species().check(&s.species())?;
        self.species().check(&v.species())?;
        let r0 = self.rearrange_unchecked(&s);
        let r1 = v.rearrange_unchecked(&s);
        Ok(r1.blend_unchecked(r0.lanes(), &s.lane_is_valid()))
    }

    /// Shuffle built from the lane values, partially wrapped.
    pub fn to_shuffle(self) -> Shuffle<E, N> {
        Shuffle::from_raw(self.species(), self.lanes().map(E::widen))
    }

    // --------------------------------------------------------------------------------------------
    // slice / unslice
    // --------------------------------------------------------------------------------------------

    /// Lanes `origin..N` of `self` followed by lanes `0..origin` of `v1`.
    ///
    /// Equivalently, a window of `N` lanes starting at `origin` in the
    /// concatenation `self ++ v1`.
    ///
    /// # Errors
    ///
    /// Bounds error unless `origin <= N`; species mismatch.
    pub fn slice_with(self, origin: usize, v1: Self) -> Result<Self> {
        Self::check_origin(origin)?;
        self.species().check(&v1.species())?;
        let s = Shuffle::iota(self.species(), origin as i32, 1, true);
        let from_self = self.iota_compare(ComparisonOp::Lt, N - origin);
        let head = self.rearrange_unchecked(&s);
        Ok(v1.rearrange_unchecked(&s).blend_unchecked(head.lanes(), &from_self))
    }

    /// Slice against a zero vector: lanes shift down by `origin`, vacated
    /// high lanes become zero.
    pub fn slice(self, origin: usize) -> Result<Self> {
        self.slice_with(origin, self.species().zero())
    }

    /// [`slice_with`](Self::slice_with), then zeroes lanes where `m` is unset.
    pub fn slice_with_masked(self, origin: usize, v1: Self, m: Mask<E, N>) -> Result<Self> {
        self.species().check(&m.species())?;
        let sliced = self.slice_with(origin, v1)?;
        Ok(self.species().zero().blend_unchecked(sliced.lanes(), &m))
    }

    /// Inverse of [`slice`](Self::slice): lanes shift up by `origin`,
    /// vacated low lanes become zero.
    pub fn unslice(self, origin: usize) -> Result<Self> {
        Self::check_origin(origin)?;
        let s = Shuffle::iota(self.species(), -(origin as i32), 1, true);
        let shifted = self.rearrange_unchecked(&s);
        let keep = self.iota_compare(ComparisonOp::Ge, origin);
        Ok(self.species().zero().blend_unchecked(shifted.lanes(), &keep))
    }

    /// Inverse of [`slice_with`](Self::slice_with), writing into one half of
    /// the two-vector window `w ++ w`.
    ///
    /// Part 0 overwrites lanes `origin..N` of `w` with the low lanes of
    /// `self`; part 1 overwrites lanes `0..origin` with the high lanes.
    ///
    /// # Errors
    ///
    /// Bounds error unless `origin <= N` and `part` is 0 or 1.
    pub fn unslice_into(self, origin: usize, w: Self, part: usize) -> Result<Self> {
        Self::check_origin(origin)?;
        self.species().check(&w.species())?;
        let op = match part {
            0 => ComparisonOp::Ge,
            1 => ComparisonOp::Lt,
            _ => return Err(bounds_error(part as i64, 2, "bad part number")),
        };
        let s = Shuffle::iota(self.species(), -(origin as i32), 1, true);
        let shifted = self.rearrange_unchecked(&s);
        Ok(w.blend_unchecked(shifted.lanes(), &self.iota_compare(op, origin)))
    }

    /// Masked [`unslice_into`](Self::unslice_into): unset lanes of `self`
    /// are replaced by the corresponding lanes of `w`'s own slice first, so
    /// they leave `w` unchanged.
    pub fn unslice_into_masked(
        self,
        origin: usize,
        w: Self,
        part: usize,
        m: Mask<E, N>,
    ) -> Result<Self> {
        self.species().check(&m.species())?;
        let source = w.slice_with(origin, w)?.blend(self, m)?;
        source.unslice_into(origin, w, part)
    }

    // --------------------------------------------------------------------------------------------
    // compress / expand
    // --------------------------------------------------------------------------------------------

    /// Packs the set lanes into a dense prefix, in order; the rest is zero.
    pub fn compress(self, m: Mask<E, N>) -> Result<Self> {
        self.species().check(&m.species())?;
        if m.all_true() {
            return Ok(self);
        }
        let lanes = self.lanes();
        let mut out = [E::zero(); N];
        let mut write = 0;
        for i in (0..N).filter(|&i| m.test(i)) {
            out[write] = lanes[i];
            write += 1;
        }
        Ok(self.with_lanes(out))
    }

    /// Scatters the dense prefix back out to the set lanes; the rest is zero.
    pub fn expand(self, m: Mask<E, N>) -> Result<Self> {
        self.species().check(&m.species())?;
        if m.all_true() {
            return Ok(self);
        }
        let lanes = self.lanes();
        let mut out = [E::zero(); N];
        let mut read = 0;
        for i in (0..N).filter(|&i| m.test(i)) {
            out[i] = lanes[read];
            read += 1;
        }
        Ok(self.with_lanes(out))
    }

    // --------------------------------------------------------------------------------------------
    // select
    // --------------------------------------------------------------------------------------------

    /// Uses `self` as an index vector into `v`: lane `i` is
    /// `v[self[i] mod N]`.
    pub fn select_from(self, v: Self) -> Result<Self> {
        v.rearrange(self.to_shuffle())
    }

    /// Masked [`select_from`](Self::select_from); unset lanes are zero.
    pub fn select_from_masked(self, v: Self, m: Mask<E, N>) -> Result<Self> {
        v.rearrange_masked(self.to_shuffle(), m)
    }

    /// Uses `self` as an index vector into the concatenation `v1 ++ v2`,
    /// each index wrapped modulo `2 * N`.
    pub fn select_from_two(self, v1: Self, v2: Self) -> Result<Self> {
        self.species().check(&v1.species())?;
        self.species().check(&v2.species())?;
        let (a, b) = (v1.lanes(), v2.lanes());
        Ok(self.map_lanes(|index| {
            let wrapped = wrap_index(index.widen(), 2 * N);
            if wrapped >= N {
                b[wrapped - N]
            } else {
                a[wrapped]
            }
        }))
    }

    /// Adds `i * scale` to lane `i`.
    ///
    /// # Errors
    ///
    /// Range error when `N * scale` is not representable by the lane type.
    pub fn add_index(self, scale: i32) -> Result<Self> {
        let species = self.species();
        species.check_scale(scale)?;
        let offsets = species
            .iota()
            .lanewise_scalar(BinaryOp::Mul, E::from_i64_wrapping(scale as i64))?;
        self.lanewise(BinaryOp::Add, offsets)
    }
}
