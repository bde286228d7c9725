//! Loading vectors from and storing them to memory.
//!
//! Three kinds of backing storage are supported, each with unmasked, masked,
//! indexed (gather/scatter) and masked indexed forms where they make sense:
//!
//! - lane-type arrays (`&[E]`)
//! - same-width unsigned arrays (`&[E::Bits]`), reinterpreted bit for bit
//! - byte slices with an explicit [`ByteOrder`]
//!
//! Offsets are signed. A masked access may start before the array or run
//! past its end as long as every lane that falls outside is unset. Every
//! access validates all of its lanes before touching memory, so a failed
//! store leaves the destination unchanged.

use crate::error::{bounds_error, Result};
use crate::simd::lane::Lane;
use crate::simd::mask::{check_from_index_size, Mask};
use crate::simd::species::Species;
use crate::simd::vector::Vector;

/// Byte order of lanes stored in a byte slice or memory segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// The byte order of the running platform.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    #[inline(always)]
    fn is_native(self) -> bool {
        self == Self::native()
    }
}

// ================================================================================================
// BOUNDS
// ================================================================================================

/// Validates a contiguous access of `N` lanes, each `scale` elements wide,
/// starting at `offset` in storage of `len` elements.
///
/// A partial mask only requires its set lanes to be in bounds; an absent or
/// all-true mask requires the whole range.
fn check_contiguous<E: Lane, const N: usize>(
    offset: isize,
    len: usize,
    scale: usize,
    m: Option<&Mask<E, N>>,
) -> Result<()> {
    match m {
        Some(m) if !m.all_true() => {
            if offset >= 0 && check_from_index_size(offset as usize, N * scale, len).is_ok() {
                return Ok(());
            }
            m.check_index_by_lane(offset, len, scale)
        }
        _ => {
            if offset < 0 {
                return Err(bounds_error(offset as i64, len as i64, "negative offset"));
            }
            check_from_index_size(offset as usize, N * scale, len)
        }
    }
}

/// Resolves the element position of every active lane of a gather or
/// scatter: `offset + index_map[map_offset + i]`.
///
/// The `N` index-map entries must exist even for unset lanes; positions are
/// only checked for set lanes. Inactive lanes resolve to `None`.
fn indexed_positions<E: Lane, const N: usize>(
    offset: isize,
    len: usize,
    index_map: &[i32],
    map_offset: usize,
    m: Option<&Mask<E, N>>,
) -> Result<[Option<usize>; N]> {
    check_from_index_size(map_offset, N, index_map.len())?;
    let mut positions = [None; N];
    for (i, slot) in positions.iter_mut().enumerate() {
        if m.is_some_and(|m| !m.test(i)) {
            continue;
        }
        let position = (offset as i64).saturating_add(index_map[map_offset + i] as i64);
        if position < 0 || position >= len as i64 {
            return Err(bounds_error(
                position,
                len as i64,
                format!("indexed lane {i}"),
            ));
        }
        *slot = Some(position as usize);
    }
    Ok(positions)
}

#[inline(always)]
fn is_active<E: Lane, const N: usize>(m: Option<&Mask<E, N>>, i: usize) -> bool {
    m.map_or(true, |m| m.test(i))
}

// ================================================================================================
// GENERIC ELEMENT ACCESS
// ================================================================================================

fn load<T: Copy, E: Lane, const N: usize>(
    species: Species<E, N>,
    src: &[T],
    offset: isize,
    m: Option<&Mask<E, N>>,
    convert: impl Fn(T) -> E,
) -> Result<Vector<E, N>> {
    if let Some(m) = m {
        species.check(&m.species())?;
    }
    check_contiguous(offset, src.len(), 1, m)?;
    Ok(species.from_fn(|i| {
        if is_active(m, i) {
            convert(src[(offset + i as isize) as usize])
        } else {
            E::zero()
        }
    }))
}

fn store<T, E: Lane, const N: usize>(
    v: Vector<E, N>,
    dst: &mut [T],
    offset: isize,
    m: Option<&Mask<E, N>>,
    convert: impl Fn(E) -> T,
) -> Result<()> {
    if let Some(m) = m {
        v.species().check(&m.species())?;
    }
    check_contiguous(offset, dst.len(), 1, m)?;
    for (i, &lane) in v.lanes().iter().enumerate() {
        if is_active(m, i) {
            dst[(offset + i as isize) as usize] = convert(lane);
        }
    }
    Ok(())
}

fn gather<T: Copy, E: Lane, const N: usize>(
    species: Species<E, N>,
    src: &[T],
    offset: isize,
    index_map: &[i32],
    map_offset: usize,
    m: Option<&Mask<E, N>>,
    convert: impl Fn(T) -> E,
) -> Result<Vector<E, N>> {
    if let Some(m) = m {
        species.check(&m.species())?;
    }
    let positions = indexed_positions(offset, src.len(), index_map, map_offset, m)?;
    Ok(species.from_fn(|i| positions[i].map_or(E::zero(), |p| convert(src[p]))))
}

fn scatter<T, E: Lane, const N: usize>(
    v: Vector<E, N>,
    dst: &mut [T],
    offset: isize,
    index_map: &[i32],
    map_offset: usize,
    m: Option<&Mask<E, N>>,
    convert: impl Fn(E) -> T,
) -> Result<()> {
    if let Some(m) = m {
        v.species().check(&m.species())?;
    }
    let positions = indexed_positions(offset, dst.len(), index_map, map_offset, m)?;
    // ascending lane order: on duplicate positions the highest lane wins
    for (&lane, position) in v.lanes().iter().zip(positions) {
        if let Some(p) = position {
            dst[p] = convert(lane);
        }
    }
    Ok(())
}

#[inline(always)]
fn read_lane<E: Lane>(bytes: &[u8], order: ByteOrder) -> E {
    let lane = E::read_ne(bytes);
    if order.is_native() {
        lane
    } else {
        lane.swap_bytes()
    }
}

#[inline(always)]
fn write_lane<E: Lane>(lane: E, bytes: &mut [u8], order: ByteOrder) {
    let lane = if order.is_native() { lane } else { lane.swap_bytes() };
    lane.write_ne(bytes);
}

pub(crate) fn load_bytes<E: Lane, const N: usize>(
    species: Species<E, N>,
    bytes: &[u8],
    offset: isize,
    order: ByteOrder,
    m: Option<&Mask<E, N>>,
) -> Result<Vector<E, N>> {
    if let Some(m) = m {
        species.check(&m.species())?;
    }
    check_contiguous(offset, bytes.len(), E::BYTES, m)?;
    Ok(species.from_fn(|i| {
        if is_active(m, i) {
            let start = (offset + (i * E::BYTES) as isize) as usize;
            read_lane(&bytes[start..start + E::BYTES], order)
        } else {
            E::zero()
        }
    }))
}

pub(crate) fn store_bytes<E: Lane, const N: usize>(
    v: Vector<E, N>,
    bytes: &mut [u8],
    offset: isize,
    order: ByteOrder,
    m: Option<&Mask<E, N>>,
) -> Result<()> {
    if let Some(m) = m {
        v.species().check(&m.species())?;
    }
    check_contiguous(offset, bytes.len(), E::BYTES, m)?;
    for (i, &lane) in v.lanes().iter().enumerate() {
        if is_active(m, i) {
            let start = (offset + (i * E::BYTES) as isize) as usize;
            write_lane(lane, &mut bytes[start..start + E::BYTES], order);
        }
    }
    Ok(())
}

// ================================================================================================
// VECTOR API
// ================================================================================================

impl<E: Lane, const N: usize> Vector<E, N> {
    // --------------------------------------------------------------------------------------------
    // lane-type arrays
    // --------------------------------------------------------------------------------------------

    /// Loads `a[offset..offset + N]`.
    ///
    /// # Errors
    ///
    /// Bounds error unless the whole range lies inside `a`.
    pub fn from_array(species: Species<E, N>, a: &[E], offset: isize) -> Result<Self> {
        load(species, a, offset, None, |e| e)
    }

    /// Loads the set lanes of `a[offset..offset + N]`; unset lanes are zero
    /// and may fall outside `a`.
    pub fn from_array_masked(
        species: Species<E, N>,
        a: &[E],
        offset: isize,
        m: Mask<E, N>,
    ) -> Result<Self> {
        load(species, a, offset, Some(&m), |e| e)
    }

    /// Gathers lane `i` from `a[offset + index_map[map_offset + i]]`.
    pub fn from_array_indexed(
        species: Species<E, N>,
        a: &[E],
        offset: isize,
        index_map: &[i32],
        map_offset: usize,
    ) -> Result<Self> {
        gather(species, a, offset, index_map, map_offset, None, |e| e)
    }

    /// Gathers the set lanes; unset lanes are zero and their positions are
    /// not checked.
    pub fn from_array_indexed_masked(
        species: Species<E, N>,
        a: &[E],
        offset: isize,
        index_map: &[i32],
        map_offset: usize,
        m: Mask<E, N>,
    ) -> Result<Self> {
        gather(species, a, offset, index_map, map_offset, Some(&m), |e| e)
    }

    /// Stores the lanes to `a[offset..offset + N]`.
    pub fn into_array(self, a: &mut [E], offset: isize) -> Result<()> {
        store(self, a, offset, None, |e| e)
    }

    /// Stores the set lanes; elements under unset lanes are left unchanged.
    pub fn into_array_masked(self, a: &mut [E], offset: isize, m: Mask<E, N>) -> Result<()> {
        store(self, a, offset, Some(&m), |e| e)
    }

    /// Scatters lane `i` to `a[offset + index_map[map_offset + i]]`.
    ///
    /// When two lanes target the same element the higher lane wins.
    pub fn into_array_indexed(
        self,
        a: &mut [E],
        offset: isize,
        index_map: &[i32],
        map_offset: usize,
    ) -> Result<()> {
        scatter(self, a, offset, index_map, map_offset, None, |e| e)
    }

    pub fn into_array_indexed_masked(
        self,
        a: &mut [E],
        offset: isize,
        index_map: &[i32],
        map_offset: usize,
        m: Mask<E, N>,
    ) -> Result<()> {
        scatter(self, a, offset, index_map, map_offset, Some(&m), |e| e)
    }

    // --------------------------------------------------------------------------------------------
    // unsigned bit-pattern arrays
    // --------------------------------------------------------------------------------------------

    /// Loads lanes from same-width unsigned values, bit for bit.
    pub fn from_bits_array(species: Species<E, N>, a: &[E::Bits], offset: isize) -> Result<Self> {
        load(species, a, offset, None, E::from_bits)
    }

    pub fn from_bits_array_masked(
        species: Species<E, N>,
        a: &[E::Bits],
        offset: isize,
        m: Mask<E, N>,
    ) -> Result<Self> {
        load(species, a, offset, Some(&m), E::from_bits)
    }

    pub fn from_bits_array_indexed(
        species: Species<E, N>,
        a: &[E::Bits],
        offset: isize,
        index_map: &[i32],
        map_offset: usize,
    ) -> Result<Self> {
        gather(species, a, offset, index_map, map_offset, None, E::from_bits)
    }

    pub fn from_bits_array_indexed_masked(
        species: Species<E, N>,
        a: &[E::Bits],
        offset: isize,
        index_map: &[i32],
        map_offset: usize,
        m: Mask<E, N>,
    ) -> Result<Self> {
        gather(species, a, offset, index_map, map_offset, Some(&m), E::from_bits)
    }

    /// Stores the lanes' bit patterns as same-width unsigned values.
    pub fn into_bits_array(self, a: &mut [E::Bits], offset: isize) -> Result<()> {
        store(self, a, offset, None, E::to_bits)
    }

    pub fn into_bits_array_masked(
        self,
        a: &mut [E::Bits],
        offset: isize,
        m: Mask<E, N>,
    ) -> Result<()> {
        store(self, a, offset, Some(&m), E::to_bits)
    }

    pub fn into_bits_array_indexed(
        self,
        a: &mut [E::Bits],
        offset: isize,
        index_map: &[i32],
        map_offset: usize,
    ) -> Result<()> {
        scatter(self, a, offset, index_map, map_offset, None, E::to_bits)
    }

    pub fn into_bits_array_indexed_masked(
        self,
        a: &mut [E::Bits],
        offset: isize,
        index_map: &[i32],
        map_offset: usize,
        m: Mask<E, N>,
    ) -> Result<()> {
        scatter(self, a, offset, index_map, map_offset, Some(&m), E::to_bits)
    }

    // --------------------------------------------------------------------------------------------
    // byte slices
    // --------------------------------------------------------------------------------------------

    /// Loads `N` lanes from `bytes` starting at byte `offset`; lane `i`
    /// occupies bytes `offset + i * E::BYTES ..` in the given order.
    pub fn from_byte_slice(
        species: Species<E, N>,
        bytes: &[u8],
        offset: isize,
        order: ByteOrder,
    ) -> Result<Self> {
        load_bytes(species, bytes, offset, order, None)
    }

    pub fn from_byte_slice_masked(
        species: Species<E, N>,
        bytes: &[u8],
        offset: isize,
        order: ByteOrder,
        m: Mask<E, N>,
    ) -> Result<Self> {
        load_bytes(species, bytes, offset, order, Some(&m))
    }

    pub fn into_byte_slice(self, bytes: &mut [u8], offset: isize, order: ByteOrder) -> Result<()> {
        store_bytes(self, bytes, offset, order, None)
    }

    pub fn into_byte_slice_masked(
        self,
        bytes: &mut [u8],
        offset: isize,
        order: ByteOrder,
        m: Mask<E, N>,
    ) -> Result<()> {
        store_bytes(self, bytes, offset, order, Some(&m))
    }
}
