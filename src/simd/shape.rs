//! Vector shapes: the fixed set of total bit widths a vector may have.

use std::fmt::{self, Display};

use crate::simd::lane::LaneType;
use crate::MAX_VECTOR_BITS;

/// Total bit width of a vector.
///
/// `Max` resolves at build time to the widest register of the detected
/// instruction set, so it may share a bit width with one of the fixed shapes
/// while remaining a distinct shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VectorShape {
    S64,
    S128,
    S256,
    S512,
    Max,
}

impl VectorShape {
    /// All shapes, in registry order.
    pub const ALL: [VectorShape; 5] = [
        VectorShape::S64,
        VectorShape::S128,
        VectorShape::S256,
        VectorShape::S512,
        VectorShape::Max,
    ];

    /// Total number of bits in a vector of this shape.
    pub const fn vector_bits(self) -> usize {
        match self {
            VectorShape::S64 => 64,
            VectorShape::S128 => 128,
            VectorShape::S256 => 256,
            VectorShape::S512 => 512,
            VectorShape::Max => MAX_VECTOR_BITS,
        }
    }

    pub const fn vector_bytes(self) -> usize {
        self.vector_bits() / 8
    }

    /// Number of lanes of `lane_type` in a vector of this shape.
    pub const fn lane_count(self, lane_type: LaneType) -> usize {
        self.vector_bits() / lane_type.bits()
    }

    /// Fixed shape with exactly `bits` bits, if any.
    pub fn for_bits(bits: usize) -> Option<VectorShape> {
        match bits {
            64 => Some(VectorShape::S64),
            128 => Some(VectorShape::S128),
            256 => Some(VectorShape::S256),
            512 => Some(VectorShape::S512),
            _ => None,
        }
    }

    /// The shape best suited to the current platform.
    pub const fn preferred() -> VectorShape {
        VectorShape::Max
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            VectorShape::S64 => 0,
            VectorShape::S128 => 1,
            VectorShape::S256 => 2,
            VectorShape::S512 => 3,
            VectorShape::Max => 4,
        }
    }
}

impl Display for VectorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorShape::Max => write!(f, "S_Max_BIT"),
            shape => write!(f, "S_{}_BIT", shape.vector_bits()),
        }
    }
}
