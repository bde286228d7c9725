//! Operator registry.
//!
//! Operations are closed enumerations grouped by arity. Each operator has a
//! stable integer opcode and a set of kind flags; vector code only consults
//! the flags to decide whether an operator applies to a lane type at all.

use std::fmt::{self, Display};

use crate::error::{unsupported, Result};
use crate::simd::lane::Lane;

/// Operator kind flags.
pub mod flags {
    /// The second operand is a shift count, masked to the lane width.
    pub const SHIFT: u32 = 1 << 0;
    /// Derived from other operators rather than a single lane instruction.
    pub const SPECIAL: u32 = 1 << 1;
    /// Only defined for floating-point lanes.
    pub const ONLY_FP: u32 = 1 << 2;
    /// Only defined for 32-bit and 64-bit lanes.
    pub const ONLY_WIDE: u32 = 1 << 3;
    /// Compares or combines the unsigned bit patterns of the lanes.
    pub const UNSIGNED: u32 = 1 << 4;
    /// Saturates instead of wrapping.
    pub const SATURATING: u32 = 1 << 5;
}

use flags::*;

/// Common surface of every operator enumeration.
pub trait Operator: Copy + Display {
    /// Number of vector operands taken by operators of this family.
    const ARITY: usize;

    fn name(self) -> &'static str;

    fn opcode(self) -> u32;

    fn flags(self) -> u32;

    #[inline]
    fn has_flag(self, flag: u32) -> bool {
        self.flags() & flag != 0
    }

    /// Fails with an unsupported-operation error when the operator is not
    /// defined for lanes of type `E`.
    fn check_supported<E: Lane>(self) -> Result<()> {
        if self.has_flag(ONLY_FP) || (self.has_flag(ONLY_WIDE) && E::BITS < 32) {
            return Err(unsupported(self.name(), E::LANE_TYPE.name()));
        }
        Ok(())
    }
}

macro_rules! operator_enum {
    (
        $(#[$meta:meta])*
        $name:ident, arity = $arity:expr,
        { $($(#[$vmeta:meta])* $variant:ident => ($label:expr, $opcode:expr, $flags:expr)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every operator of this family.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Looks an operator up by opcode.
            pub fn from_opcode(opcode: u32) -> Option<$name> {
                $name::ALL.iter().copied().find(|op| op.opcode() == opcode)
            }
        }

        impl Operator for $name {
            const ARITY: usize = $arity;

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn opcode(self) -> u32 {
                match self {
                    $($name::$variant => $opcode),+
                }
            }

            fn flags(self) -> u32 {
                match self {
                    $($name::$variant => $flags),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

operator_enum! {
    /// Lane-wise operators taking one vector.
    UnaryOp, arity = 1, {
        Abs => ("ABS", 0, 0),
        Neg => ("NEG", 1, 0),
        Sqrt => ("SQRT", 2, ONLY_FP),
        BitCount => ("BIT_COUNT", 3, 0),
        TrailingZerosCount => ("TRAILING_ZEROS_COUNT", 29, 0),
        LeadingZerosCount => ("LEADING_ZEROS_COUNT", 30, 0),
        Reverse => ("REVERSE", 31, 0),
        ReverseBytes => ("REVERSE_BYTES", 32, 0),
        /// Bitwise complement, `a ^ -1`.
        Not => ("NOT", 64, SPECIAL),
        /// Zero maps to zero, anything else to minus one.
        Zomo => ("ZOMO", 65, SPECIAL),
        Sin => ("SIN", 101, ONLY_FP),
        Cos => ("COS", 102, ONLY_FP),
        Exp => ("EXP", 106, ONLY_FP),
        Log => ("LOG", 107, ONLY_FP),
    }
}

operator_enum! {
    /// Lane-wise operators taking two vectors.
    BinaryOp, arity = 2, {
        Add => ("ADD", 4, 0),
        Sub => ("SUB", 5, 0),
        Mul => ("MUL", 6, 0),
        Div => ("DIV", 7, 0),
        Min => ("MIN", 8, 0),
        Max => ("MAX", 9, 0),
        And => ("AND", 10, 0),
        Or => ("OR", 11, 0),
        Xor => ("XOR", 12, 0),
        Lshl => ("LSHL", 14, SHIFT),
        Ashr => ("ASHR", 15, SHIFT),
        Lshr => ("LSHR", 16, SHIFT),
        Rol => ("ROL", 24, SHIFT),
        Ror => ("ROR", 25, SHIFT),
        CompressBits => ("COMPRESS_BITS", 33, ONLY_WIDE),
        ExpandBits => ("EXPAND_BITS", 34, ONLY_WIDE),
        UMin => ("UMIN", 40, UNSIGNED),
        UMax => ("UMAX", 41, UNSIGNED),
        SAdd => ("SADD", 42, SATURATING),
        SSub => ("SSUB", 43, SATURATING),
        SuAdd => ("SUADD", 44, SATURATING | UNSIGNED),
        SuSub => ("SUSUB", 45, SATURATING | UNSIGNED),
        /// `a & !b`.
        AndNot => ("AND_NOT", 66, SPECIAL),
        /// `a` unless it is zero, then `b`.
        FirstNonzero => ("FIRST_NONZERO", 67, SPECIAL),
        Atan2 => ("ATAN2", 111, ONLY_FP),
        Pow => ("POW", 112, ONLY_FP),
        Hypot => ("HYPOT", 113, ONLY_FP),
    }
}

operator_enum! {
    /// Lane-wise operators taking three vectors.
    TernaryOp, arity = 3, {
        /// `a ^ ((a ^ b) & c)`: bits of `b` where `c` is set, else bits of `a`.
        BitwiseBlend => ("BITWISE_BLEND", 68, SPECIAL),
        Fma => ("FMA", 13, ONLY_FP),
    }
}

operator_enum! {
    /// Operators usable to fold all lanes of a vector into one scalar.
    AssociativeOp, arity = 2, {
        Add => ("ADD", 4, 0),
        Mul => ("MUL", 6, 0),
        Min => ("MIN", 8, 0),
        Max => ("MAX", 9, 0),
        And => ("AND", 10, 0),
        Or => ("OR", 11, 0),
        Xor => ("XOR", 12, 0),
        UMin => ("UMIN", 40, UNSIGNED),
        UMax => ("UMAX", 41, UNSIGNED),
        SuAdd => ("SUADD", 44, SATURATING | UNSIGNED),
        /// Not reorderable: the lowest-indexed nonzero lane wins.
        FirstNonzero => ("FIRST_NONZERO", 67, SPECIAL),
    }
}

operator_enum! {
    /// Lane-wise comparisons producing a mask.
    ComparisonOp, arity = 2, {
        Eq => ("EQ", 0, 0),
        Ne => ("NE", 4, 0),
        Lt => ("LT", 1, 0),
        Le => ("LE", 2, 0),
        Gt => ("GT", 5, 0),
        Ge => ("GE", 6, 0),
        Ult => ("ULT", 9, UNSIGNED),
        Ule => ("ULE", 10, UNSIGNED),
        Ugt => ("UGT", 13, UNSIGNED),
        Uge => ("UGE", 14, UNSIGNED),
    }
}

operator_enum! {
    /// Lane-wise predicates producing a mask.
    TestOp, arity = 1, {
        IsDefault => ("IS_DEFAULT", 0, SPECIAL),
        IsNegative => ("IS_NEGATIVE", 1, SPECIAL),
        IsFinite => ("IS_FINITE", 2, ONLY_FP),
        IsNan => ("IS_NAN", 3, ONLY_FP),
        IsInfinite => ("IS_INFINITE", 4, ONLY_FP),
    }
}

impl From<AssociativeOp> for BinaryOp {
    fn from(op: AssociativeOp) -> BinaryOp {
        match op {
            AssociativeOp::Add => BinaryOp::Add,
            AssociativeOp::Mul => BinaryOp::Mul,
            AssociativeOp::Min => BinaryOp::Min,
            AssociativeOp::Max => BinaryOp::Max,
            AssociativeOp::And => BinaryOp::And,
            AssociativeOp::Or => BinaryOp::Or,
            AssociativeOp::Xor => BinaryOp::Xor,
            AssociativeOp::UMin => BinaryOp::UMin,
            AssociativeOp::UMax => BinaryOp::UMax,
            AssociativeOp::SuAdd => BinaryOp::SuAdd,
            AssociativeOp::FirstNonzero => BinaryOp::FirstNonzero,
        }
    }
}
