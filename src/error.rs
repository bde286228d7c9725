//! Error types for simdlane operations.
//!
//! Every fallible vector, mask, shuffle and memory operation reports its
//! failure through [`VectorError`] instead of panicking, so callers can
//! decide how to react to a bad index or an unsupported opcode.

use thiserror::Error;

/// Errors that can occur during simdlane operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    /// An array, memory or lane index fell outside its valid range.
    #[error("Index out of bounds: {message} (index {index}, length {length})")]
    IndexOutOfBounds {
        /// The offending index (for range checks, the first index touched).
        index: i64,
        /// The length of the indexed region.
        length: i64,
        /// Human-readable error message.
        message: String,
    },
    /// A scalar cannot be represented exactly by the lane element type.
    #[error("Value out of range: {value} cannot be represented as {lane_type}")]
    ValueOutOfRange {
        /// The value that failed to convert.
        value: i64,
        /// Name of the lane element type.
        lane_type: &'static str,
    },
    /// Integer division by zero in an active lane.
    #[error("Division by zero in lane {lane}")]
    DivisionByZero {
        /// The first active lane holding a zero divisor.
        lane: usize,
    },
    /// Operands belong to incompatible species.
    #[error("Species mismatch: expected {expected}, found {found}")]
    SpeciesMismatch {
        /// The species of the receiver.
        expected: String,
        /// The species of the offending operand.
        found: String,
    },
    /// The operation is not defined for this lane type.
    #[error("Unsupported operation: {operation} on {lane_type} lanes")]
    UnsupportedOperation {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Name of the lane element type.
        lane_type: &'static str,
    },
    /// A memory segment was used outside of its validity scope.
    #[error("Lifecycle error: {message}")]
    Lifecycle {
        /// Human-readable error message.
        message: String,
    },
}

/// Result type alias for simdlane operations.
pub type Result<T> = std::result::Result<T, VectorError>;

/// Creates a bounds error.
pub fn bounds_error(index: i64, length: i64, message: impl Into<String>) -> VectorError {
    VectorError::IndexOutOfBounds {
        index,
        length,
        message: message.into(),
    }
}

/// Creates a value range error.
pub fn range_error(value: i64, lane_type: &'static str) -> VectorError {
    VectorError::ValueOutOfRange { value, lane_type }
}

/// Creates a division by zero error.
pub fn div_zero_error(lane: usize) -> VectorError {
    VectorError::DivisionByZero { lane }
}

/// Creates a species mismatch error.
pub fn species_mismatch(expected: impl ToString, found: impl ToString) -> VectorError {
    VectorError::SpeciesMismatch {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Creates an unsupported operation error.
pub fn unsupported(operation: &'static str, lane_type: &'static str) -> VectorError {
    VectorError::UnsupportedOperation {
        operation,
        lane_type,
    }
}

/// Creates a lifecycle error.
pub fn lifecycle_error(message: impl Into<String>) -> VectorError {
    VectorError::Lifecycle {
        message: message.into(),
    }
}
