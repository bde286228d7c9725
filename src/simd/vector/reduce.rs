//! Cross-lane reductions.

use crate::error::Result;
use crate::simd::lane::Lane;
use crate::simd::mask::Mask;
use crate::simd::operators::{AssociativeOp, BinaryOp};
use crate::simd::vector::lanewise::binary_lane_fn;
use crate::simd::vector::Vector;

/// The value `x` with `op(identity, x) == x` for every lane value `x`.
///
/// This is also the result of reducing an empty set of lanes.
pub fn identity<E: Lane>(op: AssociativeOp) -> E {
    match op {
        AssociativeOp::Add
        | AssociativeOp::Or
        | AssociativeOp::Xor
        | AssociativeOp::SuAdd
        | AssociativeOp::FirstNonzero
        | AssociativeOp::UMax => E::zero(),
        AssociativeOp::Mul => E::one(),
        AssociativeOp::And | AssociativeOp::UMin => !E::zero(),
        AssociativeOp::Min => E::max_value(),
        AssociativeOp::Max => E::min_value(),
    }
}

impl<E: Lane, const N: usize> Vector<E, N> {
    fn fold_lanes(self, op: AssociativeOp, keep: impl Fn(usize) -> bool) -> Result<E> {
        let f = binary_lane_fn::<E>(BinaryOp::from(op))?;
        Ok(self
            .lanes()
            .iter()
            .enumerate()
            .filter(|&(i, _)| keep(i))
            .fold(identity::<E>(op), |acc, (_, &lane)| f(acc, lane)))
    }

    /// Folds every lane with `op`.
    ///
    /// Arithmetic wraps. [`AssociativeOp::FirstNonzero`] yields the lowest
    /// indexed nonzero lane, or zero when every lane is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use simdlane::simd::{AssociativeOp, Species, VectorShape};
    ///
    /// let species = Species::<i16, 4>::of(VectorShape::S64).unwrap();
    /// let v = species.from_int_values(&[1, 2, 3, 4]).unwrap();
    /// assert_eq!(v.reduce_lanes(AssociativeOp::Add), 10);
    /// ```
    pub fn reduce_lanes(self, op: AssociativeOp) -> E {
        // every associative operator has a lane function for every lane type
        self.fold_lanes(op, |_| true)
            .unwrap_or_else(|_| identity::<E>(op))
    }

    /// Folds the set lanes with `op`; returns the identity of `op` when no
    /// lane is set.
    pub fn reduce_lanes_masked(self, op: AssociativeOp, m: Mask<E, N>) -> Result<E> {
        self.species().check(&m.species())?;
        self.fold_lanes(op, |i| m.test(i))
    }

    /// [`reduce_lanes`](Self::reduce_lanes) widened to `i64`.
    pub fn reduce_lanes_to_long(self, op: AssociativeOp) -> i64 {
        self.reduce_lanes(op).widen()
    }

    pub fn reduce_lanes_to_long_masked(self, op: AssociativeOp, m: Mask<E, N>) -> Result<i64> {
        Ok(self.reduce_lanes_masked(op, m)?.widen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::shape::VectorShape;
    use crate::simd::species::Species;

    fn species() -> Species<i16, 4> {
        Species::of(VectorShape::S64).unwrap()
    }

    fn vector(lanes: [i16; 4]) -> Vector<i16, 4> {
        Vector::from_lanes(species(), lanes)
    }

    mod unmasked_tests {
        use super::*;

        #[test]
        fn test_arithmetic_reductions() {
            let v = vector([1, 2, 3, 4]);
            assert_eq!(v.reduce_lanes(AssociativeOp::Add), 10);
            assert_eq!(v.reduce_lanes(AssociativeOp::Mul), 24);
            assert_eq!(v.reduce_lanes(AssociativeOp::Min), 1);
            assert_eq!(v.reduce_lanes(AssociativeOp::Max), 4);
        }

        #[test]
        fn test_add_wraps() {
            let v = vector([i16::MAX, 1, 0, 0]);
            assert_eq!(v.reduce_lanes(AssociativeOp::Add), i16::MIN);
            assert_eq!(v.reduce_lanes_to_long(AssociativeOp::Add), -32_768);
        }

        #[test]
        fn test_saturating_unsigned_add() {
            let v = vector([-2, 1, 1, 5]);
            assert_eq!(v.reduce_lanes(AssociativeOp::SuAdd), -1);
        }

        #[test]
        fn test_bitwise_reductions() {
            let v = vector([0b0111, 0b0110, 0b1110, 0b0110]);
            assert_eq!(v.reduce_lanes(AssociativeOp::And), 0b0110);
            assert_eq!(v.reduce_lanes(AssociativeOp::Or), 0b1111);
            assert_eq!(v.reduce_lanes(AssociativeOp::Xor), 0b1001);
        }

        #[test]
        fn test_unsigned_min_max() {
            let v = vector([-1, 3, 7, 2]);
            assert_eq!(v.reduce_lanes(AssociativeOp::UMin), 2);
            assert_eq!(v.reduce_lanes(AssociativeOp::UMax), -1);
        }

        #[test]
        fn test_first_nonzero() {
            assert_eq!(vector([0, 0, 5, 7]).reduce_lanes(AssociativeOp::FirstNonzero), 5);
            assert_eq!(vector([0; 4]).reduce_lanes(AssociativeOp::FirstNonzero), 0);
        }
    }

    mod masked_tests {
        use super::*;

        #[test]
        fn test_masked_folds_only_set_lanes() {
            let v = vector([1, 2, 3, 4]);
            let m = Mask::from_long(species(), 0b1010);
            assert_eq!(v.reduce_lanes_masked(AssociativeOp::Add, m).unwrap(), 6);
            assert_eq!(v.reduce_lanes_masked(AssociativeOp::Min, m).unwrap(), 2);
            assert_eq!(
                v.reduce_lanes_to_long_masked(AssociativeOp::Mul, m).unwrap(),
                8
            );
        }

        #[test]
        fn test_empty_mask_yields_identity() {
            let v = vector([1, 2, 3, 4]);
            let none = species().mask_all(false);
            let cases = [
                (AssociativeOp::Add, 0),
                (AssociativeOp::Mul, 1),
                (AssociativeOp::Min, i16::MAX),
                (AssociativeOp::Max, i16::MIN),
                (AssociativeOp::And, -1),
                (AssociativeOp::Or, 0),
                (AssociativeOp::Xor, 0),
                (AssociativeOp::UMin, -1),
                (AssociativeOp::UMax, 0),
                (AssociativeOp::FirstNonzero, 0),
            ];
            for (op, expected) in cases {
                assert_eq!(v.reduce_lanes_masked(op, none).unwrap(), expected, "{op}");
            }
        }

        #[test]
        fn test_masked_first_nonzero_skips_unset_lanes() {
            let v = vector([0, 9, 4, 0]);
            let m = Mask::from_long(species(), 0b0101);
            assert_eq!(
                v.reduce_lanes_masked(AssociativeOp::FirstNonzero, m).unwrap(),
                4
            );
        }

        #[test]
        fn test_identity_is_neutral() {
            let v = vector([-7, 300, 12, -32_000]);
            for &op in AssociativeOp::ALL {
                let all = species().mask_all(true);
                assert_eq!(
                    v.reduce_lanes_masked(op, all).unwrap(),
                    v.reduce_lanes(op),
                    "{op}"
                );
            }
        }
    }
}
