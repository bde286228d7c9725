//! Lane reductions checked against sequential folds over the lane values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdlane::simd::vector::reduce::identity;
use simdlane::simd::{AssociativeOp, Mask, ShortSpecies128, ShortVector128, Species, VectorShape};

fn species() -> ShortSpecies128 {
    Species::of(VectorShape::S128).unwrap()
}

fn random_vector(rng: &mut StdRng) -> ShortVector128 {
    // keep a fair share of zero lanes around for FIRST_NONZERO
    species().from_fn(|_| {
        if rng.random_bool(0.3) {
            0
        } else {
            rng.random::<i16>()
        }
    })
}

fn scalar_fold(op: AssociativeOp, lanes: impl Iterator<Item = i16>) -> i16 {
    let mut acc = identity::<i16>(op);
    for x in lanes {
        acc = match op {
            AssociativeOp::Add => acc.wrapping_add(x),
            AssociativeOp::Mul => acc.wrapping_mul(x),
            AssociativeOp::Min => acc.min(x),
            AssociativeOp::Max => acc.max(x),
            AssociativeOp::And => acc & x,
            AssociativeOp::Or => acc | x,
            AssociativeOp::Xor => acc ^ x,
            AssociativeOp::UMin => (acc as u16).min(x as u16) as i16,
            AssociativeOp::UMax => (acc as u16).max(x as u16) as i16,
            AssociativeOp::SuAdd => (acc as u16).saturating_add(x as u16) as i16,
            AssociativeOp::FirstNonzero => {
                if acc != 0 {
                    acc
                } else {
                    x
                }
            }
        };
    }
    acc
}

#[test]
fn test_identities() {
    assert_eq!(identity::<i16>(AssociativeOp::Add), 0);
    assert_eq!(identity::<i16>(AssociativeOp::Mul), 1);
    assert_eq!(identity::<i16>(AssociativeOp::Min), i16::MAX);
    assert_eq!(identity::<i16>(AssociativeOp::Max), i16::MIN);
    assert_eq!(identity::<i16>(AssociativeOp::And), -1);
    assert_eq!(identity::<i16>(AssociativeOp::UMin), -1);
    assert_eq!(identity::<i16>(AssociativeOp::UMax), 0);
    assert_eq!(identity::<i16>(AssociativeOp::FirstNonzero), 0);
}

#[test]
fn test_reductions_match_sequential_fold() {
    let mut rng = StdRng::seed_from_u64(11);

    for &op in AssociativeOp::ALL {
        for _ in 0..200 {
            let v = random_vector(&mut rng);
            let expected = scalar_fold(op, v.to_array().into_iter());
            assert_eq!(v.reduce_lanes(op), expected, "{op} over {v}");
            assert_eq!(v.reduce_lanes_to_long(op), expected as i64);
        }
    }
}

#[test]
fn test_masked_reductions_skip_unset_lanes() {
    let mut rng = StdRng::seed_from_u64(12);

    for &op in AssociativeOp::ALL {
        for _ in 0..200 {
            let v = random_vector(&mut rng);
            let m = Mask::from_long(species(), rng.random::<u64>());
            let lanes = v.to_array();
            let expected = scalar_fold(
                op,
                (0..8).filter(|&i| m.lane_is_set(i).unwrap()).map(|i| lanes[i]),
            );
            assert_eq!(v.reduce_lanes_masked(op, m).unwrap(), expected, "{op}");
        }
    }
}

#[test]
fn test_empty_mask_yields_identity() {
    let v = species().broadcast(42);
    let none = species().mask_all(false);

    for &op in AssociativeOp::ALL {
        assert_eq!(v.reduce_lanes_masked(op, none).unwrap(), identity::<i16>(op));
        assert_eq!(
            v.reduce_lanes_to_long_masked(op, none).unwrap(),
            identity::<i16>(op) as i64
        );
    }
}

#[test]
fn test_first_nonzero_keeps_lane_order() {
    let v = species().from_int_values(&[0, 0, -5, 9, 0, 3, 0, 0]).unwrap();
    assert_eq!(v.reduce_lanes(AssociativeOp::FirstNonzero), -5);

    let m = Mask::from_long(species(), 0b1111_1000);
    assert_eq!(v.reduce_lanes_masked(AssociativeOp::FirstNonzero, m).unwrap(), 9);

    assert_eq!(species().zero().reduce_lanes(AssociativeOp::FirstNonzero), 0);
}

#[test]
fn test_unsigned_reductions() {
    let v = species().from_int_values(&[5, -1, 300, 2, -32768, 7, 8, 9]).unwrap();
    assert_eq!(v.reduce_lanes(AssociativeOp::UMin), 2);
    assert_eq!(v.reduce_lanes(AssociativeOp::UMax), -1);
    assert_eq!(v.reduce_lanes(AssociativeOp::SuAdd), -1);
    assert_eq!(v.reduce_lanes(AssociativeOp::Min), i16::MIN);
}
