//! Lane-wise operators on 16-bit vectors checked against plain scalar code.
//!
//! Inputs are drawn from a seeded generator so failures reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdlane::simd::{
    BinaryOp, ComparisonOp, Mask, ShortSpecies128, ShortVector128, Species, TernaryOp, TestOp,
    UnaryOp, Vector, VectorShape,
};
use simdlane::VectorError;

const ROUNDS: usize = 200;

fn species() -> ShortSpecies128 {
    Species::of(VectorShape::S128).unwrap()
}

fn random_vector(rng: &mut StdRng) -> ShortVector128 {
    species().from_fn(|_| rng.random::<i16>())
}

fn random_mask(rng: &mut StdRng) -> Mask<i16, 8> {
    Mask::from_long(species(), rng.random::<u64>())
}

/// Reference results written with the primitive integer methods.
fn scalar_binary(op: BinaryOp, a: i16, b: i16) -> i16 {
    let n = (b & 15) as u32;
    match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => a.wrapping_div(b),
        BinaryOp::Min => a.min(b),
        BinaryOp::Max => a.max(b),
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::AndNot => a & !b,
        BinaryOp::FirstNonzero => {
            if a != 0 {
                a
            } else {
                b
            }
        }
        BinaryOp::Lshl => a.wrapping_shl(n),
        BinaryOp::Ashr => a >> n,
        BinaryOp::Lshr => ((a as u16) >> n) as i16,
        BinaryOp::Rol => a.rotate_left(n),
        BinaryOp::Ror => a.rotate_right(n),
        BinaryOp::UMin => (a as u16).min(b as u16) as i16,
        BinaryOp::UMax => (a as u16).max(b as u16) as i16,
        BinaryOp::SAdd => a.saturating_add(b),
        BinaryOp::SSub => a.saturating_sub(b),
        BinaryOp::SuAdd => (a as u16).saturating_add(b as u16) as i16,
        BinaryOp::SuSub => (a as u16).saturating_sub(b as u16) as i16,
        other => panic!("no scalar reference for {other}"),
    }
}

fn scalar_unary(op: UnaryOp, a: i16) -> i16 {
    match op {
        UnaryOp::Abs => a.wrapping_abs(),
        UnaryOp::Neg => a.wrapping_neg(),
        UnaryOp::Not => !a,
        UnaryOp::Zomo => {
            if a == 0 {
                0
            } else {
                -1
            }
        }
        UnaryOp::BitCount => a.count_ones() as i16,
        UnaryOp::TrailingZerosCount => a.trailing_zeros() as i16,
        UnaryOp::LeadingZerosCount => a.leading_zeros() as i16,
        UnaryOp::Reverse => a.reverse_bits(),
        UnaryOp::ReverseBytes => a.swap_bytes(),
        other => panic!("no scalar reference for {other}"),
    }
}

fn integral_binary_ops() -> impl Iterator<Item = BinaryOp> {
    BinaryOp::ALL.iter().copied().filter(|op| {
        !matches!(
            op,
            BinaryOp::CompressBits
                | BinaryOp::ExpandBits
                | BinaryOp::Atan2
                | BinaryOp::Pow
                | BinaryOp::Hypot
        )
    })
}

#[test]
fn test_binary_ops_match_scalar() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for op in integral_binary_ops() {
        for _ in 0..ROUNDS {
            let a = random_vector(&mut rng);
            let mut b = random_vector(&mut rng);
            if op == BinaryOp::Div {
                b = b.lanewise_scalar(BinaryOp::Or, 1).unwrap();
            }

            let r = a.lanewise(op, b).unwrap().to_array();
            let (xa, xb) = (a.to_array(), b.to_array());
            for i in 0..8 {
                assert_eq!(
                    r[i],
                    scalar_binary(op, xa[i], xb[i]),
                    "{op} lane {i}: {} vs {}",
                    xa[i],
                    xb[i]
                );
            }
        }
    }
}

#[test]
fn test_masked_binary_keeps_unset_lanes() {
    let mut rng = StdRng::seed_from_u64(17);

    for op in integral_binary_ops().filter(|&op| op != BinaryOp::Div) {
        let a = random_vector(&mut rng);
        let b = random_vector(&mut rng);
        let m = random_mask(&mut rng);

        let r = a.lanewise_masked(op, b, m).unwrap().to_array();
        let (xa, xb) = (a.to_array(), b.to_array());
        for i in 0..8 {
            let expected = if m.lane_is_set(i).unwrap() {
                scalar_binary(op, xa[i], xb[i])
            } else {
                xa[i]
            };
            assert_eq!(r[i], expected, "{op} lane {i}");
        }
    }
}

#[test]
fn test_unary_ops_match_scalar() {
    let mut rng = StdRng::seed_from_u64(99);
    let edge = species()
        .from_int_values(&[0, -1, 1, i16::MIN as i32, i16::MAX as i32, 0x0100, 0x00ff, 2])
        .unwrap();

    let ops = [
        UnaryOp::Abs,
        UnaryOp::Neg,
        UnaryOp::Not,
        UnaryOp::Zomo,
        UnaryOp::BitCount,
        UnaryOp::TrailingZerosCount,
        UnaryOp::LeadingZerosCount,
        UnaryOp::Reverse,
        UnaryOp::ReverseBytes,
    ];

    for op in ops {
        let inputs = std::iter::once(edge).chain((0..ROUNDS).map(|_| random_vector(&mut rng)));
        for v in inputs {
            let r = v.lanewise_unary(op).unwrap().to_array();
            for (i, &x) in v.to_array().iter().enumerate() {
                assert_eq!(r[i], scalar_unary(op, x), "{op} of {x}");
            }
        }
    }
}

#[test]
fn test_floating_point_ops_are_unsupported() {
    let v = species().iota();

    assert!(matches!(
        v.lanewise(BinaryOp::Pow, v),
        Err(VectorError::UnsupportedOperation { operation: "POW", .. })
    ));
    assert!(matches!(
        v.lanewise_unary(UnaryOp::Sqrt),
        Err(VectorError::UnsupportedOperation { .. })
    ));
    assert!(v.lanewise_ternary(TernaryOp::Fma, v, v).is_err());
    assert!(v.test(TestOp::IsNan).is_err());
}

#[test]
fn test_bit_compression_needs_wide_lanes() {
    let v = species().iota();
    assert!(v.lanewise(BinaryOp::CompressBits, v).is_err());

    let wide: Species<i32, 4> = Species::of(VectorShape::S128).unwrap();
    let a = wide.broadcast(0b1011_0110);
    let m = wide.broadcast(0b1111_0000);
    assert_eq!(
        a.lanewise(BinaryOp::CompressBits, m).unwrap().to_array(),
        [0b1011; 4]
    );
    assert_eq!(
        wide.broadcast(0b1011)
            .lanewise(BinaryOp::ExpandBits, m)
            .unwrap()
            .to_array(),
        [0b1011_0000; 4]
    );
}

#[test]
fn test_division_by_zero() {
    let a = species().broadcast(100);
    let b = species().from_int_values(&[1, 2, 3, 0, 5, 6, 0, 8]).unwrap();

    assert_eq!(
        a.lanewise(BinaryOp::Div, b),
        Err(VectorError::DivisionByZero { lane: 3 })
    );

    // zero divisors under unset lanes are ignored
    let m = Mask::from_long(species(), 0b1011_0111);
    let r = a.lanewise_masked(BinaryOp::Div, b, m).unwrap();
    assert_eq!(r.to_array(), [100, 50, 33, 100, 20, 16, 100, 12]);

    let m = Mask::from_long(species(), 0b0100_0000);
    assert_eq!(
        a.lanewise_masked(BinaryOp::Div, b, m),
        Err(VectorError::DivisionByZero { lane: 6 })
    );

    let min = species().broadcast(i16::MIN);
    assert_eq!(min.div(species().broadcast(-1)).unwrap().to_array(), [i16::MIN; 8]);
}

#[test]
fn test_long_operands() {
    let v = species().iota();

    assert_eq!(
        v.lanewise_long(BinaryOp::Add, 10).unwrap().to_array(),
        [10, 11, 12, 13, 14, 15, 16, 17]
    );
    assert!(matches!(
        v.lanewise_long(BinaryOp::Add, 40_000),
        Err(VectorError::ValueOutOfRange { value: 40_000, .. })
    ));

    // shift counts only need to fit an i32; they are reduced modulo 16
    let ones = species().broadcast(1);
    assert_eq!(ones.lanewise_long(BinaryOp::Lshl, 17).unwrap().to_array(), [2; 8]);
    assert_eq!(
        ones.lanewise_long(BinaryOp::Lshl, 65_539).unwrap().to_array(),
        [8; 8]
    );
    assert!(ones.lanewise_long(BinaryOp::Lshl, 1 << 40).is_err());
}

#[test]
fn test_bitwise_blend() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..ROUNDS {
        let a = random_vector(&mut rng);
        let b = random_vector(&mut rng);
        let c = random_vector(&mut rng);

        let r = a.lanewise_ternary(TernaryOp::BitwiseBlend, b, c).unwrap();
        let expected = a.bitwise_blend(b, c).unwrap();
        assert_eq!(r, expected);

        let (xa, xb, xc) = (a.to_array(), b.to_array(), c.to_array());
        for i in 0..8 {
            assert_eq!(r.to_array()[i], (xa[i] & !xc[i]) | (xb[i] & xc[i]));
        }
    }
}

#[test]
fn test_comparisons_match_scalar() {
    let mut rng = StdRng::seed_from_u64(41);

    for &op in ComparisonOp::ALL {
        for _ in 0..ROUNDS {
            let a = random_vector(&mut rng);
            let b = random_vector(&mut rng);
            let m = a.compare(op, b).unwrap();

            let (xa, xb) = (a.to_array(), b.to_array());
            for i in 0..8 {
                let (x, y) = (xa[i], xb[i]);
                let expected = match op {
                    ComparisonOp::Eq => x == y,
                    ComparisonOp::Ne => x != y,
                    ComparisonOp::Lt => x < y,
                    ComparisonOp::Le => x <= y,
                    ComparisonOp::Gt => x > y,
                    ComparisonOp::Ge => x >= y,
                    ComparisonOp::Ult => (x as u16) < (y as u16),
                    ComparisonOp::Ule => (x as u16) <= (y as u16),
                    ComparisonOp::Ugt => (x as u16) > (y as u16),
                    ComparisonOp::Uge => (x as u16) >= (y as u16),
                };
                assert_eq!(m.lane_is_set(i).unwrap(), expected, "{op} {x} {y}");
            }
        }
    }
}

#[test]
fn test_compare_long_range_checked() {
    let v = species().iota();
    let m = v.compare_long(ComparisonOp::Ge, 5).unwrap();
    assert_eq!(m.to_long(), 0b1110_0000);
    assert!(v.compare_long(ComparisonOp::Eq, i16::MAX as i64 + 1).is_err());
}

#[test]
fn test_predicates() {
    let v = species().from_int_values(&[0, -3, 4, 0, -1, 7, 0, -8]).unwrap();

    assert_eq!(v.test(TestOp::IsDefault).unwrap().to_long(), 0b0100_1001);
    assert_eq!(v.test(TestOp::IsNegative).unwrap().to_long(), 0b1001_0010);

    let m = Mask::from_long(species(), 0b0000_1111);
    assert_eq!(
        v.test_masked(TestOp::IsNegative, m).unwrap().to_long(),
        0b0000_0010
    );
}

#[test]
fn test_operator_overloads_follow_lanewise() {
    let mut rng = StdRng::seed_from_u64(8);
    let a: Vector<i16, 8> = random_vector(&mut rng);
    let b = random_vector(&mut rng);

    assert_eq!(a + b, a.lanewise(BinaryOp::Add, b).unwrap());
    assert_eq!(a - b, a.lanewise(BinaryOp::Sub, b).unwrap());
    assert_eq!(a * b, a.lanewise(BinaryOp::Mul, b).unwrap());
    assert_eq!(-a, a.lanewise_unary(UnaryOp::Neg).unwrap());
    assert_eq!(!a, a.lanewise_unary(UnaryOp::Not).unwrap());
}

#[test]
fn test_rotate_by_full_width_is_identity() {
    let x = species().broadcast(0x0001);
    assert_eq!(x.lanewise_scalar(BinaryOp::Rol, 1).unwrap().to_array(), [0x0002; 8]);
    assert_eq!(x.lanewise_scalar(BinaryOp::Rol, 16).unwrap(), x);
    assert_eq!(x.lanewise_scalar(BinaryOp::Ror, 1).unwrap().to_array(), [i16::MIN; 8]);
}

#[test]
fn test_shift_counts_are_masked() {
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..ROUNDS {
        let v = random_vector(&mut rng);
        let e = rng.random::<i16>();
        for op in [BinaryOp::Lshl, BinaryOp::Ashr, BinaryOp::Lshr] {
            assert_eq!(
                v.lanewise_scalar(op, e).unwrap(),
                v.lanewise_scalar(op, e & 15).unwrap()
            );
        }
    }
}

#[test]
fn test_unsigned_compare_reinterprets_bits() {
    let all_ones = species().broadcast(-1);
    assert!(all_ones.compare_scalar(ComparisonOp::Ugt, 1).all_true());
    assert!(!all_ones.compare_scalar(ComparisonOp::Gt, 1).any_true());
}

#[test]
fn test_blend_laws_and_round_trip() {
    let mut rng = StdRng::seed_from_u64(78);
    for _ in 0..ROUNDS {
        let v = random_vector(&mut rng);
        let w = random_vector(&mut rng);
        let m = random_mask(&mut rng);

        assert_eq!(v.blend(v, m).unwrap(), v);
        assert_eq!(v.blend(w, species().mask_all(false)).unwrap(), v);
        assert_eq!(v.blend(w, species().mask_all(true)).unwrap(), w);
        assert_eq!(Vector::from_array(species(), &v.to_array(), 0).unwrap(), v);

        let sum = v.add_masked(w, m).unwrap().to_array();
        for i in 0..8 {
            let expected = if m.lane_is_set(i).unwrap() {
                v.to_array()[i].wrapping_add(w.to_array()[i])
            } else {
                v.to_array()[i]
            };
            assert_eq!(sum[i], expected);
        }
    }

    let zero = species().zero();
    assert!(division_fails(zero));
    assert!(species()
        .iota()
        .div_masked(zero, species().mask_all(false))
        .is_ok());
}

fn division_fails(divisor: ShortVector128) -> bool {
    matches!(
        species().iota().div(divisor),
        Err(VectorError::DivisionByZero { lane: 0 })
    )
}
