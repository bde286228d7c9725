//! Cross-lane movement on random 16-bit vectors: shuffles, slices,
//! compress/expand and index selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdlane::simd::{BinaryOp, Mask, ShortSpecies128, ShortVector128, Shuffle, Species, VectorShape};
use simdlane::VectorError;

const N: usize = 8;

fn species() -> ShortSpecies128 {
    Species::of(VectorShape::S128).unwrap()
}

fn random_vector(rng: &mut StdRng) -> ShortVector128 {
    species().from_fn(|_| rng.random::<i16>())
}

fn random_mask(rng: &mut StdRng) -> Mask<i16, N> {
    Mask::from_long(species(), rng.random::<u64>())
}

fn random_shuffle(rng: &mut StdRng) -> Shuffle<i16, N> {
    let raw: Vec<i32> = (0..N).map(|_| rng.random_range(-20..20)).collect();
    Shuffle::from_values(species(), &raw).unwrap()
}

#[test]
fn test_rearrange_matches_wrapped_indices() {
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..100 {
        let v = random_vector(&mut rng);
        let s = random_shuffle(&mut rng);
        let r = v.rearrange(s).unwrap().to_array();
        let lanes = v.to_array();

        for i in 0..N {
            let source = (s.lane_source(i).unwrap() as i64).rem_euclid(N as i64) as usize;
            assert_eq!(r[i], lanes[source]);
        }
    }
}

#[test]
fn test_partial_wrapping_of_shuffle_indices() {
    let s = Shuffle::from_values(species(), &[0, 7, 8, -1, 15, -9, 3, 16]).unwrap();
    assert_eq!(s.to_array(), [0, 7, -8, -1, -1, -1, 3, -8]);
    assert_eq!(s.lane_is_valid().to_long(), 0b0100_0011);
    assert_eq!(s.wrap_indexes().to_array(), [0, 7, 0, 7, 7, 7, 3, 0]);
    assert!(matches!(
        s.check_indexes(),
        Err(VectorError::IndexOutOfBounds { .. })
    ));
    assert!(s.wrap_indexes().check_indexes().is_ok());
}

#[test]
fn test_masked_rearrange_zeroes_unset_lanes() {
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..100 {
        let v = random_vector(&mut rng);
        let s = random_shuffle(&mut rng);
        let m = random_mask(&mut rng);

        let full = v.rearrange(s).unwrap().to_array();
        let r = v.rearrange_masked(s, m).unwrap().to_array();
        for i in 0..N {
            let expected = if m.lane_is_set(i).unwrap() { full[i] } else { 0 };
            assert_eq!(r[i], expected);
        }
    }
}

#[test]
fn test_rearrange_two_splits_on_validity() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..100 {
        let a = random_vector(&mut rng);
        let b = random_vector(&mut rng);
        let s = random_shuffle(&mut rng);

        let r = a.rearrange_two(s, b).unwrap().to_array();
        let (xa, xb) = (a.to_array(), b.to_array());
        for i in 0..N {
            let index = s.lane_source(i).unwrap();
            let expected = if index >= 0 {
                xa[index as usize]
            } else {
                xb[(index + N as i32) as usize]
            };
            assert_eq!(r[i], expected);
        }
    }
}

#[test]
fn test_shuffle_composition() {
    let mut rng = StdRng::seed_from_u64(4);

    for _ in 0..50 {
        let v = random_vector(&mut rng);
        let s1 = random_shuffle(&mut rng).wrap_indexes();
        let s2 = random_shuffle(&mut rng).wrap_indexes();

        let twice = v.rearrange(s1).unwrap().rearrange(s2).unwrap();
        let composed = v.rearrange(s1.rearrange(&s2).unwrap()).unwrap();
        assert_eq!(twice, composed);
    }
}

#[test]
fn test_slice_and_unslice_are_inverse() {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..50 {
        let a = random_vector(&mut rng);
        let b = random_vector(&mut rng);

        for origin in 0..=N {
            let window = a.slice_with(origin, b).unwrap();
            let lanes = window.to_array();
            for i in 0..N {
                let expected = if i + origin < N {
                    a.to_array()[i + origin]
                } else {
                    b.to_array()[i + origin - N]
                };
                assert_eq!(lanes[i], expected, "origin {origin} lane {i}");
            }

            assert_eq!(window.unslice_into(origin, a, 0).unwrap(), a);
            assert_eq!(window.unslice_into(origin, b, 1).unwrap(), b);
        }
    }
}

#[test]
fn test_slice_against_zero() {
    let v = species().iota();

    assert_eq!(v.slice(3).unwrap().to_array(), [3, 4, 5, 6, 7, 0, 0, 0]);
    assert_eq!(v.unslice(3).unwrap().to_array(), [0, 0, 0, 0, 1, 2, 3, 4]);
    assert_eq!(v.slice(0).unwrap(), v);
    assert_eq!(v.slice(N).unwrap(), species().zero());
}

#[test]
fn test_slice_argument_checks() {
    let v = species().iota();

    assert!(matches!(
        v.slice(N + 1),
        Err(VectorError::IndexOutOfBounds { .. })
    ));
    assert!(v.unslice(9).is_err());
    assert!(matches!(
        v.unslice_into(2, v, 2),
        Err(VectorError::IndexOutOfBounds { index: 2, .. })
    ));
}

#[test]
fn test_masked_slices() {
    let a = species().iota();
    let b = species().broadcast(100);
    let m = Mask::from_long(species(), 0b1010_1010);

    let r = a.slice_with_masked(2, b, m).unwrap();
    assert_eq!(r.to_array(), [0, 3, 0, 5, 0, 7, 0, 100]);

    // unset lanes leave the destination untouched
    let w = species().broadcast(-1);
    let r = a.unslice_into_masked(0, w, 0, m).unwrap();
    assert_eq!(r.to_array(), [-1, 1, -1, 3, -1, 5, -1, 7]);
}

#[test]
fn test_compress_then_expand() {
    let mut rng = StdRng::seed_from_u64(6);

    for _ in 0..100 {
        let v = random_vector(&mut rng);
        let m = random_mask(&mut rng);

        let packed = v.compress(m).unwrap();
        let kept: Vec<i16> = (0..N)
            .filter(|&i| m.lane_is_set(i).unwrap())
            .map(|i| v.to_array()[i])
            .collect();
        assert_eq!(&packed.to_array()[..kept.len()], kept.as_slice());
        assert!(packed.to_array()[kept.len()..].iter().all(|&x| x == 0));

        let restored = packed.expand(m).unwrap();
        assert_eq!(restored, species().zero().blend(v, m).unwrap());
    }
}

#[test]
fn test_select_from_uses_receiver_as_indices() {
    let table = species().from_int_values(&[10, 11, 12, 13, 14, 15, 16, 17]).unwrap();
    let indices = species().from_int_values(&[7, 0, 9, -1, 3, 3, 16, 5]).unwrap();

    assert_eq!(
        indices.select_from(table).unwrap().to_array(),
        [17, 10, 11, 17, 13, 13, 10, 15]
    );

    let m = Mask::from_long(species(), 0b0000_1111);
    assert_eq!(
        indices.select_from_masked(table, m).unwrap().to_array(),
        [17, 10, 11, 17, 0, 0, 0, 0]
    );
}

#[test]
fn test_select_from_two_wraps_over_both_tables() {
    let mut rng = StdRng::seed_from_u64(7);
    let low = species().iota();
    let high = low.lanewise_scalar(BinaryOp::Add, N as i16).unwrap();

    for _ in 0..100 {
        let indices = species().from_fn(|_| rng.random_range(-40..40));
        let r = indices.select_from_two(low, high).unwrap().to_array();
        for (i, &index) in indices.to_array().iter().enumerate() {
            assert_eq!(r[i] as i64, (index as i64).rem_euclid(2 * N as i64));
        }
    }
}

#[test]
fn test_add_index() {
    let v = species().broadcast(1);
    assert_eq!(
        v.add_index(3).unwrap().to_array(),
        [1, 4, 7, 10, 13, 16, 19, 22]
    );
    assert!(matches!(
        v.add_index(5000),
        Err(VectorError::ValueOutOfRange { .. })
    ));
}
