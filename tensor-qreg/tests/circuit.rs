use num_complex::Complex64 as C64;
use rand::{ SeedableRng, rngs::StdRng };
use tensor_qreg::{
    circuit::{
        apply_qft,
        apply_random_circuit,
        layer_sequence,
        random_layers,
        staged_overlap,
    },
    gate::RotGate,
    mpo::{ self, Mpo },
    mps::{ Mps, Template, Truncation },
    statevector::StateVector,
};

const TRUNC: Truncation<f64> = Truncation { maxdim: 1 << 30, cutoff: 1e-16 };
const SEED: u64 = 2140;

fn dense_sandwich(
    left: &Mps<C64>,
    op: &Mpo<C64>,
    right: &Mps<C64>,
) -> C64 {
    let lv = left.clone().into_vector();
    let rv = right.clone().into_vector();
    let m = op.clone().into_matrix();
    let dim = lv.len();
    let mut acc = C64::from(0.0);
    for i in 0..dim {
        for j in 0..dim {
            acc += lv[i].conj() * m[[i, j]] * rv[j];
        }
    }
    acc
}

#[test]
fn gate_draws_reproduce_under_reseeding() {
    let mut rng_a = StdRng::seed_from_u64(SEED);
    let mut rng_b = StdRng::seed_from_u64(SEED);
    let draws_a: Vec<RotGate>
        = (0..100).map(|_| RotGate::sample(&mut rng_a)).collect();
    let draws_b: Vec<RotGate>
        = (0..100).map(|_| RotGate::sample(&mut rng_b)).collect();
    assert_eq!(draws_a, draws_b);
}

#[test]
fn sequence_draws_match_direct_draws() {
    // the layer sequence must consume exactly the draws that direct
    // application consumes, so reseeded phases see the same circuit
    let n = 4;
    let depth = 3;
    let mut rng = StdRng::seed_from_u64(SEED);
    let _ = layer_sequence::<C64, _>(n, depth, &mut rng).unwrap();
    let tail_a = RotGate::sample(&mut rng);
    let mut rng = StdRng::seed_from_u64(SEED);
    let init: Mps<C64> = Mps::from_template(n, Template::AllZero).unwrap();
    let _ = apply_random_circuit(init, depth, TRUNC, &mut rng).unwrap();
    let tail_b = RotGate::sample(&mut rng);
    assert_eq!(tail_a, tail_b);
}

#[test]
fn staged_overlap_depth_zero() {
    let left: Mps<C64> = Mps::from_template(4, Template::AllPlus).unwrap();
    let right: Mps<C64> = Mps::from_template(4, Template::W).unwrap();
    let layers: Vec<Mpo<C64>> = Vec::new();
    let got
        = staged_overlap(left.clone(), &layers, right.clone(), TRUNC)
        .unwrap();
    let expected = left.inner(&right).unwrap();
    assert!(expected.norm() > 1e-3);
    assert!((got - expected).norm() < 1e-12);
}

#[test]
fn staged_overlap_depth_one() {
    let n = 3;
    let mut rng = StdRng::seed_from_u64(SEED);
    let layers: Vec<Mpo<C64>> = layer_sequence(n, 1, &mut rng).unwrap();
    let left: Mps<C64> = Mps::from_template(n, Template::AllPlus).unwrap();
    let right: Mps<C64> = Mps::from_template(n, Template::AllZero).unwrap();
    let got
        = staged_overlap(left.clone(), &layers, right.clone(), TRUNC)
        .unwrap();
    let sandwich
        = mpo::overlap1(&left.clone().primed(1), &layers[0], &right)
        .unwrap();
    assert!((got - sandwich).norm() < 1e-12);
    let expected = dense_sandwich(&left, &layers[0], &right);
    assert!((got - expected).norm() < 1e-12);
}

#[test]
fn staged_overlap_matches_direct_application() {
    let n = 4;
    for depth in 2..=5 {
        let init: Mps<C64>
            = Mps::from_template(n, Template::AllZero).unwrap();
        let mut rng = StdRng::seed_from_u64(SEED);
        let result
            = apply_random_circuit(init.clone(), depth, TRUNC, &mut rng)
            .unwrap();
        let direct = init.inner(&result).unwrap();
        let mut rng = StdRng::seed_from_u64(SEED);
        let layers = layer_sequence(n, depth, &mut rng).unwrap();
        let staged
            = staged_overlap(init.clone(), &layers, init.clone(), TRUNC)
            .unwrap();
        assert!(
            (staged - direct).norm() < 1e-10,
            "depth {depth}: staged = {staged}, direct = {direct}",
        );
    }
}

#[test]
fn brick_wall_parity() {
    let n = 5;
    let mut rng = StdRng::seed_from_u64(SEED);
    let (_, ent0): (Mpo<C64>, Mpo<C64>)
        = random_layers(n, 0, &mut rng).unwrap();
    let (_, ent1): (Mpo<C64>, Mpo<C64>)
        = random_layers(n, 1, &mut rng).unwrap();
    // even steps couple (0,1) and (2,3); odd steps couple (1,2) and (3,4);
    // a coupled bond carries exactly the three CROT channels
    assert_eq!(ent0.bond_dim(0), Some(3));
    assert_eq!(ent0.bond_dim(1), Some(1));
    assert_eq!(ent0.bond_dim(2), Some(3));
    assert_eq!(ent0.bond_dim(3), Some(1));
    assert_eq!(ent1.bond_dim(0), Some(1));
    assert_eq!(ent1.bond_dim(1), Some(3));
    assert_eq!(ent1.bond_dim(2), Some(1));
    assert_eq!(ent1.bond_dim(3), Some(3));
}

#[test]
fn entangling_layer_dense_form() {
    let n = 4;
    let mut rng = StdRng::seed_from_u64(SEED);
    let (_, ent): (Mpo<C64>, Mpo<C64>)
        = random_layers(n, 0, &mut rng).unwrap();
    let dense = ent.into_matrix();
    let ph = C64::cis(std::f64::consts::FRAC_PI_2);
    for row in 0..16 {
        for col in 0..16 {
            let mut expected =
                if row == col { C64::from(1.0) } else { C64::from(0.0) };
            // site 0 is the most significant bit
            if row & 0b1100 == 0b1100 { expected *= ph; }
            if row & 0b0011 == 0b0011 { expected *= ph; }
            assert!(
                (dense[[row, col]] - expected).norm() < 1e-12,
                "mismatch at ({row}, {col})",
            );
        }
    }
}

#[test]
fn end_to_end_depth_two() {
    let n = 4;
    let depth = 2;
    let init: Mps<C64> = Mps::from_template(n, Template::AllZero).unwrap();
    let mut rng = StdRng::seed_from_u64(SEED);
    let result
        = apply_random_circuit(init.clone(), depth, TRUNC, &mut rng)
        .unwrap();
    let direct = init.inner(&result).unwrap();
    let mut rng = StdRng::seed_from_u64(SEED);
    let layers = layer_sequence(n, depth, &mut rng).unwrap();
    let staged
        = staged_overlap(init.clone(), &layers, init.clone(), TRUNC)
        .unwrap();
    assert!(staged.norm() <= 1.0 + 1e-12);
    assert!((staged - direct).norm() < 1e-10);
}

#[test]
fn engines_agree_on_the_same_seed() {
    let n = 4;
    let depth = 3;
    let init: Mps<C64> = Mps::from_template(n, Template::AllZero).unwrap();
    let mut rng = StdRng::seed_from_u64(SEED);
    let result
        = apply_random_circuit(init, depth, TRUNC, &mut rng).unwrap();
    let mv = result.into_vector();
    let mut sv = StateVector::from_template(n, Template::AllZero).unwrap();
    let mut rng = StdRng::seed_from_u64(SEED);
    sv.random_circuit(depth, &mut rng);
    for k in 0..(1_usize << n) {
        assert!(
            (mv[k] - sv.amp(k)).norm() < 1e-10,
            "amp({k}): mps = {}, sv = {}", mv[k], sv.amp(k),
        );
    }
}

#[test]
fn qft_of_zero_is_uniform_on_both_engines() {
    let n = 3;
    let init: Mps<C64> = Mps::from_template(n, Template::AllZero).unwrap();
    let out = apply_qft(init, TRUNC).unwrap();
    let v = out.into_vector();
    let c = C64::from(((1_usize << n) as f64).sqrt().recip());
    for k in 0..(1_usize << n) {
        assert!((v[k] - c).norm() < 1e-12);
    }
    let mut sv = StateVector::from_template(n, Template::AllZero).unwrap();
    sv.qft();
    for k in 0..(1_usize << n) {
        assert!((sv.amp(k) - c).norm() < 1e-12);
    }
}

#[test]
fn qft_outputs_differ_by_bit_reversal() {
    // the dense driver performs the final swap network; the MPS driver
    // leaves its output in bit-reversed order
    let n = 3;
    let bitrev = |b: usize| -> usize {
        (0..n).fold(0, |acc, i| acc | (((b >> i) & 1) << (n - 1 - i)))
    };
    let init: Mps<C64> = Mps::from_template(n, Template::AllOne).unwrap();
    let out = apply_qft(init, TRUNC).unwrap();
    let mv = out.into_vector();
    let mut sv = StateVector::from_template(n, Template::AllOne).unwrap();
    sv.qft();
    for k in 0..(1_usize << n) {
        assert!(
            (sv.amp(k) - mv[bitrev(k)]).norm() < 1e-10,
            "amp({k}): sv = {}, mps(bitrev) = {}", sv.amp(k), mv[bitrev(k)],
        );
    }
}

#[test]
fn truncation_caps_circuit_bond_dimension() {
    let n = 6;
    let depth = 6;
    let init: Mps<C64> = Mps::from_template(n, Template::AllZero).unwrap();
    let mut rng = StdRng::seed_from_u64(SEED);
    let result = apply_random_circuit(
        init, depth, Truncation::new(2, 1e-16), &mut rng).unwrap();
    assert!(result.max_bond_dim() <= 2);
    assert!(result.norm() <= 1.0 + 1e-12);
}
