use alloc::{string::ToString, vec, vec::Vec};

use p3_baby_bear::{BabyBear, Poseidon2BabyBear};
use p3_challenger::{CanObserve, CanSample, DuplexChallenger};
use p3_field::{PrimeCharacteristicRing, extension::BinomialExtensionField};
use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::fiat_shamir::{
    domain_separator::DomainSeparator, errors::FiatShamirError, prover::ProverState,
    verifier::VerifierState,
};

type F = BabyBear;
type EF = BinomialExtensionField<F, 4>;
type Perm = Poseidon2BabyBear<16>;
type MyChallenger = DuplexChallenger<F, Perm, 16, 8>;

fn make_challenger() -> MyChallenger {
    let perm = Perm::new_from_rng_128(&mut SmallRng::seed_from_u64(42));
    DuplexChallenger::new(perm)
}

/// `S first, A data(n), S second`
fn make_domain_separator(n: usize) -> DomainSeparator<EF, F> {
    let mut domsep = DomainSeparator::new("fiat-shamir-tests");
    domsep.sample("first");
    domsep.observe(n, "data");
    domsep.sample("second");
    domsep
}

fn prove(domsep: &DomainSeparator<EF, F>, data: &[EF]) -> (Vec<F>, [EF; 2]) {
    let mut prover = ProverState::<F, EF, MyChallenger>::new(domsep, make_challenger());
    let first = prover.get_challenge("first");
    prover.send("data", data);
    let second = prover.get_challenge("second");
    (prover.into_proof().proof_data, [first, second])
}

proptest! {
    #[test]
    fn test_extension_scalar_roundtrip(seed in any::<u64>(), n in 1usize..8) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let data: Vec<EF> = (0..n).map(|_| rng.random()).collect();
        let domsep = make_domain_separator(n);

        let (proof_data, challenges) = prove(&domsep, &data);
        prop_assert_eq!(proof_data.len(), n * 4);

        let mut verifier = VerifierState::<F, EF, MyChallenger>::new(&domsep, proof_data, make_challenger());
        let first = verifier.get_challenge("first").unwrap();
        let received = verifier.receive("data", n).unwrap();
        let second = verifier.get_challenge("second").unwrap();

        prop_assert_eq!(received, data);
        prop_assert_eq!([first, second], challenges);
        prop_assert!(verifier.finalize().is_ok());
    }

    #[test]
    fn test_challenges_depend_on_sent_data(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let data: Vec<EF> = (0..3).map(|_| rng.random()).collect();
        let mut other = data.clone();
        other[1] += EF::from(F::ONE);
        let domsep = make_domain_separator(3);

        let (_, a) = prove(&domsep, &data);
        let (_, b) = prove(&domsep, &other);
        prop_assert_eq!(a[0], b[0]);
        prop_assert_ne!(a[1], b[1]);
    }

    #[test]
    fn test_pow_grinding_roundtrip(bits in 1usize..8) {
        let mut domsep = DomainSeparator::<EF, F>::new("fiat-shamir-tests");
        domsep.pow(bits, "pow");

        let mut prover = ProverState::<F, EF, MyChallenger>::new(&domsep, make_challenger());
        prover.pow_grinding("pow", bits);
        let proof_data = prover.into_proof().proof_data;

        let mut verifier = VerifierState::<F, EF, MyChallenger>::new(&domsep, proof_data, make_challenger());
        verifier.check_pow_grinding("pow", bits).unwrap();
        prop_assert!(verifier.finalize().is_ok());
    }

    #[test]
    fn test_observe_domain_separator(seed in any::<u64>(), n in 1usize..16) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut domsep = DomainSeparator::<EF, F>::new("fiat-shamir-tests");
        domsep.add_sumcheck(rng.random_range(0..8), n, 0);

        let mut challenger1 = make_challenger();
        let mut challenger2 = make_challenger();

        domsep.observe_domain_separator(&mut challenger1);
        challenger2.observe_slice(&domsep.as_field_elements());

        for _ in 0..4 {
            let s1: F = challenger1.sample();
            let s2: F = challenger2.sample();
            prop_assert_eq!(s1, s2);
        }
    }
}

#[test]
fn test_different_protocols_sample_different_challenges() {
    let a = make_domain_separator(2);
    let b = make_domain_separator(3);

    let mut prover_a = ProverState::<F, EF, MyChallenger>::new(&a, make_challenger());
    let mut prover_b = ProverState::<F, EF, MyChallenger>::new(&b, make_challenger());
    assert_ne!(prover_a.get_challenge("first"), prover_b.get_challenge("first"));
}

#[test]
fn test_get_challenges_matches_sequential_calls() {
    let mut domsep = DomainSeparator::<EF, F>::new("fiat-shamir-tests");
    domsep.sample("a");
    domsep.sample("b");

    let mut prover = ProverState::<F, EF, MyChallenger>::new(&domsep, make_challenger());
    let batched = prover.get_challenges(["a", "b"]);

    let mut verifier = VerifierState::<F, EF, MyChallenger>::new(&domsep, vec![], make_challenger());
    let a = verifier.get_challenge("a").unwrap();
    let b = verifier.get_challenge("b").unwrap();
    assert_eq!(batched, [a, b]);
}

#[test]
fn test_verifier_rejects_truncated_proof() {
    let domsep = make_domain_separator(2);
    let (mut proof_data, _) = prove(&domsep, &[EF::from(F::ONE), EF::from(F::TWO)]);
    proof_data.pop();

    let mut verifier = VerifierState::<F, EF, MyChallenger>::new(&domsep, proof_data, make_challenger());
    verifier.get_challenge("first").unwrap();
    assert_eq!(
        verifier.receive("data", 2),
        Err(FiatShamirError::ExceededTranscript)
    );
}

#[test]
fn test_verifier_rejects_trailing_data() {
    let domsep = make_domain_separator(1);
    let (mut proof_data, _) = prove(&domsep, &[EF::from(F::ONE)]);
    proof_data.push(F::ONE);

    let mut verifier = VerifierState::<F, EF, MyChallenger>::new(&domsep, proof_data, make_challenger());
    verifier.get_challenge("first").unwrap();
    verifier.receive("data", 1).unwrap();
    verifier.get_challenge("second").unwrap();
    assert_eq!(
        verifier.finalize(),
        Err(FiatShamirError::TrailingData { remaining: 1 })
    );
}

#[test]
fn test_verifier_rejects_out_of_order_interactions() {
    let domsep = make_domain_separator(1);
    let (proof_data, _) = prove(&domsep, &[EF::from(F::ONE)]);

    let mut verifier = VerifierState::<F, EF, MyChallenger>::new(&domsep, proof_data, make_challenger());
    assert!(matches!(
        verifier.receive("data", 1),
        Err(FiatShamirError::UnexpectedLabel { .. })
    ));
}

#[test]
fn test_verifier_rejects_wrong_length() {
    let domsep = make_domain_separator(2);
    let (proof_data, _) = prove(&domsep, &[EF::from(F::ONE), EF::from(F::TWO)]);

    let mut verifier = VerifierState::<F, EF, MyChallenger>::new(&domsep, proof_data, make_challenger());
    verifier.get_challenge("first").unwrap();
    assert_eq!(
        verifier.receive_const::<3>("data"),
        Err(FiatShamirError::LengthMismatch {
            label: "data".to_string(),
            expected: 2,
            found: 3,
        })
    );
}

#[test]
fn test_verifier_rejects_unfinished_protocol() {
    let domsep = make_domain_separator(1);
    let (proof_data, _) = prove(&domsep, &[EF::from(F::ONE)]);

    let mut verifier = VerifierState::<F, EF, MyChallenger>::new(&domsep, proof_data, make_challenger());
    verifier.get_challenge("first").unwrap();
    assert!(matches!(
        verifier.finalize(),
        Err(FiatShamirError::UnexpectedLabel { .. })
    ));
}

#[test]
fn test_invalid_grinding_witness() {
    let bits = 8;
    let mut domsep = DomainSeparator::<EF, F>::new("fiat-shamir-tests");
    domsep.pow(bits, "pow");

    let mut prover = ProverState::<F, EF, MyChallenger>::new(&domsep, make_challenger());
    prover.pow_grinding("pow", bits);
    let mut proof_data = prover.into_proof().proof_data;

    // A witness found for one challenger state is valid with probability 2^-bits for another.
    let mut rejected = false;
    for shift in 1..=4u64 {
        proof_data[0] += F::from_u64(shift);
        let mut verifier =
            VerifierState::<F, EF, MyChallenger>::new(&domsep, proof_data.clone(), make_challenger());
        if verifier.check_pow_grinding("pow", bits) == Err(FiatShamirError::InvalidGrindingWitness) {
            rejected = true;
            break;
        }
    }
    assert!(rejected);
}

#[test]
#[should_panic(expected = "diverged")]
fn test_prover_panics_on_undeclared_interaction() {
    let domsep = make_domain_separator(1);
    let mut prover = ProverState::<F, EF, MyChallenger>::new(&domsep, make_challenger());
    prover.send("data", &[EF::from(F::ONE)]);
}
