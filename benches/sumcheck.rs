use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use honk_sumcheck::{
    parameters::SumcheckConfig,
    relations::{RelationSet, instance::HonkInstance},
    sumcheck::{HONK_MAX_LENGTH, SumcheckProver, SumcheckVerifier},
};
use p3_baby_bear::{BabyBear, Poseidon2BabyBear};
use p3_challenger::DuplexChallenger;
use p3_field::extension::BinomialExtensionField;
use rand::{SeedableRng, rngs::SmallRng};

type F = BabyBear;
type EF = BinomialExtensionField<BabyBear, 4>;
type Perm = Poseidon2BabyBear<16>;
type MyChallenger = DuplexChallenger<F, Perm, 16, 8>;

/// Helper to create a fresh challenger for each benchmark iteration.
fn setup_challenger() -> MyChallenger {
    let mut rng = SmallRng::seed_from_u64(0);
    let perm = Perm::new_from_rng_128(&mut rng);
    MyChallenger::new(perm)
}

fn bench_sumcheck_prover(c: &mut Criterion) {
    let mut group = c.benchmark_group("SumcheckProver");
    group.sample_size(10);

    for num_vars in [12, 14, 16, 18] {
        let instance = HonkInstance::<EF>::random(num_vars, &mut SmallRng::seed_from_u64(1));
        let config = SumcheckConfig::new(num_vars);
        let domsep = config.domain_separator::<EF, F>("bench", HONK_MAX_LENGTH);

        group.bench_with_input(BenchmarkId::new("prove", num_vars), &instance, |b, instance| {
            b.iter(|| {
                let prover = SumcheckProver::<EF, HONK_MAX_LENGTH>::new(
                    config,
                    RelationSet::standard(),
                    instance.columns.clone(),
                )
                .unwrap();
                let mut prover_state = domsep.to_prover_state(setup_challenger());
                prover.prove(&instance.params, &mut prover_state)
            });
        });
    }
    group.finish();
}

fn bench_sumcheck_verifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("SumcheckVerifier");

    for num_vars in [12, 16, 20] {
        let instance = HonkInstance::<EF>::random(num_vars, &mut SmallRng::seed_from_u64(1));
        let config = SumcheckConfig::new(num_vars);
        let domsep = config.domain_separator::<EF, F>("bench", HONK_MAX_LENGTH);

        let mut prover_state = domsep.to_prover_state(setup_challenger());
        SumcheckProver::<EF, HONK_MAX_LENGTH>::new(
            config,
            RelationSet::standard(),
            instance.columns.clone(),
        )
        .unwrap()
        .prove(&instance.params, &mut prover_state);
        let proof = prover_state.into_proof();

        let verifier =
            SumcheckVerifier::<EF, HONK_MAX_LENGTH>::new(config, RelationSet::standard()).unwrap();

        group.bench_with_input(BenchmarkId::new("verify", num_vars), &proof, |b, proof| {
            b.iter(|| {
                let mut verifier_state =
                    domsep.to_verifier_state(proof.proof_data.clone(), setup_challenger());
                verifier.verify(&instance.params, &mut verifier_state).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sumcheck_prover, bench_sumcheck_verifier);
criterion_main!(benches);
