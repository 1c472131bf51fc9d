use std::time::Instant;

use clap::{Parser, ValueEnum};
use honk_sumcheck::{
    parameters::{DEFAULT_EDGES_PER_TASK, SumcheckConfig},
    relations::{Column, RelationSet, instance::HonkInstance},
    sumcheck::{HONK_MAX_LENGTH, SumcheckProver, SumcheckVerifier},
};
use p3_baby_bear::{BabyBear, Poseidon2BabyBear};
use p3_challenger::{DuplexChallenger, FieldChallenger, GrindingChallenger};
use p3_field::{ExtensionField, Field, extension::BinomialExtensionField};
use p3_goldilocks::{Goldilocks, Poseidon2Goldilocks};
use p3_koala_bear::{KoalaBear, Poseidon2KoalaBear};
use rand::{
    SeedableRng,
    distr::{Distribution, StandardUniform},
    rngs::SmallRng,
};
use tracing_forest::{ForestLayer, util::LevelFilter};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FieldChoice {
    BabyBear,
    KoalaBear,
    Goldilocks,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short = 'd', long, default_value = "16")]
    num_variables: usize,

    #[arg(short = 'p', long, default_value = "0")]
    pow_bits: usize,

    #[arg(short = 'f', long, value_enum, default_value = "baby-bear")]
    field: FieldChoice,

    #[arg(short = 's', long, default_value = "0")]
    seed: u64,

    #[arg(short = 'k', long, default_value = "0")]
    public_inputs: usize,

    #[arg(long, default_value_t = DEFAULT_EDGES_PER_TASK)]
    edges_per_task: usize,

    /// Flip one witness value before proving; the proof must then be rejected.
    #[arg(long)]
    corrupt: bool,
}

fn main() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();

    let args = Args::parse();
    let mut rng = SmallRng::seed_from_u64(args.seed);

    match args.field {
        FieldChoice::BabyBear => {
            type Perm = Poseidon2BabyBear<16>;
            let perm = Perm::new_from_rng_128(&mut rng);
            run::<BabyBear, BinomialExtensionField<BabyBear, 4>, _>(&args, || {
                DuplexChallenger::<BabyBear, Perm, 16, 8>::new(perm.clone())
            });
        }
        FieldChoice::KoalaBear => {
            type Perm = Poseidon2KoalaBear<16>;
            let perm = Perm::new_from_rng_128(&mut rng);
            run::<KoalaBear, BinomialExtensionField<KoalaBear, 4>, _>(&args, || {
                DuplexChallenger::<KoalaBear, Perm, 16, 8>::new(perm.clone())
            });
        }
        FieldChoice::Goldilocks => {
            type Perm = Poseidon2Goldilocks<8>;
            let perm = Perm::new_from_rng_128(&mut rng);
            run::<Goldilocks, BinomialExtensionField<Goldilocks, 2>, _>(&args, || {
                DuplexChallenger::<Goldilocks, Perm, 8, 4>::new(perm.clone())
            });
        }
    }
}

fn run<F, EF, Challenger>(args: &Args, make_challenger: impl Fn() -> Challenger)
where
    F: Field,
    EF: ExtensionField<F>,
    Challenger: FieldChallenger<F> + GrindingChallenger<Witness = F>,
    StandardUniform: Distribution<EF>,
{
    let config = SumcheckConfig::new(args.num_variables)
        .with_pow_bits(args.pow_bits)
        .with_edges_per_task(args.edges_per_task);

    println!("=========================================");
    println!("Honk sumcheck over {:?}", args.field);
    println!("{config}");

    let max_public_inputs = HonkInstance::<EF>::max_public_inputs(args.num_variables);
    if args.public_inputs > max_public_inputs {
        eprintln!(
            "At most {max_public_inputs} public inputs fit in 2^{} rows",
            args.num_variables
        );
        return;
    }

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut instance =
        HonkInstance::<EF>::random_with_public_inputs(args.num_variables, args.public_inputs, &mut rng);
    if args.corrupt {
        instance.corrupt(Column::WO, 0);
    }
    let unsatisfied = instance.unsatisfied_rows(&RelationSet::standard()).len();
    println!("Public inputs: {}", instance.public_inputs.len());
    println!("Unsatisfied rows: {unsatisfied}");

    let domainsep = config.domain_separator::<EF, F>("honk-sumcheck", HONK_MAX_LENGTH);

    let prover = match SumcheckProver::<EF, HONK_MAX_LENGTH>::new(
        config,
        RelationSet::standard(),
        instance.columns.clone(),
    ) {
        Ok(prover) => prover,
        Err(err) => {
            eprintln!("Invalid instance: {err}");
            return;
        }
    };

    let mut prover_state = domainsep.to_prover_state(make_challenger());
    let time = Instant::now();
    let output = prover.prove(&instance.params, &mut prover_state);
    let prove_time = time.elapsed();
    let proof = prover_state.into_proof();

    println!("Prover time: {prove_time:.1?}");
    println!(
        "Proof size: {:.1} KiB",
        (proof.len() * size_of::<F>()) as f64 / 1024.0
    );

    let verifier = match SumcheckVerifier::<EF, HONK_MAX_LENGTH>::new(config, RelationSet::standard()) {
        Ok(verifier) => verifier,
        Err(err) => {
            eprintln!("Invalid verifier setup: {err}");
            return;
        }
    };
    let mut verifier_state = domainsep.to_verifier_state(proof.proof_data, make_challenger());

    let time = Instant::now();
    let result = verifier.verify(&instance.params, &mut verifier_state);
    let verify_time = time.elapsed();

    println!("Verifier time: {verify_time:.1?}");
    match result {
        Ok(Some(claims)) => {
            assert_eq!(claims, output);
            println!("Proof accepted");
        }
        Ok(None) => println!("Proof rejected"),
        Err(err) => println!("Malformed proof: {err}"),
    }
}
