use std::time::Instant;
use anyhow::Result;
use clap::Parser;
use num_complex::Complex64 as C64;
use rand::{ SeedableRng, rngs::StdRng };
use tensor_qreg::{
    circuit::{ apply_random_circuit, layer_sequence, staged_overlap },
    mps::{ Mps, Template, Truncation },
};

/// Random-circuit benchmark on the matrix product engine.
///
/// Runs the full circuit application, then reseeds and evaluates the same
/// self-overlap with the staged layer-sequence evaluator, reporting both
/// phase times and amplitudes.
#[derive(Parser, Debug)]
#[command(name = "bench")]
struct Args {
    /// Number of qubits
    #[arg(long, default_value_t = 4)]
    nq: usize,

    /// Initial-state template
    #[arg(long, default_value = "|0..0>")]
    init: String,

    /// Maximum bond dimension
    #[arg(long, default_value_t = 1 << 30)]
    maxd: usize,

    /// Relative singular-value cutoff
    #[arg(long, default_value_t = 1e-16)]
    cut: f64,

    /// Circuit depth
    #[arg(long, default_value_t = 16)]
    dep: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let template: Template = args.init.parse()?;
    let trunc = Truncation::new(args.maxd, args.cut);

    if bench::verbose() {
        println!("Verbose is ON");
        println!("No. qubits: {}", args.nq);
        println!("Init state: {}", template);
        println!("Max dim: {}", args.maxd);
        println!("Cutoff: {:e}", args.cut);
        println!("Depth: {}", args.dep);
    }

    let init: Mps<C64> = Mps::from_template(args.nq, template)?;

    let mut rng = StdRng::seed_from_u64(bench::SEED);
    let t = Instant::now();
    let result = apply_random_circuit(init.clone(), args.dep, trunc, &mut rng)?;
    println!("Full simulation time: {} ms", bench::elapsed_ms(t));

    println!("Norm: {:.6}", result.norm());
    println!("Max link dim: {}", result.max_bond_dim());
    println!("Avg link dim: {:.6}", result.avg_bond_dim());

    let amp = init.inner(&result)?;
    println!("Amplitude: {}", amp);
    println!();

    let mut rng = StdRng::seed_from_u64(bench::SEED);
    let t = Instant::now();
    let layers = layer_sequence(args.nq, args.dep, &mut rng)?;
    let amp = staged_overlap(init.clone(), &layers, init, trunc)?;
    println!("Overlap time: {} ms", bench::elapsed_ms(t));
    println!("Amplitude: {}", amp);

    Ok(())
}
