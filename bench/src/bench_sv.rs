use std::time::Instant;
use anyhow::Result;
use clap::Parser;
use rand::{ SeedableRng, rngs::StdRng };
use tensor_qreg::{ mps::Template, statevector::StateVector };

/// Random-circuit benchmark on the dense statevector engine.
///
/// Same circuit as `bench` under the same seed; plain-milliseconds output
/// unless `VERBOSE=1`.
#[derive(Parser, Debug)]
#[command(name = "bench_sv")]
struct Args {
    /// Number of qubits
    #[arg(short = 'q', long = "nq", default_value_t = 24)]
    nq: usize,

    /// Circuit depth
    #[arg(short = 'd', long = "dep", default_value_t = 16)]
    dep: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbose = bench::verbose();

    if verbose {
        println!("Verbose is ON");
        println!("No. qubits: {}", args.nq);
        println!("Depth: {}", args.dep);
    }

    let mut state = StateVector::from_template(args.nq, Template::AllZero)?;

    let mut rng = StdRng::seed_from_u64(bench::SEED);
    let t = Instant::now();
    state.random_circuit(args.dep, &mut rng);
    let ms = bench::elapsed_ms(t);

    if verbose {
        println!("Time taken: {ms} ms");
        println!("Norm: {:.6}", state.norm());
        println!("Amplitude of |0..0>: {}", state.amp(0));
    } else {
        println!("{ms}");
    }

    Ok(())
}
