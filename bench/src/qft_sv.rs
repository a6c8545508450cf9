use std::time::Instant;
use anyhow::Result;
use clap::Parser;
use tensor_qreg::{ mps::Template, statevector::StateVector };

/// Quantum Fourier transform benchmark on the dense statevector engine.
///
/// With `VERBOSE=1`, additionally checks that the transform of ∣0...0⟩ is
/// the uniform superposition.
#[derive(Parser, Debug)]
#[command(name = "qft_sv")]
struct Args {
    /// Number of qubits
    #[arg(short = 'q', long = "nq", default_value_t = 24)]
    nq: usize,
}

const PRECISION: f64 = 1e-10;

fn main() -> Result<()> {
    let args = Args::parse();
    let verbose = bench::verbose();

    if verbose {
        println!("Verbose is ON");
        println!("No. qubits: {}", args.nq);
    }

    let mut state = StateVector::from_template(args.nq, Template::AllZero)?;

    let t = Instant::now();
    state.qft();
    let ms = bench::elapsed_ms(t);

    if verbose {
        println!("Time taken: {ms} ms");
    } else {
        println!("{ms}");
    }

    if verbose {
        let amp_zero = state.amp(0);
        let valid = (1..1_usize << args.nq)
            .all(|k| (state.amp(k) - amp_zero).norm() < PRECISION);
        if valid {
            println!("Result valid");
        } else {
            println!("Result invalid");
        }
    }

    Ok(())
}
