use std::time::Instant;
use anyhow::Result;
use clap::Parser;
use num_complex::Complex64 as C64;
use tensor_qreg::{
    circuit::apply_qft,
    mps::{ Mps, Template, Truncation },
};

/// Quantum Fourier transform benchmark on the matrix product engine.
#[derive(Parser, Debug)]
#[command(name = "qft")]
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
    #[arg(long, default_value_t = 1e-4)]
    cut: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let template: Template = args.init.parse()?;
    let trunc = Truncation::new(args.maxd, args.cut);

    if bench::verbose() {
        println!("Verbose is ON");
        println!("No. qubits: {}", args.nq);
        println!("Init state: {}", template);
        println!("Cutoff: {:e}", args.cut);
    }

    let init: Mps<C64> = Mps::from_template(args.nq, template)?;

    let t = Instant::now();
    let result = apply_qft(init, trunc)?;
    println!("Full simulation time: {} ms", bench::elapsed_ms(t));

    println!("Norm: {:.6}", result.norm());
    println!("Max link dim: {}", result.max_bond_dim());
    println!("Avg link dim: {:.6}", result.avg_bond_dim());

    Ok(())
}
