//! Factorizes a rating file and scores the fit on held-out ratings.
//!
//! ```text
//! cargo run --example factorize_ratings -- ratings.txt
//! RUST_LOG=sparsemf_optim=debug cargo run --example factorize_ratings
//! ```
//!
//! Without an argument a synthetic rank-3 rating set is generated.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sparsemf::logging::{init_tracing, TracingConfig};
use sparsemf::{evaluate, OptimizerConfig, Solver, TrainingDataset};
use std::io::Cursor;

const USERS: usize = 60;
const ITEMS: usize = 40;
const LATENT: usize = 3;

/// Ratings in [1, 5] drawn from a random rank-`LATENT` model, 30% observed.
fn synthetic_ratings(rng: &mut StdRng) -> String {
    let users: Vec<[f64; LATENT]> = (0..USERS).map(|_| rng.gen()).collect();
    let items: Vec<[f64; LATENT]> = (0..ITEMS).map(|_| rng.gen()).collect();

    let mut text = String::from("# user item rating\n");
    for (u, user) in users.iter().enumerate() {
        for (i, item) in items.iter().enumerate() {
            if rng.gen_bool(0.3) {
                let score: f64 = user.iter().zip(item).map(|(a, b)| a * b).sum();
                let rating = (1.0 + 4.0 * score / LATENT as f64).round();
                text.push_str(&format!("user{u} item{i} {rating}\n"));
            }
        }
    }
    text
}

fn main() -> anyhow::Result<()> {
    init_tracing(TracingConfig::default())?;
    let mut rng = StdRng::seed_from_u64(2024);

    let mut dataset = match std::env::args().nth(1) {
        Some(path) => TrainingDataset::from_path(&path)
            .with_context(|| format!("failed to load ratings from {path}"))?,
        None => TrainingDataset::from_reader(Cursor::new(synthetic_ratings(&mut rng)))?,
    };
    dataset.split(20.0, 0.0, &mut rng)?;

    let config = OptimizerConfig::new()
        .with_latent_dimension(LATENT)
        .with_lambda(0.02)
        .with_max_evaluations(500)
        .with_seed(7);
    let mut solver = Solver::new(dataset.matrix().copy(), config)?;
    let result = solver.solve()?;

    println!(
        "{} after {} iterations, cost {:.4}",
        result.termination_reason, result.iterations, result.value
    );
    for fitted in solver.fitted_values()?.iter().take(5) {
        println!(
            "{}\t{}\tobserved {:.1}\tpredicted {:.2}",
            dataset.row_id(fitted.row).unwrap_or("?"),
            dataset.column_id(fitted.column).unwrap_or("?"),
            fitted.observed,
            fitted.predicted
        );
    }
    println!();

    let report = evaluate(&dataset, result.point.u(), result.point.v(), &mut rng)?;
    print!("{report}");
    Ok(())
}
