//! Integration tests for the bold-driver gradient descent.

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sparsemf_core::SparseMatrix;
use sparsemf_optim::{
    GradientDescent, IterationRecord, OptimizerConfig, OptimizerError, TerminationReason,
};

/// 2x2 target observed on the diagonal only
fn diagonal_target() -> SparseMatrix {
    let mut r = SparseMatrix::new(2, 2).unwrap();
    r.set_entry(0, 0, 1.0).unwrap();
    r.set_entry(1, 1, 1.0).unwrap();
    r
}

fn random_target(rows: usize, columns: usize, seed: u64) -> SparseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    SparseMatrix::random_sparse(rows, columns, 40.0, &mut rng)
        .unwrap()
        .scalar_multiply(5.0)
}

/// Checks the per-record bold-driver contract.
fn assert_bold_driver_records(records: &[IterationRecord], initial_cost: f64) {
    let mut best = initial_cost;
    for record in records {
        assert!(record.best_cost <= best, "best cost increased at {record:?}");
        if record.accepted {
            assert!(record.next_step_size > record.step_size);
            assert_eq!(record.best_cost, record.cost);
            assert!(record.cost < best);
        } else {
            assert!(record.next_step_size < record.step_size);
            assert_eq!(record.best_cost, best);
            assert!(record.improvement_rate.is_none());
        }
        best = record.best_cost;
    }
}

#[test]
fn test_first_step_on_diagonal_target() {
    let u0 = SparseMatrix::from_row_slice(1, 2, &[0.1, 0.2]).unwrap();
    let v0 = SparseMatrix::from_row_slice(1, 2, &[0.3, 0.4]).unwrap();
    let config = OptimizerConfig::new()
        .with_lambda(0.0)
        .with_step_size(0.1)
        .with_max_evaluations(1)
        .with_seed_matrices(u0, v0);

    let mut optimizer = GradientDescent::new(diagonal_target(), config).unwrap();
    let record = optimizer.iterate().unwrap().unwrap();

    assert!(record.accepted);
    assert_eq!(record.iteration, 1);
    assert_relative_eq!(record.step_size, 0.1);
    assert_relative_eq!(record.next_step_size, 0.11, epsilon = 1e-12);

    let best = optimizer.best();
    assert_relative_eq!(best.u().get_entry(0, 0).unwrap(), 0.1291, epsilon = 1e-12);
    assert_relative_eq!(best.u().get_entry(0, 1).unwrap(), 0.2368, epsilon = 1e-12);
    assert_relative_eq!(best.v().get_entry(0, 0).unwrap(), 0.3097, epsilon = 1e-12);
    assert_relative_eq!(best.v().get_entry(0, 1).unwrap(), 0.4184, epsilon = 1e-12);

    let residual_00 = 1.0 - 0.1291 * 0.3097;
    let residual_11 = 1.0 - 0.2368 * 0.4184;
    let expected = 0.5 * (residual_00 * residual_00 + residual_11 * residual_11);
    assert_relative_eq!(record.cost, expected, epsilon = 1e-12);

    assert_eq!(optimizer.termination(), Some(TerminationReason::MaxIterations));
}

#[test]
fn test_zero_row_target_is_configuration_error() {
    let err = SparseMatrix::new(0, 3)
        .map_err(OptimizerError::from)
        .and_then(|target| GradientDescent::new(target, OptimizerConfig::new()))
        .unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_invalid_config_fails_fast() {
    let config = OptimizerConfig::new().with_step_size(-1.0);
    let err = GradientDescent::new(diagonal_target(), config).unwrap_err();
    assert!(matches!(
        err,
        OptimizerError::InvalidConfiguration { ref parameter, .. } if parameter == "step_size"
    ));
}

#[test]
fn test_zero_budget_performs_no_step() {
    let config = OptimizerConfig::new().with_seed(4).with_max_evaluations(0);
    let mut optimizer = GradientDescent::new(random_target(5, 4, 1), config).unwrap();
    let initial = optimizer.best().clone();

    assert!(optimizer.iterations().next().is_none());
    let result = optimizer.run().unwrap();

    assert_eq!(result.iterations, 0);
    assert_eq!(result.function_evaluations, 1);
    assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
    assert_eq!(result.point.u(), initial.u());
    assert_eq!(result.point.v(), initial.v());
    assert_eq!(result.value, initial.cost());
}

#[test]
fn test_zero_initial_cost_converges_immediately() {
    let config = OptimizerConfig::new().with_lambda(0.0).with_seed(1);
    let mut optimizer = GradientDescent::new(SparseMatrix::new(3, 3).unwrap(), config).unwrap();
    assert_eq!(optimizer.best().cost(), 0.0);
    assert_eq!(optimizer.termination(), Some(TerminationReason::Converged));

    assert!(optimizer.iterate().unwrap().is_none());
    let result = optimizer.run().unwrap();
    assert_eq!(result.termination_reason, TerminationReason::Converged);
    assert!(result.converged);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.function_evaluations, 1);
}

#[test]
fn test_records_follow_bold_driver() {
    let config = OptimizerConfig::new()
        .with_seed(21)
        .with_latent_dimension(3)
        .with_step_size(0.5)
        .with_max_evaluations(60);
    let mut optimizer = GradientDescent::new(random_target(8, 6, 2), config).unwrap();
    let initial_cost = optimizer.best().cost();

    let records: Vec<_> = optimizer.iterations().collect::<Result<_, _>>().unwrap();
    assert!(!records.is_empty());
    assert_bold_driver_records(&records, initial_cost);

    // A rejected step rolls the working point back to the best point.
    assert_eq!(optimizer.working().u(), optimizer.best().u());
}

#[test]
fn test_step_size_floor_terminates() {
    // Steps this large overshoot every time.
    let config = OptimizerConfig::new()
        .with_seed(8)
        .with_step_size(1e6)
        .with_step_factors(1.1, 0.5)
        .with_min_step_size(1e3);
    let mut optimizer = GradientDescent::new(random_target(6, 6, 3), config).unwrap();
    let initial = optimizer.best().clone();

    let result = optimizer.run().unwrap();
    assert_eq!(result.termination_reason, TerminationReason::StepSizeUnderflow);
    assert!(!result.converged);
    assert_eq!(result.iterations, 10);
    assert!(optimizer.step_size() < 1e3);
    assert_eq!(result.point.u(), initial.u());
    assert_eq!(result.value, initial.cost());
}

#[test]
fn test_loose_threshold_converges_on_first_improvement() {
    let config = OptimizerConfig::new()
        .with_seed(2)
        .with_convergence_epsilon(100.0);
    let mut optimizer = GradientDescent::new(random_target(5, 5, 4), config).unwrap();

    let result = optimizer.run().unwrap();
    assert_eq!(result.termination_reason, TerminationReason::Converged);
    assert!(result.converged);

    let accepted = optimizer.result().unwrap();
    assert_eq!(accepted.iterations, result.iterations);
}

#[test]
fn test_iterations_are_restartable() {
    let target = random_target(6, 5, 5);
    let config = OptimizerConfig::new()
        .with_seed(13)
        .with_max_evaluations(40);

    let mut paused = GradientDescent::new(target.clone(), config.clone()).unwrap();
    let mut records: Vec<_> = paused.iterations().take(3).map(Result::unwrap).collect();
    assert_eq!(paused.iteration(), 3);
    records.extend(paused.iterations().take(4).map(Result::unwrap));

    let mut straight = GradientDescent::new(target, config).unwrap();
    let expected: Vec<_> = straight.iterations().take(7).map(Result::unwrap).collect();

    assert_eq!(records, expected);
    assert_eq!(paused.best().u(), straight.best().u());
}

#[test]
fn test_same_seed_is_reproducible() {
    let target = random_target(7, 7, 6);
    let config = OptimizerConfig::new()
        .with_seed(99)
        .with_max_evaluations(25);

    let first = GradientDescent::new(target.clone(), config.clone())
        .unwrap()
        .run()
        .unwrap();
    let second = GradientDescent::new(target, config).unwrap().run().unwrap();

    assert_eq!(first.value.to_bits(), second.value.to_bits());
    assert_eq!(first.point.u(), second.point.u());
    assert_eq!(first.point.v(), second.point.v());
}

#[test]
fn test_rank_one_target_is_recovered() {
    let users = [1.0, 2.0, 3.0];
    let items = [1.0, 2.0, 1.0, 2.0];
    let mut data = Vec::new();
    for u in users {
        for v in items {
            data.push(u * v);
        }
    }
    let target = SparseMatrix::from_row_slice(3, 4, &data).unwrap();

    let config = OptimizerConfig::new()
        .with_seed(17)
        .with_latent_dimension(1)
        .with_lambda(0.0)
        .with_convergence_epsilon(0.0)
        .with_max_evaluations(3_000);
    let mut optimizer = GradientDescent::new(target.clone(), config).unwrap();
    let result = optimizer.run().unwrap();

    assert!(result.value < 1e-3, "final cost {}", result.value);
    let reconstruction = result.point.reconstruct();
    for (i, j, observed) in target.iter() {
        assert!((reconstruction[(i, j)] - observed).abs() < 0.05);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: best cost never increases and the step follows acceptance
    #[test]
    fn prop_bold_driver_contract(
        target_seed in any::<u64>(),
        init_seed in any::<u64>(),
        latent in 1..4usize,
    ) {
        let config = OptimizerConfig::new()
            .with_seed(init_seed)
            .with_latent_dimension(latent)
            .with_max_evaluations(30);
        let mut optimizer = GradientDescent::new(random_target(6, 5, target_seed), config).unwrap();
        let initial_cost = optimizer.best().cost();

        let records: Vec<_> = optimizer.iterations().collect::<Result<_, _>>().unwrap();
        assert_bold_driver_records(&records, initial_cost);
        prop_assert!(optimizer.best().cost() <= initial_cost);
    }
}
