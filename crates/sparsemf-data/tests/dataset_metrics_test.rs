//! Integration tests for loading, splitting and scoring rating data.

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sparsemf_core::SparseMatrix;
use sparsemf_data::{evaluate, DataError, TrainingDataset};
use std::io::Cursor;

/// 3 users × 3 items, fully observed, rating = 1 + (u + i) % 5
fn full_ratings() -> String {
    let mut text = String::from("# user item rating\n");
    for u in 0..3 {
        for i in 0..3 {
            text.push_str(&format!("user{u} item{i} {}\n", 1 + (u + i) % 5));
        }
    }
    text
}

#[test]
fn test_from_path_round_trip() {
    let path = std::env::temp_dir().join(format!("sparsemf-ratings-{}.txt", std::process::id()));
    std::fs::write(&path, full_ratings()).unwrap();

    let dataset = TrainingDataset::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(dataset.matrix().shape(), (3, 3));
    assert_eq!(dataset.training_size(), 9);
    assert_eq!(dataset.rating("user2", "item2").unwrap(), 5.0);
    assert_eq!(dataset.max_rating(), 5.0);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("sparsemf-does-not-exist/ratings.txt");
    assert!(matches!(TrainingDataset::from_path(path), Err(DataError::Io(_))));
}

#[test]
fn test_evaluate_matches_hand_computation() {
    let mut dataset = TrainingDataset::from_reader(Cursor::new(full_ratings())).unwrap();
    let mut rng = StdRng::seed_from_u64(12);
    dataset.split(50.0, 0.0, &mut rng).unwrap();
    assert_eq!(dataset.test_size(), 4);

    // Rank-1 factors predicting (i + 1) * (j + 1).
    let u = SparseMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]).unwrap();
    let v = SparseMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]).unwrap();

    let report = evaluate(&dataset, &u, &v, &mut StdRng::seed_from_u64(1)).unwrap();

    let errors: Vec<f64> = dataset
        .test_entries()
        .iter()
        .map(|(&(i, j), &r)| r - ((i + 1) * (j + 1)) as f64)
        .collect();
    let n = errors.len() as f64;
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt();

    assert_eq!(report.model.count, 4);
    assert_relative_eq!(report.model.mae, mae, epsilon = 1e-12);
    assert_relative_eq!(report.model.rmse, rmse, epsilon = 1e-12);

    // Baseline guesses lie in [0, 5), ratings in [1, 5].
    assert_eq!(report.random.count, 4);
    assert!(report.random.mae <= 5.0);

    // Breakdown groups are keyed by remaining training activity and
    // together cover every test entry.
    let row_total: usize = report.by_row_activity.values().map(|s| s.count).sum();
    let column_total: usize = report.by_column_activity.values().map(|s| s.count).sum();
    assert_eq!(row_total, 4);
    assert_eq!(column_total, 4);
    for &(i, _) in dataset.test_entries().keys() {
        assert!(report.by_row_activity.contains_key(&dataset.row_non_zero(i)));
    }
}

#[test]
fn test_evaluate_is_reproducible() {
    let mut dataset = TrainingDataset::from_reader(Cursor::new(full_ratings())).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    dataset.split(30.0, 20.0, &mut rng).unwrap();
    assert_eq!(dataset.validation_size(), 1);

    let mut rng = StdRng::seed_from_u64(5);
    let u = SparseMatrix::random_dense(2, 3, &mut rng).unwrap();
    let v = SparseMatrix::random_dense(2, 3, &mut rng).unwrap();

    let first = evaluate(&dataset, &u, &v, &mut StdRng::seed_from_u64(6)).unwrap();
    let second = evaluate(&dataset, &u, &v, &mut StdRng::seed_from_u64(6)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_evaluate_rejects_mismatched_factors() {
    let mut dataset = TrainingDataset::from_reader(Cursor::new(full_ratings())).unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    dataset.split(50.0, 0.0, &mut rng).unwrap();

    let u = SparseMatrix::new(1, 2).unwrap();
    let v = SparseMatrix::new(1, 3).unwrap();
    assert!(matches!(
        evaluate(&dataset, &u, &v, &mut StdRng::seed_from_u64(0)),
        Err(DataError::Matrix(_))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_report_serializes() {
    let mut dataset = TrainingDataset::from_reader(Cursor::new(full_ratings())).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    dataset.split(50.0, 0.0, &mut rng).unwrap();
    let u = SparseMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]).unwrap();
    let v = SparseMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]).unwrap();

    let report = evaluate(&dataset, &u, &v, &mut StdRng::seed_from_u64(0)).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["model"]["count"], 4);
}
