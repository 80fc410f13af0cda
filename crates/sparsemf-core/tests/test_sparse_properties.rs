//! Property-based tests for the sparse matrix algebra.
//!
//! These tests check the algebraic contracts of `SparseMatrix` against a
//! dense nalgebra baseline on randomly generated matrices.

use approx::assert_relative_eq;
use proptest::prelude::*;
use sparsemf_core::SparseMatrix;

/// Triplets, shape
type SparseMatrixData = (Vec<(usize, usize, f64)>, (usize, usize));

/// Generate a random sparse matrix description with controlled density
fn sparse_matrix_strategy(
    max_rows: usize,
    max_columns: usize,
    max_nnz: usize,
) -> impl Strategy<Value = SparseMatrixData> {
    (1..=max_rows, 1..=max_columns).prop_flat_map(move |(rows, columns)| {
        (
            prop::collection::vec((0..rows, 0..columns, -10.0..10.0f64), 0..=max_nnz),
            Just((rows, columns)),
        )
    })
}

/// Two same-shaped sparse matrices
fn matrix_pair_strategy() -> impl Strategy<Value = (SparseMatrixData, SparseMatrixData)> {
    (1..=6usize, 1..=6usize).prop_flat_map(|(rows, columns)| {
        let side = move || {
            (
                prop::collection::vec((0..rows, 0..columns, -10.0..10.0f64), 0..=20),
                Just((rows, columns)),
            )
        };
        (side(), side())
    })
}

fn build((triplets, (rows, columns)): &SparseMatrixData) -> SparseMatrix {
    let mut m = SparseMatrix::new(*rows, *columns).unwrap();
    for &(i, j, value) in triplets {
        m.set_entry(i, j, value).unwrap();
    }
    m
}

proptest! {
    /// Property: positions that were never written read as zero
    #[test]
    fn prop_unset_positions_read_zero(data in sparse_matrix_strategy(8, 8, 20)) {
        let m = build(&data);
        let (rows, columns) = data.1;
        for i in 0..rows {
            for j in 0..columns {
                if !data.0.iter().any(|&(r, c, _)| r == i && c == j) {
                    prop_assert_eq!(m.get_entry(i, j).unwrap(), 0.0);
                }
            }
        }
    }

    /// Property: set then get returns the value; setting zero removes at most one key
    #[test]
    fn prop_set_get_round_trip(
        data in sparse_matrix_strategy(8, 8, 20),
        value in prop::num::f64::NORMAL,
        seed in any::<(usize, usize)>(),
    ) {
        let mut m = build(&data);
        let (rows, columns) = data.1;
        let (i, j) = (seed.0 % rows, seed.1 % columns);

        m.set_entry(i, j, value).unwrap();
        prop_assert_eq!(m.get_entry(i, j).unwrap(), value);

        let before = m.non_zero_count();
        m.set_entry(i, j, 0.0).unwrap();
        prop_assert_eq!(m.get_entry(i, j).unwrap(), 0.0);
        prop_assert_eq!(m.non_zero_count(), before - 1);
    }

    /// Property: transpose is an involution
    #[test]
    fn prop_double_transpose_is_identity(data in sparse_matrix_strategy(8, 8, 30)) {
        let m = build(&data);
        let tt = m.transpose().transpose();
        prop_assert_eq!(tt.shape(), m.shape());
        for i in 0..m.row_dimension() {
            for j in 0..m.column_dimension() {
                prop_assert_eq!(tt.get_entry(i, j).unwrap(), m.get_entry(i, j).unwrap());
            }
        }
    }

    /// Property: (A + B) - B == A within tolerance
    #[test]
    fn prop_add_then_subtract((a, b) in matrix_pair_strategy()) {
        let a = build(&a);
        let b = build(&b);
        let restored = a.add(&b).unwrap().subtract(&b).unwrap();
        for i in 0..a.row_dimension() {
            for j in 0..a.column_dimension() {
                let expected = a.get_entry(i, j).unwrap();
                let actual = restored.get_entry(i, j).unwrap();
                prop_assert!((expected - actual).abs() <= 1e-9 * (1.0 + expected.abs()));
            }
        }
    }

    /// Property: the sparse product agrees with the dense product
    #[test]
    fn prop_multiply_matches_dense(
        left in sparse_matrix_strategy(6, 6, 15),
        right_columns in 1..6usize,
        right_values in prop::collection::vec(-5.0..5.0f64, 36),
    ) {
        let a = build(&left);
        let inner = a.column_dimension();
        let b = SparseMatrix::from_row_slice(
            inner,
            right_columns,
            &right_values[..inner * right_columns],
        ).unwrap();

        let sparse = a.multiply(&b).unwrap().to_dense();
        let dense = a.to_dense() * b.to_dense();
        for (x, y) in sparse.iter().zip(dense.iter()) {
            prop_assert!((x - y).abs() < 1e-9);
        }
    }

    /// Property: the residual's support is a subset of the target's support
    #[test]
    fn prop_residual_support_is_subset(
        target in sparse_matrix_strategy(8, 8, 25),
        latent in 1..4usize,
        seed in any::<u64>(),
    ) {
        use rand::{rngs::StdRng, SeedableRng};

        let r = build(&target);
        let mut rng = StdRng::seed_from_u64(seed);
        let u = SparseMatrix::random_dense(latent, r.row_dimension(), &mut rng).unwrap();
        let v = SparseMatrix::random_dense(latent, r.column_dimension(), &mut rng).unwrap();

        let residual = r.residual_over_support(&u.transpose(), &v).unwrap();
        prop_assert!(residual.non_zero_count() <= r.non_zero_count());
        for (i, j, _) in residual.iter() {
            prop_assert!(r.contains(i, j));
        }
    }
}

#[test]
fn test_residual_matches_masked_dense_product() {
    let r = SparseMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 2.0, 3.0, 0.0]).unwrap();
    let u = SparseMatrix::from_row_slice(2, 3, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
    let v = SparseMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();

    let residual = r.residual_over_support(&u.transpose(), &v).unwrap();
    let dense = r.to_dense() - u.to_dense().transpose() * v.to_dense();

    for (i, j, value) in r.iter() {
        assert!(value != 0.0);
        assert_relative_eq!(residual.get_entry(i, j).unwrap(), dense[(i, j)], epsilon = 1e-12);
    }
    assert_eq!(residual.get_entry(0, 1).unwrap(), 0.0);
}
