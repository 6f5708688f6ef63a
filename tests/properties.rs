use proptest::prelude::*;

use rust_descent::classify::{hot_decode, hot_encode};
use rust_descent::matrix::{Matrix, MatrixProduct, RowParallel, Sequential};
use rust_descent::Error;

fn matrix(rows: usize, cols: usize) -> impl Strategy<Value = Matrix> {
    prop::collection::vec(-10.0..10.0f64, rows * cols)
        .prop_map(move |data| Matrix::from_vec(rows, cols, data).unwrap())
}

fn any_matrix() -> impl Strategy<Value = Matrix> {
    (0..6usize, 0..6usize).prop_flat_map(|(rows, cols)| matrix(rows, cols))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn transpose_twice_is_identity(a in any_matrix()) {
        let back = a.t().t();
        prop_assert_eq!(back.dims(), a.dims());
        prop_assert_eq!(back, a);
    }

    #[test]
    fn product_dims_and_associativity(
        (a, b, c) in (1..5usize, 1..5usize, 1..5usize, 1..5usize)
            .prop_flat_map(|(m, n, p, q)| (matrix(m, n), matrix(n, p), matrix(p, q)))
    ) {
        let ab = a.product(&b).unwrap();
        prop_assert_eq!(ab.dims(), (a.rows(), b.cols()));

        let left = ab.product(&c).unwrap();
        let right = a.product(&b.product(&c).unwrap()).unwrap();
        for (l, r) in left.values().zip(right.values()) {
            prop_assert!((l - r).abs() <= 1e-9 * (1.0 + l.abs()), "{} vs {}", l, r);
        }
    }

    #[test]
    fn parallel_product_is_bit_identical(
        (a, b) in (0..8usize, 0..8usize, 0..8usize)
            .prop_flat_map(|(m, n, p)| (matrix(m, n), matrix(n, p)))
    ) {
        prop_assert_eq!(
            Sequential.product(&a, &b).unwrap(),
            RowParallel.product(&a, &b).unwrap()
        );
    }

    #[test]
    fn elementwise_ops_reject_other_shapes(a in any_matrix(), b in any_matrix()) {
        prop_assume!(a.dims() != b.dims());
        let plus_rejected = matches!(a.plus(&b), Err(Error::ShapeMismatch { .. }));
        let minus_rejected = matches!(a.minus(&b), Err(Error::ShapeMismatch { .. }));
        prop_assert!(plus_rejected);
        prop_assert!(minus_rejected);
    }

    #[test]
    fn hot_decode_inverts_hot_encode(
        (k, labels) in (1..8usize).prop_flat_map(|k| (Just(k), prop::collection::vec(0..k, 0..20)))
    ) {
        let column: Vec<f64> = labels.iter().map(|&l| l as f64).collect();
        let labels = Matrix::from_vec(column.len(), 1, column).unwrap();
        let encoded = hot_encode(&labels, k).unwrap();
        prop_assert_eq!(encoded.dims(), (labels.rows(), k));
        prop_assert_eq!(hot_decode(&encoded).unwrap(), labels);
    }
}
