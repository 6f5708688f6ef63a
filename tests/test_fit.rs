use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rust_descent::classify::{accuracy, hot_encode};
use rust_descent::cost::Model;
use rust_descent::data::{gaussian_clusters, init_parameters, normalize_features, parse_csv};
use rust_descent::matrix::RowParallel;
use rust_descent::optim::{sweep, CancellationToken, Status, StopReason};
use rust_descent::{fit, FitConfig, GradientDescent, LearningRate, Matrix, Termination};

fn line() -> (Matrix, Matrix) {
    let x = Matrix::from([[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]);
    let y = Matrix::from([[2.0], [4.0], [6.0]]);
    (x, y)
}

fn separable(seed: u64) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(seed);
    gaussian_clusters(&mut rng, &[(-2.0, -2.0), (2.0, 2.0)], 100, 0.75).unwrap()
}

#[test]
fn test_line_converges() {
    let (x, y) = line();
    let mut config = FitConfig::new();
    config
        .model(Model::LinearRegression)
        .learning_rate(LearningRate::Fixed(0.1))
        .iterations(1000);
    let result = fit(&x, &y, &config).unwrap();
    assert_abs_diff_eq!(result.theta.at(0, 0).unwrap(), 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(result.theta.at(1, 0).unwrap(), 2.0, epsilon = 1e-3);
    assert_abs_diff_eq!(result.final_cost().unwrap(), 0.0, epsilon = 1e-6);
    for pair in result.costs[1..].windows(2) {
        assert!(pair[1] <= pair[0] + 1e-9);
    }
}

#[test]
fn test_binary_clusters_reach_high_accuracy() {
    let (x, labels) = separable(42);
    let mut config = FitConfig::new();
    config
        .learning_rate(LearningRate::Damped {
            initial: 0.5,
            damping: 0.9999,
        })
        .iterations(2000);
    let result = fit(&x, &labels, &config).unwrap();
    let (acc, missed) = accuracy(&x, &result.theta, &labels).unwrap();
    assert!(acc >= 0.95, "accuracy {acc}, missed {missed:?}");
}

#[test]
fn test_accuracy_termination_stops_early() {
    let (x, labels) = separable(7);
    let y = hot_encode(&labels, 2).unwrap();
    let mut config = FitConfig::new();
    config
        .learning_rate(LearningRate::Fixed(0.1))
        .termination(Termination::Accuracy {
            target: 0.95,
            max_iterations: Some(10_000),
        });
    let result = fit(&x, &y, &config).unwrap();
    assert_eq!(result.status, Status::Converged);
    assert!(result.iterations() < 10_000);
    assert!(accuracy(&x, &result.theta, &y).unwrap().0 >= 0.95);
}

#[test]
fn test_cancelled_from_another_thread() {
    let (x, y) = line();
    let flag = Arc::new(AtomicBool::new(false));
    let mut config = FitConfig::new();
    config
        .model(Model::LinearRegression)
        .learning_rate(LearningRate::Fixed(0.1))
        .termination(Termination::Cancelled)
        .cancellation(CancellationToken::from_flag(flag.clone()));

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        flag.store(true, Ordering::Relaxed);
    });
    let result = fit(&x, &y, &config).unwrap();
    canceller.join().unwrap();

    assert_eq!(result.status, Status::Stopped(StopReason::Cancelled));
    assert!(result.iterations() > 0);
    assert_abs_diff_eq!(result.theta.at(1, 0).unwrap(), 2.0, epsilon = 1e-3);
}

#[test]
fn test_expired_deadline_returns_initial_parameters() {
    let (x, y) = line();
    let initial = Matrix::from([[3.0], [-1.0]]);
    let mut config = FitConfig::new();
    config
        .model(Model::LinearRegression)
        .initial_parameters(initial.clone())
        .cancellation(CancellationToken::with_timeout(Duration::ZERO));
    let result = fit(&x, &y, &config).unwrap();
    assert_eq!(result.status, Status::Stopped(StopReason::Cancelled));
    assert_eq!(result.theta, initial);
}

#[test]
fn test_sweep_over_learning_rates() {
    let (x, y) = line();
    let configs: Vec<FitConfig> = [0.01, 0.1, 10.0]
        .iter()
        .map(|&alpha| {
            let mut config = FitConfig::new();
            config
                .model(Model::LinearRegression)
                .learning_rate(LearningRate::Fixed(alpha))
                .iterations(300);
            config
        })
        .collect();
    let results = sweep(&GradientDescent::new(RowParallel), &x, &y, &configs);
    let fits: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
    assert!(fits[1].final_cost().unwrap() < fits[0].final_cost().unwrap());
    assert!(fits[2].diverged());
}

#[test]
fn test_normalized_csv_pipeline() {
    let csv = "2104,3,399900\n1600,3,329900\n2400,3,369000\n1416,2,232000\n3000,4,539900\n";
    let data = parse_csv(csv.as_bytes()).unwrap();
    let (mut x, y, theta) = init_parameters(&data).unwrap();
    let normalization = normalize_features(&mut x).unwrap();
    let mut config = FitConfig::new();
    config
        .model(Model::LinearRegression)
        .learning_rate(LearningRate::Fixed(0.3))
        .termination(Termination::Converged {
            epsilon: 1e-3,
            max_iterations: Some(100_000),
        })
        .initial_parameters(theta);
    let result = fit(&x, &y, &config).unwrap();
    assert_eq!(result.status, Status::Converged);

    let sample = normalization.apply(&Matrix::from([[1.0, 2104.0, 3.0]])).unwrap();
    let price = sample.product(&result.theta).unwrap().at(0, 0).unwrap();
    assert!((200_000.0..600_000.0).contains(&price), "price {price}");
}
