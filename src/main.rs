use std::time::Duration;

use rust_descent::classify::hot_encode;
use rust_descent::cost::Model;
use rust_descent::data::gaussian_clusters;
use rust_descent::matrix::RowParallel;
use rust_descent::optim::{sweep, CancellationToken};
use rust_descent::{evaluate, fit, FitConfig, GradientDescent, LearningRate, Matrix, Termination};

use rand::prelude::*;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;

fn main() -> rust_descent::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .event_format(format().with_target(false).without_time())
        .init();

    // y = 2x
    let x = Matrix::from([[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]);
    let y = Matrix::from([[2.0], [4.0], [6.0]]);
    let mut line = FitConfig::new();
    line.model(Model::LinearRegression)
        .learning_rate(LearningRate::Fixed(0.1))
        .iterations(1000);
    let result = fit(&x, &y, &line)?;
    println!("line: theta={} cost={:?}", result.theta.t(), result.final_cost());

    let rates = [0.001, 0.01, 0.1, 0.5];
    let configs: Vec<FitConfig> = rates
        .iter()
        .map(|&alpha| {
            let mut config = line.clone();
            config.learning_rate(LearningRate::Fixed(alpha));
            config
        })
        .collect();
    for (alpha, result) in rates.iter().zip(sweep(&GradientDescent::new(RowParallel), &x, &y, &configs)) {
        println!("alpha={alpha}: cost={:?}", result?.final_cost());
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let (x, labels) = gaussian_clusters(&mut rng, &[(-2.0, -2.0), (2.0, 2.0)], 100, 1.0)?;
    let y = hot_encode(&labels, 2)?;
    let mut clusters = FitConfig::new();
    clusters
        .learning_rate(LearningRate::Damped {
            initial: 0.5,
            damping: 0.9999,
        })
        .termination(Termination::Accuracy {
            target: 1.0,
            max_iterations: None,
        })
        .cancellation(CancellationToken::with_timeout(Duration::from_secs(2)));
    let result = fit(&x, &y, &clusters)?;
    let (accuracy, missed) = evaluate(&x, &result.theta, &y)?;
    println!(
        "clusters: {:?} after {} iterations, accuracy={accuracy:.3}, missed={missed:?}",
        result.status,
        result.iterations()
    );
    Ok(())
}
