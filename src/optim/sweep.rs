//! Several fits over the same data, one scoped thread each.

use std::panic;

use tracing::info;

use crate::error::Result;
use crate::matrix::{Matrix, MatrixProduct};
use crate::optim::{Fit, FitConfig, GradientDescent};

/// Runs one fit per config concurrently and returns the results in config
/// order. `x` and `y` are shared read-only between the threads.
///
/// A panicking fit is re-raised on the calling thread once every thread has
/// been joined.
pub fn sweep<P: MatrixProduct>(
    descent: &GradientDescent<P>,
    x: &Matrix,
    y: &Matrix,
    configs: &[FitConfig],
) -> Vec<Result<Fit>> {
    info!(fits = configs.len(), "starting sweep");
    let joined = crossbeam::scope(|scope| {
        let handles: Vec<_> = configs
            .iter()
            .map(|config| scope.spawn(move |_| descent.fit(x, y, config)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Vec<_>>()
    });
    match joined {
        Ok(results) => results
            .into_iter()
            .map(|result| result.unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect(),
        Err(payload) => panic::resume_unwind(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::Model;
    use crate::error::Error;
    use crate::matrix::{RowParallel, Sequential};
    use crate::optim::LearningRate;

    fn line() -> (Matrix, Matrix) {
        let x = Matrix::from([[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]);
        let y = Matrix::from([[2.0], [4.0], [6.0]]);
        (x, y)
    }

    fn config(alpha: f64) -> FitConfig {
        let mut config = FitConfig::new();
        config
            .model(Model::LinearRegression)
            .learning_rate(LearningRate::Fixed(alpha))
            .iterations(100);
        config
    }

    #[test]
    fn test_sweep_matches_individual_fits() {
        let (x, y) = line();
        let configs = [config(0.01), config(0.05), config(0.1)];
        let descent = GradientDescent::new(Sequential);
        let results = sweep(&descent, &x, &y, &configs);
        assert_eq!(results.len(), 3);
        for (result, config) in results.iter().zip(&configs) {
            let alone = descent.fit(&x, &y, config).unwrap();
            let swept = result.as_ref().unwrap();
            assert_eq!(swept.theta, alone.theta);
            assert_eq!(swept.costs, alone.costs);
        }
    }

    #[test]
    fn test_sweep_keeps_errors_in_place() {
        let (x, y) = line();
        let configs = [config(0.1), config(-1.0), config(0.05)];
        let results = sweep(&GradientDescent::new(RowParallel), &x, &y, &configs);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::InvalidConfig(_))));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_empty_sweep() {
        let (x, y) = line();
        assert!(sweep(&GradientDescent::new(Sequential), &x, &y, &[]).is_empty());
    }
}
