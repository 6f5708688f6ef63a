use tracing::{debug, info, instrument, trace, warn};

use crate::classify::accuracy_with;
use crate::cost::CostFunction;
use crate::error::Result;
use crate::matrix::{Matrix, MatrixProduct, Sequential, Value};
use crate::optim::{FitConfig, Termination};

/// Where a fit is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Converged,
    Stopped(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    IterationBudget,
    Cancelled,
}

/// The outcome of a fit.
#[derive(Debug, Clone)]
pub struct Fit {
    /// Final parameters. A cancelled fit carries the latest theta, not the
    /// lowest-cost one seen.
    pub theta: Matrix,
    /// Cost of theta at the start of each completed iteration.
    pub costs: Vec<Value>,
    /// Theta after each completed iteration, when recording was requested.
    pub thetas: Vec<Matrix>,
    pub status: Status,
    /// The learning rate in effect when the fit ended.
    pub learning_rate: Value,
}

impl Fit {
    pub fn iterations(&self) -> usize {
        self.costs.len()
    }

    pub fn final_cost(&self) -> Option<Value> {
        self.costs.last().copied()
    }

    /// True once any recorded cost is `NaN` or infinite.
    pub fn diverged(&self) -> bool {
        self.costs.iter().any(|c| !c.is_finite())
    }
}

/// Batch gradient descent, parameterised by its matrix product strategy.
#[derive(Debug, Clone)]
pub struct GradientDescent<P: MatrixProduct = Sequential> {
    product: P,
}

impl Default for GradientDescent<Sequential> {
    fn default() -> Self {
        GradientDescent::new(Sequential)
    }
}

impl<P: MatrixProduct> GradientDescent<P> {
    pub fn new(product: P) -> Self {
        GradientDescent { product }
    }

    /// Fits the cost function selected by `config.model`.
    pub fn fit(&self, x: &Matrix, y: &Matrix, config: &FitConfig) -> Result<Fit> {
        self.fit_with(&config.model, x, y, config)
    }

    /// Fits an arbitrary cost function; `config.model` is ignored.
    ///
    /// Errors come only from validation or from shapes the cost function
    /// rejects. A diverging cost is recorded in [`Fit::costs`] and the fit
    /// carries on.
    #[instrument(skip_all, fields(samples = x.rows(), features = x.cols(), classes = y.cols()))]
    pub fn fit_with(
        &self,
        cost: &dyn CostFunction,
        x: &Matrix,
        y: &Matrix,
        config: &FitConfig,
    ) -> Result<Fit> {
        config.validate(x, y, cost.is_classifier())?;

        let mut theta = match &config.initial_parameters {
            Some(theta) => theta.clone(),
            None => Matrix::new(x.cols(), y.cols()),
        };
        let mut alpha = config.learning_rate.initial();
        let damping = config.learning_rate.damping();
        let budget = config.termination.budget();
        let mut costs: Vec<Value> = Vec::new();
        let mut thetas = Vec::new();
        let mut status = Status::Running;

        while status == Status::Running {
            let t = costs.len();
            if config
                .cancellation
                .as_ref()
                .is_some_and(|token| token.is_cancelled())
            {
                status = Status::Stopped(StopReason::Cancelled);
                break;
            }
            if budget.is_some_and(|n| t >= n) {
                status = Status::Stopped(StopReason::IterationBudget);
                break;
            }
            if let Termination::Accuracy { target, .. } = config.termination {
                let (acc, _) = accuracy_with(cost, &self.product, x, &theta, y)?;
                trace!(iteration = t, accuracy = acc);
                if acc >= target {
                    status = Status::Converged;
                    break;
                }
            }

            let (j, grad) = cost.cost(&self.product, &theta, x, y)?;
            if let (Some(damping), Some(&previous)) = (damping, costs.last()) {
                if j > previous {
                    alpha *= damping;
                    debug!(iteration = t, cost = j, previous, alpha, "cost went up, damping");
                }
            }
            if !j.is_finite() && costs.iter().all(|c| c.is_finite()) {
                warn!(iteration = t, cost = j, "cost is no longer finite");
            }
            theta = theta.minus(&(grad * alpha))?;
            trace!(iteration = t, cost = j, alpha);

            costs.push(j);
            if config.record_parameters {
                thetas.push(theta.clone());
            }

            if let Termination::Converged { epsilon, .. } = config.termination {
                // A rising cost is left to damping, not taken as convergence.
                if let [.., previous, last] = costs[..] {
                    if (0.0..=epsilon).contains(&(previous - last)) {
                        status = Status::Converged;
                    }
                }
            }
        }

        let final_cost = costs.last().copied().unwrap_or(f64::NAN);
        info!(?status, iterations = costs.len(), cost = final_cost, "fit finished");
        Ok(Fit {
            theta,
            costs,
            thetas,
            status,
            learning_rate: alpha,
        })
    }
}
