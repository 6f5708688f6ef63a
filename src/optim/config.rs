use serde::{Deserialize, Serialize};

use crate::cost::Model;
use crate::error::{Error, Result};
use crate::matrix::{Matrix, Value};
use crate::optim::CancellationToken;

/// Step size for each parameter update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LearningRate {
    Fixed(Value),
    /// Starts at `initial` and is multiplied by `damping` every time the
    /// cost goes up compared to the previous iteration.
    Damped { initial: Value, damping: Value },
}

impl Default for LearningRate {
    fn default() -> Self {
        LearningRate::Fixed(0.01)
    }
}

impl LearningRate {
    pub fn initial(&self) -> Value {
        match *self {
            LearningRate::Fixed(alpha) => alpha,
            LearningRate::Damped { initial, .. } => initial,
        }
    }

    pub fn damping(&self) -> Option<Value> {
        match *self {
            LearningRate::Fixed(_) => None,
            LearningRate::Damped { damping, .. } => Some(damping),
        }
    }
}

/// When a fit stops. A cancellation token, if configured, is honoured under
/// every policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Termination {
    /// Run exactly this many iterations.
    Iterations(usize),
    /// Stop once the cost falls by no more than `epsilon`: `0 <= cost[t-1] - cost[t] <= epsilon`.
    Converged {
        epsilon: Value,
        max_iterations: Option<usize>,
    },
    /// Stop once the training accuracy reaches `target`. Classifiers only.
    Accuracy {
        target: Value,
        max_iterations: Option<usize>,
    },
    /// Run until the cancellation token fires.
    Cancelled,
}

impl Default for Termination {
    fn default() -> Self {
        Termination::Iterations(1000)
    }
}

impl Termination {
    /// The iteration budget, if the policy has one.
    pub fn budget(&self) -> Option<usize> {
        match *self {
            Termination::Iterations(n) => Some(n),
            Termination::Converged { max_iterations, .. } => max_iterations,
            Termination::Accuracy { max_iterations, .. } => max_iterations,
            Termination::Cancelled => None,
        }
    }
}

/// Everything a fit needs besides the data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub(crate) model: Model,
    pub(crate) learning_rate: LearningRate,
    pub(crate) termination: Termination,
    pub(crate) record_parameters: bool,
    pub(crate) initial_parameters: Option<Matrix>,
    #[serde(skip)]
    pub(crate) cancellation: Option<CancellationToken>,
}

impl FitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model, and with it the cost function.
    pub fn model(&mut self, value: Model) -> &mut Self {
        self.model = value;
        self
    }

    pub fn learning_rate(&mut self, value: LearningRate) -> &mut Self {
        self.learning_rate = value;
        self
    }

    pub fn termination(&mut self, value: Termination) -> &mut Self {
        self.termination = value;
        self
    }

    /// Shorthand for `termination(Termination::Iterations(value))`.
    pub fn iterations(&mut self, value: usize) -> &mut Self {
        self.termination(Termination::Iterations(value))
    }

    /// Keeps a snapshot of theta after every iteration.
    pub fn record_parameters(&mut self, value: bool) -> &mut Self {
        self.record_parameters = value;
        self
    }

    /// Starts from `value` instead of a zero theta.
    pub fn initial_parameters(&mut self, value: Matrix) -> &mut Self {
        self.initial_parameters = Some(value);
        self
    }

    pub fn cancellation(&mut self, value: CancellationToken) -> &mut Self {
        self.cancellation = Some(value);
        self
    }

    /// Checks the config against itself and against the data it will fit.
    pub fn validate(&self, x: &Matrix, y: &Matrix, classifier: bool) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        let alpha = self.learning_rate.initial();
        if !(alpha > 0.0 && alpha.is_finite()) {
            return invalid(format!("learning rate must be positive, got {alpha}"));
        }
        if let Some(damping) = self.learning_rate.damping() {
            if !(damping > 0.0 && damping < 1.0) {
                return invalid(format!("damping must be in (0, 1), got {damping}"));
            }
        }

        match self.termination {
            Termination::Converged { epsilon, .. } if !(epsilon >= 0.0) => {
                return invalid(format!("epsilon must be non-negative, got {epsilon}"));
            }
            Termination::Accuracy { target, .. } if !(0.0..=1.0).contains(&target) => {
                return invalid(format!("accuracy target must be in [0, 1], got {target}"));
            }
            Termination::Accuracy { .. } if !classifier => {
                return invalid("accuracy termination needs a classifier".to_string());
            }
            Termination::Cancelled if self.cancellation.is_none() => {
                return invalid("termination on cancellation needs a token".to_string());
            }
            _ => {}
        }
        if self.termination.budget() == Some(0) {
            return invalid("iteration budget must be at least 1".to_string());
        }

        if x.rows() == 0 {
            return Err(Error::EmptyInput("no training samples".to_string()));
        }
        if x.rows() != y.rows() {
            return Err(Error::ShapeMismatch {
                op: "fit",
                detail: format!("{} feature rows but {} label rows", x.rows(), y.rows()),
            });
        }
        if let Some(theta) = &self.initial_parameters {
            if theta.dims() != (x.cols(), y.cols()) {
                return Err(Error::shape("initial parameters", theta.dims(), (x.cols(), y.cols())));
            }
        }
        Ok(())
    }
}
