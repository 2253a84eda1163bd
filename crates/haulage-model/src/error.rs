use haulage_solver::SolveError;
use thiserror::Error;

/// Failure kinds of the planning pipeline. None of them carries a partial plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Destination {destination} has no route from any origin")]
    InfeasibleStructure { destination: String },
    #[error("No shipment plan satisfies every order")]
    Infeasible,
    #[error("Solver failure: {0}")]
    SolverInternal(String),
    #[error("Solver stopped early: {0}")]
    SolverTimeout(String),
    #[error("Reported cost {reported} disagrees with recomputed cost {recomputed}")]
    ResultInconsistency { reported: f64, recomputed: f64 },
}

impl From<SolveError> for TransportError {
    fn from(e: SolveError) -> Self {
        match e {
            SolveError::Infeasible => TransportError::Infeasible,
            SolveError::Unbounded => TransportError::SolverInternal(
                "objective reported unbounded, which nonnegative costs rule out".to_string(),
            ),
            SolveError::InvalidProblem(msg) | SolveError::Numerical(msg) => TransportError::SolverInternal(msg),
            e @ (SolveError::IterationLimit { .. } | SolveError::TimeLimit { .. }) => {
                TransportError::SolverTimeout(e.to_string())
            }
        }
    }
}
