use std::time::Duration;

use thiserror::Error;

/// Reasons a solve can end without an optimal solution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Malformed LP problem: {0}")]
    InvalidProblem(String),
    #[error("No assignment satisfies all constraints")]
    Infeasible,
    #[error("Objective is unbounded")]
    Unbounded,
    #[error("Numerical failure: {0}")]
    Numerical(String),
    #[error("Iteration limit of {iterations} pivots reached")]
    IterationLimit { iterations: usize },
    #[error("Time limit exceeded after {elapsed:?}")]
    TimeLimit { elapsed: Duration },
}
