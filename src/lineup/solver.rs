use good_lp::{variable, Expression, IntoAffineExpression, ProblemVariables, ResolutionError,
              Solution, Variable};
use thiserror::Error;

/// Why a lineup could not be produced. The caller must match on this;
/// a non-optimal solve never yields a usable assignment.
#[derive(Debug, Error)]
pub enum LineupError {
    #[error("no players are marked attending for {date}")]
    NoPlayers { date: String },
    #[error("only {available} attending players for {required} fielding positions")]
    TooFewPlayers { available: usize, required: usize },
    #[error("{context}: the assignment model is infeasible")]
    Infeasible { context: String },
    #[error("{context}: the assignment model is unbounded")]
    Unbounded { context: String },
    #[error("{context}: solver failure: {message}")]
    SolverFailure { context: String, message: String },
}

/// Creates the rows x cols matrix of binary decision variables.
/// Entry [i][j] is 1 when player i takes slot j.
pub fn binary_matrix(vars: &mut ProblemVariables, rows: usize, cols: usize) -> Vec<Vec<Variable>> {
    (0..rows)
        .map(|_| (0..cols).map(|_| vars.add(variable().binary())).collect())
        .collect()
}

/// Maps the solver's terminal status into a typed error for the caller
pub fn map_resolution_error(error: ResolutionError, context: &str) -> LineupError {
    match error {
        ResolutionError::Infeasible => LineupError::Infeasible { context: context.to_string() },
        ResolutionError::Unbounded => LineupError::Unbounded { context: context.to_string() },
        other => LineupError::SolverFailure {
            context: context.to_string(),
            message: other.to_string(),
        },
    }
}

/// Reads back which variables the solver set to 1, as (row, col) pairs
pub fn assigned_pairs<S: Solution>(solution: &S, matrix: &[Vec<Variable>]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, row) in matrix.iter().enumerate() {
        for (j, &var) in row.iter().enumerate() {
            if solution.value(var) > 0.5 {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Evaluates an objective expression against a solved model
pub fn objective_value<S: Solution>(objective: Expression, solution: &S) -> f64 {
    objective.eval_with(solution)
}
