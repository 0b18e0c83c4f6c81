use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoSolutionCause {
    /// Linear branch with `b == 0`.
    ZeroSlope,
    NegativeDiscriminant { delta: f64 },
    /// The Roth/traditional ratio is undefined.
    ZeroTraditionalContribution,
}

impl std::fmt::Display for NoSolutionCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoSolutionCause::ZeroSlope => write!(f, "linear equation has zero slope"),
            NoSolutionCause::NegativeDiscriminant { delta } => {
                write!(f, "quadratic has no real root (discriminant {delta})")
            }
            NoSolutionCause::ZeroTraditionalContribution => {
                write!(f, "current traditional contribution is 0")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("No solution: {0}")]
    NoSolution(NoSolutionCause),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SolveError {
    pub fn is_no_solution(&self) -> bool {
        matches!(self, SolveError::NoSolution(_))
    }
}

/// A wizard entry that cannot be accepted for the current step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Please enter a value")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Percent must be a whole number between 0 and 100, got '{0}'")]
    PercentOutOfRange(String),

    #[error("Amount must be zero or more, got '{0}'")]
    NegativeAmount(String),
}
