mod error;
mod solver;
mod types;
mod wizard;

pub use error::{EntryError, NoSolutionCause, SolveError};
pub use solver::{
    Coefficients, choose_traditional_percent, discriminant, linear_root, new_roth_percent,
    new_take_home, new_traditional_percent, quadratic_roots, solve,
};
pub use types::{Allocation, Inputs, Roots};
pub use wizard::{EntryKind, Progress, Step, Wizard, parse_entry};
