use tracing::debug;

use super::{Allocation, Inputs, NoSolutionCause, Roots, SolveError};

/// Coefficients of `a*x^2 + b*x + c = 0` in the new traditional percent `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Coefficients {
    pub fn from_inputs(inputs: &Inputs) -> Self {
        let ratio = inputs.roth_to_traditional_ratio();
        Self {
            a: ratio,
            b: -(ratio + 1.0),
            c: 1.0 - inputs.current_take_home() / inputs.new_salary,
        }
    }
}

pub fn solve(inputs: &Inputs) -> Result<Allocation, SolveError> {
    inputs.validate()?;
    if inputs.current_traditional_percent == 0.0 {
        return Err(SolveError::NoSolution(
            NoSolutionCause::ZeroTraditionalContribution,
        ));
    }

    let new_traditional = new_traditional_percent(inputs)?;
    let new_roth = new_roth_percent(
        inputs.current_traditional_percent,
        inputs.current_roth_percent,
        new_traditional,
    );
    let take_home = new_take_home(inputs.new_salary, new_traditional, new_roth);

    Ok(Allocation {
        new_traditional_percent: new_traditional,
        new_roth_percent: new_roth,
        new_take_home: take_home,
    })
}

/// Unvalidated solve for the new traditional percent. A zero current traditional
/// percent is not guarded here; the NaN/infinite ratio ends in `NoSolution` or `0`.
pub fn new_traditional_percent(inputs: &Inputs) -> Result<f64, SolveError> {
    let Coefficients { a, b, c } = Coefficients::from_inputs(inputs);

    if a == 0.0 {
        let x = linear_root(b, c)?;
        debug!(b, c, x, "linear branch");
        return Ok(x);
    }

    let roots = quadratic_roots(a, b, c)?;
    let chosen = choose_traditional_percent(roots);
    debug!(a, b, c, x1 = roots.x1, x2 = roots.x2, chosen, "quadratic branch");
    Ok(chosen)
}

pub fn new_roth_percent(
    current_traditional_percent: f64,
    current_roth_percent: f64,
    new_traditional_percent: f64,
) -> f64 {
    current_roth_percent * new_traditional_percent / current_traditional_percent
}

pub fn new_take_home(new_salary: f64, new_traditional_percent: f64, new_roth_percent: f64) -> f64 {
    new_salary * (1.0 - new_traditional_percent) * (1.0 - new_roth_percent)
}

pub fn linear_root(b: f64, c: f64) -> Result<f64, SolveError> {
    if b == 0.0 {
        return Err(SolveError::NoSolution(NoSolutionCause::ZeroSlope));
    }
    Ok(-(c / b))
}

pub fn discriminant(a: f64, b: f64, c: f64) -> f64 {
    b * b - 4.0 * a * c
}

pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Result<Roots, SolveError> {
    let delta = discriminant(a, b, c);
    // NaN fails like a negative discriminant.
    if delta.is_nan() || delta < 0.0 {
        return Err(SolveError::NoSolution(
            NoSolutionCause::NegativeDiscriminant { delta },
        ));
    }

    let sqrt_delta = delta.sqrt();
    Ok(Roots {
        x1: (-b + sqrt_delta) / (2.0 * a),
        x2: (-b - sqrt_delta) / (2.0 * a),
    })
}

/// Picks the usable root. A root of exactly 1 matches neither side of the
/// straddle test and yields 0.
pub fn choose_traditional_percent(roots: Roots) -> f64 {
    let Roots { x1, x2 } = roots;

    if x1 > 1.0 && x2 < 1.0 {
        return if x2 > 0.0 { x2 } else { 0.0 };
    }
    if x1 < 1.0 && x2 > 1.0 {
        return if x1 > 0.0 { x1 } else { 0.0 };
    }
    if x1 < 1.0 && x2 < 1.0 && x1 > 0.0 && x2 > 0.0 {
        return x1.max(x2);
    }

    0.0
}
