use serde::Serialize;

use super::SolveError;

/// Raw wizard answers. Contribution percents are fractions, not display percents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inputs {
    pub current_salary: f64,
    pub current_traditional_percent: f64,
    pub current_roth_percent: f64,
    pub new_salary: f64,
}

impl Inputs {
    pub fn current_take_home(&self) -> f64 {
        self.current_salary
            * (1.0 - self.current_traditional_percent)
            * (1.0 - self.current_roth_percent)
    }

    pub fn roth_to_traditional_ratio(&self) -> f64 {
        self.current_roth_percent / self.current_traditional_percent
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        let fields = [
            ("current_salary", self.current_salary),
            ("current_traditional_percent", self.current_traditional_percent),
            ("current_roth_percent", self.current_roth_percent),
            ("new_salary", self.new_salary),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SolveError::InvalidInput(format!("{name} must be finite")));
            }
        }
        if self.current_salary <= 0.0 {
            return Err(SolveError::InvalidInput(
                "current_salary must be > 0".to_string(),
            ));
        }
        if self.new_salary <= 0.0 {
            return Err(SolveError::InvalidInput("new_salary must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.current_traditional_percent) {
            return Err(SolveError::InvalidInput(
                "current_traditional_percent must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.current_roth_percent) {
            return Err(SolveError::InvalidInput(
                "current_roth_percent must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub new_traditional_percent: f64,
    pub new_roth_percent: f64,
    pub new_take_home: f64,
}

/// Both real roots of the take-home quadratic, `x1` taking `+sqrt(delta)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roots {
    pub x1: f64,
    pub x2: f64,
}
