use super::{EntryError, Inputs};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Step {
    CurrentSalary,
    TraditionalContribution,
    RothContribution,
    NewSalary,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Currency,
    Percent,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::CurrentSalary,
        Step::TraditionalContribution,
        Step::RothContribution,
        Step::NewSalary,
    ];

    pub fn next(self) -> Option<Step> {
        match self {
            Step::CurrentSalary => Some(Step::TraditionalContribution),
            Step::TraditionalContribution => Some(Step::RothContribution),
            Step::RothContribution => Some(Step::NewSalary),
            Step::NewSalary => None,
        }
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn question(self) -> &'static str {
        match self {
            Step::CurrentSalary => "What is your current total yearly salary?",
            Step::TraditionalContribution => {
                "What percent of your salary do you currently contribute to a traditional 401k?"
            }
            Step::RothContribution => {
                "What percent of your salary do you currently contribute to a Roth IRA?"
            }
            Step::NewSalary => "What is your new total yearly salary after your raise?",
        }
    }

    pub fn kind(self) -> EntryKind {
        match self {
            Step::CurrentSalary | Step::NewSalary => EntryKind::Currency,
            Step::TraditionalContribution | Step::RothContribution => EntryKind::Percent,
        }
    }

    fn index(self) -> usize {
        match self {
            Step::CurrentSalary => 0,
            Step::TraditionalContribution => 1,
            Step::RothContribution => 2,
            Step::NewSalary => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    Next(Step),
    Complete(Inputs),
}

/// Collects the four answers in order. Answers are kept in display units
/// (whole percents) until completion, after which the wizard starts over.
#[derive(Debug, Clone)]
pub struct Wizard {
    step: Step,
    answers: [Option<f64>; 4],
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: Step::CurrentSalary,
            answers: [None; 4],
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn submit(&mut self, raw: &str) -> Result<Progress, EntryError> {
        let value = parse_entry(self.step.kind(), raw)?;
        self.answers[self.step.index()] = Some(value);

        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(Progress::Next(next))
            }
            None => {
                let inputs = self.inputs();
                self.reset();
                Ok(Progress::Complete(inputs))
            }
        }
    }

    fn inputs(&self) -> Inputs {
        let answer = |step: Step| self.answers[step.index()].unwrap_or(0.0);
        Inputs {
            current_salary: answer(Step::CurrentSalary),
            current_traditional_percent: answer(Step::TraditionalContribution) / 100.0,
            current_roth_percent: answer(Step::RothContribution) / 100.0,
            new_salary: answer(Step::NewSalary),
        }
    }
}

pub fn parse_entry(kind: EntryKind, raw: &str) -> Result<f64, EntryError> {
    let text: String = raw.trim().chars().filter(|ch| *ch != ',').collect();
    if text.is_empty() {
        return Err(EntryError::Empty);
    }

    match kind {
        EntryKind::Percent => {
            let percent = match text.parse::<i64>() {
                Ok(percent) => percent,
                Err(_) if text.parse::<f64>().is_ok() => {
                    return Err(EntryError::PercentOutOfRange(raw.trim().to_string()));
                }
                Err(_) => return Err(EntryError::NotANumber(raw.trim().to_string())),
            };
            if !(0..=100).contains(&percent) {
                return Err(EntryError::PercentOutOfRange(raw.trim().to_string()));
            }
            Ok(percent as f64)
        }
        EntryKind::Currency => {
            let amount = text
                .parse::<f64>()
                .map_err(|_| EntryError::NotANumber(raw.trim().to_string()))?;
            if !amount.is_finite() {
                return Err(EntryError::NotANumber(raw.trim().to_string()));
            }
            if amount < 0.0 {
                return Err(EntryError::NegativeAmount(raw.trim().to_string()));
            }
            Ok(amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_run_in_order_and_end_after_new_salary() {
        let mut step = Step::CurrentSalary;
        let mut visited = vec![step];
        while let Some(next) = step.next() {
            visited.push(next);
            step = next;
        }
        assert_eq!(visited, Step::ALL.to_vec());
        assert!(Step::NewSalary.is_last());
        assert!(!Step::RothContribution.is_last());
    }

    #[test]
    fn percent_steps_use_percent_entries() {
        assert_eq!(Step::CurrentSalary.kind(), EntryKind::Currency);
        assert_eq!(Step::TraditionalContribution.kind(), EntryKind::Percent);
        assert_eq!(Step::RothContribution.kind(), EntryKind::Percent);
        assert_eq!(Step::NewSalary.kind(), EntryKind::Currency);
    }

    #[test]
    fn wizard_collects_answers_and_converts_percents() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.submit("100,000"),
            Ok(Progress::Next(Step::TraditionalContribution))
        );
        assert_eq!(wizard.submit("10"), Ok(Progress::Next(Step::RothContribution)));
        assert_eq!(wizard.submit(" 5 "), Ok(Progress::Next(Step::NewSalary)));

        let progress = wizard.submit("110000").expect("last entry is valid");
        assert_eq!(
            progress,
            Progress::Complete(Inputs {
                current_salary: 100_000.0,
                current_traditional_percent: 0.10,
                current_roth_percent: 0.05,
                new_salary: 110_000.0,
            })
        );
    }

    #[test]
    fn completion_starts_a_fresh_session() {
        let mut wizard = Wizard::new();
        for answer in ["100000", "10", "5"] {
            wizard.submit(answer).expect("valid entry");
        }
        assert!(matches!(wizard.submit("110000"), Ok(Progress::Complete(_))));
        assert_eq!(wizard.step(), Step::CurrentSalary);

        assert_eq!(
            wizard.submit("120000"),
            Ok(Progress::Next(Step::TraditionalContribution))
        );
    }

    #[test]
    fn rejected_entry_keeps_the_current_step() {
        let mut wizard = Wizard::new();
        wizard.submit("50000").expect("valid salary");

        let err = wizard.submit("101").expect_err("percent above 100");
        assert_eq!(err, EntryError::PercentOutOfRange("101".to_string()));
        assert_eq!(wizard.step(), Step::TraditionalContribution);
    }

    #[test]
    fn reset_returns_to_first_step() {
        let mut wizard = Wizard::new();
        wizard.submit("50000").expect("valid salary");
        wizard.submit("6").expect("valid percent");

        wizard.reset();
        assert_eq!(wizard.step(), Step::CurrentSalary);
    }

    #[test]
    fn parse_entry_rejects_bad_values() {
        assert_eq!(parse_entry(EntryKind::Currency, "  "), Err(EntryError::Empty));
        assert_eq!(
            parse_entry(EntryKind::Currency, "abc"),
            Err(EntryError::NotANumber("abc".to_string()))
        );
        assert_eq!(
            parse_entry(EntryKind::Currency, "-5"),
            Err(EntryError::NegativeAmount("-5".to_string()))
        );
        assert_eq!(
            parse_entry(EntryKind::Percent, "12.5"),
            Err(EntryError::PercentOutOfRange("12.5".to_string()))
        );
        assert_eq!(
            parse_entry(EntryKind::Percent, "abc"),
            Err(EntryError::NotANumber("abc".to_string()))
        );
        assert_eq!(
            parse_entry(EntryKind::Percent, "-1"),
            Err(EntryError::PercentOutOfRange("-1".to_string()))
        );
    }

    #[test]
    fn parse_entry_accepts_percent_bounds_and_grouped_amounts() {
        assert_eq!(parse_entry(EntryKind::Percent, "0"), Ok(0.0));
        assert_eq!(parse_entry(EntryKind::Percent, "100"), Ok(100.0));
        assert_eq!(parse_entry(EntryKind::Currency, "1,234,567"), Ok(1_234_567.0));
        assert_eq!(parse_entry(EntryKind::Currency, "72500.50"), Ok(72_500.5));
    }
}
