use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const DEFAULT_MINIMUM_AGE: i32 = 12;
const DEFAULT_ADULT_AGE: i32 = 18;
const DEFAULT_MAXIMUM_AGE: i32 = 100;

/// Eligibility bucket an age falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeClass {
    /// No birth date entered yet.
    NotProvided,
    InvalidDate,
    BelowMinimum,
    Implausible,
    GuardianRequired,
    Eligible,
}

/// Outcome of evaluating a birth date. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeValidationResult {
    pub is_valid: bool,
    pub age: i32,
    pub needs_guardian_authorization: bool,
    pub message: String,
    pub class: AgeClass,
}

impl AgeValidationResult {
    /// Result for an empty birth date field; it must not block the rest of the form.
    pub fn neutral() -> Self {
        Self {
            is_valid: true,
            age: 0,
            needs_guardian_authorization: false,
            message: String::new(),
            class: AgeClass::NotProvided,
        }
    }
}

impl Default for AgeValidationResult {
    fn default() -> Self {
        Self::neutral()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("age thresholds must satisfy minimum <= adult <= maximum, got {minimum}/{adult}/{maximum}")]
pub struct AgePolicyError {
    pub minimum: i32,
    pub adult: i32,
    pub maximum: i32,
}

/// Age thresholds for participation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgePolicy {
    minimum: i32,
    adult: i32,
    maximum: i32,
}

impl AgePolicy {
    pub fn new(minimum: i32, adult: i32, maximum: i32) -> Result<Self, AgePolicyError> {
        if minimum <= adult && adult <= maximum {
            Ok(Self {
                minimum,
                adult,
                maximum,
            })
        } else {
            Err(AgePolicyError {
                minimum,
                adult,
                maximum,
            })
        }
    }

    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    pub fn adult(&self) -> i32 {
        self.adult
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    /// Evaluates an ISO `YYYY-MM-DD` birth date as of `as_of`.
    pub fn evaluate(&self, birth_date: &str, as_of: NaiveDate) -> AgeValidationResult {
        let trimmed = birth_date.trim();
        if trimmed.is_empty() {
            return AgeValidationResult::neutral();
        }

        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(birth) => self.classify(completed_years(birth, as_of)),
            Err(_) => AgeValidationResult {
                is_valid: false,
                age: 0,
                needs_guardian_authorization: false,
                message: "Data de nascimento inválida.".to_string(),
                class: AgeClass::InvalidDate,
            },
        }
    }

    /// Buckets an age, checking the lower bound first.
    pub fn classify(&self, age: i32) -> AgeValidationResult {
        let (class, message) = if age < self.minimum {
            (
                AgeClass::BelowMinimum,
                format!(
                    "Idade mínima para participação é de {} anos completos.",
                    self.minimum
                ),
            )
        } else if age > self.maximum {
            (AgeClass::Implausible, "Idade não permitida.".to_string())
        } else if age < self.adult {
            (
                AgeClass::GuardianRequired,
                format!(
                    "Menor de {} anos: Será necessária autorização assinada pelo responsável legal no dia do evento.",
                    self.adult
                ),
            )
        } else {
            (
                AgeClass::Eligible,
                "Idade válida para participação.".to_string(),
            )
        };

        AgeValidationResult {
            is_valid: matches!(class, AgeClass::GuardianRequired | AgeClass::Eligible),
            age,
            needs_guardian_authorization: class == AgeClass::GuardianRequired,
            message,
            class,
        }
    }
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self {
            minimum: DEFAULT_MINIMUM_AGE,
            adult: DEFAULT_ADULT_AGE,
            maximum: DEFAULT_MAXIMUM_AGE,
        }
    }
}

/// Whole years elapsed between `birth` and `as_of`; negative for future birth dates.
pub fn completed_years(birth: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut age = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Evaluates a birth date against the default policy.
pub fn evaluate_birth_date(birth_date: &str, as_of: NaiveDate) -> AgeValidationResult {
    AgePolicy::default().evaluate(birth_date, as_of)
}
