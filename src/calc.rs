use serde::Serialize;
use thiserror::Error;

pub const SUBJECTS: [&str; 5] = ["Math", "Physics", "Chemistry", "English", "Computer"];
pub const SUBJECT_COUNT: usize = SUBJECTS.len();
pub const MAX_SCORE: i32 = 100;
pub const MAX_TOTAL: i32 = MAX_SCORE * SUBJECT_COUNT as i32;

pub type Scores = [i32; SUBJECT_COUNT];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter student name.")]
    EmptyName,
    #[error("Please enter all marks (use 0 if none).")]
    MissingScore { field: usize },
    #[error("Please enter numeric marks only.")]
    NotNumeric { field: usize, raw: String },
    #[error("Marks must be between 0 and 100.")]
    OutOfRange { field: usize, value: i32 },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "empty_name",
            ValidationError::MissingScore { .. } => "missing_score",
            ValidationError::NotNumeric { .. } => "not_numeric",
            ValidationError::OutOfRange { .. } => "out_of_range",
        }
    }

    /// Index of the offending subject slot, if the error is about a mark.
    pub fn field(&self) -> Option<usize> {
        match self {
            ValidationError::EmptyName => None,
            ValidationError::MissingScore { field }
            | ValidationError::NotNumeric { field, .. }
            | ValidationError::OutOfRange { field, .. } => Some(*field),
        }
    }

    pub fn subject(&self) -> Option<&'static str> {
        self.field().map(|i| SUBJECTS[i])
    }
}

/// Strips ASCII control characters and spaces from both ends, and nothing
/// else: a no-break space counts as content, a lone `\u{1}` does not.
pub fn trim_field(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub name: String,
    pub scores: Scores,
}

/// Checks the name, then each mark in subject order, stopping at the first
/// bad field.
pub fn validate<S: AsRef<str>>(
    name: &str,
    raw_scores: &[S; SUBJECT_COUNT],
) -> Result<ValidatedInput, ValidationError> {
    let name = trim_field(name);
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let scores = validate_scores(raw_scores)?;
    Ok(ValidatedInput {
        name: name.to_string(),
        scores,
    })
}

pub fn validate_scores<S: AsRef<str>>(
    raw_scores: &[S; SUBJECT_COUNT],
) -> Result<Scores, ValidationError> {
    let mut scores: Scores = [0; SUBJECT_COUNT];
    for (field, raw) in raw_scores.iter().enumerate() {
        let s = trim_field(raw.as_ref());
        if s.is_empty() {
            return Err(ValidationError::MissingScore { field });
        }
        let value: i32 = s.parse().map_err(|_| ValidationError::NotNumeric {
            field,
            raw: s.to_string(),
        })?;
        if !(0..=MAX_SCORE).contains(&value) {
            return Err(ValidationError::OutOfRange { field, value });
        }
        scores[field] = value;
    }
    Ok(scores)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Letter {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Letter {
    pub fn from_percentage(p: f64) -> Self {
        match p {
            p if p >= 90.0 => Letter::APlus,
            p if p >= 80.0 => Letter::A,
            p if p >= 70.0 => Letter::B,
            p if p >= 60.0 => Letter::C,
            p if p >= 50.0 => Letter::D,
            _ => Letter::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Letter::APlus => "A+",
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
            Letter::F => "F",
        }
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour-coding bucket for the result panel. Thresholds are separate from
/// the letter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Mid,
    Low,
}

impl Tier {
    pub fn from_percentage(p: f64) -> Self {
        if p >= 75.0 {
            Tier::High
        } else if p >= 50.0 {
            Tier::Mid
        } else {
            Tier::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Tier::High => "#AAFFAA",
            Tier::Mid => "#FFF59D",
            Tier::Low => "#FFB3B3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeResult {
    pub total: i32,
    pub max_total: i32,
    pub percentage: f64,
    pub letter: Letter,
    pub tier: Tier,
}

impl GradeResult {
    pub fn percentage_2dp(&self) -> String {
        format_percentage(self.percentage)
    }

    pub fn total_label(&self) -> String {
        format!("Total: {} / {}", self.total, self.max_total)
    }

    pub fn percentage_label(&self) -> String {
        format!("Percentage: {}%", self.percentage_2dp())
    }

    pub fn grade_label(&self) -> String {
        format!("Grade: {}", self.letter)
    }
}

pub fn format_percentage(p: f64) -> String {
    format!("{:.2}", p)
}

pub fn compute(scores: &Scores) -> GradeResult {
    let total: i32 = scores.iter().sum();
    // total * 100 is exact, so the single division rounds the same as total / 5.0.
    let percentage = f64::from(total) * 100.0 / f64::from(MAX_TOTAL);
    GradeResult {
        total,
        max_total: MAX_TOTAL,
        percentage,
        letter: Letter::from_percentage(percentage),
        tier: Tier::from_percentage(percentage),
    }
}
