//! Request validation: per-field rules collected into a list of field errors.

use crate::error::AppError;
use email_address::EmailAddress;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kind of rule a field violated. The client message is a fixed lookup on this.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Required,
    Min(usize),
    Max(usize),
    Email,
    /// Any other constraint: enumeration membership, uuid format, ranges.
    Invalid,
}

impl Rule {
    pub fn message(&self) -> String {
        match self {
            Rule::Required => "This field is required".to_string(),
            Rule::Min(n) => format!("This field must be at least {} characters long", n),
            Rule::Max(n) => format!("This field must be at most {} characters long", n),
            Rule::Email => "Invalid email address".to_string(),
            Rule::Invalid => "Invalid value".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        FieldError {
            field,
            message: rule.message(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collects every violated rule; `finish` turns a non-empty list into [AppError::Validation].
///
/// Checks on an absent value pass, so optional fields only need the format rules.
/// Use [RequestValidator::required] first for mandatory fields.
#[derive(Debug, Default)]
pub struct RequestValidator {
    errors: Vec<FieldError>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &'static str, rule: Rule) {
        self.errors.push(FieldError::new(field, rule));
    }

    /// Present and, for strings, non-empty.
    pub fn required<T: Presence>(&mut self, field: &'static str, value: &Option<T>) -> bool {
        let ok = value.as_ref().map(Presence::is_present).unwrap_or(false);
        if !ok {
            self.fail(field, Rule::Required);
        }
        ok
    }

    pub fn min_len(&mut self, field: &'static str, value: Option<&str>, min: usize) {
        if let Some(s) = value {
            if s.chars().count() < min {
                self.fail(field, Rule::Min(min));
            }
        }
    }

    pub fn max_len(&mut self, field: &'static str, value: Option<&str>, max: usize) {
        if let Some(s) = value {
            if s.chars().count() > max {
                self.fail(field, Rule::Max(max));
            }
        }
    }

    /// Length in UTF-8 bytes, for limits imposed by byte-oriented consumers such as bcrypt.
    pub fn max_bytes(&mut self, field: &'static str, value: Option<&str>, max: usize) {
        if let Some(s) = value {
            if s.len() > max {
                self.fail(field, Rule::Max(max));
            }
        }
    }

    pub fn email(&mut self, field: &'static str, value: Option<&str>) {
        if let Some(s) = value.filter(|s| !s.is_empty()) {
            if !EmailAddress::is_valid(s) {
                self.fail(field, Rule::Email);
            }
        }
    }

    pub fn uuid(&mut self, field: &'static str, value: Option<&str>) {
        if let Some(s) = value.filter(|s| !s.is_empty()) {
            if uuid::Uuid::parse_str(s).is_err() {
                self.fail(field, Rule::Invalid);
            }
        }
    }

    /// Value must parse as `T` (enumerations).
    pub fn one_of<T: FromStr>(&mut self, field: &'static str, value: Option<&str>) {
        if let Some(s) = value.filter(|s| !s.is_empty()) {
            if s.parse::<T>().is_err() {
                self.fail(field, Rule::Invalid);
            }
        }
    }

    pub fn check(&mut self, field: &'static str, ok: bool) {
        if !ok {
            self.fail(field, Rule::Invalid);
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Whether a decoded value counts as supplied. Empty strings do not.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for i64 {
    fn is_present(&self) -> bool {
        true
    }
}

impl Presence for chrono::NaiveDate {
    fn is_present(&self) -> bool {
        true
    }
}

impl Presence for serde_json::Map<String, serde_json::Value> {
    fn is_present(&self) -> bool {
        true
    }
}

/// A partial-update field: present and non-empty.
pub fn provided<T: Presence>(value: &Option<T>) -> bool {
    value.as_ref().map(Presence::is_present).unwrap_or(false)
}
