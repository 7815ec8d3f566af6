//! Validation module
//!
//! Field-level rule evaluation. Each failing rule records a [`ValidationError`]
//! keyed by field name; a record with any entry is invalid.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single failed rule for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validation errors keyed by field name
pub type ErrorMap = BTreeMap<String, ValidationError>;

/// Values that can be checked for presence by [`Validation::required`]
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<T: Blank + ?Sized> Blank for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Blank> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.as_ref().map_or(true, Blank::is_blank)
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for bool {
    fn is_blank(&self) -> bool {
        !self
    }
}

impl Blank for serde_json::Value {
    fn is_blank(&self) -> bool {
        crate::value::is_blank(self)
    }
}

macro_rules! impl_blank_for_numbers {
    ($($t:ty),*) => {
        $(impl Blank for $t {
            fn is_blank(&self) -> bool {
                *self == 0 as $t
            }
        })*
    };
}

impl_blank_for_numbers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Per-record validation state
#[derive(Debug, Clone, Default)]
pub struct Validation {
    errors: ErrorMap,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`, replacing any earlier one
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.insert(
            field.to_string(),
            ValidationError {
                field: field.to_string(),
                message: message.into(),
            },
        );
        self
    }

    /// Fails when the value is the zero value of its type
    pub fn required<V: Blank + ?Sized>(&mut self, field: &str, value: &V) -> &mut Self {
        if value.is_blank() {
            self.add_error(field, format!("{} is required", field));
        }
        self
    }

    pub fn min_length(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        let length = value.chars().count();
        if length < min {
            self.add_error(
                field,
                format!("{} must be at least {} characters (got {})", field, min, length),
            );
        }
        self
    }

    pub fn max_length(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let length = value.chars().count();
        if length > max {
            self.add_error(
                field,
                format!("{} must be at most {} characters (got {})", field, max, length),
            );
        }
        self
    }

    /// Inclusive numeric range
    pub fn range<N>(&mut self, field: &str, value: N, min: N, max: N) -> &mut Self
    where
        N: PartialOrd + fmt::Display + Copy,
    {
        if value < min || value > max {
            self.add_error(
                field,
                format!("{} must be between {} and {} (got {})", field, min, max, value),
            );
        }
        self
    }

    /// Record `message` for `field` unless `condition` holds
    pub fn check(&mut self, field: &str, condition: bool, message: impl Into<String>) -> &mut Self {
        if !condition {
            self.add_error(field, message);
        }
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_map(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}
