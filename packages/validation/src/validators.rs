//! Stock validators for common form checks.
//!
//! Each validator either targets the fields it was built with or, when built
//! without any, every attribute in the scope it is handed at validation time.

use serde_json::Value;

use crate::errors::Errors;
use crate::inflections::humanize;
use crate::validator::{Record, Validator};

fn targets<'a>(own: &'a [String], attributes: &'a [String]) -> &'a [String] {
    if own.is_empty() {
        attributes
    } else {
        own
    }
}

fn into_result(errors: Errors) -> Result<(), Errors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => false,
    }
}

fn owned(fields: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    fields.into_iter().map(Into::into).collect()
}

/// Fails with "can't be blank" for null, missing, or whitespace-only values
#[derive(Debug, Clone, Default)]
pub struct Presence {
    fields: Vec<String>,
}

impl Presence {
    /// Check every attribute in scope
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { fields: owned(fields) }
    }
}

impl Validator for Presence {
    fn validate(&self, record: &dyn Record, attributes: &[String]) -> Result<(), Errors> {
        let mut errors = Errors::new();
        for field in targets(&self.fields, attributes) {
            if is_blank(record.read_attribute(field)) {
                errors.add(field.as_str(), "can't be blank");
            }
        }
        into_result(errors)
    }
}

/// Basic email shape check. Blank values are left to [`Presence`].
#[derive(Debug, Clone, Default)]
pub struct EmailFormat {
    fields: Vec<String>,
}

impl EmailFormat {
    pub fn of(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { fields: owned(fields) }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    }
}

impl Validator for EmailFormat {
    fn validate(&self, record: &dyn Record, attributes: &[String]) -> Result<(), Errors> {
        let mut errors = Errors::new();
        for field in targets(&self.fields, attributes) {
            let value = record.read_attribute(field);
            if is_blank(value) {
                continue;
            }
            let valid = value.and_then(Value::as_str).is_some_and(|s| looks_like_email(s.trim()));
            if !valid {
                errors.add(field.as_str(), "is invalid");
            }
        }
        into_result(errors)
    }
}

/// Character-count bounds for string values. Blank values are skipped.
#[derive(Debug, Clone, Default)]
pub struct Length {
    fields: Vec<String>,
    minimum: Option<usize>,
    maximum: Option<usize>,
}

impl Length {
    pub fn of(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: owned(fields),
            ..Self::default()
        }
    }

    pub fn minimum(mut self, minimum: usize) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: usize) -> Self {
        self.maximum = Some(maximum);
        self
    }
}

impl Validator for Length {
    fn validate(&self, record: &dyn Record, attributes: &[String]) -> Result<(), Errors> {
        let mut errors = Errors::new();
        for field in targets(&self.fields, attributes) {
            let Some(Value::String(value)) = record.read_attribute(field) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            let count = value.chars().count();
            if let Some(min) = self.minimum.filter(|min| count < *min) {
                errors.add(
                    field.as_str(),
                    format!("is too short (minimum is {} characters)", min),
                );
            }
            if let Some(max) = self.maximum.filter(|max| count > *max) {
                errors.add(
                    field.as_str(),
                    format!("is too long (maximum is {} characters)", max),
                );
            }
        }
        into_result(errors)
    }
}

/// Requires `<field>_confirmation` to equal `<field>`. The message lands on
/// the confirmation field, and only when a confirmation was submitted.
#[derive(Debug, Clone)]
pub struct Confirmation {
    field: String,
}

impl Confirmation {
    pub fn of(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }
}

impl Validator for Confirmation {
    fn validate(&self, record: &dyn Record, _attributes: &[String]) -> Result<(), Errors> {
        let confirmation_field = format!("{}_confirmation", self.field);
        let confirmation = match record.read_attribute(&confirmation_field) {
            None | Some(Value::Null) => return Ok(()),
            Some(value) => value,
        };

        if record.read_attribute(&self.field) == Some(confirmation) {
            Ok(())
        } else {
            Err(Errors::with_message(
                confirmation_field,
                format!("doesn't match {}", humanize(&self.field)),
            ))
        }
    }
}
