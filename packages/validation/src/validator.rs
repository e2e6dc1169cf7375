use serde_json::{Map, Value};
use std::fmt;

use crate::errors::Errors;

/// Read-only view of the values a validator inspects
pub trait Record {
    /// Current value of `field`, or `None` when the record has no such field
    fn read_attribute(&self, field: &str) -> Option<&Value>;
}

impl Record for Map<String, Value> {
    fn read_attribute(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

/// Trait for pluggable validation strategies.
///
/// A validator receives the record under validation and the attribute scope it
/// was registered with, and reports every problem it finds. The caller decides
/// what to do with the returned errors; validators never mutate the record.
pub trait Validator: Send + Sync {
    /// Validate the record and return any validation errors
    fn validate(&self, record: &dyn Record, attributes: &[String]) -> Result<(), Errors>;

    /// Check if the record is valid
    fn is_valid(&self, record: &dyn Record, attributes: &[String]) -> bool {
        self.validate(record, attributes).is_ok()
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn validate(&self, record: &dyn Record, attributes: &[String]) -> Result<(), Errors> {
        (**self).validate(record, attributes)
    }
}

/// Validator backed by a closure, see [`from_fn`]
pub struct FnValidator<F> {
    f: F,
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").finish_non_exhaustive()
    }
}

/// Wrap a closure as a [`Validator`].
///
/// ```
/// use validation::{from_fn, Errors, Validator};
/// use serde_json::Map;
///
/// let always_fails = from_fn(|_, _| Err(Errors::base("invalid")));
/// assert!(!always_fails.is_valid(&Map::new(), &[]));
/// ```
pub fn from_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(&dyn Record, &[String]) -> Result<(), Errors> + Send + Sync,
{
    FnValidator { f }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&dyn Record, &[String]) -> Result<(), Errors> + Send + Sync,
{
    fn validate(&self, record: &dyn Record, attributes: &[String]) -> Result<(), Errors> {
        (self.f)(record, attributes)
    }
}

/// Runs several validators in order and merges everything they report
#[derive(Default)]
pub struct Validators {
    chain: Vec<Box<dyn Validator>>,
}

impl Validators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.chain.push(Box::new(validator));
        self
    }

    pub fn push(&mut self, validator: impl Validator + 'static) {
        self.chain.push(Box::new(validator));
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validators")
            .field("len", &self.chain.len())
            .finish()
    }
}

impl Validator for Validators {
    fn validate(&self, record: &dyn Record, attributes: &[String]) -> Result<(), Errors> {
        let mut errors = Errors::new();
        for validator in &self.chain {
            if let Err(found) = validator.validate(record, attributes) {
                errors.merge(found);
            }
        }
        tracing::trace!(
            validators = self.chain.len(),
            error_count = errors.len(),
            "validator chain finished"
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
