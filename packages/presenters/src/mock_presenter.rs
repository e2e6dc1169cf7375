use serde_json::Value;
use std::collections::HashMap;
use std::ops::Index;

use crate::form::FormPresenter;
use crate::presenter::NULL;

/// Stand-in for a [`Presenter`](crate::Presenter) in tests of code that only
/// reads values and reports errors.
///
/// Values and errors are plain maps. Unknown keys read as `null` instead of
/// failing, and [`add_errors`](MockPresenter::add_errors) overwrites rather than
/// appends, so tests can assert exact messages with
/// [`has_errors`](MockPresenter::has_errors).
#[derive(Debug, Clone)]
pub struct MockPresenter {
    valid: bool,
    params: HashMap<String, Value>,
    errors: HashMap<String, String>,
}

impl Default for MockPresenter {
    fn default() -> Self {
        Self {
            valid: true,
            params: HashMap::new(),
            errors: HashMap::new(),
        }
    }
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline validity, combined with the error map by [`is_valid`](Self::is_valid)
    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn with_params<I, F, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<Value>,
    {
        self.params = params
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .collect();
        self
    }

    pub fn with_errors<I, F, M>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = (F, M)>,
        F: Into<String>,
        M: Into<String>,
    {
        self.errors = errors
            .into_iter()
            .map(|(field, message)| (field.into(), message.into()))
            .collect();
        self
    }

    pub fn get(&self, field: &str) -> &Value {
        self.params.get(field).unwrap_or(&NULL)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.valid
    }

    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.errors
    }

    /// Store each message under its field, replacing whatever was there
    pub fn add_errors<I, F, M>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (F, M)>,
        F: Into<String>,
        M: Into<String>,
    {
        for (field, message) in errors {
            self.errors.insert(field.into(), message.into());
        }
    }

    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when every expected field holds exactly the expected message
    pub fn has_errors<I, F, M>(&self, expected: I) -> bool
    where
        I: IntoIterator<Item = (F, M)>,
        F: AsRef<str>,
        M: AsRef<str>,
    {
        expected.into_iter().all(|(field, message)| {
            self.errors
                .get(field.as_ref())
                .is_some_and(|stored| stored == message.as_ref())
        })
    }
}

impl Index<&str> for MockPresenter {
    type Output = Value;

    fn index(&self, field: &str) -> &Value {
        self.get(field)
    }
}

impl FormPresenter for MockPresenter {
    fn value(&self, field: &str) -> Option<&Value> {
        self.params.get(field)
    }

    fn is_valid(&mut self) -> bool {
        MockPresenter::is_valid(self)
    }

    fn add_error(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    fn has_no_errors(&self) -> bool {
        MockPresenter::has_no_errors(self)
    }

    fn has_error(&self, field: &str, message: &str) -> bool {
        self.errors.get(field).is_some_and(|stored| stored == message)
    }
}
