use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;
use tracing::{debug, trace};
use validation::{Errors, Record, Validator};

use crate::conversion::Conversion;
use crate::error::PresenterError;
use crate::form::FormPresenter;
use crate::naming::{self, ModelName, Naming};

pub(crate) static NULL: Value = Value::Null;

/// Marker for presenters that do not declare their own type. All of them share
/// one model name.
pub enum Anonymous {}

/// Sits between a submitted form and the models behind it.
///
/// A presenter holds the values for a fixed, ordered set of declared fields,
/// runs an optional [`Validator`] over them, and collects errors from both the
/// validator and any domain objects the caller merges in.
///
/// `K` is a marker type naming the kind of presenter. The model name is a
/// property of `K`, not of the instance; see [`Presenter::model_name`].
///
/// ```
/// use presenters::Presenter;
///
/// let mut sign_up: Presenter = Presenter::builder("sign_up")
///     .fields(["account_name", "email"])
///     .build()?
///     .with_params([("account_name", "liaison"), ("email", "team@example.com")])?;
///
/// assert_eq!(sign_up["account_name"], "liaison");
/// assert!(sign_up.is_valid());
/// # Ok::<(), presenters::PresenterError>(())
/// ```
pub struct Presenter<K = Anonymous> {
    fields: Vec<String>,
    values: HashMap<String, Value>,
    errors: Errors,
    validator: Option<Box<dyn Validator>>,
    _kind: PhantomData<fn() -> K>,
}

/// Declares the fields and validator of a [`Presenter`]
pub struct PresenterBuilder<K = Anonymous> {
    model_name: String,
    fields: Vec<String>,
    validator: Option<Box<dyn Validator>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: 'static> PresenterBuilder<K> {
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Register the model name for `K` and create the presenter
    pub fn build(self) -> Result<Presenter<K>, PresenterError> {
        if self.model_name.trim().is_empty() {
            return Err(PresenterError::BlankModelName);
        }
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].contains(field) {
                return Err(PresenterError::DuplicateField {
                    field: field.clone(),
                });
            }
        }

        naming::register::<K>(&self.model_name);
        debug!(
            kind = type_name::<K>(),
            model_name = %self.model_name,
            fields = ?self.fields,
            has_validator = self.validator.is_some(),
            "presenter constructed"
        );

        Ok(Presenter {
            fields: self.fields,
            values: HashMap::new(),
            errors: Errors::new(),
            validator: self.validator,
            _kind: PhantomData,
        })
    }
}

impl<K: 'static> Presenter<K> {
    pub fn builder(model_name: impl Into<String>) -> PresenterBuilder<K> {
        PresenterBuilder {
            model_name: model_name.into(),
            fields: Vec::new(),
            validator: None,
            _kind: PhantomData,
        }
    }

    /// A presenter with no fields and no validator
    pub fn new(model_name: impl Into<String>) -> Result<Self, PresenterError> {
        Self::builder(model_name).build()
    }

    /// Name registered by the most recent construction of any `Presenter<K>`
    pub fn model_name() -> Option<ModelName> {
        naming::lookup::<K>()
    }

    /// Declared field names, in declaration order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn declares(&self, field: &str) -> bool {
        self.fields.iter().any(|declared| declared == field)
    }

    /// Current value of a declared field. Unset fields read as `null`.
    pub fn get(&self, field: &str) -> Result<&Value, PresenterError> {
        if !self.declares(field) {
            return Err(PresenterError::unknown_field(field));
        }
        Ok(self.values.get(field).unwrap_or(&NULL))
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), PresenterError> {
        if !self.declares(field) {
            return Err(PresenterError::unknown_field(field));
        }
        trace!(field, "presenter field assigned");
        self.values.insert(field.to_string(), value.into());
        Ok(())
    }

    /// Assign every submitted param through its field's setter.
    ///
    /// Fails on the first param that names an undeclared field.
    pub fn with_params<I, F, V>(mut self, params: I) -> Result<Self, PresenterError>
    where
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<Value>,
    {
        for (field, value) in params {
            self.set(field.as_ref(), value)?;
        }
        Ok(self)
    }

    /// `(field, value)` pairs in declaration order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            fields: self.fields.iter(),
            values: &self.values,
        }
    }

    /// Declared values as a JSON object
    pub fn to_map(&self) -> Map<String, Value> {
        self.iter()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect()
    }

    /// Deserialize the declared values into a typed struct
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, PresenterError> {
        Ok(serde_json::from_value(Value::Object(self.to_map()))?)
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Direct access for callers that need to reset or prune errors
    pub fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }

    /// Append each `(field, message)` pair to this presenter's errors
    pub fn add_errors<I, F, M>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (F, M)>,
        F: Into<String>,
        M: Into<String>,
    {
        for (field, message) in errors {
            let (field, message) = (field.into(), message.into());
            trace!(field = %field, message = %message, "error merged into presenter");
            self.errors.add(field, message);
        }
    }

    /// Run the validator, if any, and append what it reports.
    ///
    /// Returns whether the presenter has no errors afterwards. Errors from
    /// earlier runs or merges are kept.
    pub fn validate(&mut self) -> bool {
        let outcome = match &self.validator {
            Some(validator) => validator.validate(&*self, &self.fields),
            None => Ok(()),
        };
        if let Err(found) = outcome {
            self.errors.merge(found);
        }

        let valid = self.errors.is_empty();
        debug!(
            kind = type_name::<K>(),
            valid,
            error_count = self.errors.len(),
            "presenter validated"
        );
        valid
    }

    pub fn is_valid(&mut self) -> bool {
        self.validate()
    }

    pub fn is_invalid(&mut self) -> bool {
        !self.validate()
    }
}

impl<K> fmt::Debug for Presenter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("kind", &type_name::<K>())
            .field("fields", &self.fields)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

/// Iterator over a presenter's `(field, value)` pairs
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    fields: std::slice::Iter<'a, String>,
    values: &'a HashMap<String, Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let field = self.fields.next()?;
        Some((field.as_str(), self.values.get(field).unwrap_or(&NULL)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.fields.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a, K: 'static> IntoIterator for &'a Presenter<K> {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: 'static> Index<&str> for Presenter<K> {
    type Output = Value;

    /// Panics when `field` was not declared; use [`Presenter::get`] to handle that case.
    fn index(&self, field: &str) -> &Value {
        match self.get(field) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<K: 'static> Record for Presenter<K> {
    fn read_attribute(&self, field: &str) -> Option<&Value> {
        self.get(field).ok()
    }
}

impl<K: 'static> Naming for Presenter<K> {
    fn model_name() -> Option<ModelName> {
        Presenter::<K>::model_name()
    }
}

impl<K: 'static> Conversion for Presenter<K> {
    fn is_persisted(&self) -> bool {
        false
    }

    fn to_key(&self) -> Option<Vec<String>> {
        None
    }
}

impl<K: 'static> FormPresenter for Presenter<K> {
    fn value(&self, field: &str) -> Option<&Value> {
        self.get(field).ok()
    }

    fn is_valid(&mut self) -> bool {
        self.validate()
    }

    fn add_error(&mut self, field: &str, message: &str) {
        Presenter::add_errors(self, [(field, message)]);
    }

    fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    fn has_error(&self, field: &str, message: &str) -> bool {
        self.errors.contains(field, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        captured_logs, failing_validator, succeeding_validator, RecordingValidator,
    };
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_handles_naming() {
        enum SignUp {}
        let _presenter = Presenter::<SignUp>::new("sign_up").unwrap();
        assert_eq!(Presenter::<SignUp>::model_name().unwrap().singular, "sign_up");
    }

    #[test]
    fn test_naming_trait_agrees_with_inherent_model_name() {
        enum Invite {}
        assert_eq!(<Presenter<Invite> as Naming>::model_name(), None);

        let _presenter = Presenter::<Invite>::new("Admin::AccountInvite").unwrap();
        let through_trait = <Presenter<Invite> as Naming>::model_name().unwrap();
        assert_eq!(Some(through_trait.clone()), Presenter::<Invite>::model_name());
        assert_eq!(through_trait.param_key, "admin_account_invite");
    }

    #[test]
    fn test_is_a_conversion() {
        enum SignUp {}
        let presenter = Presenter::<SignUp>::new("sign_up").unwrap();

        assert!(!presenter.is_persisted());
        assert!(std::ptr::eq(presenter.to_model(), &presenter));
        assert_eq!(presenter.to_key(), None);
        assert_eq!(presenter.to_param(), None);
        assert_eq!(presenter.to_partial_path().as_deref(), Some("sign_ups/sign_up"));
    }

    #[test]
    fn test_latest_model_name_wins_for_a_type() {
        enum Shared {}
        let _first = Presenter::<Shared>::new("first_form").unwrap();
        let _second = Presenter::<Shared>::new("second_form").unwrap();

        assert_eq!(Presenter::<Shared>::model_name().unwrap().singular, "second_form");
    }

    #[test]
    fn test_model_names_do_not_leak_between_types() {
        enum Foo {}
        enum Bar {}
        let _foo = Presenter::<Foo>::new("foo").unwrap();
        let _bar = Presenter::<Bar>::new("bar").unwrap();

        assert_eq!(Presenter::<Foo>::model_name().unwrap().singular, "foo");
        assert_eq!(Presenter::<Bar>::model_name().unwrap().singular, "bar");
    }

    #[test]
    fn test_fields_are_per_instance() {
        let mut foo: Presenter = Presenter::builder("foo").field("foo").build().unwrap();
        let mut bar: Presenter = Presenter::builder("bar").field("bar").build().unwrap();

        assert!(foo.set("foo", "x").is_ok());
        assert!(bar.set("bar", "y").is_ok());
        assert!(matches!(
            foo.set("bar", "y"),
            Err(PresenterError::UnknownField { field }) if field == "bar"
        ));
        assert!(matches!(bar.get("foo"), Err(PresenterError::UnknownField { .. })));
    }

    #[test]
    fn test_no_fields_means_nothing_to_read() {
        let presenter: Presenter = Presenter::new("empty").unwrap();
        assert!(presenter.fields().is_empty());
        assert_eq!(presenter.iter().count(), 0);
        assert!(presenter.get("anything").is_err());
    }

    #[test]
    fn test_unset_fields_read_as_null() {
        let presenter: Presenter = Presenter::builder("sign_up").fields(["a"]).build().unwrap();
        assert_eq!(presenter.get("a").unwrap(), &Value::Null);
    }

    #[test]
    fn test_construction_misuse_fails_fast() {
        let duplicate = Presenter::<Anonymous>::builder("sign_up").fields(["a", "b", "a"]).build();
        assert!(matches!(duplicate, Err(PresenterError::DuplicateField { field }) if field == "a"));

        let blank = Presenter::<Anonymous>::new("  ");
        assert!(matches!(blank, Err(PresenterError::BlankModelName)));
    }

    #[test]
    fn test_valid_by_default() {
        let mut presenter: Presenter = Presenter::new("sign_up").unwrap();
        assert!(presenter.is_valid());
        assert!(presenter.errors().is_empty());
    }

    #[test]
    fn test_runs_failing_validator_with_declared_fields() {
        let recorder = RecordingValidator::failing();
        let mut presenter: Presenter = Presenter::builder("sign_up")
            .fields(["a", "b"])
            .validator(recorder.clone())
            .build()
            .unwrap();

        assert!(presenter.is_invalid());
        assert!(!presenter.errors().is_empty());
        assert_eq!(presenter.errors().get("base"), ["invalid"]);
        assert_eq!(recorder.seen_attributes(), [vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_runs_succeeding_validator() {
        let mut presenter: Presenter = Presenter::builder("sign_up")
            .validator(succeeding_validator())
            .build()
            .unwrap();

        assert!(presenter.is_valid());
        assert!(presenter.errors().is_empty());
    }

    #[test]
    fn test_revalidation_appends() {
        let mut presenter: Presenter = Presenter::builder("sign_up")
            .validator(failing_validator())
            .build()
            .unwrap();

        presenter.validate();
        presenter.validate();
        assert_eq!(presenter.errors().get("base"), ["invalid", "invalid"]);
    }

    #[test]
    fn test_validator_reads_current_values() {
        let mut presenter: Presenter = Presenter::builder("sign_up")
            .fields(["email"])
            .validator(validation::Presence::new())
            .build()
            .unwrap();

        assert!(!presenter.is_valid());
        assert_eq!(presenter.errors().get("email"), ["can't be blank"]);

        presenter.errors_mut().clear();
        presenter.set("email", "team@example.com").unwrap();
        assert!(presenter.is_valid());
    }

    #[test]
    fn test_add_errors_accumulates() {
        let mut presenter: Presenter = Presenter::new("sign_up").unwrap();
        presenter.add_errors([("name", "can't be blank")]);

        assert!(!presenter.is_valid());
        assert!(presenter.errors().contains("name", "can't be blank"));

        presenter.add_errors([("name", "is too short")]);
        assert_eq!(presenter.errors().get("name"), ["can't be blank", "is too short"]);
    }

    #[test]
    fn test_add_errors_from_another_collection() {
        let mut account_errors = Errors::new();
        account_errors.add("account_name", "has already been taken");
        account_errors.add(validation::BASE, "could not be saved");

        let mut presenter: Presenter = Presenter::new("sign_up").unwrap();
        presenter.add_errors(&account_errors);

        assert_eq!(presenter.errors(), &account_errors);
    }

    fn filled() -> Presenter {
        Presenter::builder("sign_up")
            .fields(["a", "b"])
            .build()
            .unwrap()
            .with_params([("a", "hello"), ("b", "goodbye")])
            .unwrap()
    }

    #[test]
    fn test_iterates_in_declaration_order() {
        let presenter = filled();
        let pairs: Vec<_> = presenter.iter().collect();
        assert_eq!(pairs, [("a", &json!("hello")), ("b", &json!("goodbye"))]);

        // restartable
        assert_eq!(presenter.iter().len(), 2);
        assert_eq!((&presenter).into_iter().count(), 2);
    }

    #[test]
    fn test_is_indexable() {
        let presenter = filled();
        assert_eq!(presenter["a"], "hello");
        assert_eq!(presenter.get("b").unwrap(), "goodbye");
    }

    #[test]
    #[should_panic(expected = "unknown field `c`")]
    fn test_indexing_undeclared_field_panics() {
        let presenter = filled();
        let _ = &presenter["c"];
    }

    #[test]
    fn test_supports_sequence_combinators() {
        let presenter = filled();
        let rejected: Vec<_> = presenter.iter().filter(|(field, _)| *field != "a").collect();
        assert_eq!(rejected, [("b", &json!("goodbye"))]);

        let joined = presenter
            .iter()
            .fold(String::new(), |acc, (_, value)| acc + value.as_str().unwrap_or(""));
        assert_eq!(joined, "hellogoodbye");
    }

    #[test]
    fn test_with_params_rejects_unknown_fields() {
        let result = Presenter::<Anonymous>::builder("sign_up")
            .fields(["a"])
            .build()
            .unwrap()
            .with_params([("a", "x"), ("z", "y")]);

        assert!(matches!(result, Err(PresenterError::UnknownField { field }) if field == "z"));
    }

    #[test]
    fn test_with_params_from_json_object() {
        let params = json!({ "a": "hello", "b": 3 });
        let presenter: Presenter = Presenter::builder("sign_up")
            .fields(["a", "b"])
            .build()
            .unwrap()
            .with_params(params.as_object().cloned().unwrap())
            .unwrap();

        assert_eq!(presenter.to_map(), *params.as_object().unwrap());
    }

    #[test]
    fn test_extract_typed_values() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Greeting {
            a: String,
            b: Option<String>,
        }

        let greeting: Greeting = filled().extract().unwrap();
        assert_eq!(
            greeting,
            Greeting {
                a: "hello".to_string(),
                b: Some("goodbye".to_string())
            }
        );

        let partial: Presenter = Presenter::builder("sign_up").fields(["a", "b"]).build().unwrap();
        assert!(matches!(partial.extract::<Greeting>(), Err(PresenterError::Extract(_))));
    }

    #[test]
    fn test_form_presenter_contract() {
        fn reject(form: &mut impl FormPresenter) {
            form.add_errors([("a", "is taken")]);
        }

        let mut presenter = filled();
        assert!(presenter.has_no_errors());
        assert_eq!(FormPresenter::value(&presenter, "a"), Some(&json!("hello")));
        assert_eq!(FormPresenter::value(&presenter, "c"), None);

        reject(&mut presenter);
        assert!(presenter.has_error("a", "is taken"));
        assert!(FormPresenter::is_invalid(&mut presenter));
    }

    #[test]
    fn test_form_presenter_add_error_is_traced() {
        let mut presenter = filled();
        let logs = captured_logs(|| {
            FormPresenter::add_error(&mut presenter, "a", "is taken");
        });

        assert!(presenter.has_error("a", "is taken"));
        assert!(logs.contains("error merged into presenter"), "{}", logs);
        assert!(logs.contains("is taken"), "{}", logs);
    }
}
