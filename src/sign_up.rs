use presenters::{Errors, FormPresenter, Presenter, PresenterError, BASE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use validation::{Confirmation, EmailFormat, Length, Presence, Validators};

/// Marker type for the sign-up form
pub enum SignUp {}

pub const FIELDS: [&str; 4] = ["account_name", "email", "password", "password_confirmation"];

pub fn presenter() -> Result<Presenter<SignUp>, PresenterError> {
    let validator = Validators::new()
        .with(Presence::of(["account_name", "email", "password"]))
        .with(EmailFormat::of(["email"]))
        .with(Length::of(["account_name"]).maximum(32))
        .with(Length::of(["password"]).minimum(8))
        .with(Confirmation::of("password"));

    Presenter::builder("sign_up")
        .fields(FIELDS)
        .validator(validator)
        .build()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewAccount {
    pub account_name: String,
    pub email: String,
    pub password: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait AccountStore {
    fn create(&self, account: &NewAccount) -> Result<(), Errors>;
}

/// Keeps account names and emails in memory; each can only be used once.
/// Names and emails are compared case-insensitively.
pub struct MemoryAccountStore {
    names: RefCell<HashSet<String>>,
    emails: RefCell<HashSet<String>>,
}

impl MemoryAccountStore {
    pub fn new(reserved: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: RefCell::new(
                reserved
                    .into_iter()
                    .map(|name| name.trim().to_lowercase())
                    .collect(),
            ),
            emails: RefCell::new(HashSet::new()),
        }
    }
}

impl AccountStore for MemoryAccountStore {
    fn create(&self, account: &NewAccount) -> Result<(), Errors> {
        let name = account.account_name.trim().to_lowercase();
        let email = account.email.trim().to_lowercase();

        let mut errors = Errors::new();
        if self.names.borrow().contains(&name) {
            errors.add("account_name", "has already been taken");
        }
        if self.emails.borrow().contains(&email) {
            errors.add("email", "has already been taken");
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        self.names.borrow_mut().insert(name);
        self.emails.borrow_mut().insert(email);
        Ok(())
    }
}

/// Create the account, folding the store's errors into the form when it
/// refuses.
pub fn save(form: &mut impl FormPresenter, account: &NewAccount, store: &dyn AccountStore) -> bool {
    match store.create(account) {
        Ok(()) => true,
        Err(errors) => {
            tracing::warn!(errors = %errors, "account store rejected sign up");
            form.add_errors(&errors);
            false
        }
    }
}

/// Mark every account field that holds something other than a string. Falls
/// back to a base error when no single field is to blame.
fn reject_mistyped(presenter: &mut Presenter<SignUp>) {
    let mistyped: Vec<String> = ["account_name", "email", "password"]
        .into_iter()
        .filter(|field| presenter.get(field).is_ok_and(|value| !value.is_string()))
        .map(String::from)
        .collect();

    if mistyped.is_empty() {
        presenter.add_errors([(BASE, "is invalid")]);
    } else {
        presenter.add_errors(mistyped.into_iter().map(|field| (field, "is invalid")));
    }
}

/// Form state handed back for redisplay
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub param_key: String,
    pub valid: bool,
    pub values: Map<String, Value>,
    pub errors: Errors,
    pub full_messages: Vec<String>,
}

pub fn run(params: Map<String, Value>, store: &dyn AccountStore) -> Result<Outcome, PresenterError> {
    let mut presenter = presenter()?.with_params(params)?;

    let mut valid = presenter.is_valid();
    if valid {
        valid = match presenter.extract::<NewAccount>() {
            Ok(account) => save(&mut presenter, &account, store),
            Err(err) => {
                tracing::warn!(error = %err, "sign up params have the wrong shape");
                reject_mistyped(&mut presenter);
                false
            }
        };
    }

    let param_key = Presenter::<SignUp>::model_name()
        .map(|name| name.param_key)
        .unwrap_or_default();
    // Passwords are never echoed back into the form
    let values = presenter
        .iter()
        .filter(|(field, _)| !field.starts_with("password"))
        .map(|(field, value)| (field.to_string(), value.clone()))
        .collect();

    Ok(Outcome {
        param_key,
        valid,
        values,
        full_messages: presenter.errors().full_messages(),
        errors: presenter.errors().clone(),
    })
}
