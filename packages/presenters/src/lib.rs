pub mod conversion;
pub mod error;
pub mod form;
pub mod mock_presenter;
pub mod naming;
pub mod presenter;

#[cfg(test)]
pub mod test_helpers;

pub use conversion::Conversion;
pub use error::PresenterError;
pub use form::FormPresenter;
pub use mock_presenter::MockPresenter;
pub use naming::{ModelName, Naming};
pub use presenter::{Anonymous, Iter, Presenter, PresenterBuilder};

// Re-export the validation surface presenters are built with
pub use validation::{Errors, Record, Validator, Validators, BASE};
