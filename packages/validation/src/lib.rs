pub mod errors;
pub mod inflections;
pub mod validator;
pub mod validators;

#[cfg(test)]
mod test_helpers;

// Re-export common types
pub use errors::{Errors, BASE};
pub use validator::{from_fn, FnValidator, Record, Validator, Validators};
pub use validators::{Confirmation, EmailFormat, Length, Presence};
