use serde_json::Value;

/// What code driving a form needs from a presenter.
///
/// Both [`Presenter`](crate::Presenter) and [`MockPresenter`](crate::MockPresenter)
/// implement it, so collaborators written against this trait can be tested with
/// the mock.
pub trait FormPresenter {
    /// Value submitted for `field`, `None` when there is none to read
    fn value(&self, field: &str) -> Option<&Value>;

    fn is_valid(&mut self) -> bool;

    fn is_invalid(&mut self) -> bool {
        !self.is_valid()
    }

    fn add_error(&mut self, field: &str, message: &str);

    /// Fold in errors reported elsewhere, e.g. by a domain object that failed
    /// to save
    fn add_errors<I, F, M>(&mut self, errors: I)
    where
        Self: Sized,
        I: IntoIterator<Item = (F, M)>,
        F: AsRef<str>,
        M: AsRef<str>,
    {
        for (field, message) in errors {
            self.add_error(field.as_ref(), message.as_ref());
        }
    }

    fn has_no_errors(&self) -> bool;

    fn has_error(&self, field: &str, message: &str) -> bool;
}
