use crate::naming::Naming;

/// Conversion hooks a form-rendering layer uses to decide how to treat an
/// object: whether it is stored, what identifies it, and which partial
/// renders it.
pub trait Conversion: Naming {
    fn is_persisted(&self) -> bool;

    fn to_model(&self) -> &Self
    where
        Self: Sized,
    {
        self
    }

    fn to_key(&self) -> Option<Vec<String>>;

    /// Key parts joined with `-`, only for persisted objects
    fn to_param(&self) -> Option<String> {
        if !self.is_persisted() {
            return None;
        }
        self.to_key().map(|key| key.join("-"))
    }

    /// `"<collection>/<element>"`, e.g. `"sign_ups/sign_up"`
    fn to_partial_path(&self) -> Option<String>
    where
        Self: Sized,
    {
        Self::model_name().map(|name| format!("{}/{}", name.collection, name.element))
    }
}
