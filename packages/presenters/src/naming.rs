use dashmap::DashMap;
use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::LazyLock;
use validation::inflections::{demodulize, humanize, pluralize, underscore};

/// Latest model name per presenter type.
///
/// Every construction overwrites its type's entry, so all live instances of a
/// type report whichever name was registered last. Two presenters of the same
/// type built with different names will therefore share one identity.
static IDENTITIES: LazyLock<DashMap<TypeId, String>> = LazyLock::new(DashMap::new);

pub(crate) fn register<K: 'static>(model_name: &str) {
    let previous = IDENTITIES.insert(TypeId::of::<K>(), model_name.to_string());
    if let Some(previous) = previous.filter(|previous| previous != model_name) {
        tracing::warn!(
            kind = type_name::<K>(),
            previous = %previous,
            current = %model_name,
            "presenter model name replaced for every instance of this type"
        );
    }
}

pub(crate) fn lookup<K: 'static>() -> Option<ModelName> {
    IDENTITIES
        .get(&TypeId::of::<K>())
        .map(|entry| ModelName::new(entry.value()))
}

/// Names a form-rendering layer derives from a model name: parameter keys,
/// route helpers, partial paths and translation keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    pub name: String,
    pub singular: String,
    pub plural: String,
    pub element: String,
    pub collection: String,
    pub human: String,
    pub param_key: String,
    pub i18n_key: String,
    pub route_key: String,
    pub singular_route_key: String,
}

impl ModelName {
    pub fn new(name: &str) -> Self {
        let underscored = underscore(name);
        let singular = underscored.replace('/', "_");
        let plural = pluralize(&singular);
        let element = underscore(demodulize(name));
        let human = humanize(&element);
        let collection = pluralize(&underscored);
        let route_key = if plural == singular {
            format!("{}_index", plural)
        } else {
            plural.clone()
        };

        Self {
            name: name.to_string(),
            param_key: singular.clone(),
            singular_route_key: singular.clone(),
            i18n_key: underscored,
            singular,
            plural,
            element,
            collection,
            human,
            route_key,
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Type-level naming, resolved from the latest registered model name
pub trait Naming {
    /// `None` until an instance of the type has been constructed
    fn model_name() -> Option<ModelName>;
}
