use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inflections::humanize;

/// Key for messages that belong to the record as a whole rather than a field
pub const BASE: &str = "base";

/// Field names mapped to their validation messages, in insertion order.
///
/// Messages are only ever appended; adding a message for a key that already
/// has some keeps the earlier ones in front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Errors {
    messages: IndexMap<String, Vec<String>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error collection with a single field and message
    pub fn with_message(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Create an error collection holding one message under [`BASE`]
    pub fn base(message: impl Into<String>) -> Self {
        Self::with_message(BASE, message)
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Append every message of `other`, keeping its per-key order
    pub fn merge(&mut self, other: Errors) {
        for (field, mut messages) in other.messages {
            self.messages.entry(field).or_default().append(&mut messages);
        }
    }

    /// Messages for `field`; empty when nothing was recorded
    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str, message: &str) -> bool {
        self.get(field).iter().any(|m| m == message)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.values().all(Vec::is_empty)
    }

    /// Total number of messages across all fields
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.messages
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Remove and return the messages recorded for `field`
    pub fn delete(&mut self, field: &str) -> Vec<String> {
        self.messages.shift_remove(field).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Messages prefixed with the humanized field name. Base messages are
    /// returned as-is.
    pub fn full_messages(&self) -> Vec<String> {
        self.pairs()
            .map(|(field, message)| full_message(field, message))
            .collect()
    }

    pub fn full_messages_for(&self, field: &str) -> Vec<String> {
        self.get(field)
            .iter()
            .map(|message| full_message(field, message))
            .collect()
    }

    /// Get a comma-separated list of all error messages
    pub fn to_string_list(&self) -> String {
        self.messages
            .values()
            .flatten()
            .cloned()
            .collect::<Vec<String>>()
            .join(", ")
    }

    /// Every `(field, message)` pair, field by field
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            fields: self.messages.iter(),
            current: None,
        }
    }
}

fn full_message(field: &str, message: &str) -> String {
    if field == BASE {
        message.to_string()
    } else {
        format!("{} {}", humanize(field), message)
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_list())
    }
}

impl std::error::Error for Errors {}

impl<K, M> FromIterator<(K, M)> for Errors
where
    K: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        let mut errors = Errors::new();
        errors.extend(iter);
        errors
    }
}

impl<K, M> Extend<(K, M)> for Errors
where
    K: Into<String>,
    M: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, M)>>(&mut self, iter: I) {
        for (field, message) in iter {
            self.add(field, message);
        }
    }
}

/// Flattened `(field, message)` iterator over an [`Errors`]
pub struct Pairs<'a> {
    fields: indexmap::map::Iter<'a, String, Vec<String>>,
    current: Option<(&'a str, std::slice::Iter<'a, String>)>,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((field, messages)) = &mut self.current {
                if let Some(message) = messages.next() {
                    return Some((*field, message.as_str()));
                }
            }
            let (field, messages) = self.fields.next()?;
            self.current = Some((field.as_str(), messages.iter()));
        }
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = (&'a str, &'a str);
    type IntoIter = Pairs<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs()
    }
}
