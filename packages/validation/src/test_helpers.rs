use serde_json::{Map, Value};

pub fn record(values: &[(&str, Value)]) -> Map<String, Value> {
    values
        .iter()
        .map(|(field, value)| (field.to_string(), value.clone()))
        .collect()
}

pub fn attributes(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| field.to_string()).collect()
}
