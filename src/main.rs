mod setup;
mod sign_up;

use anyhow::Context;
use serde_json::{Map, Value};
use setup::{set_up_tracing, Config};
use sign_up::MemoryAccountStore;
use std::io;

/// Reads sign-up form params as a JSON object on stdin and prints the
/// resulting form state (values, validity, errors) as JSON on stdout.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    set_up_tracing(&config);

    let params: Map<String, Value> =
        serde_json::from_reader(io::stdin().lock()).context("form params must be a JSON object")?;

    let store = MemoryAccountStore::new(config.reserved_account_names);
    let outcome = sign_up::run(params, &store)?;
    tracing::info!(valid = outcome.valid, error_count = outcome.errors.len(), "sign up processed");

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
