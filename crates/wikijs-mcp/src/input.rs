//! Tool argument validation.
//!
//! Arguments are checked against the tool's JSON Schema first, collecting every
//! violation, and only then decoded into the typed input struct.

use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wikijs_core::{InputError, InputIssue};

/// Every schema violation in `arguments`, or `Ok` when there are none.
pub fn validate(validator: &Validator, arguments: &Value) -> Result<(), InputError> {
    let issues: Vec<InputIssue> = validator
        .iter_errors(arguments)
        .map(|error| InputIssue {
            path: error.instance_path().to_string(),
            message: error.to_string(),
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(InputError { issues })
    }
}

/// Decode validated arguments into a typed input.
pub fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T, InputError> {
    serde_json::from_value(arguments).map_err(|e| InputError::single("", e.to_string()))
}
