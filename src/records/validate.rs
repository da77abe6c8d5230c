//! Create-payload validation.

use super::types::RecordError;
use crate::store::NewStudent;
use serde_json::Value;

pub(crate) const MISSING_FIELDS: &str = "Missing 'name' or 'age'";

/// Extract `name` and `age` from a create payload, ignoring any other keys.
///
/// A key that is absent or `null` counts as missing. Both values are kept as whatever JSON
/// was submitted.
pub fn new_student_from_payload(payload: &Value) -> Result<NewStudent, RecordError> {
    let Some(fields) = payload.as_object() else {
        return Err(RecordError::Validation(MISSING_FIELDS.into()));
    };

    let present = |key: &str| fields.get(key).filter(|value| !value.is_null());
    let (Some(name), Some(age)) = (present("name"), present("age")) else {
        return Err(RecordError::Validation(MISSING_FIELDS.into()));
    };

    Ok(NewStudent {
        name: name.clone(),
        age: age.clone(),
    })
}
