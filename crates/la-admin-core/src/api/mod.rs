//! Typed wrappers for the backend endpoints.
//!
//! Every wrapper takes the calling screen's [`RequestClient`] and an
//! [`AbortSignal`], so the screen's loading/error slot reflects the call and
//! tearing the screen down cancels it.
//!
//! [`RequestClient`]: crate::http::RequestClient
//! [`AbortSignal`]: crate::http::AbortSignal

pub mod local_authority;
pub mod transactions;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AdminError, Result};

/// Pulls `field` out of a response envelope such as `{ "users": [...] }`.
fn take_field<T: DeserializeOwned>(mut envelope: Value, field: &'static str) -> Result<T> {
    let inner = envelope
        .get_mut(field)
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or(AdminError::MissingField(field))?;

    Ok(serde_json::from_value(inner)?)
}

/// Percent-encodes an id for use as a path segment.
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_take_field() {
        let users: Vec<Value> = take_field(json!({ "users": [{ "_id": "1" }] }), "users").unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_take_field_missing_or_null() {
        let missing = take_field::<Vec<Value>>(json!({ "data": [] }), "users");
        assert!(matches!(missing, Err(AdminError::MissingField("users"))));

        let null = take_field::<Vec<Value>>(json!({ "users": null }), "users");
        assert!(matches!(null, Err(AdminError::MissingField("users"))));
    }

    #[test]
    fn test_take_field_wrong_shape() {
        let result = take_field::<Vec<Value>>(json!({ "users": "nope" }), "users");
        assert!(matches!(result, Err(AdminError::Json(_))));
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("65a1"), "65a1");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
