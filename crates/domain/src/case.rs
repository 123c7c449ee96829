//! Key-case transforms between the backend's snake_case payloads and the
//! camelCase form used by the client models.
//!
//! Only object keys are renamed. String values are never touched, so enum
//! values such as `in_progress` survive a round trip. Objects are walked in
//! `serde_json::Map` order, which is sorted by key, so when two keys map
//! to the same name the one that sorts last wins.

use serde_json::{Map, Value};

/// Converts `snake_case` to `camelCase`.
///
/// An underscore followed by a lowercase ASCII letter becomes that letter
/// uppercased. A leading underscore is kept, so `_method` stays as is.
#[must_use]
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    let mut first = true;

    while let Some(c) = chars.next() {
        if c == '_' && !first {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
        first = false;
    }
    out
}

/// Converts `camelCase` to `snake_case`.
///
/// Every uppercase ASCII letter after the first character becomes `_`
/// plus its lowercase form. Acronyms are not grouped: `userID` becomes
/// `user_i_d`.
#[must_use]
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Recursively renames object keys to camelCase.
#[must_use]
pub fn camelize_keys(value: Value) -> Value {
    rename_keys(value, to_camel_case)
}

/// Recursively renames object keys to snake_case.
#[must_use]
pub fn snakify_keys(value: Value) -> Value {
    rename_keys(value, to_snake_case)
}

fn rename_keys(value: Value, rename: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => {
            let renamed: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (rename(&k), rename_keys(v, rename)))
                .collect();
            Value::Object(renamed)
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| rename_keys(v, rename)).collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("created_at"), "createdAt");
        assert_eq!(to_camel_case("hourly_rate"), "hourlyRate");
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_camel_case("_method"), "_method");
        assert_eq!(to_camel_case("line_2"), "line_2");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("createdAt"), "created_at");
        assert_eq!(to_snake_case("passwordConfirmation"), "password_confirmation");
        assert_eq!(to_snake_case("userID"), "user_i_d");
        assert_eq!(to_snake_case("Type"), "type");
    }

    #[test]
    fn test_camelize_nested_objects_and_arrays() {
        let input = json!({
            "job_id": 1,
            "client": { "first_name": "Ada" },
            "applications": [{ "artisan_id": 2, "status": "in_progress" }],
            "tags": ["snake_value"]
        });
        let expected = json!({
            "jobId": 1,
            "client": { "firstName": "Ada" },
            "applications": [{ "artisanId": 2, "status": "in_progress" }],
            "tags": ["snake_value"]
        });
        assert_eq!(camelize_keys(input), expected);
    }

    #[test]
    fn test_snakify_leaves_values_alone() {
        let input = json!({ "receiverId": 4, "content": "seeYou" });
        assert_eq!(
            snakify_keys(input),
            json!({ "receiver_id": 4, "content": "seeYou" })
        );
    }

    #[test]
    fn test_colliding_keys_keep_the_last_sorted() {
        // "jobId" sorts before "job_id", so the snake_case value lands last.
        let input = json!({ "job_id": 2, "jobId": 1 });
        assert_eq!(camelize_keys(input), json!({ "jobId": 2 }));
    }
}
