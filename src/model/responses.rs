/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Interpretation of API response payloads.
//!
//! The API reports errors in an `error` field whose shape varies between
//! endpoints: a bare string, an object with a `message`, or a "named
//! exception" object `{name: "Foo", Foo: {message: ...}}`. The helpers here
//! normalize all of them into a displayable string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EXCEPTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+?Exception\[").expect("exception marker pattern is valid"));

const EXCEPTION_HIGHLIGHT: &str = "<span style=\"color: red;\">${0}</span>\n               ";

/// Loose truthiness of a JSON value, as the API uses it for its `error` flag
///
/// `null`, `false`, `0`, `""`, `"0"`, `[]` and `{}` are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Returns the `error` field of a response body when it signals a failure
#[must_use]
pub fn error_field(body: &Value) -> Option<&Value> {
    body.get("error").filter(|e| is_truthy(e))
}

/// Known shapes of an API error payload, in matching priority order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorShape<'a> {
    /// `{name: "Foo", Foo: {message: ...}}`
    Named {
        /// Name of the sub-object holding the message
        name: &'a str,
        /// The nested message
        message: &'a Value,
    },
    /// `{message: ...}`
    WithMessage(&'a Value),
    /// Anything else, used as the message itself
    Bare(&'a Value),
}

impl<'a> ErrorShape<'a> {
    /// Matches an error payload against the known shapes
    #[must_use]
    pub fn classify(error: &'a Value) -> Self {
        let named = error.get("name").and_then(Value::as_str).and_then(|name| {
            present(error.get(name).and_then(|inner| inner.get("message")))
                .map(|message| ErrorShape::Named { name, message })
        });
        if let Some(shape) = named {
            return shape;
        }
        if let Some(message) = present(error.get("message")) {
            return ErrorShape::WithMessage(message);
        }
        ErrorShape::Bare(error)
    }

    /// The value holding the human-readable message
    #[must_use]
    pub fn message(&self) -> &'a Value {
        match self {
            ErrorShape::Named { message, .. } => message,
            ErrorShape::WithMessage(message) => message,
            ErrorShape::Bare(error) => error,
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Extracts a displayable message from an error payload of unknown shape
///
/// Strings are returned verbatim; structured messages are serialized to JSON.
#[must_use]
pub fn parse_error_message(error: &Value) -> String {
    match ErrorShape::classify(error).message() {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Decodes a raw response body for inclusion in error diagnostics
///
/// Returns `None` when the body is not JSON. A string `error` field has its
/// `SomethingException[` markers wrapped in a red `<span>` for log viewers.
#[must_use]
pub fn decode_error_body(body: &str) -> Option<Value> {
    let mut decoded: Value = serde_json::from_str(body).ok()?;
    if let Some(Value::String(error)) = decoded.get_mut("error") {
        let highlighted = EXCEPTION_MARKER
            .replace_all(error, EXCEPTION_HIGHLIGHT)
            .into_owned();
        *error = highlighted;
    }
    Some(decoded)
}
