/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/
use crate::error::AppError;
use crate::model::responses::is_truthy;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Body of the login request
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest<'a> {
    /// Account login
    pub email: &'a str,
    /// Account password
    pub password: &'a str,
}

/// A single call to the API: path, method and optional payload
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Path relative to the API base, e.g. `/manager/auth`
    pub path: String,
    /// HTTP method, always upper-case
    pub method: Method,
    /// Query parameters for GET, JSON body otherwise
    pub payload: Option<Value>,
}

impl RequestDescriptor {
    /// Creates a descriptor, normalizing `method` to upper case
    ///
    /// Empty payloads (`null`, `{}`, `[]`, `""`) are treated as absent.
    pub fn new(
        path: impl Into<String>,
        method: &str,
        payload: Option<Value>,
    ) -> Result<Self, AppError> {
        let method = method.trim().to_uppercase();
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| AppError::InvalidInput(format!("invalid HTTP method: {method}")))?;
        Ok(Self {
            path: path.into(),
            method,
            payload: payload.filter(is_truthy),
        })
    }

    /// Whether the payload travels in the query string
    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Absolute URL for this request, with the payload appended as a query for GET
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{base_url}{}", self.path);
        if !self.is_get() {
            return url;
        }
        let query = self.payload.as_ref().map(build_query).unwrap_or_default();
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }

    /// Wire form of the payload, whatever the method
    ///
    /// A top-level string is taken as already encoded and sent verbatim;
    /// anything else is serialized to JSON.
    pub fn serialized_payload(&self) -> Result<Option<String>, AppError> {
        match &self.payload {
            None => Ok(None),
            Some(Value::String(raw)) => Ok(Some(raw.clone())),
            Some(payload) => Ok(Some(serde_json::to_string(payload)?)),
        }
    }

    /// Request body: the serialized payload for every method but GET
    pub fn body(&self) -> Result<Option<String>, AppError> {
        if self.is_get() {
            return Ok(None);
        }
        self.serialized_payload()
    }
}

/// Serializes a JSON value into a URL-encoded query string
///
/// Nested objects and arrays are flattened to `key[sub]=value` and
/// `key[0]=value`, booleans become `1`/`0` and `null` members are skipped.
/// Spaces are written as `+`. A top-level scalar is a pre-built query and is
/// returned as-is.
#[must_use]
pub fn build_query(payload: &Value) -> String {
    if !payload.is_object() && !payload.is_array() {
        return match payload {
            Value::Null => String::new(),
            scalar => scalar_to_string(scalar),
        };
    }
    let mut pairs = Vec::new();
    append_pairs(None, payload, &mut pairs);
    pairs.join("&")
}

fn append_pairs(prefix: Option<&str>, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, member) in map {
                let key = match prefix {
                    Some(prefix) => format!("{prefix}[{key}]"),
                    None => key.clone(),
                };
                append_pairs(Some(&key), member, pairs);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let key = match prefix {
                    Some(prefix) => format!("{prefix}[{index}]"),
                    None => index.to_string(),
                };
                append_pairs(Some(&key), item, pairs);
            }
        }
        Value::Null => {}
        scalar => {
            let value = form_encode(&scalar_to_string(scalar));
            match prefix {
                Some(key) => pairs.push(format!("{}={value}", form_encode(key))),
                None => pairs.push(value),
            }
        }
    }
}

fn form_encode(component: &str) -> String {
    // a literal '%' is escaped to %25, so %20 only ever stands for a space
    urlencoding::encode(component).replace("%20", "+")
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_is_normalized() {
        let request = RequestDescriptor::new("/ping", "head", None).unwrap();
        assert_eq!(request.method, Method::HEAD);
        let request = RequestDescriptor::new("/ping", "patch", None).unwrap();
        assert_eq!(request.method.as_str(), "PATCH");
    }

    #[test]
    fn test_invalid_method_is_rejected() {
        let result = RequestDescriptor::new("/ping", "GE T", None);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_get_payload_uses_question_mark() {
        let request =
            RequestDescriptor::new("/clients", "GET", Some(json!({"limit": 10, "q": "a b"})))
                .unwrap();
        assert_eq!(
            request.url("http://host/api"),
            "http://host/api/clients?limit=10&q=a+b"
        );
        assert_eq!(request.body().unwrap(), None);
    }

    #[test]
    fn test_get_payload_uses_ampersand_after_existing_query() {
        let request =
            RequestDescriptor::new("/clients?active=1", "GET", Some(json!({"limit": 10})))
                .unwrap();
        assert_eq!(
            request.url("http://host/api"),
            "http://host/api/clients?active=1&limit=10"
        );
    }

    #[test]
    fn test_empty_payload_is_absent() {
        let request = RequestDescriptor::new("/clients", "GET", Some(json!({}))).unwrap();
        assert_eq!(request.payload, None);
        assert_eq!(request.url("http://host/api"), "http://host/api/clients");
    }

    #[test]
    fn test_non_get_payload_becomes_body() {
        let payload = json!({"name": "Zoë", "tags": ["a"]});
        let request = RequestDescriptor::new("/clients", "post", Some(payload.clone())).unwrap();
        let body = request.body().unwrap().unwrap();
        assert_eq!(body, serde_json::to_string(&payload).unwrap());
        assert_eq!(request.url("http://host/api"), "http://host/api/clients");
    }

    #[test]
    fn test_build_query_flattens_nested_values() {
        let query = build_query(&json!({
            "filter": {"active": true, "ids": [3, 4]},
            "skip": null,
        }));
        assert_eq!(
            query,
            "filter%5Bactive%5D=1&filter%5Bids%5D%5B0%5D=3&filter%5Bids%5D%5B1%5D=4"
        );
    }

    #[test]
    fn test_string_payload_is_sent_verbatim() {
        let request =
            RequestDescriptor::new("/form", "POST", Some(Value::String("a=1&b=2".into())))
                .unwrap();
        assert_eq!(request.body().unwrap().as_deref(), Some("a=1&b=2"));
        assert_eq!(
            request.serialized_payload().unwrap().as_deref(),
            Some("a=1&b=2")
        );
        assert_eq!(request.url("http://h"), "http://h/form");
    }

    #[test]
    fn test_string_payload_is_appended_to_get_query() {
        let request =
            RequestDescriptor::new("/form", "GET", Some(Value::String("a=1&b=2".into())))
                .unwrap();
        assert_eq!(request.url("http://h"), "http://h/form?a=1&b=2");
        assert_eq!(request.body().unwrap(), None);

        let request =
            RequestDescriptor::new("/form?x=0", "GET", Some(Value::String("a=1".into())))
                .unwrap();
        assert_eq!(request.url("http://h"), "http://h/form?x=0&a=1");
    }

    #[test]
    fn test_build_query_keeps_insertion_order() {
        assert_eq!(build_query(&json!({"z": 1, "a": 2})), "z=1&a=2");
        let body = RequestDescriptor::new("/x", "POST", Some(json!({"z": 1, "a": 2})))
            .unwrap()
            .body()
            .unwrap();
        assert_eq!(body.as_deref(), Some(r#"{"z":1,"a":2}"#));
    }

    #[test]
    fn test_build_query_encodes_spaces_as_plus() {
        assert_eq!(
            build_query(&json!({"q": "smith & co", "p": "100%"})),
            "q=smith+%26+co&p=100%25"
        );
    }
}
