//! Request DTOs for the lookup API
//!
//! Defines the structure of incoming query strings.

use url::form_urlencoded;

/// Query string of `GET /?person=...`
#[derive(Debug, Clone, Default)]
pub struct DescribeQuery {
    /// Title to look up, still percent-encoded once
    pub person: Option<String>,
}

impl DescribeQuery {
    /// Decodes a raw query string. When `person` repeats, the first value wins.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let person = raw.and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "person")
                .map(|(_, value)| value.into_owned())
        });
        Self { person }
    }

    /// Returns the person to look up, or an error message when it is missing.
    pub fn person(&self) -> Result<&str, String> {
        match self.person.as_deref() {
            Some(person) if !person.is_empty() => Ok(person),
            _ => Err("the 'person' query parameter cannot be empty".to_string()),
        }
    }
}
