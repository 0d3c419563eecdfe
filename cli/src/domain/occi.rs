//! Attribute-style header codec used by the cloud controller.
//!
//! Pure functions only; nothing here touches I/O.
//!
//! `X-OCCI-Attribute` carries a comma-separated list of `key="value"` pairs;
//! values may also be bare tokens (`occi.app.name=srvinst0A1B`). `Category`
//! carries `term; scheme="..."` entries. `X-OCCI-Location` lists resource
//! paths separated by whitespace or commas.

use std::collections::BTreeMap;

use crate::domain::error::AttributeHeaderError;

/// Category scheme for platform app containers.
pub const PLATFORM_SCHEME: &str = "http://schemas.ogf.org/occi/platform#";
/// Category scheme for app templates.
pub const APP_TEMPLATE_SCHEME: &str = "http://schemas.openshift.com/template/app#";
/// Category scheme for SSH public key credentials.
pub const CREDENTIALS_SCHEME: &str = "http://schemas.ogf.org/occi/security/credentials#";

/// One `term; scheme="..."` entry of a `Category` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category<'a> {
    pub term: &'a str,
    pub scheme: &'a str,
}

/// Categories requested for a new service orchestrator container.
pub const APP_CATEGORIES: &[Category<'static>] = &[
    Category {
        term: "app",
        scheme: PLATFORM_SCHEME,
    },
    Category {
        term: "python-2.7",
        scheme: APP_TEMPLATE_SCHEME,
    },
    Category {
        term: "small",
        scheme: APP_TEMPLATE_SCHEME,
    },
];

/// Category of a public key registration.
pub const PUBLIC_KEY_CATEGORY: Category<'static> = Category {
    term: "public_key",
    scheme: CREDENTIALS_SCHEME,
};

/// Render categories as a `Category` header value.
#[must_use]
pub fn encode_categories(categories: &[Category<'_>]) -> String {
    categories
        .iter()
        .map(|c| format!("{}; scheme=\"{}\"", c.term, c.scheme))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render `(key, value)` pairs as a quoted `X-OCCI-Attribute` header value.
#[must_use]
pub fn encode_attributes(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Decode an `X-OCCI-Attribute` header value into a key/value map.
///
/// Later duplicates of a key replace earlier ones.
///
/// # Errors
///
/// Fails on the first malformed entry: missing `=`, empty or invalid key,
/// unterminated quote, or characters between a closing quote and the next
/// comma.
pub fn decode_attributes(header: &str) -> Result<BTreeMap<String, String>, AttributeHeaderError> {
    let mut attrs = BTreeMap::new();
    let chars: Vec<(usize, char)> = header.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && (chars[i].1.is_whitespace() || chars[i].1 == ',') {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let offset = chars[i].0;
        let key_start = i;
        while i < chars.len() && chars[i].1 != '=' && chars[i].1 != ',' {
            i += 1;
        }
        if i >= chars.len() || chars[i].1 != '=' {
            return Err(AttributeHeaderError::MissingEquals { offset });
        }
        let key: String = chars[key_start..i].iter().map(|(_, c)| c).collect();
        let key = key.trim().to_owned();
        if key.is_empty() || !key.chars().all(is_key_char) {
            return Err(AttributeHeaderError::InvalidKey { offset, key });
        }
        i += 1; // '='

        let value = if i < chars.len() && chars[i].1 == '"' {
            i += 1;
            let mut value = String::new();
            let mut closed = false;
            while i < chars.len() {
                match chars[i].1 {
                    '\\' if i + 1 < chars.len() => {
                        value.push(chars[i + 1].1);
                        i += 2;
                    }
                    '"' => {
                        closed = true;
                        i += 1;
                        break;
                    }
                    c => {
                        value.push(c);
                        i += 1;
                    }
                }
            }
            if !closed {
                return Err(AttributeHeaderError::UnterminatedQuote { key });
            }
            while i < chars.len() && chars[i].1.is_whitespace() {
                i += 1;
            }
            if i < chars.len() && chars[i].1 != ',' {
                return Err(AttributeHeaderError::TrailingGarbage {
                    key,
                    found: chars[i].1,
                });
            }
            value
        } else {
            let start = i;
            while i < chars.len() && chars[i].1 != ',' {
                i += 1;
            }
            chars[start..i]
                .iter()
                .map(|(_, c)| c)
                .collect::<String>()
                .trim()
                .to_owned()
        };

        attrs.insert(key, value);
    }

    Ok(attrs)
}

/// Split an `X-OCCI-Location` header value into its locations.
#[must_use]
pub fn decode_locations(header: &str) -> Vec<String> {
    header
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
