//! Container naming and resource path rewriting.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use rand::Rng;
use svcmgr_common::Kind;
use url::Url;

use crate::domain::error::LifecycleError;

/// Generic collection path of app containers on the cloud controller.
pub const APP_COLLECTION: &str = "/app/";

/// Prefix of every generated container name.
pub const APP_NAME_PREFIX: &str = "srvinst";

const NAME_ALPHABET: &[u8; 16] = b"0123456789ABCDEF";

/// Only used to resolve relative `Location` headers; the host never leaves this module.
const RELATIVE_BASE: &str = "http://controller.invalid/";

/// Generate a container name: `srvinst` followed by 16 uppercase hex characters.
///
/// The controller only accepts `[A-Za-z0-9]` names of at most 32 characters.
#[must_use]
pub fn generate_app_name(rng: &mut impl Rng) -> String {
    let mut name = String::with_capacity(APP_NAME_PREFIX.len() + 16);
    name.push_str(APP_NAME_PREFIX);
    for _ in 0..16 {
        name.push(char::from(NAME_ALPHABET[rng.random_range(0..NAME_ALPHABET.len())]));
    }
    name
}

/// Whether `name` satisfies the controller's naming constraints.
#[must_use]
pub fn is_valid_app_name(name: &str) -> bool {
    (1..=32).contains(&name.len()) && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Path component of a `Location` header, which may be absolute or relative.
///
/// Query and fragment are dropped either way.
///
/// # Errors
///
/// Returns [`LifecycleError::Provisioning`] if the location is not a URL or path.
pub fn location_path(location: &str) -> Result<String, LifecycleError> {
    let parsed = match Url::parse(location) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(location))
            .map_err(|e| invalid_location(location, &e))?,
        Err(e) => return Err(invalid_location(location, &e)),
    };
    Ok(parsed.path().to_owned())
}

fn invalid_location(location: &str, err: &url::ParseError) -> LifecycleError {
    LifecycleError::provisioning(format!("invalid container location '{location}': {err}"))
}

/// Identifier the entity takes once its container exists at `app_path`.
#[must_use]
pub fn entity_identifier(app_path: &str, kind: &Kind) -> String {
    app_path.replace(APP_COLLECTION, &kind.location)
}

/// Raw container id: `app_path` with the generic collection removed.
#[must_use]
pub fn container_id(app_path: &str) -> String {
    app_path.replace(APP_COLLECTION, "")
}

/// Container path to release for an entity.
///
/// Maps the kind's collection back to `/app/`; identifiers written under the
/// kind's term (`/epc/...`) are mapped the same way.
#[must_use]
pub fn container_path(identifier: &str, kind: &Kind) -> String {
    if !kind.location.is_empty() && identifier.contains(&kind.location) {
        return identifier.replace(&kind.location, APP_COLLECTION);
    }
    identifier.replace(&format!("/{}/", kind.term), APP_COLLECTION)
}

/// Host of a repository URI: its authority with any userinfo stripped.
///
/// `ssh://5f1e@srvinst0a.apps.example.org/~/git/app.git/` yields
/// `srvinst0a.apps.example.org`.
///
/// # Errors
///
/// Returns [`LifecycleError::Provisioning`] if the URI has no authority.
pub fn derive_host(repo_uri: &str) -> Result<String, LifecycleError> {
    let invalid = || LifecycleError::provisioning(format!("repository URI has no host: {repo_uri}"));
    let url = Url::parse(repo_uri).map_err(|_| invalid())?;
    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

/// Path of a stack on the design endpoint.
#[must_use]
pub fn stack_path(stack_id: &str) -> String {
    let id = stack_id.trim();
    if id.starts_with('/') {
        id.to_owned()
    } else {
        format!("/{id}")
    }
}
