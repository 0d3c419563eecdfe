//! Application service: control actions on a running service instance.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{Credentials, HttpReply, ServiceEndpoint};
use crate::domain::error::LifecycleError;
use crate::domain::stack::{NOT_INITIALISED_SENTINEL, RemoteState};

/// Hand the tenant credentials to the instance.
///
/// # Errors
///
/// Returns [`LifecycleError::RemoteInit`] on a non-2xx reply or a
/// connection failure.
pub async fn init(endpoint: &impl ServiceEndpoint, host: &str, creds: &Credentials) -> Result<()> {
    let url = endpoint.endpoint_url(host, "action=init");
    let reply = endpoint
        .init(host, creds)
        .await
        .map_err(|e| LifecycleError::RemoteInit {
            url: url.clone(),
            detail: format!("{e:#}"),
        })?;
    if !reply.is_success() {
        return Err(LifecycleError::RemoteInit {
            url,
            detail: status_detail(&reply),
        }
        .into());
    }
    tracing::debug!(%host, "service instance initialised");
    Ok(())
}

/// Ask the instance to deploy its stack and return the stack id.
///
/// # Errors
///
/// - [`LifecycleError::Deployment`] when the instance reports it was never
///   initialised.
/// - [`LifecycleError::RemoteInit`] on a non-2xx reply or a connection
///   failure.
pub async fn activate(
    endpoint: &impl ServiceEndpoint,
    host: &str,
    creds: &Credentials,
) -> Result<String> {
    let url = endpoint.endpoint_url(host, "action=deploy");
    let reply = endpoint
        .deploy(host, creds)
        .await
        .map_err(|e| LifecycleError::RemoteInit {
            url: url.clone(),
            detail: format!("{e:#}"),
        })?;
    if !reply.is_success() {
        return Err(LifecycleError::RemoteInit {
            url,
            detail: status_detail(&reply),
        }
        .into());
    }
    if reply.body == NOT_INITIALISED_SENTINEL {
        return Err(LifecycleError::Deployment {
            host: host.to_owned(),
        }
        .into());
    }
    tracing::info!(%host, stack_id = %reply.body, "service instance deployed");
    Ok(reply.body)
}

/// Ask the instance to tear its stack down.
///
/// # Errors
///
/// Returns [`LifecycleError::RemoteDispose`] on a non-2xx reply or a
/// connection failure.
pub async fn dispose(endpoint: &impl ServiceEndpoint, host: &str) -> Result<()> {
    let url = endpoint.endpoint_url(host, "action=dispose");
    let reply = endpoint
        .dispose(host)
        .await
        .map_err(|e| LifecycleError::RemoteDispose {
            url: url.clone(),
            detail: format!("{e:#}"),
        })?;
    if !reply.is_success() {
        return Err(LifecycleError::RemoteDispose {
            url,
            detail: status_detail(&reply),
        }
        .into());
    }
    Ok(())
}

/// Poll the instance's status endpoint.
///
/// # Errors
///
/// Returns [`LifecycleError::Transport`] on a non-2xx reply. Connection
/// failures propagate from the endpoint.
pub async fn state(
    endpoint: &impl ServiceEndpoint,
    host: &str,
    creds: &Credentials,
) -> Result<RemoteState> {
    let reply = endpoint.state(host, creds).await?;
    if !reply.is_success() {
        return Err(LifecycleError::Transport {
            method: "GET",
            url: endpoint.endpoint_url(host, "state"),
            status: Some(reply.status),
            detail: status_detail(&reply),
        }
        .into());
    }
    Ok(RemoteState::parse(&reply.body))
}

fn status_detail(reply: &HttpReply) -> String {
    let body = reply.body.trim();
    if body.is_empty() {
        format!("HTTP {}", reply.status)
    } else {
        format!("HTTP {}: {body}", reply.status)
    }
}
