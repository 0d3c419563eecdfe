//! HTTP adapters for the cloud-resource controller: `CloudController` and
//! `StackInspector` over reqwest.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, LOCATION};
use reqwest::{Client, RequestBuilder, Response};
use svcmgr_common::attributes::{OCCI_APP_NAME, OCCI_KEY_CONTENT, OCCI_KEY_NAME};

use crate::application::ports::{CloudController, Credentials, StackInspector};
use crate::domain::error::LifecycleError;
use crate::domain::occi::{
    APP_CATEGORIES, PUBLIC_KEY_CATEGORY, decode_locations, encode_attributes, encode_categories,
};
use crate::domain::ssh::PublicKey;
use crate::domain::stack::StackDetails;

const TEXT_OCCI: &str = "text/occi";
const CATEGORY: &str = "Category";
const OCCI_ATTRIBUTE: &str = "X-OCCI-Attribute";
const OCCI_LOCATION: &str = "X-OCCI-Location";
pub(crate) const AUTH_TOKEN: &str = "X-Auth-Token";
pub(crate) const TENANT_NAME: &str = "X-Tenant-Name";

/// Build a reqwest client with a per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")
}

/// Send `request`, mapping connection failures and non-2xx statuses to
/// [`LifecycleError::Transport`].
async fn send_checked(method: &'static str, url: &str, request: RequestBuilder) -> Result<Response> {
    tracing::debug!(%method, %url, "controller request");
    let response = request.send().await.map_err(|e| LifecycleError::Transport {
        method,
        url: url.to_owned(),
        status: None,
        detail: e.to_string(),
    })?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|e| {
            tracing::debug!(%method, %url, error = %e, "could not read error response body");
            String::new()
        });
        return Err(LifecycleError::Transport {
            method,
            url: url.to_owned(),
            status: Some(status.as_u16()),
            detail: format!("HTTP {}: {}", status.as_u16(), body.trim()),
        }
        .into());
    }
    Ok(response)
}

fn header_text(headers: &HeaderMap, name: impl reqwest::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Container and key management on the controller's northbound API.
pub struct HttpCloudController {
    client: Client,
    base: String,
}

impl HttpCloudController {
    /// `base` is the northbound API URL without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base: base.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

impl CloudController for HttpCloudController {
    async fn public_key_locations(&self) -> Result<Vec<String>> {
        let url = self.url("/public_key/");
        let response =
            send_checked("GET", &url, self.client.get(&url).header(ACCEPT, TEXT_OCCI)).await?;
        Ok(header_text(response.headers(), OCCI_LOCATION)
            .map(|h| decode_locations(&h))
            .unwrap_or_default())
    }

    async fn register_public_key(&self, key: &PublicKey) -> Result<()> {
        let url = self.url("/public_key/");
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, TEXT_OCCI)
            .header(CATEGORY, encode_categories(&[PUBLIC_KEY_CATEGORY]))
            .header(
                OCCI_ATTRIBUTE,
                encode_attributes(&[(OCCI_KEY_NAME, &key.name), (OCCI_KEY_CONTENT, &key.content)]),
            );
        send_checked("POST", &url, request).await?;
        Ok(())
    }

    async fn create_app(&self, name: &str) -> Result<Option<String>> {
        let url = self.url("/app/");
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, TEXT_OCCI)
            .header(CATEGORY, encode_categories(APP_CATEGORIES))
            .header(OCCI_ATTRIBUTE, format!("{OCCI_APP_NAME}={name}"));
        let response = send_checked("POST", &url, request).await?;
        Ok(header_text(response.headers(), LOCATION))
    }

    async fn app_attribute_header(&self, path: &str) -> Result<Option<String>> {
        let url = self.url(path);
        let response =
            send_checked("GET", &url, self.client.get(&url).header(ACCEPT, TEXT_OCCI)).await?;
        Ok(header_text(response.headers(), OCCI_ATTRIBUTE))
    }

    async fn delete_app(&self, path: &str, creds: &Credentials) -> Result<()> {
        let url = self.url(path);
        let request = self
            .client
            .delete(&url)
            .header(CONTENT_TYPE, TEXT_OCCI)
            .header(AUTH_TOKEN, &creds.token)
            .header(TENANT_NAME, &creds.tenant);
        send_checked("DELETE", &url, request).await?;
        Ok(())
    }
}

/// Stack details lookup on the design endpoint.
pub struct HttpStackInspector {
    client: Client,
    base: String,
}

impl HttpStackInspector {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base: base.into(),
        })
    }
}

impl StackInspector for HttpStackInspector {
    async fn details(&self, stack_path: &str, creds: &Credentials) -> Result<StackDetails> {
        let url = format!("{}{stack_path}", self.base);
        let request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTH_TOKEN, &creds.token)
            .header(TENANT_NAME, &creds.tenant);
        let response = send_checked("GET", &url, request).await?;
        let body = response.text().await.map_err(|e| LifecycleError::Transport {
            method: "GET",
            url: url.clone(),
            status: None,
            detail: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| {
            LifecycleError::Transport {
                method: "GET",
                url,
                status: None,
                detail: format!("unexpected stack details body: {e}"),
            }
            .into()
        })
    }
}
