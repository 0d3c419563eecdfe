//! HTTP adapter for the control endpoint of a running service instance.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder};

use crate::application::ports::{Credentials, HttpReply, ServiceEndpoint};
use crate::infra::cloud_controller::{AUTH_TOKEN, TENANT_NAME, http_client};

/// Plain-HTTP client for `http://{host}/action=...`.
pub struct HttpServiceEndpoint {
    client: Client,
}

impl HttpServiceEndpoint {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
        })
    }

    async fn call(&self, request: RequestBuilder) -> Result<HttpReply> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }

    fn with_creds(request: RequestBuilder, creds: &Credentials) -> RequestBuilder {
        request
            .header(AUTH_TOKEN, &creds.token)
            .header(TENANT_NAME, &creds.tenant)
    }
}

impl ServiceEndpoint for HttpServiceEndpoint {
    async fn init(&self, host: &str, creds: &Credentials) -> Result<HttpReply> {
        let url = self.endpoint_url(host, "action=init");
        tracing::debug!(%url, "service init");
        self.call(Self::with_creds(self.client.post(&url), creds)).await
    }

    async fn deploy(&self, host: &str, creds: &Credentials) -> Result<HttpReply> {
        let url = self.endpoint_url(host, "action=deploy");
        tracing::debug!(%url, "service deploy");
        self.call(Self::with_creds(self.client.post(&url), creds)).await
    }

    async fn dispose(&self, host: &str) -> Result<HttpReply> {
        let url = self.endpoint_url(host, "action=dispose");
        tracing::debug!(%url, "service dispose");
        self.call(self.client.post(&url)).await
    }

    async fn state(&self, host: &str, creds: &Credentials) -> Result<HttpReply> {
        let url = self.endpoint_url(host, "state");
        self.call(Self::with_creds(self.client.get(&url), creds)).await
    }

    fn endpoint_url(&self, host: &str, path: &str) -> String {
        format!("http://{host}/{path}")
    }
}
