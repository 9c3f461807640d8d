// Redfish status client
//
// Authenticated GETs with Basic auth built from the current credentials.
// The base URL is derived from `credentials.host` on every request, so a
// credential update retargets the client without rebuilding it.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::debug;
use url::Url;

use crate::channel::StatusApi;
use crate::credentials::CredentialStore;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Default Redfish thermal resource.
pub const THERMAL_PATH: &str = "/redfish/v1/chassis/1/Thermal/";

/// HTTP client for the device's JSON status API.
#[derive(Clone)]
pub struct StatusClient {
    http: reqwest::Client,
    credentials: CredentialStore,
    /// Fixed base URL; when unset, `https://{credentials.host}` is used.
    base_url: Option<Url>,
}

impl StatusClient {
    /// Create a client from a `TransportConfig` (TLS relaxed by default).
    pub fn new(transport: &TransportConfig, credentials: CredentialStore) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            credentials,
            base_url: None,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and a fixed base
    /// URL instead of one derived from the credentials' host.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: CredentialStore) -> Self {
        Self {
            http,
            credentials,
            base_url: Some(base_url),
        }
    }

    fn url_for(&self, host: &str, path: &str) -> Result<Url, Error> {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => Url::parse(&format!("https://{host}"))?,
        };
        Ok(base.join(path)?)
    }
}

#[async_trait]
impl StatusApi for StatusClient {
    async fn fetch_status(&self, path: &str) -> Result<serde_json::Value, Error> {
        let creds = self.credentials.current()?;
        let url = self.url_for(&creds.host, path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .basic_auth(&creds.username, Some(creds.secret.expose_secret()))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
