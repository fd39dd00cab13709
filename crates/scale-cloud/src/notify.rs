//! Gateway decommission notifications
//!
//! Before a host is removed the gateway is asked to stop routing to it with
//! `POST http://<entrypoint>/unregister`, the host name travelling in the
//! `Host` header. There is no retry and redirects are not followed: callers
//! decide whether a failed notification blocks the removal.

use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use async_trait::async_trait;
use reqwest::header::HOST;

/// Delivers unregister requests to a gateway
#[async_trait]
pub trait UnregisterTransport: Send + Sync {
    /// Ask the gateway at `entrypoint` to stop routing to `hostname`
    async fn unregister(&self, entrypoint: &str, hostname: &str) -> Result<()>;
}

/// HTTP transport backed by a caller-provided [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Transport on a client that never follows redirects, so one
    /// notification is exactly one request
    pub fn without_redirects() -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| FleetError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(client))
    }
}

pub(crate) fn unregister_url(entrypoint: &str) -> String {
    format!("http://{}/unregister", entrypoint)
}

#[async_trait]
impl UnregisterTransport for HttpTransport {
    async fn unregister(&self, entrypoint: &str, hostname: &str) -> Result<()> {
        let transport_error = |message: String| FleetError::Transport {
            host: hostname.to_string(),
            message,
        };

        let response = self
            .client
            .post(unregister_url(entrypoint))
            .header(HOST, hostname)
            .send()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        let status = response.status();
        // body is not used; dropping the response releases the connection
        drop(response);

        // 3xx is final: the redirect target is never contacted
        if status.is_client_error() || status.is_server_error() {
            return Err(transport_error(format!("gateway responded with {}", status)));
        }
        Ok(())
    }
}

/// Tells the gateway to stop routing traffic to decommissioned hosts
pub struct DecommissionNotifier {
    transport: Box<dyn UnregisterTransport>,
}

impl DecommissionNotifier {
    pub fn new(transport: impl UnregisterTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Notifier over [`HttpTransport::without_redirects`]
    pub fn http() -> Result<Self> {
        Ok(Self::new(HttpTransport::without_redirects()?))
    }

    /// Send one unregister request for `hostname`
    #[tracing::instrument(skip(self))]
    pub async fn notify(&self, entrypoint: &str, hostname: &str) -> Result<()> {
        if entrypoint.is_empty() {
            return Err(FleetError::Config(
                "HTTP entrypoint is not defined".to_string(),
            ));
        }

        self.transport.unregister(entrypoint, hostname).await?;
        tracing::info!("Gateway acknowledged unregister");
        Ok(())
    }

    /// Notify the gateway recorded in `fleet`
    pub async fn notify_fleet(&self, fleet: &Fleet, hostname: &str) -> Result<()> {
        self.notify(fleet.entrypoint().unwrap_or_default(), hostname)
            .await
    }
}

impl std::fmt::Debug for DecommissionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecommissionNotifier").finish_non_exhaustive()
    }
}
