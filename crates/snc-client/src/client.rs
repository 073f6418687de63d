use anyhow::{Context, Result};
use snc_core::{BotStatus, Network, TokenSummary, TradeRecord};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper over the controller's HTTP API. Any non-2xx response or
/// transport failure comes back as a plain error; callers never branch on
/// status codes.
#[derive(Debug, Clone)]
pub struct BotApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl BotApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn status(&self) -> Result<BotStatus> {
        let status = self
            .http
            .get(self.url("/status"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(status)
    }

    pub async fn tokens(&self) -> Result<Vec<TokenSummary>> {
        let tokens = self
            .http
            .get(self.url("/tokens"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(tokens)
    }

    pub async fn trades(&self) -> Result<Vec<TradeRecord>> {
        let trades = self
            .http
            .get(self.url("/trades"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(trades)
    }

    pub async fn start(&self) -> Result<()> {
        self.http
            .post(self.url("/start"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        self.http
            .post(self.url("/stop"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn set_network(&self, network: Network) -> Result<()> {
        self.http
            .post(self.url(&format!("/network/{network}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
