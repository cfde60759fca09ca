use aptfund_common::{ApiResponse, Campaign, Organization, TransferRecord};
use aptfund_splitter::{CampaignDirectory, DirectoryError, LedgerError, LedgerRecorder};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://aptfund.test/api";

/// Client for the APT Fund backend.
///
/// No request timeout is set; a stalled backend stalls the caller.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = check_status(self.client.get(&url).send().await?).await?;
        let envelope: ApiResponse<T> = response.json().await?;
        Ok(envelope.data)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(%url, "POST");
        check_status(self.client.post(&url).json(body).send().await?).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), %body, "backend request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

impl CampaignDirectory for ApiClient {
    async fn campaigns(&self) -> Result<Vec<Campaign>, DirectoryError> {
        Ok(self.get("/campaigns").await?)
    }

    async fn campaign(&self, campaign_id: &str) -> Result<Campaign, DirectoryError> {
        self.get(&format!("/campaigns/{campaign_id}"))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    DirectoryError::NotFound {
                        campaign_id: campaign_id.to_string(),
                    }
                } else {
                    e.into()
                }
            })
    }

    async fn organizations(&self) -> Result<Vec<Organization>, DirectoryError> {
        Ok(self.get("/organizations").await?)
    }
}

impl LedgerRecorder for ApiClient {
    async fn record_transfer(&self, record: &TransferRecord) -> Result<(), LedgerError> {
        Ok(self.post("/transactions", record).await?)
    }

    /// In the order the backend lists them, which is newest first.
    async fn transfers(&self, campaign_id: &str) -> Result<Vec<TransferRecord>, LedgerError> {
        Ok(self
            .get(&format!("/campaigns/{campaign_id}/transactions"))
            .await?)
    }
}
