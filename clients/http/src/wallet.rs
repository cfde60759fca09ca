use aptfund_splitter::{SignerError, TransferInstruction, WalletSigner};
use cosmwasm_std::Uint128;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize, Debug)]
struct TransferRequest<'a> {
    sender: &'a str,
    destination: &'a str,
    amount: Uint128,
    asset_type: &'a str,
}

#[derive(Deserialize, Debug)]
struct TransferResponse {
    hash: String,
}

#[derive(Deserialize, Debug)]
struct AccountResponse {
    address: String,
}

/// Submits transfers through a wallet bridge listening on HTTP.
///
/// The bridge owns the keys and the signing prompt. It answers
/// `POST /transfers` with the committed transaction hash, a 4xx when the
/// holder declines, and is unreachable when the wallet is not connected.
#[derive(Clone, Debug)]
pub struct WalletBridge {
    client: Client,
    base_url: String,
    sender: String,
}

impl WalletBridge {
    pub fn new(base_url: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sender: sender.into(),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Address of the account currently connected to the bridge.
    pub async fn connected_account(&self) -> Result<String, SignerError> {
        let response = self
            .client
            .get(format!("{}/account", self.base_url))
            .send()
            .await
            .map_err(send_error)?;
        if !response.status().is_success() {
            return Err(SignerError::Disconnected);
        }
        let account: AccountResponse = response.json().await.map_err(|e| SignerError::Submission {
            reason: e.to_string(),
        })?;
        Ok(account.address)
    }
}

fn send_error(e: reqwest::Error) -> SignerError {
    if e.is_connect() {
        SignerError::Disconnected
    } else {
        SignerError::Submission {
            reason: e.to_string(),
        }
    }
}

impl WalletSigner for WalletBridge {
    async fn sign_and_submit(
        &self,
        instruction: &TransferInstruction,
    ) -> Result<String, SignerError> {
        let request = TransferRequest {
            sender: &self.sender,
            destination: &instruction.destination,
            amount: instruction.amount,
            asset_type: &instruction.asset_type,
        };
        debug!(
            destination = %instruction.destination,
            amount = %instruction.amount,
            "submitting transfer to wallet bridge"
        );

        let response = self
            .client
            .post(format!("{}/transfers", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "wallet bridge refused transfer");
            return Err(if status.is_client_error() {
                SignerError::Rejected { reason: body }
            } else {
                SignerError::Submission {
                    reason: format!("bridge returned status {}: {body}", status.as_u16()),
                }
            });
        }

        let submitted: TransferResponse =
            response.json().await.map_err(|e| SignerError::Submission {
                reason: e.to_string(),
            })?;
        Ok(submitted.hash)
    }
}
