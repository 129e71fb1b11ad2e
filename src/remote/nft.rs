//! Eligibility probe backed by the qualifying ERC-721 contract.
//!
//! An address is special when its `balanceOf` on the NFT contract is
//! nonzero. The call is a single `eth_call` with a hand-encoded selector,
//! so no contract-binding machinery is needed.

use anyhow::{bail, ensure, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::EligibilityProbe;
use crate::registry;
use crate::utils::retry::call_remote_with_retry;

/// balanceOf(address)
const BALANCE_OF_SELECTOR: &str = "70a08231";

#[derive(Debug, Clone)]
pub struct NftProbeConfig {
    pub rpc_url: String,
    pub contract_address: String,
    pub request_timeout_secs: u64,
}

impl Default for NftProbeConfig {
    fn default() -> Self {
        Self {
            rpc_url: registry::default_rpc(registry::SPECIAL_NFT_CHAIN).to_string(),
            contract_address: registry::SPECIAL_NFT_CONTRACT.to_string(),
            request_timeout_secs: 15,
        }
    }
}

pub struct SpecialNftProbe {
    config: NftProbeConfig,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct EthCallEnvelope {
    result: Option<String>,
    error: Option<EthCallError>,
}

#[derive(Debug, Deserialize)]
struct EthCallError {
    code: i64,
    message: String,
}

impl SpecialNftProbe {
    pub fn new(config: NftProbeConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// ABI-encode `balanceOf(address)`: 4-byte selector followed by the
    /// address left-padded to 32 bytes.
    fn call_data(address: &str) -> Result<String> {
        let hex_part = address.strip_prefix("0x").unwrap_or(address);
        ensure!(
            hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit()),
            "invalid account address: {address}"
        );
        Ok(format!(
            "0x{}{:0>64}",
            BALANCE_OF_SELECTOR,
            hex_part.to_lowercase()
        ))
    }
}

#[async_trait]
impl EligibilityProbe for SpecialNftProbe {
    async fn is_eligible(&self, address: &str) -> Result<bool> {
        let data = Self::call_data(address)?;
        let body = json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {"to": self.config.contract_address, "data": data},
                "latest"
            ],
            "id": 1,
        });

        let envelope: EthCallEnvelope = call_remote_with_retry(|| async {
            let response = self
                .http_client
                .post(&self.config.rpc_url)
                .json(&body)
                .send()
                .await
                .context("eligibility RPC request failed")?;

            if !response.status().is_success() {
                bail!("eligibility RPC returned HTTP {}", response.status());
            }

            response
                .json()
                .await
                .context("failed to parse eligibility RPC response")
        })
        .await?;

        if let Some(err) = envelope.error {
            bail!("eligibility RPC error {}: {}", err.code, err.message);
        }
        let raw = envelope
            .result
            .context("eligibility call returned no result")?;

        let digits = raw.strip_prefix("0x").unwrap_or(&raw);
        ensure!(
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()),
            "malformed balance word: {raw}"
        );

        Ok(digits.bytes().any(|b| b != b'0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_data_encoding() {
        let data =
            SpecialNftProbe::call_data("0xC88a0B7BCB32283a2B2Fc00aD3DF234eA4a8e6E5").unwrap();
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0x70a08231"));
        assert!(data.ends_with("c88a0b7bcb32283a2b2fc00ad3df234ea4a8e6e5"));
        // 24 zero chars of padding between selector and address
        assert_eq!(&data[10..34], "0".repeat(24));
    }

    #[test]
    fn test_call_data_rejects_garbage() {
        assert!(SpecialNftProbe::call_data("not-an-address").is_err());
        assert!(SpecialNftProbe::call_data("0x1234").is_err());
    }
}
