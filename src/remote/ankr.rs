//! Multichain token-holder indexer adapter (Ankr Advanced API).
//!
//! Speaks JSON-RPC `ankr_getTokenHolders` with token-based page
//! continuation. Balances arrive as decimal strings and are parsed here;
//! the authoritative `holdersCount` is passed through untouched for the
//! fetcher's integrity check.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{HolderPage, HolderSource};
use crate::types::{Chain, HolderBalance};
use crate::utils::retry::call_remote_with_retry;

#[derive(Debug, Clone)]
pub struct AnkrConfig {
    pub base_url: String,
    /// API key appended to the endpoint path. Anonymous access works but is
    /// heavily throttled.
    pub api_key: Option<String>,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for AnkrConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rpc.ankr.com/multichain".to_string(),
            api_key: None,
            page_size: 10_000,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug)]
pub struct AnkrHolderSource {
    blockchain: &'static str,
    config: AnkrConfig,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<TokenHoldersResult>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenHoldersResult {
    holders: Vec<AnkrHolder>,
    holders_count: usize,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnkrHolder {
    holder_address: String,
    balance: String,
}

impl AnkrHolderSource {
    pub fn new(chain: Chain, config: AnkrConfig) -> Result<Self> {
        let blockchain = chain
            .indexer_name()
            .ok_or_else(|| anyhow!("chain {chain} is not covered by the holder indexer"))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            blockchain,
            config,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        match &self.config.api_key {
            Some(key) => format!("{}/{}", self.config.base_url, key),
            None => self.config.base_url.clone(),
        }
    }

    async fn request_page(&self, body: &serde_json::Value) -> Result<TokenHoldersResult> {
        let envelope: RpcEnvelope = call_remote_with_retry(|| async {
            let response = self
                .http_client
                .post(self.endpoint())
                .json(body)
                .send()
                .await
                .context("holder indexer request failed")?;

            if !response.status().is_success() {
                bail!("holder indexer returned HTTP {}", response.status());
            }

            response
                .json()
                .await
                .context("failed to parse holder indexer response")
        })
        .await?;

        if let Some(err) = envelope.error {
            bail!("holder indexer error {}: {}", err.code, err.message);
        }
        envelope
            .result
            .context("holder indexer response carried no result")
    }
}

#[async_trait]
impl HolderSource for AnkrHolderSource {
    async fn list_holders(
        &self,
        contract_address: &str,
        page_token: Option<&str>,
    ) -> Result<HolderPage> {
        let mut params = json!({
            "blockchain": self.blockchain,
            "contractAddress": contract_address,
            "pageSize": self.config.page_size,
        });
        if let Some(token) = page_token {
            params["pageToken"] = json!(token);
        }
        let body = json!({
            "jsonrpc": "2.0",
            "method": "ankr_getTokenHolders",
            "params": params,
            "id": 1,
        });

        let result = self.request_page(&body).await?;

        let mut holders = Vec::with_capacity(result.holders.len());
        for holder in result.holders {
            let balance: f64 = holder.balance.parse().with_context(|| {
                format!("unparseable balance for holder {}", holder.holder_address)
            })?;
            holders.push(HolderBalance {
                address: holder.holder_address,
                balance,
            });
        }

        debug!(
            blockchain = self.blockchain,
            contract = contract_address,
            page_len = holders.len(),
            holder_count = result.holders_count,
            "fetched holder page"
        );

        Ok(HolderPage {
            holders,
            holder_count: result.holders_count,
            // the indexer signals the last page with an empty token
            next_page_token: result.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}
