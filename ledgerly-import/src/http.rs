//! reqwest implementation of the backend collaborator.

use anyhow::{Context, Result, bail};
use ledgerly_ingest::ParsedTransaction;
use serde::{Deserialize, Serialize};

use crate::backend::ImportBackend;

/// JSON client for the console's REST backend.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }
}

#[derive(Deserialize)]
struct CategoryDto {
    name: String,
}

#[derive(Serialize)]
struct CreateCategoryReq<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ImportBatchReq<'a> {
    ledger_id: &'a str,
    transactions: &'a [ParsedTransaction],
}

impl ImportBackend for HttpBackend {
    async fn list_categories(&self) -> Result<Vec<String>> {
        let resp = self
            .request(reqwest::Method::GET, "/categories")
            .send()
            .await
            .context("fetching category registry")?;
        if !resp.status().is_success() {
            bail!("category registry request failed: HTTP {}", resp.status());
        }
        let categories: Vec<CategoryDto> = resp.json().await.context("decoding categories")?;
        Ok(categories.into_iter().map(|c| c.name).collect())
    }

    async fn create_category(&self, name: &str) -> Result<()> {
        let resp = self
            .request(reqwest::Method::POST, "/categories")
            .json(&CreateCategoryReq { name })
            .send()
            .await
            .with_context(|| format!("creating category {name:?}"))?;
        if !resp.status().is_success() {
            bail!("creating category {name:?} failed: HTTP {}", resp.status());
        }
        Ok(())
    }

    async fn import_batch(&self, ledger_id: &str, batch: &[ParsedTransaction]) -> Result<()> {
        let resp = self
            .request(reqwest::Method::POST, "/transactions/import")
            .json(&ImportBatchReq {
                ledger_id,
                transactions: batch,
            })
            .send()
            .await
            .context("submitting transaction batch")?;
        if !resp.status().is_success() {
            bail!("bulk import failed: HTTP {}", resp.status());
        }
        Ok(())
    }
}
