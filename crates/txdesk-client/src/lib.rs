//! HTTP client for the remote transaction store
//!
//! Speaks the store's REST surface:
//! - `GET  {base}/Transactions?searchQuery=...`
//! - `POST {base}/Transactions`
//! - `PUT  {base}/Transactions/{id}`
//! - `GET  {base}/Statuses`
//!
//! Any non-2xx status is an error.

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;
use txdesk_config::ApiConfig;
use txdesk_core::{CoreError, CoreResult, StatusOption, Transaction, TransactionStore};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    Build(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Attach the store operation name for the core error
    pub fn into_core(self, operation: &str) -> CoreError {
        CoreError::remote(operation, self)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// [`TransactionStore`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransactionStore {
    http: Client,
    base_url: String,
}

impl HttpTransactionStore {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        if config.accept_invalid_certs {
            log::warn!("TLS certificate checks are disabled for {}", config.base_url);
        }
        Self::with_client(http, &config.base_url)
    }

    /// Use a preconfigured client
    pub fn with_client(http: Client, base_url: &str) -> ClientResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_transactions(&self, search_query: &str) -> ClientResult<Vec<Transaction>> {
        let transactions = self
            .http
            .get(self.url("Transactions"))
            .query(&[("searchQuery", search_query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(transactions)
    }

    async fn post_transaction(&self, transaction: &Transaction) -> ClientResult<()> {
        self.http
            .post(self.url("Transactions"))
            .json(transaction)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn put_transaction(&self, transaction: &Transaction) -> ClientResult<()> {
        self.http
            .put(self.url(&format!("Transactions/{}", transaction.id)))
            .json(transaction)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn get_statuses(&self) -> ClientResult<Vec<StatusOption>> {
        let statuses = self
            .http
            .get(self.url("Statuses"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(statuses)
    }
}

#[async_trait]
impl TransactionStore for HttpTransactionStore {
    async fn fetch_transactions(&self, search_query: &str) -> CoreResult<Vec<Transaction>> {
        log::debug!("GET {}/Transactions searchQuery={:?}", self.base_url, search_query);
        self.get_transactions(search_query)
            .await
            .map_err(|e| e.into_core("fetch_transactions"))
    }

    async fn create_transaction(&self, transaction: &Transaction) -> CoreResult<()> {
        log::debug!("POST {}/Transactions", self.base_url);
        self.post_transaction(transaction)
            .await
            .map_err(|e| e.into_core("create_transaction"))
    }

    async fn update_transaction(&self, transaction: &Transaction) -> CoreResult<()> {
        log::debug!("PUT {}/Transactions/{}", self.base_url, transaction.id);
        self.put_transaction(transaction)
            .await
            .map_err(|e| e.into_core("update_transaction"))
    }

    async fn fetch_statuses(&self) -> CoreResult<Vec<StatusOption>> {
        self.get_statuses()
            .await
            .map_err(|e| e.into_core("fetch_statuses"))
    }
}
