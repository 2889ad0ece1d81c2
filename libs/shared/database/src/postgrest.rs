use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::DatabaseError;

/// Query string pairs, e.g. `("status", "eq.pending")`.
pub type QueryParams = Vec<(String, String)>;

/// Thin PostgREST client (Supabase `/rest/v1`).
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl PostgrestClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.supabase_url, &config.supabase_service_key)
    }

    pub fn with_base_url(base_url: &str, service_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, return_representation: bool) -> Result<HeaderMap, DatabaseError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.service_key)
            .map_err(|e| DatabaseError::Configuration(format!("service key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|e| DatabaseError::Configuration(format!("service key: {}", e)))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if return_representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        Ok(headers)
    }

    async fn send<T, B>(
        &self,
        method: Method,
        table: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> Result<Vec<T>, DatabaseError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        debug!("{} {} {:?}", method, url, query);

        let return_representation = method != Method::GET;
        let mut req = self.client
            .request(method, &url)
            .headers(self.headers(return_representation)?)
            .query(query);

        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("PostgREST error ({}) on {}: {}", status, table, text);
            return Err(DatabaseError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&text)?)
    }

    pub async fn select<T>(&self, table: &str, query: &[(String, String)]) -> Result<Vec<T>, DatabaseError>
    where
        T: DeserializeOwned,
    {
        self.send::<T, ()>(Method::GET, table, query, None).await
    }

    /// Insert one row and return the stored representation.
    pub async fn insert<T, B>(&self, table: &str, body: &B) -> Result<T, DatabaseError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<T, B>(Method::POST, table, &[], Some(body))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DatabaseError::EmptyResult(format!("insert into {}", table)))
    }

    /// Patch matching rows; an empty result means nothing matched.
    pub async fn update<T, B>(
        &self,
        table: &str,
        filters: &[(String, String)],
        body: &B,
    ) -> Result<Vec<T>, DatabaseError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<T, B>(Method::PATCH, table, filters, Some(body)).await
    }

    /// Delete matching rows, returning how many were removed.
    pub async fn delete(&self, table: &str, filters: &[(String, String)]) -> Result<usize, DatabaseError> {
        let removed: Vec<serde_json::Value> = self
            .send::<serde_json::Value, ()>(Method::DELETE, table, filters, None)
            .await?;
        Ok(removed.len())
    }
}

/// `("column", "eq.value")`
pub fn eq(column: &str, value: impl std::fmt::Display) -> (String, String) {
    (column.to_string(), format!("eq.{}", value))
}
