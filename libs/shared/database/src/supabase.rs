use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_RANGE, CONTENT_TYPE, AUTHORIZATION},
    Method, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Rows requested per page by `select_all`. The server may cap pages lower.
pub const PAGE_SIZE: usize = 1000;

/// Total from a `Content-Range` value such as `0-24/3573` or `*/0`.
/// `None` when the server did not count.
pub fn content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

/// Thin PostgREST client for the clinic's record store.
///
/// Every admin operation runs with the service key, so row level security
/// does not apply to these calls.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         body: Option<Value>, extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let response = self.send(method, path, body, extra_headers).await?;

        let data = response.json::<T>().await?;
        Ok(data)
    }

    async fn send(&self, method: Method, path: &str,
                  body: Option<Value>, extra_headers: Option<HeaderMap>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        Ok(response)
    }

    /// `GET /rest/v1/{table}?{query}`; the query carries filters, `select`,
    /// `order` and `limit` in PostgREST syntax.
    pub async fn select<T>(&self, table: &str, query: &str) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let path = if query.is_empty() {
            format!("/rest/v1/{}", table)
        } else {
            format!("/rest/v1/{}?{}", table, query)
        };

        self.request(Method::GET, &path, None).await
    }

    /// Every row matching `query`, fetched page by page with `limit`/`offset`
    /// so the server's `max-rows` cap cannot truncate the result. The query
    /// should carry an `order` so pages are stable.
    pub async fn select_all<T>(&self, table: &str, query: &str) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let mut rows: Vec<T> = Vec::new();

        loop {
            let path = format!(
                "/rest/v1/{}?{}limit={}&offset={}",
                table,
                if query.is_empty() { String::new() } else { format!("{}&", query) },
                PAGE_SIZE,
                rows.len()
            );
            let response = self.send(
                Method::GET,
                &path,
                None,
                Some(Self::prefer_headers("count=exact")),
            ).await?;

            let total = response.headers().get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(content_range_total);
            let page: Vec<T> = response.json().await?;
            let fetched = page.len();
            rows.extend(page);

            let done = match total {
                Some(total) => fetched == 0 || rows.len() as u64 >= total,
                None => fetched < PAGE_SIZE,
            };
            if done {
                break;
            }
            debug!("Fetched {} of {:?} rows from {}", rows.len(), total, table);
        }

        Ok(rows)
    }

    /// Exact number of rows matching `query`, read from the `Content-Range`
    /// of a `HEAD` request; no rows are transferred.
    pub async fn count(&self, table: &str, query: &str) -> Result<u64> {
        let path = if query.is_empty() {
            format!("/rest/v1/{}", table)
        } else {
            format!("/rest/v1/{}?{}", table, query)
        };
        let response = self.send(
            Method::HEAD,
            &path,
            None,
            Some(Self::prefer_headers("count=exact")),
        ).await?;

        response.headers().get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total)
            .ok_or_else(|| anyhow!("No row count returned for {}", table))
    }

    /// Insert one row and return the `columns` of the stored representation.
    pub async fn insert<T>(&self, table: &str, row: Value, columns: &str) -> Result<T>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?select={}", table, columns);
        let mut rows: Vec<T> = self.request_with_headers(
            Method::POST,
            &path,
            Some(row),
            Some(Self::representation_headers()),
        ).await?;

        if rows.is_empty() {
            return Err(anyhow!("Insert into {} returned no rows", table));
        }

        Ok(rows.swap_remove(0))
    }

    /// PATCH every row matching `filter`; returns the updated rows, which is
    /// empty when the filter matched nothing.
    pub async fn update<T>(&self, table: &str, filter: &str, patch: Value) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?{}", table, filter);

        self.request_with_headers(
            Method::PATCH,
            &path,
            Some(patch),
            Some(Self::representation_headers()),
        ).await
    }

    fn representation_headers() -> HeaderMap {
        Self::prefer_headers("return=representation")
    }

    fn prefer_headers(preference: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static(preference));
        headers
    }
}
