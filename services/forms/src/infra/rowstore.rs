//! HTTP gateway to the backing row store.
//!
//! The store is an external REST service: one collection per path, a
//! `column=op.value` filter grammar, and JSON rows in both directions.
//! Every call injects the service base URL and credential; repositories
//! (see `infra::store`) build their queries through [`TableQuery`] and
//! never hand-format query strings.

use reqwest::{Client, Method, StatusCode};
use serde::de::Error as _;
use serde_json::Value;

/// Failure talking to the row store. Handlers map every variant to a
/// generic 500; the detail stays in the server log.
#[derive(Debug, thiserror::Error)]
pub enum DataStoreError {
    #[error("row store transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("row store responded {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("row store returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Sort direction for `order=column.dir` fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Builder for `{table}?{filters}&select=…&order=…&limit=N` paths.
///
/// Filter values are percent-encoded; column names come from call sites
/// and are used verbatim.
#[derive(Debug, Clone)]
pub struct TableQuery {
    table: &'static str,
    filters: Vec<String>,
    select: Option<&'static str>,
    order: Option<String>,
    limit: Option<u32>,
}

impl TableQuery {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            filters: Vec::new(),
            select: None,
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push(format!("{column}=eq.{}", encode(value)));
        self
    }

    pub fn gt(mut self, column: &str, value: &str) -> Self {
        self.filters.push(format!("{column}=gt.{}", encode(value)));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push(format!("{column}=is.null"));
        self
    }

    pub fn select(mut self, columns: &'static str) -> Self {
        self.select = Some(columns);
        self
    }

    pub fn order(mut self, column: &str, dir: Order) -> Self {
        self.order = Some(format!("{column}.{}", dir.as_str()));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Render the path-and-query. Fragment order is filters, select,
    /// order, limit — stable so tests can assert on the string.
    pub fn build(&self) -> String {
        let mut parts = self.filters.clone();
        if let Some(select) = self.select {
            parts.push(format!("select={select}"));
        }
        if let Some(order) = &self.order {
            parts.push(format!("order={order}"));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        if parts.is_empty() {
            self.table.to_owned()
        } else {
            format!("{}?{}", self.table, parts.join("&"))
        }
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Shared HTTP handle to the row store.
#[derive(Clone)]
pub struct RowStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RowStore {
    pub fn new(client: Client, base_url: &str, service_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            service_key: service_key.to_owned(),
        }
    }

    /// One round trip to `{base_url}/{path_and_query}`. Returns the parsed
    /// JSON body, or `None` for empty/204 responses. Non-2xx responses
    /// become [`DataStoreError::Upstream`].
    pub async fn fetch_json(
        &self,
        path_and_query: &str,
        method: Method,
        body: Option<&Value>,
        prefer: Option<&'static str>,
    ) -> Result<Option<Value>, DataStoreError> {
        let url = format!("{}/{}", self.base_url, path_and_query);
        let mut req = self
            .client
            .request(method, &url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key);
        if let Some(prefer) = prefer {
            req = req.header("Prefer", prefer);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(DataStoreError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }
        if status == StatusCode::NO_CONTENT || text.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// GET returning the row array (an empty array when nothing matched).
    pub async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, DataStoreError> {
        let value = self
            .fetch_json(&query.build(), Method::GET, None, None)
            .await?;
        match value {
            Some(Value::Array(rows)) => Ok(rows),
            Some(other) => Err(DataStoreError::Decode(serde_json::Error::custom(format!(
                "expected a row array, got {other}"
            )))),
            None => Ok(Vec::new()),
        }
    }

    /// POST one row; the store's response body is not needed.
    pub async fn insert(&self, table: &'static str, row: &Value) -> Result<(), DataStoreError> {
        self.fetch_json(table, Method::POST, Some(row), Some("return=minimal"))
            .await?;
        Ok(())
    }

    /// PATCH matching rows and return them, so callers can see how many
    /// rows the filter actually hit.
    pub async fn update_returning(
        &self,
        query: &TableQuery,
        patch: &Value,
    ) -> Result<Vec<Value>, DataStoreError> {
        let value = self
            .fetch_json(
                &query.build(),
                Method::PATCH,
                Some(patch),
                Some("return=representation"),
            )
            .await?;
        match value {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Ok(Vec::new()),
        }
    }

    /// PATCH matching rows, ignoring the result.
    pub async fn update(&self, query: &TableQuery, patch: &Value) -> Result<(), DataStoreError> {
        self.fetch_json(
            &query.build(),
            Method::PATCH,
            Some(patch),
            Some("return=minimal"),
        )
        .await?;
        Ok(())
    }

    /// DELETE matching rows; missing rows are not an error.
    pub async fn delete(&self, query: &TableQuery) -> Result<(), DataStoreError> {
        self.fetch_json(&query.build(), Method::DELETE, None, Some("return=minimal"))
            .await?;
        Ok(())
    }
}
