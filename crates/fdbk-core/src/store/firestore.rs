//! Cloud Firestore REST reader.
//!
//! Lists a collection page by page and decodes Firestore's typed values
//! (`{"stringValue": "..."}`, `{"integerValue": "5"}`, ...) into plain JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

use super::{Document, DocumentStore};
use crate::auth::AuthService;
use crate::config::FirebaseConfig;
use crate::error::{ServiceError, ServiceResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Documents requested per page.
const PAGE_SIZE: u32 = 300;

/// Firestore collection reader authenticated with the current session.
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    auth: Arc<dyn AuthService>,
}

impl FirestoreStore {
    /// # Errors
    /// Returns an error if the project id is missing or the base URL is malformed.
    pub fn from_config(config: &FirebaseConfig, auth: Arc<dyn AuthService>) -> Result<Self> {
        Ok(Self::new(
            config.effective_firestore_base_url()?,
            config.effective_project_id()?,
            auth,
        ))
    }

    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            project_id: project_id.into(),
            auth,
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{collection}",
            self.base_url, self.project_id
        )
    }

    async fn fetch_page(
        &self,
        url: &str,
        token: Option<&str>,
        page_token: Option<&str>,
    ) -> ServiceResult<ListResponse> {
        let mut request = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[("pageSize", PAGE_SIZE.to_string())]);
        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::transport(&e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::http_status(status.as_u16(), &body));
        }
        response
            .json()
            .await
            .map_err(|e| ServiceError::parse(format!("invalid list response: {e}")))
    }
}

impl DocumentStore for FirestoreStore {
    fn list_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, ServiceResult<Vec<Document>>> {
        Box::pin(async move {
            let token = self.auth.id_token().await?;
            let url = self.collection_url(collection);

            let mut documents = Vec::new();
            let mut page_token: Option<String> = None;
            loop {
                let page = self
                    .fetch_page(&url, token.as_deref(), page_token.as_deref())
                    .await?;
                for raw in page.documents {
                    documents.push(raw.decode());
                }
                match page.next_page_token.filter(|t| !t.is_empty()) {
                    Some(next) => page_token = Some(next),
                    None => break,
                }
            }

            tracing::debug!(collection, count = documents.len(), "listed documents");
            Ok(documents)
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl RawDocument {
    fn decode(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let fields = self
            .fields
            .into_iter()
            .map(|(key, value)| (key, decode_value(value)))
            .collect();
        Document::new(id, fields)
    }
}

/// Decodes a Firestore typed value into plain JSON.
///
/// Timestamps stay RFC 3339 strings; integers become JSON numbers.
/// Unrecognized shapes pass through unchanged.
pub fn decode_value(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };
    if map.len() != 1 {
        return Value::Object(map);
    }
    let Some((kind, inner)) = map.iter_mut().next().map(|(k, v)| (k.clone(), v.take())) else {
        return Value::Object(map);
    };

    match (kind.as_str(), inner) {
        ("nullValue", _) => Value::Null,
        ("stringValue" | "timestampValue" | "referenceValue", v @ Value::String(_))
        | ("booleanValue", v @ Value::Bool(_))
        | ("doubleValue", v @ Value::Number(_)) => v,
        ("integerValue", Value::String(s)) => s
            .parse::<i64>()
            .map_or(Value::String(s), |n| Value::Number(Number::from(n))),
        ("integerValue", v @ Value::Number(_)) => v,
        ("doubleValue", Value::String(s)) => match s.as_str() {
            // NaN and infinities have no JSON form
            "NaN" | "Infinity" | "-Infinity" => Value::Null,
            _ => Value::String(s),
        },
        ("mapValue", Value::Object(mut inner)) => {
            let fields = match inner.remove("fields") {
                Some(Value::Object(fields)) => fields,
                _ => Map::new(),
            };
            Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, decode_value(v)))
                    .collect(),
            )
        }
        ("arrayValue", Value::Object(mut inner)) => match inner.remove("values") {
            Some(Value::Array(values)) => {
                Value::Array(values.into_iter().map(decode_value).collect())
            }
            _ => Value::Array(Vec::new()),
        },
        ("geoPointValue", v @ Value::Object(_)) => v,
        (_, inner) => {
            let mut restored = Map::new();
            restored.insert(kind.clone(), inner);
            Value::Object(restored)
        }
    }
}
