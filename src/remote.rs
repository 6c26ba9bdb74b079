// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Hosted document database and sign-in (Firebase REST endpoints).
//!
//! Calls are blocking and made once; nothing here retries.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::utils::http_client;

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";
const IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
const PAGE_SIZE: usize = 300;

pub const TRANSACTIONS: &str = "transactions";
pub const BUDGETS: &str = "budgets";
pub const GOALS: &str = "goals";
pub const TIPS: &str = "financialLiteracy";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote sync is not configured (run `ndalaflow remote configure`)")]
    NotConfigured,
    #[error("not signed in (run `ndalaflow auth login`)")]
    NotSignedIn,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id_token: String,
    pub user_id: String,
    pub email: String,
}

/// A document with its typed values already flattened to plain JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

pub trait RemoteStore {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError>;
    /// Returns the new document id.
    fn create(
        &self,
        session: &Session,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<String, RemoteError>;
    fn update(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), RemoteError>;
    fn list(&self, session: &Session, collection: &str)
    -> Result<Vec<RemoteDocument>, RemoteError>;
}

pub struct FirestoreClient {
    config: RemoteConfig,
    http: Client,
}

impl FirestoreClient {
    pub fn new(config: RemoteConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            http: http_client()?,
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            FIRESTORE_BASE, self.config.project_id, collection
        )
    }

    fn authed(&self, req: RequestBuilder, session: &Session) -> RequestBuilder {
        req.bearer_auth(&session.id_token)
            .query(&[("key", self.config.api_key.as_str())])
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct DocumentBody {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListBody {
    #[serde(default)]
    documents: Vec<DocumentBody>,
    next_page_token: Option<String>,
}

fn check(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body: Value = resp.json().unwrap_or(Value::Null);
    let message = body
        .pointer("/error/message")
        .and_then(Value::as_str)
        .unwrap_or("no error message")
        .to_string();
    Err(RemoteError::Rejected {
        status: status.as_u16(),
        message,
    })
}

fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

impl RemoteStore for FirestoreClient {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let url = format!("{}/accounts:signInWithPassword", IDENTITY_BASE);
        let resp = self
            .http
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&json!({ "email": email, "password": password, "returnSecureToken": true }))
            .send()?;
        let body: SignInResponse = check(resp)?.json()?;
        Ok(Session {
            id_token: body.id_token,
            user_id: body.local_id,
            email: if body.email.is_empty() {
                email.to_string()
            } else {
                body.email
            },
        })
    }

    fn create(
        &self,
        session: &Session,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<String, RemoteError> {
        let req = self
            .http
            .post(self.documents_url(collection))
            .json(&json!({ "fields": encode_fields(&fields) }));
        let body: DocumentBody = check(self.authed(req, session).send()?)?.json()?;
        let id = document_id(&body.name);
        debug!(collection, %id, "created remote document");
        Ok(id)
    }

    fn update(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), RemoteError> {
        let url = format!("{}/{}", self.documents_url(collection), id);
        let req = self
            .http
            .patch(url)
            .json(&json!({ "fields": encode_fields(&fields) }));
        check(self.authed(req, session).send()?)?;
        debug!(collection, id, "updated remote document");
        Ok(())
    }

    fn list(
        &self,
        session: &Session,
        collection: &str,
    ) -> Result<Vec<RemoteDocument>, RemoteError> {
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self
                .http
                .get(self.documents_url(collection))
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(ref token) = page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }
            let body: ListBody = check(self.authed(req, session).send()?)?.json()?;
            out.extend(body.documents.iter().map(to_document));
            match body.next_page_token.filter(|t| !t.is_empty()) {
                Some(t) => page_token = Some(t),
                None => break,
            }
        }
        Ok(out)
    }
}

/// A document whose fields cannot be decoded comes back with no fields, so
/// callers skip it like any other document missing required fields.
fn to_document(doc: &DocumentBody) -> RemoteDocument {
    let id = document_id(&doc.name);
    let fields = match decode_fields(&doc.fields) {
        Ok(fields) => fields,
        Err(err) => {
            debug!(%id, error = %err, "remote document unreadable");
            Map::new()
        }
    };
    RemoteDocument { id, fields }
}

/// Plain JSON -> typed value map (`{"amount": {"doubleValue": 1.5}}`).
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

fn encode_value(v: &Value) -> Value {
    match v {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, RemoteError> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(k, v)?)))
        .collect()
}

fn decode_value(field: &str, v: &Value) -> Result<Value, RemoteError> {
    let obj = v
        .as_object()
        .ok_or_else(|| RemoteError::Decode(format!("field '{}' is not a typed value", field)))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| RemoteError::Decode(format!("field '{}' has no value", field)))?;
    Ok(match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "doubleValue" => inner.clone(),
        "stringValue" | "timestampValue" | "referenceValue" => inner.clone(),
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| RemoteError::Decode(format!("field '{}': bad integer '{}'", field, s)))?,
            other => other.clone(),
        },
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| decode_value(field, item))
                        .collect::<Result<Vec<_>, _>>()
                })
                .transpose()?
                .unwrap_or_default();
            Value::Array(values)
        }
        "mapValue" => {
            let empty = Map::new();
            let nested = inner
                .get("fields")
                .and_then(Value::as_object)
                .unwrap_or(&empty);
            Value::Object(decode_fields(nested)?)
        }
        other => {
            return Err(RemoteError::Decode(format!(
                "field '{}': unsupported value type '{}'",
                field, other
            )));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_survive_encoding() {
        let mut plain = Map::new();
        plain.insert("amount".into(), json!(15000.5));
        plain.insert("count".into(), json!(3));
        plain.insert("category".into(), json!("market"));
        plain.insert("note".into(), Value::Null);
        plain.insert("tags".into(), json!(["a", "b"]));

        let typed = encode_fields(&plain);
        assert_eq!(typed["count"], json!({ "integerValue": "3" }));
        assert_eq!(typed["amount"], json!({ "doubleValue": 15000.5 }));
        assert_eq!(decode_fields(&typed).unwrap(), plain);
    }

    #[test]
    fn document_id_is_last_segment() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/transactions/abc123"),
            "abc123"
        );
    }

    #[test]
    fn unreadable_document_keeps_its_id_and_drops_fields() {
        let body: ListBody = serde_json::from_value(json!({
            "documents": [
                {
                    "name": "projects/p/databases/(default)/documents/budgets/b1",
                    "fields": { "where": { "geoPointValue": { "latitude": 1.0 } } }
                },
                {
                    "name": "projects/p/databases/(default)/documents/budgets/b2",
                    "fields": { "amount": { "integerValue": "10000" } }
                }
            ]
        }))
        .unwrap();
        let docs: Vec<RemoteDocument> = body.documents.iter().map(to_document).collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "b1");
        assert!(docs[0].fields.is_empty());
        assert_eq!(docs[1].fields["amount"], json!(10000));
    }

    #[test]
    fn unknown_value_type_is_rejected() {
        let mut typed = Map::new();
        typed.insert("where".into(), json!({ "geoPointValue": { "latitude": 1.0 } }));
        assert!(matches!(decode_fields(&typed), Err(RemoteError::Decode(_))));
    }
}
