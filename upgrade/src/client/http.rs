// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transport over the alpha's HTTP API
//!
//! Endpoints used:
//! - `GET  /health`                   reachability probe on dial
//! - `POST /login`                    ACL login, returns `accessJWT`
//! - `POST /query`                    DQL query (`application/graphql+-`)
//! - `POST /mutate?commitNow=true`    JSON or RDF mutation
//! - `POST /alter`                    schema text or JSON drop operation

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use super::payload::{DropOp, Mutation, Operation};
use super::transport::Transport;
use crate::config::{ConnectionConfig, Credentials};
use crate::error::{Result, UpgradeError};

const ACCESS_TOKEN_HEADER: &str = "X-Dgraph-AccessToken";
const QUERY_CONTENT_TYPE: &str = "application/graphql+-";

/// HTTP connection to one alpha
pub struct HttpTransport {
    base_url: String,
    http_client: reqwest::Client,
    access_token: RwLock<Option<String>>,
    closed: AtomicBool,
}

#[derive(Debug, Deserialize)]
struct DgraphResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<DgraphErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct DgraphErrorMessage {
    message: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    userid: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    #[serde(rename = "accessJWT")]
    access_jwt: String,
}

impl HttpTransport {
    /// Open a connection and check that the alpha answers.
    pub async fn dial(config: &ConnectionConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(config.timeouts.query)
            .build()
            .map_err(|e| UpgradeError::Connection(e.to_string()))?;

        let url = format!("{}/health", base_url);
        debug!("[DIAL] Probing alpha at url={}", url);
        let response = http_client
            .get(&url)
            .timeout(config.timeouts.query)
            .send()
            .await
            .map_err(|e| UpgradeError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpgradeError::Connection(format!(
                "health check at {} returned {}",
                url,
                response.status()
            )));
        }

        Ok(Self::new(base_url, http_client))
    }

    fn new(base_url: String, http_client: reqwest::Client) -> Self {
        Self {
            base_url,
            http_client,
            access_token: RwLock::new(None),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(UpgradeError::Connection("connection is closed".into()));
        }
        Ok(())
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http_client.post(url);
        match self.access_token.read().as_deref() {
            Some(token) => builder.header(ACCESS_TOKEN_HEADER, token),
            None => builder,
        }
    }

    /// Send a request and split the response into data or an error message.
    async fn send(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<Option<Value>, String> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        debug!(
            "[HTTP] {} status={} duration_ms={}",
            endpoint,
            status,
            start.elapsed().as_millis()
        );

        parse_response(status, &body)
    }

    fn query_request(&self, query: &str) -> reqwest::RequestBuilder {
        self.post("/query")
            .header(reqwest::header::CONTENT_TYPE, QUERY_CONTENT_TYPE)
            .body(query.to_string())
    }

    /// Keep the access token from a login response for later requests.
    fn store_login(&self, data: Option<Value>) -> Result<()> {
        let data = data
            .ok_or_else(|| UpgradeError::Authentication("login returned no token".into()))?;
        let login: LoginData = serde_json::from_value(data)
            .map_err(|e| UpgradeError::Authentication(format!("bad login response: {}", e)))?;

        *self.access_token.write() = Some(login.access_jwt);
        Ok(())
    }
}

/// Split a response body into data or an error message.
///
/// A non-empty `errors` array fails the call even on a 200.
fn parse_response(
    status: reqwest::StatusCode,
    body: &str,
) -> std::result::Result<Option<Value>, String> {
    let parsed: DgraphResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if status.is_success() => {
            return Err(format!("unexpected response body: {}", body));
        }
        Err(_) => return Err(format!("{}: {}", status, body)),
    };

    if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(messages.join("; "));
    }
    if !status.is_success() {
        return Err(format!("{}: {}", status, body));
    }

    Ok(parsed.data)
}

/// Body and content type for a mutation
fn encode_mutation(mutation: &Mutation) -> (String, &'static str) {
    if mutation.uses_nquads() {
        let mut body = String::from("{\n");
        if !mutation.set_nquads.trim().is_empty() {
            body.push_str("  set {\n");
            body.push_str(&mutation.set_nquads);
            body.push_str("\n  }\n");
        }
        if !mutation.del_nquads.trim().is_empty() {
            body.push_str("  delete {\n");
            body.push_str(&mutation.del_nquads);
            body.push_str("\n  }\n");
        }
        body.push('}');
        return (body, "application/rdf");
    }

    let mut body = serde_json::Map::new();
    if let Some(set) = &mutation.set_json {
        body.insert("set".to_string(), set.clone());
    }
    if let Some(delete) = &mutation.delete_json {
        body.insert("delete".to_string(), delete.clone());
    }
    (Value::Object(body).to_string(), "application/json")
}

/// Body for an alter call: raw schema text, or a JSON drop instruction
fn encode_operation(operation: &Operation) -> String {
    match operation.drop_op {
        None => operation.schema.clone(),
        Some(DropOp::Attr) => json!({ "drop_attr": operation.drop_value }).to_string(),
        Some(DropOp::Type) => {
            json!({ "drop_op": "TYPE", "drop_value": operation.drop_value }).to_string()
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.ensure_open()?;
        debug!("[LOGIN] Authenticating user '{}'", credentials.user);

        let request = self.post("/login").json(&LoginRequest {
            userid: &credentials.user,
            password: &credentials.password,
        });
        let data = self
            .send("login", request)
            .await
            .map_err(UpgradeError::Authentication)?;
        self.store_login(data)
    }

    async fn query(&self, query: &str) -> Result<Value> {
        self.ensure_open()?;
        let request = self.query_request(query);
        let data = self.send("query", request).await.map_err(UpgradeError::Query)?;
        Ok(data.unwrap_or(Value::Null))
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<()> {
        self.ensure_open()?;
        let (body, content_type) = encode_mutation(mutation);
        let path = if mutation.commit_now {
            "/mutate?commitNow=true"
        } else {
            "/mutate"
        };
        let request = self
            .post(path)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        self.send("mutate", request)
            .await
            .map_err(UpgradeError::Mutation)?;
        Ok(())
    }

    async fn alter(&self, operation: &Operation) -> Result<()> {
        self.ensure_open()?;
        let request = self.post("/alter").body(encode_operation(operation));
        self.send("alter", request).await.map_err(UpgradeError::Alter)?;
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.access_token.write().take();
    }
}
