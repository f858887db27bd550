// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authenticated Graph client with retry and 401-aware token refresh.

use std::sync::Arc;

use liaison_common_http::{parse_retry_after, retry, RetryConfig};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::auth::TokenProvider;
use crate::config::GraphConfig;
use crate::error::{excerpt, GraphError, GraphResult};

/// Query string pairs attached to a request.
pub type Query<'a> = &'a [(&'a str, &'a str)];

/// Status and decoded body of a successful call. Empty bodies decode to
/// `Value::Null`.
#[derive(Debug, Clone)]
pub struct GraphResponse {
	pub status: StatusCode,
	pub body: Value,
}

/// Client for the directory API.
///
/// Every call carries a bearer token from the shared [`TokenProvider`]. A 401
/// invalidates the cached token and replays the call once with a fresh one.
/// Throttling and transient failures are retried per the configured
/// [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct GraphClient {
	http_client: Client,
	config: Arc<GraphConfig>,
	tokens: Arc<TokenProvider>,
}

impl GraphClient {
	pub fn new(config: GraphConfig) -> GraphResult<Self> {
		let http_client = liaison_common_http::new_client_with_timeout(config.request_timeout)
			.map_err(|e| GraphError::Config(format!("Failed to create HTTP client: {e}")))?;

		let tokens = Arc::new(TokenProvider::new(&config, http_client.clone()));
		Ok(Self::with_token_provider(config, http_client, tokens))
	}

	/// Build a client around an existing token provider, e.g. to share one
	/// token cache between several clients.
	pub fn with_token_provider(
		config: GraphConfig,
		http_client: Client,
		tokens: Arc<TokenProvider>,
	) -> Self {
		info!(
			base_url = %config.graph_base_url(),
			tenant_id = %config.tenant_id(),
			"Created Graph client"
		);

		Self {
			http_client,
			config: Arc::new(config),
			tokens,
		}
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn retry_config(&self) -> &RetryConfig {
		&self.config.retry_config
	}

	pub fn token_provider(&self) -> &Arc<TokenProvider> {
		&self.tokens
	}

	/// Issue a request and return the decoded JSON body.
	pub async fn request(
		&self,
		method: Method,
		path: &str,
		body: Option<&Value>,
		query: Query<'_>,
	) -> GraphResult<Value> {
		Ok(self.send(method, path, body, query).await?.body)
	}

	pub async fn get(&self, path: &str, query: Query<'_>) -> GraphResult<Value> {
		self.request(Method::GET, path, None, query).await
	}

	pub async fn post(&self, path: &str, body: &Value) -> GraphResult<Value> {
		self.request(Method::POST, path, Some(body), &[]).await
	}

	pub async fn put(&self, path: &str, body: &Value) -> GraphResult<Value> {
		self.request(Method::PUT, path, Some(body), &[]).await
	}

	/// POST without throttle or transient retries. A 401 still refreshes the
	/// token and replays once. For calls with side effects that must not be
	/// repeated, such as invitations that email the invitee.
	pub async fn post_once(&self, path: &str, body: &Value) -> GraphResult<Value> {
		Ok(self
			.send_without_retry(Method::POST, path, Some(body), &[])
			.await?
			.body)
	}

	/// Issue a request and return status and body. `path` is either relative
	/// to the Graph base URL or an absolute URL such as a paging cursor.
	#[instrument(skip_all, fields(method = %method, path = %path))]
	pub async fn send(
		&self,
		method: Method,
		path: &str,
		body: Option<&Value>,
		query: Query<'_>,
	) -> GraphResult<GraphResponse> {
		retry(&self.config.retry_config, || {
			self.send_with_refresh(method.clone(), path, body, query)
		})
		.await
	}

	/// Like [`GraphClient::send`] but a throttled or transient failure is
	/// returned to the caller as-is.
	#[instrument(skip_all, fields(method = %method, path = %path))]
	pub async fn send_without_retry(
		&self,
		method: Method,
		path: &str,
		body: Option<&Value>,
		query: Query<'_>,
	) -> GraphResult<GraphResponse> {
		self.send_with_refresh(method, path, body, query).await
	}

	async fn send_with_refresh(
		&self,
		method: Method,
		path: &str,
		body: Option<&Value>,
		query: Query<'_>,
	) -> GraphResult<GraphResponse> {
		let credential = self.tokens.get_token().await?;

		match self
			.send_once(method.clone(), path, body, query, credential.access_token.expose())
			.await
		{
			Err(e) if e.is_unauthorized() => {
				info!(path, "Got 401, refreshing access token");
				self.tokens.invalidate().await;
				let fresh = self.tokens.get_token().await?;
				self
					.send_once(method, path, body, query, fresh.access_token.expose())
					.await
			}
			other => other,
		}
	}

	async fn send_once(
		&self,
		method: Method,
		path: &str,
		body: Option<&Value>,
		query: Query<'_>,
		token: &str,
	) -> GraphResult<GraphResponse> {
		let url = self.resolve(path);
		debug!(url = %url, "Sending Graph request");

		let mut request = self.http_client.request(method, &url).bearer_auth(token);
		if !query.is_empty() {
			request = request.query(query);
		}
		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request.send().await?;
		let status = response.status();

		if !status.is_success() {
			let retry_after = response
				.headers()
				.get(RETRY_AFTER)
				.and_then(|v| v.to_str().ok())
				.and_then(parse_retry_after);
			let text = response.text().await.unwrap_or_default();

			return Err(GraphError::Api {
				status: status.as_u16(),
				path: path.to_string(),
				body_excerpt: excerpt(&text),
				retry_after,
			});
		}

		let text = response.text().await?;
		let body = if text.trim().is_empty() {
			Value::Null
		} else {
			serde_json::from_str(&text).map_err(|e| {
				GraphError::InvalidResponse(format!("{path}: JSON parse error: {e}"))
			})?
		};

		Ok(GraphResponse { status, body })
	}

	fn resolve(&self, path: &str) -> String {
		if path.starts_with("https://") || path.starts_with("http://") {
			return path.to_string();
		}

		let base = self.config.graph_base_url();
		if path.starts_with('/') {
			format!("{base}{path}")
		} else {
			format!("{base}/{path}")
		}
	}
}
