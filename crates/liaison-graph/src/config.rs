// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration for the Graph client.

use std::time::Duration;

use liaison_common_config::{
	optional_env, parse_base_url, require_env, require_secret_env, Secret, SecretString,
};
use liaison_common_http::RetryConfig;
use url::Url;

use crate::error::{GraphError, GraphResult};

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";

const ENV_TENANT_ID: &str = "LIAISON_TENANT_ID";
const ENV_CLIENT_ID: &str = "LIAISON_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "LIAISON_CLIENT_SECRET";
const ENV_GRAPH_BASE_URL: &str = "LIAISON_GRAPH_BASE_URL";
const ENV_LOGIN_BASE_URL: &str = "LIAISON_LOGIN_BASE_URL";

/// Application identity and endpoints for Graph access.
///
/// The client secret is held as a [`SecretString`]; `Debug` output never
/// includes it.
#[derive(Debug, Clone)]
pub struct GraphConfig {
	tenant_id: String,
	client_id: String,
	client_secret: SecretString,
	graph_base_url: Url,
	login_base_url: Url,

	/// Per-request timeout on the underlying HTTP client.
	pub request_timeout: Duration,

	/// Refresh the access token when less than this much lifetime remains.
	/// Capped at half the lifetime of each issued token.
	pub token_refresh_margin: Duration,

	/// Retry budgets and backoff for API calls.
	pub retry_config: RetryConfig,
}

impl GraphConfig {
	/// Create a configuration pointing at the public Microsoft cloud.
	pub fn new(
		tenant_id: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			tenant_id: tenant_id.into(),
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret.into()),
			graph_base_url: Url::parse(DEFAULT_GRAPH_BASE_URL).expect("default URL is valid"),
			login_base_url: Url::parse(DEFAULT_LOGIN_BASE_URL).expect("default URL is valid"),
			request_timeout: Duration::from_secs(30),
			token_refresh_margin: Duration::from_secs(5 * 60),
			retry_config: RetryConfig::default(),
		}
	}

	/// Create configuration from environment variables.
	///
	/// Required:
	/// - `LIAISON_TENANT_ID`
	/// - `LIAISON_CLIENT_ID`
	/// - `LIAISON_CLIENT_SECRET` (or `LIAISON_CLIENT_SECRET_FILE`)
	///
	/// Optional:
	/// - `LIAISON_GRAPH_BASE_URL` (defaults to `https://graph.microsoft.com/v1.0`)
	/// - `LIAISON_LOGIN_BASE_URL` (defaults to `https://login.microsoftonline.com`)
	pub fn from_env() -> GraphResult<Self> {
		let tenant_id = require_env(ENV_TENANT_ID).map_err(config_error)?;
		let client_id = require_env(ENV_CLIENT_ID).map_err(config_error)?;
		let client_secret = require_secret_env(ENV_CLIENT_SECRET).map_err(config_error)?;

		let mut config = Self {
			client_secret,
			..Self::new(tenant_id, client_id, String::new())
		};

		if let Some(raw) = optional_env(ENV_GRAPH_BASE_URL) {
			config.graph_base_url = parse_base_url(ENV_GRAPH_BASE_URL, &raw).map_err(config_error)?;
		}
		if let Some(raw) = optional_env(ENV_LOGIN_BASE_URL) {
			config.login_base_url = parse_base_url(ENV_LOGIN_BASE_URL, &raw).map_err(config_error)?;
		}

		Ok(config)
	}

	pub fn with_graph_base_url(mut self, raw: &str) -> GraphResult<Self> {
		self.graph_base_url = parse_base_url("graph base URL", raw).map_err(config_error)?;
		Ok(self)
	}

	pub fn with_login_base_url(mut self, raw: &str) -> GraphResult<Self> {
		self.login_base_url = parse_base_url("login base URL", raw).map_err(config_error)?;
		Ok(self)
	}

	pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
		self.retry_config = retry_config;
		self
	}

	pub fn with_token_refresh_margin(mut self, margin: Duration) -> Self {
		self.token_refresh_margin = margin;
		self
	}

	pub fn tenant_id(&self) -> &str {
		&self.tenant_id
	}

	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	pub fn client_secret(&self) -> &str {
		self.client_secret.expose()
	}

	/// Graph base URL without a trailing slash, e.g. `https://graph.microsoft.com/v1.0`.
	pub fn graph_base_url(&self) -> &str {
		self.graph_base_url.as_str().trim_end_matches('/')
	}

	/// OAuth2 v2 token endpoint for the configured tenant.
	pub fn token_url(&self) -> String {
		format!(
			"{}/{}/oauth2/v2.0/token",
			self.login_base_url.as_str().trim_end_matches('/'),
			self.tenant_id
		)
	}

	/// Client-credential scope for the Graph resource, e.g.
	/// `https://graph.microsoft.com/.default`.
	pub fn scope(&self) -> String {
		format!("{}/.default", self.graph_base_url.origin().ascii_serialization())
	}

	/// Absolute `directoryObjects` URL used for `@odata.id` references.
	pub fn directory_object_url(&self, object_id: &str) -> String {
		format!("{}/directoryObjects/{}", self.graph_base_url(), object_id)
	}
}

fn config_error(e: impl std::fmt::Display) -> GraphError {
	GraphError::Config(e.to_string())
}
