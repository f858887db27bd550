// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OAuth2 client-credential token provider with caching.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use liaison_common_config::{Secret, SecretString};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};

/// Lifetime assumed when the provider omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// A bearer token, the instant it stops being valid, and the instant the
/// provider stops handing it out.
#[derive(Debug, Clone)]
pub struct Credential {
	pub access_token: SecretString,
	pub expires_at: DateTime<Utc>,
	pub refresh_at: DateTime<Utc>,
}

impl Credential {
	/// Credential issued now for `lifetime`. The refresh margin is capped at
	/// half the lifetime so short-lived tokens are still reused.
	pub fn issued(access_token: SecretString, lifetime: ChronoDuration, margin: ChronoDuration) -> Self {
		let now = Utc::now();
		let lifetime = lifetime.max(ChronoDuration::zero());
		let margin = margin.min(lifetime / 2).max(ChronoDuration::zero());
		let expires_at = now + lifetime;

		Self {
			access_token,
			expires_at,
			refresh_at: expires_at - margin,
		}
	}

	/// True until the refresh point is reached.
	pub fn is_usable(&self) -> bool {
		Utc::now() < self.refresh_at
	}
}

/// Obtains and caches an application token for service-to-service calls.
///
/// At most one exchange happens per validity window. Refreshes are serialized
/// so concurrent callers converge on one credential.
#[derive(Debug)]
pub struct TokenProvider {
	http_client: Client,
	token_url: String,
	client_id: String,
	client_secret: SecretString,
	scope: String,
	refresh_margin: ChronoDuration,
	cached: Mutex<Option<Credential>>,
	refresh_lock: Mutex<()>,
}

impl TokenProvider {
	pub fn new(config: &GraphConfig, http_client: Client) -> Self {
		let refresh_margin = ChronoDuration::from_std(config.token_refresh_margin)
			.unwrap_or_else(|_| ChronoDuration::minutes(5));

		Self {
			http_client,
			token_url: config.token_url(),
			client_id: config.client_id().to_string(),
			client_secret: Secret::new(config.client_secret().to_string()),
			scope: config.scope(),
			refresh_margin,
			cached: Mutex::new(None),
			refresh_lock: Mutex::new(()),
		}
	}

	/// Return a credential that has not reached its refresh point, exchanging
	/// client credentials when the cache is empty or stale.
	#[instrument(skip(self), fields(client_id = %self.client_id))]
	pub async fn get_token(&self) -> GraphResult<Credential> {
		if let Some(credential) = self.cached_credential().await {
			trace!("Using cached access token");
			return Ok(credential);
		}

		let _guard = self.refresh_lock.lock().await;

		if let Some(credential) = self.cached_credential().await {
			trace!("Using cached access token (post-lock)");
			return Ok(credential);
		}

		debug!("Requesting new access token");
		let credential = self.exchange().await?;

		*self.cached.lock().await = Some(credential.clone());
		info!(
			expires_at = %credential.expires_at,
			refresh_at = %credential.refresh_at,
			"Access token refreshed"
		);

		Ok(credential)
	}

	/// Drop the cached credential so the next call performs a fresh exchange.
	pub async fn invalidate(&self) {
		if self.cached.lock().await.take().is_some() {
			info!("Invalidated cached access token");
		}
	}

	async fn cached_credential(&self) -> Option<Credential> {
		let cache = self.cached.lock().await;
		cache
			.as_ref()
			.filter(|c| c.is_usable())
			.cloned()
	}

	async fn exchange(&self) -> GraphResult<Credential> {
		let params = [
			("grant_type", "client_credentials"),
			("client_id", self.client_id.as_str()),
			("client_secret", self.client_secret.expose().as_str()),
			("scope", self.scope.as_str()),
		];

		let response = self
			.http_client
			.post(&self.token_url)
			.form(&params)
			.send()
			.await?;

		let status = response.status();
		let payload = response.text().await.unwrap_or_default();

		let parsed: Option<Value> = serde_json::from_str(&payload).ok();
		let token = parsed
			.as_ref()
			.and_then(|v| v.get("access_token"))
			.and_then(Value::as_str)
			.filter(|t| !t.is_empty());

		let Some(token) = token else {
			warn!(status = status.as_u16(), "Token exchange returned no access token");
			let message = if status.is_success() {
				"token response did not contain an access token".to_string()
			} else {
				format!("token endpoint returned status {status}")
			};
			return Err(GraphError::Authentication { message, payload });
		};

		let lifetime = parsed
			.as_ref()
			.and_then(|v| v.get("expires_in"))
			.and_then(parse_expires_in)
			.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);

		Ok(Credential::issued(
			Secret::new(token.to_string()),
			ChronoDuration::seconds(lifetime),
			self.refresh_margin,
		))
	}
}

/// `expires_in` arrives as a number from the v2 endpoint and as a string from
/// some older tenants.
fn parse_expires_in(value: &Value) -> Option<i64> {
	match value {
		Value::Number(n) => n.as_i64(),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}
