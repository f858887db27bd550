// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared fixtures for Graph client integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use liaison_graph::{GraphClient, GraphConfig, RetryConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TENANT_ID: &str = "tenant-1";
pub const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";

/// Hands out `token-1`, `token-2`, ... so tests can tell exchanges apart.
pub struct SequentialTokens {
	issued: Arc<AtomicU32>,
	expires_in: u64,
}

impl Respond for SequentialTokens {
	fn respond(&self, _request: &Request) -> ResponseTemplate {
		let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
		ResponseTemplate::new(200).set_body_json(json!({
			"token_type": "Bearer",
			"expires_in": self.expires_in,
			"access_token": format!("token-{n}"),
		}))
	}
}

pub fn fast_retry() -> RetryConfig {
	RetryConfig {
		max_throttle_retries: 3,
		max_transient_retries: 2,
		base_delay: Duration::from_millis(20),
		max_delay: Duration::from_millis(80),
		max_retry_after: Duration::from_millis(80),
		backoff_factor: 2.0,
		jitter: false,
	}
}

pub fn config_for(server: &MockServer) -> GraphConfig {
	GraphConfig::new(TENANT_ID, "client-1", "secret-1")
		.with_graph_base_url(&format!("{}/v1.0", server.uri()))
		.unwrap()
		.with_login_base_url(&server.uri())
		.unwrap()
		.with_retry_config(fast_retry())
}

pub fn client_for(server: &MockServer) -> GraphClient {
	GraphClient::new(config_for(server)).unwrap()
}

/// Mount a token endpoint issuing sequential tokens valid for an hour.
pub async fn mount_token_endpoint(server: &MockServer) {
	mount_token_endpoint_with(server, 3600, None).await;
}

pub async fn mount_token_endpoint_with(server: &MockServer, expires_in: u64, expected: Option<u64>) {
	let mock = Mock::given(method("POST")).and(path(TOKEN_PATH)).respond_with(SequentialTokens {
		issued: Arc::new(AtomicU32::new(0)),
		expires_in,
	});

	let mock = match expected {
		Some(n) => mock.expect(n),
		None => mock,
	};
	mock.mount(server).await;
}

/// Wrap items in a collection envelope.
pub fn odata_page(items: Vec<Value>, next_link: Option<&str>) -> Value {
	let mut page = json!({ "value": items });
	if let Some(link) = next_link {
		page["@odata.nextLink"] = json!(link);
	}
	page
}

/// Requests the server saw on `path`, excluding the token endpoint.
pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
	server
		.received_requests()
		.await
		.unwrap_or_default()
		.into_iter()
		.filter(|r| r.url.path() == request_path)
		.collect()
}
