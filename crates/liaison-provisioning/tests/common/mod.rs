// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Mock Graph tenant for onboarding tests.

#![allow(dead_code)]

use std::time::Duration;

use liaison_graph::{GraphClient, GraphConfig, RetryConfig};
use liaison_provisioning::ProvisioningRequest;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GROUP_ID: &str = "2f1c6a1e-group";

pub async fn start_tenant() -> MockServer {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/tenant-1/oauth2/v2.0/token"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"token_type": "Bearer",
			"expires_in": 3599,
			"access_token": "test-token",
		})))
		.mount(&server)
		.await;
	server
}

pub fn client_for(server: &MockServer) -> GraphClient {
	let config = GraphConfig::new("tenant-1", "client-1", "secret-1")
		.with_graph_base_url(&format!("{}/v1.0", server.uri()))
		.unwrap()
		.with_login_base_url(&server.uri())
		.unwrap()
		.with_retry_config(RetryConfig {
			max_throttle_retries: 2,
			max_transient_retries: 1,
			base_delay: Duration::from_millis(10),
			max_delay: Duration::from_millis(40),
			max_retry_after: Duration::from_millis(40),
			backoff_factor: 2.0,
			jitter: false,
		});
	GraphClient::new(config).unwrap()
}

pub fn contoso(invitees: &[&str]) -> ProvisioningRequest {
	ProvisioningRequest::new(
		"Contoso Logistics",
		"contoso-logistics.example",
		invitees.iter().map(|s| s.to_string()).collect(),
	)
}

pub fn group_created() -> ResponseTemplate {
	ResponseTemplate::new(201).set_body_json(json!({
		"id": GROUP_ID,
		"displayName": "SUPPLIER - Contoso Logistics",
		"mailNickname": "contosologistics",
	}))
}

pub async fn mount_group_created(server: &MockServer) {
	Mock::given(method("POST"))
		.and(path("/v1.0/groups"))
		.respond_with(group_created())
		.expect(1)
		.mount(server)
		.await;
}

pub async fn mount_team_accepted(server: &MockServer) {
	Mock::given(method("PUT"))
		.and(path(format!("/v1.0/teams/{GROUP_ID}")))
		.respond_with(ResponseTemplate::new(202))
		.expect(1)
		.mount(server)
		.await;
}

pub async fn mount_site(server: &MockServer, web_url: Option<&str>) {
	let body = match web_url {
		Some(url) => json!({"value": [{"id": "site-1", "webUrl": url}]}),
		None => json!({"value": []}),
	};
	Mock::given(method("GET"))
		.and(path(format!("/v1.0/groups/{GROUP_ID}/sites")))
		.respond_with(ResponseTemplate::new(200).set_body_json(body))
		.mount(server)
		.await;
}

pub fn invitation_for(guest_id: Option<&str>) -> Value {
	match guest_id {
		Some(id) => json!({
			"id": format!("inv-{id}"),
			"status": "PendingAcceptance",
			"invitedUser": {"id": id},
		}),
		None => json!({"id": "inv-anon", "status": "PendingAcceptance"}),
	}
}

pub fn members_ref_path() -> String {
	format!("/v1.0/groups/{GROUP_ID}/members/$ref")
}
