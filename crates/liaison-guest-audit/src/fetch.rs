// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use futures::TryStreamExt;
use liaison_graph::{GraphClient, GraphError};
use tracing::{info, instrument};

use crate::domain::GuestIdentityRecord;
use crate::error::AuditResult;

pub const GUEST_FILTER: &str = "userType eq 'Guest'";
pub const GUEST_SELECT: &str = "mail,userPrincipalName";

/// List every guest user in the tenant, following pagination to the end.
#[instrument(skip_all)]
pub async fn fetch_guest_identities(client: &GraphClient) -> AuditResult<Vec<GuestIdentityRecord>> {
	let guests: Vec<GuestIdentityRecord> = client
		.list_all("/users", &[("$filter", GUEST_FILTER), ("$select", GUEST_SELECT)])
		.and_then(|user| async move {
			serde_json::from_value::<GuestIdentityRecord>(user)
				.map_err(|e| GraphError::InvalidResponse(format!("unexpected user object: {e}")))
		})
		.try_collect()
		.await?;

	info!(count = guests.len(), "Retrieved guest users");
	Ok(guests)
}
