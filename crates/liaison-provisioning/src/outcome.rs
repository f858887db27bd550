// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Result types of an onboarding run.

use serde::Serialize;

/// The Unified group created for a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaborationSpace {
	pub id: String,
	pub display_name: String,
	pub mail_alias: String,
	pub description: String,
}

/// Teams provisions asynchronously; completion is never observed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamProvisioningState {
	NotRequested,
	/// The service answered 200 or 202.
	Requested,
	/// The service answered with a 2xx it does not document for team creation.
	Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteReference {
	pub url: Option<String>,
}

impl SiteReference {
	pub fn resolved(url: impl Into<String>) -> Self {
		Self {
			url: Some(url.into()),
		}
	}

	pub fn is_resolved(&self) -> bool {
		self.url.is_some()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestStatus {
	InvitedAndAdded,
	/// The invitation succeeded but returned no user id, so group membership
	/// was skipped.
	InvitedNoIdentity,
	Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestOutcome {
	pub email: String,
	pub status: GuestStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub guest_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl GuestOutcome {
	pub fn added(email: impl Into<String>, guest_id: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			status: GuestStatus::InvitedAndAdded,
			guest_id: Some(guest_id.into()),
			error: None,
		}
	}

	pub fn no_identity(email: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			status: GuestStatus::InvitedNoIdentity,
			guest_id: None,
			error: None,
		}
	}

	/// `guest_id` is set when the invitation went through but adding the
	/// guest to the group failed.
	pub fn failed(email: impl Into<String>, guest_id: Option<String>, error: impl ToString) -> Self {
		Self {
			email: email.into(),
			status: GuestStatus::Failed,
			guest_id,
			error: Some(error.to_string()),
		}
	}

	pub fn is_failed(&self) -> bool {
		self.status == GuestStatus::Failed
	}
}

/// Everything an onboarding run produced. `guests` has one entry per
/// requested invitee, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningRun {
	pub space: CollaborationSpace,
	pub team_state: TeamProvisioningState,
	pub site: SiteReference,
	pub guests: Vec<GuestOutcome>,
}

impl ProvisioningRun {
	pub fn failed_guests(&self) -> impl Iterator<Item = &GuestOutcome> {
		self.guests.iter().filter(|g| g.is_failed())
	}

	/// True when every invitee ended up in the group.
	pub fn fully_onboarded(&self) -> bool {
		self
			.guests
			.iter()
			.all(|g| g.status == GuestStatus::InvitedAndAdded)
	}
}
