// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Sequencing of the onboarding steps.

use chrono::{NaiveDate, Utc};
use liaison_graph::{GraphClient, GraphError};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::{ProvisioningError, ProvisioningStep};
use crate::outcome::{
	CollaborationSpace, GuestOutcome, ProvisioningRun, SiteReference, TeamProvisioningState,
};
use crate::request::ProvisioningRequest;

/// Where invited guests land when the group has no site yet.
pub const DEFAULT_REDIRECT_URL: &str = "https://teams.microsoft.com";

#[derive(Debug, Clone)]
pub struct OnboardingSettings {
	/// Request a team on the new group. When off the run skips straight to
	/// site lookup.
	pub provision_team: bool,
	/// Redirect target for invitations when no site was resolved.
	pub redirect_fallback: String,
	/// Have the directory email each invitee.
	pub send_invitation_message: bool,
}

impl Default for OnboardingSettings {
	fn default() -> Self {
		Self {
			provision_team: true,
			redirect_fallback: DEFAULT_REDIRECT_URL.to_string(),
			send_invitation_message: true,
		}
	}
}

/// Runs supplier onboardings. Steps are strictly sequential and a run never
/// retries itself; running the same request twice creates two groups.
#[derive(Debug, Clone)]
pub struct SupplierOnboarding {
	client: GraphClient,
	settings: OnboardingSettings,
}

impl SupplierOnboarding {
	pub fn new(client: GraphClient) -> Self {
		Self::with_settings(client, OnboardingSettings::default())
	}

	pub fn with_settings(client: GraphClient, settings: OnboardingSettings) -> Self {
		Self { client, settings }
	}

	pub fn settings(&self) -> &OnboardingSettings {
		&self.settings
	}

	/// Onboard one supplier.
	///
	/// Fails only when the request is invalid, the group cannot be created, or
	/// the team request is refused. In the last case the group already exists
	/// and is reported through [`ProvisioningError::orphaned_space_id`].
	#[instrument(
		skip_all,
		fields(organization = %request.organization_name, invitees = request.invitee_emails.len())
	)]
	pub async fn run(&self, request: &ProvisioningRequest) -> Result<ProvisioningRun, ProvisioningError> {
		request.validate()?;

		let today = Utc::now().date_naive();
		let space = self.create_space(request, today).await?;

		let team_state = if self.settings.provision_team {
			self.create_team(&space).await?
		} else {
			info!(space_id = %space.id, "Skipping team provisioning");
			TeamProvisioningState::NotRequested
		};

		let site = self.resolve_site(&space).await;

		let mut guests = Vec::with_capacity(request.invitee_emails.len());
		for email in &request.invitee_emails {
			guests.push(self.invite_guest(request, &space, &site, email).await);
		}

		let run = ProvisioningRun {
			space,
			team_state,
			site,
			guests,
		};

		info!(
			space_id = %run.space.id,
			team_state = ?run.team_state,
			site_resolved = run.site.is_resolved(),
			guests_failed = run.failed_guests().count(),
			"Supplier onboarding finished"
		);
		Ok(run)
	}

	async fn create_space(
		&self,
		request: &ProvisioningRequest,
		today: NaiveDate,
	) -> Result<CollaborationSpace, ProvisioningError> {
		let expiry = request.expiry_date(today).ok_or_else(|| {
			ProvisioningError::InvalidRequest(format!(
				"expiry horizon of {} days is out of range",
				request.expiry_horizon_days
			))
		})?;

		let display_name = request.display_name();
		let mail_alias = request.mail_alias();
		let description = request.description(expiry);

		let body = json!({
			"displayName": display_name,
			"mailNickname": mail_alias,
			"mailEnabled": true,
			"securityEnabled": false,
			"groupTypes": ["Unified"],
			"description": description,
		});

		let step_failed = |source| ProvisioningError::Step {
			step: ProvisioningStep::CreateSpace,
			source,
		};

		let group = self.client.post("/groups", &body).await.map_err(step_failed)?;
		let id = group
			.get("id")
			.and_then(Value::as_str)
			.filter(|id| !id.is_empty())
			.ok_or_else(|| {
				step_failed(GraphError::InvalidResponse(
					"group creation response has no id".to_string(),
				))
			})?;

		info!(space_id = %id, %display_name, %mail_alias, %expiry, "Created supplier group");

		Ok(CollaborationSpace {
			id: id.to_string(),
			display_name: group
				.get("displayName")
				.and_then(Value::as_str)
				.map(str::to_string)
				.unwrap_or(display_name),
			mail_alias,
			description,
		})
	}

	async fn create_team(
		&self,
		space: &CollaborationSpace,
	) -> Result<TeamProvisioningState, ProvisioningError> {
		let body = json!({
			"memberSettings": {"allowCreateUpdateChannels": true},
			"messagingSettings": {
				"allowUserEditMessages": true,
				"allowUserDeleteMessages": true,
			},
			"funSettings": {"allowGiphy": true},
			"template@odata.bind": format!(
				"{}/teamsTemplates('standard')",
				self.client.config().graph_base_url()
			),
		});

		let path = format!("/teams/{}", space.id);
		match self.client.send(Method::PUT, &path, Some(&body), &[]).await {
			Ok(response) => match response.status.as_u16() {
				200 | 202 => {
					info!(space_id = %space.id, status = response.status.as_u16(), "Team creation requested");
					Ok(TeamProvisioningState::Requested)
				}
				other => {
					warn!(space_id = %space.id, status = other, "Unexpected status for team creation");
					Ok(TeamProvisioningState::Unknown)
				}
			},
			Err(source) => {
				warn!(
					space_id = %space.id,
					error = %source,
					"Team creation refused; supplier group left in place"
				);
				Err(ProvisioningError::TeamNotAccepted {
					space_id: space.id.clone(),
					source,
				})
			}
		}
	}

	async fn resolve_site(&self, space: &CollaborationSpace) -> SiteReference {
		let path = format!("/groups/{}/sites", space.id);
		let sites = match self.client.get(&path, &[]).await {
			Ok(sites) => sites,
			Err(e) => {
				warn!(space_id = %space.id, error = %e, "Site lookup failed; continuing without a site");
				return SiteReference::default();
			}
		};

		match sites.pointer("/value/0/webUrl").and_then(Value::as_str) {
			Some(url) => {
				info!(space_id = %space.id, site_url = url, "Resolved group site");
				SiteReference::resolved(url)
			}
			None => {
				debug!(space_id = %space.id, "Group has no site yet");
				SiteReference::default()
			}
		}
	}

	#[instrument(skip(self, request, space, site), fields(space_id = %space.id))]
	async fn invite_guest(
		&self,
		request: &ProvisioningRequest,
		space: &CollaborationSpace,
		site: &SiteReference,
		email: &str,
	) -> GuestOutcome {
		let redirect = site
			.url
			.as_deref()
			.unwrap_or(&self.settings.redirect_fallback);

		let invitation = json!({
			"invitedUserEmailAddress": email.trim(),
			"inviteRedirectUrl": redirect,
			"sendInvitationMessage": self.settings.send_invitation_message,
			"invitedUserMessageInfo": {
				"customizedMessageBody": format!(
					"You've been granted secure supplier access for {}.",
					request.organization_name
				),
			},
		});

		// Invitations send mail, so a failed one is reported rather than replayed.
		let response = match self.client.post_once("/invitations", &invitation).await {
			Ok(response) => response,
			Err(e) => {
				warn!(error = %e, "Invitation failed");
				return GuestOutcome::failed(email, None, format!("invitation: {e}"));
			}
		};

		let Some(guest_id) = response
			.pointer("/invitedUser/id")
			.and_then(Value::as_str)
			.filter(|id| !id.is_empty())
		else {
			warn!("Invitation returned no guest id; skipping group membership");
			return GuestOutcome::no_identity(email);
		};

		let reference = json!({
			"@odata.id": self.client.config().directory_object_url(guest_id),
		});
		let members = format!("/groups/{}/members/$ref", space.id);

		match self.client.post(&members, &reference).await {
			Ok(_) => {
				info!(guest_id, "Invited guest and added to group");
				GuestOutcome::added(email, guest_id)
			}
			Err(e) => {
				warn!(guest_id, error = %e, "Adding guest to group failed");
				GuestOutcome::failed(email, Some(guest_id.to_string()), format!("group membership: {e}"))
			}
		}
	}
}
