// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use liaison_graph::GraphError;
use serde::Serialize;
use thiserror::Error;

/// Remote steps whose failure aborts an onboarding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningStep {
	CreateSpace,
	CreateTeam,
}

impl fmt::Display for ProvisioningStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ProvisioningStep::CreateSpace => "create space",
			ProvisioningStep::CreateTeam => "create team",
		};
		f.write_str(name)
	}
}

/// Failures that abort an onboarding run.
///
/// Site lookup and per-guest failures never show up here; they are recorded
/// in the run result.
#[derive(Debug, Error)]
pub enum ProvisioningError {
	#[error("Invalid provisioning request: {0}")]
	InvalidRequest(String),

	#[error("Step '{step}' failed: {source}")]
	Step {
		step: ProvisioningStep,
		#[source]
		source: GraphError,
	},

	/// The group exists but no team was requested on it. The group is left in
	/// place.
	#[error("Team request for space {space_id} was not accepted: {source}")]
	TeamNotAccepted {
		space_id: String,
		#[source]
		source: GraphError,
	},
}

impl ProvisioningError {
	pub fn step(&self) -> Option<ProvisioningStep> {
		match self {
			ProvisioningError::InvalidRequest(_) => None,
			ProvisioningError::Step { step, .. } => Some(*step),
			ProvisioningError::TeamNotAccepted { .. } => Some(ProvisioningStep::CreateTeam),
		}
	}

	/// Id of a space that was created before the run aborted.
	pub fn orphaned_space_id(&self) -> Option<&str> {
		match self {
			ProvisioningError::TeamNotAccepted { space_id, .. } => Some(space_id),
			_ => None,
		}
	}

	pub fn graph_error(&self) -> Option<&GraphError> {
		match self {
			ProvisioningError::Step { source, .. } | ProvisioningError::TeamNotAccepted { source, .. } => {
				Some(source)
			}
			ProvisioningError::InvalidRequest(_) => None,
		}
	}
}
