// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::alias::normalize_mail_alias;
use crate::error::ProvisioningError;

pub const DEFAULT_EXPIRY_HORIZON_DAYS: u32 = 90;

/// Input for one supplier onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningRequest {
	pub organization_name: String,
	/// Supplier's email domain. Only used in the group description.
	pub domain_hint: String,
	/// Processed in this order.
	pub invitee_emails: Vec<String>,
	pub expiry_horizon_days: u32,
}

impl ProvisioningRequest {
	pub fn new(
		organization_name: impl Into<String>,
		domain_hint: impl Into<String>,
		invitee_emails: Vec<String>,
	) -> Self {
		Self {
			organization_name: organization_name.into(),
			domain_hint: domain_hint.into(),
			invitee_emails,
			expiry_horizon_days: DEFAULT_EXPIRY_HORIZON_DAYS,
		}
	}

	pub fn with_expiry_horizon_days(mut self, days: u32) -> Self {
		self.expiry_horizon_days = days;
		self
	}

	/// Reject requests that cannot produce a valid group before any remote
	/// call is made.
	pub fn validate(&self) -> Result<(), ProvisioningError> {
		if self.organization_name.trim().is_empty() {
			return Err(ProvisioningError::InvalidRequest(
				"organization name is empty".to_string(),
			));
		}
		if self.mail_alias().is_empty() {
			return Err(ProvisioningError::InvalidRequest(format!(
				"organization name {:?} contains no ASCII letters or digits to build a mail alias from",
				self.organization_name
			)));
		}
		if let Some(blank) = self.invitee_emails.iter().position(|e| e.trim().is_empty()) {
			return Err(ProvisioningError::InvalidRequest(format!(
				"invitee #{} has an empty email address",
				blank + 1
			)));
		}
		Ok(())
	}

	pub fn mail_alias(&self) -> String {
		normalize_mail_alias(&self.organization_name)
	}

	pub fn display_name(&self) -> String {
		format!("SUPPLIER - {}", self.organization_name)
	}

	/// `today` plus the expiry horizon, `None` past the end of the calendar.
	pub fn expiry_date(&self, today: NaiveDate) -> Option<NaiveDate> {
		today.checked_add_days(Days::new(u64::from(self.expiry_horizon_days)))
	}

	pub fn description(&self, expiry: NaiveDate) -> String {
		format!(
			"Supplier: {} ({}) | Expires on {}",
			self.organization_name,
			self.domain_hint,
			expiry.format("%Y-%m-%d")
		)
	}
}
