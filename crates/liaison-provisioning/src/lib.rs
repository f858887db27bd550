// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Supplier onboarding against Microsoft Graph.
//!
//! [`SupplierOnboarding::run`] drives one onboarding from a
//! [`ProvisioningRequest`]:
//!
//! 1. create a Unified group for the supplier (the collaboration space)
//! 2. request a team on top of it
//! 3. look up the group's SharePoint site, best effort
//! 4. invite each supplier user as a guest and add them to the group
//!
//! Steps 1 and 2 abort the run on failure. Steps 3 and 4 record failures in
//! the returned [`ProvisioningRun`] instead.

mod alias;
mod error;
mod orchestrator;
mod outcome;
mod request;

pub use alias::{normalize_mail_alias, MAX_MAIL_ALIAS_LEN};
pub use error::{ProvisioningError, ProvisioningStep};
pub use orchestrator::{OnboardingSettings, SupplierOnboarding, DEFAULT_REDIRECT_URL};
pub use outcome::{
	CollaborationSpace, GuestOutcome, GuestStatus, ProvisioningRun, SiteReference,
	TeamProvisioningState,
};
pub use request::{ProvisioningRequest, DEFAULT_EXPIRY_HORIZON_DAYS};
