// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Audit of guest accounts by originating email domain.
//!
//! [`fetch_guest_identities`] pages through every guest user,
//! [`aggregate_domains`] groups them by domain, and [`write_report`] exports
//! the rows as CSV.

mod domain;
mod error;
mod export;
mod fetch;
mod report;

pub use domain::{extract_domain, GuestIdentityRecord, EXTERNAL_ACCOUNT_MARKER};
pub use error::{AuditError, AuditResult};
pub use export::{write_report, write_report_to_path, DEFAULT_REPORT_FILE};
pub use fetch::{fetch_guest_identities, GUEST_FILTER, GUEST_SELECT};
pub use report::{aggregate_domains, DomainReportRow, MAX_SAMPLE_IDENTITIES};
