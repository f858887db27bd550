// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! CSV export of the domain report.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{AuditError, AuditResult};
use crate::report::DomainReportRow;

pub const DEFAULT_REPORT_FILE: &str = "external_tenants.csv";

const SAMPLE_SEPARATOR: &str = "; ";

#[derive(Debug, Serialize)]
struct CsvReportRecord<'a> {
	#[serde(rename = "ExternalDomain")]
	external_domain: &'a str,
	#[serde(rename = "UserCount")]
	user_count: usize,
	#[serde(rename = "SampleUsers")]
	sample_users: String,
}

impl<'a> From<&'a DomainReportRow> for CsvReportRecord<'a> {
	fn from(row: &'a DomainReportRow) -> Self {
		Self {
			external_domain: &row.domain,
			user_count: row.user_count,
			sample_users: row.sample_identities.join(SAMPLE_SEPARATOR),
		}
	}
}

/// Write `rows` as CSV with columns `ExternalDomain,UserCount,SampleUsers`.
///
/// The header is written even when there are no rows.
pub fn write_report<W: Write>(rows: &[DomainReportRow], writer: W) -> AuditResult<()> {
	let mut wtr = csv::Writer::from_writer(writer);

	if rows.is_empty() {
		wtr.write_record(["ExternalDomain", "UserCount", "SampleUsers"])?;
	}
	for row in rows {
		wtr.serialize(CsvReportRecord::from(row))?;
	}

	wtr.flush().map_err(csv::Error::from)?;
	Ok(())
}

/// Create (or truncate) `path` and write the report to it.
pub fn write_report_to_path(rows: &[DomainReportRow], path: &Path) -> AuditResult<()> {
	let file = File::create(path).map_err(|source| AuditError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	write_report(rows, file)
}
