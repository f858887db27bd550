// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Deserializer, Serialize};

/// Segment the directory inserts into the principal name of B2B guests, e.g.
/// `jane_fabrikam.com#EXT#@contoso.onmicrosoft.com`.
pub const EXTERNAL_ACCOUNT_MARKER: &str = "#EXT#";

/// The two identity fields of a guest user the audit looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestIdentityRecord {
	#[serde(default)]
	pub mail: Option<String>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub user_principal_name: String,
}

impl GuestIdentityRecord {
	pub fn new(mail: Option<&str>, user_principal_name: &str) -> Self {
		Self {
			mail: mail.map(str::to_string),
			user_principal_name: user_principal_name.to_string(),
		}
	}

	pub fn domain(&self) -> Option<String> {
		extract_domain(self)
	}
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Originating domain of a guest, lowercased.
///
/// Uses the text after the last `@` of `mail` when present. Otherwise, for
/// `#EXT#` principal names, takes the last `_`-separated token before the
/// marker. Anything else, including an empty result, yields `None`.
pub fn extract_domain(record: &GuestIdentityRecord) -> Option<String> {
	if let Some(mail) = record.mail.as_deref() {
		if let Some((_, domain)) = mail.rsplit_once('@') {
			return non_empty(domain);
		}
	}

	let upn = &record.user_principal_name;
	let (prefix, _) = upn.split_once(EXTERNAL_ACCOUNT_MARKER)?;
	let mut tokens = prefix.rsplit('_');
	let last = tokens.next()?;
	tokens.next()?;
	non_empty(last)
}

fn non_empty(domain: &str) -> Option<String> {
	(!domain.is_empty()).then(|| domain.to_lowercase())
}
