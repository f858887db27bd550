// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

/// Longest `mailNickname` the onboarding flow will generate.
pub const MAX_MAIL_ALIAS_LEN: usize = 40;

/// Derive a group mail alias from an organization name: ASCII letters and
/// digits only, lowercased, at most [`MAX_MAIL_ALIAS_LEN`] characters.
///
/// ```
/// use liaison_provisioning::normalize_mail_alias;
///
/// assert_eq!(normalize_mail_alias("Contoso Logistics!"), "contosologistics");
/// ```
pub fn normalize_mail_alias(name: &str) -> String {
	name
		.chars()
		.filter(char::is_ascii_alphanumeric)
		.map(|c| c.to_ascii_lowercase())
		.take(MAX_MAIL_ALIAS_LEN)
		.collect()
}
