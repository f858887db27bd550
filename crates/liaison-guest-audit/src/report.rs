// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{extract_domain, GuestIdentityRecord};

/// Principal names kept per domain as examples.
pub const MAX_SAMPLE_IDENTITIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainReportRow {
	pub domain: String,
	pub user_count: usize,
	/// First principal names seen for this domain, in input order.
	pub sample_identities: Vec<String>,
}

/// Group guests by originating domain, most common domain first.
///
/// Records without a domain are skipped. Domains with equal counts keep the
/// order in which they were first seen.
pub fn aggregate_domains<'a, I>(records: I) -> Vec<DomainReportRow>
where
	I: IntoIterator<Item = &'a GuestIdentityRecord>,
{
	let mut rows: Vec<DomainReportRow> = Vec::new();
	let mut index: HashMap<String, usize> = HashMap::new();

	for record in records {
		let Some(domain) = extract_domain(record) else {
			continue;
		};

		let slot = *index.entry(domain.clone()).or_insert_with(|| {
			rows.push(DomainReportRow {
				domain,
				user_count: 0,
				sample_identities: Vec::new(),
			});
			rows.len() - 1
		});

		let row = &mut rows[slot];
		row.user_count += 1;
		if row.sample_identities.len() < MAX_SAMPLE_IDENTITIES {
			row.sample_identities.push(record.user_principal_name.clone());
		}
	}

	// Vec::sort_by is stable, so ties stay in first-seen order.
	rows.sort_by(|a, b| b.user_count.cmp(&a.user_count));
	rows
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn guest(mail: Option<&str>, upn: &str) -> GuestIdentityRecord {
		GuestIdentityRecord::new(mail, upn)
	}

	#[test]
	fn mixed_records_report_in_first_seen_order() {
		let records = vec![
			// Mail-only guest; a null principal name deserializes to "".
			guest(Some("a@foo.com"), ""),
			guest(None, "bar_co#EXT#@tenant.onmicrosoft.com"),
			guest(None, "baz@tenant.onmicrosoft.com"),
		];

		let rows = aggregate_domains(&records);

		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].domain, "foo.com");
		assert_eq!(rows[0].user_count, 1);
		assert_eq!(rows[0].sample_identities, [""]);
		assert_eq!(rows[1].domain, "co");
		assert_eq!(rows[1].user_count, 1);
		assert_eq!(rows[1].sample_identities, ["bar_co#EXT#@tenant.onmicrosoft.com"]);
	}

	#[test]
	fn counts_sort_descending_and_samples_cap_at_three() {
		let records: Vec<_> = [
			("x@small.example", "s1"),
			("a@big.example", "b1"),
			("b@BIG.example", "b2"),
			("c@big.example", "b3"),
			("d@big.example", "b4"),
			("y@mid.example", "m1"),
			("z@mid.example", "m2"),
		]
		.iter()
		.map(|&(mail, upn)| guest(Some(mail), upn))
		.collect();

		let rows = aggregate_domains(&records);
		let summary: Vec<(&str, usize)> = rows.iter().map(|r| (r.domain.as_str(), r.user_count)).collect();

		assert_eq!(summary, [("big.example", 4), ("mid.example", 2), ("small.example", 1)]);
		assert_eq!(rows[0].sample_identities, ["b1", "b2", "b3"]);
	}

	#[test]
	fn empty_input_gives_empty_report() {
		assert!(aggregate_domains(&Vec::<GuestIdentityRecord>::new()).is_empty());
	}

	fn arb_record() -> impl Strategy<Value = GuestIdentityRecord> {
		let domain = prop::sample::select(vec!["foo.com", "bar.org", "baz.net", "qux.io"]);
		(domain, "[a-z]{1,6}", any::<bool>()).prop_map(|(domain, user, by_mail)| {
			if by_mail {
				guest(Some(format!("{user}@{domain}").as_str()), &format!("{user}@tenant.example"))
			} else {
				guest(None, &format!("{user}_{domain}#EXT#@tenant.example"))
			}
		})
	}

	proptest! {
		#[test]
		fn aggregation_is_deterministic(records in prop::collection::vec(arb_record(), 0..40)) {
			prop_assert_eq!(aggregate_domains(&records), aggregate_domains(&records));
		}

		#[test]
		fn counts_cover_every_record_with_a_domain(records in prop::collection::vec(arb_record(), 0..40)) {
			let rows = aggregate_domains(&records);
			let total: usize = rows.iter().map(|r| r.user_count).sum();
			prop_assert_eq!(total, records.len());
			prop_assert!(rows.windows(2).all(|w| w[0].user_count >= w[1].user_count));
			prop_assert!(rows.iter().all(|r| r.sample_identities.len() <= MAX_SAMPLE_IDENTITIES));
		}
	}
}
