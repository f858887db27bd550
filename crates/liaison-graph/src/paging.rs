// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Cursor-following pagination over `@odata.nextLink`.

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::{GraphClient, Query};
use crate::error::{GraphError, GraphResult};

/// One page of a collection response.
#[derive(Debug, Deserialize)]
pub struct ODataPage {
	#[serde(default)]
	pub value: Vec<Value>,
	#[serde(rename = "@odata.nextLink")]
	pub next_link: Option<String>,
}

enum Cursor {
	First,
	Next(String),
	Done,
}

impl GraphClient {
	/// Lazily yield every item of a collection, page by page.
	///
	/// The first request carries `query`; later requests use the server's
	/// `@odata.nextLink` verbatim, since that link already encodes the filter.
	/// The stream ends when a page has no next link. Dropping the stream
	/// stops further requests; iterating again means calling this again.
	pub fn list_all<'a>(&'a self, path: &str, query: Query<'_>) -> BoxStream<'a, GraphResult<Value>> {
		let path = path.to_string();
		let query: Vec<(String, String)> = query
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();

		stream::try_unfold(Cursor::First, move |cursor| {
			let path = path.clone();
			let query = query.clone();
			async move {
				let page = match cursor {
					Cursor::Done => return Ok::<_, GraphError>(None),
					Cursor::First => {
						let pairs: Vec<(&str, &str)> = query
							.iter()
							.map(|(k, v)| (k.as_str(), v.as_str()))
							.collect();
						self.fetch_page(&path, &pairs).await?
					}
					Cursor::Next(link) => self.fetch_page(&link, &[]).await?,
				};

				let next = match page.next_link {
					Some(link) => Cursor::Next(link),
					None => Cursor::Done,
				};
				Ok::<_, GraphError>(Some((page.value, next)))
			}
		})
		.map_ok(|items| stream::iter(items.into_iter().map(Ok)))
		.try_flatten()
		.boxed()
	}

	async fn fetch_page(&self, target: &str, query: Query<'_>) -> GraphResult<ODataPage> {
		let body = self.send(Method::GET, target, None, query).await?.body;
		let page: ODataPage = serde_json::from_value(body)
			.map_err(|e| GraphError::InvalidResponse(format!("{target}: not a collection page: {e}")))?;

		debug!(
			items = page.value.len(),
			has_next = page.next_link.is_some(),
			"Fetched page"
		);
		Ok(page)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn page_parsing_reads_value_and_next_link() {
		let page: ODataPage = serde_json::from_str(
			r#"{
				"@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users",
				"value": [{"id": "1"}, {"id": "2"}],
				"@odata.nextLink": "https://graph.microsoft.com/v1.0/users?$skiptoken=abc"
			}"#,
		)
		.unwrap();

		assert_eq!(page.value.len(), 2);
		assert_eq!(
			page.next_link.as_deref(),
			Some("https://graph.microsoft.com/v1.0/users?$skiptoken=abc")
		);
	}

	#[test]
	fn last_page_has_no_link() {
		let page: ODataPage = serde_json::from_str(r#"{"value": []}"#).unwrap();
		assert!(page.value.is_empty());
		assert!(page.next_link.is_none());
	}
}
