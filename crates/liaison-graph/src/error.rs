// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the Graph client.

use std::time::Duration;

use liaison_common_http::{status_disposition, RetryDisposition, RetryableError};
use reqwest::StatusCode;
use thiserror::Error;

/// Longest response body kept in [`GraphError::Api`].
pub const BODY_EXCERPT_LIMIT: usize = 512;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
	/// Invalid or missing configuration.
	#[error("Configuration error: {0}")]
	Config(String),

	/// The client-credential exchange was rejected or returned no token.
	/// `payload` is the identity provider's raw response body.
	#[error("Authentication failed: {message}; provider response: {payload}")]
	Authentication { message: String, payload: String },

	/// Non-2xx response from the directory API.
	#[error("Graph request to {path} failed with status {status}: {body_excerpt}")]
	Api {
		status: u16,
		path: String,
		body_excerpt: String,
		retry_after: Option<Duration>,
	},

	/// Network-level failure before a response was received.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// A 2xx response whose body could not be interpreted.
	#[error("Invalid response from Graph: {0}")]
	InvalidResponse(String),
}

impl GraphError {
	pub fn api(status: u16, path: impl Into<String>, body: &str) -> Self {
		Self::Api {
			status,
			path: path.into(),
			body_excerpt: excerpt(body),
			retry_after: None,
		}
	}

	/// HTTP status for [`GraphError::Api`], `None` otherwise.
	pub fn status(&self) -> Option<u16> {
		match self {
			GraphError::Api { status, .. } => Some(*status),
			_ => None,
		}
	}

	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(401)
	}
}

impl RetryableError for GraphError {
	fn disposition(&self) -> RetryDisposition {
		match self {
			GraphError::Network(e) => e.disposition(),
			GraphError::Api {
				status,
				retry_after,
				..
			} => match StatusCode::from_u16(*status) {
				Ok(code) => status_disposition(code, *retry_after),
				Err(_) => RetryDisposition::Fatal,
			},
			_ => RetryDisposition::Fatal,
		}
	}
}

/// Trim a response body for error messages, respecting char boundaries.
pub(crate) fn excerpt(body: &str) -> String {
	let body = body.trim();
	match body.char_indices().nth(BODY_EXCERPT_LIMIT) {
		Some((idx, _)) => format!("{}…", &body[..idx]),
		None => body.to_string(),
	}
}
