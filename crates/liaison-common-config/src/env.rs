// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment variable helpers.
//!
//! Secrets follow the `VAR` / `VAR_FILE` convention: when `VAR_FILE` is set
//! the secret is read from that path (one trailing newline stripped), which
//! lets the client secret come from a mounted Docker or Kubernetes secret.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;
use url::Url;

use crate::secret::Secret;

#[derive(Debug, Error)]
pub enum EnvError {
	#[error("required environment variable {var} is not set")]
	Missing { var: String },

	#[error("required secret not found: set either {var} or {var}_FILE")]
	MissingSecret { var: String },

	#[error("environment variable {var} is empty")]
	Empty { var: String },

	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid URL in {var} ('{value}'): {reason}")]
	InvalidUrl {
		var: String,
		value: String,
		reason: String,
	},
}

/// Load a secret from `{var}_FILE` (preferred) or `{var}`.
///
/// Returns `Ok(None)` when neither is set.
pub fn load_secret_env(var: &str) -> Result<Option<Secret<String>>, EnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(EnvError::Empty { var: file_var });
		}

		let path = PathBuf::from(path_str);
		let content = fs::read_to_string(&path).map_err(|source| EnvError::Io {
			path: path.clone(),
			source,
		})?;
		let value = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(Secret::new(value)));
	}

	Ok(env::var(var).ok().map(Secret::new))
}

/// Like [`load_secret_env`] but fails when the secret is absent or empty.
pub fn require_secret_env(var: &str) -> Result<Secret<String>, EnvError> {
	let secret = load_secret_env(var)?.ok_or_else(|| EnvError::MissingSecret {
		var: var.to_string(),
	})?;

	if secret.expose().is_empty() {
		return Err(EnvError::Empty {
			var: var.to_string(),
		});
	}

	Ok(secret)
}

/// Read a non-empty, whitespace-trimmed environment variable.
pub fn require_env(var: &str) -> Result<String, EnvError> {
	let value = env::var(var).map_err(|_| EnvError::Missing {
		var: var.to_string(),
	})?;

	let trimmed = value.trim();
	if trimmed.is_empty() {
		return Err(EnvError::Empty {
			var: var.to_string(),
		});
	}

	Ok(trimmed.to_string())
}

/// Read an optional variable, treating an empty value as unset.
pub fn optional_env(var: &str) -> Option<String> {
	env::var(var)
		.ok()
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

/// Parse an http(s) base URL, dropping any trailing slash from the path.
///
/// `var` only names the source for the error message.
pub fn parse_base_url(var: &str, raw: &str) -> Result<Url, EnvError> {
	let invalid = |reason: String| EnvError::InvalidUrl {
		var: var.to_string(),
		value: raw.to_string(),
		reason,
	};

	let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
	}
	if url.host_str().is_none() {
		return Err(invalid("missing host".to_string()));
	}

	let trimmed = url.path().trim_end_matches('/').to_string();
	url.set_path(&trimmed);

	Ok(url)
}
