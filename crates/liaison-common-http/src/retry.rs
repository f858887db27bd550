// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Retry logic with exponential backoff for HTTP requests.
//!
//! Failures are sorted into three buckets by [`RetryableError::disposition`]:
//! throttling (the server asked us to slow down), other transient failures,
//! and everything else. Throttling and transient failures draw from separate
//! retry budgets; fatal errors are returned immediately.

use reqwest::StatusCode;
use std::time::Duration;
use tracing::warn;

/// How a failed attempt should be treated by [`retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
	/// Client errors, decode failures, rejected credentials.
	Fatal,
	/// 429 / 503. `retry_after` carries the server hint when one was sent.
	Throttled { retry_after: Option<Duration> },
	/// Other 5xx, request timeouts and connection failures.
	Transient,
}

impl RetryDisposition {
	pub fn is_retryable(&self) -> bool {
		!matches!(self, RetryDisposition::Fatal)
	}
}

pub trait RetryableError {
	fn disposition(&self) -> RetryDisposition;
}

impl RetryableError for reqwest::Error {
	fn disposition(&self) -> RetryDisposition {
		if self.is_timeout() || self.is_connect() {
			return RetryDisposition::Transient;
		}

		match self.status() {
			Some(status) => status_disposition(status, None),
			None => RetryDisposition::Fatal,
		}
	}
}

/// Classify an HTTP status code.
pub fn status_disposition(status: StatusCode, retry_after: Option<Duration>) -> RetryDisposition {
	match status {
		StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
			RetryDisposition::Throttled { retry_after }
		}
		StatusCode::REQUEST_TIMEOUT => RetryDisposition::Transient,
		s if s.is_server_error() => RetryDisposition::Transient,
		_ => RetryDisposition::Fatal,
	}
}

/// Parse a `Retry-After` header given in delta-seconds.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
	value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
	/// Retries allowed after throttled responses.
	pub max_throttle_retries: u32,
	/// Retries allowed after other transient failures.
	pub max_transient_retries: u32,
	/// Backoff for the first retry; also the minimum wait between attempts.
	pub base_delay: Duration,
	/// Upper bound for computed backoff.
	pub max_delay: Duration,
	/// Upper bound for a server-provided `Retry-After`.
	pub max_retry_after: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_throttle_retries: 5,
			max_transient_retries: 2,
			base_delay: Duration::from_millis(500),
			max_delay: Duration::from_secs(30),
			max_retry_after: Duration::from_secs(120),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

fn calculate_delay(cfg: &RetryConfig, retry_index: u32, hint: Option<Duration>) -> Duration {
	if let Some(hint) = hint {
		let ceiling = cfg.max_retry_after.max(cfg.base_delay);
		return hint.clamp(cfg.base_delay, ceiling);
	}

	let exponential = cfg.base_delay.as_secs_f64() * cfg.backoff_factor.powi(retry_index as i32);
	let capped = exponential.min(cfg.max_delay.as_secs_f64());

	// Jitter only ever stretches the wait so base_delay stays a floor.
	let jittered = if cfg.jitter {
		capped * (1.0 + fastrand::f64() * 0.5)
	} else {
		capped
	};

	Duration::from_secs_f64(jittered).max(cfg.base_delay)
}

/// Run `f` until it succeeds, fails fatally, or exhausts the retry budget for
/// the kind of failure it keeps returning. The last error is returned as-is.
pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut f: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: std::future::Future<Output = Result<T, E>>,
	E: RetryableError + std::fmt::Debug,
{
	let mut throttle_retries = 0u32;
	let mut transient_retries = 0u32;
	let mut attempt = 0u32;

	loop {
		attempt += 1;

		let err = match f().await {
			Ok(result) => return Ok(result),
			Err(err) => err,
		};

		let (hint, retry_index) = match err.disposition() {
			RetryDisposition::Fatal => {
				warn!(error = ?err, attempt, "non-retryable error encountered");
				return Err(err);
			}
			RetryDisposition::Throttled { retry_after } => {
				if throttle_retries >= cfg.max_throttle_retries {
					warn!(
						error = ?err,
						attempt,
						max_throttle_retries = cfg.max_throttle_retries,
						"throttle retry budget exhausted"
					);
					return Err(err);
				}
				throttle_retries += 1;
				(retry_after, throttle_retries - 1)
			}
			RetryDisposition::Transient => {
				if transient_retries >= cfg.max_transient_retries {
					warn!(
						error = ?err,
						attempt,
						max_transient_retries = cfg.max_transient_retries,
						"transient retry budget exhausted"
					);
					return Err(err);
				}
				transient_retries += 1;
				(None, transient_retries - 1)
			}
		};

		let delay = calculate_delay(cfg, retry_index, hint);
		warn!(
			error = ?err,
			attempt,
			delay_ms = delay.as_millis() as u64,
			server_hint = hint.is_some(),
			"retrying after error"
		);

		tokio::time::sleep(delay).await;
	}
}
