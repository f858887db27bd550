// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Liaison.
//!
//! This crate provides:
//! - A pre-configured HTTP client with consistent User-Agent header
//! - Retry logic with exponential backoff, separate budgets for throttling
//!   and other transient failures, and support for server retry hints

mod client;
mod retry;

pub use client::{builder, new_client_with_timeout, user_agent};
pub use retry::{
	parse_retry_after, retry, status_disposition, RetryConfig, RetryDisposition, RetryableError,
};
