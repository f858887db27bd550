// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration primitives shared across Liaison crates.
//!
//! - [`Secret<T>`]: keeps client secrets and bearer tokens out of logs
//! - [`load_secret_env`] / [`require_secret_env`] / [`require_env`]:
//!   environment loading with `*_FILE` support for secrets
//! - [`parse_base_url`]: validation for configurable service endpoints

pub mod env;
pub mod secret;

pub use env::{
	load_secret_env, optional_env, parse_base_url, require_env, require_secret_env, EnvError,
};
pub use secret::{Secret, SecretString, REDACTED};
