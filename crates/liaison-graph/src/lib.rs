// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Microsoft Graph client for Liaison.
//!
//! This crate provides:
//! - [`TokenProvider`]: client-credential token exchange with caching
//! - [`GraphClient`]: authenticated requests with throttling-aware retry and a
//!   single token refresh on 401
//! - [`GraphClient::list_all`]: a lazy stream over `@odata.nextLink` pages
//!
//! # Example
//!
//! ```ignore
//! use futures::TryStreamExt;
//! use liaison_graph::{GraphClient, GraphConfig};
//!
//! let client = GraphClient::new(GraphConfig::from_env()?)?;
//! let users: Vec<_> = client
//!     .list_all("/users", &[("$select", "id,mail")])
//!     .try_collect()
//!     .await?;
//! ```

mod auth;
mod client;
mod config;
mod error;
mod paging;

pub use auth::{Credential, TokenProvider};
pub use client::{GraphClient, GraphResponse, Query};
pub use config::{GraphConfig, DEFAULT_GRAPH_BASE_URL, DEFAULT_LOGIN_BASE_URL};
pub use error::{GraphError, GraphResult, BODY_EXCERPT_LIMIT};
pub use liaison_common_http::RetryConfig;
pub use paging::ODataPage;
