// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog-level credentials
//!
//! A `Credentials` value is assembled once at attach time and never mutated
//! afterwards. Every remote call borrows it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Endpoint, region and application credentials for one attached catalog
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Base URL of the catalog service, without a trailing slash
    pub endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    /// Region of the object storage holding table data
    pub aws_region: String,
    /// Bearer token obtained through the client-credentials exchange
    pub token: String,
}

impl Credentials {
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        aws_region: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: normalize_endpoint(&endpoint.into()),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            aws_region: aws_region.into(),
            token: token.into(),
        }
    }

    /// Credentials with nothing set; remote calls fail on first use
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Whether a client-credentials exchange can be attempted
    pub fn can_exchange(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Copy of these credentials carrying `token`
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..self.clone()
        }
    }
}

/// Strip trailing slashes so paths can be appended with `format!("{}/...")`
pub fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim_end_matches('/').to_string()
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "redacted"
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("client_id", &redact(&self.client_id))
            .field("client_secret", &redact(&self.client_secret))
            .field("aws_region", &self.aws_region)
            .field("token", &redact(&self.token))
            .finish()
    }
}
