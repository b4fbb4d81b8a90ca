// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Transport-neutral request shape.

use std::collections::BTreeMap;

/// A URL plus named parameters.
///
/// Used for all three hops of a launch: the OIDC login initiation, the
/// authentication redirect, and the final launch request carrying the
/// `id_token`. HTTP framing and URL/query encoding are the caller's concern;
/// this core only reads and writes named parameters.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    url: String,
    parameters: BTreeMap<String, String>,
}

impl LaunchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }
}
