// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The LTI message model and claim names.
//!
//! These are the domain value objects parsed out of a validated launch token.
//! They carry no security decisions of their own.

use serde::{Deserialize, Serialize};

use crate::UserIdentity;

/// LTI version asserted by launch messages.
pub const LTI_VERSION: &str = "1.3.0";

pub const CLAIM_MESSAGE_TYPE: &str = "https://purl.imsglobal.org/spec/lti/claim/message_type";
pub const CLAIM_VERSION: &str = "https://purl.imsglobal.org/spec/lti/claim/version";
pub const CLAIM_DEPLOYMENT_ID: &str = "https://purl.imsglobal.org/spec/lti/claim/deployment_id";
pub const CLAIM_RESOURCE_LINK: &str = "https://purl.imsglobal.org/spec/lti/claim/resource_link";
pub const CLAIM_TARGET_LINK_URI: &str =
    "https://purl.imsglobal.org/spec/lti/claim/target_link_uri";
pub const CLAIM_ROLES: &str = "https://purl.imsglobal.org/spec/lti/claim/roles";

pub const MESSAGE_TYPE_RESOURCE_LINK: &str = "LtiResourceLinkRequest";

/// The resource a launch points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    #[serde(rename = "id")]
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResourceLink {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A validated, parsed launch message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LtiMessage {
    pub version: String,
    pub message_type: Option<String>,
    pub deployment_id: Option<String>,
    pub resource_link: Option<ResourceLink>,
    pub user_identity: Option<UserIdentity>,
}
