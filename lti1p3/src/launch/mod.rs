// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Launch request construction and validation.

pub mod builder;
pub mod validator;

pub use builder::{LtiLaunchRequestBuilder, OidcLaunchRequestBuilder};
pub use validator::LtiLaunchValidator;
