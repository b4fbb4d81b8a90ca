// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Validation result type.
//!
//! A structured result rather than raised exceptions: callers stay in
//! control of error handling and the ordered success log doubles as an
//! execution trace of the checks that ran.

use crate::{LtiMessage, Registration};

/// Outcome of one launch validation run.
///
/// The success log is append-only and ordered by check execution; at most
/// one error is recorded and the first error terminates accumulation. The
/// resolved registration and parsed message are present only on success.
/// Constructed empty, returned to the caller, then discarded; never shared
/// or reused across calls.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    successes: Vec<String>,
    error: Option<String>,
    registration: Option<Registration>,
    lti_message: Option<LtiMessage>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a success entry. Ignored once an error has been recorded.
    pub fn add_success(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.successes.push(message.into());
        }
    }

    /// Record the terminal error. Only the first error is kept.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    /// Attach the artifacts of a fully successful validation.
    pub fn complete(&mut self, registration: Registration, lti_message: LtiMessage) {
        self.registration = Some(registration);
        self.lti_message = Some(lti_message);
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    pub fn lti_message(&self) -> Option<&LtiMessage> {
        self.lti_message.as_ref()
    }
}
