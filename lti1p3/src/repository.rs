// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory registration repository.

use lti1p3_abstractions::{Registration, RegistrationRepository, RegistrationRepositoryError};

/// Registration lookup over a fixed in-process set.
///
/// Suitable for tools with statically-configured registrations and for
/// tests. Matching is exact on (platform issuer, client id).
#[derive(Debug, Default)]
pub struct InMemoryRegistrationRepository {
    registrations: Vec<Registration>,
}

impl InMemoryRegistrationRepository {
    pub fn new(registrations: Vec<Registration>) -> Self {
        Self { registrations }
    }
}

impl RegistrationRepository for InMemoryRegistrationRepository {
    fn find_by_platform_issuer_and_client(
        &self,
        issuer: &str,
        client_id: &str,
    ) -> Result<Option<Registration>, RegistrationRepositoryError> {
        Ok(self
            .registrations
            .iter()
            .find(|r| r.platform().audience() == issuer && r.client_id() == client_id)
            .cloned())
    }
}
