use std::collections::HashMap;
use tracing::{debug, info};

use super::api::{ApiValidator, SpecValidator};
use super::duplicates::find_duplicate_names;
use super::error::ValidationError;
use super::report::{Advisory, ValidationReport};
use crate::cloud::CloudCredentials;
use crate::models::Api;
use crate::models::api::LOCAL_PORT_KEY;
use crate::project::ProjectFileResolver;
use crate::providers::ProviderType;

/// Validates a whole batch of declarations bound for the local environment.
///
/// Holds no state between calls; the port map and advisory latch live only
/// for the duration of one [`LocalBatchValidator::validate_batch`] call.
#[derive(Debug, Clone, Default)]
pub struct LocalBatchValidator<V = SpecValidator> {
    api_validator: V,
}

impl LocalBatchValidator {
    pub fn new() -> Self {
        Self::with_api_validator(SpecValidator::new())
    }
}

impl<V: ApiValidator> LocalBatchValidator<V> {
    pub fn with_api_validator(api_validator: V) -> Self {
        Self { api_validator }
    }

    /// Validate `apis` as a unit.
    ///
    /// The first per-api failure aborts the batch. Port collisions are checked
    /// as each declaration is visited; duplicate names are checked once all
    /// declarations have passed.
    pub fn validate_batch(
        &self,
        apis: &mut [Api],
        project_files: &dyn ProjectFileResolver,
        credentials: &CloudCredentials,
    ) -> Result<ValidationReport, ValidationError> {
        if apis.is_empty() {
            return Err(ValidationError::NoApis);
        }

        let mut report = ValidationReport::default();
        let mut port_owners: HashMap<u16, String> = HashMap::new();

        for api in apis.iter_mut() {
            self.api_validator.validate_api(
                api,
                project_files,
                ProviderType::Local,
                credentials,
            )?;

            if let Some(port) = api.local_port {
                if let Some(colliding_api) = port_owners.get(&port) {
                    return Err(ValidationError::DuplicateLocalPort {
                        api: api.identify(),
                        key: LOCAL_PORT_KEY,
                        port,
                        colliding_api: colliding_api.clone(),
                    });
                }
                port_owners.insert(port, api.name.clone());
            }

            if api.uses_cloud_only_fields()
                && report.advise_once(Advisory::IgnoredLocalKeys {
                    api: api.identify(),
                })
            {
                debug!("{} sets keys that are ignored locally", api.identify());
            }
        }

        let duplicates = find_duplicate_names(apis);
        if !duplicates.is_empty() {
            return Err(ValidationError::DuplicateName { names: duplicates });
        }

        info!("✓ All {} apis validated successfully", apis.len());
        Ok(report)
    }
}

/// Validate `apis` for the local environment with the default field rules
pub fn validate_local_apis(
    apis: &mut [Api],
    project_files: &dyn ProjectFileResolver,
    credentials: &CloudCredentials,
) -> Result<ValidationReport, ValidationError> {
    LocalBatchValidator::new().validate_batch(apis, project_files, credentials)
}
