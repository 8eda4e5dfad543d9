use miette::Diagnostic;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::models::Api;
use crate::project::ProjectFileError;

#[derive(Error, Debug, Diagnostic)]
pub enum ValidationError {
    #[error("no apis are configured")]
    #[diagnostic(
        code(apigate::validation::no_apis),
        help("Add at least one api to the configuration file before deploying")
    )]
    NoApis,

    #[error("{api}: {key}: {port}: port has already been taken by api {colliding_api}")]
    #[diagnostic(
        code(apigate::validation::duplicate_local_port),
        help("Every api running locally needs its own local_port")
    )]
    DuplicateLocalPort {
        api: String,
        key: &'static str,
        port: u16,
        colliding_api: String,
    },

    #[error("api names must be unique; found duplicates: {}", quote_names(names))]
    #[diagnostic(code(apigate::validation::duplicate_name))]
    DuplicateName { names: BTreeSet<String> },

    #[error("{api}: {key}: {reason}")]
    #[diagnostic(code(apigate::validation::invalid_api))]
    InvalidApi {
        api: String,
        key: String,
        reason: String,
    },

    #[error("{api}: {key}")]
    #[diagnostic(code(apigate::validation::api_file))]
    ApiFile {
        api: String,
        key: String,
        #[source]
        source: ProjectFileError,
    },
}

impl ValidationError {
    pub fn invalid(api: &Api, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidApi {
            api: api.identify(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn api_file(api: &Api, key: impl Into<String>, source: ProjectFileError) -> Self {
        Self::ApiFile {
            api: api.identify(),
            key: key.into(),
            source,
        }
    }
}

fn quote_names(names: &BTreeSet<String>) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
