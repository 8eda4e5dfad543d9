//! Cloud credential handle passed through validation

use std::env;

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const REGION_VAR: &str = "AWS_REGION";

/// Credentials for reaching cloud storage referenced by declarations.
///
/// Validation never contacts the cloud; the handle only tells the per-API
/// rules whether remote references can be resolved at deploy time.
#[derive(Clone, Default)]
pub struct CloudCredentials {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    region: Option<String>,
}

impl CloudCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: Option<String>,
    ) -> Self {
        Self {
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            region,
        }
    }

    /// A handle with no credentials configured
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Read credentials from the standard AWS environment variables
    pub fn from_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());
        Self {
            access_key_id: read(ACCESS_KEY_ID_VAR),
            secret_access_key: read(SECRET_ACCESS_KEY_VAR),
            region: read(REGION_VAR),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

impl std::fmt::Debug for CloudCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudCredentials")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_not_configured() {
        assert!(!CloudCredentials::anonymous().is_configured());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = CloudCredentials::new("AKIA123", "hunter2", None);
        assert!(credentials.is_configured());

        let debug = format!("{credentials:?}");
        assert!(debug.contains("AKIA123"));
        assert!(!debug.contains("hunter2"));
    }
}
