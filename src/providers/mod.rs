use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Execution environment a batch of APIs is being validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Local,
    Aws,
}

impl ProviderType {
    /// Name of the provider (e.g., "local", "aws")
    pub fn name(&self) -> &'static str {
        match self {
            ProviderType::Local => "local",
            ProviderType::Aws => "aws",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ProviderType::Local)
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderType {
    type Err = miette::Report;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "local" => Ok(ProviderType::Local),
            "aws" => Ok(ProviderType::Aws),
            _ => Err(miette::miette!("Unknown provider: {}", name)),
        }
    }
}
