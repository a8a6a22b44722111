// # Azure Configuration File
//
// The Azure provider reads its account settings from a YAML file:
//
// ```yaml
// cloud: AzurePublicCloud
// tenantId: 00000000-0000-0000-0000-000000000000
// subscriptionId: 11111111-1111-1111-1111-111111111111
// resourceGroup: k8s
// location: westeurope
// aadClientId: 22222222-2222-2222-2222-222222222222
// aadClientSecret: secret
// ```
//
// A missing, unreadable or malformed file is a configuration error and is
// reported before any reconciliation starts.

use serde::{Deserialize, Serialize};
use std::path::Path;
use zonesync_core::{Error, Result};

/// Azure cloud environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzureCloud {
    /// Global Azure
    Public,
    /// Azure operated in China
    China,
    /// Azure US Government
    UsGovernment,
    /// Azure Germany
    German,
}

impl AzureCloud {
    /// Resolve an environment name; blank means the public cloud
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "" | "AZUREPUBLICCLOUD" => Ok(AzureCloud::Public),
            "AZURECHINACLOUD" => Ok(AzureCloud::China),
            "AZUREUSGOVERNMENTCLOUD" => Ok(AzureCloud::UsGovernment),
            "AZUREGERMANCLOUD" => Ok(AzureCloud::German),
            _ => Err(Error::config(format!("invalid cloud value '{}'", name))),
        }
    }

    /// Resource Manager endpoint of the environment
    pub fn resource_manager_endpoint(&self) -> &'static str {
        match self {
            AzureCloud::Public => "https://management.azure.com",
            AzureCloud::China => "https://management.chinacloudapi.cn",
            AzureCloud::UsGovernment => "https://management.usgovcloudapi.net",
            AzureCloud::German => "https://management.microsoftazure.de",
        }
    }
}

/// Contents of the Azure YAML config file
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureConfig {
    /// Cloud environment name (blank for the public cloud)
    #[serde(default)]
    pub cloud: String,
    /// Azure AD tenant
    #[serde(default)]
    pub tenant_id: String,
    /// Subscription holding the DNS zones
    #[serde(default)]
    pub subscription_id: String,
    /// Resource group holding the DNS zones
    #[serde(default)]
    pub resource_group: String,
    /// Resource location
    #[serde(default)]
    pub location: String,
    /// Service principal client ID
    #[serde(default, rename = "aadClientId")]
    pub client_id: String,
    /// Service principal secret
    /// ⚠️ NEVER log this value
    #[serde(default, rename = "aadClientSecret")]
    pub client_secret: String,
}

impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("cloud", &self.cloud)
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .field("location", &self.location)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .finish()
    }
}

impl AzureConfig {
    /// Load and validate the config file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::config("the Azure config file option is required"));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read Azure config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_yaml(&contents).map_err(|e| {
            Error::config(format!(
                "failed to read Azure config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!("Loaded Azure config file '{}'", path.display());
        Ok(config)
    }

    /// Parse and validate YAML contents
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AzureConfig = serde_yaml::from_str(contents)
            .map_err(|e| Error::config(format!("malformed YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<()> {
        if self.subscription_id.is_empty() {
            return Err(Error::config("subscriptionId cannot be empty"));
        }
        if self.resource_group.is_empty() {
            return Err(Error::config("resourceGroup cannot be empty"));
        }
        self.environment()?;
        Ok(())
    }

    /// Cloud environment selected by the `cloud` key
    pub fn environment(&self) -> Result<AzureCloud> {
        AzureCloud::from_name(&self.cloud)
    }
}
