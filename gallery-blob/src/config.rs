/// Connection settings for the storage container
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Storage account name
    pub account: String,

    /// Container holding the gallery objects
    pub container: String,

    /// Shared-access signature, with or without the leading `?`
    pub sas_token: String,

    /// Override for the service endpoint (emulators, sovereign clouds)
    pub endpoint: Option<String>,
}

impl StorageConfig {
    pub fn new<A, C, S>(account: A, container: C, sas_token: S) -> Self
    where
        A: Into<String>,
        C: Into<String>,
        S: Into<String>,
    {
        Self {
            account: account.into(),
            container: container.into(),
            sas_token: sas_token.into(),
            endpoint: None,
        }
    }

    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Service endpoint without trailing slash
    pub fn service_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.blob.core.windows.net", self.account),
        }
    }

    /// SAS token without the leading `?`
    pub fn sas_query(&self) -> &str {
        self.sas_token.trim_start_matches('?')
    }

    /// Names of the settings that are still empty
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.account.is_empty() && self.endpoint.is_none() {
            missing.push("account");
        }
        if self.container.is_empty() {
            missing.push("container");
        }
        if self.sas_token.is_empty() {
            missing.push("sas_token");
        }
        missing
    }
}

/// Configuration for blob operations
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Absolute max size allowed for a single blob (safety guard)
    pub max_blob_bytes: u64,

    /// Content type recorded when the caller supplies none
    pub default_content_type: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: 256 * 1024 * 1024, // 256MB, a single Put Blob call
            default_content_type: "application/octet-stream".to_string(),
        }
    }
}

impl BlobConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }
}
