//! AWS SDK client setup for DynamoDB Local.

use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;

use dynamodb_reference_core::storage::{Result, StoreError};

/// Port DynamoDB Local listens on by default.
pub const DEFAULT_PORT: u16 = 8000;

/// Region label sent with every request. DynamoDB Local ignores it.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Client configuration for a local DynamoDB endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalClientConfig {
    /// Port of the local endpoint, used when `endpoint_url` is not set.
    pub port: u16,
    /// AWS region label.
    pub region: String,
    /// Full endpoint URL, overriding `http://localhost:<port>`.
    pub endpoint_url: Option<String>,
}

impl Default for LocalClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

impl LocalClientConfig {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
        }
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> String {
        self.endpoint_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        format!("Local DynamoDB ({}, region: {})", self.endpoint(), self.region)
    }

    fn validate(&self) -> Result<()> {
        if self.endpoint_url.is_none() && self.port == 0 {
            return Err(StoreError::ConnectionFailed(
                "invalid client configuration: port must be non-zero".to_string(),
            ));
        }
        let endpoint = self.endpoint();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(StoreError::ConnectionFailed(format!(
                "invalid client configuration: endpoint {endpoint} must be an http(s) URL"
            )));
        }
        Ok(())
    }
}

/// Creates a DynamoDB client for the local endpoint.
///
/// Uses static placeholder credentials; DynamoDB Local accepts any values.
pub async fn create_local_client(config: &LocalClientConfig) -> Result<Client> {
    config.validate()?;

    let credentials = Credentials::new(
        "dummy",
        "dummy",
        Some("dummy".to_string()),
        None,
        "hard-coded placeholder credentials for DynamoDB Local",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .endpoint_url(config.endpoint())
        .credentials_provider(credentials)
        .load()
        .await;

    Ok(Client::new(&sdk_config))
}
