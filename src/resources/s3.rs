use std::sync::Arc;

use super::bucket::Bucket;
use crate::{
    config::{BucketConfig, Credentials},
    error::BucketError,
};

/// Owns the S3 client shared by every [`Bucket`] it hands out.
#[derive(Debug, Clone)]
pub struct S3 {
    client: aws_sdk_s3::Client,
}

impl S3 {
    /// Create an `S3` resource with the AWS configuration loaded from the
    /// environment.
    pub async fn from_env() -> Self {
        let aws_sdk_config = aws_config::from_env().load().await;
        Self::with_aws_sdk_config(&aws_sdk_config)
    }

    /// Create an `S3` resource with the provided AWS `config`.
    pub fn with_aws_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
        }
    }

    /// Create an `S3` resource for static `credentials` in `region`, with SDK
    /// retries turned off. No request is made until a bucket operation runs.
    pub fn with_credentials(credentials: &Credentials, region: &str) -> Result<Self, BucketError> {
        if region.trim().is_empty() {
            return Err(BucketError::Configuration("region must not be empty".into()));
        }
        let config = aws_sdk_s3::Config::builder()
            .region(aws_sdk_s3::Region::new(region.to_owned()))
            .credentials_provider(aws_sdk_s3::Credentials::from(credentials))
            .retry_config(aws_config::retry::RetryConfig::disabled())
            .build();
        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(config),
        })
    }

    /// The shared client behind every bucket handed out.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }

    pub fn into_client(self) -> aws_sdk_s3::Client {
        self.client
    }

    /// A handle on bucket `name` with the default ACL.
    pub fn bucket(&self, name: impl Into<String>) -> Result<Bucket, BucketError> {
        Bucket::with_client(
            name,
            Arc::new(self.client.clone()),
            BucketConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_an_empty_region() {
        let creds = Credentials::new("AKIAEXAMPLE", "secret");
        let err = S3::with_credentials(&creds, " ").unwrap_err();
        assert!(matches!(err, BucketError::Configuration(_)));
    }

    #[tokio::test]
    async fn building_from_credentials_makes_no_request() {
        let creds = Credentials::new("AKIAEXAMPLE", "secret");
        let s3 = S3::with_credentials(&creds, "eu-west-1").unwrap();
        let bucket = s3.bucket("reports").unwrap();
        assert_eq!(bucket.name(), "reports");
        assert_eq!(bucket.acl(), "private");
    }

    #[test]
    fn into_client_hands_over_the_configured_client() {
        let creds = Credentials::new("AKIAEXAMPLE", "secret");
        let client = S3::with_credentials(&creds, "us-east-2")
            .unwrap()
            .into_client();
        let bucket = Bucket::with_client(
            "reports",
            Arc::new(client),
            BucketConfig::default().region("us-east-2"),
        )
        .unwrap();
        assert_eq!(bucket.name(), "reports");
    }
}
