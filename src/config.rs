use std::fmt;

/// Region used when none is given explicitly.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Canned ACL applied to uploads unless the bucket is configured otherwise.
pub const DEFAULT_ACL: &str = "private";

/// Content type sent with every upload.
pub const CONTENT_TYPE: &str = "application/json";

/// A static access key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

impl From<&Credentials> for aws_sdk_s3::Credentials {
    fn from(creds: &Credentials) -> Self {
        aws_sdk_s3::Credentials::new(
            creds.access_key.clone(),
            creds.secret_access_key.clone(),
            None,
            None,
            "s3-bucket-static",
        )
    }
}

/// Settings fixed for the lifetime of a [`Bucket`](crate::Bucket).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    pub region: String,
    pub acl: String,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.into(),
            acl: DEFAULT_ACL.into(),
        }
    }
}

impl BucketConfig {
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn acl(mut self, acl: impl Into<String>) -> Self {
        self.acl = acl.into();
        self
    }
}
