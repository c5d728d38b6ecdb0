use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use super::{object::Object, s3::S3};
use crate::{
    client::{ObjectClient, PutRequest},
    config::{BucketConfig, Credentials, CONTENT_TYPE},
    error::{BucketError, RemoteError},
};

/// Largest page requested while listing.
pub const LIST_PAGE_SIZE: i32 = 1000;

/// A handle on one bucket.
///
/// The name and client are fixed at construction. Clones share the client.
#[derive(Clone)]
pub struct Bucket {
    name: String,
    client: Arc<dyn ObjectClient>,
    acl: String,
    credentials: Option<Credentials>,
}

impl fmt::Debug for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("name", &self.name)
            .field("acl", &self.acl)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Keys are sent to the service as rooted paths.
fn rooted(key: &str) -> String {
    format!("/{key}")
}

impl Bucket {
    /// Connect to bucket `name` in the default region with a static key pair.
    ///
    /// No request is made here; use [`Bucket::test`] to check the bucket and
    /// credentials.
    pub fn new(
        name: impl Into<String>,
        access_key: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Result<Self, BucketError> {
        Self::with_config(
            name,
            Credentials::new(access_key, secret_access_key),
            BucketConfig::default(),
        )
    }

    pub fn with_config(
        name: impl Into<String>,
        credentials: Credentials,
        config: BucketConfig,
    ) -> Result<Self, BucketError> {
        let client = S3::with_credentials(&credentials, &config.region)?.into_client();
        let mut bucket = Self::with_client(name, Arc::new(client), config)?;
        bucket.credentials = Some(credentials);
        Ok(bucket)
    }

    /// Bind bucket `name` to an existing client.
    pub fn with_client(
        name: impl Into<String>,
        client: Arc<dyn ObjectClient>,
        config: BucketConfig,
    ) -> Result<Self, BucketError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BucketError::Configuration(
                "bucket name must not be empty".into(),
            ));
        }
        Ok(Self {
            name,
            client,
            acl: config.acl,
            credentials: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canned ACL applied to uploads.
    pub fn acl(&self) -> &str {
        &self.acl
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Checks that the bucket exists and the credentials may access it.
    #[tracing::instrument(skip(self), fields(bucket = %self.name))]
    pub async fn test(&self) -> Result<(), BucketError> {
        self.client.head_bucket(&self.name).await.map_err(|err| {
            warn!(%err, "bucket check failed");
            BucketError::Connectivity(err)
        })
    }

    /// Every object in the bucket, most recently modified first.
    ///
    /// The whole listing is held in memory. A failed page fails the listing.
    #[tracing::instrument(skip(self), fields(bucket = %self.name))]
    pub async fn list(&self) -> Result<Vec<Object>, BucketError> {
        let mut objects = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects(&self.name, marker.as_deref(), LIST_PAGE_SIZE)
                .await
                .map_err(|err| {
                    warn!(%err, fetched = objects.len(), "listing failed");
                    BucketError::List(err)
                })?;
            debug!(
                entries = page.entries.len(),
                truncated = page.is_truncated,
                "listed page"
            );

            match page.entries.last() {
                Some(last) => marker = Some(last.key.clone()),
                None if page.is_truncated => {
                    return Err(BucketError::List(RemoteError::Raw(
                        "truncated listing page without entries".into(),
                    )));
                }
                None => {}
            }
            let is_truncated = page.is_truncated;
            objects.extend(page.entries.into_iter().map(Object::listed));

            if !is_truncated {
                break;
            }
        }

        objects.sort_by(Object::newest_first);
        Ok(objects)
    }

    /// Fetches `key` with its whole body.
    #[tracing::instrument(skip(self), fields(bucket = %self.name))]
    pub async fn get(&self, key: &str) -> Result<Object, BucketError> {
        let retrieved = self
            .client
            .get_object(&self.name, &rooted(key))
            .await
            .map_err(|err| {
                warn!(%err, "get failed");
                BucketError::Get(err.to_string())
            })?;
        Ok(Object::retrieved(key.to_owned(), retrieved))
    }

    /// Uploads `object` with the bucket's ACL.
    #[tracing::instrument(skip(self, object), fields(bucket = %self.name, key = %object.key))]
    pub async fn put(&self, object: &Object) -> Result<(), BucketError> {
        let key = rooted(&object.key);
        let request = PutRequest {
            bucket: &self.name,
            key: &key,
            body: object.data(),
            acl: &self.acl,
            content_type: CONTENT_TYPE,
        };
        self.client.put_object(request).await.map_err(|err| {
            warn!(%err, "put failed");
            BucketError::Put(err.to_string())
        })
    }
}
