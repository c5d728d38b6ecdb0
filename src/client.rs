//! The remote side of a bucket, reduced to the four calls a
//! [`Bucket`](crate::Bucket) makes.

use std::time::SystemTime;

use async_trait::async_trait;
use aws_sdk_s3::model::ObjectCannedAcl;
use aws_sdk_s3::types::{ByteStream, DateTime};
use chrono::{TimeZone, Utc};
use tracing::debug;

use crate::error::{error_chain, RemoteError};

/// One entry of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub key: String,
    pub last_modified: chrono::DateTime<Utc>,
}

/// A page of a marker-based listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub entries: Vec<ListEntry>,
    pub is_truncated: bool,
}

/// A fetched object with its body read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedObject {
    pub last_modified: chrono::DateTime<Utc>,
    pub body: Vec<u8>,
}

/// Everything sent with an upload.
#[derive(Debug, Clone, Copy)]
pub struct PutRequest<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub body: &'a [u8],
    pub acl: &'a str,
    pub content_type: &'a str,
}

/// An object store able to serve a bucket.
///
/// Keys reach the client exactly as they are sent to the service; any
/// prefixing happens in the caller.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    async fn head_bucket(&self, bucket: &str) -> Result<(), RemoteError>;

    /// Lists up to `max_keys` entries following `marker`, in key order.
    async fn list_objects(
        &self,
        bucket: &str,
        marker: Option<&str>,
        max_keys: i32,
    ) -> Result<ListPage, RemoteError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<RetrievedObject, RemoteError>;

    async fn put_object(&self, request: PutRequest<'_>) -> Result<(), RemoteError>;
}

fn to_chrono(dt: &DateTime) -> Result<chrono::DateTime<Utc>, RemoteError> {
    Utc.timestamp_opt(dt.secs(), dt.subsec_nanos())
        .single()
        .ok_or_else(|| RemoteError::Raw(format!("timestamp out of range: {} seconds", dt.secs())))
}

#[async_trait]
impl ObjectClient for aws_sdk_s3::Client {
    async fn head_bucket(&self, bucket: &str) -> Result<(), RemoteError> {
        debug!(bucket, "head bucket");
        self.head_bucket().bucket(bucket).send().await?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        marker: Option<&str>,
        max_keys: i32,
    ) -> Result<ListPage, RemoteError> {
        debug!(bucket, marker, max_keys, "list objects");
        let mut list_objects_request = self.list_objects().bucket(bucket).max_keys(max_keys);
        if let Some(marker) = marker {
            list_objects_request = list_objects_request.marker(marker);
        }
        let response = list_objects_request.send().await?;

        let entries = response
            .contents()
            .unwrap_or_default()
            .iter()
            .map(|object| -> Result<ListEntry, RemoteError> {
                let key = object
                    .key()
                    .ok_or_else(|| RemoteError::Raw("listed object without a key".into()))?;
                let last_modified = object.last_modified().ok_or_else(|| {
                    RemoteError::Raw(format!("listed object {key} without a last-modified time"))
                })?;
                Ok(ListEntry {
                    key: key.to_owned(),
                    last_modified: to_chrono(last_modified)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ListPage {
            entries,
            is_truncated: response.is_truncated(),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<RetrievedObject, RemoteError> {
        debug!(bucket, key, "get object");
        let response = self
            .get_object()
            .bucket(bucket)
            .key(key)
            .response_expires(DateTime::from(SystemTime::now()))
            .send()
            .await?;
        let last_modified = response
            .last_modified()
            .map(to_chrono)
            .transpose()?
            .unwrap_or_else(Utc::now);
        let body = response
            .body
            .collect()
            .await
            .map_err(|err| RemoteError::Raw(error_chain(&err)))?
            .into_bytes();
        Ok(RetrievedObject {
            last_modified,
            body: body.to_vec(),
        })
    }

    async fn put_object(&self, request: PutRequest<'_>) -> Result<(), RemoteError> {
        debug!(
            bucket = request.bucket,
            key = request.key,
            size = request.body.len(),
            "put object"
        );
        self.put_object()
            .bucket(request.bucket)
            .key(request.key)
            .acl(ObjectCannedAcl::from(request.acl))
            .body(ByteStream::from(request.body.to_vec()))
            .content_type(request.content_type)
            .send()
            .await?;
        Ok(())
    }
}
