//! A small convenience layer over a single S3 bucket: check that the bucket
//! is reachable, list its objects newest first, fetch an object into memory
//! and upload one.
//!
//! ```no_run
//! # async fn run() -> Result<(), s3_bucket::BucketError> {
//! let bucket = s3_bucket::Bucket::new("reports", "AKIA...", "secret")?;
//! bucket.test().await?;
//! for object in bucket.list().await? {
//!     println!("{object}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod resources;

pub use client::{ListEntry, ListPage, ObjectClient, PutRequest, RetrievedObject};
pub use config::{BucketConfig, Credentials, CONTENT_TYPE, DEFAULT_ACL, DEFAULT_REGION};
pub use error::{BucketError, RemoteError};
pub use resources::{bucket::Bucket, object::Object, s3::S3};
