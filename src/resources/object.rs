use std::{cmp::Ordering, fmt};

use chrono::{DateTime, Utc};

use crate::client::{ListEntry, RetrievedObject};

/// An object in a bucket.
///
/// Listings produce objects without `data`; [`Bucket::get`] fills it in and
/// [`Bucket::put`] uploads it.
///
/// [`Bucket::get`]: super::bucket::Bucket::get
/// [`Bucket::put`]: super::bucket::Bucket::put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub data: Option<Vec<u8>>,
}

impl Object {
    /// An object ready for upload, stamped with the current time.
    pub fn new(key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            last_modified: Utc::now(),
            data: Some(data.into()),
        }
    }

    pub(crate) fn listed(entry: ListEntry) -> Self {
        Self {
            key: entry.key,
            last_modified: entry.last_modified,
            data: None,
        }
    }

    pub(crate) fn retrieved(key: String, retrieved: RetrievedObject) -> Self {
        Self {
            key,
            last_modified: retrieved.last_modified,
            data: Some(retrieved.body),
        }
    }

    /// Payload bytes; empty for listed objects.
    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Orders newer objects first.
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.last_modified.cmp(&a.last_modified)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}", self.last_modified, self.key)
    }
}
