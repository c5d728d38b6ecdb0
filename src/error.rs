use std::error::Error as StdError;

use aws_sdk_s3::error::{GetObjectError, HeadBucketError, ListObjectsError, PutObjectError};
use aws_sdk_s3::types::SdkError;

/// A failed round trip to the object store, keeping as much of the service's
/// own detail as it reported.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RemoteError {
    /// The service answered with an error response.
    #[error("{}", service_detail(.code, .message, .status, .request_id))]
    Service {
        code: Option<String>,
        message: Option<String>,
        status: u16,
        request_id: Option<String>,
    },
    /// The request failed without a service response: timeouts, dispatch
    /// failures, unreadable responses or bodies.
    #[error("{0}")]
    Raw(String),
    #[error("{0}")]
    Unknown(Box<dyn StdError + Send + Sync + 'static>),
}

impl RemoteError {
    pub fn unknown(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self::Unknown(err.into())
    }

    /// HTTP status of a service error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Joins message, status and request id, falling back to the error code when
/// the service sent no message.
fn service_detail(
    code: &Option<String>,
    message: &Option<String>,
    status: &u16,
    request_id: &Option<String>,
) -> String {
    let status = status.to_string();
    [
        message.as_deref().or(code.as_deref()),
        Some(status.as_str()),
        request_id.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Renders an error with its whole source chain.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

macro_rules! from_sdk_error {
    ($($op_error:ty),+ $(,)?) => {
        $(
            impl From<SdkError<$op_error>> for RemoteError {
                fn from(err: SdkError<$op_error>) -> Self {
                    match &err {
                        SdkError::ServiceError(svc_err) => {
                            let meta = svc_err.err().meta();
                            RemoteError::Service {
                                code: meta.code().map(String::from),
                                message: meta.message().map(String::from),
                                status: svc_err.raw().http().status().as_u16(),
                                request_id: meta.request_id().map(String::from),
                            }
                        }
                        SdkError::ConstructionFailure(_)
                        | SdkError::TimeoutError(_)
                        | SdkError::DispatchFailure(_)
                        | SdkError::ResponseError(_) => RemoteError::Raw(error_chain(&err)),
                        #[allow(unreachable_patterns)]
                        _ => RemoteError::unknown(error_chain(&err)),
                    }
                }
            }
        )+
    };
}

from_sdk_error!(
    HeadBucketError,
    ListObjectsError,
    GetObjectError,
    PutObjectError,
);

/// Errors returned by [`Bucket`](crate::Bucket) operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BucketError {
    #[error("invalid bucket configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Connectivity(RemoteError),
    #[error(transparent)]
    List(RemoteError),
    #[error("{0}")]
    Get(String),
    #[error("{0}")]
    Put(String),
}

impl BucketError {
    /// The remote failure behind a connectivity or listing error.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Connectivity(err) | Self::List(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use aws_smithy_http::{body::SdkBody, operation};

    use super::*;

    fn response(status: u16) -> operation::Response {
        operation::Response::new(
            http::Response::builder()
                .status(status)
                .body(SdkBody::empty())
                .unwrap(),
        )
    }

    #[test]
    fn get_object_service_error_keeps_message_status_and_request_id() {
        let meta = aws_smithy_types::Error::builder()
            .code("NoSuchKey")
            .message("The specified key does not exist.")
            .request_id("RID")
            .build();
        let sdk_err = SdkError::service_error(GetObjectError::generic(meta), response(404));

        let err = RemoteError::from(sdk_err);

        assert!(matches!(err, RemoteError::Service { status: 404, .. }));
        assert_eq!(err.to_string(), "The specified key does not exist. 404 RID");
    }

    #[test]
    fn head_bucket_service_error_without_body_falls_back_to_code() {
        let meta = aws_smithy_types::Error::builder().code("NotFound").build();
        let sdk_err = SdkError::service_error(HeadBucketError::generic(meta), response(404));

        let err = RemoteError::from(sdk_err);

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "NotFound 404");
    }

    #[test]
    fn timeouts_become_raw_errors_with_their_cause() {
        let sdk_err: SdkError<PutObjectError> =
            SdkError::timeout_error(io::Error::new(io::ErrorKind::TimedOut, "slow"));

        let err = RemoteError::from(sdk_err);

        assert!(matches!(err, RemoteError::Raw(_)));
        assert!(err.to_string().ends_with("slow"), "{err}");
    }

    #[test]
    fn service_error_combines_message_status_and_request_id() {
        let err = RemoteError::Service {
            code: Some("NoSuchKey".into()),
            message: Some("The specified key does not exist.".into()),
            status: 404,
            request_id: Some("4442587FB7D0A2F9".into()),
        };
        assert_eq!(
            err.to_string(),
            "The specified key does not exist. 404 4442587FB7D0A2F9"
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn service_error_without_message_uses_code() {
        let err = RemoteError::Service {
            code: Some("AccessDenied".into()),
            message: None,
            status: 403,
            request_id: None,
        };
        assert_eq!(err.to_string(), "AccessDenied 403");
    }

    #[test]
    fn service_error_with_only_a_status() {
        let err = RemoteError::Service {
            code: None,
            message: None,
            status: 404,
            request_id: Some(String::new()),
        };
        assert_eq!(err.to_string(), "404");
    }

    #[test]
    fn raw_and_unknown_errors_pass_their_text_through() {
        let raw = RemoteError::Raw("dispatch failure: connection refused".into());
        assert_eq!(raw.to_string(), "dispatch failure: connection refused");
        assert_eq!(raw.status(), None);

        let unknown = RemoteError::unknown(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(unknown.to_string(), "boom");
    }

    #[test]
    fn error_chain_appends_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("request failed")]
        struct Outer(#[source] io::Error);

        let err = Outer(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        assert_eq!(error_chain(&err), "request failed: timed out");
    }

    #[test]
    fn connectivity_and_list_errors_show_the_remote_error() {
        let err = BucketError::Connectivity(RemoteError::Raw("no route to host".into()));
        assert_eq!(err.to_string(), "no route to host");
        assert!(err.remote().is_some());

        let err = BucketError::Get("gone".into());
        assert_eq!(err.to_string(), "gone");
        assert!(err.remote().is_none());
    }
}
