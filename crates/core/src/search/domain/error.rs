use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for the search protocols.
///
/// `NoFaceDetected` is deliberately absent: an upload with zero faces is a
/// valid empty result, not an error. Stale responses are likewise not
/// errors; they are discarded by the session's generation arbitration.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The request did not complete. Recoverable: retried by the next
    /// explicit action (new upload, reselect, resubmit).
    #[error("request failed: {message}")]
    Network { message: String },

    /// The backend rejected the request (bad image, unsupported payload).
    #[error("{message}")]
    Validation { message: String },

    /// The credential is no longer accepted; the shell handles re-login.
    #[error("session expired, sign in again")]
    AuthExpired,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("no file in drop")]
    Empty,

    /// Every candidate in the drop had a non-image extension.
    #[error("not an image: {0}")]
    NotAnImage(PathBuf),

    #[error("could not read image {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
