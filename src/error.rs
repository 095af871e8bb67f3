//! Error types shared across the playback screen, the player bridge and the
//! comment client.

use thiserror::Error;

/// Rejections raised while validating the navigation input of the playback screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("track list is empty")]
    EmptyTrackList,

    #[error("initial track {id} is not part of the track list")]
    InitialTrackMissing { id: String },

    #[error("track id {id} appears more than once")]
    DuplicateTrackId { id: String },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("malformed navigation payload: {0}")]
    Malformed(String),
}

/// Failures reported by a [`crate::playback::Player`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("player setup was rejected")]
    SetupRejected,

    #[error("audio bridge error: {0}")]
    Bridge(String),

    #[error("queue index {index} out of range (queue holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("queue is empty")]
    EmptyQueue,
}

/// Failures from the remote comment service.
#[derive(Error, Debug)]
pub enum CommentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("comment service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("comment text is empty")]
    EmptyText,

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
