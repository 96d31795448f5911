//src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while driving a deblur workflow run.
///
/// There are no retries anywhere: a subprocess failure or a missing/broken
/// output table aborts the whole operation and nothing is returned.
#[derive(Debug, Error)]
pub enum DeblurError {
    /// The deblur executable could not be launched at all (not installed,
    /// not on PATH, permission problem).
    #[error("could not launch the deblur executable: {0}")]
    Spawn(#[source] io::Error),

    /// deblur ran but exited with a non-zero status. `status` is the exit
    /// code, or -1 if the process was killed by a signal.
    #[error("deblur workflow exited with status {status}")]
    WorkflowFailed { status: i32 },

    /// deblur exited 0 but the expected output table is not there. Usually
    /// a tool/version mismatch.
    #[error("deblur did not produce the expected output {}: {source}", .path.display())]
    MissingOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output table exists but cannot be parsed as a BIOM table.
    #[error("invalid BIOM table {}: {reason}", .path.display())]
    InvalidTable { path: PathBuf, reason: String },

    /// Two distinct sequences produced the same MD5 digest. Astronomically
    /// unlikely, but the id/sequence pairing would be ambiguous, so fail
    /// loudly rather than overwrite.
    #[error("md5 collision: sequences {a:?} and {b:?} share digest {digest}")]
    HashCollision { a: String, b: String, digest: String },

    /// The feature axis of the table and the paired sequence collection
    /// disagree. Checked eagerly before the sequences are handed out.
    #[error("feature ids in the table do not match the paired sequences: {0}")]
    FeatureIdMismatch(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
