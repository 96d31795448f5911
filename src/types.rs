//src/types.rs

/// Scalar parameters forwarded to `deblur workflow`, minus the trim length
/// (which has no sensible default and is taken as a separate argument).
///
/// The unsigned fields encode the "all numeric parameters are non-negative"
/// rule in the type; values are never range-checked again downstream.
#[derive(Debug, Clone)]
pub struct DenoiseParams {
    /// Mean per-nucleotide error, used for the original sequence estimate.
    pub mean_error: f64,
    /// Insertion/deletion (indel) probability (same for N indels).
    pub indel_prob: f64,
    /// Maximum number of insertions/deletions.
    pub indel_max: u32,
    /// Retain only features appearing at least this many times across all
    /// samples in the resulting feature table.
    pub min_reads: u32,
    /// In each sample, discard all features with an abundance below this.
    pub min_size: u32,
    /// Number of jobs to start (if to run in parallel). Passed through to
    /// deblur opaquely; this crate never spawns workers of its own.
    pub jobs_to_start: u32,
    /// If true, replace every feature id (the raw sequence) with the MD5
    /// hex digest of its UTF-8 bytes.
    pub hashed_feature_ids: bool,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            mean_error: 0.005,
            indel_prob: 0.01,
            indel_max: 3,
            min_reads: 10,
            min_size: 2,
            jobs_to_start: 1,
            hashed_feature_ids: true,
        }
    }
}

/// `trim_length` value that disables trimming inside deblur. Forwarded to
/// the command line verbatim, never special-cased here.
pub const NO_TRIM: i32 = -1;
