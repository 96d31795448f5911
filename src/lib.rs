// src/lib.rs
pub mod biom;
pub mod command;
pub mod error;
pub mod normalize;
pub mod runner;
pub mod sequences;
pub mod table;
pub mod types;

use std::path::Path;

use tempfile::TempDir;

use crate::command::{build_workflow_argv, OUTPUT_TABLE_FILENAME};
use crate::error::DeblurError;
use crate::normalize::{clean_sample_ids, hash_feature_ids, identity_feature_ids};
use crate::runner::{SubprocessRunner, WorkflowRunner};
use crate::sequences::RepSequences;
use crate::table::FeatureTable;
use crate::types::DenoiseParams;

/// Denoises 16S amplicon data with deblur's bundled 16S reference.
///
/// `demultiplexed_seqs` is the directory of per-sample demultiplexed FASTQ
/// files; `trim_length` is the position reads are trimmed to, `-1` to
/// disable trimming. Returns the denoised feature table together with the
/// representative sequence for every feature in it.
pub fn denoise_16s(
    demultiplexed_seqs: &Path,
    trim_length: i32,
    params: &DenoiseParams,
) -> Result<(FeatureTable, RepSequences), DeblurError> {
    denoise_16s_with(&SubprocessRunner, demultiplexed_seqs, trim_length, params)
}

/// Like [`denoise_16s`] but positive-filters against a caller-supplied
/// FASTA of reference sequences instead of the 16S default.
pub fn denoise_other(
    demultiplexed_seqs: &Path,
    reference_seqs: &Path,
    trim_length: i32,
    params: &DenoiseParams,
) -> Result<(FeatureTable, RepSequences), DeblurError> {
    denoise_other_with(
        &SubprocessRunner,
        demultiplexed_seqs,
        reference_seqs,
        trim_length,
        params,
    )
}

/// [`denoise_16s`] with an injected runner, for callers (and tests) that
/// substitute how the external tool is executed.
pub fn denoise_16s_with(
    runner: &dyn WorkflowRunner,
    demultiplexed_seqs: &Path,
    trim_length: i32,
    params: &DenoiseParams,
) -> Result<(FeatureTable, RepSequences), DeblurError> {
    denoise_helper(runner, demultiplexed_seqs, None, trim_length, params)
}

/// [`denoise_other`] with an injected runner.
pub fn denoise_other_with(
    runner: &dyn WorkflowRunner,
    demultiplexed_seqs: &Path,
    reference_seqs: &Path,
    trim_length: i32,
    params: &DenoiseParams,
) -> Result<(FeatureTable, RepSequences), DeblurError> {
    denoise_helper(
        runner,
        demultiplexed_seqs,
        Some(reference_seqs),
        trim_length,
        params,
    )
}

fn denoise_helper(
    runner: &dyn WorkflowRunner,
    demultiplexed_seqs: &Path,
    reference_seqs: Option<&Path>,
    trim_length: i32,
    params: &DenoiseParams,
) -> Result<(FeatureTable, RepSequences), DeblurError> {
    // 1. Scratch directory for this invocation only. Dropped (and deleted)
    //    on every exit path, including the error returns below.
    let scratch = TempDir::new()?;

    // 2. Build and run the deblur workflow command.
    let argv = build_workflow_argv(
        demultiplexed_seqs,
        scratch.path(),
        reference_seqs,
        trim_length,
        params,
    );
    runner.run(&argv)?;

    // 3. Load the table deblur wrote and strip per-file sample suffixes.
    let mut table = biom::load_table(&scratch.path().join(OUTPUT_TABLE_FILENAME))?;
    clean_sample_ids(&mut table);

    // 4. Apply the feature-id policy, keeping the mapping around.
    let fid_map = if params.hashed_feature_ids {
        hash_feature_ids(&mut table)?
    } else {
        identity_feature_ids(&table)
    };

    // 5. Pair the representative sequences off the same mapping.
    let rep_sequences = RepSequences::paired(&table, &fid_map)?;

    log::info!(
        "denoised {} features across {} samples",
        table.n_observations(),
        table.n_samples()
    );
    Ok((table, rep_sequences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Stands in for the deblur binary: drops a canned BIOM table into
    /// whatever --output-dir the argv names, or fails with a given status.
    struct FakeDeblur {
        biom_body: Option<&'static str>,
        status: i32,
    }

    impl FakeDeblur {
        fn writing(biom_body: &'static str) -> Self {
            Self {
                biom_body: Some(biom_body),
                status: 0,
            }
        }

        fn failing(status: i32) -> Self {
            Self {
                biom_body: None,
                status,
            }
        }
    }

    impl WorkflowRunner for FakeDeblur {
        fn run(&self, argv: &[String]) -> Result<(), DeblurError> {
            if self.status != 0 {
                return Err(DeblurError::WorkflowFailed {
                    status: self.status,
                });
            }
            let out_dir = argv
                .iter()
                .position(|t| t == "--output-dir")
                .and_then(|i| argv.get(i + 1))
                .map(PathBuf::from)
                .expect("argv must carry --output-dir");
            if let Some(body) = self.biom_body {
                fs::write(out_dir.join(OUTPUT_TABLE_FILENAME), body).unwrap();
            }
            Ok(())
        }
    }

    const TWO_FEATURE_BIOM: &str = r#"{
        "format": "Biological Observation Matrix 1.0.0",
        "matrix_type": "sparse",
        "shape": [2, 2],
        "rows": [{"id": "ACGTACGT", "metadata": null}, {"id": "TTGGTTGG", "metadata": null}],
        "columns": [{"id": "S1_001", "metadata": null}, {"id": "S2_002", "metadata": null}],
        "data": [[0, 0, 5], [0, 1, 2], [1, 1, 7]]
    }"#;

    #[test]
    fn hashed_run_end_to_end() {
        let runner = FakeDeblur::writing(TWO_FEATURE_BIOM);
        let (table, seqs) = denoise_16s_with(
            &runner,
            &PathBuf::from("demux"),
            150,
            &DenoiseParams::default(),
        )
        .unwrap();

        // Sample suffixes are gone.
        assert_eq!(table.sample_ids(), &["S1".to_string(), "S2".to_string()]);

        // Feature ids are 32-char md5 hex digests of the sequences.
        for rec in seqs.iter() {
            assert_eq!(rec.id.len(), 32);
            assert_eq!(rec.id, format!("{:x}", md5::compute(rec.sequence.as_bytes())));
        }

        // Table axis and sequence collection carry the same id set.
        let table_ids: Vec<&String> = table.observation_ids().iter().collect();
        let seq_ids: Vec<&String> = seqs.iter().map(|r| &r.id).collect();
        assert_eq!(table_ids, seq_ids);

        // Counts survived the renames.
        let acgt_id = format!("{:x}", md5::compute(b"ACGTACGT"));
        assert_eq!(table.get(&acgt_id, "S1"), 5.0);
        assert_eq!(table.get(&acgt_id, "S2"), 2.0);
    }

    #[test]
    fn unhashed_run_keeps_raw_sequences_as_ids() {
        let runner = FakeDeblur::writing(TWO_FEATURE_BIOM);
        let params = DenoiseParams {
            hashed_feature_ids: false,
            ..DenoiseParams::default()
        };
        let (table, seqs) =
            denoise_16s_with(&runner, &PathBuf::from("demux"), 150, &params).unwrap();

        assert_eq!(
            table.observation_ids(),
            &["ACGTACGT".to_string(), "TTGGTTGG".to_string()]
        );
        for rec in seqs.iter() {
            assert_eq!(rec.id, rec.sequence);
        }
    }

    #[test]
    fn other_variant_forwards_the_reference() {
        struct AssertRef;
        impl WorkflowRunner for AssertRef {
            fn run(&self, argv: &[String]) -> Result<(), DeblurError> {
                let i = argv
                    .iter()
                    .position(|t| t == "--pos-ref-fp")
                    .expect("reference flag missing");
                assert_eq!(argv[i + 1], "refs.fasta");
                // Fail afterwards so the test does not need a table.
                Err(DeblurError::WorkflowFailed { status: 1 })
            }
        }
        let err = denoise_other_with(
            &AssertRef,
            &PathBuf::from("demux"),
            &PathBuf::from("refs.fasta"),
            100,
            &DenoiseParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DeblurError::WorkflowFailed { status: 1 }));
    }

    #[test]
    fn subprocess_failure_yields_no_outputs() {
        let runner = FakeDeblur::failing(1);
        let err = denoise_16s_with(
            &runner,
            &PathBuf::from("demux"),
            150,
            &DenoiseParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DeblurError::WorkflowFailed { status: 1 }));
    }

    #[test]
    fn successful_exit_without_table_is_missing_output() {
        struct WritesNothing;
        impl WorkflowRunner for WritesNothing {
            fn run(&self, _argv: &[String]) -> Result<(), DeblurError> {
                Ok(())
            }
        }
        let err = denoise_16s_with(
            &WritesNothing,
            &PathBuf::from("demux"),
            150,
            &DenoiseParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DeblurError::MissingOutput { .. }));
    }

    #[test]
    fn empty_table_comes_back_empty_not_as_an_error() {
        const EMPTY_BIOM: &str = r#"{
            "matrix_type": "sparse",
            "shape": [0, 1],
            "rows": [],
            "columns": [{"id": "S1_001"}],
            "data": []
        }"#;
        let runner = FakeDeblur::writing(EMPTY_BIOM);
        let (table, seqs) = denoise_16s_with(
            &runner,
            &PathBuf::from("demux"),
            150,
            &DenoiseParams::default(),
        )
        .unwrap();
        assert!(table.is_empty());
        assert!(seqs.is_empty());
    }

    #[test]
    fn identical_sequences_collapse_under_hashing() {
        // deblur should never emit duplicate row ids, but if it does the
        // content hash collapses them into one feature with merged counts.
        const DUP_BIOM: &str = r#"{
            "matrix_type": "sparse",
            "shape": [2, 1],
            "rows": [{"id": "ACGT"}, {"id": "ACGT"}],
            "columns": [{"id": "S1"}],
            "data": [[0, 0, 3], [1, 0, 4]]
        }"#;
        let runner = FakeDeblur::writing(DUP_BIOM);
        let (table, seqs) = denoise_16s_with(
            &runner,
            &PathBuf::from("demux"),
            150,
            &DenoiseParams::default(),
        )
        .unwrap();
        assert_eq!(table.n_observations(), 1);
        assert_eq!(seqs.len(), 1);
        let id = format!("{:x}", md5::compute(b"ACGT"));
        assert_eq!(table.get(&id, "S1"), 7.0);
    }
}
